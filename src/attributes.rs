use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Transient combat-only attributes. An attribute that is absent from a
/// combatant's bag is inactive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Attr {
    // Shielding
    Shield,
    ManaShieldPool,
    PhysicalImmunityCharges,
    InvincibleDuration,

    // Scheduling
    FirstStrike,

    // Per-turn flags
    AttackedThisTurn,
    KilledEnemyThisTurn,

    // Ultimate lifecycle
    UltimateThreshold,
    UltimateReady,
    UltimateActivated,

    // One-shot guards
    DeathPreventionUsed,
    DivineInvincibilityUsed,

    // Timed team effects
    HealBlockDuration,
    RallyDuration,
    EvasionDuration,
    EvasionBonus,

    // Counters
    MomentumStacks,
    AttackCounter,
    GrowthStacks,
    TurnCounter,
    SoulStacks,

    /// Turns left before the named skill can proc again.
    Cooldown(&'static str),
}

impl Attr {
    /// Attributes decremented once per turn by the per-turn pass.
    pub fn is_duration(&self) -> bool {
        matches!(
            self,
            Attr::InvincibleDuration
                | Attr::HealBlockDuration
                | Attr::RallyDuration
                | Attr::EvasionDuration
        )
    }
}

/// Sparse map of transient attributes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeBag {
    values: BTreeMap<Attr, Decimal>,
}

impl AttributeBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, attr: Attr) -> Option<Decimal> {
        self.values.get(&attr).copied()
    }

    pub fn get_or_zero(&self, attr: Attr) -> Decimal {
        self.get(attr).unwrap_or(Decimal::ZERO)
    }

    pub fn has(&self, attr: Attr) -> bool {
        self.values.contains_key(&attr)
    }

    /// Sets `attr`. Values at or below zero remove it.
    pub fn set(&mut self, attr: Attr, value: Decimal) {
        if value > Decimal::ZERO {
            self.values.insert(attr, value);
        } else {
            self.values.remove(&attr);
        }
    }

    pub fn set_flag(&mut self, attr: Attr) {
        self.values.insert(attr, Decimal::ONE);
    }

    pub fn remove(&mut self, attr: Attr) -> Option<Decimal> {
        self.values.remove(&attr)
    }

    /// Adds `by` to `attr` and returns the new value, removing the attribute
    /// if the result is not positive.
    pub fn add(&mut self, attr: Attr, by: Decimal) -> Decimal {
        let value = self.get_or_zero(attr) + by;
        self.set(attr, value);
        value.max(Decimal::ZERO)
    }

    /// Decrements every duration attribute by one turn and returns the ones
    /// that just ran out.
    pub fn tick_durations(&mut self) -> Vec<Attr> {
        let mut expired = Vec::new();
        for (attr, value) in self.values.iter_mut() {
            if attr.is_duration() {
                *value -= Decimal::ONE;
                if *value <= Decimal::ZERO {
                    expired.push(*attr);
                }
            }
        }
        for attr in &expired {
            self.values.remove(attr);
        }
        expired
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Attr, &Decimal)> {
        self.values.iter()
    }
}
