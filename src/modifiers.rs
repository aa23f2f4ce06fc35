use rust_decimal::Decimal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stat {
    Damage,
    Armor,
    Luck,
}

/// What applied a stat modifier. One modifier per (source, stat) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModifierSource {
    TeamRally,
    ArmorBreak,
    Growth,
}

#[derive(Debug, Clone, PartialEq)]
struct Modifier {
    source: ModifierSource,
    stat: Stat,
    delta: Decimal,
}

/// Base stats plus the additive deltas currently applied to them.
///
/// A percentage buff is recorded as the absolute delta it produced at the
/// time it was applied. Removing it drops exactly that delta, so the base
/// values never drift no matter how often buffs come and go.
#[derive(Debug, Clone, PartialEq)]
pub struct StatBlock {
    damage: Decimal,
    armor: Decimal,
    luck: Decimal,
    modifiers: Vec<Modifier>,
}

impl StatBlock {
    pub fn new(damage: Decimal, armor: Decimal, luck: Decimal) -> Self {
        Self {
            damage: damage.max(Decimal::ZERO),
            armor: armor.max(Decimal::ZERO),
            luck: luck.max(Decimal::ZERO),
            modifiers: Vec::new(),
        }
    }

    pub fn base(&self, stat: Stat) -> Decimal {
        match stat {
            Stat::Damage => self.damage,
            Stat::Armor => self.armor,
            Stat::Luck => self.luck,
        }
    }

    /// Effective value: base plus all deltas, never below zero.
    pub fn get(&self, stat: Stat) -> Decimal {
        let total: Decimal = self
            .modifiers
            .iter()
            .filter(|m| m.stat == stat)
            .map(|m| m.delta)
            .sum();
        (self.base(stat) + total).max(Decimal::ZERO)
    }

    pub fn damage(&self) -> Decimal {
        self.get(Stat::Damage)
    }

    pub fn armor(&self) -> Decimal {
        self.get(Stat::Armor)
    }

    pub fn luck(&self) -> Decimal {
        self.get(Stat::Luck)
    }

    /// Applies a signed percentage of the current effective value. A source
    /// that is already active on this stat is replaced, not stacked.
    /// Returns the recorded delta.
    pub fn apply_pct(&mut self, source: ModifierSource, stat: Stat, pct: Decimal) -> Decimal {
        self.remove(source, stat);
        let delta = self.get(stat) * pct / Decimal::ONE_HUNDRED;
        self.modifiers.push(Modifier { source, stat, delta });
        delta
    }

    pub fn remove(&mut self, source: ModifierSource, stat: Stat) -> Option<Decimal> {
        let position = self
            .modifiers
            .iter()
            .position(|m| m.source == source && m.stat == stat)?;
        Some(self.modifiers.remove(position).delta)
    }

    pub fn has(&self, source: ModifierSource, stat: Stat) -> bool {
        self.modifiers
            .iter()
            .any(|m| m.source == source && m.stat == stat)
    }

    pub fn modifier_count(&self) -> usize {
        self.modifiers.len()
    }
}
