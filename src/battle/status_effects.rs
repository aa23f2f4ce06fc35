use crate::combatant::{Combatant, CombatantId};
use crate::modifiers::{ModifierSource, Stat, StatBlock};
use rust_decimal::Decimal;
use schema::{CrowdControl, DotKind};
use std::collections::BTreeSet;

/// Labels used for bulk removal (cleanse, purge).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EffectTag {
    Buff,
    Debuff,
    CrowdControl,
    DamageOverTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectDuration {
    Turns(u32),
    /// Stays until something removes it.
    UntilRemoved,
}

/// How a newly applied effect combines with one of the same family that is
/// already attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackingRule {
    /// Keep the stronger magnitude and the longer duration.
    RefreshDuration,
    /// Sum magnitudes, keep the longer duration.
    AddMagnitude,
    /// Keep the stronger magnitude, sum durations.
    AddDuration,
    /// Never merges; every application is its own entry.
    Independent,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatusKind {
    DamageReduction { pct: Decimal },
    Weakened { pct: Decimal },
    DamageOverTime { kind: DotKind, per_turn: Decimal },
    Regeneration { per_turn: Decimal },
    Incapacitated(CrowdControl),
    ArmorBreak { pct: Decimal },
    /// Bonus on the next attack only.
    Empowered { pct: Decimal },
    /// Bonus against targets under half HP.
    Bloodlust { pct: Decimal },
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusEffect {
    pub kind: StatusKind,
    pub tags: BTreeSet<EffectTag>,
    pub duration: EffectDuration,
    pub stacking: StackingRule,
    pub holder: Option<CombatantId>,
    /// False while the attack that applied it is still resolving.
    pub settled: bool,
}

fn pct_of(amount: Decimal, pct: Decimal) -> Decimal {
    amount * pct / Decimal::ONE_HUNDRED
}

impl StatusEffect {
    fn new(kind: StatusKind, tags: &[EffectTag], duration: EffectDuration, stacking: StackingRule) -> Self {
        Self {
            kind,
            tags: tags.iter().copied().collect(),
            duration,
            stacking,
            holder: None,
            settled: false,
        }
    }

    pub fn damage_reduction(pct: Decimal, turns: u32) -> Self {
        Self::new(
            StatusKind::DamageReduction { pct },
            &[EffectTag::Buff],
            EffectDuration::Turns(turns),
            StackingRule::RefreshDuration,
        )
    }

    pub fn weakened(pct: Decimal, turns: u32) -> Self {
        Self::new(
            StatusKind::Weakened { pct },
            &[EffectTag::Debuff],
            EffectDuration::Turns(turns),
            StackingRule::RefreshDuration,
        )
    }

    /// Poison and corruption intensify when reapplied; the rest refresh.
    pub fn damage_over_time(kind: DotKind, per_turn: Decimal, turns: u32) -> Self {
        let stacking = match kind {
            DotKind::Poison | DotKind::Corruption => StackingRule::AddMagnitude,
            _ => StackingRule::RefreshDuration,
        };
        Self::new(
            StatusKind::DamageOverTime { kind, per_turn },
            &[EffectTag::Debuff, EffectTag::DamageOverTime],
            EffectDuration::Turns(turns),
            stacking,
        )
    }

    pub fn regeneration(per_turn: Decimal, turns: u32) -> Self {
        Self::new(
            StatusKind::Regeneration { per_turn },
            &[EffectTag::Buff],
            EffectDuration::Turns(turns),
            StackingRule::RefreshDuration,
        )
    }

    /// Control effects extend rather than refresh.
    pub fn crowd_control(kind: CrowdControl, turns: u32) -> Self {
        Self::new(
            StatusKind::Incapacitated(kind),
            &[EffectTag::Debuff, EffectTag::CrowdControl],
            EffectDuration::Turns(turns),
            StackingRule::AddDuration,
        )
    }

    pub fn armor_break(pct: Decimal, turns: u32) -> Self {
        Self::new(
            StatusKind::ArmorBreak { pct },
            &[EffectTag::Debuff],
            EffectDuration::Turns(turns),
            StackingRule::RefreshDuration,
        )
    }

    pub fn empowered(pct: Decimal, turns: u32) -> Self {
        Self::new(
            StatusKind::Empowered { pct },
            &[EffectTag::Buff],
            EffectDuration::Turns(turns),
            StackingRule::RefreshDuration,
        )
    }

    pub fn bloodlust(pct: Decimal) -> Self {
        Self::new(
            StatusKind::Bloodlust { pct },
            &[EffectTag::Buff],
            EffectDuration::UntilRemoved,
            StackingRule::AddMagnitude,
        )
    }

    pub fn name(&self) -> &'static str {
        match &self.kind {
            StatusKind::DamageReduction { .. } => "Damage Reduction",
            StatusKind::Weakened { .. } => "Weakness",
            StatusKind::DamageOverTime { kind, .. } => match kind {
                DotKind::Burn => "Burn",
                DotKind::Poison => "Poison",
                DotKind::Bleed => "Bleed",
                DotKind::Frostbite => "Frostbite",
                DotKind::Curse => "Curse",
                DotKind::Corruption => "Corruption",
            },
            StatusKind::Regeneration { .. } => "Regeneration",
            StatusKind::Incapacitated(kind) => match kind {
                CrowdControl::Stun => "Stun",
                CrowdControl::Paralyze => "Paralysis",
                CrowdControl::Freeze => "Freeze",
                CrowdControl::Root => "Root",
            },
            StatusKind::ArmorBreak { .. } => "Armor Break",
            StatusKind::Empowered { .. } => "Empowerment",
            StatusKind::Bloodlust { .. } => "Bloodlust",
        }
    }

    pub fn has_tag(&self, tag: EffectTag) -> bool {
        self.tags.contains(&tag)
    }

    /// Whether `other` belongs to the same family and should merge into this one.
    pub fn merges_with(&self, other: &StatusEffect) -> bool {
        self.stacking != StackingRule::Independent
            && other.stacking != StackingRule::Independent
            && self.name() == other.name()
    }

    pub fn magnitude(&self) -> Option<Decimal> {
        match &self.kind {
            StatusKind::DamageReduction { pct }
            | StatusKind::Weakened { pct }
            | StatusKind::ArmorBreak { pct }
            | StatusKind::Empowered { pct }
            | StatusKind::Bloodlust { pct } => Some(*pct),
            StatusKind::DamageOverTime { per_turn, .. } | StatusKind::Regeneration { per_turn } => {
                Some(*per_turn)
            }
            StatusKind::Incapacitated(_) => None,
        }
    }

    fn set_magnitude(&mut self, value: Decimal) {
        match &mut self.kind {
            StatusKind::DamageReduction { pct }
            | StatusKind::Weakened { pct }
            | StatusKind::ArmorBreak { pct }
            | StatusKind::Empowered { pct }
            | StatusKind::Bloodlust { pct } => *pct = value,
            StatusKind::DamageOverTime { per_turn, .. } | StatusKind::Regeneration { per_turn } => {
                *per_turn = value
            }
            StatusKind::Incapacitated(_) => {}
        }
    }

    fn longer(a: EffectDuration, b: EffectDuration) -> EffectDuration {
        match (a, b) {
            (EffectDuration::Turns(x), EffectDuration::Turns(y)) => EffectDuration::Turns(x.max(y)),
            _ => EffectDuration::UntilRemoved,
        }
    }

    /// Folds `incoming` into this effect according to this effect's stacking rule.
    pub fn merge(&mut self, incoming: StatusEffect) {
        let stronger = match (self.magnitude(), incoming.magnitude()) {
            (Some(a), Some(b)) => Some(a.max(b)),
            _ => None,
        };
        match self.stacking {
            StackingRule::RefreshDuration | StackingRule::Independent => {
                if let Some(value) = stronger {
                    self.set_magnitude(value);
                }
                self.duration = Self::longer(self.duration, incoming.duration);
            }
            StackingRule::AddMagnitude => {
                if let (Some(a), Some(b)) = (self.magnitude(), incoming.magnitude()) {
                    self.set_magnitude(a + b);
                }
                self.duration = Self::longer(self.duration, incoming.duration);
            }
            StackingRule::AddDuration => {
                if let Some(value) = stronger {
                    self.set_magnitude(value);
                }
                self.duration = match (self.duration, incoming.duration) {
                    (EffectDuration::Turns(x), EffectDuration::Turns(y)) => {
                        EffectDuration::Turns(x.saturating_add(y))
                    }
                    _ => EffectDuration::UntilRemoved,
                };
            }
        }
        self.settled &= incoming.settled;
        self.tags.extend(incoming.tags);
    }

    /// Advances one turn. Returns whether the effect is still active.
    pub fn tick(&mut self) -> bool {
        match &mut self.duration {
            EffectDuration::Turns(turns) => {
                *turns = turns.saturating_sub(1);
                *turns > 0
            }
            EffectDuration::UntilRemoved => true,
        }
    }

    /// A spent effect is detached at the next opportunity.
    pub fn is_spent(&self) -> bool {
        self.duration == EffectDuration::Turns(0)
    }

    pub fn is_incapacitating(&self) -> bool {
        matches!(self.kind, StatusKind::Incapacitated(_))
    }

    pub fn on_apply(&self, stats: &mut StatBlock) {
        if let StatusKind::ArmorBreak { pct } = self.kind {
            stats.apply_pct(ModifierSource::ArmorBreak, Stat::Armor, -pct);
        }
    }

    pub fn on_remove(&self, stats: &mut StatBlock) {
        if let StatusKind::ArmorBreak { .. } = self.kind {
            stats.remove(ModifierSource::ArmorBreak, Stat::Armor);
        }
    }

    pub fn modify_outgoing(&self, amount: Decimal, target: &Combatant) -> Decimal {
        match self.kind {
            StatusKind::Empowered { pct } => amount + pct_of(amount, pct),
            StatusKind::Weakened { pct } => amount - pct_of(amount, pct.min(Decimal::ONE_HUNDRED)),
            StatusKind::Bloodlust { pct } if target.hp_ratio() < Decimal::new(5, 1) => {
                amount + pct_of(amount, pct)
            }
            _ => amount,
        }
    }

    pub fn modify_incoming(&self, amount: Decimal, _source: Option<&Combatant>) -> Decimal {
        match self.kind {
            StatusKind::DamageReduction { pct } => {
                amount - pct_of(amount, pct.min(Decimal::ONE_HUNDRED))
            }
            _ => amount,
        }
    }

    /// Fired when the holder attacks. Empowerment is consumed by the swing.
    pub fn on_attack(&mut self, holder_name: &str) -> Option<String> {
        if let StatusKind::Empowered { .. } = self.kind {
            self.duration = EffectDuration::Turns(0);
            return Some(format!("{} unleashes their empowered strike!", holder_name));
        }
        None
    }

    /// Fired when the holder is hit. A frozen holder shatters free, unless the
    /// ice came from the blow itself.
    pub fn on_defend(&mut self, holder_name: &str) -> Option<String> {
        if !self.settled {
            return None;
        }
        if let StatusKind::Incapacitated(CrowdControl::Freeze) = self.kind {
            self.duration = EffectDuration::Turns(0);
            return Some(format!("The blow shatters the ice around {}!", holder_name));
        }
        None
    }

    pub fn expiry_notice(&self, holder_name: &str) -> String {
        format!("{}'s {} wore off.", holder_name, self.name())
    }
}
