use serde::{Deserialize, Serialize};
use std::fmt;

/// Crowd-control families. All of them stop the holder from acting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CrowdControl {
    Stun,
    Paralyze,
    Freeze,
    Root,
}

/// Damage-over-time families. Each family merges with itself only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DotKind {
    Burn,
    Poison,
    Bleed,
    Frostbite,
    Curse,
    Corruption,
}

impl fmt::Display for DotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DotKind::Burn => "burn",
            DotKind::Poison => "poison",
            DotKind::Bleed => "bleeding",
            DotKind::Frostbite => "frostbite",
            DotKind::Curse => "curse",
            DotKind::Corruption => "corruption",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UltimateKind {
    InfernoApocalypse,
    Tsunami,
    /// Electric variant of "Storm Lord".
    ThunderStormLord,
    /// Wind variant of "Storm Lord".
    TempestStormLord,
    GaiasWrath,
    DivineJudgment,
    EternalNight,
    VoidAnnihilation,
}

impl fmt::Display for UltimateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UltimateKind::InfernoApocalypse => "Inferno Apocalypse",
            UltimateKind::Tsunami => "Tsunami",
            UltimateKind::ThunderStormLord | UltimateKind::TempestStormLord => "Storm Lord",
            UltimateKind::GaiasWrath => "Gaia's Wrath",
            UltimateKind::DivineJudgment => "Divine Judgment",
            UltimateKind::EternalNight => "Eternal Night",
            UltimateKind::VoidAnnihilation => "Void Annihilation",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RevivalKind {
    GuardianAngel,
    /// Also burns away every debuff on revival.
    PhoenixRebirth,
    Wellspring,
}

impl fmt::Display for RevivalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RevivalKind::GuardianAngel => "Guardian Angel",
            RevivalKind::PhoenixRebirth => "Phoenix Rebirth",
            RevivalKind::Wellspring => "Wellspring of Life",
        };
        write!(f, "{}", name)
    }
}

/// Which resolution pass consumes a skill effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResolutionPass {
    OnAttack,
    OnDamageTaken,
    PerTurn,
    /// Affects turn ordering only, applied when the skill is learned.
    Scheduling,
}

/// Effect payload of a learned skill.
///
/// Percentages are whole numbers: `chance` is compared against a 1..=100 roll
/// and `*_pct` multipliers use 100 as identity (150 means ×1.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkillEffect {
    // Outgoing multipliers
    ProcBonus { chance: u8, multiplier_pct: u32 },
    /// Crit chance equals the attacker's luck.
    CriticalStrike { multiplier_pct: u32 },
    VolatileStrike { min_pct: u32, max_pct: u32 },
    Overcharge { every: u32, multiplier_pct: u32 },
    CooldownStrike { chance: u8, multiplier_pct: u32, cooldown: u32, area: bool },
    LowHpFury { threshold_pct: u8, bonus_pct: u32 },
    Execute { threshold_pct: u8, multiplier_pct: u32 },
    ElementalMastery { bonus_pct: u32 },
    OwnerBond { bonus_pct: u32 },
    Momentum { stack_pct: u32, max_stacks: u32 },
    ArmorPierce { pct: u8 },
    TrueDamageSplit { chance: u8, true_pct: u8 },

    // On-hit debuffs and buffs
    ApplyDot { kind: DotKind, chance: u8, pct_max_hp: u8, turns: u32 },
    CrowdControl { kind: CrowdControl, chance: u8, turns: u32 },
    ArmorShred { chance: u8, pct: u8, turns: u32 },
    Weaken { chance: u8, pct: u8, turns: u32 },
    HealBlock { chance: u8, turns: u32 },
    Purge { chance: u8 },
    Contagion { chance: u8 },
    TeamRally { chance: u8, pct: u8, turns: u32 },

    // Follow-up hits
    Splash { pct: u8 },
    ChainAttack { chance: u8, hops: u8, falloff_pct: u8 },
    DoubleStrike { chance: u8 },

    // After the hit lands
    LifeSteal { pct: u8 },
    SoulHarvest { heal_pct: u8, bloodlust_pct: u8 },
    Ultimate { threshold_pct: u8, kind: UltimateKind },

    // Incoming damage
    DivineInvincibility { threshold_pct: u8, turns: u32 },
    PhysicalImmunity { charges: u32 },
    DamageReduction { pct: u8 },
    Fortify { threshold_pct: u8, pct: u8 },
    AllyWard { pct: u8 },
    Dodge { chance: u8 },
    Block { chance: u8, reflect_pct: u8 },
    ManaShield { pool_pct: u8, absorb_pct: u8 },
    Bodyguard { redirect_pct: u8 },
    DeathPrevention { revive_pct: u8, kind: RevivalKind },
    Reflect { pct: u8 },
    Retaliate { chance: u8, pct: u8 },

    // Turn lifecycle
    Regeneration { pct: u8 },
    TeamHeal { pct: u8 },
    PeriodicShield { pct: u8, every: u32 },
    Cleanse { every: u32 },
    Growth { pct: u8, max_stacks: u32 },
    AuraDamage { pct: u8 },
    DotImmunity,

    FirstStrike,
}

impl SkillEffect {
    pub fn pass(&self) -> ResolutionPass {
        use SkillEffect::*;

        match self {
            ProcBonus { .. }
            | CriticalStrike { .. }
            | VolatileStrike { .. }
            | Overcharge { .. }
            | CooldownStrike { .. }
            | LowHpFury { .. }
            | Execute { .. }
            | ElementalMastery { .. }
            | OwnerBond { .. }
            | Momentum { .. }
            | ArmorPierce { .. }
            | TrueDamageSplit { .. }
            | ApplyDot { .. }
            | CrowdControl { .. }
            | ArmorShred { .. }
            | Weaken { .. }
            | HealBlock { .. }
            | Purge { .. }
            | Contagion { .. }
            | TeamRally { .. }
            | Splash { .. }
            | ChainAttack { .. }
            | DoubleStrike { .. }
            | LifeSteal { .. }
            | SoulHarvest { .. }
            | Ultimate { .. } => ResolutionPass::OnAttack,

            DivineInvincibility { .. }
            | PhysicalImmunity { .. }
            | DamageReduction { .. }
            | Fortify { .. }
            | AllyWard { .. }
            | Dodge { .. }
            | Block { .. }
            | ManaShield { .. }
            | Bodyguard { .. }
            | DeathPrevention { .. }
            | Reflect { .. }
            | Retaliate { .. } => ResolutionPass::OnDamageTaken,

            Regeneration { .. }
            | TeamHeal { .. }
            | PeriodicShield { .. }
            | Cleanse { .. }
            | Growth { .. }
            | AuraDamage { .. }
            | DotImmunity => ResolutionPass::PerTurn,

            FirstStrike => ResolutionPass::Scheduling,
        }
    }

    /// Skills that reward finishing off weakened targets. Guardians holding
    /// one of these prefer low-HP targets.
    pub fn is_execute_style(&self) -> bool {
        matches!(
            self,
            SkillEffect::Execute { .. } | SkillEffect::SoulHarvest { .. }
        )
    }
}
