use crate::elements::Element;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CombatantKind {
    Player,
    Pet,
    Guardian,
}

/// Which side of a fight a combatant is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TeamSide {
    Attackers,
    Defenders,
}

impl TeamSide {
    pub fn opponent(self) -> TeamSide {
        match self {
            TeamSide::Attackers => TeamSide::Defenders,
            TeamSide::Defenders => TeamSide::Attackers,
        }
    }
}

/// A stat snapshot handed to the engine by the orchestration layer, with
/// class, equipment, level and trust bonuses already folded in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatantRow {
    pub id: String,
    pub name: String,
    pub kind: CombatantKind,
    pub side: TeamSide,
    pub hp: Decimal,
    pub max_hp: Decimal,
    pub damage: Decimal,
    pub armor: Decimal,
    pub luck: Decimal,
    #[serde(default)]
    pub element: Element,
    #[serde(default)]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
}

impl CombatantRow {
    pub fn is_pet(&self) -> bool {
        self.kind == CombatantKind::Pet
    }
}

/// Pet-only progression stat that scales battle stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TrustLevel {
    Hostile,
    Wary,
    #[default]
    Neutral,
    Friendly,
    Loyal,
    Devoted,
}

impl TrustLevel {
    /// Signed percentage applied to a pet's damage, armor and max HP.
    pub fn bonus_pct(self) -> i64 {
        match self {
            TrustLevel::Hostile => -20,
            TrustLevel::Wary => -10,
            TrustLevel::Neutral => 0,
            TrustLevel::Friendly => 10,
            TrustLevel::Loyal => 20,
            TrustLevel::Devoted => 30,
        }
    }
}
