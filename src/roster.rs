use crate::battle::state::BattleArena;
use crate::combatant::Combatant;
use crate::errors::{RosterError, RosterResult};
use crate::modifiers::StatBlock;
use crate::skills::apply_skill_effects;
use rust_decimal::Decimal;
use schema::{CombatantKind, CombatantRow, Element, TeamSide, TrustLevel};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, warn};

/// A pet's stored record before level and trust bonuses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PetRow {
    pub id: String,
    pub name: String,
    pub owner_id: String,
    pub level: u32,
    #[serde(default)]
    pub trust: TrustLevel,
    pub max_hp: Decimal,
    pub damage: Decimal,
    pub armor: Decimal,
    #[serde(default)]
    pub luck: Decimal,
    #[serde(default)]
    pub element: Element,
    #[serde(default)]
    pub skills: Vec<String>,
}

/// +1% per level above 1, then the trust multiplier.
pub fn scale_pet_stat(value: Decimal, level: u32, trust: TrustLevel) -> Decimal {
    let level_bonus = Decimal::from(level.saturating_sub(1)) / Decimal::ONE_HUNDRED;
    let trust_bonus = Decimal::from(trust.bonus_pct()) / Decimal::ONE_HUNDRED;
    (value * (Decimal::ONE + level_bonus) * (Decimal::ONE + trust_bonus)).max(Decimal::ZERO)
}

impl PetRow {
    /// Battle-ready row for a pet fighting on `side` at full HP.
    pub fn to_combatant_row(&self, side: TeamSide) -> CombatantRow {
        let max_hp = scale_pet_stat(self.max_hp, self.level, self.trust);
        CombatantRow {
            id: self.id.clone(),
            name: self.name.clone(),
            kind: CombatantKind::Pet,
            side,
            hp: max_hp,
            max_hp,
            damage: scale_pet_stat(self.damage, self.level, self.trust),
            armor: scale_pet_stat(self.armor, self.level, self.trust),
            luck: self.luck,
            element: self.element,
            owner_id: Some(self.owner_id.clone()),
            skills: self.skills.clone(),
        }
    }
}

pub fn validate_row(row: &CombatantRow) -> RosterResult<()> {
    if row.max_hp <= Decimal::ZERO {
        return Err(RosterError::InvalidMaxHp {
            id: row.id.clone(),
            max_hp: row.max_hp.to_string(),
        });
    }
    Ok(())
}

/// Builds a combatant from its row and resolves its learned skills.
pub fn build_combatant(row: &CombatantRow) -> Combatant {
    let stats = StatBlock::new(row.damage, row.armor, row.luck);
    let mut combatant = Combatant::new(
        row.id.clone(),
        row.name.clone(),
        row.kind,
        row.side,
        row.max_hp,
        stats,
    );
    combatant.element = row.element;
    combatant.set_hp(row.hp);
    let recognized = apply_skill_effects(&mut combatant, &row.skills);
    debug!(combatant = %combatant.name, recognized, learned = row.skills.len(), "combatant built");
    combatant
}

/// Turns a roster into an arena. Bad rows are logged and skipped; the only
/// hard failure is a side with nobody left to fight.
pub fn build_arena(rows: &[CombatantRow]) -> RosterResult<BattleArena> {
    let mut arena = BattleArena::default();
    let mut seen = HashSet::new();

    for row in rows {
        if !seen.insert(row.id.as_str()) {
            warn!("Skipping roster row: {}", RosterError::DuplicateId(row.id.clone()));
            continue;
        }
        if let Err(e) = validate_row(row) {
            warn!("Skipping roster row: {}", e);
            continue;
        }
        arena.push(build_combatant(row));
    }

    // Owner links resolve only to a combatant on the same side.
    for row in rows {
        let Some(owner_key) = row.owner_id.as_deref() else {
            continue;
        };
        let (Some(pet), Some(owner)) = (arena.find_by_key(&row.id), arena.find_by_key(owner_key)) else {
            debug!(pet = %row.id, owner = owner_key, "owner not in roster");
            continue;
        };
        if pet != owner && arena[pet].side == arena[owner].side {
            arena[pet].owner = Some(owner);
        }
    }

    if arena.living_on(TeamSide::Attackers).is_empty() {
        return Err(RosterError::EmptySide("attacker"));
    }
    if arena.living_on(TeamSide::Defenders).is_empty() {
        return Err(RosterError::EmptySide("defender"));
    }
    Ok(arena)
}
