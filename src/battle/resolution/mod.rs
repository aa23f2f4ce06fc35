// In: src/battle/resolution/mod.rs

// --- 1. DECLARE HELPER MODULES ---
mod attack_effects;
mod defense_effects;
mod turn_effects;
mod ultimate_effects;

// --- 2. IMPORTS ---
use crate::attributes::Attr;
use crate::battle::state::{BattleArena, TurnRng};
use crate::battle::status_effects::EffectTag;
use crate::combatant::{Combatant, CombatantId};
use rust_decimal::Decimal;
use schema::SkillEffect;
use tracing::debug;

pub use self::attack_effects::{resolve_after_hit, resolve_on_attack};
pub use self::defense_effects::resolve_on_damage_taken;
pub use self::turn_effects::resolve_per_turn;

// --- 3. RESOLUTION DATA STRUCTURES ---

/// Numbers behind one attack before any skill touches them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackRoll {
    /// Attacker damage plus variance.
    pub raw: Decimal,
    /// Target armor at the time of the roll.
    pub armor: Decimal,
    /// `max(min_damage, raw - armor)`.
    pub base: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttackResult {
    /// Damage that still goes through the target's defenses.
    pub damage: Decimal,
    /// Damage that ignores reductions, shields and evasion.
    pub true_damage: Decimal,
    /// A second strike on the same target, applied after the first.
    pub follow_up: Option<Decimal>,
    pub messages: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageKind {
    Normal,
    True,
}

// --- 4. SHARED HELPERS ---

pub(crate) fn pct_of(value: Decimal, pct: impl Into<Decimal>) -> Decimal {
    value * pct.into() / Decimal::ONE_HUNDRED
}

/// `150` becomes `1.5`.
pub(crate) fn multiplier(pct: u32) -> Decimal {
    Decimal::from(pct) / Decimal::ONE_HUNDRED
}

pub(crate) fn find_skill<F>(combatant: &Combatant, predicate: F) -> Option<SkillEffect>
where
    F: Fn(&SkillEffect) -> bool,
{
    combatant.skill_effects().find(|effect| predicate(*effect)).copied()
}

pub(crate) fn has_dot_immunity(combatant: &Combatant) -> bool {
    combatant
        .skill_effects()
        .any(|effect| matches!(effect, SkillEffect::DotImmunity))
}

/// Moves HP, letting the shield soak normal damage first, and gives a
/// death-prevention skill its one chance. Returns the HP actually lost.
pub(crate) fn apply_hp_damage(
    combatant: &mut Combatant,
    amount: Decimal,
    kind: DamageKind,
    messages: &mut Vec<String>,
) -> Decimal {
    let amount = amount.max(Decimal::ZERO);
    if amount.is_zero() || !combatant.is_alive() {
        return Decimal::ZERO;
    }
    let before = combatant.hp();
    match kind {
        DamageKind::Normal => {
            combatant.take_damage(amount);
        }
        DamageKind::True => combatant.set_hp(before - amount),
    }
    if !combatant.is_alive() {
        prevent_death(combatant, messages);
    }
    (before - combatant.hp()).max(Decimal::ZERO)
}

fn prevent_death(combatant: &mut Combatant, messages: &mut Vec<String>) {
    if combatant.attrs.has(Attr::DeathPreventionUsed) {
        return;
    }
    let Some(SkillEffect::DeathPrevention { revive_pct, kind }) =
        find_skill(combatant, |e| matches!(e, SkillEffect::DeathPrevention { .. }))
    else {
        return;
    };
    combatant.attrs.set_flag(Attr::DeathPreventionUsed);
    combatant.set_hp(pct_of(combatant.max_hp(), revive_pct));
    messages.push(format!(
        "{} refuses to fall! {} restores them to {} HP.",
        combatant.name,
        kind,
        combatant.hp().round_dp(0)
    ));
    if kind == schema::RevivalKind::PhoenixRebirth {
        let burned = combatant.remove_effects_by_tag(EffectTag::Debuff);
        if !burned.is_empty() {
            messages.push(format!("The rebirth flames burn away {}'s afflictions.", combatant.name));
        }
    }
    debug!(combatant = %combatant.name, ?kind, "death prevented");
}

/// Heals unless the combatant is heal-blocked. Returns the HP gained.
pub(crate) fn apply_heal(combatant: &mut Combatant, amount: Decimal) -> Decimal {
    if !combatant.is_alive() || combatant.attrs.has(Attr::HealBlockDuration) {
        return Decimal::ZERO;
    }
    let before = combatant.hp();
    combatant.heal(amount);
    combatant.hp() - before
}

fn record_kill(arena: &mut BattleArena, killer: CombatantId, victim: CombatantId) {
    if let Some(killer) = arena.get_mut(killer) {
        killer.kills += 1;
        killer.attrs.set_flag(Attr::KilledEnemyThisTurn);
        debug!(killer = %killer.name, victim = %victim, "kill recorded");
    }
}

/// Hits `victim` without consulting its defenses, as reflected and
/// redirected damage does, and credits `source` if the victim dies.
pub(crate) fn apply_direct_damage(
    arena: &mut BattleArena,
    source: CombatantId,
    victim: CombatantId,
    amount: Decimal,
    kind: DamageKind,
    messages: &mut Vec<String>,
) -> Decimal {
    if !arena.is_alive(victim) {
        return Decimal::ZERO;
    }
    let lost = apply_hp_damage(&mut arena[victim], amount, kind, messages);
    if !arena.is_alive(victim) {
        record_kill(arena, source, victim);
    }
    lost
}

/// Sends damage from `attacker` through `target`'s defenses and credits the
/// kill if the target dies. Returns the HP the target lost.
pub fn deal_damage(
    arena: &mut BattleArena,
    attacker: CombatantId,
    target: CombatantId,
    amount: Decimal,
    kind: DamageKind,
    rng: &mut TurnRng,
    messages: &mut Vec<String>,
) -> Decimal {
    let was_alive = arena.is_alive(target);
    let (lost, mut lines) = resolve_on_damage_taken(arena, target, Some(attacker), amount, kind, rng);
    messages.append(&mut lines);
    if was_alive && !arena.is_alive(target) {
        record_kill(arena, attacker, target);
    }
    lost
}
