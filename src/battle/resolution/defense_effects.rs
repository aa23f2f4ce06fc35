use super::{apply_direct_damage, apply_hp_damage, find_skill, pct_of, DamageKind};
use crate::attributes::Attr;
use crate::battle::state::{BattleArena, TurnRng};
use crate::combatant::CombatantId;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use schema::SkillEffect;
use tracing::debug;

/// Cap on the combined reduction granted by allied wards.
const MAX_ALLY_WARD_PCT: u32 = 50;

/// Runs incoming damage through `defender_id`'s defenses and applies what is
/// left to its HP. Returns the HP lost (never negative) and narration.
///
/// True damage skips status reductions, flat reductions, evasion and shields,
/// but not invincibility or death prevention.
pub fn resolve_on_damage_taken(
    arena: &mut BattleArena,
    defender_id: CombatantId,
    attacker_id: Option<CombatantId>,
    incoming: Decimal,
    kind: DamageKind,
    rng: &mut TurnRng,
) -> (Decimal, Vec<String>) {
    let mut messages = Vec::new();
    if incoming <= Decimal::ZERO || !arena.is_alive(defender_id) {
        return (Decimal::ZERO, messages);
    }

    // Hard immunities
    {
        let defender = &mut arena[defender_id];
        if defender.attrs.has(Attr::InvincibleDuration) {
            messages.push(format!("{} is shielded by divine light and takes no damage!", defender.name));
            return (Decimal::ZERO, messages);
        }
        if kind == DamageKind::Normal {
            let charges = defender.attrs.get_or_zero(Attr::PhysicalImmunityCharges);
            if charges > Decimal::ZERO {
                defender
                    .attrs
                    .set(Attr::PhysicalImmunityCharges, charges - Decimal::ONE);
                messages.push(format!("The attack passes harmlessly through {}!", defender.name));
                return (Decimal::ZERO, messages);
            }
        }
    }

    let mut amount = incoming;
    if kind == DamageKind::Normal {
        amount = reduce_incoming(arena, defender_id, attacker_id, amount);
        if try_evade(arena, defender_id, attacker_id, amount, rng, &mut messages) {
            return (Decimal::ZERO, messages);
        }
        amount = absorb_with_mana_shield(arena, defender_id, amount, &mut messages);
    }
    let prevented = incoming - amount;

    amount = redirect_to_bodyguard(arena, defender_id, attacker_id, amount, kind, &mut messages);

    if trigger_divine_invincibility(arena, defender_id, amount, &mut messages) {
        return (Decimal::ZERO, messages);
    }

    let lost = apply_hp_damage(&mut arena[defender_id], amount, kind, &mut messages);
    debug!(defender = %arena[defender_id].name, %incoming, %lost, "damage taken");

    if let Some(attacker_id) = attacker_id {
        punish_attacker(arena, defender_id, attacker_id, prevented, rng, &mut messages);
    }

    if arena.is_alive(defender_id) {
        let mut lines = arena[defender_id].on_defend();
        messages.append(&mut lines);
    }

    (lost, messages)
}

fn reduce_incoming(
    arena: &BattleArena,
    defender_id: CombatantId,
    attacker_id: Option<CombatantId>,
    amount: Decimal,
) -> Decimal {
    let defender = &arena[defender_id];
    let source = attacker_id.and_then(|id| arena.get(id));
    let mut amount = defender.get_incoming_damage(amount, source);

    for effect in defender.skill_effects() {
        match *effect {
            SkillEffect::DamageReduction { pct } => amount -= pct_of(amount, pct),
            SkillEffect::Fortify { threshold_pct, pct }
                if defender.hp_ratio() < Decimal::from(threshold_pct) / Decimal::ONE_HUNDRED =>
            {
                amount -= pct_of(amount, pct)
            }
            _ => {}
        }
    }

    let ward: u32 = arena
        .allies_of(defender_id)
        .into_iter()
        .filter_map(|ally| match find_skill(&arena[ally], |e| matches!(e, SkillEffect::AllyWard { .. })) {
            Some(SkillEffect::AllyWard { pct }) => Some(u32::from(pct)),
            _ => None,
        })
        .sum();
    if ward > 0 {
        amount -= pct_of(amount, ward.min(MAX_ALLY_WARD_PCT));
    }

    amount.max(Decimal::ZERO)
}

fn try_evade(
    arena: &mut BattleArena,
    defender_id: CombatantId,
    attacker_id: Option<CombatantId>,
    amount: Decimal,
    rng: &mut TurnRng,
    messages: &mut Vec<String>,
) -> bool {
    let defender = &arena[defender_id];
    let name = defender.name.clone();

    let skill_dodge = match find_skill(defender, |e| matches!(e, SkillEffect::Dodge { .. })) {
        Some(SkillEffect::Dodge { chance }) => Decimal::from(chance),
        _ => Decimal::ZERO,
    };
    let dodge_chance = (skill_dodge + defender.attrs.get_or_zero(Attr::EvasionBonus))
        .min(Decimal::ONE_HUNDRED)
        .to_u8()
        .unwrap_or(0);
    if rng.roll(dodge_chance, "dodge") {
        messages.push(format!("{} dodges the attack!", name));
        return true;
    }

    let Some(SkillEffect::Block { chance, reflect_pct }) =
        find_skill(defender, |e| matches!(e, SkillEffect::Block { .. }))
    else {
        return false;
    };
    if !rng.roll(chance, "block") {
        return false;
    }
    messages.push(format!("{} blocks the blow!", name));

    if reflect_pct > 0 {
        if let Some(attacker_id) = attacker_id.filter(|&id| arena.is_alive(id)) {
            let reflected = apply_direct_damage(
                arena,
                defender_id,
                attacker_id,
                pct_of(amount, reflect_pct),
                DamageKind::Normal,
                messages,
            );
            if reflected > Decimal::ZERO {
                messages.push(format!(
                    "{} is struck by {} reflected damage.",
                    arena[attacker_id].name,
                    reflected.round_dp(0)
                ));
            }
        }
    }
    true
}

fn absorb_with_mana_shield(
    arena: &mut BattleArena,
    defender_id: CombatantId,
    amount: Decimal,
    messages: &mut Vec<String>,
) -> Decimal {
    let defender = &mut arena[defender_id];
    let Some(SkillEffect::ManaShield { absorb_pct, .. }) =
        find_skill(defender, |e| matches!(e, SkillEffect::ManaShield { .. }))
    else {
        return amount;
    };
    let pool = defender.attrs.get_or_zero(Attr::ManaShieldPool);
    if pool <= Decimal::ZERO {
        return amount;
    }
    let absorbed = pool.min(pct_of(amount, absorb_pct));
    defender.attrs.set(Attr::ManaShieldPool, pool - absorbed);
    messages.push(format!(
        "{}'s mana shield absorbs {} damage.",
        defender.name,
        absorbed.round_dp(0)
    ));
    amount - absorbed
}

fn redirect_to_bodyguard(
    arena: &mut BattleArena,
    defender_id: CombatantId,
    attacker_id: Option<CombatantId>,
    amount: Decimal,
    kind: DamageKind,
    messages: &mut Vec<String>,
) -> Decimal {
    let guard = arena.pets_of(defender_id).into_iter().find_map(|pet| {
        match find_skill(&arena[pet], |e| matches!(e, SkillEffect::Bodyguard { .. })) {
            Some(SkillEffect::Bodyguard { redirect_pct }) => Some((pet, redirect_pct)),
            _ => None,
        }
    });
    let Some((pet_id, redirect_pct)) = guard else {
        return amount;
    };

    let redirected = pct_of(amount, redirect_pct);
    let owner_name = arena[defender_id].name.clone();
    let taken = match attacker_id {
        Some(attacker_id) => apply_direct_damage(arena, attacker_id, pet_id, redirected, kind, messages),
        None => apply_hp_damage(&mut arena[pet_id], redirected, kind, messages),
    };
    messages.push(format!(
        "{} leaps in front of {}, taking {} damage!",
        arena[pet_id].name,
        owner_name,
        taken.round_dp(0)
    ));
    amount - redirected
}

fn trigger_divine_invincibility(
    arena: &mut BattleArena,
    defender_id: CombatantId,
    amount: Decimal,
    messages: &mut Vec<String>,
) -> bool {
    let defender = &mut arena[defender_id];
    let Some(SkillEffect::DivineInvincibility { threshold_pct, turns }) =
        find_skill(defender, |e| matches!(e, SkillEffect::DivineInvincibility { .. }))
    else {
        return false;
    };
    if defender.attrs.has(Attr::DivineInvincibilityUsed) || defender.max_hp().is_zero() {
        return false;
    }
    let ratio_after = (defender.hp() - amount) / defender.max_hp();
    if ratio_after >= Decimal::from(threshold_pct) / Decimal::ONE_HUNDRED {
        return false;
    }
    defender.attrs.set_flag(Attr::DivineInvincibilityUsed);
    defender
        .attrs
        .set(Attr::InvincibleDuration, Decimal::from(turns));
    messages.push(format!(
        "Divine light envelops {}! They are invincible for {} turns.",
        defender.name, turns
    ));
    true
}

/// Reflect mirrors the part of the hit the defenses stopped; retaliation
/// hits back with the defender's own damage. Either can finish the attacker.
fn punish_attacker(
    arena: &mut BattleArena,
    defender_id: CombatantId,
    attacker_id: CombatantId,
    prevented: Decimal,
    rng: &mut TurnRng,
    messages: &mut Vec<String>,
) {
    if defender_id == attacker_id || !arena.is_alive(attacker_id) {
        return;
    }

    if prevented > Decimal::ZERO {
        if let Some(SkillEffect::Reflect { pct }) =
            find_skill(&arena[defender_id], |e| matches!(e, SkillEffect::Reflect { .. }))
        {
            let reflected = apply_direct_damage(
                arena,
                defender_id,
                attacker_id,
                pct_of(prevented, pct),
                DamageKind::Normal,
                messages,
            );
            if reflected > Decimal::ZERO {
                messages.push(format!(
                    "{} turns {} damage back on {}!",
                    arena[defender_id].name,
                    reflected.round_dp(0),
                    arena[attacker_id].name
                ));
            }
        }
    }

    if !arena.is_alive(defender_id) || !arena.is_alive(attacker_id) {
        return;
    }
    if let Some(SkillEffect::Retaliate { chance, pct }) =
        find_skill(&arena[defender_id], |e| matches!(e, SkillEffect::Retaliate { .. }))
    {
        if rng.roll(chance, "retaliate") {
            let counter = pct_of(arena[defender_id].stats.damage(), pct);
            let dealt = apply_direct_damage(
                arena,
                defender_id,
                attacker_id,
                counter,
                DamageKind::Normal,
                messages,
            );
            messages.push(format!(
                "{} retaliates for {} damage!",
                arena[defender_id].name,
                dealt.round_dp(0)
            ));
        }
    }
}
