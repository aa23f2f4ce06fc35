use super::ultimate_effects::unleash_ultimate;
use super::{
    apply_heal, deal_damage, find_skill, has_dot_immunity, multiplier, pct_of, AttackResult,
    AttackRoll, DamageKind,
};
use crate::attributes::Attr;
use crate::battle::state::{BattleArena, TurnRng};
use crate::battle::status_effects::{EffectTag, StatusEffect};
use crate::combatant::{Combatant, CombatantId, LearnedSkill};
use crate::config::BattleConfig;
use crate::modifiers::{ModifierSource, Stat};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use schema::{Element, Matchup, ResolutionPass, SkillEffect};
use tracing::debug;

/// Shapes one attack from `attacker_id` on `target_id`.
///
/// Must be called exactly once per attack action: skill cooldowns tick here,
/// and effects left by earlier attacks settle.
/// Order is fixed: cooldowns, armor pierce, procs, conditional bonuses,
/// status modifiers, true-damage split, on-hit debuffs and team buffs,
/// ultimate, then splash, chains and the double-strike follow-up.
pub fn resolve_on_attack(
    arena: &mut BattleArena,
    attacker_id: CombatantId,
    target_id: CombatantId,
    roll: AttackRoll,
    rng: &mut TurnRng,
    config: &BattleConfig,
) -> AttackResult {
    let mut result = AttackResult {
        damage: Decimal::ZERO,
        true_damage: Decimal::ZERO,
        follow_up: None,
        messages: Vec::new(),
    };
    if !arena.is_alive(attacker_id) || !arena.is_alive(target_id) {
        return result;
    }

    for combatant in arena.iter_mut() {
        combatant.settle_status_effects();
    }

    let attack_count = {
        let attacker = &mut arena[attacker_id];
        tick_cooldowns(attacker);
        attacker.attrs.set_flag(Attr::AttackedThisTurn);
        attacker.attrs.add(Attr::AttackCounter, Decimal::ONE)
    };
    let learned = arena[attacker_id].skills_for(ResolutionPass::OnAttack);
    let attacker_name = arena[attacker_id].name.clone();
    let messages = &mut result.messages;

    // Armor pierce
    let mut armor = roll.armor;
    let mut damage = roll.base;
    if let Some(SkillEffect::ArmorPierce { pct }) =
        find_skill(&arena[attacker_id], |e| matches!(e, SkillEffect::ArmorPierce { .. }))
    {
        armor -= pct_of(armor, pct);
        damage = (roll.raw - armor).max(config.min_damage);
    }

    // Procs
    let mut area_strike = false;
    for skill in &learned {
        match skill.effect {
            SkillEffect::ProcBonus { chance, multiplier_pct } => {
                if rng.roll(chance, skill.name) {
                    damage *= multiplier(multiplier_pct);
                    messages.push(format!("{}'s {} activates!", attacker_name, skill.name));
                }
            }
            SkillEffect::CriticalStrike { multiplier_pct } => {
                let chance = arena[attacker_id]
                    .stats
                    .luck()
                    .min(Decimal::ONE_HUNDRED)
                    .to_u8()
                    .unwrap_or(0);
                if rng.roll(chance, skill.name) {
                    damage *= multiplier(multiplier_pct);
                    messages.push(format!("{} lands a critical hit!", attacker_name));
                }
            }
            SkillEffect::VolatileStrike { min_pct, max_pct } => {
                let span = Decimal::from(max_pct.saturating_sub(min_pct));
                let pct = Decimal::from(min_pct) + rng.fraction(skill.name) * span;
                damage = pct_of(damage, pct);
                messages.push(format!(
                    "{}'s {} surges unpredictably ({}% power)!",
                    attacker_name,
                    skill.name,
                    pct.round_dp(0)
                ));
            }
            SkillEffect::Overcharge { every, multiplier_pct } => {
                let count = attack_count.to_u32().unwrap_or(0);
                if every > 0 && count % every == 0 {
                    damage *= multiplier(multiplier_pct);
                    messages.push(format!("{} releases an overcharged blast!", attacker_name));
                }
            }
            SkillEffect::CooldownStrike { chance, multiplier_pct, cooldown, area } => {
                let key = Attr::Cooldown(skill.name);
                if !arena[attacker_id].attrs.has(key) && rng.roll(chance, skill.name) {
                    damage *= multiplier(multiplier_pct);
                    arena[attacker_id].attrs.set(key, Decimal::from(cooldown));
                    area_strike |= area;
                    messages.push(format!("{} unleashes {}!", attacker_name, skill.name));
                }
            }
            _ => {}
        }
    }

    // Conditional bonuses
    let attacker_ratio = arena[attacker_id].hp_ratio();
    let target_ratio = arena[target_id].hp_ratio();
    let matchup = Element::matchup(arena[attacker_id].element, arena[target_id].element);
    let owner_alive = arena
        .owner_of(attacker_id)
        .is_some_and(|owner| arena.is_alive(owner));
    for skill in &learned {
        match skill.effect {
            SkillEffect::LowHpFury { threshold_pct, bonus_pct } => {
                if attacker_ratio < ratio(threshold_pct) {
                    damage += pct_of(damage, bonus_pct);
                    messages.push(format!("{}'s {} burns hotter as their wounds deepen!", attacker_name, skill.name));
                }
            }
            SkillEffect::Execute { threshold_pct, multiplier_pct } => {
                if target_ratio < ratio(threshold_pct) {
                    damage *= multiplier(multiplier_pct);
                    messages.push(format!("{} goes for the kill with {}!", attacker_name, skill.name));
                }
            }
            SkillEffect::ElementalMastery { bonus_pct } => {
                if matchup == Matchup::Advantage {
                    damage += pct_of(damage, bonus_pct);
                }
            }
            SkillEffect::OwnerBond { bonus_pct } => {
                if owner_alive {
                    damage += pct_of(damage, bonus_pct);
                }
            }
            SkillEffect::Momentum { stack_pct, max_stacks } => {
                let attrs = &mut arena[attacker_id].attrs;
                let stacks = attrs.get_or_zero(Attr::MomentumStacks);
                damage += pct_of(damage, Decimal::from(stack_pct) * stacks);
                attrs.set(
                    Attr::MomentumStacks,
                    (stacks + Decimal::ONE).min(Decimal::from(max_stacks)),
                );
            }
            _ => {}
        }
    }
    match matchup {
        Matchup::Advantage => {
            damage += pct_of(damage, config.element_advantage_pct);
            messages.push(format!(
                "{}'s {} power overwhelms {}!",
                attacker_name, arena[attacker_id].element, arena[target_id].name
            ));
        }
        Matchup::Disadvantage => damage -= pct_of(damage, config.element_advantage_pct),
        Matchup::Neutral => {}
    }

    // Status modifiers and on-attack hooks
    damage = arena[attacker_id].get_outgoing_damage(damage, &arena[target_id]);
    let mut lines = arena[attacker_id].on_attack();
    messages.append(&mut lines);

    // True-damage split
    let mut true_damage = Decimal::ZERO;
    if let Some(SkillEffect::TrueDamageSplit { chance, true_pct }) =
        find_skill(&arena[attacker_id], |e| matches!(e, SkillEffect::TrueDamageSplit { .. }))
    {
        if rng.roll(chance, "true damage split") {
            let factor = if roll.base > Decimal::ZERO {
                damage / roll.base
            } else {
                Decimal::ONE
            };
            let scaled = roll.raw * factor;
            true_damage = pct_of(scaled, true_pct);
            damage = (scaled - true_damage - armor).max(Decimal::ZERO);
            messages.push(format!("{} strikes from the shadows, piercing all defenses!", attacker_name));
        }
    }

    apply_on_hit_effects(arena, attacker_id, target_id, &learned, rng, messages);

    // Ultimate
    if arena[attacker_id].attrs.remove(Attr::UltimateReady).is_some() {
        if let Some(SkillEffect::Ultimate { kind, .. }) =
            find_skill(&arena[attacker_id], |e| matches!(e, SkillEffect::Ultimate { .. }))
        {
            unleash_ultimate(
                kind,
                arena,
                attacker_id,
                target_id,
                &roll,
                &mut damage,
                &mut true_damage,
                rng,
                messages,
            );
        }
    }

    // Follow-up hits on the target's team
    for skill in &learned {
        match skill.effect {
            SkillEffect::Splash { pct } => {
                let splash = pct_of(damage, pct);
                for mate in arena.allies_of(target_id) {
                    let dealt = deal_damage(arena, attacker_id, mate, splash, DamageKind::Normal, rng, messages);
                    if dealt > Decimal::ZERO {
                        messages.push(format!(
                            "{} splashes onto {} for {} damage.",
                            skill.name,
                            arena[mate].name,
                            dealt.round_dp(0)
                        ));
                    }
                }
            }
            SkillEffect::ChainAttack { chance, hops, falloff_pct } => {
                if rng.roll(chance, skill.name) {
                    chain(arena, attacker_id, target_id, damage, hops, falloff_pct, skill.name, rng, messages);
                }
            }
            _ => {}
        }
    }
    if area_strike {
        for enemy in arena.allies_of(target_id) {
            let dealt = deal_damage(arena, attacker_id, enemy, damage, DamageKind::Normal, rng, messages);
            messages.push(format!("The storm tears into {} for {} damage.", arena[enemy].name, dealt.round_dp(0)));
        }
    }

    if let Some(SkillEffect::DoubleStrike { chance }) =
        find_skill(&arena[attacker_id], |e| matches!(e, SkillEffect::DoubleStrike { .. }))
    {
        if rng.roll(chance, "double strike") {
            result.follow_up = Some(damage);
            messages.push(format!("{} strikes again!", attacker_name));
        }
    }

    debug!(attacker = %attacker_name, %damage, %true_damage, "attack resolved");
    result.damage = damage.max(Decimal::ZERO);
    result.true_damage = true_damage.max(Decimal::ZERO);
    result
}

/// Effects that depend on how much damage actually landed.
pub fn resolve_after_hit(
    arena: &mut BattleArena,
    attacker_id: CombatantId,
    target_id: CombatantId,
    dealt: Decimal,
    rng: &mut TurnRng,
) -> Vec<String> {
    let mut messages = Vec::new();
    if !arena.is_alive(attacker_id) {
        return messages;
    }

    if let Some(SkillEffect::LifeSteal { pct }) =
        find_skill(&arena[attacker_id], |e| matches!(e, SkillEffect::LifeSteal { .. }))
    {
        let attacker = &mut arena[attacker_id];
        let healed = apply_heal(attacker, pct_of(dealt, pct));
        if healed > Decimal::ZERO {
            messages.push(format!("{} drains {} HP.", attacker.name, healed.round_dp(0)));
        }
    }

    if let Some(SkillEffect::Contagion { chance }) =
        find_skill(&arena[attacker_id], |e| matches!(e, SkillEffect::Contagion { .. }))
    {
        let dots: Vec<StatusEffect> = arena[target_id]
            .status_effects
            .iter()
            .filter(|effect| effect.has_tag(EffectTag::DamageOverTime))
            .cloned()
            .collect();
        let candidates: Vec<CombatantId> = arena
            .allies_of(target_id)
            .into_iter()
            .filter(|id| !has_dot_immunity(&arena[*id]))
            .collect();
        if !dots.is_empty() && !candidates.is_empty() && rng.roll(chance, "contagion") {
            let victim = candidates[rng.index(candidates.len(), "contagion victim")];
            for dot in dots {
                arena[victim].add_status_effect(dot);
            }
            messages.push(format!(
                "The plague spreads from {} to {}!",
                arena[target_id].name, arena[victim].name
            ));
        }
    }

    messages
}

fn ratio(pct: u8) -> Decimal {
    Decimal::from(pct) / Decimal::ONE_HUNDRED
}

fn tick_cooldowns(attacker: &mut Combatant) {
    let cooling: Vec<Attr> = attacker
        .attrs
        .iter()
        .filter(|(attr, _)| matches!(attr, Attr::Cooldown(_)))
        .map(|(attr, _)| *attr)
        .collect();
    for attr in cooling {
        attacker.attrs.add(attr, -Decimal::ONE);
    }
}

fn apply_on_hit_effects(
    arena: &mut BattleArena,
    attacker_id: CombatantId,
    target_id: CombatantId,
    learned: &[LearnedSkill],
    rng: &mut TurnRng,
    messages: &mut Vec<String>,
) {
    let attacker_name = arena[attacker_id].name.clone();
    let attacker_damage = arena[attacker_id].stats.damage();

    for skill in learned {
        match skill.effect {
            SkillEffect::ApplyDot { kind, chance, pct_max_hp, turns } => {
                if has_dot_immunity(&arena[target_id]) || !rng.roll(chance, skill.name) {
                    continue;
                }
                let target = &mut arena[target_id];
                let per_turn = pct_of(target.max_hp(), pct_max_hp).min(attacker_damage);
                target.add_status_effect(StatusEffect::damage_over_time(kind, per_turn, turns));
                messages.push(format!("{} is afflicted with {}!", target.name, kind));
            }
            SkillEffect::CrowdControl { kind, chance, turns } => {
                if rng.roll(chance, skill.name) {
                    let target = &mut arena[target_id];
                    let effect = StatusEffect::crowd_control(kind, turns);
                    let label = effect.name();
                    target.add_status_effect(effect);
                    messages.push(format!("{}'s {} inflicts {} on {}!", attacker_name, skill.name, label, target.name));
                }
            }
            SkillEffect::ArmorShred { chance, pct, turns } => {
                if rng.roll(chance, skill.name) {
                    let target = &mut arena[target_id];
                    target.add_status_effect(StatusEffect::armor_break(Decimal::from(pct), turns));
                    messages.push(format!("{}'s armor is shredded!", target.name));
                }
            }
            SkillEffect::Weaken { chance, pct, turns } => {
                if rng.roll(chance, skill.name) {
                    let target = &mut arena[target_id];
                    target.add_status_effect(StatusEffect::weakened(Decimal::from(pct), turns));
                    messages.push(format!("{} is weakened by {}!", target.name, skill.name));
                }
            }
            SkillEffect::HealBlock { chance, turns } => {
                if rng.roll(chance, skill.name) {
                    let target = &mut arena[target_id];
                    let remaining = target.attrs.get_or_zero(Attr::HealBlockDuration);
                    target
                        .attrs
                        .set(Attr::HealBlockDuration, remaining.max(Decimal::from(turns)));
                    messages.push(format!("{} can no longer be healed!", target.name));
                }
            }
            SkillEffect::Purge { chance } => {
                if rng.roll(chance, skill.name) {
                    let target = &mut arena[target_id];
                    let removed = target.remove_effects_by_tag(EffectTag::Buff);
                    let had_shield = target.attrs.remove(Attr::Shield).is_some();
                    if !removed.is_empty() || had_shield {
                        messages.push(format!("{} strips {}'s protections away!", skill.name, target.name));
                    }
                }
            }
            SkillEffect::TeamRally { chance, pct, turns } => {
                if rng.roll(chance, skill.name) {
                    for ally in arena.team_of(attacker_id) {
                        let ally = &mut arena[ally];
                        ally.stats
                            .apply_pct(ModifierSource::TeamRally, Stat::Damage, Decimal::from(pct));
                        ally.attrs.set(Attr::RallyDuration, Decimal::from(turns));
                    }
                    messages.push(format!("{}'s {} rallies the team!", attacker_name, skill.name));
                }
            }
            _ => {}
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn chain(
    arena: &mut BattleArena,
    attacker_id: CombatantId,
    target_id: CombatantId,
    damage: Decimal,
    hops: u8,
    falloff_pct: u8,
    skill_name: &str,
    rng: &mut TurnRng,
    messages: &mut Vec<String>,
) {
    let mut pool = arena.allies_of(target_id);
    let mut hop_damage = damage;
    for _ in 0..hops {
        if pool.is_empty() {
            break;
        }
        let next = pool.remove(rng.index(pool.len(), "chain hop"));
        hop_damage = pct_of(hop_damage, falloff_pct);
        let dealt = deal_damage(arena, attacker_id, next, hop_damage, DamageKind::Normal, rng, messages);
        messages.push(format!(
            "{} jumps to {} for {} damage!",
            skill_name,
            arena[next].name,
            dealt.round_dp(0)
        ));
    }
}
