use super::{apply_heal, apply_hp_damage, has_dot_immunity, pct_of, record_kill, DamageKind};
use crate::attributes::Attr;
use crate::battle::state::BattleArena;
use crate::battle::status_effects::{EffectTag, StatusEffect, StatusKind};
use crate::combatant::{CombatantId, LearnedSkill};
use crate::modifiers::{ModifierSource, Stat};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use schema::SkillEffect;
use tracing::debug;

/// End-of-turn bookkeeping for one combatant: durations, damage and healing
/// over time, periodic skills, ultimate arming, and per-turn flag resets.
pub fn resolve_per_turn(arena: &mut BattleArena, combatant_id: CombatantId) -> Vec<String> {
    let mut messages = Vec::new();
    let Some(combatant) = arena.get(combatant_id) else {
        return messages;
    };
    if !combatant.is_alive() {
        return messages;
    }

    expire_durations(arena, combatant_id, &mut messages);
    tick_status_effects(arena, combatant_id, &mut messages);

    if arena.is_alive(combatant_id) {
        apply_periodic_skills(arena, combatant_id, &mut messages);
        arm_ultimate(arena, combatant_id, &mut messages);
    }

    let combatant = &mut arena[combatant_id];
    combatant.attrs.remove(Attr::AttackedThisTurn);
    combatant.attrs.remove(Attr::KilledEnemyThisTurn);
    combatant.attrs.add(Attr::TurnCounter, Decimal::ONE);
    messages
}

fn expire_durations(arena: &mut BattleArena, id: CombatantId, messages: &mut Vec<String>) {
    let combatant = &mut arena[id];
    for attr in combatant.attrs.tick_durations() {
        match attr {
            Attr::RallyDuration => {
                combatant.stats.remove(ModifierSource::TeamRally, Stat::Damage);
                messages.push(format!("{}'s rally fades.", combatant.name));
            }
            Attr::EvasionDuration => {
                combatant.attrs.remove(Attr::EvasionBonus);
                messages.push(format!("The winds around {} settle.", combatant.name));
            }
            Attr::InvincibleDuration => {
                messages.push(format!("{} is no longer invincible.", combatant.name));
            }
            Attr::HealBlockDuration => {
                messages.push(format!("{} can be healed again.", combatant.name));
            }
            _ => {}
        }
    }
}

/// DoT and regeneration ticks, then duration ticks on every attached effect.
fn tick_status_effects(arena: &mut BattleArena, id: CombatantId, messages: &mut Vec<String>) {
    let combatant = &mut arena[id];
    let immune = has_dot_immunity(combatant);
    let ticks: Vec<StatusKind> = combatant
        .status_effects
        .iter()
        .map(|effect| effect.kind.clone())
        .collect();

    for kind in ticks {
        if !combatant.is_alive() {
            break;
        }
        match kind {
            StatusKind::DamageOverTime { kind, per_turn } => {
                if immune {
                    messages.push(format!("{} is immune to {}.", combatant.name, kind));
                    continue;
                }
                let lost = apply_hp_damage(combatant, per_turn, DamageKind::Normal, messages);
                messages.push(format!(
                    "{} takes {} damage from {}.",
                    combatant.name,
                    lost.round_dp(0),
                    kind
                ));
            }
            StatusKind::Regeneration { per_turn } => {
                let healed = apply_heal(combatant, per_turn);
                if healed > Decimal::ZERO {
                    messages.push(format!("{} regenerates {} HP.", combatant.name, healed.round_dp(0)));
                }
            }
            _ => {}
        }
    }

    if immune {
        combatant.remove_effects_by_tag(EffectTag::DamageOverTime);
    }
    let mut notices = combatant.process_status_effects();
    messages.append(&mut notices);
}

fn on_cadence(turn: Decimal, every: u32) -> bool {
    every > 0 && turn.to_u32().is_some_and(|turn| turn % every == 0)
}

fn apply_periodic_skills(arena: &mut BattleArena, id: CombatantId, messages: &mut Vec<String>) {
    let learned: Vec<LearnedSkill> = arena[id].skills.clone();
    let turn = arena[id].attrs.get_or_zero(Attr::TurnCounter) + Decimal::ONE;
    let name = arena[id].name.clone();

    for skill in &learned {
        match skill.effect {
            SkillEffect::Regeneration { pct } => {
                let combatant = &mut arena[id];
                let amount = pct_of(combatant.max_hp(), pct);
                let healed = apply_heal(combatant, amount);
                if healed > Decimal::ZERO {
                    messages.push(format!("{}'s {} restores {} HP.", name, skill.name, healed.round_dp(0)));
                }
            }
            SkillEffect::TeamHeal { pct } => {
                let mut total = Decimal::ZERO;
                for ally in arena.team_of(id) {
                    let ally = &mut arena[ally];
                    let amount = pct_of(ally.max_hp(), pct);
                    total += apply_heal(ally, amount);
                }
                if total > Decimal::ZERO {
                    messages.push(format!("{}'s {} heals the team for {} HP.", name, skill.name, total.round_dp(0)));
                }
            }
            SkillEffect::PeriodicShield { pct, every } => {
                if on_cadence(turn, every) {
                    let combatant = &mut arena[id];
                    let amount = pct_of(combatant.max_hp(), pct);
                    combatant.attrs.add(Attr::Shield, amount);
                    messages.push(format!("{}'s {} grants a {} point shield.", name, skill.name, amount.round_dp(0)));
                }
            }
            SkillEffect::Cleanse { every } => {
                if on_cadence(turn, every) {
                    let removed = arena[id].remove_effects_by_tag(EffectTag::Debuff);
                    if !removed.is_empty() {
                        messages.push(format!("{}'s {} washes away {} affliction(s).", name, skill.name, removed.len()));
                    }
                }
            }
            SkillEffect::Growth { pct, max_stacks } => {
                let combatant = &mut arena[id];
                let stacks = (combatant.attrs.get_or_zero(Attr::GrowthStacks) + Decimal::ONE)
                    .min(Decimal::from(max_stacks));
                combatant.attrs.set(Attr::GrowthStacks, stacks);
                combatant
                    .stats
                    .apply_pct(ModifierSource::Growth, Stat::Damage, Decimal::from(pct) * stacks);
            }
            SkillEffect::AuraDamage { pct } => {
                let cap = arena[id].stats.damage();
                for enemy in arena.enemies_of(id) {
                    if has_dot_immunity(&arena[enemy]) {
                        continue;
                    }
                    let target = &mut arena[enemy];
                    let amount = pct_of(target.max_hp(), pct).min(cap);
                    let lost = apply_hp_damage(target, amount, DamageKind::Normal, messages);
                    let died = !target.is_alive();
                    if lost > Decimal::ZERO {
                        messages.push(format!("{}'s {} sears {} for {} damage.", name, skill.name, target.name, lost.round_dp(0)));
                    }
                    if died {
                        record_kill(arena, id, enemy);
                    }
                }
            }
            SkillEffect::SoulHarvest { heal_pct, bloodlust_pct } => {
                let combatant = &mut arena[id];
                if combatant.attrs.has(Attr::KilledEnemyThisTurn) {
                    let amount = pct_of(combatant.max_hp(), heal_pct);
                    apply_heal(combatant, amount);
                    combatant.add_status_effect(StatusEffect::bloodlust(Decimal::from(bloodlust_pct)));
                    let souls = combatant.attrs.add(Attr::SoulStacks, Decimal::ONE);
                    messages.push(format!("{} harvests a soul ({} collected).", name, souls));
                }
            }
            _ => {}
        }
    }
}

/// Arms the ultimate the first time HP drops under the threshold. Never
/// re-arms within a battle.
fn arm_ultimate(arena: &mut BattleArena, id: CombatantId, messages: &mut Vec<String>) {
    let combatant = &mut arena[id];
    let Some(threshold) = combatant.attrs.get(Attr::UltimateThreshold) else {
        return;
    };
    if combatant.attrs.has(Attr::UltimateActivated) || combatant.hp_ratio() >= threshold {
        return;
    }
    combatant.attrs.set_flag(Attr::UltimateReady);
    combatant.attrs.set_flag(Attr::UltimateActivated);
    debug!(combatant = %combatant.name, "ultimate armed");
    messages.push(format!("{}'s power surges! Their ultimate is ready.", combatant.name));
}
