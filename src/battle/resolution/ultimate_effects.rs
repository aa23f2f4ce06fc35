use super::{apply_heal, deal_damage, has_dot_immunity, pct_of, AttackRoll, DamageKind};
use crate::attributes::Attr;
use crate::battle::state::{BattleArena, TurnRng};
use crate::battle::status_effects::{EffectTag, StatusEffect};
use crate::combatant::CombatantId;
use rust_decimal::Decimal;
use schema::{CrowdControl, DotKind, UltimateKind};
use tracing::info;

/// Fires a consumed ultimate. Adjusts the main hit in place and applies the
/// ultimate's side effects to the rest of the field.
#[allow(clippy::too_many_arguments)]
pub(super) fn unleash_ultimate(
    kind: UltimateKind,
    arena: &mut BattleArena,
    attacker_id: CombatantId,
    target_id: CombatantId,
    roll: &AttackRoll,
    damage: &mut Decimal,
    true_damage: &mut Decimal,
    rng: &mut TurnRng,
    messages: &mut Vec<String>,
) {
    let attacker_name = arena[attacker_id].name.clone();
    info!(attacker = %attacker_name, %kind, "ultimate unleashed");
    messages.push(format!("{} unleashes their ultimate: {}!", attacker_name, kind));

    let other_enemies = arena.allies_of(target_id);
    match kind {
        UltimateKind::InfernoApocalypse => {
            *damage *= Decimal::TWO;
            let blast = pct_of(*damage, 50);
            for enemy in &other_enemies {
                deal_damage(arena, attacker_id, *enemy, blast, DamageKind::Normal, rng, messages);
            }
            let burn = arena[attacker_id].stats.damage() / Decimal::TEN;
            for enemy in std::iter::once(target_id).chain(other_enemies) {
                let enemy = &mut arena[enemy];
                if enemy.is_alive() && !has_dot_immunity(enemy) {
                    enemy.add_status_effect(StatusEffect::damage_over_time(DotKind::Burn, burn, 3));
                }
            }
            messages.push("The battlefield is engulfed in flames!".to_string());
        }
        UltimateKind::Tsunami => {
            *damage = pct_of(*damage, 150);
            for enemy in &other_enemies {
                deal_damage(arena, attacker_id, *enemy, *damage, DamageKind::Normal, rng, messages);
            }
            for ally in arena.team_of(attacker_id) {
                let ally = &mut arena[ally];
                let amount = pct_of(ally.max_hp(), 15);
                apply_heal(ally, amount);
            }
            messages.push("A great wave crashes down, then washes over allies with healing waters.".to_string());
        }
        UltimateKind::ThunderStormLord => {
            let arc = pct_of(*damage, 75);
            for enemy in &other_enemies {
                deal_damage(arena, attacker_id, *enemy, arc, DamageKind::Normal, rng, messages);
            }
            for enemy in std::iter::once(target_id).chain(other_enemies) {
                let enemy = &mut arena[enemy];
                if enemy.is_alive() {
                    enemy.add_status_effect(StatusEffect::crowd_control(CrowdControl::Paralyze, 1));
                }
            }
            messages.push("Lightning arcs across every foe, leaving them paralyzed!".to_string());
        }
        UltimateKind::TempestStormLord => {
            *damage = pct_of(*damage, 150);
            for ally in arena.team_of(attacker_id) {
                arena[ally].add_status_effect(StatusEffect::empowered(Decimal::from(25), 3));
            }
            let attacker = &mut arena[attacker_id];
            attacker.attrs.set(Attr::EvasionBonus, Decimal::from(25));
            attacker.attrs.set(Attr::EvasionDuration, Decimal::from(3));
            messages.push("A howling tempest lifts the party on its winds!".to_string());
        }
        UltimateKind::GaiasWrath => {
            *damage *= Decimal::TWO;
            arena[target_id].add_status_effect(StatusEffect::crowd_control(CrowdControl::Root, 2));
            for ally in arena.team_of(attacker_id) {
                let ally = &mut arena[ally];
                let per_turn = pct_of(ally.max_hp(), 5);
                ally.add_status_effect(StatusEffect::regeneration(per_turn, 3));
            }
            messages.push("Roots erupt from the earth as nature mends the party.".to_string());
        }
        UltimateKind::DivineJudgment => {
            *true_damage += pct_of(roll.raw, 250);
            *damage = Decimal::ZERO;
            for ally in arena.team_of(attacker_id) {
                arena[ally].remove_effects_by_tag(EffectTag::Debuff);
            }
            messages.push("Holy judgment descends, purging the party of every affliction!".to_string());
        }
        UltimateKind::EternalNight => {
            *damage *= Decimal::TWO;
            let drained = {
                let attacker = &mut arena[attacker_id];
                apply_heal(attacker, pct_of(*damage, 50))
            };
            for enemy in std::iter::once(target_id).chain(other_enemies) {
                let enemy = &mut arena[enemy];
                if enemy.is_alive() {
                    enemy.add_status_effect(StatusEffect::weakened(Decimal::from(30), 2));
                }
            }
            messages.push(format!(
                "Darkness falls. {} drinks {} HP from the night.",
                attacker_name,
                drained.round_dp(0)
            ));
        }
        UltimateKind::VoidAnnihilation => {
            let target = &mut arena[target_id];
            *true_damage += pct_of(target.hp(), 25);
            let remaining = target.attrs.get_or_zero(Attr::HealBlockDuration);
            target
                .attrs
                .set(Attr::HealBlockDuration, remaining.max(Decimal::from(3)));
            messages.push(format!("The void tears at {}'s very existence!", target.name));
        }
    }
}
