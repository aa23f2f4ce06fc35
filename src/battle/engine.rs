use crate::attributes::Attr;
use crate::battle::resolution::{
    deal_damage, pct_of, resolve_after_hit, resolve_on_attack, resolve_per_turn, AttackRoll,
    DamageKind,
};
use crate::battle::state::{BattleArena, BattleEvent, BattleOutcome, BattleState, EventBus, TurnRng};
use crate::combatant::CombatantId;
use crate::config::BattleConfig;
use rust_decimal::Decimal;
use schema::TeamSide;
use std::time::Instant;
use tracing::debug;

/// Raw damage with variance, the target's armor, and the floored base.
pub fn roll_attack(
    arena: &BattleArena,
    attacker_id: CombatantId,
    target_id: CombatantId,
    rng: &mut TurnRng,
    config: &BattleConfig,
) -> AttackRoll {
    let damage = arena[attacker_id].stats.damage();
    let variance = if config.damage_variance_pct == 0 {
        Decimal::ZERO
    } else {
        pct_of(damage, config.damage_variance_pct) * rng.fraction("damage variance")
    };
    let raw = damage + variance;
    let armor = arena[target_id].stats.armor();
    AttackRoll {
        raw,
        armor,
        base: (raw - armor).max(config.min_damage),
    }
}

/// One full attack: roll, on-attack resolution, the hit itself through the
/// target's defenses, any follow-up strike, and after-hit effects. Returns
/// the total HP the target lost.
pub fn perform_attack(
    arena: &mut BattleArena,
    attacker_id: CombatantId,
    target_id: CombatantId,
    rng: &mut TurnRng,
    config: &BattleConfig,
    bus: &mut EventBus,
) -> Decimal {
    let roll = roll_attack(arena, attacker_id, target_id, rng, config);
    let result = resolve_on_attack(arena, attacker_id, target_id, roll, rng, config);
    bus.narrate(result.messages);

    let mut lines = Vec::new();
    let mut dealt = deal_damage(
        arena,
        attacker_id,
        target_id,
        result.damage,
        DamageKind::Normal,
        rng,
        &mut lines,
    );
    if result.true_damage > Decimal::ZERO {
        dealt += deal_damage(
            arena,
            attacker_id,
            target_id,
            result.true_damage,
            DamageKind::True,
            rng,
            &mut lines,
        );
    }
    bus.push(BattleEvent::Attacked {
        attacker: attacker_id,
        target: target_id,
        damage: dealt,
    });
    bus.narrate(lines);

    if let Some(extra) = result.follow_up {
        if arena.is_alive(target_id) && arena.is_alive(attacker_id) {
            let mut lines = Vec::new();
            let second = deal_damage(arena, attacker_id, target_id, extra, DamageKind::Normal, rng, &mut lines);
            bus.push(BattleEvent::Attacked {
                attacker: attacker_id,
                target: target_id,
                damage: second,
            });
            bus.narrate(lines);
            dealt += second;
        }
    }

    bus.narrate(resolve_after_hit(arena, attacker_id, target_id, dealt, rng));
    dealt
}

/// Living combatants in acting order: first-strikers in roster order, then
/// everyone else shuffled.
pub fn turn_order(arena: &BattleArena, rng: &mut TurnRng) -> Vec<CombatantId> {
    let (mut order, mut rest): (Vec<CombatantId>, Vec<CombatantId>) = arena
        .iter()
        .filter(|c| c.is_alive())
        .map(|c| c.id)
        .partition(|id| arena[*id].attrs.has(Attr::FirstStrike));
    rng.shuffle(&mut rest, "turn order");
    order.append(&mut rest);
    order
}

/// Picks an opposing target. Actors with execute-style skills lean toward
/// wounded targets; everyone else picks uniformly.
pub fn select_target(arena: &BattleArena, actor: CombatantId, rng: &mut TurnRng) -> Option<CombatantId> {
    let enemies = arena.enemies_of(actor);
    if enemies.is_empty() {
        return None;
    }
    let hunts_wounded = arena[actor].skill_effects().any(|e| e.is_execute_style());
    if !hunts_wounded {
        return Some(enemies[rng.index(enemies.len(), "target")]);
    }
    let weights: Vec<Decimal> = enemies
        .iter()
        .map(|id| {
            let enemy = &arena[*id];
            enemy.max_hp().max(Decimal::ONE) / enemy.hp().max(Decimal::ONE)
        })
        .collect();
    rng.weighted_index(&weights, "weighted target")
        .map(|index| enemies[index])
}

/// Victory once every defender is down, defeat once every attacker is.
pub fn check_outcome(arena: &BattleArena) -> BattleOutcome {
    if !arena.side_alive(TeamSide::Defenders) {
        BattleOutcome::Victory
    } else if !arena.side_alive(TeamSide::Attackers) {
        BattleOutcome::Defeat
    } else {
        BattleOutcome::Ongoing
    }
}

/// A single actor's turn. Incapacitated actors lose their action (and any
/// momentum) but still go through end-of-turn bookkeeping.
pub fn take_turn(
    arena: &mut BattleArena,
    actor: CombatantId,
    rng: &mut TurnRng,
    config: &BattleConfig,
    bus: &mut EventBus,
) {
    if !arena.is_alive(actor) {
        return;
    }
    if !arena[actor].can_act() {
        bus.push(BattleEvent::TurnSkipped { actor });
        arena[actor].attrs.remove(Attr::MomentumStacks);
    } else if let Some(target) = select_target(arena, actor, rng) {
        let dealt = perform_attack(arena, actor, target, rng, config, bus);
        debug!(attacker = %arena[actor].name, target = %arena[target].name, %dealt, "turn resolved");
    }
    bus.narrate(resolve_per_turn(arena, actor));
}

/// Plays one round: every living combatant acts once in turn order. The
/// wall-clock deadline is checked before each turn.
pub fn resolve_round(
    state: &mut BattleState,
    rng: &mut TurnRng,
    config: &BattleConfig,
    deadline: Option<Instant>,
) -> EventBus {
    let mut bus = EventBus::new();
    state.round += 1;
    bus.push(BattleEvent::RoundStarted { round: state.round });

    for actor in turn_order(&state.arena, rng) {
        if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            state.outcome = BattleOutcome::Timeout;
            break;
        }
        let alive_before: Vec<bool> = state.arena.iter().map(|c| c.is_alive()).collect();

        take_turn(&mut state.arena, actor, rng, config, &mut bus);

        for (combatant, was_alive) in state.arena.iter().zip(alive_before) {
            if was_alive && !combatant.is_alive() {
                bus.push(BattleEvent::CombatantDefeated {
                    combatant: combatant.id,
                });
            }
        }

        let outcome = check_outcome(&state.arena);
        if outcome != BattleOutcome::Ongoing {
            state.outcome = outcome;
            break;
        }
    }

    if state.outcome == BattleOutcome::Ongoing && state.round >= config.max_rounds {
        state.outcome = BattleOutcome::Timeout;
    }
    if state.outcome != BattleOutcome::Ongoing {
        bus.push(BattleEvent::BattleEnded {
            outcome: state.outcome,
        });
    }
    bus.push(BattleEvent::RoundEnded);
    state.record(&bus);
    bus
}
