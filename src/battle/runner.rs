use crate::battle::checkpoint::{CheckpointKey, CheckpointStore};
use crate::battle::engine::resolve_round;
use crate::battle::state::{BattleArena, BattleOutcome, BattleState, EventBus, TurnRng};
use crate::combatant::CombatantId;
use crate::config::BattleConfig;
use rust_decimal::Decimal;
use schema::{CombatantKind, TeamSide};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Final numbers for one combatant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombatantSummary {
    pub key: String,
    pub name: String,
    pub kind: CombatantKind,
    pub side: TeamSide,
    pub hp: Decimal,
    pub max_hp: Decimal,
    pub kills: u32,
}

/// Everything the orchestration layer needs once a battle is over.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BattleReport {
    pub battle_id: String,
    pub outcome: BattleOutcome,
    pub rounds: u32,
    pub narration: Vec<String>,
    pub combatants: Vec<CombatantSummary>,
}

impl BattleReport {
    /// Opponents defeated by everyone on `side`.
    pub fn kills_for(&self, side: TeamSide) -> u32 {
        self.combatants
            .iter()
            .filter(|c| c.side == side)
            .map(|c| c.kills)
            .sum()
    }

    pub fn final_hp(&self, key: &str) -> Option<Decimal> {
        self.combatants.iter().find(|c| c.key == key).map(|c| c.hp)
    }
}

struct CheckpointBinding {
    store: Arc<dyn CheckpointStore>,
    key: CheckpointKey,
}

/// Drives a battle from setup to a terminal outcome, pausing between rounds.
pub struct BattleRunner {
    state: BattleState,
    config: BattleConfig,
    rng: TurnRng,
    checkpoint: Option<CheckpointBinding>,
}

impl BattleRunner {
    pub fn new(battle_id: impl Into<String>, arena: BattleArena, config: BattleConfig) -> Self {
        let state = BattleState::new(battle_id, arena, config.log_capacity);
        Self {
            state,
            config,
            rng: TurnRng::new_random(),
            checkpoint: None,
        }
    }

    pub fn with_rng(mut self, rng: TurnRng) -> Self {
        self.rng = rng;
        self
    }

    /// Persist the guardian's HP under `key` between sessions.
    pub fn with_checkpoint(mut self, store: Arc<dyn CheckpointStore>, key: CheckpointKey) -> Self {
        self.checkpoint = Some(CheckpointBinding { store, key });
        self
    }

    pub fn state(&self) -> &BattleState {
        &self.state
    }

    pub fn is_battle_ended(&self) -> bool {
        self.state.outcome != BattleOutcome::Ongoing
    }

    /// Plays one round synchronously.
    pub fn step(&mut self, deadline: Option<Instant>) -> EventBus {
        resolve_round(&mut self.state, &mut self.rng, &self.config, deadline)
    }

    /// Runs until victory, defeat or timeout and returns the report.
    #[tracing::instrument(skip(self), fields(battle_id = %self.state.battle_id))]
    pub async fn run(mut self) -> BattleReport {
        self.restore_checkpoint();
        info!(
            combatants = self.state.arena.len(),
            "battle started"
        );

        let deadline = Instant::now() + self.config.turn_timeout();
        let delay = self.config.turn_delay();
        while !self.is_battle_ended() {
            self.step(Some(deadline));
            self.persist_checkpoint();
            if self.is_battle_ended() {
                break;
            }
            if delay.is_zero() {
                tokio::task::yield_now().await;
            } else {
                tokio::time::sleep(delay).await;
            }
        }

        info!(
            outcome = %self.state.outcome,
            rounds = self.state.round,
            "battle finished"
        );
        self.report()
    }

    pub fn report(&self) -> BattleReport {
        BattleReport {
            battle_id: self.state.battle_id.clone(),
            outcome: self.state.outcome,
            rounds: self.state.round,
            narration: self.state.log.to_vec(),
            combatants: self
                .state
                .arena
                .iter()
                .map(|c| CombatantSummary {
                    key: c.key.clone(),
                    name: c.name.clone(),
                    kind: c.kind,
                    side: c.side,
                    hp: c.hp(),
                    max_hp: c.max_hp(),
                    kills: c.kills,
                })
                .collect(),
        }
    }

    fn guardian(&self) -> Option<CombatantId> {
        self.state
            .arena
            .iter()
            .find(|c| c.kind == CombatantKind::Guardian && c.side == TeamSide::Defenders)
            .map(|c| c.id)
    }

    fn restore_checkpoint(&mut self) {
        let (Some(binding), Some(guardian)) = (&self.checkpoint, self.guardian()) else {
            return;
        };
        match binding.store.load(&binding.key) {
            Ok(Some(hp)) => {
                let guardian = &mut self.state.arena[guardian];
                guardian.set_hp(hp);
                info!(guardian = %guardian.name, hp = %guardian.hp(), key = %binding.key, "resumed guardian HP");
            }
            Ok(None) => {}
            Err(e) => warn!("Failed to load checkpoint {}: {}", binding.key, e),
        }
    }

    /// Runs after every round. A fallen guardian's checkpoint is cleared so
    /// the next fight starts fresh.
    fn persist_checkpoint(&self) {
        let (Some(binding), Some(guardian)) = (&self.checkpoint, self.guardian()) else {
            return;
        };
        let guardian = &self.state.arena[guardian];
        let result = if guardian.is_alive() {
            binding.store.save(&binding.key, guardian.hp())
        } else {
            binding.store.clear(&binding.key)
        };
        if let Err(e) = result {
            warn!("Failed to persist checkpoint {}: {}", binding.key, e);
        }
    }
}
