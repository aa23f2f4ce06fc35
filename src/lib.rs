// In: src/lib.rs

//! Guardian Battle Engine
//!
//! Turn-based team combat between a party of players and pets and a
//! defending guardian team. Learned skills resolve to effects through a
//! static catalogue; every random decision flows through one `TurnRng`.

// --- MODULE DECLARATIONS ---
pub mod attributes;
pub mod battle;
pub mod combatant;
pub mod config;
pub mod errors;
pub mod modifiers;
pub mod roster;
pub mod skills;

// --- PUBLIC API RE-EXPORTS ---

// --- From the `schema` crate ---
pub use schema::{
    CombatantKind, CombatantRow, CrowdControl, DotKind, Element, Matchup, RevivalKind,
    SkillEffect, TeamSide, TrustLevel, UltimateKind,
};

// --- From this crate's modules (`src/`) ---

// Core battle engine functions and state.
pub use battle::engine::{check_outcome, perform_attack, resolve_round, take_turn, turn_order};
pub use battle::runner::{BattleReport, BattleRunner, CombatantSummary};
pub use battle::state::{BattleArena, BattleEvent, BattleOutcome, BattleState, EventBus, TurnRng};

// Persistence and concurrency helpers for the orchestration layer.
pub use battle::checkpoint::{
    CheckpointKey, CheckpointStore, JsonFileCheckpointStore, MemoryCheckpointStore,
};
pub use battle::locks::PlayerLocks;

// Combatant model.
pub use combatant::{Combatant, CombatantId};
pub use config::BattleConfig;
pub use roster::{build_arena, build_combatant, PetRow};
pub use skills::{apply_skill_effects, lookup_skill};

// Crate-specific error and result types.
pub use errors::{BattleError, BattleResult, CheckpointError, ConfigError, RosterError, RosterResult};
