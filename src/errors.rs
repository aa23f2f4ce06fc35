use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the guardian battle engine.
///
/// Resolution passes never fail; errors only come out of the boundaries
/// where data enters or leaves a battle.
#[derive(Debug, Error)]
pub enum BattleError {
    #[error("roster error: {0}")]
    Roster(#[from] RosterError),
    #[error("checkpoint error: {0}")]
    Checkpoint(#[from] CheckpointError),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors raised while turning stat rows into combatants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    #[error("roster has no combatants on the {0} side")]
    EmptySide(&'static str),
    #[error("duplicate combatant id '{0}'")]
    DuplicateId(String),
    #[error("combatant '{id}' has max_hp {max_hp}, which must be positive")]
    InvalidMaxHp { id: String, max_hp: String },
}

/// Errors from reading or writing guardian HP checkpoints.
#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("failed to access checkpoint file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed checkpoint data: {0}")]
    Codec(#[from] serde_json::Error),
    #[error("checkpoint store lock poisoned")]
    Poisoned,
}

/// Errors from loading a battle configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

/// Convenience type alias for Results at the engine boundary.
pub type BattleResult<T> = Result<T, BattleError>;

/// Convenience type alias for roster building.
pub type RosterResult<T> = Result<T, RosterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_error_converts_into_battle_error() {
        let err: BattleError = RosterError::DuplicateId("p1".to_string()).into();
        assert!(matches!(err, BattleError::Roster(RosterError::DuplicateId(_))));
        assert_eq!(err.to_string(), "roster error: duplicate combatant id 'p1'");
    }

    #[test]
    fn test_empty_side_message() {
        let err = RosterError::EmptySide("defender");
        assert_eq!(err.to_string(), "roster has no combatants on the defender side");
    }
}
