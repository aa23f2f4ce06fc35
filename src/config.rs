use crate::errors::ConfigError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::warn;

/// Tunables for a single battle. Every field has a default so a partial
/// RON file only needs to name what it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    /// Wall-clock budget for the whole fight.
    pub turn_timeout_secs: u64,
    /// Pause between turns.
    pub turn_delay_ms: u64,
    /// Rounds after which the fight is called a timeout.
    pub max_rounds: u32,
    /// Maximum random bonus on raw damage, as a percent of the damage stat.
    pub damage_variance_pct: u8,
    /// Bonus (or penalty) for elemental advantage (or disadvantage).
    pub element_advantage_pct: u8,
    /// Narration lines kept in the battle log.
    pub log_capacity: usize,
    /// Floor for base damage after armor.
    pub min_damage: Decimal,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            turn_timeout_secs: 300,
            turn_delay_ms: 0,
            max_rounds: 200,
            damage_variance_pct: 10,
            element_advantage_pct: 20,
            log_capacity: 50,
            min_damage: Decimal::ONE,
        }
    }
}

impl BattleConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron(&text)
    }

    /// Like [`BattleConfig::load`], but a missing or malformed file only
    /// costs a warning.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(config) => config,
            Err(e) => {
                warn!("Failed to load config {}, using defaults: {}", path.as_ref().display(), e);
                Self::default()
            }
        }
    }

    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(text)?)
    }

    pub fn turn_timeout(&self) -> Duration {
        Duration::from_secs(self.turn_timeout_secs)
    }

    pub fn turn_delay(&self) -> Duration {
        Duration::from_millis(self.turn_delay_ms)
    }

    /// Deterministic settings for tests: no variance, no pacing.
    pub fn deterministic() -> Self {
        Self {
            damage_variance_pct: 0,
            ..Self::default()
        }
    }
}
