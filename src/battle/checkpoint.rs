use crate::errors::CheckpointError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};

/// Identifies a long-running guardian fight between two teams.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CheckpointKey {
    pub attacker_team: String,
    pub defender_team: String,
}

impl CheckpointKey {
    pub fn new(attacker_team: impl Into<String>, defender_team: impl Into<String>) -> Self {
        Self {
            attacker_team: attacker_team.into(),
            defender_team: defender_team.into(),
        }
    }
}

impl fmt::Display for CheckpointKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.attacker_team, self.defender_team)
    }
}

/// Key-value storage for a guardian's current HP between sessions.
/// Last write wins.
pub trait CheckpointStore: Send + Sync {
    fn load(&self, key: &CheckpointKey) -> Result<Option<Decimal>, CheckpointError>;
    fn save(&self, key: &CheckpointKey, hp: Decimal) -> Result<(), CheckpointError>;
    fn clear(&self, key: &CheckpointKey) -> Result<(), CheckpointError>;
}

#[derive(Debug, Default)]
pub struct MemoryCheckpointStore {
    values: RwLock<HashMap<String, Decimal>>,
}

impl MemoryCheckpointStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CheckpointStore for MemoryCheckpointStore {
    fn load(&self, key: &CheckpointKey) -> Result<Option<Decimal>, CheckpointError> {
        let values = self.values.read().map_err(|_| CheckpointError::Poisoned)?;
        Ok(values.get(&key.to_string()).copied())
    }

    fn save(&self, key: &CheckpointKey, hp: Decimal) -> Result<(), CheckpointError> {
        let mut values = self.values.write().map_err(|_| CheckpointError::Poisoned)?;
        values.insert(key.to_string(), hp);
        Ok(())
    }

    fn clear(&self, key: &CheckpointKey) -> Result<(), CheckpointError> {
        let mut values = self.values.write().map_err(|_| CheckpointError::Poisoned)?;
        values.remove(&key.to_string());
        Ok(())
    }
}

/// Stores every checkpoint in one JSON object on disk, rewritten on each save.
#[derive(Debug)]
pub struct JsonFileCheckpointStore {
    path: PathBuf,
    guard: Mutex<()>,
}

impl JsonFileCheckpointStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            guard: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> CheckpointError {
        CheckpointError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn read_all(&self) -> Result<BTreeMap<String, Decimal>, CheckpointError> {
        match fs::read_to_string(&self.path) {
            Ok(text) if text.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(self.io_error(err)),
        }
    }

    fn write_all(&self, values: &BTreeMap<String, Decimal>) -> Result<(), CheckpointError> {
        let text = serde_json::to_string_pretty(values)?;
        fs::write(&self.path, text).map_err(|err| self.io_error(err))
    }
}

impl CheckpointStore for JsonFileCheckpointStore {
    fn load(&self, key: &CheckpointKey) -> Result<Option<Decimal>, CheckpointError> {
        let _guard = self.guard.lock().map_err(|_| CheckpointError::Poisoned)?;
        Ok(self.read_all()?.get(&key.to_string()).copied())
    }

    fn save(&self, key: &CheckpointKey, hp: Decimal) -> Result<(), CheckpointError> {
        let _guard = self.guard.lock().map_err(|_| CheckpointError::Poisoned)?;
        let mut values = self.read_all()?;
        values.insert(key.to_string(), hp);
        self.write_all(&values)
    }

    fn clear(&self, key: &CheckpointKey) -> Result<(), CheckpointError> {
        let _guard = self.guard.lock().map_err(|_| CheckpointError::Poisoned)?;
        let mut values = self.read_all()?;
        if values.remove(&key.to_string()).is_some() {
            self.write_all(&values)?;
        }
        Ok(())
    }
}
