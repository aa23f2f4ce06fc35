use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Hands out one async lock per player so concurrent battles that touch the
/// same player's records run one after another.
#[derive(Debug, Default)]
pub struct PlayerLocks {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl PlayerLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries nobody holds or waits on are dropped here, so the map only
    /// tracks players with a live guard or a pending lock.
    async fn handle(&self, player_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        locks.entry(player_id.to_string()).or_default().clone()
    }

    pub async fn lock(&self, player_id: &str) -> OwnedMutexGuard<()> {
        self.handle(player_id).await.lock_owned().await
    }

    /// Locks several players at once. Ids are taken in sorted order so two
    /// battles over overlapping parties cannot deadlock.
    pub async fn lock_all<S: AsRef<str>>(&self, player_ids: &[S]) -> Vec<OwnedMutexGuard<()>> {
        let mut ids: Vec<&str> = player_ids.iter().map(|id| id.as_ref()).collect();
        ids.sort_unstable();
        ids.dedup();
        let mut guards = Vec::with_capacity(ids.len());
        for id in ids {
            guards.push(self.lock(id).await);
        }
        guards
    }

    pub async fn is_locked(&self, player_id: &str) -> bool {
        let locks = self.locks.lock().await;
        locks
            .get(player_id)
            .is_some_and(|lock| lock.try_lock().is_err())
    }

    /// Players currently present in the lock table.
    pub async fn tracked(&self) -> usize {
        self.locks.lock().await.len()
    }
}
