use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use uuid::Uuid;

/// Per-session mutual exclusion. Turns for one session are serialized while
/// different sessions proceed in parallel.
#[derive(Default)]
pub struct SessionLocks {
    locks: RwLock<HashMap<Uuid, Arc<Mutex<()>>>>,
}

impl SessionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to `session_id`. Held until the guard is dropped.
    pub async fn acquire(&self, session_id: Uuid) -> OwnedMutexGuard<()> {
        self.lock_for(session_id).await.lock_owned().await
    }

    /// Drops the lock entry of a finished session. Waiters that already hold a
    /// handle keep working against it.
    pub async fn release(&self, session_id: Uuid) {
        self.locks.write().await.remove(&session_id);
    }

    async fn lock_for(&self, session_id: Uuid) -> Arc<Mutex<()>> {
        // Fast path: read lock
        {
            let locks = self.locks.read().await;
            if let Some(lock) = locks.get(&session_id) {
                return Arc::clone(lock);
            }
        }
        // Slow path: write lock and create
        let mut locks = self.locks.write().await;
        Arc::clone(locks.entry(session_id).or_default())
    }

    #[cfg(test)]
    pub async fn tracked(&self) -> usize {
        self.locks.read().await.len()
    }
}
