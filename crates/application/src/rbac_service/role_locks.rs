use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use loanflow_domain::RoleId;

type LockMap = HashMap<RoleId, Arc<AsyncMutex<()>>>;

/// One async mutex per role while a writer holds or awaits it.
///
/// The map itself is only touched in short synchronous sections, so a
/// blocking mutex guards it and the entry can be evicted from `Drop`.
#[derive(Clone, Default)]
pub(super) struct RoleLocks {
    locks: Arc<Mutex<LockMap>>,
}

/// Exclusive write access to one role. Releasing the last holder evicts the entry.
pub(super) struct RoleLockGuard {
    role_id: RoleId,
    locks: Arc<Mutex<LockMap>>,
    _guard: OwnedMutexGuard<()>,
}

impl RoleLocks {
    /// Waits until no other writer holds the role.
    pub(super) async fn acquire(&self, role_id: RoleId) -> RoleLockGuard {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(locks.entry(role_id).or_default())
        };

        RoleLockGuard {
            role_id,
            locks: Arc::clone(&self.locks),
            _guard: lock.lock_owned().await,
        }
    }

    #[cfg(test)]
    pub(super) fn len(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Drop for RoleLockGuard {
    fn drop(&mut self) {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        // The map entry and this guard hold two references; any more are waiters.
        let idle = locks
            .get(&self.role_id)
            .is_some_and(|lock| Arc::strong_count(lock) <= 2);
        if idle {
            locks.remove(&self.role_id);
        }
    }
}
