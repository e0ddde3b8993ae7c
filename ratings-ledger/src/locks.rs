use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, MutexGuard as StdMutexGuard};

use tokio::sync::{Mutex, OwnedMutexGuard};

type LockMap = HashMap<String, Arc<Mutex<()>>>;

/// One async mutex per effect id, created on first use.
///
/// Submissions for the same effect queue behind each other while unrelated
/// effects proceed independently. An entry is removed once its last holder
/// or waiter is gone, so the map only holds effects with work in progress.
#[derive(Default)]
pub(crate) struct EffectLocks {
    // Only held for map bookkeeping, never across an await.
    locks: StdMutex<LockMap>,
}

/// Exclusive access to one effect; dropping it releases the effect.
pub(crate) struct EffectGuard<'a> {
    owner: &'a EffectLocks,
    effect_id: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl EffectLocks {
    fn map(&self) -> StdMutexGuard<'_, LockMap> {
        // The map is always left consistent, so a poisoned lock is still usable.
        self.locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub(crate) async fn lock(&self, effect_id: &str) -> EffectGuard<'_> {
        let lock = self
            .map()
            .entry(effect_id.to_string())
            .or_default()
            .clone();

        EffectGuard {
            owner: self,
            effect_id: effect_id.to_string(),
            guard: Some(lock.lock_owned().await),
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.map().len()
    }
}

impl Drop for EffectGuard<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());

        let mut locks = self.owner.map();
        // Anyone still queued holds a clone; only the map's own reference left
        // means the entry is idle.
        let idle = locks
            .get(&self.effect_id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1);
        if idle {
            locks.remove(&self.effect_id);
        }
    }
}
