use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// One async mutex per publication identifier.
///
/// Held across the read-modify-write sequences that keep the memory entry and
/// the files on disk in step, so two writers for the same publication can't
/// interleave. Writers for different publications never wait on each other.
///
/// A mutex only lives in the map while someone holds or waits on it.
#[derive(Debug, Default)]
pub(crate) struct IdentifierLocks {
    locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl IdentifierLocks {
    pub(crate) async fn lock(&self, identifier: &str) -> IdentifierGuard<'_> {
        let lock = {
            let mut locks = self.locks.lock();
            Arc::clone(locks.entry(identifier.to_string()).or_default())
        };
        IdentifierGuard {
            guard: Some(lock.lock_owned().await),
            identifier: identifier.to_string(),
            locks: self,
        }
    }

    /// Drops the mutex for `identifier` unless someone is holding or waiting
    /// on it.
    fn forget(&self, identifier: &str) {
        let mut locks = self.locks.lock();
        if locks.get(identifier).is_some_and(|lock| Arc::strong_count(lock) == 1) {
            locks.remove(identifier);
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.locks.lock().len()
    }
}

/// Exclusive access to one identifier. Releasing the last guard removes the
/// identifier's mutex from the map.
pub(crate) struct IdentifierGuard<'a> {
    guard: Option<OwnedMutexGuard<()>>,
    identifier: String,
    locks: &'a IdentifierLocks,
}

impl Drop for IdentifierGuard<'_> {
    fn drop(&mut self) {
        // The guard holds a reference to the mutex; it has to go first.
        drop(self.guard.take());
        self.locks.forget(&self.identifier);
    }
}
