use std::{collections::HashSet, sync::Arc};

use bridgewatch_types::RequestId;
use parking_lot::Mutex;

/// Tracks which request ids currently have a live watcher.
///
/// At most one watcher may exist per id at any time. Registration happens
/// before the watcher issues its first network call, so two concurrent
/// attempts cannot both observe "no watcher" and proceed.
#[derive(Debug, Default)]
pub(crate) struct WatcherRegistry {
    active: Mutex<HashSet<RequestId>>,
}

impl WatcherRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Claims the id, returning a guard that releases it on drop.
    ///
    /// Returns `None` if a watcher is already registered for the id.
    pub(crate) fn try_register(self: &Arc<Self>, id: RequestId) -> Option<WatcherGuard> {
        if !self.active.lock().insert(id) {
            return None;
        }
        Some(WatcherGuard {
            registry: Arc::clone(self),
            id,
        })
    }

    pub(crate) fn is_registered(&self, id: &RequestId) -> bool {
        self.active.lock().contains(id)
    }

    fn release(&self, id: &RequestId) {
        self.active.lock().remove(id);
    }
}

/// Releases the watcher registration when the watcher task ends, however it
/// ends (terminal status, account switch, shutdown, panic).
#[derive(Debug)]
pub(crate) struct WatcherGuard {
    registry: Arc<WatcherRegistry>,
    id: RequestId,
}

impl WatcherGuard {
    pub(crate) fn id(&self) -> RequestId {
        self.id
    }
}

impl Drop for WatcherGuard {
    fn drop(&mut self) {
        self.registry.release(&self.id);
    }
}
