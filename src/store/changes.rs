use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, Weak};

/// Invoked by a table port whenever any row changes.
pub type ChangeCallback = Arc<dyn Fn() + Send + Sync>;

/// Callbacks registered against a table port's change feed.
#[derive(Default)]
pub struct ChangeRegistry {
    next_id: AtomicU64,
    callbacks: RwLock<HashMap<u64, ChangeCallback>>,
}

impl ChangeRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Register a callback. It stays registered until the returned handle is dropped.
    pub fn register(self: &Arc<Self>, callback: ChangeCallback) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let mut map = self.callbacks.write().unwrap_or_else(|e| e.into_inner());
        map.insert(id, callback);
        Subscription { id, registry: Arc::downgrade(self) }
    }

    /// Invoke every registered callback.
    pub fn notify(&self) {
        // Callbacks run outside the lock so they may register or drop subscriptions.
        let callbacks: Vec<ChangeCallback> = {
            let map = self.callbacks.read().unwrap_or_else(|e| e.into_inner());
            map.values().cloned().collect()
        };
        for callback in callbacks {
            callback();
        }
    }

    pub fn len(&self) -> usize {
        self.callbacks.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn remove(&self, id: u64) {
        let mut map = self.callbacks.write().unwrap_or_else(|e| e.into_inner());
        map.remove(&id);
    }
}

/// Registration handle; dropping it deregisters the callback.
pub struct Subscription {
    id: u64,
    registry: Weak<ChangeRegistry>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.remove(self.id);
        }
    }
}
