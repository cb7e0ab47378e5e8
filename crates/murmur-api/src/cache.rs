//! Read-through cache for "who shared this status" lists, keyed by status id.

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use parking_lot::Mutex;
use uuid::Uuid;

pub trait ShareCache: Send + Sync {
    fn get(&self, status_id: &Uuid) -> Option<Vec<String>>;
    fn put(&self, status_id: Uuid, usernames: Vec<String>);
    fn evict(&self, status_id: &Uuid);
}

/// Bounded in-process cache; least recently used lists are dropped first.
pub struct LruShareCache {
    entries: Mutex<LruCache<Uuid, Vec<String>>>,
}

impl LruShareCache {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ShareCache for LruShareCache {
    fn get(&self, status_id: &Uuid) -> Option<Vec<String>> {
        self.entries.lock().get(status_id).cloned()
    }

    fn put(&self, status_id: Uuid, usernames: Vec<String>) {
        self.entries.lock().put(status_id, usernames);
    }

    fn evict(&self, status_id: &Uuid) {
        self.entries.lock().pop(status_id);
    }
}

/// Never stores anything; every read goes to the store.
pub struct NoopShareCache;

impl ShareCache for NoopShareCache {
    fn get(&self, _status_id: &Uuid) -> Option<Vec<String>> {
        None
    }

    fn put(&self, _status_id: Uuid, _usernames: Vec<String>) {}

    fn evict(&self, _status_id: &Uuid) {}
}

/// Build the cache for a configured capacity. Zero disables caching.
pub fn share_cache(capacity: usize) -> Arc<dyn ShareCache> {
    match NonZeroUsize::new(capacity) {
        Some(capacity) => Arc::new(LruShareCache::new(capacity)),
        None => Arc::new(NoopShareCache),
    }
}
