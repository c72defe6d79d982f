//! Bounded, time-expiring recency caches.

use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

use lru::LruCache;
use parking_lot::Mutex;

use super::Item;

struct Entry<V> {
    value: V,
    written_at: Instant,
}

/// A bounded `Item`-keyed map with write-TTL expiry.
///
/// Capacity overflow evicts the least recently used entry; entries older than
/// the TTL are dropped lazily on access and eagerly by [`purge_expired`].
/// Internally locked, so a shared reference is safe across threads.
///
/// Presence semantics are caller-defined: the relay uses one instance as a
/// "fetch already initiated" marker and one as a short-term payload store.
/// Absence never means the item is unknown, only that it is eligible again.
///
/// [`purge_expired`]: RecencyCache::purge_expired
pub struct RecencyCache<V> {
    inner: Mutex<LruCache<Item, Entry<V>>>,
    ttl: Duration,
}

impl<V> RecencyCache<V> {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap();
        Self {
            inner: Mutex::new(LruCache::new(capacity)),
            ttl,
        }
    }

    /// True if the item is present and not expired. Does not refresh recency.
    pub fn contains(&self, item: &Item) -> bool {
        let mut cache = self.inner.lock();
        match cache.peek(item) {
            Some(entry) if entry.written_at.elapsed() < self.ttl => true,
            Some(_) => {
                cache.pop(item);
                false
            }
            None => false,
        }
    }

    /// Insert or refresh an entry, evicting the least recently used entry
    /// once at capacity.
    pub fn insert(&self, item: Item, value: V) {
        self.inner.lock().put(
            item,
            Entry {
                value,
                written_at: Instant::now(),
            },
        );
    }

    /// Drop every expired entry. Returns the number removed.
    pub fn purge_expired(&self) -> usize {
        let mut cache = self.inner.lock();
        let stale: Vec<Item> = cache
            .iter()
            .filter(|(_, entry)| entry.written_at.elapsed() >= self.ttl)
            .map(|(item, _)| *item)
            .collect();
        for item in &stale {
            cache.pop(item);
        }
        stale.len()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

impl<V: Clone> RecencyCache<V> {
    /// Fetch a clone of the stored value if present and fresh. Refreshes the
    /// entry's recency.
    pub fn get(&self, item: &Item) -> Option<V> {
        let mut cache = self.inner.lock();
        match cache.get(item) {
            Some(entry) if entry.written_at.elapsed() < self.ttl => Some(entry.value.clone()),
            Some(_) => {
                cache.pop(item);
                None
            }
            None => None,
        }
    }
}
