use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::debug;

const DEFAULT_CAPACITY: usize = 4096;

/// Memoizes a pure lookup by its arguments. Entries expire after `ttl`; `None`
/// keeps them until capacity pressure evicts them. The map never holds more than
/// `capacity` entries.
#[derive(Debug)]
pub struct MemoCache<K, V> {
    name: &'static str,
    ttl: Option<Duration>,
    capacity: usize,
    entries: Mutex<HashMap<K, (Instant, V)>>,
}

impl<K, V> MemoCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(name: &'static str, ttl: Option<Duration>) -> Self {
        Self {
            name,
            ttl,
            capacity: DEFAULT_CAPACITY,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    pub fn get(&self, key: &K) -> Option<V> {
        let mut guard = self.entries.lock().expect("memo cache mutex poisoned");
        match guard.get(key) {
            Some((stored_at, value)) if !self.expired(*stored_at) => Some(value.clone()),
            Some(_) => {
                guard.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn insert(&self, key: K, value: V) {
        let mut guard = self.entries.lock().expect("memo cache mutex poisoned");
        if guard.len() >= self.capacity && !guard.contains_key(&key) {
            self.evict(&mut guard);
        }
        guard.insert(key, (Instant::now(), value));
    }

    /// Returns the cached value or runs `fetch` and stores its result. The lock is
    /// not held across the fetch, so concurrent misses may both call the source.
    pub async fn get_or_fetch<F, Fut>(&self, key: K, fetch: F) -> V
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = V>,
    {
        if let Some(value) = self.get(&key) {
            debug!(cache = self.name, "cache hit");
            return value;
        }

        let value = fetch().await;
        self.insert(key, value.clone());
        value
    }

    /// Like [`MemoCache::get_or_fetch`], but only an `Ok` answer is stored. A
    /// failed fetch is returned as-is and retried on the next call.
    pub async fn get_or_try_fetch<F, Fut, E>(&self, key: K, fetch: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(&key) {
            debug!(cache = self.name, "cache hit");
            return Ok(value);
        }

        let value = fetch().await?;
        self.insert(key, value.clone());
        Ok(value)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().expect("memo cache mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries
            .lock()
            .expect("memo cache mutex poisoned")
            .clear();
    }

    /// Drops expired entries; if the map is still full, drops the oldest one.
    fn evict(&self, entries: &mut HashMap<K, (Instant, V)>) {
        let before = entries.len();
        entries.retain(|_, (stored_at, _)| !self.expired(*stored_at));

        if entries.len() >= self.capacity {
            let oldest = entries
                .iter()
                .min_by_key(|(_, (stored_at, _))| *stored_at)
                .map(|(key, _)| key.clone());
            if let Some(oldest) = oldest {
                entries.remove(&oldest);
            }
        }

        debug!(
            cache = self.name,
            evicted = before - entries.len(),
            "purged expired cache entries"
        );
    }

    fn expired(&self, stored_at: Instant) -> bool {
        self.ttl
            .map(|ttl| stored_at.elapsed() >= ttl)
            .unwrap_or(false)
    }
}
