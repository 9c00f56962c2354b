//! Caching layer for generated reports and retrieval indexes
//!
//! [`Cache`] fronts a pluggable [`CacheStore`] and adds single-flight
//! computation: concurrent misses for one key run the expensive work once
//! while the other callers wait and then read the stored value.
//! [`MemoryStore`] is the in-process store built on the `cached` crate.

use async_trait::async_trait;
use cached::{Cached, SizedCache, TimedCache, TimedSizedCache, UnboundCache};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::RwLock;

/// Capacity and expiry policy for a cache
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CachePolicy {
    /// Maximum number of entries; least recently used entries are evicted
    pub capacity: Option<usize>,
    /// Lifetime of an entry after insertion
    pub ttl: Option<Duration>,
}

impl CachePolicy {
    /// No capacity limit and no expiry
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Limit the number of entries
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Expire entries after `ttl`
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }
}

/// Backing storage for a [`Cache`]
#[async_trait]
pub trait CacheStore<V>: Send + Sync {
    /// Look up a live entry
    async fn get(&self, key: &str) -> Option<V>;

    /// Insert or replace an entry
    async fn insert(&self, key: String, value: V);

    /// Remove an entry, returning it if present
    async fn remove(&self, key: &str) -> Option<V>;

    /// Remove every entry
    async fn clear(&self);

    /// Number of stored entries
    async fn len(&self) -> usize;
}

enum Backing<V> {
    Unbounded(UnboundCache<String, V>),
    Sized(SizedCache<String, V>),
    Timed(TimedCache<String, V>),
    TimedSized(TimedSizedCache<String, V>),
}

impl<V: Clone> Backing<V> {
    fn from_policy(policy: CachePolicy) -> Self {
        match (policy.capacity, policy.ttl) {
            (None, None) => Backing::Unbounded(UnboundCache::new()),
            (Some(size), None) => Backing::Sized(SizedCache::with_size(size)),
            (None, Some(ttl)) => Backing::Timed(TimedCache::with_lifespan(ttl)),
            (Some(size), Some(ttl)) => {
                Backing::TimedSized(TimedSizedCache::with_size_and_lifespan(size, ttl))
            }
        }
    }

    fn get(&mut self, key: &str) -> Option<V> {
        match self {
            Backing::Unbounded(c) => c.cache_get(key).cloned(),
            Backing::Sized(c) => c.cache_get(key).cloned(),
            Backing::Timed(c) => c.cache_get(key).cloned(),
            Backing::TimedSized(c) => c.cache_get(key).cloned(),
        }
    }

    fn set(&mut self, key: String, value: V) {
        let _ = match self {
            Backing::Unbounded(c) => c.cache_set(key, value),
            Backing::Sized(c) => c.cache_set(key, value),
            Backing::Timed(c) => c.cache_set(key, value),
            Backing::TimedSized(c) => c.cache_set(key, value),
        };
    }

    fn remove(&mut self, key: &str) -> Option<V> {
        match self {
            Backing::Unbounded(c) => c.cache_remove(key),
            Backing::Sized(c) => c.cache_remove(key),
            Backing::Timed(c) => c.cache_remove(key),
            Backing::TimedSized(c) => c.cache_remove(key),
        }
    }

    fn clear(&mut self) {
        match self {
            Backing::Unbounded(c) => c.cache_clear(),
            Backing::Sized(c) => c.cache_clear(),
            Backing::Timed(c) => c.cache_clear(),
            Backing::TimedSized(c) => c.cache_clear(),
        }
    }

    fn size(&self) -> usize {
        match self {
            Backing::Unbounded(c) => c.cache_size(),
            Backing::Sized(c) => c.cache_size(),
            Backing::Timed(c) => c.cache_size(),
            Backing::TimedSized(c) => c.cache_size(),
        }
    }
}

/// Thread-safe in-memory store honouring a [`CachePolicy`]
pub struct MemoryStore<V> {
    inner: RwLock<Backing<V>>,
}

impl<V: Clone> MemoryStore<V> {
    /// Create a store for the given policy
    ///
    /// A capacity of zero is treated as one entry.
    pub fn new(policy: CachePolicy) -> Self {
        let policy = CachePolicy {
            capacity: policy.capacity.map(|c| c.max(1)),
            ..policy
        };
        Self {
            inner: RwLock::new(Backing::from_policy(policy)),
        }
    }
}

#[async_trait]
impl<V> CacheStore<V> for MemoryStore<V>
where
    V: Clone + Send + Sync,
{
    async fn get(&self, key: &str) -> Option<V> {
        // Lookups update recency and expiry bookkeeping, so they need the write lock.
        let mut cache = self.inner.write().await;
        cache.get(key)
    }

    async fn insert(&self, key: String, value: V) {
        let mut cache = self.inner.write().await;
        cache.set(key, value);
    }

    async fn remove(&self, key: &str) -> Option<V> {
        let mut cache = self.inner.write().await;
        cache.remove(key)
    }

    async fn clear(&self) {
        let mut cache = self.inner.write().await;
        cache.clear();
    }

    async fn len(&self) -> usize {
        let cache = self.inner.read().await;
        cache.size()
    }
}

type Gate = Arc<tokio::sync::Mutex<()>>;
type GateMap = Arc<Mutex<HashMap<String, Gate>>>;

/// A caller's hold on a per-key gate, released even if the caller is dropped
struct GateHandle {
    gate: Gate,
    gates: GateMap,
    key: String,
}

impl Drop for GateHandle {
    fn drop(&mut self) {
        let mut gates = self.gates.lock().unwrap_or_else(PoisonError::into_inner);
        // Only the map and this handle hold it: nobody else is waiting.
        if Arc::strong_count(&self.gate) <= 2 {
            gates.remove(&self.key);
        }
    }
}

/// Named cache with single-flight computation
pub struct Cache<V> {
    name: &'static str,
    store: Arc<dyn CacheStore<V>>,
    gates: GateMap,
}

impl<V> Clone for Cache<V> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            store: Arc::clone(&self.store),
            gates: Arc::clone(&self.gates),
        }
    }
}

impl<V> Cache<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Create a cache over any store
    pub fn new(name: &'static str, store: Arc<dyn CacheStore<V>>) -> Self {
        Self {
            name,
            store,
            gates: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Create a cache backed by a [`MemoryStore`]
    pub fn in_memory(name: &'static str, policy: CachePolicy) -> Self {
        Self::new(name, Arc::new(MemoryStore::new(policy)))
    }

    /// Cache name used in log lines
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Get a value from the cache
    pub async fn get(&self, key: &str) -> Option<V> {
        self.store.get(key).await
    }

    /// Insert or replace a value
    pub async fn insert(&self, key: impl Into<String>, value: V) {
        self.store.insert(key.into(), value).await;
    }

    /// Invalidate a specific cache entry
    pub async fn invalidate(&self, key: &str) -> Option<V> {
        self.store.remove(key).await
    }

    /// Clear all cached entries
    pub async fn clear(&self) {
        self.store.clear().await;
    }

    /// Get the number of cached entries
    pub async fn len(&self) -> usize {
        self.store.len().await
    }

    /// Check if the cache is empty
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Get a value, computing and storing it on a miss
    ///
    /// Concurrent callers for the same key are serialized on a per-key gate;
    /// the first computes, the rest find the stored value once they get in.
    /// Failed computations store nothing and the error goes to that caller
    /// only.
    pub async fn get_or_compute<F, Fut, E>(&self, key: &str, compute: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(key).await {
            tracing::debug!(cache = self.name, key, "Cache hit");
            return Ok(value);
        }

        let gate = self.acquire_gate(key);
        let _guard = gate.gate.lock().await;
        if let Some(value) = self.get(key).await {
            tracing::debug!(cache = self.name, key, "Cache filled while waiting");
            return Ok(value);
        }

        tracing::debug!(cache = self.name, key, "Cache miss");
        let value = compute().await?;
        self.insert(key, value.clone()).await;
        Ok(value)
    }

    fn acquire_gate(&self, key: &str) -> GateHandle {
        let mut gates = self.gates.lock().unwrap_or_else(PoisonError::into_inner);
        GateHandle {
            gate: Arc::clone(gates.entry(key.to_string()).or_default()),
            gates: Arc::clone(&self.gates),
            key: key.to_string(),
        }
    }

    #[cfg(test)]
    fn pending_gates(&self) -> usize {
        self.gates.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}
