//! LRU + TTL cache with a single exclusive lock

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::error::{CacheError, Result};
use crate::order::AccessOrder;
use crate::types::CacheStats;

/// A capacity-bounded cache with access-ordered LRU eviction and lazy TTL expiry
///
/// Every operation, reads included, goes through one exclusive lock: a read
/// updates recency and may purge an expired entry, so expiry detection and
/// removal happen in the same critical section. The lock is never held across
/// an `.await` point outside this type.
pub struct LruTtlCache<K, V> {
    entries: Mutex<AccessOrder<K, V>>,
    capacity: usize,
    ttl: Duration,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
    expirations: AtomicU64,
}

impl<K, V> LruTtlCache<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug,
    V: Clone,
{
    /// Create a new cache holding at most `capacity` entries, each valid for `ttl`
    pub fn new(capacity: usize, ttl: Duration) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::ZeroCapacity);
        }

        info!(capacity, ttl_secs = ttl.as_secs(), "Cache initialized");

        Ok(Self {
            entries: Mutex::new(AccessOrder::with_capacity(capacity)),
            capacity,
            ttl,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
            expirations: AtomicU64::new(0),
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Get a value if present and younger than the TTL
    ///
    /// An expired entry is removed before the lock is released.
    pub async fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + fmt::Debug + ?Sized,
    {
        let mut entries = self.entries.lock().await;

        let Some(slot) = entries.slot_of(key) else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            debug!(key = ?key, "Cache miss");
            return None;
        };

        let age = Instant::now().saturating_duration_since(entries.node(slot).inserted_at);
        if age >= self.ttl {
            entries.remove_slot(slot);
            self.expirations.fetch_add(1, Ordering::Relaxed);
            self.misses.fetch_add(1, Ordering::Relaxed);
            debug!(
                key = ?key,
                age_secs = age.as_secs(),
                ttl_secs = self.ttl.as_secs(),
                "Cache entry expired"
            );
            return None;
        }

        entries.touch(slot);
        self.hits.fetch_add(1, Ordering::Relaxed);
        debug!(key = ?key, "Cache hit");
        Some(entries.node(slot).value.clone())
    }

    /// Insert or replace a value, stamping it with the current time
    ///
    /// Inserting a new key into a full cache first evicts the least recently used entry.
    pub async fn put(&self, key: K, value: V) {
        let now = Instant::now();
        let mut entries = self.entries.lock().await;

        if let Some(slot) = entries.slot_of(&key) {
            entries.replace(slot, value, now);
            debug!(key = ?key, "Cache entry replaced");
            return;
        }

        while entries.len() >= self.capacity {
            match entries.pop_back() {
                Some(evicted) => {
                    self.evictions.fetch_add(1, Ordering::Relaxed);
                    debug!(key = ?evicted.key, "Evicted least recently used cache entry");
                }
                None => break,
            }
        }

        debug!(key = ?key, "Added to cache");
        entries.push_front(key, value, now);
    }

    /// Remove an entry, returning whether it was present
    pub async fn remove<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + fmt::Debug + ?Sized,
    {
        let mut entries = self.entries.lock().await;
        match entries.slot_of(key) {
            Some(slot) => {
                entries.remove_slot(slot);
                debug!(key = ?key, "Removed from cache");
                true
            }
            None => false,
        }
    }

    pub async fn clear(&self) {
        self.entries.lock().await.clear();
        info!("Cache cleared");
    }

    /// Number of stored entries, including expired ones not yet purged
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Snapshot of the stored keys, most recently used first
    ///
    /// The returned list is detached from the cache and may include keys whose
    /// entries have expired but not yet been purged.
    pub async fn keys(&self) -> Vec<K> {
        self.entries.lock().await.keys()
    }

    pub async fn stats(&self) -> CacheStats {
        let entries = self.entries.lock().await.len();
        CacheStats {
            entries,
            capacity: self.capacity,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            expirations: self.expirations.load(Ordering::Relaxed),
        }
    }
}
