use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use ahash::AHashMap;
use parking_lot::RwLock;

use crate::builder::CacheBuilder;
use crate::error::ConfigError;
use crate::stats::{Metrics, StatsCounter};
use crate::ticker::Ticker;
use crate::tracker::EvictionTracker;
use crate::wheel::TimingWheel;

// ---------------------------------------------------------------------------
// Cache interior
// ---------------------------------------------------------------------------

/// Map and eviction tracker, always mutated together under one lock.
struct Guarded<K, V> {
    map: AHashMap<K, Arc<V>>,
    tracker: EvictionTracker<K>,
}

/// Shared interior of a [`Cache`].
struct Inner<K, V> {
    guarded: RwLock<Guarded<K, V>>,
    expire: Duration,
    metrics: StatsCounter,
}

impl<K, V> Inner<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Expiry path, called from the wheel's dispatch thread. The wheel has
    /// already detached the fired entry, so no timer cleanup is owed here.
    fn remove_expired(&self, key: &K) {
        let expired = {
            let mut guarded = self.guarded.write();
            let expired = guarded.map.remove(key).is_some();
            if expired {
                guarded.tracker.remove(key);
            }
            expired
        };
        if expired {
            self.metrics.record_expiration();
        }
    }
}

// ---------------------------------------------------------------------------
// Cache handle
// ---------------------------------------------------------------------------

/// A thread-safe expiring cache with optional bounded-size LRU eviction.
///
/// Entries live for a cache-wide `expire` after their last [`set`](Cache::set).
/// Values are stored behind [`Arc`], so reads hand out shared handles instead
/// of cloning.  Clones of the cache are cheap and share the same entries.
///
/// # Example
/// ```
/// use std::time::Duration;
///
/// let cache: carousel::Cache<String, u64> =
///     carousel::CacheBuilder::new(Duration::from_secs(30)).build().unwrap();
/// cache.set("visits".to_string(), 1);
/// assert_eq!(cache.get(&"visits".to_string()).as_deref(), Some(&1));
/// ```
pub struct Cache<K, V> {
    inner: Arc<Inner<K, V>>,
    wheel: Arc<TimingWheel<K, Arc<V>>>,
}

impl<K, V> Clone for Cache<K, V> {
    fn clone(&self) -> Self {
        Cache {
            inner: Arc::clone(&self.inner),
            wheel: Arc::clone(&self.wheel),
        }
    }
}

impl<K, V> Cache<K, V>
where
    K: Hash + Eq + Clone + Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    pub(crate) fn with_ticker<T>(
        expire: Duration,
        limit: Option<usize>,
        tick_interval: Duration,
        num_slots: usize,
        ticker: T,
    ) -> Result<Self, ConfigError>
    where
        T: Ticker + Send + 'static,
    {
        let tracker = match limit {
            Some(limit) => EvictionTracker::bounded(limit),
            None => EvictionTracker::unbounded(),
        };
        let inner = Arc::new(Inner {
            guarded: RwLock::new(Guarded {
                map: AHashMap::new(),
                tracker,
            }),
            expire,
            metrics: StatsCounter::new(),
        });

        // The callback captures a weak handle; once the last cache clone is
        // gone its upgrades fail and late fires fall through harmlessly.
        let weak = Arc::downgrade(&inner);
        let wheel = TimingWheel::with_ticker(
            tick_interval,
            num_slots,
            move |key: K, _value: Arc<V>| {
                if let Some(inner) = weak.upgrade() {
                    inner.remove_expired(&key);
                }
            },
            ticker,
        )?;

        Ok(Cache {
            inner,
            wheel: Arc::new(wheel),
        })
    }

    /// Returns a [`CacheBuilder`] for a cache whose entries live for `expire`.
    pub fn builder(expire: Duration) -> CacheBuilder<K, V> {
        CacheBuilder::new(expire)
    }

    // -----------------------------------------------------------------------
    // Hot-path: get
    // -----------------------------------------------------------------------

    /// Returns the value for `key`, if present.
    ///
    /// Reading neither refreshes the entry's lifetime nor its standing
    /// against the size limit; only [`set`](Cache::set) does.
    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        let guarded = self.inner.guarded.read();
        let Some(value) = guarded.map.get(key) else {
            self.inner.metrics.record_miss();
            return None;
        };
        self.inner.metrics.record_hit();
        Some(Arc::clone(value))
    }

    // -----------------------------------------------------------------------
    // Hot-path: set
    // -----------------------------------------------------------------------

    /// Inserts or replaces the value for `key`, restarting its lifetime and
    /// marking it most recently set.  If the insert pushes the cache past
    /// its size limit, the least recently set key is evicted before this
    /// call returns.
    pub fn set(&self, key: K, value: V) {
        self.set_with_expire(key, value, self.inner.expire);
    }

    /// Like [`set`](Cache::set), but with a lifetime of `expire` for this
    /// write alone.  A zero `expire` schedules no new expiration; if an
    /// earlier write left a deadline pending, that deadline still stands
    /// and will remove the entry when it lapses.
    pub fn set_with_expire(&self, key: K, value: V, expire: Duration) {
        let value = Arc::new(value);
        let (existed, victim) = {
            let mut guarded = self.inner.guarded.write();
            let existed = guarded
                .map
                .insert(key.clone(), Arc::clone(&value))
                .is_some();
            let victim = guarded.tracker.add(key.clone());
            if let Some(victim_key) = &victim {
                guarded.map.remove(victim_key);
            }
            (existed, victim)
        };

        // Wheel sends wait until the lock is dropped; the expiry callback
        // takes that same lock.
        if let Some(victim_key) = victim {
            self.inner.metrics.record_eviction();
            self.wheel.remove_timer(victim_key);
        }

        if expire.is_zero() {
            return;
        }
        if existed {
            self.wheel.move_timer(key, expire);
        } else {
            self.wheel.set_timer(key, value, expire);
        }
    }

    // -----------------------------------------------------------------------
    // Hot-path: del
    // -----------------------------------------------------------------------

    /// Removes `key`, returning its value if it was present. The pending
    /// expiration, if any, is cancelled.
    pub fn del(&self, key: &K) -> Option<Arc<V>> {
        let removed = {
            let mut guarded = self.inner.guarded.write();
            let removed = guarded.map.remove(key);
            if removed.is_some() {
                guarded.tracker.remove(key);
            }
            removed
        };
        if removed.is_some() {
            self.wheel.remove_timer(key.clone());
        }
        removed
    }

    // -----------------------------------------------------------------------
    // Introspection
    // -----------------------------------------------------------------------

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.inner.guarded.read().map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Point-in-time snapshot of hit, miss, eviction and expiration counts.
    pub fn stats(&self) -> Metrics {
        self.inner.metrics.snapshot()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
