use std::hash::Hash;
use std::marker::PhantomData;
use std::time::Duration;

use crate::cache::Cache;
use crate::error::ConfigError;
use crate::ticker::{RealTicker, Ticker};

/// Wheel resolution used when [`CacheBuilder::tick_interval`] is not called.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Wheel slot count used when [`CacheBuilder::num_slots`] is not called.
pub const DEFAULT_NUM_SLOTS: usize = 300;

/// Builder for configuring and constructing a [`Cache`].
///
/// # Example
/// ```
/// use std::time::Duration;
/// use carousel::CacheBuilder;
///
/// let cache: carousel::Cache<String, u64> = CacheBuilder::new(Duration::from_secs(60))
///     .limit(10_000)
///     .build()
///     .unwrap();
/// cache.set("token".to_string(), 7);
/// ```
pub struct CacheBuilder<K, V> {
    expire: Duration,
    limit: Option<usize>,
    tick_interval: Duration,
    num_slots: usize,
    _marker: PhantomData<fn(K, V)>,
}

impl<K, V> CacheBuilder<K, V> {
    /// Starts a builder for a cache whose entries live for `expire` after
    /// their last set.  A zero `expire` disables expiration entirely.
    pub fn new(expire: Duration) -> Self {
        CacheBuilder {
            expire,
            limit: None,
            tick_interval: DEFAULT_TICK_INTERVAL,
            num_slots: DEFAULT_NUM_SLOTS,
            _marker: PhantomData,
        }
    }

    /// Bounds the cache to `limit` entries; inserting past the bound evicts
    /// the least recently set key.  A zero `limit` is ignored and leaves
    /// the cache unbounded.
    pub fn limit(mut self, limit: usize) -> Self {
        if limit > 0 {
            self.limit = Some(limit);
        }
        self
    }

    /// Resolution of the expiry wheel (default: 1 second).  Entry lifetimes
    /// round to whole ticks.
    pub fn tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    /// Number of slots on the expiry wheel (default: 300).
    pub fn num_slots(mut self, n: usize) -> Self {
        self.num_slots = n;
        self
    }
}

impl<K, V> CacheBuilder<K, V>
where
    K: Hash + Eq + Clone + Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    /// Builds the cache, spawning its wheel thread.
    pub fn build(self) -> Result<Cache<K, V>, ConfigError> {
        // Checked before the ticker exists; a zero-period tick source spins.
        if self.tick_interval.is_zero() {
            return Err(ConfigError::ZeroInterval);
        }
        let ticker = RealTicker::new(self.tick_interval);
        self.build_with_ticker(ticker)
    }

    pub(crate) fn build_with_ticker<T>(self, ticker: T) -> Result<Cache<K, V>, ConfigError>
    where
        T: Ticker + Send + 'static,
    {
        Cache::with_ticker(
            self.expire,
            self.limit,
            self.tick_interval,
            self.num_slots,
            ticker,
        )
    }
}
