//! Time-boxed memoization in front of any `DataPort`.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tracing::debug;

use crate::adapters::cache::TtlCache;
use crate::domain::error::SignalError;
use crate::domain::ohlcv::Bar;
use crate::ports::data_port::DataPort;

pub const DEFAULT_TTL: Duration = Duration::from_secs(15);
pub const DEFAULT_CAPACITY: usize = 500;

/// Serves repeated `fetch_bars` calls for the same symbol from memory until
/// the TTL lapses. Errors from the inner port are never cached.
pub struct CachedDataAdapter<P> {
    inner: P,
    cache: Mutex<TtlCache<String, Vec<Bar>>>,
}

impl<P: DataPort> CachedDataAdapter<P> {
    pub fn new(inner: P) -> Self {
        Self::with_limits(inner, DEFAULT_TTL, DEFAULT_CAPACITY)
    }

    pub fn with_limits(inner: P, ttl: Duration, capacity: usize) -> Self {
        Self {
            inner,
            cache: Mutex::new(TtlCache::new(ttl, capacity)),
        }
    }

    fn cache(&self) -> MutexGuard<'_, TtlCache<String, Vec<Bar>>> {
        // A poisoned lock still guards a usable cache.
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<P: DataPort> DataPort for CachedDataAdapter<P> {
    fn fetch_bars(&self, symbol: &str) -> Result<Vec<Bar>, SignalError> {
        if let Some(bars) = self.cache().get(symbol) {
            debug!(symbol, "cache hit");
            return Ok(bars);
        }

        let bars = self.inner.fetch_bars(symbol)?;
        self.cache().insert(symbol.to_string(), bars.clone());
        Ok(bars)
    }
}
