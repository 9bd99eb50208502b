//! Bar source port.

use crate::domain::error::SignalError;
use crate::domain::ohlcv::Bar;

/// Supplies the daily bar history for a symbol, oldest first.
pub trait DataPort {
    /// Returns `SignalError::NoData` when the source has nothing for `symbol`.
    fn fetch_bars(&self, symbol: &str) -> Result<Vec<Bar>, SignalError>;
}
