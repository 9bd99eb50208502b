#![allow(dead_code)]

use std::collections::HashMap;
use std::fmt::Write as _;
use std::path::Path;

use stocksignal::domain::error::SignalError;
pub use stocksignal::domain::ohlcv::Bar;
use stocksignal::ports::data_port::DataPort;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<Bar>>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<Bar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_bars(&self, symbol: &str) -> Result<Vec<Bar>, SignalError> {
        self.data
            .get(symbol)
            .cloned()
            .ok_or_else(|| SignalError::NoData {
                symbol: symbol.to_string(),
            })
    }
}

/// Day `i` counted from 2024-01-01, as `YYYY-MM-DD`.
pub fn day(i: usize) -> String {
    let base = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    (base + chrono::Duration::days(i as i64))
        .format("%Y-%m-%d")
        .to_string()
}

pub fn make_bar(i: usize, close: f64, volume: f64) -> Bar {
    Bar {
        date: day(i),
        open: close,
        high: close + 0.05,
        low: close - 0.05,
        close,
        volume,
        amount: close * volume,
    }
}

pub fn bars_from_closes(closes: &[f64]) -> Vec<Bar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| make_bar(i, c, 1_000.0))
        .collect()
}

/// `count` bars rising linearly from `from` to `to`.
pub fn linear_bars(count: usize, from: f64, to: f64) -> Vec<Bar> {
    let step = if count > 1 {
        (to - from) / (count - 1) as f64
    } else {
        0.0
    };
    let closes: Vec<f64> = (0..count).map(|i| from + step * i as f64).collect();
    bars_from_closes(&closes)
}

/// Rises 0.2 per bar with a 0.5 dip on odd bars; the per-bar scorer buys at
/// bar 30 (close 16.0).
pub fn zigzag_entry_closes() -> Vec<f64> {
    (0..=30)
        .map(|i| 10.0 + 0.2 * i as f64 - if i % 2 == 1 { 0.5 } else { 0.0 })
        .collect()
}

pub fn write_csv(dir: &Path, symbol: &str, bars: &[Bar]) {
    let mut content = String::from("date,open,high,low,close,volume,amount\n");
    for b in bars {
        writeln!(
            content,
            "{},{},{},{},{},{},{}",
            b.date, b.open, b.high, b.low, b.close, b.volume, b.amount
        )
        .unwrap();
    }
    std::fs::write(dir.join(format!("{symbol}.csv")), content).unwrap();
}
