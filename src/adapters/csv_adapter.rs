//! CSV file data adapter.
//!
//! Reads `<base_path>/<symbol>.csv` with columns
//! `date,open,high,low,close,volume[,amount]`. A header row is required.

use std::fs;
use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime};
use csv::StringRecord;
use tracing::debug;

use crate::domain::error::SignalError;
use crate::domain::ohlcv::Bar;
use crate::ports::data_port::DataPort;

const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];
const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }
}

impl DataPort for CsvAdapter {
    fn fetch_bars(&self, symbol: &str) -> Result<Vec<Bar>, SignalError> {
        let path = self.csv_path(symbol);
        if !path.is_file() {
            return Err(SignalError::NoData {
                symbol: symbol.to_string(),
            });
        }
        let content = fs::read_to_string(&path).map_err(|e| SignalError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(content.as_bytes());
        let mut rows = Vec::new();

        for (line, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| SignalError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;
            // Header is line 1.
            rows.push(parse_record(&record, line + 2)?);
        }

        if rows.is_empty() {
            return Err(SignalError::NoData {
                symbol: symbol.to_string(),
            });
        }

        rows.sort_by_key(|(timestamp, _)| *timestamp);
        debug!(symbol, bars = rows.len(), path = %path.display(), "loaded bars");
        Ok(rows.into_iter().map(|(_, bar)| bar).collect())
    }
}

fn parse_record(record: &StringRecord, line: usize) -> Result<(NaiveDateTime, Bar), SignalError> {
    let raw_date = field(record, 0, "date", line)?;
    let (timestamp, date) = parse_timestamp(raw_date).ok_or_else(|| SignalError::Data {
        reason: format!("line {line}: invalid date '{raw_date}'"),
    })?;

    let amount = match record.get(6) {
        Some(raw) if !raw.is_empty() => number(raw, "amount", line)?,
        _ => 0.0,
    };

    let bar = Bar {
        date,
        open: number(field(record, 1, "open", line)?, "open", line)?,
        high: number(field(record, 2, "high", line)?, "high", line)?,
        low: number(field(record, 3, "low", line)?, "low", line)?,
        close: number(field(record, 4, "close", line)?, "close", line)?,
        volume: number(field(record, 5, "volume", line)?, "volume", line)?,
        amount,
    };
    Ok((timestamp, bar))
}

fn field<'r>(
    record: &'r StringRecord,
    index: usize,
    name: &str,
    line: usize,
) -> Result<&'r str, SignalError> {
    record.get(index).ok_or_else(|| SignalError::Data {
        reason: format!("line {line}: missing {name} column"),
    })
}

fn number(raw: &str, name: &str, line: usize) -> Result<f64, SignalError> {
    raw.parse().map_err(|e| SignalError::Data {
        reason: format!("line {line}: invalid {name} value '{raw}': {e}"),
    })
}

/// Accepts a plain date or a date with minute or second resolution. The
/// returned string is zero-padded so that string order matches time order.
fn parse_timestamp(raw: &str) -> Option<(NaiveDateTime, String)> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        return Some((
            date.and_hms_opt(0, 0, 0)?,
            date.format(DATE_FORMAT).to_string(),
        ));
    }
    let timestamp = DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())?;
    Some((timestamp, timestamp.format(DATETIME_FORMATS[0]).to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ohlcv::validate_bars;
    use tempfile::TempDir;

    fn setup_test_data() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_path_buf();

        // Out of order on purpose.
        let csv_content = "date,open,high,low,close,volume,amount\n\
            2024-01-16,105.0,115.0,100.0,110.0,60000,6600000\n\
            2024-01-15,100.0,110.0,90.0,105.0,50000,5250000\n\
            2024-01-17,110.0,120.0,105.0,115.0,55000,\n";

        fs::write(path.join("600519.csv"), csv_content).unwrap();
        fs::write(path.join("EMPTY.csv"), "date,open,high,low,close,volume\n").unwrap();
        fs::write(
            path.join("INTRADAY.csv"),
            "date,open,high,low,close,volume\n\
             2024-01-15 09:30,10,11,9,10.5,100\n\
             2024-01-15 09:31:00,10.5,11,10,10.8,120\n",
        )
        .unwrap();

        (dir, path)
    }

    #[test]
    fn fetch_bars_returns_sorted_data() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let bars = adapter.fetch_bars("600519").unwrap();

        assert_eq!(bars.len(), 3);
        assert_eq!(bars[0].date, "2024-01-15");
        assert_eq!(bars[0].open, 100.0);
        assert_eq!(bars[0].high, 110.0);
        assert_eq!(bars[0].low, 90.0);
        assert_eq!(bars[0].close, 105.0);
        assert_eq!(bars[0].volume, 50000.0);
        assert_eq!(bars[0].amount, 5250000.0);
        assert_eq!(bars[2].date, "2024-01-17");
    }

    #[test]
    fn amount_column_is_optional() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let bars = adapter.fetch_bars("600519").unwrap();
        assert_eq!(bars[2].amount, 0.0);

        let intraday = adapter.fetch_bars("INTRADAY").unwrap();
        assert_eq!(intraday[0].amount, 0.0);
    }

    #[test]
    fn accepts_intraday_timestamps() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let bars = adapter.fetch_bars("INTRADAY").unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].date, "2024-01-15 09:30:00");
        assert_eq!(bars[1].date, "2024-01-15 09:31:00");
    }

    #[test]
    fn unpadded_dates_are_normalized() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("SHORT.csv"),
            "date,open,high,low,close,volume\n\
             2024-1-10,1,1,1,1,1\n\
             2024-1-9,1,1,1,1,1\n",
        )
        .unwrap();
        let adapter = CsvAdapter::new(dir.path().to_path_buf());

        let bars = adapter.fetch_bars("SHORT").unwrap();
        assert_eq!(bars[0].date, "2024-01-09");
        assert_eq!(bars[1].date, "2024-01-10");
        assert!(validate_bars(&bars).is_ok());
    }

    #[test]
    fn missing_file_is_no_data() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        assert!(matches!(
            adapter.fetch_bars("XYZ"),
            Err(SignalError::NoData { symbol }) if symbol == "XYZ"
        ));
    }

    #[test]
    fn header_only_file_is_no_data() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        assert!(matches!(
            adapter.fetch_bars("EMPTY"),
            Err(SignalError::NoData { .. })
        ));
    }

    #[test]
    fn rejects_bad_date() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("BAD.csv"),
            "date,open,high,low,close,volume\n15/01/2024,1,1,1,1,1\n",
        )
        .unwrap();
        let adapter = CsvAdapter::new(dir.path().to_path_buf());

        match adapter.fetch_bars("BAD") {
            Err(SignalError::Data { reason }) => {
                assert!(reason.contains("line 2"), "{reason}");
                assert!(reason.contains("15/01/2024"), "{reason}");
            }
            other => panic!("expected data error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_non_numeric_price() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("BAD.csv"),
            "date,open,high,low,close,volume\n2024-01-15,1,1,1,abc,1\n",
        )
        .unwrap();
        let adapter = CsvAdapter::new(dir.path().to_path_buf());

        assert!(matches!(
            adapter.fetch_bars("BAD"),
            Err(SignalError::Data { reason }) if reason.contains("close")
        ));
    }

    #[test]
    fn parse_timestamp_formats() {
        assert_eq!(parse_timestamp("2024-03-01").unwrap().1, "2024-03-01");
        assert_eq!(
            parse_timestamp("2024-03-01 14:00").unwrap().1,
            "2024-03-01 14:00:00"
        );
        assert_eq!(
            parse_timestamp("2024-3-1 14:00:59").unwrap().1,
            "2024-03-01 14:00:59"
        );
        assert!(parse_timestamp("2024-13-01").is_none());
        assert!(parse_timestamp("yesterday").is_none());
    }
}
