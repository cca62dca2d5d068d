//! CSV price-history adapter.
//!
//! One `<code>.csv` per instrument under `base_path`. Columns are located by
//! header name (`date,open,high,low,close`, case-insensitive), so exports with
//! extra columns such as `Adj Close` or `Volume` load as-is. Rows keep file
//! order; ordering problems are left for the engine to reject.

use crate::domain::error::SignalError;
use crate::domain::ohlcv::PriceBar;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};

pub struct CsvAdapter {
    base_path: PathBuf,
}

struct Columns {
    date: usize,
    open: usize,
    high: usize,
    low: usize,
    close: usize,
}

impl Columns {
    fn from_headers(headers: &csv::StringRecord, path: &Path) -> Result<Self, SignalError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
                .ok_or_else(|| SignalError::Data {
                    reason: format!("{}: missing {} column", path.display(), name),
                })
        };
        Ok(Columns {
            date: find("date")?,
            open: find("open")?,
            high: find("high")?,
            low: find("low")?,
            close: find("close")?,
        })
    }
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, code: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", code))
    }

    fn read_bars(&self, code: &str) -> Result<Vec<PriceBar>, SignalError> {
        let path = self.csv_path(code);
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(&path)
            .map_err(|e| SignalError::Data {
                reason: format!("failed to read {}: {}", path.display(), e),
            })?;

        let headers = rdr.headers().map_err(|e| SignalError::Data {
            reason: format!("{}: {}", path.display(), e),
        })?;
        let cols = Columns::from_headers(headers, &path)?;

        let mut bars = Vec::new();
        for (row, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| SignalError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;
            let field = |i: usize| record.get(i).unwrap_or("");
            let line = row + 2;

            bars.push(PriceBar {
                date: parse_date(field(cols.date), line)?,
                open: parse_price(field(cols.open), "open", line)?,
                high: parse_price(field(cols.high), "high", line)?,
                low: parse_price(field(cols.low), "low", line)?,
                close: parse_price(field(cols.close), "close", line)?,
            });
        }
        Ok(bars)
    }
}

/// Accepts `YYYY-MM-DD`, optionally followed by a time part.
fn parse_date(value: &str, line: usize) -> Result<NaiveDate, SignalError> {
    let day = value.get(..10).unwrap_or(value);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(|e| SignalError::Data {
        reason: format!("line {}: invalid date {:?}: {}", line, value, e),
    })
}

/// An empty cell is a missing price and reads as NaN so the engine rejects
/// the series; anything else must parse.
fn parse_price(value: &str, column: &str, line: usize) -> Result<f64, SignalError> {
    if value.is_empty() {
        return Ok(f64::NAN);
    }
    value.parse().map_err(|e| SignalError::Data {
        reason: format!("line {}: invalid {} value {:?}: {}", line, column, value, e),
    })
}

impl DataPort for CsvAdapter {
    fn fetch_ohlcv(
        &self,
        code: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PriceBar>, SignalError> {
        let mut bars = self.read_bars(code)?;
        bars.retain(|b| b.date >= start_date && b.date <= end_date);
        Ok(bars)
    }

    fn list_symbols(&self) -> Result<Vec<String>, SignalError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| SignalError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| SignalError::Data {
                reason: format!("directory entry error: {}", e),
            })?;
            let name = entry.file_name();
            if let Some(code) = name.to_string_lossy().strip_suffix(".csv") {
                symbols.push(code.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }

    fn get_data_range(
        &self,
        code: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, SignalError> {
        let bars = self.read_bars(code)?;
        let first = bars.iter().map(|b| b.date).min();
        let last = bars.iter().map(|b| b.date).max();
        Ok(first.zip(last).map(|(first, last)| (first, last, bars.len())))
    }
}
