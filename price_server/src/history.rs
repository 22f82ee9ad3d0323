//! Archive of best prices taken after polls.
//!
//! The engine never depends on this; the service appends the current best
//! price after each poll and reads it back for history requests. Failures are
//! reported to the caller, which logs them and carries on.
//!
//! Two backends:
//! - [`InMemoryHistory`]: process-lifetime `Vec`, the default.
//! - [`JsonlHistory`]: append-only file, one JSON record per line.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};

use chrono::{DateTime, Utc};
use log::warn;
use price_common::symbol;
use price_common::{PriceError, Result};

use crate::model::BestPrice;

/// Selection applied to archived records. All bounds are inclusive and optional.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryFilter {
    symbol: Option<String>,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
}

impl HistoryFilter {
    /// Everything.
    pub fn all() -> Self {
        Self::default()
    }

    /// Only `symbol` (trimmed, case-insensitive; blank means any symbol).
    pub fn with_symbol(mut self, raw: &str) -> Self {
        self.symbol = symbol::normalize(raw);
        self
    }

    /// Only records observed in `[start, end]`; either side may be open.
    pub fn between(mut self, start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    /// `true` if `record` passes every bound.
    pub fn matches(&self, record: &BestPrice) -> bool {
        self.symbol.as_deref().is_none_or(|s| s == record.symbol())
            && self.start.is_none_or(|start| record.observed_at() >= start)
            && self.end.is_none_or(|end| record.observed_at() <= end)
    }
}

/// Durable (or not) store of best prices keyed by symbol and time.
pub trait HistoryArchive: Send + Sync {
    /// Store `record`.
    fn append(&self, record: &BestPrice) -> Result<()>;

    /// Records matching `filter`, in insertion order.
    fn query(&self, filter: &HistoryFilter) -> Result<Vec<BestPrice>>;
}

/// History kept in memory for the life of the process.
#[derive(Debug, Default)]
pub struct InMemoryHistory {
    entries: RwLock<Vec<BestPrice>>,
}

impl InMemoryHistory {
    /// Empty archive.
    pub fn new() -> Self {
        Self::default()
    }
}

impl HistoryArchive for InMemoryHistory {
    fn append(&self, record: &BestPrice) -> Result<()> {
        self.entries.write()?.push(record.clone());
        Ok(())
    }

    fn query(&self, filter: &HistoryFilter) -> Result<Vec<BestPrice>> {
        Ok(self
            .entries
            .read()?
            .iter()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect())
    }
}

/// History appended to a JSON-lines file.
#[derive(Debug)]
pub struct JsonlHistory {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonlHistory {
    /// Archive at `path`. The file is created on first append.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }
}

impl HistoryArchive for JsonlHistory {
    fn append(&self, record: &BestPrice) -> Result<()> {
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');

        let _guard = self.write_lock.lock()?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| PriceError::History(format!("{}: {}", self.path.display(), e)))?;
        file.write_all(&line)
            .map_err(|e| PriceError::History(format!("{}: {}", self.path.display(), e)))?;
        Ok(())
    }

    fn query(&self, filter: &HistoryFilter) -> Result<Vec<BestPrice>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(PriceError::History(format!(
                    "{}: {}",
                    self.path.display(),
                    e
                )));
            }
        };

        let mut records = Vec::new();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<BestPrice>(&line) {
                Ok(record) if filter.matches(&record) => records.push(record),
                Ok(_) => {}
                Err(e) => warn!(
                    "Skipping malformed history line {} in {}: {}",
                    index + 1,
                    self.path.display(),
                    e
                ),
            }
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use tempfile::NamedTempFile;

    fn t0() -> DateTime<Utc> {
        "2026-01-01T00:00:00Z".parse().unwrap()
    }

    fn sample() -> Vec<BestPrice> {
        vec![
            BestPrice::new("BTCUSD", 25000.0, t0(), "A", Some("first".into())),
            BestPrice::new("ETHUSD", 3000.0, t0() + TimeDelta::seconds(10), "A", None),
            BestPrice::new("BTCUSD", 25100.0, t0() + TimeDelta::seconds(20), "B", None),
        ]
    }

    fn assert_queries(archive: &dyn HistoryArchive) {
        for record in sample() {
            archive.append(&record).unwrap();
        }

        assert_eq!(archive.query(&HistoryFilter::all()).unwrap(), sample());

        let btc = archive.query(&HistoryFilter::all().with_symbol("btcusd")).unwrap();
        assert_eq!(btc.len(), 2);
        assert!(btc.iter().all(|r| r.symbol() == "BTCUSD"));

        let window = HistoryFilter::all().between(
            Some(t0() + TimeDelta::seconds(10)),
            Some(t0() + TimeDelta::seconds(20)),
        );
        let ranged = archive.query(&window).unwrap();
        assert_eq!(ranged.len(), 2);

        let btc_window = window.with_symbol("BTCUSD");
        let ranged_btc = archive.query(&btc_window).unwrap();
        assert_eq!(ranged_btc.len(), 1);
        assert_eq!(ranged_btc[0].price(), 25100.0);
    }

    #[test]
    fn in_memory_history_supports_all_queries() {
        assert_queries(&InMemoryHistory::new());
    }

    #[test]
    fn jsonl_history_supports_all_queries() {
        let file = NamedTempFile::new().unwrap();
        assert_queries(&JsonlHistory::new(file.path()));
    }

    #[test]
    fn jsonl_history_survives_reopen_and_skips_garbage() {
        let file = NamedTempFile::new().unwrap();
        let archive = JsonlHistory::new(file.path());
        archive.append(&sample()[0]).unwrap();

        std::fs::OpenOptions::new()
            .append(true)
            .open(file.path())
            .unwrap()
            .write_all(b"not json\n")
            .unwrap();

        let reopened = JsonlHistory::new(file.path());
        reopened.append(&sample()[1]).unwrap();
        let records = reopened.query(&HistoryFilter::all()).unwrap();
        assert_eq!(records, sample()[..2].to_vec());
        assert_eq!(records[0].reason(), Some("first"));
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let archive = JsonlHistory::new(dir.path().join("history.jsonl"));
        assert!(archive.query(&HistoryFilter::all()).unwrap().is_empty());
    }

    #[test]
    fn unwritable_path_is_a_history_error() {
        let dir = tempfile::tempdir().unwrap();
        let archive = JsonlHistory::new(dir.path().join("missing").join("history.jsonl"));
        assert!(matches!(
            archive.append(&sample()[0]),
            Err(PriceError::History(_))
        ));
    }
}
