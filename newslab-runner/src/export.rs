//! On-disk artifacts: per-ticker combined tables and the run summary.
//!
//! - `<TICKER>_daily_data.csv`: columns date, close, daily_return, sentiment, ticker
//! - `correlation_summary.json`: config echo, per-ticker outcomes, correlation results
//!
//! The summary carries a `schema_version`; newer versions are rejected on load.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use newslab_core::domain::{CombinedRow, CorrelationResult, TickerOutcome};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Current summary schema version.
pub const SCHEMA_VERSION: u32 = 1;

pub const SUMMARY_FILE: &str = "correlation_summary.json";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error on {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("JSON error on {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unsupported summary schema version {found} (max supported: {SCHEMA_VERSION})")]
    UnsupportedSchema { found: u32 },
}

// ─── Paths ──────────────────────────────────────────────────────────

pub fn daily_data_path(dir: &Path, ticker: &str) -> PathBuf {
    dir.join(format!("{ticker}_daily_data.csv"))
}

pub fn chart_path(dir: &Path, ticker: &str) -> PathBuf {
    dir.join(format!("{ticker}_sentiment_vs_returns.png"))
}

pub fn summary_path(dir: &Path) -> PathBuf {
    dir.join(SUMMARY_FILE)
}

fn ensure_dir(dir: &Path) -> Result<(), ExportError> {
    std::fs::create_dir_all(dir).map_err(|source| ExportError::Io {
        path: dir.to_path_buf(),
        source,
    })
}

// ─── Combined table (CSV) ───────────────────────────────────────────

/// Write `rows` to `<dir>/<TICKER>_daily_data.csv`, replacing any existing file.
///
/// An empty slice still produces a header-only file.
pub fn write_combined_csv(
    dir: &Path,
    ticker: &str,
    rows: &[CombinedRow],
) -> Result<PathBuf, ExportError> {
    ensure_dir(dir)?;
    let path = daily_data_path(dir, ticker);
    let csv_err = |source| ExportError::Csv {
        path: path.clone(),
        source,
    };

    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(&path)
        .map_err(csv_err)?;
    wtr.write_record(["date", "close", "daily_return", "sentiment", "ticker"])
        .map_err(csv_err)?;
    for row in rows {
        wtr.serialize(row).map_err(csv_err)?;
    }
    wtr.flush().map_err(|source| ExportError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

/// Read a combined table previously written by [`write_combined_csv`].
pub fn read_combined_csv(path: &Path) -> Result<Vec<CombinedRow>, ExportError> {
    let csv_err = |source| ExportError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut rdr = csv::Reader::from_path(path).map_err(csv_err)?;
    rdr.deserialize().map(|r| r.map_err(csv_err)).collect()
}

// ─── Run summary (JSON) ─────────────────────────────────────────────

/// Machine-readable record of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub schema_version: u32,
    pub tickers: Vec<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub min_correlation_days: usize,
    pub outcomes: Vec<TickerOutcome>,
    pub results: Vec<CorrelationResult>,
}

impl RunSummary {
    pub fn result_for(&self, ticker: &str) -> Option<&CorrelationResult> {
        self.results.iter().find(|r| r.ticker == ticker)
    }
}

pub fn write_summary(dir: &Path, summary: &RunSummary) -> Result<PathBuf, ExportError> {
    ensure_dir(dir)?;
    let path = summary_path(dir);
    let json = serde_json::to_string_pretty(summary).map_err(|source| ExportError::Json {
        path: path.clone(),
        source,
    })?;
    std::fs::write(&path, json).map_err(|source| ExportError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

pub fn read_summary(dir: &Path) -> Result<RunSummary, ExportError> {
    let path = summary_path(dir);
    let json = std::fs::read_to_string(&path).map_err(|source| ExportError::Io {
        path: path.clone(),
        source,
    })?;
    let summary: RunSummary =
        serde_json::from_str(&json).map_err(|source| ExportError::Json { path, source })?;
    if summary.schema_version > SCHEMA_VERSION {
        return Err(ExportError::UnsupportedSchema {
            found: summary.schema_version,
        });
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use newslab_core::domain::OutcomeStatus;

    fn row(day: u32, close: f64, ret: f64, sentiment: f64) -> CombinedRow {
        CombinedRow {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            close,
            daily_return: ret,
            sentiment,
            ticker: "AAPL".into(),
        }
    }

    #[test]
    fn csv_has_expected_header_and_order() {
        let dir = tempfile::tempdir().unwrap();
        let rows = vec![row(3, 101.5, 1.5, 0.25), row(4, 100.0, -1.4778, 0.0)];
        let path = write_combined_csv(dir.path(), "AAPL", &rows).unwrap();
        assert_eq!(path.file_name().unwrap(), "AAPL_daily_data.csv");

        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("date,close,daily_return,sentiment,ticker"));
        assert_eq!(lines.next(), Some("2024-01-03,101.5,1.5,0.25,AAPL"));
        assert_eq!(lines.count(), 1);

        assert_eq!(read_combined_csv(&path).unwrap(), rows);
    }

    #[test]
    fn empty_table_is_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_combined_csv(dir.path(), "XYZ", &[]).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.trim_end(), "date,close,daily_return,sentiment,ticker");
        assert!(read_combined_csv(&path).unwrap().is_empty());
    }

    #[test]
    fn rewrite_replaces_previous_file() {
        let dir = tempfile::tempdir().unwrap();
        write_combined_csv(dir.path(), "AAPL", &[row(3, 1.0, 0.0, 0.0), row(4, 2.0, 100.0, 0.0)])
            .unwrap();
        let path = write_combined_csv(dir.path(), "AAPL", &[row(5, 3.0, 50.0, 0.1)]).unwrap();
        assert_eq!(read_combined_csv(&path).unwrap().len(), 1);
    }

    #[test]
    fn summary_roundtrip_and_version_gate() {
        let dir = tempfile::tempdir().unwrap();
        let mut summary = RunSummary {
            schema_version: SCHEMA_VERSION,
            tickers: vec!["AAPL".into(), "XYZ".into()],
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            min_correlation_days: 11,
            outcomes: vec![
                TickerOutcome {
                    ticker: "AAPL".into(),
                    rows: 14,
                    status: OutcomeStatus::Correlated,
                },
                TickerOutcome {
                    ticker: "XYZ".into(),
                    rows: 4,
                    status: OutcomeStatus::InsufficientData { required: 11 },
                },
            ],
            results: vec![CorrelationResult {
                ticker: "AAPL".into(),
                correlation: 0.12,
                p_value: 0.68,
                num_days: 14,
                avg_sentiment: 0.18,
            }],
        };
        write_summary(dir.path(), &summary).unwrap();
        let loaded = read_summary(dir.path()).unwrap();
        assert_eq!(loaded, summary);
        assert!(loaded.result_for("AAPL").is_some());
        assert!(loaded.result_for("XYZ").is_none());

        summary.schema_version = SCHEMA_VERSION + 1;
        write_summary(dir.path(), &summary).unwrap();
        assert!(matches!(
            read_summary(dir.path()),
            Err(ExportError::UnsupportedSchema { .. })
        ));
    }

    #[test]
    fn missing_summary_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(read_summary(dir.path()), Err(ExportError::Io { .. })));
    }
}
