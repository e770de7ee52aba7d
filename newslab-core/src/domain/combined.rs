//! Joined price/sentiment rows and per-ticker correlation outcomes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One trading day of the price/sentiment join.
///
/// Field order is the on-disk column order of `<TICKER>_daily_data.csv`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedRow {
    pub date: NaiveDate,
    pub close: f64,
    pub daily_return: f64,
    /// Mean headline sentiment for the day, 0.0 when there was no news.
    pub sentiment: f64,
    pub ticker: String,
}

/// Pearson correlation between daily sentiment and daily return.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationResult {
    pub ticker: String,
    pub correlation: f64,
    pub p_value: f64,
    pub num_days: usize,
    pub avg_sentiment: f64,
}

/// Why a ticker does or does not have a `CorrelationResult`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OutcomeStatus {
    Correlated,
    /// Too few joined rows for a meaningful coefficient.
    InsufficientData { required: usize },
    /// Sentiment or return has zero variance; r is undefined.
    ConstantSeries,
}

/// Per-ticker record of what the correlator did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerOutcome {
    pub ticker: String,
    pub rows: usize,
    #[serde(flatten)]
    pub status: OutcomeStatus,
}

impl TickerOutcome {
    pub fn is_correlated(&self) -> bool {
        self.status == OutcomeStatus::Correlated
    }

    /// Short human-readable reason, used in console output.
    pub fn describe(&self) -> String {
        match &self.status {
            OutcomeStatus::Correlated => "correlated".into(),
            OutcomeStatus::InsufficientData { required } => {
                format!("insufficient data ({} rows, need {required})", self.rows)
            }
            OutcomeStatus::ConstantSeries => "constant series (correlation undefined)".into(),
        }
    }
}
