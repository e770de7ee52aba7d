//! Provider traits and structured error types.
//!
//! `MarketDataProvider` and `NewsProvider` abstract over the upstream REST
//! service so the loaders can be driven by in-memory fakes in tests.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raw daily aggregate bar as returned by the market-data service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawBar {
    /// Bar open time, epoch milliseconds (UTC).
    pub timestamp_ms: i64,
    pub close: f64,
}

/// Publish timestamp of an article.
///
/// The news service is not consistent about the shape of this field: most
/// responses carry an RFC 3339 string, some carry epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Published {
    EpochMillis(i64),
    Text(String),
}

/// Raw news article before scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawArticle {
    pub title: Option<String>,
    pub description: Option<String>,
    pub published: Published,
}

/// Structured error types for data operations.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("authentication required: {0}")]
    AuthenticationRequired(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("HTTP {status} from {url}")]
    Http { status: u16, url: String },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
}

/// Source of daily aggregate bars.
pub trait MarketDataProvider {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch daily bars for `ticker` between `start` and `end` (inclusive).
    ///
    /// An empty vector is a valid answer (unknown ticker, holiday-only range).
    fn daily_bars(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RawBar>, DataError>;
}

/// Source of ticker-scoped news articles.
pub trait NewsProvider {
    fn name(&self) -> &str;

    /// Fetch articles mentioning `ticker` published between `start` and `end`.
    fn articles(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RawArticle>, DataError>;
}
