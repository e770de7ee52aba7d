//! Scored headlines and their per-day aggregate.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single scored news article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Headline {
    pub date: NaiveDate,
    pub ticker: String,
    pub title: String,
    /// Compound sentiment in [-1, 1].
    pub sentiment: f64,
}

/// Mean headline sentiment for one (date, ticker).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySentiment {
    pub date: NaiveDate,
    pub ticker: String,
    pub sentiment: f64,
    /// Number of headlines averaged into `sentiment`.
    pub headline_count: usize,
}
