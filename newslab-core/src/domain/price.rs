//! PriceBar and PriceSeries: one ticker's daily closes with derived returns.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Daily close for a single ticker on a single trading day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub close: f64,
    /// Percent change from the previous bar's close. `None` on the first bar.
    pub daily_return: Option<f64>,
}

/// Date-ordered price bars for one ticker.
///
/// Invariant: `bars` is strictly ascending by date (one bar per date), and
/// `daily_return` is `None` exactly for `bars[0]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub ticker: String,
    pub bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// Build a series from (date, close) pairs.
    ///
    /// Duplicate dates keep the first occurrence; the rest are dropped. The
    /// result is sorted ascending and returns are computed on the sorted order.
    pub fn from_closes(ticker: impl Into<String>, closes: Vec<(NaiveDate, f64)>) -> Self {
        let mut seen = std::collections::HashSet::new();
        let mut deduped: Vec<(NaiveDate, f64)> = closes
            .into_iter()
            .filter(|(date, _)| seen.insert(*date))
            .collect();
        deduped.sort_by_key(|(date, _)| *date);

        let mut bars = Vec::with_capacity(deduped.len());
        let mut prev_close: Option<f64> = None;
        for (date, close) in deduped {
            bars.push(PriceBar {
                date,
                close,
                daily_return: prev_close.map(|prev| pct_change(prev, close)),
            });
            prev_close = Some(close);
        }

        Self {
            ticker: ticker.into(),
            bars,
        }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Returns for every bar after the first, paired with its date.
    pub fn daily_returns(&self) -> Vec<(NaiveDate, f64)> {
        self.bars
            .iter()
            .filter_map(|b| b.daily_return.map(|r| (b.date, r)))
            .collect()
    }
}

/// Percent change from `prev` to `curr`: (curr / prev - 1) * 100.
///
/// A zero previous close yields an infinite or NaN value, the same as plain
/// floating-point division; the upstream never sends zero closes.
pub fn pct_change(prev: f64, curr: f64) -> f64 {
    (curr / prev - 1.0) * 100.0
}
