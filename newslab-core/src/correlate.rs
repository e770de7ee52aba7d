//! Correlator: left-join sentiment onto prices, then test sentiment vs return.
//!
//! Join policy: every price date is kept; a date with no headlines gets
//! sentiment 0.0 (no news is neutral news, not missing data). Rows without a
//! daily return (the first bar) are dropped after the join.

use crate::domain::{
    CombinedRow, CorrelationResult, DailySentiment, OutcomeStatus, PriceSeries, TickerOutcome,
};
use crate::stats::pearson;
use chrono::NaiveDate;
use std::collections::HashMap;

/// Fewest joined rows for which a correlation is reported.
pub const MIN_CORRELATION_DAYS: usize = 11;

/// Join one ticker's prices with its daily sentiment.
///
/// Sentiment rows for other tickers are ignored.
pub fn combine(ticker: &str, prices: &PriceSeries, sentiment: &[DailySentiment]) -> Vec<CombinedRow> {
    let by_date: HashMap<NaiveDate, f64> = sentiment
        .iter()
        .filter(|s| s.ticker == ticker)
        .map(|s| (s.date, s.sentiment))
        .collect();

    prices
        .bars
        .iter()
        .filter_map(|bar| {
            let daily_return = bar.daily_return?;
            Some(CombinedRow {
                date: bar.date,
                close: bar.close,
                daily_return,
                sentiment: by_date.get(&bar.date).copied().unwrap_or(0.0),
                ticker: ticker.to_string(),
            })
        })
        .collect()
}

/// Correlate with the default threshold of `MIN_CORRELATION_DAYS`.
pub fn correlate(ticker: &str, rows: &[CombinedRow]) -> (TickerOutcome, Option<CorrelationResult>) {
    correlate_with_threshold(ticker, rows, MIN_CORRELATION_DAYS)
}

/// Pearson r and p between `sentiment` and `daily_return`.
///
/// Fewer than `min_days` rows, or a zero-variance column, yields no result;
/// the returned outcome records which.
pub fn correlate_with_threshold(
    ticker: &str,
    rows: &[CombinedRow],
    min_days: usize,
) -> (TickerOutcome, Option<CorrelationResult>) {
    let outcome = |status| TickerOutcome {
        ticker: ticker.to_string(),
        rows: rows.len(),
        status,
    };

    if rows.len() < min_days {
        return (
            outcome(OutcomeStatus::InsufficientData { required: min_days }),
            None,
        );
    }

    let sentiment: Vec<f64> = rows.iter().map(|r| r.sentiment).collect();
    let returns: Vec<f64> = rows.iter().map(|r| r.daily_return).collect();

    match pearson(&sentiment, &returns) {
        Some(p) => {
            let avg_sentiment = sentiment.iter().sum::<f64>() / sentiment.len() as f64;
            (
                outcome(OutcomeStatus::Correlated),
                Some(CorrelationResult {
                    ticker: ticker.to_string(),
                    correlation: p.r,
                    p_value: p.p_value,
                    num_days: rows.len(),
                    avg_sentiment,
                }),
            )
        }
        None => (outcome(OutcomeStatus::ConstantSeries), None),
    }
}
