//! Price loader: raw aggregate bars → date-indexed close series with returns.

use super::provider::{DataError, MarketDataProvider, RawBar};
use crate::domain::PriceSeries;
use chrono::{DateTime, NaiveDate};

/// Convert an epoch-millisecond bar timestamp to its UTC calendar date.
pub fn bar_date(timestamp_ms: i64) -> Result<NaiveDate, DataError> {
    DateTime::from_timestamp_millis(timestamp_ms)
        .map(|dt| dt.date_naive())
        .ok_or_else(|| DataError::InvalidTimestamp(format!("{timestamp_ms} ms")))
}

/// Build a `PriceSeries` from raw bars: map to dates, dedupe, sort, returns.
pub fn price_series_from_raw(ticker: &str, raw: Vec<RawBar>) -> Result<PriceSeries, DataError> {
    let closes = raw
        .into_iter()
        .map(|bar| Ok((bar_date(bar.timestamp_ms)?, bar.close)))
        .collect::<Result<Vec<_>, DataError>>()?;
    Ok(PriceSeries::from_closes(ticker, closes))
}

/// Fetch and normalize one ticker's daily closes.
///
/// An empty upstream answer yields an empty series, not an error.
pub fn load_prices(
    provider: &dyn MarketDataProvider,
    ticker: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<PriceSeries, DataError> {
    let raw = provider.daily_bars(ticker, start, end)?;
    tracing::debug!(ticker, provider = provider.name(), bars = raw.len(), "fetched aggregates");
    price_series_from_raw(ticker, raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2024-01-02 05:00:00 UTC, the usual Polygon daily-bar stamp.
    const JAN2: i64 = 1_704_171_600_000;
    const DAY_MS: i64 = 86_400_000;

    #[test]
    fn bar_date_uses_utc() {
        assert_eq!(bar_date(JAN2).unwrap(), NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
    }

    #[test]
    fn bar_date_rejects_out_of_range() {
        assert!(matches!(bar_date(i64::MAX), Err(DataError::InvalidTimestamp(_))));
    }

    #[test]
    fn same_day_stamps_collapse_to_first() {
        let raw = vec![
            RawBar { timestamp_ms: JAN2, close: 100.0 },
            RawBar { timestamp_ms: JAN2 + 3_600_000, close: 200.0 },
            RawBar { timestamp_ms: JAN2 + DAY_MS, close: 105.0 },
        ];
        let series = price_series_from_raw("AAPL", raw).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.bars[0].close, 100.0);
        assert!((series.bars[1].daily_return.unwrap() - 5.0).abs() < 1e-9);
    }

    struct NoBars;

    impl MarketDataProvider for NoBars {
        fn name(&self) -> &str {
            "none"
        }

        fn daily_bars(&self, _: &str, _: NaiveDate, _: NaiveDate) -> Result<Vec<RawBar>, DataError> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn no_bars_is_empty_series() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let series = load_prices(&NoBars, "XYZ", start, start).unwrap();
        assert!(series.is_empty());
        assert_eq!(series.ticker, "XYZ");
    }
}
