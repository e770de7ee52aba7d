//! Property tests for the loader/join/statistics invariants.
//!
//! Uses proptest to verify:
//! 1. Return formula: daily_return = (close[t]/close[t-1] - 1) * 100
//! 2. Aggregation: at most one DailySentiment per (date, ticker), equal to the mean
//! 3. Join size: combined rows = distinct price dates - 1, zero-filled where no news
//! 4. Bounds: r in [-1, 1], p in [0, 1]

use chrono::{Duration, NaiveDate};
use newslab_core::data::aggregate_daily;
use newslab_core::domain::{Headline, PriceSeries};
use newslab_core::{combine, correlate, pearson};
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};

fn base() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_close() -> impl Strategy<Value = f64> {
    (1.0..1000.0_f64).prop_map(|p| (p * 100.0).round() / 100.0)
}

/// (day offset, close) pairs; offsets may repeat and arrive unsorted.
fn arb_closes() -> impl Strategy<Value = Vec<(i64, f64)>> {
    prop::collection::vec((0i64..60, arb_close()), 0..80)
}

fn arb_headlines() -> impl Strategy<Value = Vec<(i64, usize, f64)>> {
    prop::collection::vec((0i64..60, 0usize..2, -1.0..=1.0_f64), 0..120)
}

const TICKERS: [&str; 2] = ["AAPL", "TSLA"];

fn to_headlines(raw: &[(i64, usize, f64)]) -> Vec<Headline> {
    raw.iter()
        .map(|&(day, t, s)| Headline {
            date: base() + Duration::days(day),
            ticker: TICKERS[t].to_string(),
            title: String::new(),
            sentiment: s,
        })
        .collect()
}

// ── 1. Return formula ────────────────────────────────────────────────

proptest! {
    #[test]
    fn returns_follow_formula(raw in arb_closes()) {
        let closes: Vec<_> = raw.iter().map(|&(d, c)| (base() + Duration::days(d), c)).collect();
        let series = PriceSeries::from_closes("AAPL", closes);

        prop_assert!(series.bars.windows(2).all(|w| w[0].date < w[1].date));
        for (i, bar) in series.bars.iter().enumerate() {
            if i == 0 {
                prop_assert!(bar.daily_return.is_none());
            } else {
                let expected = (bar.close / series.bars[i - 1].close - 1.0) * 100.0;
                prop_assert!((bar.daily_return.unwrap() - expected).abs() < 1e-9);
            }
        }
    }
}

// ── 2. Aggregation ───────────────────────────────────────────────────

proptest! {
    #[test]
    fn one_mean_per_date_and_ticker(raw in arb_headlines()) {
        let headlines = to_headlines(&raw);
        let daily = aggregate_daily(&headlines);

        let keys: BTreeSet<_> = daily.iter().map(|d| (d.date, d.ticker.clone())).collect();
        prop_assert_eq!(keys.len(), daily.len());

        let mut groups: HashMap<(NaiveDate, String), Vec<f64>> = HashMap::new();
        for h in &headlines {
            groups.entry((h.date, h.ticker.clone())).or_default().push(h.sentiment);
        }
        prop_assert_eq!(groups.len(), daily.len());
        for d in &daily {
            let vals = &groups[&(d.date, d.ticker.clone())];
            let mean = vals.iter().sum::<f64>() / vals.len() as f64;
            prop_assert!((d.sentiment - mean).abs() < 1e-12);
            prop_assert_eq!(d.headline_count, vals.len());
        }
    }
}

// ── 3. Join size ─────────────────────────────────────────────────────

proptest! {
    #[test]
    fn combined_rows_are_dates_minus_one(raw in arb_closes(), news in arb_headlines()) {
        let closes: Vec<_> = raw.iter().map(|&(d, c)| (base() + Duration::days(d), c)).collect();
        let distinct: BTreeSet<_> = closes.iter().map(|(d, _)| *d).collect();
        let series = PriceSeries::from_closes("AAPL", closes);
        let daily = aggregate_daily(&to_headlines(&news));

        let rows = combine("AAPL", &series, &daily);
        prop_assert_eq!(rows.len(), distinct.len().saturating_sub(1));
        if let Some(first) = distinct.iter().next() {
            prop_assert!(rows.iter().all(|r| r.date != *first));
        }

        let news_days: BTreeSet<_> = daily
            .iter()
            .filter(|d| d.ticker == "AAPL")
            .map(|d| d.date)
            .collect();
        for r in &rows {
            if !news_days.contains(&r.date) {
                prop_assert_eq!(r.sentiment, 0.0);
            }
        }

        let (outcome, result) = correlate("AAPL", &rows);
        prop_assert_eq!(outcome.rows, rows.len());
        if rows.len() <= 10 {
            prop_assert!(result.is_none());
        }
    }
}

// ── 4. Bounds ────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn pearson_is_bounded(pairs in prop::collection::vec((-100.0..100.0_f64, -100.0..100.0_f64), 3..60)) {
        let xs: Vec<f64> = pairs.iter().map(|p| p.0).collect();
        let ys: Vec<f64> = pairs.iter().map(|p| p.1).collect();
        if let Some(res) = pearson(&xs, &ys) {
            prop_assert!((-1.0..=1.0).contains(&res.r));
            prop_assert!((0.0..=1.0).contains(&res.p_value));
            prop_assert_eq!(res.n, xs.len());
        }
    }
}
