//! NewsLab Core — domain types, data providers, sentiment scoring, correlation.
//!
//! This crate holds everything that does not touch the filesystem:
//! - Domain types (price bars, headlines, daily sentiment, joined rows, outcomes)
//! - Provider traits plus the blocking Polygon client
//! - Price loader (dedupe, sort, percent returns)
//! - Sentiment extractor (VADER scoring, per-day means)
//! - Correlator (left join with zero fill, Pearson r with two-tailed p)

pub mod correlate;
pub mod data;
pub mod domain;
pub mod sentiment;
pub mod stats;

pub use correlate::{combine, correlate, correlate_with_threshold, MIN_CORRELATION_DAYS};
pub use sentiment::{SentimentScorer, VaderScorer};
pub use stats::{pearson, PearsonResult};

#[cfg(test)]
mod tests {
    use super::*;

    /// Domain types cross the runner/CLI boundary by value; keep them thread-safe.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::PriceSeries>();
        require_sync::<domain::PriceSeries>();
        require_send::<domain::Headline>();
        require_sync::<domain::Headline>();
        require_send::<domain::DailySentiment>();
        require_sync::<domain::DailySentiment>();
        require_send::<domain::CombinedRow>();
        require_sync::<domain::CombinedRow>();
        require_send::<domain::CorrelationResult>();
        require_sync::<domain::CorrelationResult>();
        require_send::<domain::TickerOutcome>();
        require_sync::<domain::TickerOutcome>();
        require_send::<data::DataError>();
        require_sync::<data::DataError>();
    }

    /// Scoring is a pure function of text: the trait takes no ticker or date.
    #[test]
    fn scorer_trait_object_builds() {
        fn _score(s: &dyn SentimentScorer) -> f64 {
            s.compound("flat")
        }
        let vader = VaderScorer::new();
        assert_eq!(_score(&vader), vader.compound("flat"));
    }
}
