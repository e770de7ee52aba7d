//! Domain types for NewsLab.

pub mod combined;
pub mod headline;
pub mod price;

pub use combined::{CombinedRow, CorrelationResult, OutcomeStatus, TickerOutcome};
pub use headline::{DailySentiment, Headline};
pub use price::{PriceBar, PriceSeries};

/// Ticker symbol type alias.
pub type Ticker = String;
