//! Upstream data access: provider traits, the Polygon client, and the two
//! loaders that turn raw responses into domain series.

pub mod news;
pub mod polygon;
pub mod prices;
pub mod provider;

pub use news::{aggregate_daily, extract_headlines, parse_publish_date, score_article};
pub use polygon::PolygonClient;
pub use prices::{load_prices, price_series_from_raw};
pub use provider::{DataError, MarketDataProvider, NewsProvider, Published, RawArticle, RawBar};
