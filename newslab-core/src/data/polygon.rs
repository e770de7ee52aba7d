//! Polygon.io REST provider.
//!
//! Serves both daily aggregates (`/v2/aggs`) and ticker news
//! (`/v2/reference/news`) with the same API key. Responses are paginated via
//! `next_url`; pages are followed until the per-call cap is reached.
//!
//! There is no retry. A transport failure or non-2xx status is returned as a
//! `DataError` and ends the run.

use super::provider::{DataError, MarketDataProvider, NewsProvider, Published, RawArticle, RawBar};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.polygon.io";

/// Maximum bars requested per aggregates call.
pub const DEFAULT_BAR_LIMIT: usize = 50_000;

/// Maximum articles requested per news call.
pub const DEFAULT_NEWS_LIMIT: usize = 1_000;

// The news endpoint rejects page sizes above this.
const NEWS_PAGE_MAX: usize = 1_000;

#[derive(Debug, Deserialize)]
struct AggsResponse {
    results: Option<Vec<AggBar>>,
    next_url: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AggBar {
    #[serde(rename = "t")]
    timestamp_ms: i64,
    #[serde(rename = "c")]
    close: f64,
}

#[derive(Debug, Deserialize)]
struct NewsResponse {
    results: Option<Vec<NewsArticle>>,
    next_url: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NewsArticle {
    title: Option<String>,
    description: Option<String>,
    published_utc: Published,
}

/// One page of a paginated listing.
trait Page: DeserializeOwned {
    type Item;

    fn into_parts(self) -> Result<(Vec<Self::Item>, Option<String>), DataError>;
}

impl Page for AggsResponse {
    type Item = RawBar;

    fn into_parts(self) -> Result<(Vec<RawBar>, Option<String>), DataError> {
        if let Some(err) = self.error {
            return Err(DataError::ResponseFormatChanged(err));
        }
        let bars = self
            .results
            .unwrap_or_default()
            .into_iter()
            .map(|b| RawBar {
                timestamp_ms: b.timestamp_ms,
                close: b.close,
            })
            .collect();
        Ok((bars, self.next_url))
    }
}

impl Page for NewsResponse {
    type Item = RawArticle;

    fn into_parts(self) -> Result<(Vec<RawArticle>, Option<String>), DataError> {
        if let Some(err) = self.error {
            return Err(DataError::ResponseFormatChanged(err));
        }
        let articles = self
            .results
            .unwrap_or_default()
            .into_iter()
            .map(|a| RawArticle {
                title: a.title,
                description: a.description,
                published: a.published_utc,
            })
            .collect();
        Ok((articles, self.next_url))
    }
}

/// Blocking Polygon client.
pub struct PolygonClient {
    client: reqwest::blocking::Client,
    api_key: String,
    base_url: String,
    bar_limit: usize,
    news_limit: usize,
}

impl PolygonClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| DataError::NetworkUnreachable(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            bar_limit: DEFAULT_BAR_LIMIT,
            news_limit: DEFAULT_NEWS_LIMIT,
        })
    }

    /// Point the client at a different host (tests, proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Override the per-call caps on bars and articles.
    pub fn with_limits(mut self, bar_limit: usize, news_limit: usize) -> Self {
        self.bar_limit = bar_limit.max(1);
        self.news_limit = news_limit.max(1);
        self
    }

    fn aggs_url(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> String {
        format!(
            "{}/v2/aggs/ticker/{ticker}/range/1/day/{start}/{end}\
             ?adjusted=true&sort=asc&limit={}",
            self.base_url, self.bar_limit
        )
    }

    fn news_url(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> String {
        format!(
            "{}/v2/reference/news?ticker={ticker}\
             &published_utc.gte={start}&published_utc.lte={end}\
             &order=asc&limit={}",
            self.base_url,
            self.news_limit.min(NEWS_PAGE_MAX)
        )
    }

    /// GET one page. The API key is attached as a query parameter so it
    /// never appears in the URLs we log or put in errors.
    fn get_page<P: Page>(&self, url: &str) -> Result<P, DataError> {
        tracing::debug!(url, "GET");

        let resp = self
            .client
            .get(url)
            .query(&[("apiKey", self.api_key.as_str())])
            .send()
            .map_err(|e| DataError::NetworkUnreachable(e.to_string()))?;

        let status = resp.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(DataError::AuthenticationRequired(format!(
                "Polygon rejected the API key (HTTP {})",
                status.as_u16()
            )));
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = resp
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(60);
            return Err(DataError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        if !status.is_success() {
            return Err(DataError::Http {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        resp.json::<P>().map_err(|e| {
            DataError::ResponseFormatChanged(format!("failed to parse response from {url}: {e}"))
        })
    }

    /// Follow `next_url` until `cap` items are collected or the listing ends.
    fn collect_pages<P: Page>(&self, first_url: String, cap: usize) -> Result<Vec<P::Item>, DataError> {
        let mut items = Vec::new();
        let mut next = Some(first_url);
        let mut pages = 0usize;

        while let Some(url) = next.take() {
            let page: P = self.get_page(&url)?;
            let (mut batch, next_url) = page.into_parts()?;
            pages += 1;

            // An empty page with a cursor would loop forever.
            let empty = batch.is_empty();
            items.append(&mut batch);

            if items.len() >= cap {
                items.truncate(cap);
                break;
            }
            if !empty {
                next = next_url;
            }
        }

        tracing::debug!(pages, items = items.len(), "pagination complete");
        Ok(items)
    }
}

impl MarketDataProvider for PolygonClient {
    fn name(&self) -> &str {
        "polygon"
    }

    fn daily_bars(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RawBar>, DataError> {
        let url = self.aggs_url(ticker, start, end);
        self.collect_pages::<AggsResponse>(url, self.bar_limit)
    }
}

impl NewsProvider for PolygonClient {
    fn name(&self) -> &str {
        "polygon"
    }

    fn articles(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RawArticle>, DataError> {
        let url = self.news_url(ticker, start, end);
        self.collect_pages::<NewsResponse>(url, self.news_limit)
    }
}
