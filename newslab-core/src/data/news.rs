//! Sentiment extractor: raw articles → scored headlines → daily means.

use super::prices::bar_date;
use super::provider::{DataError, NewsProvider, Published, RawArticle};
use crate::domain::{DailySentiment, Headline};
use crate::sentiment::{article_text, SentimentScorer};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;

/// Resolve an article's publish timestamp to a UTC calendar date.
///
/// Accepts epoch milliseconds, RFC 3339 (`2024-01-02T13:00:00Z`,
/// `...+02:00`), naive ISO datetimes (`2024-01-02T13:00:00`, optional
/// fractional seconds) and bare dates (`2024-01-02`).
pub fn parse_publish_date(published: &Published) -> Result<NaiveDate, DataError> {
    match published {
        Published::EpochMillis(ms) => bar_date(*ms),
        Published::Text(raw) => {
            let s = raw.trim();
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Ok(dt.naive_utc().date());
            }
            for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
                if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
                    return Ok(dt.date());
                }
            }
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map_err(|_| DataError::InvalidTimestamp(raw.clone()))
        }
    }
}

/// Score one article for `ticker`.
pub fn score_article(
    scorer: &dyn SentimentScorer,
    ticker: &str,
    article: &RawArticle,
) -> Result<Headline, DataError> {
    let date = parse_publish_date(&article.published)?;
    let text = article_text(article.title.as_deref(), article.description.as_deref());
    Ok(Headline {
        date,
        ticker: ticker.to_string(),
        title: article.title.clone().unwrap_or_default(),
        sentiment: scorer.compound(&text),
    })
}

/// Fetch and score every article for `ticker` in range.
///
/// No articles is an empty vector, not an error.
pub fn extract_headlines(
    provider: &dyn NewsProvider,
    scorer: &dyn SentimentScorer,
    ticker: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<Headline>, DataError> {
    let articles = provider.articles(ticker, start, end)?;
    tracing::debug!(ticker, provider = provider.name(), articles = articles.len(), "fetched news");
    articles
        .iter()
        .map(|a| score_article(scorer, ticker, a))
        .collect()
}

/// Mean sentiment per (date, ticker), ordered by date then ticker.
pub fn aggregate_daily(headlines: &[Headline]) -> Vec<DailySentiment> {
    let mut groups: BTreeMap<(NaiveDate, &str), (f64, usize)> = BTreeMap::new();
    for h in headlines {
        let entry = groups.entry((h.date, h.ticker.as_str())).or_insert((0.0, 0));
        entry.0 += h.sentiment;
        entry.1 += 1;
    }

    groups
        .into_iter()
        .map(|((date, ticker), (sum, count))| DailySentiment {
            date,
            ticker: ticker.to_string(),
            sentiment: sum / count as f64,
            headline_count: count,
        })
        .collect()
}
