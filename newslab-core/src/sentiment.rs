//! Compound sentiment scoring.
//!
//! The extractor only needs a number in [-1, 1] per text, so scoring sits
//! behind the `SentimentScorer` trait. `VaderScorer` is the production
//! implementation; tests substitute fixed-score scorers.

use vader_sentiment::SentimentIntensityAnalyzer;

/// Produces a compound polarity score in [-1, 1] for a piece of text.
pub trait SentimentScorer {
    fn compound(&self, text: &str) -> f64;
}

/// Lexicon-based VADER scorer.
pub struct VaderScorer {
    analyzer: SentimentIntensityAnalyzer<'static>,
}

impl VaderScorer {
    pub fn new() -> Self {
        Self {
            analyzer: SentimentIntensityAnalyzer::new(),
        }
    }
}

impl Default for VaderScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentScorer for VaderScorer {
    fn compound(&self, text: &str) -> f64 {
        if text.trim().is_empty() {
            return 0.0;
        }
        let scores = self.analyzer.polarity_scores(text);
        scores
            .get("compound")
            .copied()
            .unwrap_or(0.0)
            .clamp(-1.0, 1.0)
    }
}

/// Join title and description the way they are scored: `"title description"`.
///
/// Missing parts become empty strings, so a title-only article scores as
/// `"title "`; the trailing space carries no sentiment.
pub fn article_text(title: Option<&str>, description: Option<&str>) -> String {
    format!("{} {}", title.unwrap_or(""), description.unwrap_or(""))
}
