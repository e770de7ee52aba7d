//! Analysis configuration and credential loading.
//!
//! `AnalysisConfig::default()` holds the built-in run: three tickers over a
//! fixed window. A TOML file may override any subset of fields; everything it
//! omits keeps the default.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable holding the market-data API key.
pub const API_KEY_VAR: &str = "POLYGON_API_KEY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),

    #[error(
        "POLYGON_API_KEY not found!\n\
         1. Create a file called .env in this folder\n\
         2. Add this line inside it:\n   \
            POLYGON_API_KEY=your_actual_key_here\n\
         3. Never commit .env to version control!"
    )]
    MissingApiKey,
}

/// Chart canvas size. Pixels = inches * dpi.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChartConfig {
    pub width_in: f64,
    pub height_in: f64,
    pub dpi: u32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width_in: 14.0,
            height_in: 10.0,
            dpi: 300,
        }
    }
}

impl ChartConfig {
    pub fn pixel_size(&self) -> (u32, u32) {
        let px = |inches: f64| (inches * self.dpi as f64).round().max(1.0) as u32;
        (px(self.width_in), px(self.height_in))
    }
}

/// Everything one analysis run needs, passed explicitly to each stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    pub tickers: Vec<String>,
    /// First calendar day requested (inclusive).
    pub start_date: NaiveDate,
    /// Last calendar day requested (inclusive).
    pub end_date: NaiveDate,
    /// Directory receiving CSV, PNG and summary artifacts.
    pub output_dir: PathBuf,
    /// Cap on bars per aggregates call.
    pub bar_limit: usize,
    /// Cap on articles per news call.
    pub news_limit: usize,
    /// Fewest joined rows for which a correlation is reported.
    pub min_correlation_days: usize,
    pub chart: ChartConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            tickers: vec!["AAPL".into(), "TSLA".into(), "NVDA".into()],
            start_date: NaiveDate::from_ymd_opt(2025, 9, 1).expect("valid date"),
            end_date: NaiveDate::from_ymd_opt(2026, 2, 25).expect("valid date"),
            output_dir: PathBuf::from("."),
            bar_limit: newslab_core::data::polygon::DEFAULT_BAR_LIMIT,
            news_limit: newslab_core::data::polygon::DEFAULT_NEWS_LIMIT,
            min_correlation_days: newslab_core::MIN_CORRELATION_DAYS,
            chart: ChartConfig::default(),
        }
    }
}

impl AnalysisConfig {
    /// Load and validate a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tickers.is_empty() {
            return Err(ConfigError::Invalid("tickers must not be empty".into()));
        }
        if let Some(bad) = self.tickers.iter().find(|t| !is_valid_ticker(t)) {
            return Err(ConfigError::Invalid(format!("invalid ticker symbol '{bad}'")));
        }
        let mut seen = HashSet::with_capacity(self.tickers.len());
        if let Some(dup) = self.tickers.iter().find(|t| !seen.insert(t.as_str())) {
            return Err(ConfigError::Invalid(format!("duplicate ticker '{dup}'")));
        }
        if self.start_date > self.end_date {
            return Err(ConfigError::Invalid(format!(
                "start_date {} is after end_date {}",
                self.start_date, self.end_date
            )));
        }
        if self.bar_limit == 0 || self.news_limit == 0 {
            return Err(ConfigError::Invalid("bar_limit and news_limit must be positive".into()));
        }
        if self.min_correlation_days < 3 {
            return Err(ConfigError::Invalid(
                "min_correlation_days must be at least 3".into(),
            ));
        }
        if self.chart.dpi == 0 || self.chart.width_in <= 0.0 || self.chart.height_in <= 0.0 {
            return Err(ConfigError::Invalid("chart size must be positive".into()));
        }
        Ok(())
    }
}

/// Ticker symbols end up in file names; keep them to a safe alphabet.
fn is_valid_ticker(t: &str) -> bool {
    !t.is_empty()
        && t.len() <= 16
        && t.chars().all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
        && !t.starts_with('.')
}

/// Read the API key from the process environment.
pub fn api_key_from_env() -> Result<String, ConfigError> {
    api_key_from(|name| std::env::var(name).ok())
}

/// Read the API key through `lookup`. Missing or blank is an error.
pub fn api_key_from(lookup: impl Fn(&str) -> Option<String>) -> Result<String, ConfigError> {
    lookup(API_KEY_VAR)
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .ok_or(ConfigError::MissingApiKey)
}
