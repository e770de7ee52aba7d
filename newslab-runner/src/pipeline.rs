//! The four-stage analysis run.
//!
//! Stages run in order, each over every ticker before the next begins:
//!
//! 1. price loader: daily closes and returns
//! 2. sentiment extractor: scored headlines, averaged per day
//! 3. correlator: join, correlate, write `<TICKER>_daily_data.csv`, then the
//!    run summary (the results table is reported at this point)
//! 4. reporter: re-read each CSV from disk and render its chart
//!
//! Stage 4 only sees what stage 3 persisted, so `render_reports` can rebuild
//! the charts later without touching the network.

use std::path::PathBuf;

use newslab_core::data::{aggregate_daily, extract_headlines, load_prices, DataError};
use newslab_core::data::{MarketDataProvider, NewsProvider};
use newslab_core::domain::{DailySentiment, PriceSeries};
use newslab_core::{combine, correlate_with_threshold, SentimentScorer};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::{AnalysisConfig, ConfigError};
use crate::export::{
    chart_path, daily_data_path, read_combined_csv, read_summary, summary_path,
    write_combined_csv, write_summary, ExportError, RunSummary, SCHEMA_VERSION,
};
use crate::progress::ProgressReporter;
use crate::reporting::{render_chart, ReportError};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{ticker}: {source}")]
    Data {
        ticker: String,
        #[source]
        source: DataError,
    },

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Report(#[from] ReportError),
}

fn data_error(ticker: &str) -> impl FnOnce(DataError) -> PipelineError {
    let ticker = ticker.to_string();
    move |source| PipelineError::Data { ticker, source }
}

/// What a completed run produced.
#[derive(Debug)]
pub struct AnalysisReport {
    pub summary: RunSummary,
    pub summary_path: PathBuf,
    pub tables: Vec<PathBuf>,
    pub charts: Vec<PathBuf>,
}

/// Run all four stages for every configured ticker.
///
/// The first provider or file error aborts the run. A ticker with too few rows
/// is not an error: its table is still written, its chart still rendered, and
/// its outcome recorded in the summary.
pub fn run_analysis(
    config: &AnalysisConfig,
    market: &dyn MarketDataProvider,
    news: &dyn NewsProvider,
    scorer: &dyn SentimentScorer,
    progress: &dyn ProgressReporter,
) -> Result<AnalysisReport, PipelineError> {
    config.validate()?;
    let (start, end) = (config.start_date, config.end_date);

    info!(tickers = config.tickers.len(), %start, %end, "loading prices");
    let mut prices: Vec<PriceSeries> = Vec::with_capacity(config.tickers.len());
    for ticker in &config.tickers {
        let series = load_prices(market, ticker, start, end).map_err(data_error(ticker))?;
        progress.on_prices(ticker, series.len());
        prices.push(series);
    }

    info!("extracting headline sentiment");
    let mut sentiment: Vec<DailySentiment> = Vec::new();
    for ticker in &config.tickers {
        let headlines =
            extract_headlines(news, scorer, ticker, start, end).map_err(data_error(ticker))?;
        progress.on_headlines(ticker, headlines.len());
        sentiment.extend(aggregate_daily(&headlines));
    }

    info!("correlating");
    let mut outcomes = Vec::with_capacity(config.tickers.len());
    let mut results = Vec::new();
    let mut tables = Vec::with_capacity(config.tickers.len());
    for (ticker, series) in config.tickers.iter().zip(&prices) {
        let rows = combine(ticker, series, &sentiment);
        let (outcome, result) = correlate_with_threshold(ticker, &rows, config.min_correlation_days);
        let path = write_combined_csv(&config.output_dir, ticker, &rows)?;
        progress.on_exported(ticker, &outcome, &path);

        if !outcome.is_correlated() {
            warn!(ticker = %ticker, reason = %outcome.describe(), "left out of correlation table");
        }
        tables.push(path);
        outcomes.push(outcome);
        results.extend(result);
    }

    let summary = RunSummary {
        schema_version: SCHEMA_VERSION,
        tickers: config.tickers.clone(),
        start_date: start,
        end_date: end,
        min_correlation_days: config.min_correlation_days,
        outcomes,
        results,
    };
    let summary_path = write_summary(&config.output_dir, &summary)?;
    progress.on_summary(&summary, &summary_path);

    let charts = render_charts(config, &summary, progress)?;
    info!(charts = charts.len(), "analysis complete");

    Ok(AnalysisReport {
        summary,
        summary_path,
        tables,
        charts,
    })
}

/// Re-render every chart from the tables and summary already in
/// `config.output_dir`. No provider is consulted.
pub fn render_reports(
    config: &AnalysisConfig,
    progress: &dyn ProgressReporter,
) -> Result<AnalysisReport, PipelineError> {
    config.validate()?;
    let summary = read_summary(&config.output_dir)?;
    let summary_path = summary_path(&config.output_dir);
    progress.on_summary(&summary, &summary_path);

    let charts = render_charts(config, &summary, progress)?;
    let tables = summary
        .tickers
        .iter()
        .map(|t| daily_data_path(&config.output_dir, t))
        .collect();
    Ok(AnalysisReport {
        summary_path,
        summary,
        tables,
        charts,
    })
}

fn render_charts(
    config: &AnalysisConfig,
    summary: &RunSummary,
    progress: &dyn ProgressReporter,
) -> Result<Vec<PathBuf>, PipelineError> {
    info!("rendering charts");
    let dir = &config.output_dir;
    let mut charts = Vec::with_capacity(summary.tickers.len());
    for ticker in &summary.tickers {
        let rows = read_combined_csv(&daily_data_path(dir, ticker))?;
        let correlation = summary.result_for(ticker).map(|r| r.correlation);
        let path = chart_path(dir, ticker);
        render_chart(&rows, ticker, correlation, &config.chart, &path)?;
        progress.on_chart(ticker, &path);
        charts.push(path);
    }
    Ok(charts)
}
