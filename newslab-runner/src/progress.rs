//! Console progress for the pipeline stages.
//!
//! Progress lines are user-facing output, distinct from `tracing` diagnostics.
//! The pipeline reports through this trait so tests can run silently.

use newslab_core::domain::TickerOutcome;
use std::path::Path;

use crate::export::RunSummary;
use crate::reporting::format_results_table;

/// Callbacks fired as each stage finishes a ticker.
pub trait ProgressReporter {
    /// Called after a ticker's price series has been loaded.
    fn on_prices(&self, ticker: &str, trading_days: usize);

    /// Called after a ticker's headlines have been fetched and scored.
    fn on_headlines(&self, ticker: &str, headlines: usize);

    /// Called after a ticker's combined table has been written.
    fn on_exported(&self, ticker: &str, outcome: &TickerOutcome, path: &Path);

    /// Called once the run summary is on disk, before any chart is drawn.
    fn on_summary(&self, summary: &RunSummary, path: &Path);

    /// Called after a ticker's chart has been rendered.
    fn on_chart(&self, ticker: &str, path: &Path);
}

/// Prints progress to stdout.
pub struct StdoutProgress;

impl ProgressReporter for StdoutProgress {
    fn on_prices(&self, ticker: &str, trading_days: usize) {
        println!("{ticker}: {trading_days} trading days fetched");
    }

    fn on_headlines(&self, ticker: &str, headlines: usize) {
        println!("{ticker}: {headlines} headlines analyzed");
    }

    fn on_exported(&self, ticker: &str, outcome: &TickerOutcome, path: &Path) {
        if outcome.is_correlated() {
            println!("{ticker}: {} rows -> {}", outcome.rows, path.display());
        } else {
            println!(
                "{ticker}: {} rows -> {} (no correlation: {})",
                outcome.rows,
                path.display(),
                outcome.describe()
            );
        }
    }

    fn on_summary(&self, summary: &RunSummary, path: &Path) {
        println!("\n=== CORRELATION RESULTS ===");
        print!("{}", format_results_table(&summary.results, &summary.outcomes));
        println!("\nSummary: {}\n", path.display());
    }

    fn on_chart(&self, ticker: &str, path: &Path) {
        println!("{ticker}: chart -> {}", path.display());
    }
}

/// Swallows all progress events.
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn on_prices(&self, _: &str, _: usize) {}
    fn on_headlines(&self, _: &str, _: usize) {}
    fn on_exported(&self, _: &str, _: &TickerOutcome, _: &Path) {}
    fn on_summary(&self, _: &RunSummary, _: &Path) {}
    fn on_chart(&self, _: &str, _: &Path) {}
}
