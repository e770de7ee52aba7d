//! NewsLab Runner — configuration, pipeline orchestration, flat-file artifacts.
//!
//! This crate builds on `newslab-core` to provide:
//! - `AnalysisConfig` with built-in defaults and TOML overrides
//! - API key lookup from the environment
//! - The four-stage run (prices, sentiment, correlation, charts)
//! - CSV tables and the JSON run summary
//! - PNG chart rendering and the console results table

pub mod config;
pub mod export;
pub mod pipeline;
pub mod progress;
pub mod reporting;

pub use config::{api_key_from, api_key_from_env, AnalysisConfig, ChartConfig, ConfigError};
pub use export::{
    chart_path, daily_data_path, read_combined_csv, read_summary, write_combined_csv,
    write_summary, ExportError, RunSummary,
};
pub use pipeline::{render_reports, run_analysis, AnalysisReport, PipelineError};
pub use progress::{NoProgress, ProgressReporter, StdoutProgress};
pub use reporting::{format_results_table, render_chart, ReportError};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn config_is_send_sync() {
        assert_send::<AnalysisConfig>();
        assert_sync::<AnalysisConfig>();
    }

    #[test]
    fn summary_is_send_sync() {
        assert_send::<RunSummary>();
        assert_sync::<RunSummary>();
    }

    #[test]
    fn errors_are_send_sync() {
        assert_send::<PipelineError>();
        assert_sync::<PipelineError>();
    }
}
