//! NewsLab CLI — correlate daily news sentiment with daily stock returns.
//!
//! Commands:
//! - `run`: fetch prices and news, score, correlate, write CSV/PNG/JSON artifacts
//! - `report`: re-render charts and the results table from existing artifacts

use anyhow::Result;
use clap::{Parser, Subcommand};
use newslab_core::data::PolygonClient;
use newslab_core::VaderScorer;
use newslab_runner::{
    api_key_from_env, render_reports, run_analysis, AnalysisConfig, StdoutProgress,
};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "newslab",
    about = "NewsLab CLI — news sentiment vs daily stock returns"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full analysis against Polygon.io.
    Run {
        /// Path to a TOML config file. Defaults to the built-in tickers and dates.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output directory for CSV, PNG and summary files.
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Re-render charts and the results table from a previous run's files.
    Report {
        /// Path to a TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Directory holding the previous run's files.
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config, output_dir } => run_cmd(config, output_dir),
        Commands::Report { config, output_dir } => report_cmd(config, output_dir),
    }
}

fn load_config(path: Option<PathBuf>, output_dir: Option<PathBuf>) -> Result<AnalysisConfig> {
    let mut config = match path {
        Some(p) => AnalysisConfig::from_file(&p)?,
        None => AnalysisConfig::default(),
    };
    if let Some(dir) = output_dir {
        config.output_dir = dir;
    }
    config.validate()?;
    Ok(config)
}

fn run_cmd(config_path: Option<PathBuf>, output_dir: Option<PathBuf>) -> Result<()> {
    let config = load_config(config_path, output_dir)?;
    let api_key = api_key_from_env()?;

    info!(
        tickers = ?config.tickers,
        start = %config.start_date,
        end = %config.end_date,
        "starting analysis"
    );

    let client = PolygonClient::new(api_key)?.with_limits(config.bar_limit, config.news_limit);
    let scorer = VaderScorer::new();
    let report = run_analysis(&config, &client, &client, &scorer, &StdoutProgress)?;

    info!(charts = report.charts.len(), tables = report.tables.len(), "run finished");
    println!("\nAnalysis complete! Check the generated PNG files and CSV files.");
    Ok(())
}

fn report_cmd(config_path: Option<PathBuf>, output_dir: Option<PathBuf>) -> Result<()> {
    let config = load_config(config_path, output_dir)?;
    let report = render_reports(&config, &StdoutProgress)?;
    info!(charts = report.charts.len(), "charts re-rendered");
    Ok(())
}
