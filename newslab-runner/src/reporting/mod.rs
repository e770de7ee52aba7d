//! Chart rendering and console result tables.

pub mod canvas;
pub mod chart;
pub mod font;
pub mod table;

use std::path::PathBuf;

use thiserror::Error;

use crate::export::ExportError;

pub use chart::{correlation_label, draw_chart, render_chart};
pub use table::format_results_table;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to load combined table: {0}")]
    Table(#[from] ExportError),

    #[error("failed to write chart {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}
