// crates/larder-core/src/error.rs

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("missing input file: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("unsupported file format '{}' for {}", .extension, .path.display())]
    UnsupportedFormat { path: PathBuf, extension: String },

    #[error("schema validation failed for '{table}': {reason}")]
    Validation { table: String, reason: String },

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars operation failed: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Spreadsheet parsing failed: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("Data processing error: {0}")]
    Processing(String),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
