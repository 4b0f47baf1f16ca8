//! Error types for speedup-report.

use plotters::drawing::DrawingAreaErrorKind;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Every way a run can abort. None of these are retried: the pipeline is
/// deterministic, so a second attempt would fail the same way.
#[derive(Error, Debug)]
pub enum Error {
    /// The input path given on the command line does not exist
    #[error("CSV file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// Required columns are absent from the input table
    #[error("CSV must contain columns {missing:?}")]
    Schema { missing: Vec<String> },

    /// A field could not be coerced to its expected type
    #[error("row {row}: cannot read {column} from {value:?}")]
    Data {
        row: usize,
        column: &'static str,
        value: String,
    },

    /// The measurement set has no rows, so there is nothing to compare against
    #[error("measurement set is empty")]
    Empty,

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Drawing or image encoding failed
    #[error("render error: {0}")]
    Render(String),
}

impl<E> From<DrawingAreaErrorKind<E>> for Error
where
    E: std::error::Error + Send + Sync,
{
    fn from(e: DrawingAreaErrorKind<E>) -> Self {
        Error::Render(e.to_string())
    }
}

impl From<tempfile::PersistError> for Error {
    fn from(e: tempfile::PersistError) -> Self {
        Error::Io(e.error)
    }
}
