//! Error types shared by every estimator in the crate.

use thiserror::Error;

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Row or column counts of two inputs disagree.
    #[error("dimension mismatch in {context}: expected {expected}, got {actual}")]
    DimensionMismatch {
        context: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid labels: {0}")]
    InvalidLabels(String),

    #[error("empty input: {0}")]
    EmptyInput(String),

    #[error("{0} not fitted, call fit() first")]
    NotFitted(&'static str),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// A CSV cell could not be turned into a number.
    #[error("line {line}, column `{column}`: cannot parse `{value}`")]
    Parse {
        line: usize,
        column: String,
        value: String,
    },

    #[error("column `{0}` not found in header")]
    MissingColumn(String),
}

impl Error {
    pub(crate) fn mismatch(context: &'static str, expected: usize, actual: usize) -> Self {
        Error::DimensionMismatch {
            context,
            expected,
            actual,
        }
    }
}
