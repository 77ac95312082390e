//! Error types for loading play-by-play data and computing ratings.

use thiserror::Error;

/// Failures while reading or validating a play-by-play dataset.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing required column `{0}`")]
    MissingColumn(&'static str),

    /// A present cell held a value that cannot be interpreted.
    #[error("row {row}: invalid value {value:?} in column `{column}`: {reason}")]
    Validation {
        row: u64,
        column: &'static str,
        value: String,
        reason: &'static str,
    },
}

/// Failures raised by the rating transformer.
#[derive(Debug, Error, PartialEq)]
pub enum RatingError {
    /// No quarterback survived the minimum-play filter.
    #[error("no qualifying data: no quarterback reached the minimum play count")]
    InsufficientData,

    /// Standardization or min-max scaling is undefined for this population.
    #[error("degenerate distribution: {0}")]
    DegenerateDistribution(String),
}

/// Failures while fetching a dataset from a path or URL.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to fetch {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("failed to decompress {source_name}: {error}")]
    Gzip {
        source_name: String,
        error: std::io::Error,
    },
}
