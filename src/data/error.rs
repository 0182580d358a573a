use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// The source could not be turned into a [`Dataset`](super::model::Dataset).
/// Fatal for that source: nothing is partially loaded.
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("parsing JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("reading parquet: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("reading arrow batch: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("source is missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("column '{column}' has unsupported type {data_type}")]
    UnsupportedColumnType { column: &'static str, data_type: String },

    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    #[error("no titles left after cleaning")]
    NoTitles,
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// A selection that references values outside the dataset's domain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidSelectionError {
    #[error("content type '{0}' does not occur in the dataset")]
    UnknownContentType(String),

    #[error("year range is inverted: {low} > {high}")]
    InvertedYearRange { low: i32, high: i32 },
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Raised only by consumers that need at least one filtered title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no titles match the current filters")]
pub struct EmptyAggregationError;
