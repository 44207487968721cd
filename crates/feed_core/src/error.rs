use thiserror::Error;

/// Errors raised while configuring, generating or exporting a feed.
///
/// Configuration problems are fatal: a run never starts with a table or
/// window that failed validation.
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("{table}: {weights} weights for {labels} outcomes")]
    WeightMismatch {
        table: &'static str,
        labels: usize,
        weights: usize,
    },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
    #[error("{path} has no '{column}' column")]
    MissingKeyColumn { path: String, column: &'static str },
    #[error("schema mismatch: {0}")]
    Schema(String),
}

pub type FeedResult<T> = Result<T, FeedError>;
