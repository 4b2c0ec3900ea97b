//! Crate-wide error type and result alias.

use thiserror::Error;

/// Errors surfaced by training, data loading and checkpointing.
#[derive(Debug, Error)]
pub enum KilnError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("dataset produced no batches")]
    EmptyDataset,

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, KilnError>;
