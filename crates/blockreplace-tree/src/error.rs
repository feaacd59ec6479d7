//! Error types for blockreplace-tree

use crate::block::BlockId;

/// Result type for blockreplace-tree operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by block stores
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Block not found: {id}")]
    BlockNotFound { id: BlockId },

    #[error("Block store unavailable: {message}")]
    StoreUnavailable { message: String },

    #[error("Update rejected for block {id}: {message}")]
    Rejected { id: BlockId, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
