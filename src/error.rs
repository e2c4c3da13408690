//! Errors returned by board operations.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BoardError {
    /// Add-task rejected because the trimmed title is empty.
    #[error("Please enter a task title")]
    EmptyTitle,

    /// Clear-all or export attempted on an empty board.
    #[error("The board has no tasks")]
    EmptyCollection,

    /// Persisted or exported JSON could not be encoded or decoded.
    #[error("Invalid board data: {0}")]
    Decode(#[from] serde_json::Error),

    /// Reading or writing the backing store failed.
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),
}

pub type BoardResult<T> = Result<T, BoardError>;
