//! Bookmark error types

use thiserror::Error;

use crate::decode::DecodeError;

#[derive(Error, Debug)]
pub enum BookmarksError {
    #[error("Storage error: {0}")]
    Storage(#[from] vela_storage::StorageError),

    #[error("Invalid bookmark row: {0}")]
    Decode(#[from] DecodeError),

    #[error("Query failed: {0}")]
    Query(String),
}
