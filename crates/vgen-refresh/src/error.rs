//! Refresh error types.
//!
//! Backend failures are absorbed per link and never show up here; these
//! errors only cover setting the refresher up.

use thiserror::Error;
use vgen_storage::StorageError;

/// Result type for refresh setup.
pub type RefreshResult<T> = Result<T, RefreshError>;

/// Errors that can occur while configuring a refresher.
#[derive(Debug, Error)]
pub enum RefreshError {
    #[error("Invalid refresh configuration: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl RefreshError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
