// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use cardsync_core::Collection;
use thiserror::Error;

use crate::remote::RemoteError;

/// All possible errors that can occur in the cardsync library.
///
/// `NotFound` and `InvalidState` are contract violations and are never
/// retried. `RemoteUnavailable` is transient; the sync engine retries it.
/// `StorageUnavailable` means the local cache cannot be used.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{collection}/{id} not found")]
    NotFound { collection: Collection, id: String },

    #[error("invalid state for {id}: {reason}")]
    InvalidState { id: String, reason: &'static str },

    #[error("remote unavailable: {0}")]
    RemoteUnavailable(String),

    #[error("local storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("table '{table}' has no index '{index}'")]
    UnknownIndex {
        table: &'static str,
        index: &'static str,
    },

    #[error("config error: {0}")]
    Config(String),

    #[error("{0}")]
    Core(#[from] cardsync_core::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for cardsync operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn card_not_found(id: &str) -> Self {
        Error::NotFound {
            collection: Collection::Cards,
            id: id.to_string(),
        }
    }

    /// Returns true for failures that may succeed when retried later.
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::RemoteUnavailable(_))
    }
}

impl From<rusqlite::Error> for Error {
    fn from(e: rusqlite::Error) -> Self {
        Error::StorageUnavailable(e.to_string())
    }
}

impl From<RemoteError> for Error {
    fn from(e: RemoteError) -> Self {
        match e {
            RemoteError::NotFound { collection, id } => Error::NotFound { collection, id },
            other => Error::RemoteUnavailable(other.to_string()),
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
