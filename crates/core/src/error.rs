// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for cardsync-core operations.

use thiserror::Error;

/// All possible errors that can occur in cardsync-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid entity kind: '{0}'\n  hint: valid kinds are: board, list, card")]
    InvalidEntityKind(String),

    #[error("invalid verb: '{0}'\n  hint: valid verbs are: create, update, delete")]
    InvalidVerb(String),

    #[error("invalid action: '{0}'\n  hint: actions look like 'card:update'")]
    InvalidAction(String),

    #[error("invalid collection: '{0}'\n  hint: valid collections are: boards, lists, cards")]
    InvalidCollection(String),

    #[error("invalid role: '{0}'\n  hint: valid roles are: owner, admin, member, observer")]
    InvalidRole(String),

    #[error("invalid filter operator: '{0}'\n  hint: valid operators are: ==, !=, <, <=, >, >=")]
    InvalidFilterOp(String),

    #[error("document is not a JSON object")]
    NotAnObject,

    #[error("document has no string 'id' field")]
    MissingDocumentId,

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for cardsync-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
