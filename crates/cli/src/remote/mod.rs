// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Remote document store contract and its implementations.
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────────┐
//! │ SyncEngine  │────►│ RemoteStore  │────►│ cardsync-remote  │
//! │ Archive mgr │◄────│   (trait)    │◄────│     server       │
//! └─────────────┘     └──────────────┘     └──────────────────┘
//!                       │          │
//!              WebSocketRemote  MemoryRemote
//! ```
//!
//! Implementations are object safe so callers can hold an
//! `Arc<dyn RemoteStore>` as well as a concrete type.

mod detached;
mod memory;
mod websocket;

pub use detached::Detached;
pub use memory::MemoryRemote;
pub use websocket::{WebSocketConfig, WebSocketRemote};

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use cardsync_core::protocol::FailureKind;
use cardsync_core::{Collection, Document, Filter};

/// Error type for remote store operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RemoteError {
    /// The target document does not exist.
    #[error("{collection}/{id} not found")]
    NotFound { collection: Collection, id: String },

    /// The store could not be reached or did not answer in time.
    #[error("unavailable: {0}")]
    Unavailable(String),

    /// The store refused the request.
    #[error("rejected: {0}")]
    Rejected(String),

    /// The store answered with something we did not expect.
    #[error("protocol error: {0}")]
    Protocol(String),
}

impl RemoteError {
    /// Build an error from a typed server failure.
    pub(crate) fn from_failure(
        kind: FailureKind,
        message: String,
        collection: Collection,
        id: Option<&str>,
    ) -> Self {
        match (kind, id) {
            (FailureKind::NotFound, Some(id)) => RemoteError::NotFound {
                collection,
                id: id.to_string(),
            },
            (FailureKind::Invalid, _) => RemoteError::Rejected(message),
            _ => RemoteError::Unavailable(message),
        }
    }
}

/// Result type for remote store operations.
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Boxed future returned by [`RemoteStore`] methods.
pub type RemoteFuture<'a, T> = Pin<Box<dyn Future<Output = RemoteResult<T>> + Send + 'a>>;

/// The remote document store.
pub trait RemoteStore: Send + Sync {
    /// Fetch one document, `None` if absent.
    fn get_document<'a>(
        &'a self,
        collection: Collection,
        id: &'a str,
    ) -> RemoteFuture<'a, Option<Document>>;

    /// Create or replace a document.
    fn set_document<'a>(
        &'a self,
        collection: Collection,
        id: &'a str,
        data: Document,
    ) -> RemoteFuture<'a, ()>;

    /// Shallow-merge a patch into an existing document.
    ///
    /// A `null` value removes the field. Fails with
    /// [`RemoteError::NotFound`] if the document does not exist.
    fn update_document<'a>(
        &'a self,
        collection: Collection,
        id: &'a str,
        patch: Document,
    ) -> RemoteFuture<'a, ()>;

    /// Remove a document. Removing an absent document succeeds.
    fn delete_document<'a>(&'a self, collection: Collection, id: &'a str) -> RemoteFuture<'a, ()>;

    /// All documents of the collection matching every filter.
    fn query_collection<'a>(
        &'a self,
        collection: Collection,
        filters: Vec<Filter>,
    ) -> RemoteFuture<'a, Vec<Document>>;
}

impl<R: RemoteStore + ?Sized> RemoteStore for Arc<R> {
    fn get_document<'a>(
        &'a self,
        collection: Collection,
        id: &'a str,
    ) -> RemoteFuture<'a, Option<Document>> {
        (**self).get_document(collection, id)
    }

    fn set_document<'a>(
        &'a self,
        collection: Collection,
        id: &'a str,
        data: Document,
    ) -> RemoteFuture<'a, ()> {
        (**self).set_document(collection, id, data)
    }

    fn update_document<'a>(
        &'a self,
        collection: Collection,
        id: &'a str,
        patch: Document,
    ) -> RemoteFuture<'a, ()> {
        (**self).update_document(collection, id, patch)
    }

    fn delete_document<'a>(&'a self, collection: Collection, id: &'a str) -> RemoteFuture<'a, ()> {
        (**self).delete_document(collection, id)
    }

    fn query_collection<'a>(
        &'a self,
        collection: Collection,
        filters: Vec<Filter>,
    ) -> RemoteFuture<'a, Vec<Document>> {
        (**self).query_collection(collection, filters)
    }
}
