// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use cardsync_core::{Collection, Document, Filter};

use super::{RemoteError, RemoteFuture, RemoteStore};

/// Stand-in used when no remote is configured. Every call is unavailable.
#[derive(Debug, Default, Clone, Copy)]
pub struct Detached;

fn unavailable<'a, T: Send + 'a>() -> RemoteFuture<'a, T> {
    Box::pin(async { Err(RemoteError::Unavailable("no remote configured".to_string())) })
}

impl RemoteStore for Detached {
    fn get_document<'a>(&'a self, _: Collection, _: &'a str) -> RemoteFuture<'a, Option<Document>> {
        unavailable()
    }

    fn set_document<'a>(&'a self, _: Collection, _: &'a str, _: Document) -> RemoteFuture<'a, ()> {
        unavailable()
    }

    fn update_document<'a>(
        &'a self,
        _: Collection,
        _: &'a str,
        _: Document,
    ) -> RemoteFuture<'a, ()> {
        unavailable()
    }

    fn delete_document<'a>(&'a self, _: Collection, _: &'a str) -> RemoteFuture<'a, ()> {
        unavailable()
    }

    fn query_collection<'a>(&'a self, _: Collection, _: Vec<Filter>) -> RemoteFuture<'a, Vec<Document>> {
        unavailable()
    }
}
