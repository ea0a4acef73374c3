// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! In-process remote store.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use cardsync_core::document::{apply_patch, matches_all};
use cardsync_core::{Collection, Document, Filter};

use super::{RemoteError, RemoteFuture, RemoteResult, RemoteStore};

type Key = (Collection, String);

/// A [`RemoteStore`] holding documents in memory.
///
/// Query results are ordered by document id.
#[derive(Default)]
pub struct MemoryRemote {
    docs: Mutex<HashMap<Key, Document>>,
}

impl MemoryRemote {
    pub fn new() -> Self {
        Self::default()
    }

    fn docs(&self) -> RemoteResult<MutexGuard<'_, HashMap<Key, Document>>> {
        self.docs
            .lock()
            .map_err(|_| RemoteError::Unavailable("memory store lock poisoned".to_string()))
    }

    /// Seed a document directly.
    pub fn insert(&self, collection: Collection, id: &str, data: Document) -> RemoteResult<()> {
        self.docs()?.insert((collection, id.to_string()), data);
        Ok(())
    }

    /// Synchronous lookup.
    pub fn snapshot(&self, collection: Collection, id: &str) -> RemoteResult<Option<Document>> {
        Ok(self.docs()?.get(&(collection, id.to_string())).cloned())
    }

    /// Number of documents in a collection.
    pub fn count(&self, collection: Collection) -> RemoteResult<usize> {
        Ok(self.docs()?.keys().filter(|(c, _)| *c == collection).count())
    }

    fn update_sync(
        &self,
        collection: Collection,
        id: &str,
        patch: &Document,
    ) -> RemoteResult<()> {
        let mut docs = self.docs()?;
        match docs.get_mut(&(collection, id.to_string())) {
            Some(doc) => {
                apply_patch(doc, patch);
                Ok(())
            }
            None => Err(RemoteError::NotFound {
                collection,
                id: id.to_string(),
            }),
        }
    }

    fn delete_sync(&self, collection: Collection, id: &str) -> RemoteResult<()> {
        self.docs()?.remove(&(collection, id.to_string()));
        Ok(())
    }

    fn query_sync(
        &self,
        collection: Collection,
        filters: &[Filter],
    ) -> RemoteResult<Vec<Document>> {
        let docs = self.docs()?;
        let mut found: Vec<(&str, &Document)> = docs
            .iter()
            .filter(|((c, _), doc)| *c == collection && matches_all(doc, filters))
            .map(|((_, id), doc)| (id.as_str(), doc))
            .collect();
        found.sort_by(|a, b| a.0.cmp(b.0));
        Ok(found.into_iter().map(|(_, doc)| doc.clone()).collect())
    }
}

impl RemoteStore for MemoryRemote {
    fn get_document<'a>(
        &'a self,
        collection: Collection,
        id: &'a str,
    ) -> RemoteFuture<'a, Option<Document>> {
        Box::pin(async move { self.snapshot(collection, id) })
    }

    fn set_document<'a>(
        &'a self,
        collection: Collection,
        id: &'a str,
        data: Document,
    ) -> RemoteFuture<'a, ()> {
        Box::pin(async move { self.insert(collection, id, data) })
    }

    fn update_document<'a>(
        &'a self,
        collection: Collection,
        id: &'a str,
        patch: Document,
    ) -> RemoteFuture<'a, ()> {
        Box::pin(async move { self.update_sync(collection, id, &patch) })
    }

    fn delete_document<'a>(&'a self, collection: Collection, id: &'a str) -> RemoteFuture<'a, ()> {
        Box::pin(async move { self.delete_sync(collection, id) })
    }

    fn query_collection<'a>(
        &'a self,
        collection: Collection,
        filters: Vec<Filter>,
    ) -> RemoteFuture<'a, Vec<Document>> {
        Box::pin(async move { self.query_sync(collection, &filters) })
    }
}
