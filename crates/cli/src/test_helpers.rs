// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers: a recording remote with fault injection and fixtures.

#![allow(clippy::unwrap_used)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use cardsync_core::document::to_document;
use cardsync_core::{Board, Card, Collection, Document, Entity, Filter, List};
use chrono::{DateTime, TimeZone, Utc};

use crate::db::{Database, LocalStore, SyncQueue};
use crate::network::NetworkMonitor;
use crate::remote::{MemoryRemote, RemoteError, RemoteFuture, RemoteResult, RemoteStore};

/// One recorded remote call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub op: &'static str,
    pub collection: Collection,
    pub id: String,
}

/// [`MemoryRemote`] that records every call and can be told to fail.
///
/// Failing calls are recorded but leave the store untouched.
#[derive(Default)]
pub struct MockRemote {
    pub inner: MemoryRemote,
    calls: Mutex<Vec<Call>>,
    fail_ids: Mutex<HashSet<String>>,
    fail_all: Mutex<bool>,
}

impl MockRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make calls touching `id` fail as unavailable.
    ///
    /// `"c1"` fails every call on c1, `"update:c1"` only its updates.
    pub fn fail_id(&self, id: &str) {
        self.fail_ids.lock().unwrap().insert(id.to_string());
    }

    pub fn heal_id(&self, id: &str) {
        self.fail_ids.lock().unwrap().remove(id);
    }

    pub fn set_fail_all(&self, fail: bool) {
        *self.fail_all.lock().unwrap() = fail;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// `op:id` for every write call, in order.
    pub fn writes(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c.op, "set" | "update" | "delete"))
            .map(|c| format!("{}:{}", c.op, c.id))
            .collect()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// Seed an entity without recording a call.
    pub fn seed<E: Entity>(&self, entity: &E) {
        self.inner
            .insert(E::KIND.collection(), entity.id(), to_document(entity).unwrap())
            .unwrap();
    }

    /// Read an entity back without recording a call.
    pub fn stored<E: Entity>(&self, id: &str) -> Option<E> {
        self.inner
            .snapshot(E::KIND.collection(), id)
            .unwrap()
            .map(|doc| cardsync_core::document::from_document(doc).unwrap())
    }

    fn record(&self, op: &'static str, collection: Collection, id: &str) -> RemoteResult<()> {
        self.calls.lock().unwrap().push(Call {
            op,
            collection,
            id: id.to_string(),
        });
        let fail_ids = self.fail_ids.lock().unwrap();
        let targeted = fail_ids.contains(id) || fail_ids.contains(&format!("{op}:{id}"));
        drop(fail_ids);
        if targeted || *self.fail_all.lock().unwrap() {
            return Err(RemoteError::Unavailable("injected failure".to_string()));
        }
        Ok(())
    }
}

impl RemoteStore for MockRemote {
    fn get_document<'a>(
        &'a self,
        collection: Collection,
        id: &'a str,
    ) -> RemoteFuture<'a, Option<Document>> {
        Box::pin(async move {
            self.record("get", collection, id)?;
            self.inner.get_document(collection, id).await
        })
    }

    fn set_document<'a>(
        &'a self,
        collection: Collection,
        id: &'a str,
        data: Document,
    ) -> RemoteFuture<'a, ()> {
        Box::pin(async move {
            self.record("set", collection, id)?;
            self.inner.set_document(collection, id, data).await
        })
    }

    fn update_document<'a>(
        &'a self,
        collection: Collection,
        id: &'a str,
        patch: Document,
    ) -> RemoteFuture<'a, ()> {
        Box::pin(async move {
            self.record("update", collection, id)?;
            self.inner.update_document(collection, id, patch).await
        })
    }

    fn delete_document<'a>(&'a self, collection: Collection, id: &'a str) -> RemoteFuture<'a, ()> {
        Box::pin(async move {
            self.record("delete", collection, id)?;
            self.inner.delete_document(collection, id).await
        })
    }

    fn query_collection<'a>(
        &'a self,
        collection: Collection,
        filters: Vec<Filter>,
    ) -> RemoteFuture<'a, Vec<Document>> {
        Box::pin(async move {
            self.record("query", collection, "*")?;
            self.inner.query_collection(collection, filters).await
        })
    }
}

/// In-memory cache, queue and monitor sharing one database.
pub struct Harness {
    pub network: Arc<NetworkMonitor>,
    pub store: Arc<LocalStore>,
    pub queue: Arc<SyncQueue>,
    pub remote: Arc<MockRemote>,
}

impl Harness {
    pub fn new(online: bool) -> Self {
        let db = Arc::new(Database::open_in_memory().unwrap());
        let network = Arc::new(NetworkMonitor::new(online));
        Harness {
            store: Arc::new(LocalStore::new(Arc::clone(&db), Arc::clone(&network))),
            queue: Arc::new(SyncQueue::new(db).unwrap()),
            network,
            remote: Arc::new(MockRemote::new()),
        }
    }
}

pub fn ts(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, day, 9, 0, 0).unwrap()
}

pub fn board(id: &str) -> Board {
    Board::new(id.to_string(), format!("Board {id}"), "u1".to_string(), ts(1))
}

pub fn list(id: &str, board_id: &str, position: f64) -> List {
    List::new(
        id.to_string(),
        board_id.to_string(),
        format!("List {id}"),
        position,
    )
}

pub fn card(id: &str, board_id: &str, list_id: &str, position: f64) -> Card {
    Card::new(
        id.to_string(),
        board_id.to_string(),
        list_id.to_string(),
        format!("Card {id}"),
        position,
        "u1".to_string(),
        ts(1),
    )
}
