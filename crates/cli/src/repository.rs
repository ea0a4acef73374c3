// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Offline-aware write path.
//!
//! Every write lands in the local cache first. When online, and no earlier
//! mutation of the same record is still queued, it is applied remotely
//! right away; otherwise it is queued for the sync engine. Queuing behind
//! pending items keeps a record's mutations in order.

use std::sync::Arc;

use cardsync_core::document::{from_document, to_document};
use cardsync_core::{Board, Card, Entity, EntityKind, Filter, List, Verb};
use chrono::Utc;
use serde_json::json;

use crate::db::{Index, LocalStore, SyncQueue};
use crate::error::Result;
use crate::network::NetworkMonitor;
use crate::remote::{RemoteResult, RemoteStore};

/// Where a write ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Applied to the remote store.
    Synced,
    /// Queued for the next drain.
    Queued,
}

/// Reads from the cache, writes through to the remote store or the queue.
pub struct Repository<R: RemoteStore + ?Sized> {
    store: Arc<LocalStore>,
    queue: Arc<SyncQueue>,
    network: Arc<NetworkMonitor>,
    remote: Arc<R>,
}

impl<R: RemoteStore + ?Sized> Repository<R> {
    pub fn new(
        store: Arc<LocalStore>,
        queue: Arc<SyncQueue>,
        network: Arc<NetworkMonitor>,
        remote: Arc<R>,
    ) -> Self {
        Repository {
            store,
            queue,
            network,
            remote,
        }
    }

    fn can_apply(&self, kind: EntityKind, id: &str) -> Result<bool> {
        Ok(self.network.is_online() && !self.queue.has_pending(kind, id)?)
    }

    /// Create or update an entity.
    ///
    /// A record not yet in the cache is created remotely, an existing one
    /// updated. Remote failures are queued, not returned.
    pub async fn save<E: Entity>(&self, entity: &E) -> Result<WriteOutcome> {
        let id = entity.id();
        let verb = if self.store.get_cached::<E>(id)?.is_some() {
            Verb::Update
        } else {
            Verb::Create
        };

        let stamp = Utc::now().timestamp_millis();
        self.store.write(entity, stamp, false)?;

        if self.can_apply(E::KIND, id)? {
            let collection = E::KIND.collection();
            let applied: RemoteResult<()> = match verb {
                Verb::Update => {
                    self.remote
                        .update_document(collection, id, entity.to_patch()?)
                        .await
                }
                _ => {
                    self.remote
                        .set_document(collection, id, to_document(entity)?)
                        .await
                }
            };
            match applied {
                Ok(()) => {
                    self.store.mark_synced(E::KIND, id, stamp)?;
                    return Ok(WriteOutcome::Synced);
                }
                Err(e) => {
                    tracing::warn!(kind = %E::KIND, id, error = %e, "remote write failed, queueing");
                }
            }
        }

        let payload = match verb {
            Verb::Update => entity.to_patch()?,
            _ => to_document(entity)?,
        };
        self.queue
            .enqueue(E::KIND, verb, serde_json::Value::Object(payload))?;
        Ok(WriteOutcome::Queued)
    }

    /// Delete an entity locally and remotely.
    pub async fn remove<E: Entity>(&self, id: &str) -> Result<WriteOutcome> {
        self.store.remove::<E>(id)?;

        if self.can_apply(E::KIND, id)? {
            match self.remote.delete_document(E::KIND.collection(), id).await {
                Ok(()) => return Ok(WriteOutcome::Synced),
                Err(e) => {
                    tracing::warn!(kind = %E::KIND, id, error = %e, "remote delete failed, queueing");
                }
            }
        }

        self.queue
            .enqueue(E::KIND, Verb::Delete, json!({ "id": id }))?;
        Ok(WriteOutcome::Queued)
    }

    pub fn get<E: Entity>(&self, id: &str) -> Result<Option<E>> {
        self.store.get(id)
    }

    /// Active cards of a list, by position.
    pub fn cards_in_list(&self, list_id: &str) -> Result<Vec<Card>> {
        let mut cards = self.store.get_all_by_index::<Card>(Index::ListId, list_id)?;
        cards.retain(Card::is_active);
        Ok(cards)
    }

    /// Lists of a board, by position.
    pub fn lists_in_board(&self, board_id: &str) -> Result<Vec<List>> {
        self.store.get_all_by_index(Index::BoardId, board_id)
    }

    /// Refresh the cache with a board, its lists and its cards from the remote store.
    ///
    /// Records with queued mutations keep their local version. Returns the
    /// number of records written.
    pub async fn pull_board(&self, board_id: &str) -> Result<usize> {
        let stamp = Utc::now().timestamp_millis();
        let mut written = 0;

        if let Some(doc) = self
            .remote
            .get_document(EntityKind::Board.collection(), board_id)
            .await?
        {
            let board: Board = from_document(doc)?;
            if self.cache_remote(&board, stamp)? {
                written += 1;
            }
        }

        let lists = self
            .remote
            .query_collection(EntityKind::List.collection(), vec![Filter::eq("boardId", board_id)])
            .await?;
        for doc in lists {
            let list: List = from_document(doc)?;
            if self.cache_remote(&list, stamp)? {
                written += 1;
            }
        }

        let cards = self
            .remote
            .query_collection(EntityKind::Card.collection(), vec![Filter::eq("boardId", board_id)])
            .await?;
        for doc in cards {
            let card: Card = from_document(doc)?;
            if self.cache_remote(&card, stamp)? {
                written += 1;
            }
        }

        tracing::info!(board = board_id, written, "pulled board");
        Ok(written)
    }

    fn cache_remote<E: Entity>(&self, entity: &E, stamp: i64) -> Result<bool> {
        if self.queue.has_pending(E::KIND, entity.id())? {
            return Ok(false);
        }
        self.store.write(entity, stamp, true)?;
        Ok(true)
    }
}

#[cfg(test)]
#[path = "repository_tests.rs"]
mod tests;
