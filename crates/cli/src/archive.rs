// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Card archive and restore.
//!
//! Archiving hides a card from its list while remembering where it came
//! from; restoring puts it back at the end of the destination list. A
//! permanently deleted card is a tombstone: still archived, never restored,
//! never listed.
//!
//! These operations act on the remote store directly.

use std::sync::Arc;

use cardsync_core::document::{from_document, to_document};
use cardsync_core::{next_position, Card, Collection, Document, Filter};
use chrono::{DateTime, Duration, Utc};
use futures_util::future::join_all;
use serde_json::{json, Value};

use crate::error::{Error, Result};
use crate::remote::RemoteStore;

/// Summary of a board's archived cards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArchiveStats {
    pub total: usize,
    pub last_7_days: usize,
    pub last_30_days: usize,
    pub oldest: Option<DateTime<Utc>>,
    pub newest: Option<DateTime<Utc>>,
}

impl ArchiveStats {
    /// Compute statistics for the given archived cards as of `now`.
    pub fn from_cards(cards: &[Card], now: DateTime<Utc>) -> Self {
        let stamps: Vec<DateTime<Utc>> = cards.iter().filter_map(|c| c.archived_at).collect();
        let since = |days: i64| {
            let cutoff = now - Duration::days(days);
            stamps.iter().filter(|at| **at >= cutoff).count()
        };
        ArchiveStats {
            total: cards.len(),
            last_7_days: since(7),
            last_30_days: since(30),
            oldest: stamps.iter().min().copied(),
            newest: stamps.iter().max().copied(),
        }
    }
}

/// Moves cards between the active and archived states.
pub struct ArchiveManager<R: RemoteStore + ?Sized> {
    remote: Arc<R>,
}

impl<R: RemoteStore + ?Sized> ArchiveManager<R> {
    pub fn new(remote: Arc<R>) -> Self {
        ArchiveManager { remote }
    }

    async fn fetch(&self, card_id: &str) -> Result<Card> {
        let doc = self
            .remote
            .get_document(Collection::Cards, card_id)
            .await?
            .ok_or_else(|| Error::card_not_found(card_id))?;
        Ok(from_document(doc)?)
    }

    async fn patch(&self, card_id: &str, patch: Value) -> Result<()> {
        let patch: Document = to_document(&patch)?;
        self.remote
            .update_document(Collection::Cards, card_id, patch)
            .await?;
        Ok(())
    }

    /// Archive a card, recording who archived it and the list it was in.
    ///
    /// Archiving an already archived card refreshes the archive stamp but
    /// keeps the list recorded by the first archive.
    pub async fn archive(&self, card_id: &str, user_id: &str) -> Result<Card> {
        let mut card = self.fetch(card_id).await?;
        if card.permanently_deleted {
            return Err(Error::InvalidState {
                id: card.id,
                reason: "card is permanently deleted",
            });
        }

        let original_list_id = match (&card.original_list_id, card.archived) {
            (Some(original), true) => original.clone(),
            _ => card.list_id.clone(),
        };
        let now = Utc::now();
        self.patch(
            card_id,
            json!({
                "archived": true,
                "archivedAt": now,
                "archivedBy": user_id,
                "originalListId": original_list_id,
                "updatedAt": now,
            }),
        )
        .await?;

        card.archived = true;
        card.archived_at = Some(now);
        card.archived_by = Some(user_id.to_string());
        card.original_list_id = Some(original_list_id);
        card.updated_at = now;
        tracing::info!(card = %card.id, user = user_id, "archived card");
        Ok(card)
    }

    /// Return an archived card to `target_list_id`, or to the list it was
    /// archived from, after every active card there.
    pub async fn restore(&self, card_id: &str, target_list_id: Option<&str>) -> Result<Card> {
        let mut card = self.fetch(card_id).await?;
        if !card.archived {
            return Err(Error::InvalidState {
                id: card.id,
                reason: "card is not archived",
            });
        }
        if card.permanently_deleted {
            return Err(Error::InvalidState {
                id: card.id,
                reason: "card is permanently deleted",
            });
        }

        let destination = target_list_id
            .unwrap_or_else(|| card.restore_list_id())
            .to_string();
        let active = self.list_active_cards(&destination).await?;
        let position = next_position(active.iter().map(|c| c.position));

        let now = Utc::now();
        self.patch(
            card_id,
            json!({
                "archived": false,
                "archivedAt": null,
                "archivedBy": null,
                "originalListId": null,
                "listId": destination,
                "position": position,
                "updatedAt": now,
            }),
        )
        .await?;

        card.archived = false;
        card.archived_at = None;
        card.archived_by = None;
        card.original_list_id = None;
        card.list_id = destination;
        card.position = position;
        card.updated_at = now;
        tracing::info!(card = %card.id, list = %card.list_id, position, "restored card");
        Ok(card)
    }

    /// Tombstone an archived card.
    pub async fn permanently_delete(&self, card_id: &str) -> Result<Card> {
        let mut card = self.fetch(card_id).await?;
        if !card.archived {
            return Err(Error::InvalidState {
                id: card.id,
                reason: "only archived cards can be deleted",
            });
        }
        if card.permanently_deleted {
            return Ok(card);
        }

        let now = Utc::now();
        self.patch(
            card_id,
            json!({
                "permanentlyDeleted": true,
                "deletedAt": now,
            }),
        )
        .await?;

        card.permanently_deleted = true;
        card.deleted_at = Some(now);
        tracing::info!(card = %card.id, "permanently deleted card");
        Ok(card)
    }

    /// Archive several cards concurrently. Each id gets its own result.
    pub async fn archive_multiple(
        &self,
        card_ids: &[String],
        user_id: &str,
    ) -> Vec<(String, Result<Card>)> {
        join_all(card_ids.iter().map(|id| async move {
            (id.clone(), self.archive(id, user_id).await)
        }))
        .await
    }

    /// Restore several cards concurrently to their original lists.
    pub async fn restore_multiple(&self, card_ids: &[String]) -> Vec<(String, Result<Card>)> {
        join_all(
            card_ids
                .iter()
                .map(|id| async move { (id.clone(), self.restore(id, None).await) }),
        )
        .await
    }

    /// Archived cards of a board, most recently archived first.
    pub async fn list_archived(&self, board_id: &str) -> Result<Vec<Card>> {
        let docs = self
            .remote
            .query_collection(
                Collection::Cards,
                vec![Filter::eq("boardId", board_id), Filter::eq("archived", true)],
            )
            .await?;

        let mut cards = docs
            .into_iter()
            .map(from_document::<Card>)
            .collect::<cardsync_core::Result<Vec<_>>>()?;
        cards.retain(|c| c.archived && !c.permanently_deleted);
        cards.sort_by(|a, b| b.archived_at.cmp(&a.archived_at));
        Ok(cards)
    }

    pub async fn archive_stats(&self, board_id: &str) -> Result<ArchiveStats> {
        let cards = self.list_archived(board_id).await?;
        Ok(ArchiveStats::from_cards(&cards, Utc::now()))
    }

    /// Cards of a list that are neither archived nor tombstoned, by position.
    pub async fn list_active_cards(&self, list_id: &str) -> Result<Vec<Card>> {
        let docs = self
            .remote
            .query_collection(Collection::Cards, vec![Filter::eq("listId", list_id)])
            .await?;

        let mut cards = docs
            .into_iter()
            .map(from_document::<Card>)
            .collect::<cardsync_core::Result<Vec<_>>>()?;
        cards.retain(Card::is_active);
        cards.sort_by(|a, b| a.position.total_cmp(&b.position));
        Ok(cards)
    }
}

#[cfg(test)]
#[path = "archive_tests.rs"]
mod tests;
