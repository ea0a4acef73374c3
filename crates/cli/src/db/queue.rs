// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Durable queue of mutations made while the remote store was unreachable.
//!
//! Items are replayed in insertion order. Nothing is de-duplicated: two
//! updates to the same card are two items.

use std::sync::{Arc, Mutex};

use cardsync_core::{Action, EntityKind, Verb};
use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row};
use serde_json::Value;

use super::{parse_db, parse_json, Database};
use crate::error::{Error, Result};

/// A pending mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct QueueItem {
    /// `{entity}-{verb}-{entity_id}-{timestamp}`.
    pub id: String,
    pub action: Action,
    pub entity_id: String,
    /// Full document for create/update, `{"id": ..}` for delete.
    pub payload: Value,
    /// Enqueue time in milliseconds; strictly increasing within a queue.
    pub timestamp: i64,
    pub retry_count: u32,
}

impl QueueItem {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let entity: String = row.get("entity")?;
        let verb: String = row.get("action")?;
        let payload: String = row.get("payload")?;
        let retry_count: i64 = row.get("retry_count")?;
        Ok(QueueItem {
            id: row.get("id")?,
            action: Action::new(
                parse_db::<EntityKind>(&entity, "entity")?,
                parse_db::<Verb>(&verb, "action")?,
            ),
            entity_id: row.get("entity_id")?,
            payload: parse_json(&payload, "payload")?,
            timestamp: row.get("timestamp")?,
            retry_count: u32::try_from(retry_count).unwrap_or(u32::MAX),
        })
    }
}

const SELECT_ITEMS: &str = "SELECT id, entity, action, entity_id, payload, timestamp, retry_count
     FROM sync_queue";

/// Ordered log of pending mutations backed by the `sync_queue` table.
pub struct SyncQueue {
    db: Arc<Database>,
    last_stamp: Mutex<i64>,
}

impl SyncQueue {
    /// Open the queue, resuming the timestamp sequence of persisted items.
    pub fn new(db: Arc<Database>) -> Result<Self> {
        let last: Option<i64> = db.with_conn(|conn| {
            conn.query_row("SELECT MAX(timestamp) FROM sync_queue", [], |row| {
                row.get(0)
            })
        })?;
        Ok(SyncQueue {
            db,
            last_stamp: Mutex::new(last.unwrap_or(0)),
        })
    }

    fn next_stamp(&self) -> i64 {
        let mut last = match self.last_stamp.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let now = Utc::now().timestamp_millis();
        *last = if now > *last { now } else { *last + 1 };
        *last
    }

    /// Append a mutation. The payload must carry a string `id`.
    pub fn enqueue(&self, entity: EntityKind, verb: Verb, payload: Value) -> Result<QueueItem> {
        let entity_id = payload
            .get("id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or(Error::Core(cardsync_core::Error::MissingDocumentId))?;

        let timestamp = self.next_stamp();
        let item = QueueItem {
            id: format!("{entity}-{verb}-{entity_id}-{timestamp}"),
            action: Action::new(entity, verb),
            entity_id,
            payload,
            timestamp,
            retry_count: 0,
        };

        let payload_json = serde_json::to_string(&item.payload)?;
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO sync_queue (id, entity, action, entity_id, payload, timestamp, retry_count)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0)",
                params![
                    item.id,
                    entity.as_str(),
                    verb.as_str(),
                    item.entity_id,
                    payload_json,
                    item.timestamp
                ],
            )
        })?;

        tracing::debug!(id = %item.id, "enqueued mutation");
        Ok(item)
    }

    /// All pending items in FIFO order.
    pub fn peek_all(&self) -> Result<Vec<QueueItem>> {
        let sql = format!("{SELECT_ITEMS} ORDER BY seq");
        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            let items = stmt
                .query_map([], QueueItem::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(items)
        })
    }

    /// Look up a single item.
    pub fn get(&self, id: &str) -> Result<Option<QueueItem>> {
        let sql = format!("{SELECT_ITEMS} WHERE id = ?1");
        self.db
            .with_conn(|conn| conn.query_row(&sql, params![id], QueueItem::from_row).optional())
    }

    /// Remove an item. Returns false if it was not queued.
    pub fn remove(&self, id: &str) -> Result<bool> {
        let affected = self
            .db
            .with_conn(|conn| conn.execute("DELETE FROM sync_queue WHERE id = ?1", params![id]))?;
        Ok(affected > 0)
    }

    /// Increment an item's retry count, returning the new count.
    pub fn record_failure(&self, id: &str) -> Result<u32> {
        let count: Option<i64> = self.db.with_conn(|conn| {
            conn.query_row(
                "UPDATE sync_queue SET retry_count = retry_count + 1
                 WHERE id = ?1 RETURNING retry_count",
                params![id],
                |row| row.get(0),
            )
            .optional()
        })?;
        match count {
            Some(n) => Ok(u32::try_from(n).unwrap_or(u32::MAX)),
            None => Err(Error::StorageUnavailable(format!(
                "queue item {id} vanished"
            ))),
        }
    }

    pub fn len(&self) -> Result<usize> {
        let count: i64 = self.db.with_conn(|conn| {
            conn.query_row("SELECT COUNT(*) FROM sync_queue", [], |row| row.get(0))
        })?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// True if any item still targets the given entity.
    pub fn has_pending(&self, entity: EntityKind, entity_id: &str) -> Result<bool> {
        self.db.with_conn(|conn| {
            conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM sync_queue WHERE entity = ?1 AND entity_id = ?2)",
                params![entity.as_str(), entity_id],
                |row| row.get(0),
            )
        })
    }

    /// Drop every pending item.
    pub fn clear(&self) -> Result<usize> {
        self.db
            .with_conn(|conn| conn.execute("DELETE FROM sync_queue", []))
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
