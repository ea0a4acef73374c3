// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Local entity cache.
//!
//! Every write stamps `last_modified` with the local clock and `synced`
//! with the connectivity state at the time of the write. Reads strip the
//! cache metadata unless [`LocalStore::get_cached`] is used.

use std::sync::Arc;

use cardsync_core::{Entity, EntityKind};
use chrono::Utc;
use rusqlite::{params, OptionalExtension};

use super::{parse_json, table, Database};
use crate::error::{Error, Result};
use crate::network::NetworkMonitor;

/// Secondary indexes over the cache tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Index {
    /// Lists and cards by owning board.
    BoardId,
    /// Cards by owning list.
    ListId,
}

impl Index {
    fn column(&self) -> &'static str {
        match self {
            Index::BoardId => "board_id",
            Index::ListId => "list_id",
        }
    }

    fn supported_by(&self, kind: EntityKind) -> bool {
        match self {
            Index::BoardId => matches!(kind, EntityKind::List | EntityKind::Card),
            Index::ListId => kind == EntityKind::Card,
        }
    }
}

/// An entity together with its cache metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Cached<E> {
    pub entity: E,
    /// Local write time, milliseconds since the Unix epoch.
    pub last_modified: i64,
    /// Whether the remote store has acknowledged this version.
    pub synced: bool,
}

/// Durable on-device cache of boards, lists and cards.
pub struct LocalStore {
    db: Arc<Database>,
    network: Arc<NetworkMonitor>,
}

impl LocalStore {
    pub fn new(db: Arc<Database>, network: Arc<NetworkMonitor>) -> Self {
        LocalStore { db, network }
    }

    /// Upsert an entity, stamping it with the current time and online state.
    pub fn put<E: Entity>(&self, entity: &E) -> Result<()> {
        let synced = self.network.is_online();
        self.write(entity, Utc::now().timestamp_millis(), synced)
    }

    /// Upsert with explicit metadata.
    pub(crate) fn write<E: Entity>(&self, entity: &E, last_modified: i64, synced: bool) -> Result<()> {
        let data = serde_json::to_string(entity)?;
        let board_id = entity.board_id().unwrap_or_default();
        let list_id = entity.list_id().unwrap_or_default();

        self.db.with_conn(|conn| {
            match E::KIND {
                EntityKind::Board => conn.execute(
                    "INSERT OR REPLACE INTO boards (id, data, last_modified, synced)
                     VALUES (?1, ?2, ?3, ?4)",
                    params![entity.id(), data, last_modified, synced],
                ),
                EntityKind::List => conn.execute(
                    "INSERT OR REPLACE INTO lists (id, board_id, data, last_modified, synced)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![entity.id(), board_id, data, last_modified, synced],
                ),
                EntityKind::Card => conn.execute(
                    "INSERT OR REPLACE INTO cards (id, board_id, list_id, data, last_modified, synced)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    params![entity.id(), board_id, list_id, data, last_modified, synced],
                ),
            }?;
            Ok(())
        })?;

        tracing::debug!(kind = %E::KIND, id = entity.id(), synced, "cached entity");
        Ok(())
    }

    /// Point lookup by primary key.
    pub fn get<E: Entity>(&self, id: &str) -> Result<Option<E>> {
        Ok(self.get_cached(id)?.map(|c| c.entity))
    }

    /// Point lookup keeping the cache metadata.
    pub fn get_cached<E: Entity>(&self, id: &str) -> Result<Option<Cached<E>>> {
        let sql = format!(
            "SELECT data, last_modified, synced FROM {} WHERE id = ?1",
            table(E::KIND)
        );
        self.db.with_conn(|conn| {
            conn.query_row(&sql, params![id], |row| {
                let data: String = row.get(0)?;
                Ok(Cached {
                    entity: parse_json(&data, "data")?,
                    last_modified: row.get(1)?,
                    synced: row.get(2)?,
                })
            })
            .optional()
        })
    }

    /// Range lookup over a secondary index, ordered by position.
    pub fn get_all_by_index<E: Entity>(&self, index: Index, key: &str) -> Result<Vec<E>> {
        if !index.supported_by(E::KIND) {
            return Err(Error::UnknownIndex {
                table: table(E::KIND),
                index: index.column(),
            });
        }

        let sql = format!(
            "SELECT data FROM {} WHERE {} = ?1
             ORDER BY json_extract(data, '$.position'), id",
            table(E::KIND),
            index.column()
        );
        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            let entities = stmt
                .query_map(params![key], |row| {
                    let data: String = row.get(0)?;
                    parse_json(&data, "data")
                })?
                .collect::<rusqlite::Result<Vec<E>>>()?;
            Ok(entities)
        })
    }

    /// Remove an entity from the cache. Returns false if it was absent.
    pub fn remove<E: Entity>(&self, id: &str) -> Result<bool> {
        let sql = format!("DELETE FROM {} WHERE id = ?1", table(E::KIND));
        let affected = self.db.with_conn(|conn| conn.execute(&sql, params![id]))?;
        Ok(affected > 0)
    }

    /// Mark a record synced if it has not been written since `up_to`.
    ///
    /// Returns true if the record was updated.
    pub fn mark_synced(&self, kind: EntityKind, id: &str, up_to: i64) -> Result<bool> {
        let sql = format!(
            "UPDATE {} SET synced = 1 WHERE id = ?1 AND synced = 0 AND last_modified <= ?2",
            table(kind)
        );
        let affected = self
            .db
            .with_conn(|conn| conn.execute(&sql, params![id, up_to]))?;
        Ok(affected > 0)
    }

    /// Number of cached records not yet acknowledged by the remote store.
    pub fn unsynced_count(&self) -> Result<usize> {
        let count: i64 = self.db.with_conn(|conn| {
            conn.query_row(
                "SELECT (SELECT COUNT(*) FROM boards WHERE synced = 0)
                      + (SELECT COUNT(*) FROM lists WHERE synced = 0)
                      + (SELECT COUNT(*) FROM cards WHERE synced = 0)",
                [],
                |row| row.get(0),
            )
        })?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    pub fn network(&self) -> &Arc<NetworkMonitor> {
        &self.network
    }
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
