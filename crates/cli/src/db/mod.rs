// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! SQLite-backed local persistence.
//!
//! One database file holds the entity cache ([`LocalStore`]) and the
//! pending-mutation log ([`SyncQueue`]). Both share a [`Database`] handle.

mod cache;
mod queue;
mod schema;

pub use cache::{Cached, Index, LocalStore};
pub use queue::{QueueItem, SyncQueue};
pub use schema::SCHEMA_VERSION;

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use cardsync_core::EntityKind;
use rusqlite::Connection;

use crate::error::{Error, Result};

/// Parse a string value from the database, returning a rusqlite error on parse failure.
fn parse_db<T: std::str::FromStr>(
    value: &str,
    column: &str,
) -> std::result::Result<T, rusqlite::Error>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value.parse().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(CorruptedData(format!(
                "invalid value '{value}' in column '{column}': {e}"
            ))),
        )
    })
}

/// Parse a JSON column from the database.
fn parse_json<T: serde::de::DeserializeOwned>(
    value: &str,
    column: &str,
) -> std::result::Result<T, rusqlite::Error> {
    serde_json::from_str(value).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(CorruptedData(format!("invalid JSON in column '{column}': {e}"))),
        )
    })
}

#[derive(Debug)]
struct CorruptedData(String);

impl std::fmt::Display for CorruptedData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "corrupted data: {}", self.0)
    }
}

impl std::error::Error for CorruptedData {}

/// Table holding cached entities of the given kind.
fn table(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Board => "boards",
        EntityKind::List => "lists",
        EntityKind::Card => "cards",
    }
}

/// Run schema creation and all migrations on a database connection.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(schema::SCHEMA)?;

    let version: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    if version < SCHEMA_VERSION {
        conn.execute_batch(&format!("PRAGMA user_version = {SCHEMA_VERSION}"))?;
    }
    Ok(())
}

/// SQLite connection shared by the cache and the queue.
///
/// The connection lock is never held across an `.await`.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open a database at the given path, creating and migrating if needed.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )?;
        run_migrations(&conn)?;
        Ok(Database {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        run_migrations(&conn)?;
        Ok(Database {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| Error::StorageUnavailable("connection lock poisoned".to_string()))
    }

    /// Run a closure against the connection.
    pub(crate) fn with_conn<T>(
        &self,
        f: impl FnOnce(&Connection) -> rusqlite::Result<T>,
    ) -> Result<T> {
        let conn = self.lock()?;
        Ok(f(&conn)?)
    }

    /// Schema version recorded in the database.
    pub fn schema_version(&self) -> Result<i64> {
        self.with_conn(|conn| conn.query_row("PRAGMA user_version", [], |row| row.get(0)))
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
