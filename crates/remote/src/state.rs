// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Server state management.
//!
//! Wraps the canonical document database for shared async access.

use std::path::Path;
use std::sync::Arc;

use cardsync_core::document::{apply_patch, matches_all};
use cardsync_core::protocol::{FailureKind, Outcome, Request};
use cardsync_core::{Collection, Document, Filter};
use rusqlite::{params, Connection, OptionalExtension};
use tokio::sync::Mutex;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS documents (
    collection TEXT NOT NULL,
    id TEXT NOT NULL,
    data TEXT NOT NULL,
    updated_at INTEGER NOT NULL,
    PRIMARY KEY (collection, id)
);
"#;

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("{collection}/{id} not found")]
    NotFound { collection: Collection, id: String },

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("invalid document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl StateError {
    fn kind(&self) -> FailureKind {
        match self {
            StateError::NotFound { .. } => FailureKind::NotFound,
            StateError::Json(_) => FailureKind::Invalid,
            StateError::Storage(_) | StateError::Io(_) => FailureKind::Internal,
        }
    }
}

pub type Result<T> = std::result::Result<T, StateError>;

/// Shared server state containing the canonical document database.
#[derive(Clone)]
pub struct ServerState {
    db: Arc<Mutex<Connection>>,
}

fn parse_doc(data: String) -> Result<Document> {
    Ok(serde_json::from_str(&data)?)
}

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

impl ServerState {
    /// Opens (or creates) `documents.db` in the given directory.
    pub fn new(data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)?;
        Self::from_connection(Connection::open(data_dir.join("documents.db"))?)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(ServerState {
            db: Arc::new(Mutex::new(conn)),
        })
    }

    pub async fn get(&self, collection: Collection, id: &str) -> Result<Option<Document>> {
        let db = self.db.lock().await;
        let data: Option<String> = db
            .query_row(
                "SELECT data FROM documents WHERE collection = ?1 AND id = ?2",
                params![collection.as_str(), id],
                |row| row.get(0),
            )
            .optional()?;
        data.map(parse_doc).transpose()
    }

    pub async fn set(&self, collection: Collection, id: &str, data: &Document) -> Result<()> {
        let json = serde_json::to_string(data)?;
        let db = self.db.lock().await;
        db.execute(
            "INSERT OR REPLACE INTO documents (collection, id, data, updated_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![collection.as_str(), id, json, now_ms()],
        )?;
        Ok(())
    }

    /// Shallow-merge `patch` into an existing document.
    pub async fn update(&self, collection: Collection, id: &str, patch: &Document) -> Result<()> {
        let db = self.db.lock().await;
        let data: Option<String> = db
            .query_row(
                "SELECT data FROM documents WHERE collection = ?1 AND id = ?2",
                params![collection.as_str(), id],
                |row| row.get(0),
            )
            .optional()?;
        let mut doc = match data {
            Some(data) => parse_doc(data)?,
            None => {
                return Err(StateError::NotFound {
                    collection,
                    id: id.to_string(),
                })
            }
        };
        apply_patch(&mut doc, patch);
        db.execute(
            "UPDATE documents SET data = ?3, updated_at = ?4 WHERE collection = ?1 AND id = ?2",
            params![collection.as_str(), id, serde_json::to_string(&doc)?, now_ms()],
        )?;
        Ok(())
    }

    /// Returns whether a document was removed.
    pub async fn delete(&self, collection: Collection, id: &str) -> Result<bool> {
        let db = self.db.lock().await;
        let n = db.execute(
            "DELETE FROM documents WHERE collection = ?1 AND id = ?2",
            params![collection.as_str(), id],
        )?;
        Ok(n > 0)
    }

    /// Documents of a collection matching every filter, ordered by id.
    pub async fn query(&self, collection: Collection, filters: &[Filter]) -> Result<Vec<Document>> {
        let db = self.db.lock().await;
        let mut stmt =
            db.prepare("SELECT data FROM documents WHERE collection = ?1 ORDER BY id")?;
        let rows = stmt.query_map(params![collection.as_str()], |row| row.get::<_, String>(0))?;

        let mut docs = Vec::new();
        for data in rows {
            let doc = parse_doc(data?)?;
            if matches_all(&doc, filters) {
                docs.push(doc);
            }
        }
        Ok(docs)
    }

    /// Execute a request, turning errors into typed failures.
    pub async fn execute(&self, request: Request) -> Outcome {
        let result = match request {
            Request::Get { collection, id } => self
                .get(collection, &id)
                .await
                .map(|document| Outcome::Document { document }),
            Request::Set {
                collection,
                id,
                data,
            } => self.set(collection, &id, &data).await.map(|_| Outcome::Ack),
            Request::Update {
                collection,
                id,
                data,
            } => self
                .update(collection, &id, &data)
                .await
                .map(|_| Outcome::Ack),
            Request::Delete { collection, id } => {
                self.delete(collection, &id).await.map(|_| Outcome::Ack)
            }
            Request::Query {
                collection,
                filters,
            } => self
                .query(collection, &filters)
                .await
                .map(|documents| Outcome::Documents { documents }),
        };
        result.unwrap_or_else(|e| Outcome::failure(e.kind(), e.to_string()))
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
