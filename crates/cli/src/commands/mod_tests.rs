// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

//! Test infrastructure for command testing without a server.
//!
//! `TestContext` wraps a [`Context`] on an in-memory database whose remote
//! is a [`MemoryRemote`] the test can inspect.

use std::sync::Arc;

use cardsync_core::document::{from_document, to_document};
use cardsync_core::Entity;
use tempfile::TempDir;

use super::Context;
use crate::config::Config;
use crate::db::Database;
use crate::remote::{MemoryRemote, RemoteStore};

pub struct TestContext {
    pub ctx: Context,
    pub remote: Arc<MemoryRemote>,
    _temp_dir: TempDir,
}

impl TestContext {
    /// Online context with an empty remote.
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let config = Config {
            data_dir: temp.path().to_path_buf(),
            user_id: "tester".to_string(),
            ..Config::default()
        };
        let remote = Arc::new(MemoryRemote::new());
        let ctx = Context::with_remote(
            config,
            Database::open_in_memory().unwrap(),
            Arc::clone(&remote) as Arc<dyn RemoteStore>,
        )
        .unwrap();
        TestContext {
            ctx,
            remote,
            _temp_dir: temp,
        }
    }

    pub fn offline(self) -> Self {
        self.ctx.network.set_online(false);
        self
    }

    /// Put a record on the remote side only.
    pub fn seed<E: Entity>(&self, entity: &E) {
        self.remote.insert(
            E::KIND.collection(),
            entity.id(),
            to_document(entity).unwrap(),
        )
        .unwrap();
    }

    /// Read a record back from the remote side.
    pub fn remote_get<E: Entity>(&self, id: &str) -> Option<E> {
        self.remote
            .snapshot(E::KIND.collection(), id)
            .unwrap()
            .map(|doc| from_document(doc).unwrap())
    }
}
