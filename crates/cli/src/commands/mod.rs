// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod archive;
pub mod board;
pub mod init;
pub mod status;
pub mod sync;

use std::fs;
use std::sync::Arc;

use crate::archive::ArchiveManager;
use crate::config::Config;
use crate::db::{Database, LocalStore, SyncQueue};
use crate::error::Result;
use crate::network::NetworkMonitor;
use crate::remote::{Detached, RemoteStore, WebSocketRemote};
use crate::repository::Repository;
use crate::sync::SyncEngine;

/// Everything a command needs, built once per invocation.
pub struct Context {
    pub config: Config,
    pub network: Arc<NetworkMonitor>,
    pub store: Arc<LocalStore>,
    pub queue: Arc<SyncQueue>,
    pub remote: Arc<dyn RemoteStore>,
    link: Option<Arc<WebSocketRemote>>,
}

impl Context {
    /// Open the cache under `config.data_dir` and prepare the remote client.
    ///
    /// Nothing is connected yet; see [`Context::connect`].
    pub fn open(config: Config) -> Result<Self> {
        fs::create_dir_all(&config.data_dir)?;
        let db = Arc::new(Database::open(&config.db_path())?);
        let network = Arc::new(NetworkMonitor::offline());

        let link = config
            .websocket_config()
            .map(|ws| Arc::new(WebSocketRemote::new(ws, Arc::clone(&network))));
        let remote: Arc<dyn RemoteStore> = match &link {
            Some(link) => Arc::clone(link) as Arc<dyn RemoteStore>,
            None => Arc::new(Detached),
        };

        Self::assemble(config, db, network, remote, link)
    }

    /// Build a context around a given remote store that is already reachable.
    pub fn with_remote(config: Config, db: Database, remote: Arc<dyn RemoteStore>) -> Result<Self> {
        let network = Arc::new(NetworkMonitor::new(true));
        Self::assemble(config, Arc::new(db), network, remote, None)
    }

    fn assemble(
        config: Config,
        db: Arc<Database>,
        network: Arc<NetworkMonitor>,
        remote: Arc<dyn RemoteStore>,
        link: Option<Arc<WebSocketRemote>>,
    ) -> Result<Self> {
        Ok(Context {
            store: Arc::new(LocalStore::new(Arc::clone(&db), Arc::clone(&network))),
            queue: Arc::new(SyncQueue::new(db)?),
            config,
            network,
            remote,
            link,
        })
    }

    /// The WebSocket client, if a remote URL is configured.
    pub fn link(&self) -> Option<&Arc<WebSocketRemote>> {
        self.link.as_ref()
    }

    /// Try once to reach the remote store. Returns whether we are online.
    pub async fn connect(&self) -> bool {
        if let Some(link) = &self.link {
            if !link.is_connected() {
                if let Err(e) = link.connect().await {
                    tracing::warn!(error = %e, "remote unreachable, working offline");
                }
            }
        }
        self.network.is_online()
    }

    pub fn repository(&self) -> Repository<dyn RemoteStore> {
        Repository::new(
            Arc::clone(&self.store),
            Arc::clone(&self.queue),
            Arc::clone(&self.network),
            Arc::clone(&self.remote),
        )
    }

    pub fn archive_manager(&self) -> ArchiveManager<dyn RemoteStore> {
        ArchiveManager::new(Arc::clone(&self.remote))
    }

    pub fn engine(&self) -> SyncEngine<dyn RemoteStore> {
        SyncEngine::new(
            Arc::clone(&self.queue),
            Arc::clone(&self.store),
            Arc::clone(&self.network),
            Arc::clone(&self.remote),
            self.config.sync_config(),
        )
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
pub mod testing;
