// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! cardsync - a local-first cache and mutation sync queue for task boards.
//!
//! Boards, lists and cards are cached in SQLite. Writes land in the cache
//! first and are applied to the remote document store when online, or
//! queued and replayed in order by the [`SyncEngine`] once the
//! [`NetworkMonitor`] reports connectivity.
//!
//! # Main Components
//!
//! - [`LocalStore`] - SQLite cache of boards, lists and cards
//! - [`SyncQueue`] - durable FIFO of pending mutations
//! - [`SyncEngine`] - drains the queue against a [`RemoteStore`]
//! - [`ArchiveManager`] - card archive, restore and permanent delete
//! - [`Repository`] - cache-first reads, write-through or queued writes
//!
//! ```rust,ignore
//! use cardsync::{Config, Context};
//!
//! let ctx = Context::open(Config::load_or_default(&path)?)?;
//! ctx.connect().await;
//! ctx.repository().save(&card).await?;
//! ctx.engine().drain().await?;
//! ```

mod cli;
mod commands;
mod id;

pub mod archive;
pub mod config;
pub mod db;
pub mod env;
pub mod error;
pub mod logging;
pub mod network;
pub mod remote;
pub mod repository;
pub mod sync;

#[cfg(test)]
mod test_helpers;

pub use archive::{ArchiveManager, ArchiveStats};
pub use cli::{BoardCommand, CardCommand, Cli, Command, ListCommand};
pub use commands::Context;
pub use config::Config;
pub use db::{Database, Index, LocalStore, QueueItem, SyncQueue};
pub use error::{Error, Result};
pub use network::NetworkMonitor;
pub use remote::{MemoryRemote, RemoteError, RemoteStore, WebSocketRemote};
pub use repository::{Repository, WriteOutcome};
pub use sync::{DrainOutcome, DrainReport, SyncConfig, SyncEngine};

/// Execute a parsed command line. Builds the runtime and blocks until done.
pub fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.unwrap_or_else(config::default_config_path);

    let command = match cli.command {
        Command::Init {
            remote,
            user,
            data_dir,
            force,
        } => return commands::init::run(&config_path, remote, user, data_dir, force),
        other => other,
    };

    let config = Config::load_or_default(&config_path)?;
    logging::init(&config.log_path(), &config.log_level);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| Error::Io(std::io::Error::other(format!("tokio: {}", e))))?;
    rt.block_on(dispatch(command, config))
}

async fn dispatch(command: Command, config: Config) -> Result<()> {
    let ctx = Context::open(config)?;
    match command {
        Command::Init { .. } => Ok(()),
        Command::Status => commands::status::run(&ctx).await,
        Command::Sync => commands::sync::sync(&ctx).await,
        Command::Run => commands::sync::run(&ctx).await,
        Command::Pull { board } => commands::sync::pull(&ctx, &board).await,
        Command::Board(BoardCommand::Add { title }) => {
            commands::board::add_board(&ctx, &title).await.map(|_| ())
        }
        Command::List(ListCommand::Add { board, title }) => {
            commands::board::add_list(&ctx, &board, &title).await.map(|_| ())
        }
        Command::List(ListCommand::Show { board }) => commands::board::show_lists(&ctx, &board),
        Command::Card(CardCommand::Add {
            list,
            title,
            description,
        }) => commands::board::add_card(&ctx, &list, &title, description)
            .await
            .map(|_| ()),
        Command::Card(CardCommand::List { list }) => commands::board::list_cards(&ctx, &list),
        Command::Archive { ids } => commands::archive::archive(&ctx, &ids).await.map(|_| ()),
        Command::Restore { ids, to } => commands::archive::restore(&ctx, &ids, to.as_deref())
            .await
            .map(|_| ()),
        Command::Delete { id } => commands::archive::delete(&ctx, &id).await.map(|_| ()),
        Command::Archived { board } => commands::archive::archived(&ctx, &board).await,
        Command::Stats { board } => commands::archive::stats(&ctx, &board).await,
    }
}
