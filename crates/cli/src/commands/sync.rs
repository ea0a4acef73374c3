// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::fs;
use std::path::Path;

use tokio_util::sync::CancellationToken;

use crate::commands::Context;
use crate::error::{Error, Result};
use crate::sync::{DrainOutcome, SkipReason};

/// `cardsync sync`: one drain.
pub async fn sync(ctx: &Context) -> Result<()> {
    ctx.connect().await;
    match ctx.engine().drain().await? {
        DrainOutcome::Skipped(SkipReason::Offline) => {
            println!("Offline: {} mutation(s) pending", ctx.queue.len()?);
        }
        DrainOutcome::Skipped(SkipReason::AlreadyDraining) => {
            println!("A sync is already in progress");
        }
        DrainOutcome::Completed(report) => {
            println!(
                "Synced {} mutation(s), {} retrying, {} dropped",
                report.flushed.len(),
                report.retried.len(),
                report.dropped.len()
            );
            for id in &report.dropped {
                eprintln!("warning: dropped {} after repeated failures", id);
            }
        }
    }
    Ok(())
}

/// `cardsync pull <board>`
pub async fn pull(ctx: &Context, board_id: &str) -> Result<()> {
    if !ctx.connect().await {
        return Err(Error::RemoteUnavailable("cannot pull while offline".to_string()));
    }
    let written = ctx.repository().pull_board(board_id).await?;
    println!("Pulled {} record(s) for {}", written, board_id);
    Ok(())
}

/// `cardsync run`: keep the connection and drain in the background until Ctrl-C.
pub async fn run(ctx: &Context) -> Result<()> {
    let link = ctx.link().ok_or_else(|| {
        Error::Config("no remote configured: set remote.url in config.toml".to_string())
    })?;
    let _lock = acquire_lock(&ctx.config.lock_path())?;

    let engine = ctx.engine();
    let cancel = CancellationToken::new();
    let shutdown = async {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("received interrupt, shutting down");
        }
        cancel.cancel();
    };

    tracing::info!(pending = ctx.queue.len()?, "sync service started");
    println!("Syncing with {} (Ctrl-C to stop)", link_url(ctx));
    tokio::join!(
        link.maintain(cancel.child_token()),
        engine.run(cancel.child_token()),
        shutdown
    );
    link.disconnect();
    tracing::info!(pending = ctx.queue.len()?, "sync service stopped");
    Ok(())
}

fn link_url(ctx: &Context) -> &str {
    ctx.config.remote.url.as_deref().unwrap_or_default()
}

/// Hold an exclusive lock so only one `run` drains a cache at a time.
pub(crate) fn acquire_lock(lock_path: &Path) -> Result<fs::File> {
    use fs2::FileExt;

    let file = fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(lock_path)?;
    file.try_lock_exclusive()
        .map_err(|_| Error::Config("another cardsync run is already active".to_string()))?;
    Ok(file)
}

#[cfg(test)]
#[path = "sync_tests.rs"]
mod tests;
