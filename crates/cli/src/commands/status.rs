// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use crate::commands::Context;
use crate::error::Result;

/// Snapshot of what `cardsync status` reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub remote: Option<String>,
    pub online: bool,
    pub pending: usize,
    pub unsynced: usize,
}

pub async fn run(ctx: &Context) -> Result<()> {
    ctx.connect().await;
    let status = status_impl(ctx)?;

    match &status.remote {
        Some(url) => println!(
            "Remote: {} ({})",
            url,
            if status.online { "online" } else { "offline" }
        ),
        None => println!("Remote: none (offline only)"),
    }
    println!("Pending mutations: {}", status.pending);
    println!("Unsynced records: {}", status.unsynced);
    Ok(())
}

pub(crate) fn status_impl(ctx: &Context) -> Result<Status> {
    Ok(Status {
        remote: ctx.config.remote.url.clone(),
        online: ctx.network.is_online(),
        pending: ctx.queue.len()?,
        unsynced: ctx.store.unsynced_count()?,
    })
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
