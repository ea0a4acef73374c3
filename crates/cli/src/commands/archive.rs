// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use cardsync_core::Card;

use crate::commands::Context;
use crate::error::{Error, Result};

/// Cache what the remote store now holds for a card.
fn refresh(ctx: &Context, card: &Card) -> Result<()> {
    ctx.store.put(card)
}

/// Print per-card results, returning the last failure if any.
fn settle(ctx: &Context, verb: &str, results: Vec<(String, Result<Card>)>) -> Result<Vec<Card>> {
    let mut done = Vec::new();
    let mut failed = None;
    for (id, result) in results {
        match result {
            Ok(card) => {
                refresh(ctx, &card)?;
                println!("{} {}", verb, id);
                done.push(card);
            }
            Err(e) => {
                eprintln!("error: {}: {}", id, e);
                failed = Some(e);
            }
        }
    }
    match failed {
        Some(e) => Err(e),
        None => Ok(done),
    }
}

/// Connect and flush queued mutations, so cards created offline exist remotely.
async fn require_online(ctx: &Context) -> Result<()> {
    if ctx.connect().await {
        ctx.engine().drain().await?;
        Ok(())
    } else {
        Err(Error::RemoteUnavailable(
            "archive operations need the remote store".to_string(),
        ))
    }
}

pub async fn archive(ctx: &Context, ids: &[String]) -> Result<Vec<Card>> {
    require_online(ctx).await?;
    let results = ctx
        .archive_manager()
        .archive_multiple(ids, &ctx.config.user_id)
        .await;
    settle(ctx, "Archived", results)
}

pub async fn restore(ctx: &Context, ids: &[String], to: Option<&str>) -> Result<Vec<Card>> {
    require_online(ctx).await?;
    let manager = ctx.archive_manager();
    let results = match to {
        // Sequential so each card lands after the previous one.
        Some(list_id) => {
            let mut results = Vec::with_capacity(ids.len());
            for id in ids {
                results.push((id.clone(), manager.restore(id, Some(list_id)).await));
            }
            results
        }
        None => manager.restore_multiple(ids).await,
    };
    settle(ctx, "Restored", results)
}

pub async fn delete(ctx: &Context, id: &str) -> Result<Card> {
    require_online(ctx).await?;
    let card = ctx.archive_manager().permanently_delete(id).await?;
    refresh(ctx, &card)?;
    println!("Deleted {}", id);
    Ok(card)
}

pub async fn archived(ctx: &Context, board_id: &str) -> Result<()> {
    require_online(ctx).await?;
    for card in ctx.archive_manager().list_archived(board_id).await? {
        let at = card
            .archived_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        println!("{}\t{}\t{}", card.id, at, card.title);
    }
    Ok(())
}

pub async fn stats(ctx: &Context, board_id: &str) -> Result<()> {
    require_online(ctx).await?;
    let stats = ctx.archive_manager().archive_stats(board_id).await?;
    println!("Archived: {}", stats.total);
    println!("Last 7 days: {}", stats.last_7_days);
    println!("Last 30 days: {}", stats.last_30_days);
    if let (Some(oldest), Some(newest)) = (stats.oldest, stats.newest) {
        println!("Oldest: {}", oldest.to_rfc3339());
        println!("Newest: {}", newest.to_rfc3339());
    }
    Ok(())
}

#[cfg(test)]
#[path = "archive_tests.rs"]
mod tests;
