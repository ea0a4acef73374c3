// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Creating and listing boards, lists and cards through the cache.

use cardsync_core::{next_position, Board, Card, Entity, EntityKind, List};
use chrono::Utc;

use crate::commands::Context;
use crate::error::{Error, Result};
use crate::id::generate_unique_id;
use crate::repository::WriteOutcome;

fn new_id<E: Entity>(ctx: &Context, title: &str) -> String {
    let now = Utc::now();
    // Lookup errors resurface when the record is saved.
    generate_unique_id(E::KIND, title, &now, |id| {
        matches!(ctx.store.get::<E>(id), Ok(Some(_)))
    })
}

fn report(kind: EntityKind, id: &str, outcome: WriteOutcome) {
    match outcome {
        WriteOutcome::Synced => println!("Created {} {}", kind, id),
        WriteOutcome::Queued => println!("Created {} {} (queued for sync)", kind, id),
    }
}

pub async fn add_board(ctx: &Context, title: &str) -> Result<Board> {
    ctx.connect().await;
    let id = new_id::<Board>(ctx, title);
    let board = Board::new(id, title.to_string(), ctx.config.user_id.clone(), Utc::now());
    let outcome = ctx.repository().save(&board).await?;
    report(EntityKind::Board, &board.id, outcome);
    Ok(board)
}

pub async fn add_list(ctx: &Context, board_id: &str, title: &str) -> Result<List> {
    ctx.connect().await;
    let repo = ctx.repository();
    if repo.get::<Board>(board_id)?.is_none() {
        return Err(Error::NotFound {
            collection: EntityKind::Board.collection(),
            id: board_id.to_string(),
        });
    }

    let position = next_position(repo.lists_in_board(board_id)?.iter().map(|l| l.position));
    let id = new_id::<List>(ctx, title);
    let list = List::new(id, board_id.to_string(), title.to_string(), position);
    let outcome = repo.save(&list).await?;
    report(EntityKind::List, &list.id, outcome);
    Ok(list)
}

pub fn show_lists(ctx: &Context, board_id: &str) -> Result<()> {
    for list in ctx.repository().lists_in_board(board_id)? {
        println!("{}\t{}\t{}", list.id, list.position, list.title);
    }
    Ok(())
}

/// Append a card to the end of a cached list.
pub async fn add_card(
    ctx: &Context,
    list_id: &str,
    title: &str,
    description: Option<String>,
) -> Result<Card> {
    ctx.connect().await;
    let repo = ctx.repository();
    let list = repo.get::<List>(list_id)?.ok_or_else(|| Error::NotFound {
        collection: EntityKind::List.collection(),
        id: list_id.to_string(),
    })?;

    let position = next_position(repo.cards_in_list(list_id)?.iter().map(|c| c.position));
    let id = new_id::<Card>(ctx, title);
    let mut card = Card::new(
        id,
        list.board_id,
        list.id,
        title.to_string(),
        position,
        ctx.config.user_id.clone(),
        Utc::now(),
    );
    card.description = description;

    let outcome = repo.save(&card).await?;
    report(EntityKind::Card, &card.id, outcome);
    Ok(card)
}

pub fn list_cards(ctx: &Context, list_id: &str) -> Result<()> {
    for card in ctx.repository().cards_in_list(list_id)? {
        println!("{}\t{}\t{}", card.id, card.position, card.title);
    }
    Ok(())
}

#[cfg(test)]
#[path = "board_tests.rs"]
mod tests;
