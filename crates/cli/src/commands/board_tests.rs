// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::commands::testing::TestContext;

#[tokio::test]
async fn test_add_board_online_reaches_remote() {
    let t = TestContext::new();
    let board = add_board(&t.ctx, "Roadmap").await.unwrap();

    assert!(board.id.starts_with("board-"));
    assert_eq!(board.members[0].user_id, "tester");
    assert_eq!(t.remote_get::<Board>(&board.id).unwrap().title, "Roadmap");
    assert!(t.ctx.queue.is_empty().unwrap());
}

#[tokio::test]
async fn test_add_list_appends_by_position() {
    let t = TestContext::new();
    let board = add_board(&t.ctx, "Roadmap").await.unwrap();

    let first = add_list(&t.ctx, &board.id, "Todo").await.unwrap();
    let second = add_list(&t.ctx, &board.id, "Done").await.unwrap();
    assert_eq!(first.position, 0.0);
    assert_eq!(second.position, 1.0);
}

#[tokio::test]
async fn test_add_list_unknown_board() {
    let t = TestContext::new();
    let err = add_list(&t.ctx, "board-missing", "Todo").await.unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
}

#[tokio::test]
async fn test_add_card_offline_is_queued_at_end_of_list() {
    let t = TestContext::new().offline();
    let board = add_board(&t.ctx, "Roadmap").await.unwrap();
    let list = add_list(&t.ctx, &board.id, "Todo").await.unwrap();

    let a = add_card(&t.ctx, &list.id, "First", None).await.unwrap();
    let b = add_card(&t.ctx, &list.id, "Second", Some("details".to_string()))
        .await
        .unwrap();

    assert_eq!(a.board_id, board.id);
    assert_eq!((a.position, b.position), (0.0, 1.0));
    assert_eq!(b.description.as_deref(), Some("details"));
    assert_eq!(t.ctx.queue.len().unwrap(), 4);
    assert!(t.remote_get::<Card>(&a.id).is_none());

    let cached = t.ctx.repository().cards_in_list(&list.id).unwrap();
    assert_eq!(cached.len(), 2);
}

#[tokio::test]
async fn test_add_card_unknown_list() {
    let t = TestContext::new();
    let err = add_card(&t.ctx, "list-missing", "Card", None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
}
