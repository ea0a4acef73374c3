// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use chrono::TimeZone;
use serde_json::json;
use yare::parameterized;

fn ts() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
}

fn test_card() -> Card {
    Card::new(
        "c1".into(),
        "b1".into(),
        "l1".into(),
        "Write docs".into(),
        0.0,
        "u1".into(),
        ts(),
    )
}

#[parameterized(
    owner = { "owner", Role::Owner },
    admin_upper = { "ADMIN", Role::Admin },
    member = { "member", Role::Member },
    observer = { "Observer", Role::Observer },
)]
fn role_from_str_valid(input: &str, expected: Role) {
    assert_eq!(input.parse::<Role>().unwrap(), expected);
}

#[test]
fn role_from_str_invalid() {
    assert!("guest".parse::<Role>().is_err());
}

#[test]
fn new_board_has_owner_member() {
    let board = Board::new("b1".into(), "Roadmap".into(), "u1".into(), ts());
    assert_eq!(board.role_of("u1"), Some(Role::Owner));
    assert_eq!(board.role_of("u2"), None);
    assert_eq!(board.updated_at, board.created_at);
}

#[test]
fn card_serializes_camel_case() {
    let card = test_card();
    let value = serde_json::to_value(&card).unwrap();

    assert_eq!(value["listId"], json!("l1"));
    assert_eq!(value["boardId"], json!("b1"));
    assert_eq!(value["createdBy"], json!("u1"));
    assert_eq!(value["archived"], json!(false));
    assert!(value.get("archivedAt").is_none());
    assert!(value.get("originalListId").is_none());
}

#[test]
fn card_archived_defaults_when_absent() {
    let value = json!({
        "id": "c1",
        "listId": "l1",
        "boardId": "b1",
        "title": "t",
        "position": 3,
        "createdBy": "u1",
        "createdAt": "2026-03-01T12:00:00Z",
        "updatedAt": "2026-03-01T12:00:00Z",
    });
    let card: Card = serde_json::from_value(value).unwrap();
    assert!(!card.archived);
    assert!(!card.permanently_deleted);
    assert_eq!(card.position, 3.0);
    assert!(card.is_active());
}

#[test]
fn list_type_serializes_as_type() {
    let list = List::new("l1".into(), "b1".into(), "Todo".into(), 1.0);
    let value = serde_json::to_value(&list).unwrap();
    assert_eq!(value["type"], json!("default"));
    assert_eq!(value["boardId"], json!("b1"));
}

#[test]
fn restore_list_prefers_original() {
    let mut card = test_card();
    assert_eq!(card.restore_list_id(), "l1");

    card.list_id = "l9".into();
    card.original_list_id = Some("l1".into());
    assert_eq!(card.restore_list_id(), "l1");
}

#[test]
fn tombstoned_card_is_not_active() {
    let mut card = test_card();
    card.archived = true;
    assert!(!card.is_active());

    card.archived = false;
    card.permanently_deleted = true;
    assert!(!card.is_active());
}

#[test]
fn entity_index_keys() {
    let card = test_card();
    assert_eq!(Entity::board_id(&card), Some("b1"));
    assert_eq!(Entity::list_id(&card), Some("l1"));

    let list = List::new("l1".into(), "b1".into(), "Todo".into(), 0.0);
    assert_eq!(Entity::board_id(&list), Some("b1"));
    assert_eq!(Entity::list_id(&list), None);

    let board = Board::new("b1".into(), "t".into(), "u1".into(), ts());
    assert_eq!(Entity::board_id(&board), None);
}

#[parameterized(
    empty = { vec![], 0.0 },
    single_zero = { vec![0.0], 1.0 },
    unordered = { vec![3.0, 1.0, 2.0], 4.0 },
    fractional = { vec![0.5, 1.25], 2.25 },
    negative = { vec![-4.0], -3.0 },
)]
fn next_position_after_max(positions: Vec<f64>, expected: f64) {
    assert_eq!(next_position(positions), expected);
}

#[test]
fn card_patch_nulls_unset_optional_fields() {
    let mut card = test_card();
    card.description = Some("kept".into());
    let patch = card.to_patch().unwrap();

    assert_eq!(patch["description"], json!("kept"));
    for field in ["archivedAt", "archivedBy", "originalListId", "deletedAt"] {
        assert_eq!(patch[field], serde_json::Value::Null, "{field}");
    }
    assert_eq!(patch["title"], json!("Write docs"));
}

#[test]
fn patch_clears_field_from_stored_document() {
    let mut card = test_card();
    card.description = Some("old".into());
    let mut stored = crate::document::to_document(&card).unwrap();

    card.description = None;
    crate::document::apply_patch(&mut stored, &card.to_patch().unwrap());

    assert!(!stored.contains_key("description"));
    let back: Card = crate::document::from_document(stored).unwrap();
    assert_eq!(back, card);
}

#[test]
fn list_patch_is_plain_snapshot() {
    let list = List::new("l1".into(), "b1".into(), "Todo".into(), 0.0);
    assert_eq!(
        list.to_patch().unwrap(),
        crate::document::to_document(&list).unwrap()
    );
}
