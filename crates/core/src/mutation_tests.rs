// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use yare::parameterized;

#[parameterized(
    board_create = { "board:create", EntityKind::Board, Verb::Create },
    list_update = { "list:update", EntityKind::List, Verb::Update },
    card_delete = { "card:delete", EntityKind::Card, Verb::Delete },
)]
fn action_from_str_valid(input: &str, entity: EntityKind, verb: Verb) {
    let action: Action = input.parse().unwrap();
    assert_eq!(action, Action::new(entity, verb));
    assert_eq!(action.to_string(), input);
}

#[parameterized(
    no_separator = { "cardupdate" },
    unknown_entity = { "widget:update" },
    unknown_verb = { "card:upsert" },
    uppercase = { "Card:Update" },
    empty = { "" },
)]
fn action_from_str_invalid(input: &str) {
    assert!(input.parse::<Action>().is_err());
}

#[test]
fn action_serializes_as_string() {
    let action = Action::new(EntityKind::Card, Verb::Update);
    let json = serde_json::to_string(&action).unwrap();
    assert_eq!(json, "\"card:update\"");

    let parsed: Action = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, action);
}

#[test]
fn action_deserialize_rejects_garbage() {
    assert!(serde_json::from_str::<Action>("\"card\"").is_err());
}

#[parameterized(
    board = { EntityKind::Board, Collection::Boards },
    list = { EntityKind::List, Collection::Lists },
    card = { EntityKind::Card, Collection::Cards },
)]
fn entity_kind_collection(kind: EntityKind, expected: Collection) {
    assert_eq!(kind.collection(), expected);
}
