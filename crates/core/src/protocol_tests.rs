// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::document::FilterOp;
use serde_json::json;

fn data() -> Document {
    let mut doc = Document::new();
    doc.insert("id".into(), json!("c1"));
    doc.insert("title".into(), json!("Card"));
    doc
}

#[test]
fn request_wire_format() {
    let msg = ClientMessage::request(
        7,
        Request::Query {
            collection: Collection::Cards,
            filters: vec![Filter::new("position", FilterOp::Gt, 1)],
        },
    );
    let value: serde_json::Value = serde_json::from_str(&msg.to_json().unwrap()).unwrap();

    assert_eq!(value["type"], "request");
    assert_eq!(value["request_id"], 7);
    assert_eq!(value["request"]["op"], "query");
    assert_eq!(value["request"]["collection"], "cards");
    assert_eq!(value["request"]["filters"][0]["op"], ">");
}

#[test]
fn query_filters_default_to_empty() {
    let text = r#"{"type":"request","request_id":1,"request":{"op":"query","collection":"lists"}}"#;
    let msg = ClientMessage::from_json(text).unwrap();
    assert_eq!(
        msg,
        ClientMessage::request(
            1,
            Request::Query {
                collection: Collection::Lists,
                filters: vec![]
            }
        )
    );
}

#[test]
fn set_request_roundtrip() {
    let msg = ClientMessage::request(
        2,
        Request::Set {
            collection: Collection::Cards,
            id: "c1".into(),
            data: data(),
        },
    );
    let parsed = ClientMessage::from_json(&msg.to_json().unwrap()).unwrap();
    assert_eq!(parsed, msg);
}

#[test]
fn response_wire_format() {
    let msg = ServerMessage::response(3, Outcome::failure(FailureKind::NotFound, "cards/c9"));
    let value: serde_json::Value = serde_json::from_str(&msg.to_json().unwrap()).unwrap();

    assert_eq!(value["type"], "response");
    assert_eq!(value["request_id"], 3);
    assert_eq!(value["outcome"]["status"], "failure");
    assert_eq!(value["outcome"]["kind"], "not_found");
}

#[test]
fn document_outcome_with_missing_document() {
    let text = r#"{"type":"response","request_id":4,"outcome":{"status":"document","document":null}}"#;
    let msg = ServerMessage::from_json(text).unwrap();
    assert_eq!(
        msg,
        ServerMessage::response(4, Outcome::Document { document: None })
    );
}

#[test]
fn ping_pong_format() {
    assert_eq!(
        ClientMessage::ping(12345).to_json().unwrap(),
        r#"{"type":"ping","id":12345}"#
    );
    assert_eq!(
        ServerMessage::pong(12345).to_json().unwrap(),
        r#"{"type":"pong","id":12345}"#
    );
}

#[test]
fn request_collection() {
    let req = Request::Delete {
        collection: Collection::Boards,
        id: "b1".into(),
    };
    assert_eq!(req.collection(), Collection::Boards);
}

#[test]
fn unknown_message_type_is_rejected() {
    assert!(ClientMessage::from_json(r#"{"type":"snapshot"}"#).is_err());
}
