// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! cardsync-core: Shared library for the cardsync task board
//!
//! This crate provides the board data model, mutation actions, the document
//! and filter model, and the wire protocol used by both the cardsync client
//! and the cardsync-remote document server.

pub mod board;
pub mod document;
pub mod error;
pub mod mutation;
pub mod protocol;

pub use board::{next_position, Board, Card, Entity, List, Member, Role};
pub use document::{Collection, Document, Filter, FilterOp};
pub use error::{Error, Result};
pub use mutation::{Action, EntityKind, Verb};
