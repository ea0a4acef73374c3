// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Board, list and card types.
//!
//! Field names serialize in camelCase because they double as remote
//! document field names (`listId`, `archivedAt`, `originalListId`, ...).

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::document::{to_document, Document};
use crate::error::{Error, Result};
use crate::mutation::EntityKind;

/// A cacheable, syncable entity.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Which table and collection this entity lives in.
    const KIND: EntityKind;

    /// Optional fields that serialize only when set.
    const CLEARABLE: &'static [&'static str] = &[];

    /// Primary key.
    fn id(&self) -> &str;

    /// Owning board, for entities indexed by board.
    fn board_id(&self) -> Option<&str> {
        None
    }

    /// Owning list, for entities indexed by list.
    fn list_id(&self) -> Option<&str> {
        None
    }

    /// Full snapshot as an update patch.
    ///
    /// Unset optional fields appear as `null` so that applying the patch
    /// removes them from the stored document.
    fn to_patch(&self) -> Result<Document> {
        let mut patch = to_document(self)?;
        for field in Self::CLEARABLE {
            patch
                .entry(field.to_string())
                .or_insert(serde_json::Value::Null);
        }
        Ok(patch)
    }
}

/// Permission level of a board member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Owner,
    Admin,
    Member,
    Observer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Owner => "owner",
            Role::Admin => "admin",
            Role::Member => "member",
            Role::Observer => "observer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "owner" => Ok(Role::Owner),
            "admin" => Ok(Role::Admin),
            "member" => Ok(Role::Member),
            "observer" => Ok(Role::Observer),
            _ => Err(Error::InvalidRole(s.to_string())),
        }
    }
}

/// A user's membership in a board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub user_id: String,
    pub role: Role,
    pub joined_at: DateTime<Utc>,
}

/// Top of the hierarchy: a workspace of lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub members: Vec<Member>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Board {
    /// Creates a board owned by `owner`.
    pub fn new(id: String, title: String, owner: String, created_at: DateTime<Utc>) -> Self {
        Board {
            id,
            title,
            description: None,
            members: vec![Member {
                user_id: owner,
                role: Role::Owner,
                joined_at: created_at,
            }],
            created_at,
            updated_at: created_at,
        }
    }

    /// Role of the given user, if they are a member.
    pub fn role_of(&self, user_id: &str) -> Option<Role> {
        self.members
            .iter()
            .find(|m| m.user_id == user_id)
            .map(|m| m.role)
    }
}

impl Entity for Board {
    const KIND: EntityKind = EntityKind::Board;
    const CLEARABLE: &'static [&'static str] = &["description"];

    fn id(&self) -> &str {
        &self.id
    }
}

fn default_list_type() -> String {
    "default".to_string()
}

/// A column of cards within a board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct List {
    pub id: String,
    pub board_id: String,
    pub title: String,
    pub position: f64,
    #[serde(rename = "type", default = "default_list_type")]
    pub list_type: String,
}

impl List {
    pub fn new(id: String, board_id: String, title: String, position: f64) -> Self {
        List {
            id,
            board_id,
            title,
            position,
            list_type: default_list_type(),
        }
    }
}

impl Entity for List {
    const KIND: EntityKind = EntityKind::List;

    fn id(&self) -> &str {
        &self.id
    }

    fn board_id(&self) -> Option<&str> {
        Some(&self.board_id)
    }
}

/// A task item within a list.
///
/// `archived` hides the card from the board while keeping it restorable;
/// `permanently_deleted` is a tombstone on top of an archived card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    pub list_id: String,
    pub board_id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub position: f64,
    #[serde(default)]
    pub archived: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archived_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archived_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_list_id: Option<String>,
    #[serde(default)]
    pub permanently_deleted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Card {
    pub fn new(
        id: String,
        board_id: String,
        list_id: String,
        title: String,
        position: f64,
        created_by: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Card {
            id,
            list_id,
            board_id,
            title,
            description: None,
            position,
            archived: false,
            archived_at: None,
            archived_by: None,
            original_list_id: None,
            permanently_deleted: false,
            deleted_at: None,
            created_by,
            created_at,
            updated_at: created_at,
        }
    }

    /// True for cards that belong on the board: neither archived nor tombstoned.
    pub fn is_active(&self) -> bool {
        !self.archived && !self.permanently_deleted
    }

    /// List a restore should return the card to when no target is given.
    pub fn restore_list_id(&self) -> &str {
        self.original_list_id.as_deref().unwrap_or(&self.list_id)
    }
}

impl Entity for Card {
    const KIND: EntityKind = EntityKind::Card;
    const CLEARABLE: &'static [&'static str] = &[
        "description",
        "archivedAt",
        "archivedBy",
        "originalListId",
        "deletedAt",
    ];

    fn id(&self) -> &str {
        &self.id
    }

    fn board_id(&self) -> Option<&str> {
        Some(&self.board_id)
    }

    fn list_id(&self) -> Option<&str> {
        Some(&self.list_id)
    }
}

/// Next trailing position after the given positions: `max + 1`, or `0` when empty.
pub fn next_position<I: IntoIterator<Item = f64>>(positions: I) -> f64 {
    positions
        .into_iter()
        .fold(None, |max: Option<f64>, p| match max {
            Some(m) if m >= p => Some(m),
            _ => Some(p),
        })
        .map(|max| max + 1.0)
        .unwrap_or(0.0)
}

#[cfg(test)]
#[path = "board_tests.rs"]
mod tests;
