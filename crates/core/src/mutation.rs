// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Mutation actions recorded in the sync queue.
//!
//! An [`Action`] names what happened to which kind of entity and is stored
//! as an `entity:verb` string (for example `card:update`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::document::Collection;
use crate::error::{Error, Result};

/// The three levels of the board hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Board,
    List,
    Card,
}

impl EntityKind {
    /// Returns the string representation used in storage and action strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Board => "board",
            EntityKind::List => "list",
            EntityKind::Card => "card",
        }
    }

    /// Remote collection holding documents of this kind.
    pub fn collection(&self) -> Collection {
        match self {
            EntityKind::Board => Collection::Boards,
            EntityKind::List => Collection::Lists,
            EntityKind::Card => Collection::Cards,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "board" => Ok(EntityKind::Board),
            "list" => Ok(EntityKind::List),
            "card" => Ok(EntityKind::Card),
            _ => Err(Error::InvalidEntityKind(s.to_string())),
        }
    }
}

/// What a queued mutation does to its entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verb {
    Create,
    Update,
    Delete,
}

impl Verb {
    /// Returns the string representation used in action strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Create => "create",
            Verb::Update => "update",
            Verb::Delete => "delete",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Verb {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "create" => Ok(Verb::Create),
            "update" => Ok(Verb::Update),
            "delete" => Ok(Verb::Delete),
            _ => Err(Error::InvalidVerb(s.to_string())),
        }
    }
}

/// An `entity:verb` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Action {
    pub entity: EntityKind,
    pub verb: Verb,
}

impl Action {
    pub fn new(entity: EntityKind, verb: Verb) -> Self {
        Action { entity, verb }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.entity, self.verb)
    }
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (entity, verb) = s
            .split_once(':')
            .ok_or_else(|| Error::InvalidAction(s.to_string()))?;
        Ok(Action {
            entity: entity.parse()?,
            verb: verb.parse()?,
        })
    }
}

impl Serialize for Action {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Action {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[path = "mutation_tests.rs"]
mod tests;
