// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! WebSocket protocol messages for client-server communication.
//!
//! The protocol is request/response:
//! - Client sends document requests tagged with a client-chosen `request_id`
//! - Server answers each request with a response carrying the same id
//!
//! Responses may arrive out of order when several requests are in flight.

use serde::{Deserialize, Serialize};

use crate::document::{Collection, Document, Filter};

/// A single document operation against the remote store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    /// Fetch one document.
    Get { collection: Collection, id: String },
    /// Create or replace a document.
    Set {
        collection: Collection,
        id: String,
        data: Document,
    },
    /// Merge a patch into an existing document. Fails if absent.
    Update {
        collection: Collection,
        id: String,
        data: Document,
    },
    /// Remove a document. Succeeds if already absent.
    Delete { collection: Collection, id: String },
    /// Fetch all documents matching every filter.
    Query {
        collection: Collection,
        #[serde(default)]
        filters: Vec<Filter>,
    },
}

impl Request {
    /// Collection targeted by this request.
    pub fn collection(&self) -> Collection {
        match self {
            Request::Get { collection, .. }
            | Request::Set { collection, .. }
            | Request::Update { collection, .. }
            | Request::Delete { collection, .. }
            | Request::Query { collection, .. } => *collection,
        }
    }
}

/// Category of a failed request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The referenced document does not exist.
    NotFound,
    /// The request was malformed.
    Invalid,
    /// The server could not complete the request.
    Internal,
}

/// Result of a request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// Response to Get.
    Document { document: Option<Document> },
    /// Response to Query.
    Documents { documents: Vec<Document> },
    /// Response to Set, Update and Delete.
    Ack,
    /// The request failed.
    Failure { kind: FailureKind, message: String },
}

/// Messages sent from client to server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// A document request.
    Request { request_id: u64, request: Request },

    /// Ping message for keepalive.
    Ping {
        /// Client-chosen ID echoed in Pong.
        id: u64,
    },
}

/// Messages sent from server to client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Answer to the request with the same id.
    Response { request_id: u64, outcome: Outcome },

    /// Pong response to client Ping.
    Pong {
        /// Echoed from the Ping message.
        id: u64,
    },

    /// Error not tied to a request (for example an unparseable frame).
    Error {
        /// Human-readable error description.
        message: String,
    },
}

impl ClientMessage {
    /// Creates a Request message.
    pub fn request(request_id: u64, request: Request) -> Self {
        ClientMessage::Request {
            request_id,
            request,
        }
    }

    /// Creates a Ping message.
    pub fn ping(id: u64) -> Self {
        ClientMessage::Ping { id }
    }

    /// Serializes the message to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes the message from JSON.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

impl ServerMessage {
    /// Creates a Response message.
    pub fn response(request_id: u64, outcome: Outcome) -> Self {
        ServerMessage::Response {
            request_id,
            outcome,
        }
    }

    /// Creates a Pong message.
    pub fn pong(id: u64) -> Self {
        ServerMessage::Pong { id }
    }

    /// Creates an Error message.
    pub fn error(message: impl Into<String>) -> Self {
        ServerMessage::Error {
            message: message.into(),
        }
    }

    /// Serializes the message to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes the message from JSON.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

impl Outcome {
    /// Creates a Failure outcome.
    pub fn failure(kind: FailureKind, message: impl Into<String>) -> Self {
        Outcome::Failure {
            kind,
            message: message.into(),
        }
    }
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
