// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Replays queued mutations against the remote store.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐  enqueue   ┌─────────────┐
//! │ Repository  │───────────►│  SyncQueue  │
//! └─────────────┘            └──────┬──────┘
//!                                   │ drain (FIFO)
//!  NetworkMonitor ──online──► ┌─────▼──────┐      ┌─────────────┐
//!  interval tick ───────────► │ SyncEngine │─────►│ RemoteStore │
//!                             └─────┬──────┘      └─────────────┘
//!                                   │ mark synced
//!                             ┌─────▼──────┐
//!                             │ LocalStore │
//!                             └────────────┘
//! ```
//!
//! # Features
//!
//! - Single-flight drain guarded by an atomic flag
//! - Per-item retry count, items dropped once over the limit
//! - Only records whose mutations were flushed are marked synced
//! - Periodic and on-reconnect draining

mod engine;

pub use engine::{DrainOutcome, DrainReport, SkipReason, SyncConfig, SyncEngine};
