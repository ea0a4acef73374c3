// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use tempfile::TempDir;

#[test]
fn test_filter_accepts_directives() {
    let f = filter("cardsync=debug,warn");
    assert!(!f.to_string().is_empty());
}

#[test]
fn test_filter_survives_bad_level() {
    // An unparseable level falls back rather than panicking.
    let _ = filter("cardsync=loud");
}

#[test]
fn test_init_creates_log_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("logs").join("cardsync.log");
    init(&path, "info");
    assert!(path.exists());
}
