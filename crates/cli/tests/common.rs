// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow unused items: test helpers are shared across multiple test binaries,
// and not every test file uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;

pub use predicates::prelude::*;
pub use tempfile::TempDir;

/// A `cardsync` command whose config and data live in `temp`.
pub fn cardsync(temp: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("cardsync");
    cmd.env("CARDSYNC_CONFIG", temp.path().join("config.toml"))
        .env("CARDSYNC_DATA_DIR", temp.path().join("data"))
        .env_remove("CARDSYNC_REMOTE_URL")
        .env_remove("RUST_LOG");
    cmd
}

/// Helper to create an initialized, offline-only temp directory
pub fn init_temp() -> TempDir {
    let temp = TempDir::new().unwrap();
    cardsync(&temp).arg("init").assert().success();
    temp
}

/// Run a create command and return the id it printed.
pub fn create(temp: &TempDir, args: &[&str]) -> String {
    let output = cardsync(temp).args(args).output().unwrap();
    assert!(output.status.success(), "{:?}", output);
    String::from_utf8_lossy(&output.stdout)
        .split_whitespace()
        .nth(2)
        .unwrap()
        .to_string()
}
