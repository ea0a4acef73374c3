// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access.
//!
//! Every runtime environment variable read by the CLI has a name constant
//! in [`vars`] and a typed accessor here.

use std::path::PathBuf;

/// Environment variable names.
pub mod vars {
    pub const CARDSYNC_CONFIG: &str = "CARDSYNC_CONFIG";
    pub const CARDSYNC_DATA_DIR: &str = "CARDSYNC_DATA_DIR";
    pub const CARDSYNC_REMOTE_URL: &str = "CARDSYNC_REMOTE_URL";
    pub const RUST_LOG: &str = "RUST_LOG";
}

fn path_var(name: &str) -> Option<PathBuf> {
    std::env::var_os(name)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// Returns the value of `CARDSYNC_CONFIG` if set.
pub fn config_path() -> Option<PathBuf> {
    path_var(vars::CARDSYNC_CONFIG)
}

/// Returns the value of `CARDSYNC_DATA_DIR` if set.
pub fn data_dir() -> Option<PathBuf> {
    path_var(vars::CARDSYNC_DATA_DIR)
}

/// Returns the value of `CARDSYNC_REMOTE_URL` if set and non-empty.
pub fn remote_url() -> Option<String> {
    std::env::var(vars::CARDSYNC_REMOTE_URL)
        .ok()
        .filter(|v| !v.is_empty())
}

/// Returns `true` if `RUST_LOG` is set, in which case it overrides the configured level.
pub fn rust_log_set() -> bool {
    std::env::var_os(vars::RUST_LOG).is_some()
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
