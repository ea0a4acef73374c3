// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use tempfile::TempDir;

#[test]
fn test_init_writes_config_and_cache() {
    let temp = TempDir::new().unwrap();
    let config_path = temp.path().join("conf").join("config.toml");
    let data = temp.path().join("data");

    let config = init_impl(
        &config_path,
        Some("ws://localhost:7890".to_string()),
        Some("ana".to_string()),
        Some(data.clone()),
        false,
    )
    .unwrap();

    assert!(data.join("cache.db").exists());
    let loaded = Config::load(&config_path).unwrap();
    assert_eq!(loaded, config);
    assert_eq!(loaded.user_id, "ana");
}

#[test]
fn test_init_refuses_to_overwrite() {
    let temp = TempDir::new().unwrap();
    let config_path = temp.path().join("config.toml");
    let data = Some(temp.path().join("data"));

    init_impl(&config_path, None, None, data.clone(), false).unwrap();
    let err = init_impl(&config_path, None, None, data.clone(), false).unwrap_err();
    assert!(err.to_string().contains("already initialized"));

    init_impl(&config_path, None, Some("bo".to_string()), data, true).unwrap();
    assert_eq!(Config::load(&config_path).unwrap().user_id, "bo");
}

#[test]
fn test_init_rejects_non_websocket_remote() {
    let temp = TempDir::new().unwrap();
    let config_path = temp.path().join("config.toml");
    let err = init_impl(
        &config_path,
        Some("http://localhost".to_string()),
        None,
        Some(temp.path().join("data")),
        false,
    )
    .unwrap_err();
    assert!(matches!(err, Error::Config(_)));
    assert!(!config_path.exists());
}
