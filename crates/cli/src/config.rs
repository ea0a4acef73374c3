// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Client configuration.
//!
//! Configuration is stored in `config.toml`, by default under
//! `$XDG_CONFIG_HOME/cardsync/`. Every field has a default, so an empty or
//! missing file is a valid configuration:
//!
//! ```toml
//! data_dir = "/home/me/.local/share/cardsync"
//! log_level = "info"
//! user_id = "me"
//!
//! [remote]
//! url = "ws://127.0.0.1:7890"
//! reconnect_max_retries = 10
//!
//! [sync]
//! interval_secs = 30
//! max_retries = 5
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::env;
use crate::error::{Error, Result};
use crate::remote::WebSocketConfig;
use crate::sync::SyncConfig;

const CONFIG_DIR_NAME: &str = "cardsync";
const CONFIG_FILE_NAME: &str = "config.toml";
const DB_FILE_NAME: &str = "cache.db";
const LOG_FILE_NAME: &str = "cardsync.log";
const LOCK_FILE_NAME: &str = "cardsync.lock";

/// Client configuration stored in `config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directory for the cache database, log file and lock file.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Log filter used when `RUST_LOG` is not set (e.g. "info" or "cardsync=debug").
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// User recorded as the archiver of cards.
    #[serde(default = "default_user_id")]
    pub user_id: String,
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub sync: SyncSettings,
}

/// Remote store connection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// WebSocket URL of the cardsync-remote server. Absent means offline-only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Consecutive failed connection attempts before giving up (0 = unlimited).
    #[serde(default = "default_reconnect_max_retries")]
    pub reconnect_max_retries: u32,
    /// Maximum delay between reconnection attempts in seconds.
    #[serde(default = "default_reconnect_max_delay_secs")]
    pub reconnect_max_delay_secs: u64,
    /// Delay before the first reconnection attempt in milliseconds.
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
    /// Time allowed for the handshake and each request in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

/// Sync engine settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncSettings {
    /// Seconds between background drains.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// Failures a queued mutation may accumulate before it is dropped.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join(CONFIG_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(".cardsync"))
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_user_id() -> String {
    "local".to_string()
}

fn default_reconnect_max_retries() -> u32 {
    10
}

fn default_reconnect_max_delay_secs() -> u64 {
    30
}

fn default_initial_delay_ms() -> u64 {
    100
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_interval_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    5
}

impl Default for RemoteConfig {
    fn default() -> Self {
        RemoteConfig {
            url: None,
            reconnect_max_retries: default_reconnect_max_retries(),
            reconnect_max_delay_secs: default_reconnect_max_delay_secs(),
            initial_delay_ms: default_initial_delay_ms(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Default for SyncSettings {
    fn default() -> Self {
        SyncSettings {
            interval_secs: default_interval_secs(),
            max_retries: default_max_retries(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            user_id: default_user_id(),
            remote: RemoteConfig::default(),
            sync: SyncSettings::default(),
        }
    }
}

/// Default location of the config file.
///
/// `CARDSYNC_CONFIG` wins, then `$XDG_CONFIG_HOME/cardsync/config.toml`.
pub fn default_config_path() -> PathBuf {
    env::config_path().unwrap_or_else(|| {
        dirs::config_dir()
            .map(|d| d.join(CONFIG_DIR_NAME))
            .unwrap_or_else(|| PathBuf::from(".cardsync"))
            .join(CONFIG_FILE_NAME)
    })
}

impl Config {
    /// Loads configuration from the given file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {}", path.display(), e)))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse {}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the file if it exists, otherwise the defaults.
    ///
    /// `CARDSYNC_DATA_DIR` and `CARDSYNC_REMOTE_URL` override the file.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            Self::load(path)?
        } else {
            Config::default()
        };
        if let Some(dir) = env::data_dir() {
            config.data_dir = dir;
        }
        if let Some(url) = env::remote_url() {
            config.remote.url = Some(url);
        }
        config.validate()?;
        Ok(config)
    }

    /// Saves configuration to the given file, creating its directory.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize config: {}", e)))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Checks values that parse but cannot work.
    pub fn validate(&self) -> Result<()> {
        if let Some(url) = &self.remote.url {
            if !(url.starts_with("ws://") || url.starts_with("wss://")) {
                return Err(Error::Config(format!(
                    "invalid remote URL '{}': must start with ws:// or wss://",
                    url
                )));
            }
        }
        if self.sync.interval_secs == 0 {
            return Err(Error::Config(
                "sync.interval_secs must be greater than 0".to_string(),
            ));
        }
        if self.remote.request_timeout_secs == 0 {
            return Err(Error::Config(
                "remote.request_timeout_secs must be greater than 0".to_string(),
            ));
        }
        if tracing_subscriber::EnvFilter::try_new(&self.log_level).is_err() {
            return Err(Error::Config(format!(
                "invalid log_level '{}'",
                self.log_level
            )));
        }
        Ok(())
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE_NAME)
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join(LOG_FILE_NAME)
    }

    pub fn lock_path(&self) -> PathBuf {
        self.data_dir.join(LOCK_FILE_NAME)
    }

    /// WebSocket client settings, if a remote is configured.
    pub fn websocket_config(&self) -> Option<WebSocketConfig> {
        let url = self.remote.url.as_ref()?;
        let mut ws = WebSocketConfig::new(url.clone());
        ws.request_timeout = Duration::from_secs(self.remote.request_timeout_secs);
        ws.max_retries = self.remote.reconnect_max_retries;
        ws.initial_delay_ms = self.remote.initial_delay_ms;
        ws.max_delay_secs = self.remote.reconnect_max_delay_secs;
        Some(ws)
    }

    pub fn sync_config(&self) -> SyncConfig {
        SyncConfig {
            interval: Duration::from_secs(self.sync.interval_secs),
            max_retries: self.sync.max_retries,
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
