// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::db::Database;
use crate::env;
use crate::error::{Error, Result};

pub fn run(
    config_path: &Path,
    remote: Option<String>,
    user: Option<String>,
    data_dir: Option<PathBuf>,
    force: bool,
) -> Result<()> {
    let config = init_impl(config_path, remote, user, data_dir, force)?;

    println!("Initialized cardsync at {}", config.data_dir.display());
    println!("Config: {}", config_path.display());
    match &config.remote.url {
        Some(url) => println!("Remote: {}", url),
        None => println!("Remote: none (offline only)"),
    }
    Ok(())
}

pub(crate) fn init_impl(
    config_path: &Path,
    remote: Option<String>,
    user: Option<String>,
    data_dir: Option<PathBuf>,
    force: bool,
) -> Result<Config> {
    if config_path.exists() && !force {
        return Err(Error::Config(format!(
            "already initialized: {} exists (use --force to overwrite)",
            config_path.display()
        )));
    }

    let mut config = Config::default();
    if let Some(dir) = data_dir.or_else(env::data_dir) {
        config.data_dir = dir;
    }
    if let Some(user) = user {
        config.user_id = user;
    }
    config.remote.url = remote;
    config.validate()?;

    fs::create_dir_all(&config.data_dir)?;
    Database::open(&config.db_path())?;
    config.save(config_path)?;
    Ok(config)
}

#[cfg(test)]
#[path = "init_tests.rs"]
mod tests;
