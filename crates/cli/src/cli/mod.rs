// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Parse a string that must not be empty or whitespace-only.
fn non_empty_string(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        Err("cannot be empty".to_string())
    } else {
        Ok(s.to_string())
    }
}

#[derive(Parser, Debug)]
#[command(name = "cardsync")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Local-first task board cache with offline mutation sync")]
pub struct Cli {
    /// Path to config.toml (defaults to $CARDSYNC_CONFIG or the user config dir)
    #[arg(long, global = true, value_name = "path")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write a config file and create the local cache
    Init {
        /// WebSocket URL of the remote store (ws:// or wss://)
        #[arg(long)]
        remote: Option<String>,

        /// User recorded when archiving cards
        #[arg(long)]
        user: Option<String>,

        /// Directory for the cache database and log
        #[arg(long, value_name = "path")]
        data_dir: Option<PathBuf>,

        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Show connectivity and pending mutation counts
    Status,

    /// Push queued mutations to the remote store once
    Sync,

    /// Stay connected and sync in the background until interrupted
    Run,

    /// Refresh the local cache with a board from the remote store
    Pull {
        /// Board ID
        board: String,
    },

    /// Board commands
    #[command(subcommand)]
    Board(BoardCommand),

    /// List commands
    #[command(subcommand)]
    List(ListCommand),

    /// Card commands
    #[command(subcommand)]
    Card(CardCommand),

    /// Archive card(s)
    #[command(arg_required_else_help = true)]
    Archive {
        /// Card ID(s)
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Restore archived card(s) to the end of a list
    #[command(arg_required_else_help = true)]
    Restore {
        /// Card ID(s)
        #[arg(required = true)]
        ids: Vec<String>,

        /// Destination list (defaults to the list each card was archived from)
        #[arg(long, value_name = "LIST")]
        to: Option<String>,
    },

    /// Permanently delete an archived card
    #[command(arg_required_else_help = true)]
    Delete {
        /// Card ID
        id: String,
    },

    /// List a board's archived cards, most recent first
    Archived {
        /// Board ID
        board: String,
    },

    /// Show archive statistics for a board
    Stats {
        /// Board ID
        board: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum BoardCommand {
    /// Create a board
    Add {
        #[arg(value_parser = non_empty_string)]
        title: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ListCommand {
    /// Append a list to a board
    Add {
        /// Board ID
        board: String,

        #[arg(value_parser = non_empty_string)]
        title: String,
    },

    /// Show a board's lists
    Show {
        /// Board ID
        board: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum CardCommand {
    /// Append a card to a list
    Add {
        /// List ID
        list: String,

        #[arg(value_parser = non_empty_string)]
        title: String,

        /// Card description
        #[arg(long, short)]
        description: Option<String>,
    },

    /// Show the active cards of a list
    List {
        /// List ID
        list: String,
    },
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
