//! Command-line interface for tictactoe_client.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tictactoe_client::ClientConfig;

/// Tic-tac-toe client that stays in sync with a remote game server
#[derive(Parser, Debug)]
#[command(name = "tictactoe_client")]
#[command(about = "Play a server-hosted tic-tac-toe game from the terminal", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Join the current game and play it until it ends
    Play(PlayArgs),
}

/// Options for the play command. Flags override the config file.
#[derive(clap::Args, Debug, Clone, PartialEq, Eq)]
pub struct PlayArgs {
    /// Path to the client config file (optional)
    #[arg(short, long, default_value = "tictactoe_client.toml")]
    pub config: PathBuf,

    /// Game server URL
    #[arg(long)]
    pub server_url: Option<String>,

    /// Session cookie identifying the player, e.g. `session=...`
    #[arg(long)]
    pub cookie: Option<String>,

    /// Log render instructions instead of drawing a terminal UI
    #[arg(long)]
    pub headless: bool,
}

impl PlayArgs {
    /// Applies flag overrides on top of a loaded config.
    pub fn apply(&self, mut config: ClientConfig) -> ClientConfig {
        if let Some(url) = &self.server_url {
            config = config.with_server_url(url.clone());
        }
        if let Some(cookie) = &self.cookie {
            config = config.with_session_cookie(cookie.clone());
        }
        config
    }
}
