//! tictactoe_client - play a server-hosted game from the terminal.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command, PlayArgs};
use std::sync::Arc;
use tictactoe_client::{ClientConfig, RestGameServer, SessionController, TracingSurface, run_tui};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

/// Log file used while the terminal UI owns the screen.
const TUI_LOG_FILE: &str = "tictactoe_client.log";

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Play(args) => play(args).await,
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Join the current game and play it to the end.
#[instrument(skip_all, fields(headless = args.headless))]
async fn play(args: PlayArgs) -> Result<()> {
    if args.headless {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter())
            .with_writer(std::io::stderr)
            .init();
    } else {
        // Setup logging to file to avoid interfering with TUI
        let log_file = std::fs::File::create(TUI_LOG_FILE)?;
        tracing_subscriber::fmt()
            .with_env_filter(env_filter())
            .with_writer(Arc::new(log_file))
            .with_ansi(false)
            .init();
    }

    let config = args.apply(ClientConfig::load(&args.config)?);
    config.validate()?;
    info!(server_url = %config.server_url(), "Starting tictactoe client");

    let reason = if args.headless {
        let server = Arc::new(RestGameServer::new(&config)?);
        let (controller, events) = SessionController::new(server, TracingSurface, &config);
        let (_, reason) = controller.run(events).await;
        reason
    } else {
        run_tui(config).await?
    };

    println!("Session ended: {}", reason);
    Ok(())
}
