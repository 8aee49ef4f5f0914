//! Client-side synchronization for a remote tic-tac-toe game.
//!
//! The server owns the game. This crate keeps one client's view of it current
//! by polling, decides locally whether the player may move, submits moves and
//! leaves the game once it is over.
//!
//! # Architecture
//!
//! - **Fetcher**: one request per call, every failure normalized to a
//!   [`FetchError`] kind
//! - **Reconciler**: structural diff between the last-known and the new
//!   snapshot
//! - **Arbiter**: optimistic turn checks ([`can_act`], [`vet_move`])
//! - **Scheduler**: a single poll timer posting ticks onto the event queue
//! - **Controller**: the session state machine that owns everything else
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use tictactoe_client::{ClientConfig, RestGameServer, SessionController, TracingSurface};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ClientConfig::default().with_session_cookie("session=abc");
//! let server = Arc::new(RestGameServer::new(&config)?);
//! let (controller, events) = SessionController::new(server, TracingSurface, &config);
//! let (_last_known, reason) = controller.run(events).await;
//! println!("{reason}");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod arbiter;
mod config;
mod controller;
mod error;
mod fetcher;
mod reconciler;
mod render;
mod scheduler;
mod server;
mod snapshot;
mod surface;
mod tui;
mod wire;

// Crate-level exports - Configuration and errors
pub use config::{ClientConfig, SESSION_COOKIE_ENV};
pub use error::{ConfigError, FetchError};

// Crate-level exports - Server access
pub use fetcher::{MoveOutcome, MoveReply, fetch, normalize_move, normalize_state, submit};
pub use server::{GameServer, RestGameServer};
pub use wire::{MoveRequest, StateResponse};

// Crate-level exports - Snapshots and reconciliation
pub use reconciler::{ReconciliationDelta, SnapshotStore, reconcile};
pub use snapshot::{GameSnapshot, LocalActorIdentity, ServerView, SessionId, TurnUpdate};

// Crate-level exports - Turn logic and rendering
pub use arbiter::{MoveRefusal, can_act, vet_move};
pub use render::{CellView, RenderInstruction, cell_views, plan, status_message};
pub use surface::{PresentationSurface, TracingSurface};

// Crate-level exports - Session control
pub use controller::{ExitReason, FetchOrigin, SessionController, SessionEvent, SessionState};
pub use scheduler::{PollHandle, PollScheduler, PollState};

// Crate-level exports - Terminal UI
pub use tui::{GameView, TerminalSurface, key_to_event, run_tui, translate};
