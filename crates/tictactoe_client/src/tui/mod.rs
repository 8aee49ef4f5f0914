//! Terminal UI for a remote game.
//!
//! The controller drives the screen through [`TerminalSurface`]; a blocking
//! input thread turns keys and focus changes into session events.

mod input;
mod view;

pub use input::{key_to_event, translate};
pub use view::GameView;

use crate::config::ClientConfig;
use crate::controller::{ExitReason, SessionController};
use crate::render::RenderInstruction;
use crate::server::RestGameServer;
use crate::surface::PresentationSurface;
use anyhow::{Result, anyhow};
use crossterm::{
    cursor::Show,
    event::{DisableFocusChange, EnableFocusChange},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::Backend, backend::CrosstermBackend};
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{error, info, instrument, warn};

/// Surface that redraws a ratatui terminal on every instruction.
pub struct TerminalSurface<B: Backend> {
    terminal: Terminal<B>,
    view: GameView,
}

impl<B: Backend> TerminalSurface<B> {
    /// Wraps an initialized terminal.
    pub fn new(terminal: Terminal<B>) -> Self {
        Self {
            terminal,
            view: GameView::default(),
        }
    }
}

impl<B: Backend + Send> PresentationSurface for TerminalSurface<B> {
    fn render(&mut self, instruction: RenderInstruction) {
        self.view.apply(instruction);
        let screen = &self.view;
        if let Err(e) = self.terminal.draw(|frame| view::draw(frame, screen)) {
            warn!(error = %e, "Failed to draw");
        }
    }
}

/// Runs one session with the terminal UI.
///
/// The caller must route logging away from stdout before calling this.
#[instrument(skip(config), fields(server_url = %config.server_url()))]
pub async fn run_tui(config: ClientConfig) -> Result<ExitReason> {
    let server = Arc::new(RestGameServer::new(&config)?);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableFocusChange)?;
    let terminal = match Terminal::new(CrosstermBackend::new(stdout)) {
        Ok(terminal) => terminal,
        Err(e) => {
            restore_terminal();
            return Err(e.into());
        }
    };

    let (controller, events) = SessionController::new(server, TerminalSurface::new(terminal), &config);
    let stop = Arc::new(AtomicBool::new(false));
    let input = input::spawn(controller.sender(), Arc::clone(&stop));

    info!("Session starting");
    let (_, reason) = controller.run(events).await;

    stop.store(true, Ordering::Relaxed);
    let joined = input.join();
    restore_terminal();

    joined.map_err(|_| anyhow!("input thread panicked"))?;
    info!(%reason, "Session ended");
    Ok(reason)
}

fn restore_terminal() {
    if let Err(e) = disable_raw_mode() {
        error!(error = %e, "Failed to leave raw mode");
    }
    if let Err(e) = execute!(io::stdout(), LeaveAlternateScreen, DisableFocusChange, Show) {
        error!(error = %e, "Failed to restore terminal");
    }
}
