//! Session lifecycle: initialize, play, finish, leave.
//!
//! The controller is the single owner of the last-known snapshot and the
//! session state. Everything that happens to a session arrives as a
//! [`SessionEvent`] on one queue and is handled to completion before the next
//! event is looked at. Network calls run as spawned tasks that post their
//! results back onto the same queue, so a move and a poll can be in flight
//! together; whichever response is handled last wins.

use crate::arbiter::vet_move;
use crate::config::ClientConfig;
use crate::error::FetchError;
use crate::fetcher::{self, MoveOutcome, MoveReply};
use crate::reconciler::SnapshotStore;
use crate::render::{self, RenderInstruction};
use crate::scheduler::{PollScheduler, PollState};
use crate::server::GameServer;
use crate::snapshot::{GameSnapshot, LocalActorIdentity, ServerView, SessionId};
use crate::surface::PresentationSurface;
use derive_more::Display;
use std::sync::Arc;
use std::time::Duration;
use tictactoe_board::Coord;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, info, instrument, warn};

/// Lifecycle state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SessionState {
    /// Waiting for the first snapshot.
    Initializing,
    /// Game in progress; polling and accepting moves.
    Active,
    /// Game over; waiting out the exit delay.
    Terminal,
    /// Done. Nothing more happens.
    Exited,
}

/// Why a fetch was issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum FetchOrigin {
    /// Regular timer tick.
    Poll,
    /// The surface came back to the foreground.
    Visibility,
    /// Forced refresh after a move was accepted.
    FollowUp,
}

/// Everything that can happen to a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Poll timer fired.
    Tick,
    /// The surface became active again.
    VisibilityRegained,
    /// The player picked a square.
    MoveRequested(Coord),
    /// The player asked to leave.
    ExitRequested,
    /// A state request finished.
    StateFetched {
        /// Why it was sent.
        origin: FetchOrigin,
        /// What came back.
        result: Result<ServerView, FetchError>,
    },
    /// A move request finished.
    MoveCompleted {
        /// Square that was submitted.
        coord: Coord,
        /// What came back.
        result: Result<MoveOutcome, FetchError>,
    },
    /// The post-game delay ran out.
    ExitDelayElapsed,
}

/// Why a session ended.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ExitReason {
    /// The game reached a win or draw.
    #[display("game finished")]
    GameFinished,
    /// The server has no game for us.
    #[display("no active game ({_0})")]
    Absent(String),
    /// The first fetch failed, so no session was ever recorded.
    #[display("could not join game ({_0})")]
    InitFailed(FetchError),
    /// The player left.
    #[display("left by player")]
    UserExit,
}

/// Seat and game recorded at initialization.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SessionRecord {
    session_id: SessionId,
    identity: LocalActorIdentity,
}

/// Drives one game session from first fetch to exit.
pub struct SessionController<P> {
    server: Arc<dyn GameServer>,
    surface: P,
    exit_delay: Duration,
    state: SessionState,
    session: Option<SessionRecord>,
    store: SnapshotStore,
    scheduler: PollScheduler<SessionEvent>,
    events: mpsc::UnboundedSender<SessionEvent>,
    exit_timer: Option<JoinHandle<()>>,
    leave_task: Option<JoinHandle<()>>,
    exit_reason: Option<ExitReason>,
    /// A refusal or rejection message is covering the turn status.
    status_covered: bool,
}

impl<P: PresentationSurface> SessionController<P> {
    /// Creates a controller and the queue it consumes.
    #[instrument(skip_all)]
    pub fn new(
        server: Arc<dyn GameServer>,
        surface: P,
        config: &ClientConfig,
    ) -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let scheduler = PollScheduler::new(config.poll_interval(), SessionEvent::Tick, events.clone());
        let controller = Self {
            server,
            surface,
            exit_delay: config.exit_delay(),
            state: SessionState::Initializing,
            session: None,
            store: SnapshotStore::new(),
            scheduler,
            events,
            exit_timer: None,
            leave_task: None,
            exit_reason: None,
            status_covered: false,
        };
        (controller, receiver)
    }

    /// Sender for input adapters (moves, visibility, exit).
    pub fn sender(&self) -> mpsc::UnboundedSender<SessionEvent> {
        self.events.clone()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Poll timer state.
    pub fn poll_state(&self) -> PollState {
        self.scheduler.state()
    }

    /// Last snapshot applied.
    pub fn last_known(&self) -> Option<&GameSnapshot> {
        self.store.last_known()
    }

    /// Local seat, until the session exits.
    pub fn identity(&self) -> Option<LocalActorIdentity> {
        self.session.as_ref().map(|record| record.identity)
    }

    /// Game identifier, until the session exits.
    pub fn session_id(&self) -> Option<&SessionId> {
        self.session.as_ref().map(|record| &record.session_id)
    }

    /// Why the session ended, once it has.
    pub fn exit_reason(&self) -> Option<&ExitReason> {
        self.exit_reason.as_ref()
    }

    /// The surface render instructions go to.
    pub fn surface(&self) -> &P {
        &self.surface
    }

    /// Runs the session to completion.
    ///
    /// Returns once the session has exited, after giving the leave request a
    /// chance to reach the server.
    #[instrument(skip_all)]
    pub async fn run(
        mut self,
        mut events: mpsc::UnboundedReceiver<SessionEvent>,
    ) -> (Option<GameSnapshot>, ExitReason) {
        self.initialize().await;

        while self.state != SessionState::Exited {
            match events.recv().await {
                Some(event) => self.handle(event),
                None => break,
            }
        }

        if let Some(leave) = self.leave_task.take() {
            let _ = leave.await;
        }

        let reason = self.exit_reason.clone().unwrap_or(ExitReason::UserExit);
        info!(%reason, "Session finished");
        (self.store.last_known().cloned(), reason)
    }

    /// Issues the first fetch and either starts play or exits.
    ///
    /// A failed first fetch of any kind exits: without a snapshot there is no
    /// session to recover.
    #[instrument(skip(self))]
    pub async fn initialize(&mut self) {
        if self.state != SessionState::Initializing {
            warn!(state = %self.state, "Initialize called twice");
            return;
        }

        match fetcher::fetch(self.server.as_ref()).await {
            Ok(view) => {
                let (snapshot, identity) = view.into_parts();
                info!(
                    session_id = %snapshot.session_id(),
                    actor_index = %identity.actor_index(),
                    "Joined game"
                );
                self.session = Some(SessionRecord {
                    session_id: snapshot.session_id().clone(),
                    identity,
                });
                self.state = SessionState::Active;
                self.scheduler.start();
                self.apply_snapshot(snapshot);
            }
            Err(e) => {
                warn!(error = %e, "Initial fetch failed");
                self.exit(ExitReason::InitFailed(e));
            }
        }
    }

    /// Handles one event to completion.
    #[instrument(skip(self), fields(state = %self.state))]
    pub fn handle(&mut self, event: SessionEvent) {
        if self.state == SessionState::Exited {
            debug!("Session exited, discarding event");
            return;
        }

        match event {
            SessionEvent::Tick => {
                if self.state == SessionState::Active && self.scheduler.is_polling() {
                    self.dispatch_fetch(FetchOrigin::Poll);
                } else {
                    debug!("Stale tick ignored");
                }
            }
            SessionEvent::VisibilityRegained => {
                if self.state == SessionState::Active {
                    self.dispatch_fetch(FetchOrigin::Visibility);
                }
            }
            SessionEvent::MoveRequested(coord) => self.attempt_move(coord),
            SessionEvent::ExitRequested => self.exit(ExitReason::UserExit),
            SessionEvent::StateFetched { origin, result } => self.on_state_fetched(origin, result),
            SessionEvent::MoveCompleted { coord, result } => self.on_move_completed(coord, result),
            SessionEvent::ExitDelayElapsed => {
                if self.state == SessionState::Terminal {
                    self.exit(ExitReason::GameFinished);
                }
            }
        }
    }

    fn dispatch_fetch(&self, origin: FetchOrigin) {
        debug!(%origin, "Dispatching state fetch");
        let server = Arc::clone(&self.server);
        let events = self.events.clone();
        tokio::spawn(
            async move {
                let result = fetcher::fetch(server.as_ref()).await;
                // Receiver gone means the session is over.
                let _ = events.send(SessionEvent::StateFetched { origin, result });
            }
            .in_current_span(),
        );
    }

    fn on_state_fetched(&mut self, origin: FetchOrigin, result: Result<ServerView, FetchError>) {
        match result {
            Ok(view) => self.apply_view(view),
            Err(e) if e.ends_session() => match self.state {
                SessionState::Active => {
                    warn!(%origin, error = %e, "Game is gone");
                    self.exit(ExitReason::Absent(e.message().to_string()));
                }
                _ => debug!(%origin, error = %e, "Ignoring absent game after finish"),
            },
            Err(e) => warn!(%origin, error = %e, "Fetch failed, next tick retries"),
        }
    }

    fn apply_view(&mut self, view: ServerView) {
        let (snapshot, viewer) = view.into_parts();
        if let Some(record) = &self.session {
            if record.identity != viewer {
                warn!(
                    expected = %record.identity.actor_index(),
                    reported = %viewer.actor_index(),
                    "Server reports a different seat, keeping ours"
                );
            }
            if &record.session_id != snapshot.session_id() {
                warn!(
                    expected = %record.session_id,
                    reported = %snapshot.session_id(),
                    "Snapshot belongs to another game"
                );
            }
        }
        self.apply_snapshot(snapshot);
    }

    /// Replaces the last-known snapshot, then renders and checks for a finish.
    fn apply_snapshot(&mut self, snapshot: GameSnapshot) {
        let Some(identity) = self.identity() else {
            return;
        };

        let delta = self.store.apply(snapshot);
        let Some(current) = self.store.last_known() else {
            return;
        };
        let mut instructions = render::plan(delta, current, identity);
        let has_status = instructions
            .iter()
            .any(|instruction| matches!(instruction, RenderInstruction::Status(_)));
        if self.status_covered && !has_status {
            instructions.push(RenderInstruction::Status(render::status_message(
                current, identity,
            )));
        }
        self.status_covered = false;
        let finished = current.is_terminal();

        for instruction in instructions {
            self.surface.render(instruction);
        }

        if finished && self.state == SessionState::Active {
            self.enter_terminal();
        }
    }

    fn enter_terminal(&mut self) {
        self.scheduler.stop();
        self.state = SessionState::Terminal;
        info!(delay_ms = self.exit_delay.as_millis() as u64, "Game over");

        let delay = self.exit_delay;
        let events = self.events.clone();
        self.exit_timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = events.send(SessionEvent::ExitDelayElapsed);
        }));
    }

    fn attempt_move(&mut self, coord: Coord) {
        if self.state != SessionState::Active {
            debug!(%coord, "Move ignored outside active play");
            return;
        }
        let (Some(snapshot), Some(identity)) = (self.store.last_known(), self.identity()) else {
            return;
        };

        if let Err(refusal) = vet_move(snapshot, identity, coord) {
            info!(%coord, %refusal, "Move not sent");
            self.show_notice(refusal.to_string());
            return;
        }

        let server = Arc::clone(&self.server);
        let events = self.events.clone();
        tokio::spawn(
            async move {
                let result = fetcher::submit(server.as_ref(), coord).await;
                let _ = events.send(SessionEvent::MoveCompleted { coord, result });
            }
            .in_current_span(),
        );
    }

    fn on_move_completed(&mut self, coord: Coord, result: Result<MoveOutcome, FetchError>) {
        match result {
            Ok(MoveOutcome::Accepted(reply)) => {
                info!(%coord, "Move accepted");
                match reply {
                    Some(MoveReply::Full(view)) => self.apply_view(view),
                    Some(MoveReply::Turn(update)) => {
                        if let Some(next) = self.store.last_known().map(|s| s.with_turn(update)) {
                            self.apply_snapshot(next);
                        }
                    }
                    None => debug!("Move reply carried no state"),
                }
                if self.state == SessionState::Active {
                    self.dispatch_fetch(FetchOrigin::FollowUp);
                }
            }
            Ok(MoveOutcome::Rejected { message }) => {
                info!(%coord, %message, "Move rejected by server");
                self.show_notice(message);
            }
            Err(e) => {
                warn!(%coord, error = %e, "Move request failed");
                self.show_notice(format!("Move failed: {}", e));
            }
        }
    }

    /// Shows a one-off message in the status line. The turn status comes
    /// back with the next applied snapshot.
    fn show_notice(&mut self, message: String) {
        self.status_covered = true;
        self.surface.render(RenderInstruction::Status(message));
    }

    /// Ends the session. Only the first call has any effect.
    fn exit(&mut self, reason: ExitReason) {
        if self.state == SessionState::Exited {
            return;
        }

        self.scheduler.stop();
        if let Some(timer) = self.exit_timer.take() {
            timer.abort();
        }

        if let Some(record) = self.session.take() {
            let server = Arc::clone(&self.server);
            self.leave_task = Some(tokio::spawn(
                async move {
                    if let Err(e) = server.leave_session().await {
                        warn!(error = %e, "Leave request failed");
                    }
                }
                .in_current_span(),
            ));
            debug!(session_id = %record.session_id, "Session discarded");
        }

        info!(%reason, "Session exited");
        self.state = SessionState::Exited;
        self.exit_reason = Some(reason);
        self.surface.render(RenderInstruction::RedirectToLobby);
    }
}
