//! Fixed-cadence poll timer.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, instrument};

/// Whether a timer is installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    /// No timer.
    Idle,
    /// A timer is posting ticks.
    Polling,
}

/// A running timer task. Dropping the handle stops the timer.
#[derive(Debug)]
pub struct PollHandle {
    task: JoinHandle<()>,
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Posts a tick message onto an event queue at a fixed interval.
///
/// At most one timer exists at any time: [`PollScheduler::start`] tears down
/// the previous timer before installing a new one. The scheduler never
/// fetches anything itself and does not stop overlapping fetches; it only
/// says when the next one is due.
#[derive(Debug)]
pub struct PollScheduler<T> {
    interval: Duration,
    tick: T,
    sink: mpsc::UnboundedSender<T>,
    handle: Option<PollHandle>,
}

impl<T> PollScheduler<T>
where
    T: Clone + Send + std::fmt::Debug + 'static,
{
    /// Creates an idle scheduler that will post clones of `tick` to `sink`.
    pub fn new(interval: Duration, tick: T, sink: mpsc::UnboundedSender<T>) -> Self {
        Self {
            interval,
            tick,
            sink,
            handle: None,
        }
    }

    /// Current state.
    pub fn state(&self) -> PollState {
        if self.handle.is_some() {
            PollState::Polling
        } else {
            PollState::Idle
        }
    }

    /// Whether a timer is installed.
    pub fn is_polling(&self) -> bool {
        self.state() == PollState::Polling
    }

    /// Installs a fresh timer, replacing any existing one.
    ///
    /// The first tick is posted one interval from now.
    #[instrument(skip(self), fields(interval_ms = self.interval.as_millis() as u64))]
    pub fn start(&mut self) {
        self.stop();

        let interval = self.interval;
        let tick = self.tick.clone();
        let sink = self.sink.clone();
        let task = tokio::spawn(async move {
            let mut timer = tokio::time::interval_at(Instant::now() + interval, interval);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                timer.tick().await;
                if sink.send(tick.clone()).is_err() {
                    debug!("Tick receiver dropped, timer exiting");
                    break;
                }
            }
        });

        self.handle = Some(PollHandle { task });
        info!("Polling started");
    }

    /// Removes the timer. Does nothing when idle.
    #[instrument(skip(self))]
    pub fn stop(&mut self) {
        if self.handle.take().is_some() {
            info!("Polling stopped");
        }
    }
}
