//! Error types for the sync engine.

use derive_more::{Display, Error};
use tracing::instrument;

/// Why a request to the game server did not yield a usable snapshot.
///
/// Every network or decoding failure is mapped onto one of these kinds at the
/// fetcher boundary; nothing rawer reaches the reconciler or the controller.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum FetchError {
    /// The request never produced a readable response. The next poll retries.
    #[display("transport failure: {message}")]
    Transport {
        /// What went wrong.
        message: String,
    },
    /// The server says there is no game for this client.
    #[display("no active game: {message}")]
    Absent {
        /// Server-provided explanation.
        message: String,
    },
    /// The server answered, but without the fields a snapshot needs.
    #[display("malformed snapshot: {message}")]
    Malformed {
        /// Which part was missing or invalid.
        message: String,
    },
}

impl FetchError {
    /// Creates a transport failure.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Creates an absent-game signal.
    pub fn absent(message: impl Into<String>) -> Self {
        Self::Absent {
            message: message.into(),
        }
    }

    /// Creates a malformed-snapshot error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }

    /// The underlying message, without the kind prefix.
    pub fn message(&self) -> &str {
        match self {
            FetchError::Transport { message }
            | FetchError::Absent { message }
            | FetchError::Malformed { message } => message,
        }
    }

    /// Whether this failure ends the session.
    ///
    /// A malformed snapshot counts as absent: acting on a partial snapshot
    /// could produce inconsistent turn decisions.
    pub fn ends_session(&self) -> bool {
        !matches!(self, FetchError::Transport { .. })
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        Self::transport(err.to_string())
    }
}

/// Configuration error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
