//! Client configuration.

use crate::error::ConfigError;
use derive_getters::Getters;
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Environment variable consulted for the session cookie.
pub const SESSION_COOKIE_ENV: &str = "TICTACTOE_SESSION_COOKIE";

/// Settings for one client session.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
pub struct ClientConfig {
    /// Base URL of the game server.
    #[serde(default = "default_server_url")]
    #[setters(into)]
    server_url: String,

    /// Milliseconds between poll ticks.
    #[serde(default = "default_poll_interval_ms")]
    poll_interval_ms: u64,

    /// Milliseconds between reaching a finished game and leaving it.
    #[serde(default = "default_exit_delay_ms")]
    exit_delay_ms: u64,

    /// Per-request timeout handed to the HTTP client.
    #[serde(default = "default_request_timeout_ms")]
    request_timeout_ms: u64,

    /// Raw `Cookie` header value identifying this player to the server.
    #[serde(default)]
    #[setters(strip_option, into)]
    session_cookie: Option<String>,
}

#[instrument]
fn default_server_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

#[instrument]
fn default_poll_interval_ms() -> u64 {
    1000
}

#[instrument]
fn default_exit_delay_ms() -> u64 {
    3000
}

#[instrument]
fn default_request_timeout_ms() -> u64 {
    5000
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            poll_interval_ms: default_poll_interval_ms(),
            exit_delay_ms: default_exit_delay_ms(),
            request_timeout_ms: default_request_timeout_ms(),
            session_cookie: None,
        }
    }
}

impl ClientConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        info!(server_url = %config.server_url, "Config loaded successfully");
        Ok(config)
    }

    /// Loads the file if it exists, falling back to defaults.
    ///
    /// The session cookie is taken from the environment when the file does
    /// not set one.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let mut config = if path.as_ref().exists() {
            Self::from_file(path)?
        } else {
            info!("Config file not found, using defaults");
            Self::default()
        };

        if config.session_cookie.is_none() {
            if let Ok(cookie) = std::env::var(SESSION_COOKIE_ENV) {
                debug!("Using session cookie from environment");
                config.session_cookie = Some(cookie);
            }
        }

        Ok(config)
    }

    /// Rejects values the engine cannot run with.
    #[instrument(skip(self))]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server_url.trim().is_empty() {
            return Err(ConfigError::new("server_url must not be empty"));
        }
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::new("poll_interval_ms must be positive"));
        }
        Ok(())
    }

    /// Poll cadence.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Delay between a terminal snapshot and leaving the game.
    pub fn exit_delay(&self) -> Duration {
        Duration::from_millis(self.exit_delay_ms)
    }

    /// HTTP request timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
