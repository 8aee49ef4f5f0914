//! The game server collaborator and its REST binding.

use crate::config::ClientConfig;
use crate::error::FetchError;
use crate::wire::{MoveRequest, StateResponse};
use reqwest::header::{CACHE_CONTROL, COOKIE, HeaderMap, HeaderValue};
use tictactoe_board::Coord;
use tracing::{debug, info, instrument, warn};

/// Operations the sync engine needs from the game server.
///
/// Implementations perform exactly one attempt per call and report any
/// failure to produce a decodable body as [`FetchError::Transport`] (or
/// [`FetchError::Malformed`] when the body decodes but has the wrong shape).
#[async_trait::async_trait]
pub trait GameServer: Send + Sync {
    /// Reads the current game state.
    async fn get_state(&self) -> Result<StateResponse, FetchError>;

    /// Places the caller's mark. Legality is decided by the server.
    async fn submit_move(&self, coord: Coord) -> Result<StateResponse, FetchError>;

    /// Leaves the current game.
    async fn leave_session(&self) -> Result<(), FetchError>;
}

/// Game server reached over HTTP.
#[derive(Debug, Clone)]
pub struct RestGameServer {
    base_url: String,
    client: reqwest::Client,
}

impl RestGameServer {
    /// Builds a client from configuration.
    ///
    /// The configured session cookie is sent on every request; the server uses
    /// it to find the caller's game.
    #[instrument(skip_all, fields(server_url = %config.server_url()))]
    pub fn new(config: &ClientConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        if let Some(cookie) = config.session_cookie() {
            let value = HeaderValue::from_str(cookie)
                .map_err(|e| FetchError::transport(format!("invalid session cookie: {}", e)))?;
            headers.insert(COOKIE, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout())
            .build()?;

        info!("Created REST game server client");
        Ok(Self {
            base_url: config.server_url().trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn decode(response: reqwest::Response) -> Result<StateResponse, FetchError> {
        let response = response.error_for_status()?;
        let body: serde_json::Value = response.json().await?;
        debug!(body = %body, "Server response");
        serde_json::from_value(body).map_err(|e| FetchError::malformed(e.to_string()))
    }
}

#[async_trait::async_trait]
impl GameServer for RestGameServer {
    #[instrument(skip(self))]
    async fn get_state(&self) -> Result<StateResponse, FetchError> {
        let response = self
            .client
            .get(self.url("game_state"))
            .header(CACHE_CONTROL, "no-cache")
            .send()
            .await?;
        Self::decode(response).await
    }

    #[instrument(skip(self))]
    async fn submit_move(&self, coord: Coord) -> Result<StateResponse, FetchError> {
        info!("Submitting move");
        let request = MoveRequest {
            row: coord.row(),
            col: coord.col(),
        };
        let response = self
            .client
            .post(self.url("move"))
            .json(&request)
            .send()
            .await?;
        Self::decode(response).await
    }

    #[instrument(skip(self))]
    async fn leave_session(&self) -> Result<(), FetchError> {
        info!("Leaving game");
        let response = self.client.post(self.url("leave_room")).send().await?;
        if let Err(e) = response.error_for_status_ref() {
            warn!(error = %e, "Leave request failed");
            return Err(e.into());
        }
        Ok(())
    }
}
