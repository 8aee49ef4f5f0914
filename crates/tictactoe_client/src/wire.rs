//! JSON shapes exchanged with the game server.

use serde::{Deserialize, Serialize};

/// Body returned by both the state and the move endpoints.
///
/// Every field except `status` is optional on the wire; the fetcher decides
/// whether enough of them are present to form a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateResponse {
    /// `"success"` or `"error"`.
    pub status: String,
    /// Game identifier (string or number).
    #[serde(default)]
    pub game_id: Option<serde_json::Value>,
    /// Seat of the requesting player.
    #[serde(default)]
    pub player_num: Option<serde_json::Value>,
    /// Seat whose turn it is.
    #[serde(default)]
    pub current_player: Option<serde_json::Value>,
    /// Rows of `""`, `"X"` or `"O"`.
    #[serde(default)]
    pub board: Option<Vec<Vec<String>>>,
    /// Player names in seat order.
    #[serde(default)]
    pub players: Option<Vec<String>>,
    /// `null`, `"draw"`, `0` or `1`.
    #[serde(default)]
    pub winner: Option<serde_json::Value>,
    /// Human-readable explanation, mostly on errors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl StateResponse {
    /// Whether the server reported success.
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

/// Body of a move request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    /// Row, 0 at the top.
    pub row: usize,
    /// Column, 0 at the left.
    pub col: usize,
}
