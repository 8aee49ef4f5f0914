//! Value types describing server state as seen by one client.

use derive_getters::Getters;
use derive_more::Display;
use derive_new::new;
use serde::{Deserialize, Serialize};
use tictactoe_board::{ActorIndex, Board, Mark, Outcome};

/// Opaque identifier the server assigns to a game.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub struct SessionId(String);

impl From<String> for SessionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for SessionId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl SessionId {
    /// The identifier as sent by the server.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Which seat this client occupies. Fixed for the whole session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Getters, new)]
pub struct LocalActorIdentity {
    /// Seat assigned by the server at session start.
    actor_index: ActorIndex,
}

/// Complete, self-consistent game state at one instant.
///
/// Created from a server response and only ever read locally. Once `winner`
/// is set, `active_actor` no longer means anything.
#[derive(Debug, Clone, PartialEq, Eq, Getters, new)]
pub struct GameSnapshot {
    /// Board cells.
    board: Board,
    /// Seat whose turn it is while the game is ongoing.
    active_actor: ActorIndex,
    /// Names in seat order. An empty name marks a seat nobody has taken yet.
    actor_names: [String; 2],
    /// Terminal result, `None` while the game is ongoing.
    winner: Option<Outcome>,
    /// Server game identifier.
    session_id: SessionId,
}

impl GameSnapshot {
    /// Whether the game has ended in a win or a draw.
    pub fn is_terminal(&self) -> bool {
        self.winner.is_some()
    }

    /// Display name of a seat.
    pub fn name_of(&self, actor: ActorIndex) -> &str {
        &self.actor_names[actor.index()]
    }

    /// Whether both seats are taken.
    pub fn has_opponent(&self) -> bool {
        self.actor_names.iter().all(|name| !name.is_empty())
    }

    /// Mark of the winning actor, if someone won.
    pub fn winning_mark(&self) -> Option<Mark> {
        match self.winner {
            Some(Outcome::Won(actor)) => Some(actor.mark()),
            Some(Outcome::Draw) | None => None,
        }
    }
}

/// Board, turn and result as returned by an accepted move.
///
/// Move replies omit names and the game id, so an update is only meaningful
/// on top of the snapshot it follows.
#[derive(Debug, Clone, PartialEq, Eq, Getters, new)]
pub struct TurnUpdate {
    /// Board after the move.
    board: Board,
    /// Seat to move next.
    active_actor: ActorIndex,
    /// Result, if the move ended the game.
    winner: Option<Outcome>,
}

impl GameSnapshot {
    /// A new snapshot with this one's names and game id and the update's
    /// board, turn and result.
    pub fn with_turn(&self, update: TurnUpdate) -> GameSnapshot {
        GameSnapshot {
            board: update.board,
            active_actor: update.active_actor,
            actor_names: self.actor_names.clone(),
            winner: update.winner,
            session_id: self.session_id.clone(),
        }
    }
}

/// A snapshot together with the seat the server says the caller holds.
#[derive(Debug, Clone, PartialEq, Eq, Getters, new)]
pub struct ServerView {
    /// Shared game state.
    snapshot: GameSnapshot,
    /// The caller's seat.
    viewer: LocalActorIdentity,
}

impl ServerView {
    /// Splits the view into its parts.
    pub fn into_parts(self) -> (GameSnapshot, LocalActorIdentity) {
        (self.snapshot, self.viewer)
    }
}
