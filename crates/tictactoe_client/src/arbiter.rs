//! Optimistic turn checks made before a move is sent.
//!
//! These checks only save round trips and drive turn feedback. The server
//! decides legality; a move the arbiter allows can still be rejected.

use crate::snapshot::{GameSnapshot, LocalActorIdentity};
use derive_more::Display;
use tictactoe_board::Coord;
use tracing::instrument;

/// Whether the local actor may act on this snapshot.
#[instrument(skip(snapshot), fields(active = %snapshot.active_actor()))]
pub fn can_act(snapshot: &GameSnapshot, identity: LocalActorIdentity) -> bool {
    snapshot.winner().is_none() && *snapshot.active_actor() == *identity.actor_index()
}

/// Why a move was not sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum MoveRefusal {
    /// The game is over.
    #[display("The game is over")]
    GameOver,
    /// The other actor is to move.
    #[display("Not your turn")]
    NotYourTurn,
    /// The square already holds a mark.
    #[display("That square is taken")]
    CellOccupied,
}

/// Checks a concrete move against the last known snapshot.
#[instrument(skip(snapshot))]
pub fn vet_move(
    snapshot: &GameSnapshot,
    identity: LocalActorIdentity,
    coord: Coord,
) -> Result<(), MoveRefusal> {
    if snapshot.is_terminal() {
        return Err(MoveRefusal::GameOver);
    }
    if !can_act(snapshot, identity) {
        return Err(MoveRefusal::NotYourTurn);
    }
    if !snapshot.board().is_empty(coord) {
        return Err(MoveRefusal::CellOccupied);
    }
    Ok(())
}
