//! Render instructions for the presentation surface.

use crate::arbiter::can_act;
use crate::reconciler::ReconciliationDelta;
use crate::snapshot::{GameSnapshot, LocalActorIdentity};
use tictactoe_board::{Coord, Mark, Outcome, winning_cells};
use tracing::instrument;

/// How one square should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellView {
    /// Square address.
    pub coord: Coord,
    /// Mark to draw, if any.
    pub mark: Option<Mark>,
    /// Part of the winning line.
    pub winning: bool,
}

/// One update for the presentation surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderInstruction {
    /// All nine squares, row-major.
    Board(Vec<CellView>),
    /// Names in seat order.
    ActorNames([String; 2]),
    /// Turn or result message.
    Status(String),
    /// Leave the game screen.
    RedirectToLobby,
}

/// Turns a delta into the instructions needed to bring the surface up to
/// date. An empty delta yields nothing.
#[instrument(skip(snapshot))]
pub fn plan(
    delta: ReconciliationDelta,
    snapshot: &GameSnapshot,
    identity: LocalActorIdentity,
) -> Vec<RenderInstruction> {
    let mut instructions = Vec::new();

    if delta.board_changed || delta.became_terminal {
        instructions.push(RenderInstruction::Board(cell_views(snapshot)));
    }
    if delta.actors_changed {
        instructions.push(RenderInstruction::ActorNames(
            snapshot.actor_names().clone(),
        ));
    }
    if !delta.is_empty() {
        instructions.push(RenderInstruction::Status(status_message(
            snapshot, identity,
        )));
    }

    instructions
}

/// Every square with its mark and highlight flag.
pub fn cell_views(snapshot: &GameSnapshot) -> Vec<CellView> {
    let highlighted = snapshot
        .winning_mark()
        .map(|mark| winning_cells(snapshot.board(), mark))
        .unwrap_or_default();

    Coord::all()
        .map(|coord| CellView {
            coord,
            mark: snapshot.board().get(coord).mark(),
            winning: highlighted.contains(&coord),
        })
        .collect()
}

/// Status line for the local player.
pub fn status_message(snapshot: &GameSnapshot, identity: LocalActorIdentity) -> String {
    let me = *identity.actor_index();
    match snapshot.winner() {
        Some(Outcome::Draw) => "Draw!".to_string(),
        Some(Outcome::Won(winner)) if *winner == me => "You win!".to_string(),
        Some(Outcome::Won(winner)) => format!("{} wins!", snapshot.name_of(*winner)),
        None if !snapshot.has_opponent() => "Waiting for opponent...".to_string(),
        None if can_act(snapshot, identity) => "Your turn".to_string(),
        None => format!("Waiting for {}...", snapshot.name_of(me.opponent())),
    }
}
