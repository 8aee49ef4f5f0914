//! The presentation surface collaborator.

use crate::render::RenderInstruction;
use tracing::info;

/// Anything that can show render instructions to a player.
///
/// Surfaces never mutate engine state; input flows back only as
/// [`SessionEvent`](crate::SessionEvent)s.
pub trait PresentationSurface: Send {
    /// Applies one instruction.
    fn render(&mut self, instruction: RenderInstruction);
}

/// Surface that only logs, for headless runs.
#[derive(Debug, Default)]
pub struct TracingSurface;

impl PresentationSurface for TracingSurface {
    fn render(&mut self, instruction: RenderInstruction) {
        match instruction {
            RenderInstruction::Board(cells) => {
                let board: String = cells
                    .iter()
                    .map(|cell| {
                        let symbol = cell.mark.map(|m| m.symbol()).unwrap_or(".");
                        if cell.coord.col() == 2 && cell.coord.row() < 2 {
                            format!("{}/", symbol)
                        } else {
                            symbol.to_string()
                        }
                    })
                    .collect();
                let winning: Vec<String> = cells
                    .iter()
                    .filter(|cell| cell.winning)
                    .map(|cell| cell.coord.to_string())
                    .collect();
                info!(%board, ?winning, "Board");
            }
            RenderInstruction::ActorNames([first, second]) => {
                info!(%first, %second, "Players");
            }
            RenderInstruction::Status(message) => info!(%message, "Status"),
            RenderInstruction::RedirectToLobby => info!("Returning to lobby"),
        }
    }
}
