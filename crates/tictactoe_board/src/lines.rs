//! Win-line detection and highlighting.

use crate::{Board, Cell, Coord, Mark};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::instrument;

/// One of the eight lines that can win a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum Line {
    /// A row, 0 at the top.
    #[display("row {}", _0)]
    Row(usize),
    /// A column, 0 at the left.
    #[display("column {}", _0)]
    Column(usize),
    /// Top-left to bottom-right.
    #[display("main diagonal")]
    MainDiagonal,
    /// Top-right to bottom-left.
    #[display("anti-diagonal")]
    AntiDiagonal,
}

impl Line {
    /// Every line, in detection order.
    pub const ALL: [Line; 8] = [
        Line::Row(0),
        Line::Row(1),
        Line::Row(2),
        Line::Column(0),
        Line::Column(1),
        Line::Column(2),
        Line::MainDiagonal,
        Line::AntiDiagonal,
    ];

    /// The three squares making up this line.
    ///
    /// `None` for a row or column index off the board.
    pub fn coords(self) -> Option<[Coord; 3]> {
        let at = Coord::new;
        Some(match self {
            Line::Row(row) => [at(row, 0)?, at(row, 1)?, at(row, 2)?],
            Line::Column(col) => [at(0, col)?, at(1, col)?, at(2, col)?],
            Line::MainDiagonal => [at(0, 0)?, at(1, 1)?, at(2, 2)?],
            Line::AntiDiagonal => [at(0, 2)?, at(1, 1)?, at(2, 0)?],
        })
    }

    /// Whether every square of this line holds `mark`.
    ///
    /// A line off the board is never complete.
    pub fn is_complete(self, board: &Board, mark: Mark) -> bool {
        self.coords().is_some_and(|coords| {
            coords
                .iter()
                .all(|coord| board.get(*coord) == Cell::Occupied(mark))
        })
    }
}

/// Finds the first line completed by `mark`.
///
/// Lines are checked rows top-to-bottom, then columns left-to-right, then the
/// main diagonal, then the anti-diagonal. The order keeps the result
/// deterministic on boards that could not arise from legal play.
#[instrument(skip(board))]
pub fn detect_win_line(board: &Board, mark: Mark) -> Option<Line> {
    Line::ALL
        .into_iter()
        .find(|line| line.is_complete(board, mark))
}

/// Squares to highlight for a winning mark.
///
/// Empty when `mark` has no complete line.
#[instrument(skip(board))]
pub fn winning_cells(board: &Board, mark: Mark) -> BTreeSet<Coord> {
    detect_win_line(board, mark)
        .and_then(Line::coords)
        .map(|coords| coords.into_iter().collect())
        .unwrap_or_default()
}
