//! Core domain types for a remotely played tic-tac-toe board.

use derive_more::Display;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use tracing::instrument;

/// Mark placed on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum Mark {
    /// Mark X (placed by the first actor).
    X,
    /// Mark O (placed by the second actor).
    O,
}

impl Mark {
    /// Wire symbol of this mark.
    pub fn symbol(self) -> &'static str {
        match self {
            Mark::X => "X",
            Mark::O => "O",
        }
    }
}

/// One of the two seats in a game, numbered the way the server numbers them.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, strum::EnumIter,
)]
pub enum ActorIndex {
    /// Seat 0, plays X.
    #[display("0")]
    First,
    /// Seat 1, plays O.
    #[display("1")]
    Second,
}

impl ActorIndex {
    /// Creates an actor index from the server's numeric seat.
    #[instrument]
    pub fn from_index(index: u64) -> Option<Self> {
        Self::iter().find(|actor| actor.index() as u64 == index)
    }

    /// Numeric seat (0 or 1).
    pub fn index(self) -> usize {
        match self {
            ActorIndex::First => 0,
            ActorIndex::Second => 1,
        }
    }

    /// Mark this actor places.
    pub fn mark(self) -> Mark {
        match self {
            ActorIndex::First => Mark::X,
            ActorIndex::Second => Mark::O,
        }
    }

    /// The other seat.
    pub fn opponent(self) -> Self {
        match self {
            ActorIndex::First => ActorIndex::Second,
            ActorIndex::Second => ActorIndex::First,
        }
    }
}

/// How a finished game ended.
///
/// A draw is reported by the server; it is never inferred from a full board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum Outcome {
    /// Nobody won.
    #[display("draw")]
    Draw,
    /// The given actor completed a line.
    #[display("won by actor {}", _0)]
    Won(ActorIndex),
}

/// A square on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Cell {
    /// Empty square.
    #[default]
    Empty,
    /// Square holding a mark.
    Occupied(Mark),
}

impl Cell {
    /// Parses a wire cell (`""`, `"X"` or `"O"`).
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "" => Some(Cell::Empty),
            "X" => Some(Cell::Occupied(Mark::X)),
            "O" => Some(Cell::Occupied(Mark::O)),
            _ => None,
        }
    }

    /// Mark in this cell, if any.
    pub fn mark(self) -> Option<Mark> {
        match self {
            Cell::Empty => None,
            Cell::Occupied(mark) => Some(mark),
        }
    }
}

/// Row/column address of a square, both in `0..3`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display,
)]
#[display("({}, {})", row, col)]
pub struct Coord {
    row: usize,
    col: usize,
}

impl Coord {
    /// Creates a coordinate, rejecting anything off the board.
    pub fn new(row: usize, col: usize) -> Option<Self> {
        (row < 3 && col < 3).then_some(Self { row, col })
    }

    /// Creates a coordinate from a row-major index (0-8).
    pub fn from_index(index: usize) -> Option<Self> {
        Self::new(index / 3, index % 3)
    }

    /// Row (0 is the top).
    pub fn row(self) -> usize {
        self.row
    }

    /// Column (0 is the left).
    pub fn col(self) -> usize {
        self.col
    }

    /// Row-major index (0-8).
    pub fn to_index(self) -> usize {
        self.row * 3 + self.col
    }

    /// All nine coordinates in row-major order.
    pub fn all() -> impl Iterator<Item = Coord> {
        (0..9).filter_map(Coord::from_index)
    }
}

/// 3x3 board compared structurally, cell by cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Board {
    rows: [[Cell; 3]; 3],
}

impl Board {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the cell at a coordinate.
    pub fn get(&self, coord: Coord) -> Cell {
        self.rows[coord.row()][coord.col()]
    }

    /// Sets the cell at a coordinate.
    pub fn set(&mut self, coord: Coord, cell: Cell) {
        self.rows[coord.row()][coord.col()] = cell;
    }

    /// Checks if a square is empty.
    pub fn is_empty(&self, coord: Coord) -> bool {
        self.get(coord) == Cell::Empty
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coord_bounds() {
        assert!(Coord::new(2, 2).is_some());
        assert!(Coord::new(3, 0).is_none());
        assert!(Coord::new(0, 3).is_none());
        assert_eq!(Coord::from_index(5), Coord::new(1, 2));
        assert_eq!(Coord::from_index(9), None);
    }

    #[test]
    fn test_actor_marks() {
        assert_eq!(ActorIndex::First.mark(), Mark::X);
        assert_eq!(ActorIndex::Second.mark(), Mark::O);
        assert_eq!(ActorIndex::from_index(1), Some(ActorIndex::Second));
        assert_eq!(ActorIndex::from_index(2), None);
    }

    #[test]
    fn test_cell_symbols() {
        assert_eq!(Cell::from_symbol(""), Some(Cell::Empty));
        assert_eq!(Cell::from_symbol("O"), Some(Cell::Occupied(Mark::O)));
        assert_eq!(Cell::from_symbol("x"), None);
    }

    #[test]
    fn test_actor_seats_round_trip() {
        for actor in ActorIndex::iter() {
            assert_eq!(ActorIndex::from_index(actor.index() as u64), Some(actor));
            assert_eq!(actor.opponent().opponent(), actor);
        }
    }
}
