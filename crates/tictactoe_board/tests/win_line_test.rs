//! Tests for win-line detection and highlighting.

use std::collections::BTreeSet;
use tictactoe_board::{Board, Cell, Coord, Line, Mark, detect_win_line, winning_cells};

fn parse(rows: [[&str; 3]; 3]) -> Board {
    let mut board = Board::new();
    for (r, row) in rows.iter().enumerate() {
        for (c, symbol) in row.iter().enumerate() {
            board.set(coord(r, c), Cell::from_symbol(symbol).expect("valid symbol"));
        }
    }
    board
}

fn coord(row: usize, col: usize) -> Coord {
    Coord::new(row, col).expect("on board")
}

#[test]
fn test_top_row_win_highlights_row_zero() {
    let board = parse([["X", "X", "X"], ["O", "O", ""], ["", "", "O"]]);

    assert_eq!(detect_win_line(&board, Mark::X), Some(Line::Row(0)));

    let expected: BTreeSet<Coord> = [coord(0, 0), coord(0, 1), coord(0, 2)].into();
    assert_eq!(winning_cells(&board, Mark::X), expected);
}

#[test]
fn test_row_reported_before_partial_column() {
    // X completes row 1; column 0 holds an unrelated partial run.
    let board = parse([["X", "O", ""], ["X", "X", "X"], ["", "O", "O"]]);
    assert_eq!(detect_win_line(&board, Mark::X), Some(Line::Row(1)));
}

#[test]
fn test_loser_has_no_highlight() {
    let board = parse([["X", "X", "X"], ["O", "O", ""], ["", "", "O"]]);
    assert!(winning_cells(&board, Mark::O).is_empty());
}

#[test]
fn test_full_board_without_line() {
    let board = parse([["X", "O", "X"], ["X", "O", "O"], ["O", "X", "X"]]);
    assert_eq!(detect_win_line(&board, Mark::X), None);
    assert_eq!(detect_win_line(&board, Mark::O), None);
}

#[test]
fn test_lines_cover_all_eight_candidates() {
    let unique: BTreeSet<[Coord; 3]> = Line::ALL.iter().filter_map(|line| line.coords()).collect();
    assert_eq!(unique.len(), 8);
}
