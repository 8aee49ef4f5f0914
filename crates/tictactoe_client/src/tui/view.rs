//! Stateless drawing of the game screen.

use crate::render::{CellView, RenderInstruction};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use tictactoe_board::{Coord, Mark};

/// What the screen currently shows, built up from render instructions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameView {
    cells: Vec<CellView>,
    names: [String; 2],
    status: String,
    leaving: bool,
}

impl GameView {
    /// Folds one instruction into the view.
    pub fn apply(&mut self, instruction: RenderInstruction) {
        match instruction {
            RenderInstruction::Board(cells) => self.cells = cells,
            RenderInstruction::ActorNames(names) => self.names = names,
            RenderInstruction::Status(status) => self.status = status,
            RenderInstruction::RedirectToLobby => self.leaving = true,
        }
    }

    fn cell(&self, coord: Coord) -> Option<&CellView> {
        self.cells.iter().find(|cell| cell.coord == coord)
    }
}

/// Draws the whole screen.
pub fn draw(frame: &mut Frame, view: &GameView) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Players
            Constraint::Min(9),    // Board
            Constraint::Length(3), // Status
            Constraint::Length(1), // Help
        ])
        .split(frame.area());

    frame.render_widget(players_line(view), chunks[0]);
    draw_board(frame, chunks[1], view);

    let status = if view.leaving {
        format!("{} Returning to lobby...", view.status)
    } else {
        view.status.clone()
    };
    let status = Paragraph::new(status)
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, chunks[2]);

    let help = Paragraph::new("1-9 to move, q to leave")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(help, chunks[3]);
}

fn players_line(view: &GameView) -> Paragraph<'static> {
    let name = |index: usize| {
        if view.names[index].is_empty() {
            "...".to_string()
        } else {
            view.names[index].clone()
        }
    };
    let line = Line::from(vec![
        Span::styled(format!("X {}", name(0)), mark_style(Mark::X)),
        Span::raw("  vs  "),
        Span::styled(format!("O {}", name(1)), mark_style(Mark::O)),
    ]);
    Paragraph::new(line)
        .alignment(Alignment::Center)
        .block(Block::default().title("Tic-Tac-Toe").borders(Borders::ALL))
}

fn draw_board(frame: &mut Frame, area: Rect, view: &GameView) {
    let board_area = center_rect(area, 23, 5);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(board_area);

    for row in 0..3 {
        draw_row(frame, rows[row * 2], view, row);
    }
    for separator in [rows[1], rows[3]] {
        frame.render_widget(
            Paragraph::new("───────┼───────┼───────").style(Style::default().fg(Color::DarkGray)),
            separator,
        );
    }
}

fn draw_row(frame: &mut Frame, area: Rect, view: &GameView, row: usize) {
    let mut spans = Vec::with_capacity(5);
    for col in 0..3 {
        if col > 0 {
            spans.push(Span::styled("│", Style::default().fg(Color::DarkGray)));
        }
        let Some(coord) = Coord::new(row, col) else {
            continue;
        };
        spans.push(cell_span(view.cell(coord), coord));
    }
    frame.render_widget(
        Paragraph::new(Line::from(spans)).alignment(Alignment::Center),
        area,
    );
}

fn cell_span(cell: Option<&CellView>, coord: Coord) -> Span<'static> {
    match cell.and_then(|cell| cell.mark.map(|mark| (mark, cell.winning))) {
        Some((mark, winning)) => {
            let style = if winning {
                mark_style(mark).bg(Color::Green).fg(Color::Black)
            } else {
                mark_style(mark)
            };
            Span::styled(format!("   {}   ", mark.symbol()), style)
        }
        // Empty squares show the key that claims them.
        None => Span::styled(
            format!("   {}   ", coord.to_index() + 1),
            Style::default().fg(Color::DarkGray),
        ),
    }
}

fn mark_style(mark: Mark) -> Style {
    let color = match mark {
        Mark::X => Color::Blue,
        Mark::O => Color::Red,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((area.height.saturating_sub(height)) / 2),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length((area.width.saturating_sub(width)) / 2),
            Constraint::Length(width),
            Constraint::Min(0),
        ])
        .split(vert[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{Terminal, backend::TestBackend};

    fn screen(view: &GameView) -> String {
        let mut terminal = Terminal::new(TestBackend::new(40, 20)).unwrap();
        terminal.draw(|frame| draw(frame, view)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_apply_tracks_latest_instructions() {
        let mut view = GameView::default();
        view.apply(RenderInstruction::Status("Your turn".to_string()));
        view.apply(RenderInstruction::Status("Waiting for bob...".to_string()));
        assert_eq!(view.status, "Waiting for bob...");
        assert!(!view.leaving);

        view.apply(RenderInstruction::RedirectToLobby);
        assert!(view.leaving);
    }

    #[test]
    fn test_draw_shows_names_marks_and_status() {
        let mut view = GameView::default();
        view.apply(RenderInstruction::ActorNames([
            "alice".to_string(),
            String::new(),
        ]));
        view.apply(RenderInstruction::Board(
            Coord::all()
                .map(|coord| CellView {
                    coord,
                    mark: (coord.to_index() == 4).then_some(Mark::X),
                    winning: false,
                })
                .collect(),
        ));
        view.apply(RenderInstruction::Status("Waiting for opponent...".to_string()));

        let text = screen(&view);
        assert!(text.contains("X alice"));
        assert!(text.contains("O ..."));
        assert!(text.contains("Waiting for opponent..."));
        // Square 5 is taken, the rest still show their keys.
        assert!(text.contains('1'));
        assert!(!text.contains('5'));
    }
}
