//! Keyboard and focus input.

use crate::controller::SessionEvent;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::Duration;
use tictactoe_board::Coord;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// How long one blocking wait for terminal input lasts.
const POLL_TIMEOUT: Duration = Duration::from_millis(100);

/// Maps a key press to a session event.
///
/// Digits 1-9 pick squares in reading order; `q` and Esc leave.
pub fn key_to_event(key: KeyEvent) -> Option<SessionEvent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Some(SessionEvent::ExitRequested),
        KeyCode::Char(c) => c
            .to_digit(10)
            .filter(|digit| (1..=9).contains(digit))
            .and_then(|digit| Coord::from_index(digit as usize - 1))
            .map(SessionEvent::MoveRequested),
        _ => None,
    }
}

/// Maps any terminal event to a session event.
pub fn translate(event: Event) -> Option<SessionEvent> {
    match event {
        Event::Key(key) => key_to_event(key),
        Event::FocusGained => Some(SessionEvent::VisibilityRegained),
        _ => None,
    }
}

/// Reads terminal input on a dedicated thread until `stop` is set or the
/// session stops listening.
pub fn spawn(events: mpsc::UnboundedSender<SessionEvent>, stop: Arc<AtomicBool>) -> JoinHandle<()> {
    std::thread::spawn(move || {
        while !stop.load(Ordering::Relaxed) && !events.is_closed() {
            match event::poll(POLL_TIMEOUT) {
                Ok(false) => continue,
                Ok(true) => {}
                Err(e) => {
                    warn!(error = %e, "Terminal input failed");
                    break;
                }
            }

            let event = match event::read() {
                Ok(event) => event,
                Err(e) => {
                    warn!(error = %e, "Terminal input failed");
                    break;
                }
            };

            if let Some(session_event) = translate(event) {
                debug!(?session_event, "Input");
                if events.send(session_event).is_err() {
                    break;
                }
            }
        }
        info!("Input thread exiting");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_digits_map_to_squares() {
        assert_eq!(
            key_to_event(press(KeyCode::Char('1'))),
            Some(SessionEvent::MoveRequested(Coord::new(0, 0).unwrap()))
        );
        assert_eq!(
            key_to_event(press(KeyCode::Char('6'))),
            Some(SessionEvent::MoveRequested(Coord::new(1, 2).unwrap()))
        );
        assert_eq!(
            key_to_event(press(KeyCode::Char('9'))),
            Some(SessionEvent::MoveRequested(Coord::new(2, 2).unwrap()))
        );
        assert_eq!(key_to_event(press(KeyCode::Char('0'))), None);
    }

    #[test]
    fn test_quit_and_focus() {
        assert_eq!(
            key_to_event(press(KeyCode::Char('q'))),
            Some(SessionEvent::ExitRequested)
        );
        assert_eq!(
            key_to_event(press(KeyCode::Esc)),
            Some(SessionEvent::ExitRequested)
        );
        assert_eq!(
            translate(Event::FocusGained),
            Some(SessionEvent::VisibilityRegained)
        );
        assert_eq!(translate(Event::FocusLost), None);
    }

    #[test]
    fn test_release_ignored() {
        let mut key = press(KeyCode::Char('5'));
        key.kind = KeyEventKind::Release;
        assert_eq!(key_to_event(key), None);
    }
}
