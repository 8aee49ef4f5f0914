//! Snapshot fetching and response normalization.
//!
//! This is the only place raw server responses are interpreted. Whatever the
//! transport or the server hands back leaves this module as a [`ServerView`],
//! a [`MoveOutcome`] or one of the [`FetchError`] kinds.

use crate::error::FetchError;
use crate::server::GameServer;
use crate::snapshot::{GameSnapshot, LocalActorIdentity, ServerView, SessionId, TurnUpdate};
use crate::wire::StateResponse;
use tictactoe_board::{ActorIndex, Board, Cell, Coord, Outcome};
use tracing::{debug, instrument, warn};

/// State carried by an accepted move reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveReply {
    /// Every snapshot field was present.
    Full(ServerView),
    /// Only board, turn and result were present.
    Turn(TurnUpdate),
}

/// Result of submitting a move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The server applied the move. Carries whatever state the reply had.
    Accepted(Option<MoveReply>),
    /// The server refused the move.
    Rejected {
        /// Server explanation, shown to the player.
        message: String,
    },
}

/// Message used when the server rejects a move without saying why.
const DEFAULT_REJECTION: &str = "Invalid move";

/// Message used when the server reports an error without saying why.
const DEFAULT_ABSENT: &str = "no active game";

/// Performs one state request. No retries.
#[instrument(skip(server))]
pub async fn fetch(server: &dyn GameServer) -> Result<ServerView, FetchError> {
    let response = server.get_state().await?;
    normalize_state(response)
}

/// Submits one move. No retries.
#[instrument(skip(server))]
pub async fn submit(server: &dyn GameServer, coord: Coord) -> Result<MoveOutcome, FetchError> {
    let response = server.submit_move(coord).await?;
    Ok(normalize_move(response))
}

/// Interprets a state response.
///
/// An error status means the server has no game for us. A success status
/// without every snapshot field is malformed.
#[instrument(skip(response), fields(status = %response.status))]
pub fn normalize_state(response: StateResponse) -> Result<ServerView, FetchError> {
    if !response.is_success() {
        let message = response
            .message
            .unwrap_or_else(|| DEFAULT_ABSENT.to_string());
        debug!(%message, "Server reports no active game");
        return Err(FetchError::absent(message));
    }

    let session_id = parse_session_id(response.game_id.as_ref())?;
    let viewer = parse_actor(response.player_num.as_ref(), "player_num")?;
    let active_actor = parse_actor(response.current_player.as_ref(), "current_player")?;
    let board = parse_board(response.board.as_deref())?;
    let actor_names = parse_names(response.players.as_deref())?;
    let winner = parse_winner(response.winner.as_ref())?;

    let snapshot = GameSnapshot::new(board, active_actor, actor_names, winner, session_id);
    Ok(ServerView::new(snapshot, LocalActorIdentity::new(viewer)))
}

/// Interprets a move response.
#[instrument(skip(response), fields(status = %response.status))]
pub fn normalize_move(response: StateResponse) -> MoveOutcome {
    if !response.is_success() {
        let message = response
            .message
            .unwrap_or_else(|| DEFAULT_REJECTION.to_string());
        return MoveOutcome::Rejected { message };
    }

    let turn = parse_turn(&response);
    match (normalize_state(response), turn) {
        (Ok(view), _) => MoveOutcome::Accepted(Some(MoveReply::Full(view))),
        (Err(_), Ok(turn)) => MoveOutcome::Accepted(Some(MoveReply::Turn(turn))),
        (Err(e), Err(_)) => {
            debug!(error = %e, "Move accepted without usable state");
            MoveOutcome::Accepted(None)
        }
    }
}

/// Board, turn and result of a move reply.
fn parse_turn(response: &StateResponse) -> Result<TurnUpdate, FetchError> {
    Ok(TurnUpdate::new(
        parse_board(response.board.as_deref())?,
        parse_actor(response.current_player.as_ref(), "current_player")?,
        parse_winner(response.winner.as_ref())?,
    ))
}

fn parse_session_id(value: Option<&serde_json::Value>) -> Result<SessionId, FetchError> {
    match value {
        Some(serde_json::Value::String(id)) if !id.is_empty() => Ok(SessionId::from(id.clone())),
        Some(serde_json::Value::Number(id)) => Ok(SessionId::from(id.to_string())),
        other => {
            warn!(game_id = ?other, "Missing or invalid game_id");
            Err(FetchError::malformed("missing game_id"))
        }
    }
}

fn parse_actor(value: Option<&serde_json::Value>, field: &str) -> Result<ActorIndex, FetchError> {
    value
        .and_then(serde_json::Value::as_u64)
        .and_then(ActorIndex::from_index)
        .ok_or_else(|| {
            warn!(field, value = ?value, "Missing or invalid seat");
            FetchError::malformed(format!("missing or invalid {}", field))
        })
}

fn parse_board(rows: Option<&[Vec<String>]>) -> Result<Board, FetchError> {
    let rows = rows.ok_or_else(|| FetchError::malformed("missing board"))?;
    if rows.len() != 3 || rows.iter().any(|row| row.len() != 3) {
        return Err(FetchError::malformed("board is not 3x3"));
    }

    let mut board = Board::new();
    for (coord, symbol) in Coord::all().zip(rows.iter().flatten()) {
        let cell = Cell::from_symbol(symbol)
            .ok_or_else(|| FetchError::malformed(format!("unknown cell {:?}", symbol)))?;
        board.set(coord, cell);
    }
    Ok(board)
}

/// A room still waiting for its second player lists one name.
fn parse_names(players: Option<&[String]>) -> Result<[String; 2], FetchError> {
    match players {
        Some([first]) => Ok([first.clone(), String::new()]),
        Some([first, second]) => Ok([first.clone(), second.clone()]),
        Some(other) => Err(FetchError::malformed(format!(
            "expected one or two players, got {}",
            other.len()
        ))),
        None => Err(FetchError::malformed("missing players")),
    }
}

fn parse_winner(value: Option<&serde_json::Value>) -> Result<Option<Outcome>, FetchError> {
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(label)) if label == "draw" => Ok(Some(Outcome::Draw)),
        Some(serde_json::Value::Number(seat)) => seat
            .as_u64()
            .and_then(ActorIndex::from_index)
            .map(|actor| Some(Outcome::Won(actor)))
            .ok_or_else(|| FetchError::malformed(format!("invalid winner {}", seat))),
        Some(other) => Err(FetchError::malformed(format!("invalid winner {}", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tictactoe_board::Mark;

    fn response(value: serde_json::Value) -> StateResponse {
        serde_json::from_value(value).unwrap()
    }

    fn full_state() -> serde_json::Value {
        json!({
            "status": "success",
            "game_id": "a1b2c3d4",
            "player_num": 1,
            "current_player": 0,
            "board": [["X", "", ""], ["", "O", ""], ["", "", ""]],
            "players": ["alice", "bob"],
            "winner": null
        })
    }

    #[test]
    fn test_full_state_normalizes() {
        let view = normalize_state(response(full_state())).unwrap();
        let snapshot = view.snapshot();

        assert_eq!(*view.viewer().actor_index(), ActorIndex::Second);
        assert_eq!(*snapshot.active_actor(), ActorIndex::First);
        assert_eq!(snapshot.session_id().as_str(), "a1b2c3d4");
        assert_eq!(snapshot.name_of(ActorIndex::Second), "bob");
        assert_eq!(
            snapshot.board().get(Coord::new(1, 1).unwrap()),
            Cell::Occupied(Mark::O)
        );
        assert_eq!(*snapshot.winner(), None);
    }

    #[test]
    fn test_error_status_is_absent() {
        let err = normalize_state(response(json!({"status": "error", "message": "not found"})))
            .unwrap_err();
        assert_eq!(err, FetchError::absent("not found"));
        assert!(err.ends_session());
    }

    #[test]
    fn test_error_without_message() {
        let err = normalize_state(response(json!({"status": "error"}))).unwrap_err();
        assert_eq!(err, FetchError::absent(DEFAULT_ABSENT));
    }

    #[test]
    fn test_missing_board_is_malformed() {
        let mut value = full_state();
        value.as_object_mut().unwrap().remove("board");
        let err = normalize_state(response(value)).unwrap_err();
        assert!(matches!(err, FetchError::Malformed { .. }));
        assert!(err.ends_session());
    }

    #[test]
    fn test_bad_cell_is_malformed() {
        let mut value = full_state();
        value["board"] = json!([["Z", "", ""], ["", "", ""], ["", "", ""]]);
        assert!(matches!(
            normalize_state(response(value)),
            Err(FetchError::Malformed { .. })
        ));
    }

    #[test]
    fn test_short_board_is_malformed() {
        let mut value = full_state();
        value["board"] = json!([["", "", ""], ["", "", ""]]);
        assert!(normalize_state(response(value)).is_err());
    }

    #[test]
    fn test_winner_values() {
        let mut value = full_state();
        value["winner"] = json!("draw");
        let view = normalize_state(response(value.clone())).unwrap();
        assert_eq!(*view.snapshot().winner(), Some(Outcome::Draw));

        value["winner"] = json!(1);
        let view = normalize_state(response(value.clone())).unwrap();
        assert_eq!(
            *view.snapshot().winner(),
            Some(Outcome::Won(ActorIndex::Second))
        );

        value["winner"] = json!(2);
        assert!(normalize_state(response(value)).is_err());
    }

    #[test]
    fn test_numeric_game_id_and_single_player() {
        let mut value = full_state();
        value["game_id"] = json!(42);
        value["players"] = json!(["alice"]);
        let view = normalize_state(response(value)).unwrap();
        assert_eq!(view.snapshot().session_id().as_str(), "42");
        assert!(!view.snapshot().has_opponent());
    }

    #[test]
    fn test_move_rejection_keeps_message() {
        let outcome = normalize_move(response(json!({"status": "error", "message": "Cell taken"})));
        assert_eq!(
            outcome,
            MoveOutcome::Rejected {
                message: "Cell taken".to_string()
            }
        );

        let outcome = normalize_move(response(json!({"status": "error"})));
        assert_eq!(
            outcome,
            MoveOutcome::Rejected {
                message: DEFAULT_REJECTION.to_string()
            }
        );
    }

    #[test]
    fn test_move_reply_without_names_is_turn_update() {
        let outcome = normalize_move(response(json!({
            "status": "success",
            "board": [["X", "", ""], ["", "", ""], ["", "", ""]],
            "current_player": 1,
            "winner": null
        })));
        let MoveOutcome::Accepted(Some(MoveReply::Turn(turn))) = &outcome else {
            panic!("expected turn update, got {:?}", outcome);
        };
        assert_eq!(*turn.active_actor(), ActorIndex::Second);
        assert_eq!(
            turn.board().get(Coord::new(0, 0).unwrap()),
            Cell::Occupied(Mark::X)
        );
        assert_eq!(*turn.winner(), None);
    }

    #[test]
    fn test_move_reply_full_and_bare() {
        let outcome = normalize_move(response(full_state()));
        assert!(matches!(outcome, MoveOutcome::Accepted(Some(MoveReply::Full(_)))));

        let outcome = normalize_move(response(json!({"status": "success"})));
        assert_eq!(outcome, MoveOutcome::Accepted(None));
    }
}
