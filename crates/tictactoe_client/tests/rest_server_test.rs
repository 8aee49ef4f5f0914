//! REST binding against an in-process HTTP server.

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::COOKIE},
    routing::{get, post},
};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use tictactoe_board::{ActorIndex, Coord};
use tictactoe_client::{
    ClientConfig, FetchError, GameServer, MoveOutcome, MoveRequest, RestGameServer, fetch, submit,
};

/// Requests seen by the test server.
#[derive(Debug, Default)]
struct Seen {
    cookies: Vec<Option<String>>,
    moves: Vec<MoveRequest>,
    leaves: usize,
}

type Shared = Arc<Mutex<Seen>>;

fn record_cookie(seen: &Shared, headers: &HeaderMap) {
    let cookie = headers
        .get(COOKIE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    seen.lock().unwrap().cookies.push(cookie);
}

async fn game_state(State(seen): State<Shared>, headers: HeaderMap) -> Json<Value> {
    record_cookie(&seen, &headers);
    Json(json!({
        "status": "success",
        "game_id": "a1b2c3d4",
        "player_num": 1,
        "current_player": 0,
        "board": [["X", "", ""], ["", "", ""], ["", "", ""]],
        "players": ["alice", "bob"],
        "winner": null
    }))
}

async fn make_move(
    State(seen): State<Shared>,
    headers: HeaderMap,
    Json(request): Json<MoveRequest>,
) -> Json<Value> {
    record_cookie(&seen, &headers);
    seen.lock().unwrap().moves.push(request);
    Json(json!({"status": "error", "message": "Cell already taken"}))
}

async fn leave_room(State(seen): State<Shared>) -> Json<Value> {
    seen.lock().unwrap().leaves += 1;
    Json(json!({"status": "success"}))
}

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn game_server() -> (RestGameServer, Shared) {
    let seen = Shared::default();
    let app = Router::new()
        .route("/game_state", get(game_state))
        .route("/move", post(make_move))
        .route("/leave_room", post(leave_room))
        .with_state(seen.clone());
    let url = serve(app).await;

    let config = ClientConfig::default()
        .with_server_url(url)
        .with_session_cookie("session=player-two");
    (RestGameServer::new(&config).unwrap(), seen)
}

#[tokio::test]
async fn test_state_decodes_into_view() {
    let (server, seen) = game_server().await;

    let view = fetch(&server).await.unwrap();

    assert_eq!(*view.viewer().actor_index(), ActorIndex::Second);
    assert_eq!(*view.snapshot().active_actor(), ActorIndex::First);
    assert_eq!(view.snapshot().session_id().as_str(), "a1b2c3d4");
    assert!(!view.snapshot().board().is_empty(Coord::new(0, 0).unwrap()));
    assert_eq!(
        seen.lock().unwrap().cookies,
        vec![Some("session=player-two".to_string())]
    );
}

#[tokio::test]
async fn test_move_posts_coordinates() {
    let (server, seen) = game_server().await;

    let outcome = submit(&server, Coord::new(2, 1).unwrap()).await.unwrap();

    assert_eq!(
        outcome,
        MoveOutcome::Rejected {
            message: "Cell already taken".to_string()
        }
    );
    let seen = seen.lock().unwrap();
    assert_eq!(seen.moves, vec![MoveRequest { row: 2, col: 1 }]);
    assert_eq!(seen.cookies, vec![Some("session=player-two".to_string())]);
}

#[tokio::test]
async fn test_leave_posts_once() {
    let (server, seen) = game_server().await;

    server.leave_session().await.unwrap();

    assert_eq!(seen.lock().unwrap().leaves, 1);
}

#[tokio::test]
async fn test_error_status_is_transport() {
    let app = Router::new().route(
        "/game_state",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    let url = serve(app).await;
    let server = RestGameServer::new(&ClientConfig::default().with_server_url(url)).unwrap();

    let err = fetch(&server).await.unwrap_err();

    assert!(matches!(err, FetchError::Transport { .. }), "{err:?}");
    assert!(!err.ends_session());
}

#[tokio::test]
async fn test_non_json_body_is_transport() {
    let app = Router::new().route("/game_state", get(|| async { "<html>login</html>" }));
    let url = serve(app).await;
    let server = RestGameServer::new(&ClientConfig::default().with_server_url(url)).unwrap();

    let err = fetch(&server).await.unwrap_err();

    assert!(matches!(err, FetchError::Transport { .. }), "{err:?}");
}

#[tokio::test]
async fn test_wrong_shape_is_malformed() {
    let app = Router::new().route("/game_state", get(|| async { Json(json!({"status": 5})) }));
    let url = serve(app).await;
    let server = RestGameServer::new(&ClientConfig::default().with_server_url(url)).unwrap();

    let err = fetch(&server).await.unwrap_err();

    assert!(matches!(err, FetchError::Malformed { .. }), "{err:?}");
    assert!(err.ends_session());
}

#[tokio::test]
async fn test_unreachable_server_is_transport() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);
    let server = RestGameServer::new(&ClientConfig::default().with_server_url(url)).unwrap();

    let err = fetch(&server).await.unwrap_err();

    assert!(matches!(err, FetchError::Transport { .. }), "{err:?}");
}

#[tokio::test]
async fn test_no_cookie_configured() {
    let seen = Shared::default();
    let app = Router::new()
        .route("/game_state", get(game_state))
        .with_state(seen.clone());
    let url = serve(app).await;
    let server = RestGameServer::new(&ClientConfig::default().with_server_url(url)).unwrap();

    fetch(&server).await.unwrap();

    assert_eq!(seen.lock().unwrap().cookies, vec![None]);
}
