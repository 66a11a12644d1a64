//! Integration tests for the HTTP API.
//!
//! Requests are served in-process through `tower::ServiceExt::oneshot`, so no
//! socket is bound.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use live_table::{PlayerId, PlayerView, SessionId, TableConfig, TableManager, TableView};
use lt_server::api::{
    AppState, create_router,
    error::ErrorResponse,
    request_id::REQUEST_ID_HEADER,
    tables::{CreateTableResponse, JoinTableResponse},
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt; // For `oneshot` method

/// Helper to create a test router with one empty table
async fn create_test_server() -> (axum::Router, Arc<TableManager>, SessionId) {
    let table_manager = Arc::new(TableManager::new());
    let session_id = table_manager
        .create_session(TableConfig {
            name: "Test Table".to_string(),
            max_players: 2,
        })
        .await
        .unwrap();

    let app = create_router(AppState::new(table_manager.clone()));
    (app, table_manager, session_id)
}

async fn send(app: &axum::Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, Vec<u8>) {
    let mut builder = Request::builder().method(method).uri(uri);
    if body.is_some() {
        builder = builder.header("content-type", "application/json");
    }
    let request = builder
        .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, bytes.to_vec())
}

fn parse<T: DeserializeOwned>(bytes: &[u8]) -> T {
    serde_json::from_slice(bytes).unwrap()
}

async fn join(app: &axum::Router, session_id: SessionId, alias: &str) -> JoinTableResponse {
    let (status, body) = send(
        app,
        "POST",
        &format!("/api/v1/tables/{session_id}/players"),
        Some(&format!(r#"{{"alias": "{alias}"}}"#)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    parse(&body)
}

// ============================================================================
// Health and Polling
// ============================================================================

#[tokio::test]
async fn test_health_check_endpoint() {
    let (app, _, _) = create_test_server().await;

    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);

    let json: Value = parse(&body);
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["active_sessions"], 1);
    assert!(json["timestamp"].is_string());
}

#[tokio::test]
async fn test_polling_config_endpoint() {
    let (app, _, _) = create_test_server().await;

    let (status, body) = send(&app, "GET", "/api/v1/polling", None).await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = parse(&body);
    assert_eq!(json["player_interval_ms"], 1000);
    assert_eq!(json["table_interval_ms"], 2000);
    assert_eq!(json["stale_after_ms"], 5000);
}

#[tokio::test]
async fn test_request_id_echoed() {
    let (app, _, _) = create_test_server().await;
    let request = Request::builder()
        .uri("/health")
        .header(REQUEST_ID_HEADER, "trace-me")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.headers()[REQUEST_ID_HEADER], "trace-me");
}

// ============================================================================
// Session Lifecycle
// ============================================================================

#[tokio::test]
async fn test_list_tables() {
    let (app, _, session_id) = create_test_server().await;

    let (status, body) = send(&app, "GET", "/api/v1/tables", None).await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = parse(&body);
    assert_eq!(json[0]["id"], session_id.to_string());
    assert_eq!(json[0]["name"], "Test Table");
    assert_eq!(json[0]["phase"], "waiting");
}

#[tokio::test]
async fn test_create_table_with_defaults() {
    let (app, manager, _) = create_test_server().await;

    let (status, body) = send(&app, "POST", "/api/v1/tables", None).await;
    assert_eq!(status, StatusCode::CREATED);
    let created: CreateTableResponse = parse(&body);
    assert_eq!(created.table.session_id, created.session_id);
    assert_eq!(created.table.max_players, 10);
    assert_eq!(created.table.version, 0);
    assert_eq!(manager.active_session_count().await, 2);
}

#[tokio::test]
async fn test_create_table_invalid_config() {
    let (app, _, _) = create_test_server().await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/tables",
        Some(r#"{"name": "Huge", "max_players": 40}"#),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let err: ErrorResponse = parse(&body);
    assert!(err.error.contains("Max players"));
}

#[tokio::test]
async fn test_close_table() {
    let (app, _, session_id) = create_test_server().await;
    let uri = format!("/api/v1/tables/{session_id}");

    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let err: ErrorResponse = parse(&body);
    assert_eq!(err.error, "Table not found");

    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ============================================================================
// Table Operations
// ============================================================================

#[tokio::test]
async fn test_unknown_table_is_404() {
    let (app, _, _) = create_test_server().await;
    let unknown = SessionId::new();

    for (method, uri) in [
        ("GET", format!("/api/v1/tables/{unknown}")),
        ("POST", format!("/api/v1/tables/{unknown}/advance")),
        ("POST", format!("/api/v1/tables/{unknown}/players")),
    ] {
        let (status, _) = send(&app, method, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{method} {uri}");
    }
}

#[tokio::test]
async fn test_malformed_session_id_is_400() {
    let (app, _, _) = create_test_server().await;
    let (status, _) = send(&app, "GET", "/api/v1/tables/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_join_without_body_gets_fallback_alias() {
    let (app, _, session_id) = create_test_server().await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/v1/tables/{session_id}/players"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let joined: JoinTableResponse = parse(&body);
    assert_eq!(joined.table.players[0].player_id, joined.player_id);
    assert_eq!(joined.table.players[0].alias.as_str(), "Player 1");
    assert!(joined.table.players[0].roles.is_dealer);
}

#[tokio::test]
async fn test_join_full_table_is_409() {
    let (app, _, session_id) = create_test_server().await;
    join(&app, session_id, "A").await;
    join(&app, session_id, "B").await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/v1/tables/{session_id}/players"),
        Some(r#"{"alias": "C"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    let err: ErrorResponse = parse(&body);
    assert!(err.error.contains("full"));
}

#[tokio::test]
async fn test_worked_example_over_http() {
    let (app, _, session_id) = create_test_server().await;
    let a = join(&app, session_id, "A").await.player_id;
    let b = join(&app, session_id, "B").await.player_id;
    let advance = format!("/api/v1/tables/{session_id}/advance");

    let (status, body) = send(&app, "POST", &advance, None).await;
    assert_eq!(status, StatusCode::OK);
    let table: TableView = parse(&body);
    assert_eq!(table.phase, live_table::Phase::PreFlop);
    assert!(table.players.iter().all(|p| p.card_count == 2));
    assert!(table.community_cards.is_empty());

    // The shared view never carries pocket cards.
    let (_, raw) = send(&app, "GET", &format!("/api/v1/tables/{session_id}"), None).await;
    let json: Value = parse(&raw);
    assert!(json["players"][0].get("cards").is_none());
    assert!(json["players"][0].get("pocket_cards").is_none());

    let (_, body) = send(&app, "POST", &advance, None).await;
    let table: TableView = parse(&body);
    assert_eq!(table.community_cards.len(), 3);

    let mut table = table;
    for _ in 0..4 {
        let (_, body) = send(&app, "POST", &advance, None).await;
        table = parse(&body);
    }
    assert_eq!(table.phase, live_table::Phase::Waiting);
    assert_eq!(table.hand_number, 1);

    send(&app, "POST", &advance, None).await;
    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/v1/tables/{session_id}/players/{b}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let view: PlayerView = parse(&body);
    assert_eq!(view.player_id, b);
    assert!(view.roles.is_dealer);
    assert_eq!(view.pocket_cards.len(), 2);
    assert_eq!(view.hand_number, 2);

    let (_, body) = send(
        &app,
        "GET",
        &format!("/api/v1/tables/{session_id}/players/{a}"),
        None,
    )
    .await;
    let view: PlayerView = parse(&body);
    assert!(view.roles.is_small_blind);
}

#[tokio::test]
async fn test_kick_player() {
    let (app, _, session_id) = create_test_server().await;
    let a = join(&app, session_id, "A").await.player_id;
    let b = join(&app, session_id, "B").await.player_id;
    let uri = format!("/api/v1/tables/{session_id}/players/{a}");

    let (status, body) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    let table: TableView = parse(&body);
    assert_eq!(table.players.len(), 1);
    assert_eq!(table.players[0].player_id, b);
    assert!(table.players[0].roles.is_dealer);

    // Gone players cannot be viewed or kicked again.
    let (status, _) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_player_view_is_404() {
    let (app, _, session_id) = create_test_server().await;
    let stranger = PlayerId::new();
    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/v1/tables/{session_id}/players/{stranger}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let err: ErrorResponse = parse(&body);
    assert_eq!(err.error, "Player not found");
}

#[tokio::test]
async fn test_versions_increase_per_mutation() {
    let (app, _, session_id) = create_test_server().await;
    let first = join(&app, session_id, "A").await.table.version;

    let (_, body) = send(
        &app,
        "POST",
        &format!("/api/v1/tables/{session_id}/advance"),
        None,
    )
    .await;
    let table: TableView = parse(&body);
    assert_eq!(table.version, first + 1);

    // Reads never bump the version.
    let (_, body) = send(&app, "GET", &format!("/api/v1/tables/{session_id}"), None).await;
    let again: TableView = parse(&body);
    assert_eq!(again.version, table.version);
}
