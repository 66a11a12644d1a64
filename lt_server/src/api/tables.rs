//! Table session API handlers.
//!
//! This module provides HTTP REST endpoints for live table sessions:
//! - Listing, creating and closing sessions
//! - Reading the shared table view and a single player's view
//! - Advancing the phase, seating and kicking players
//!
//! Every read returns a complete view, never a diff, so pollers can simply
//! replace what they hold.
//!
//! # Examples
//!
//! Seat a player:
//! ```bash
//! curl -X POST http://localhost:6969/api/v1/tables/$SESSION/players \
//!   -H "Content-Type: application/json" \
//!   -d '{"alias": "alice"}'
//! ```
//!
//! Advance the phase:
//! ```bash
//! curl -X POST http://localhost:6969/api/v1/tables/$SESSION/advance
//! ```

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
};
use live_table::{
    Phase, PlayerId, PlayerView, SessionId, TableConfig, TableResult, TableView,
    table::TableMetadata,
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::{future::Future, time::Instant};

use super::{
    AppState,
    error::{ApiError, outcome},
};
use crate::{logging, metrics};

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CreateTableRequest {
    pub name: Option<String>,
    pub max_players: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateTableResponse {
    pub session_id: SessionId,
    pub table: TableView,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct JoinTableRequest {
    pub alias: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JoinTableResponse {
    pub player_id: PlayerId,
    pub table: TableView,
}

/// Bodies on these routes are optional; an empty body means "all defaults".
fn optional_body<T: DeserializeOwned + Default>(body: &Bytes) -> Result<T, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|e| ApiError::bad_request(format!("Invalid JSON body: {e}")))
}

/// Run one table operation, recording its outcome and latency.
async fn track<T>(
    operation: &'static str,
    session_id: Option<SessionId>,
    fut: impl Future<Output = TableResult<T>>,
) -> TableResult<T> {
    let start = Instant::now();
    let result = fut.await;
    let outcome = outcome(&result);
    metrics::table_operations_total(operation, outcome);
    logging::log_table_operation(
        operation,
        session_id.map(|id| id.to_string()).as_deref(),
        outcome,
        start.elapsed().as_millis() as u64,
    );
    result
}

/// List all live table sessions.
///
/// # Response
///
/// Returns `200 OK` with array of table summaries:
/// ```json
/// [
///   {
///     "id": "0b6c4a4e-...",
///     "name": "Table 1",
///     "player_count": 3,
///     "max_players": 10,
///     "phase": "flop",
///     "hand_number": 12
///   }
/// ]
/// ```
pub async fn list_tables(State(state): State<AppState>) -> Json<Vec<TableMetadata>> {
    Json(state.table_manager.list_sessions().await)
}

/// Create a new table session.
///
/// # Request Body (optional)
///
/// ```json
/// {"name": "Main Stage", "max_players": 6}
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Malformed body or invalid table config
pub async fn create_table(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<CreateTableResponse>), ApiError> {
    let request: CreateTableRequest = optional_body(&body)?;
    let manager = &state.table_manager;

    let defaults = state
        .table_defaults
        .table_config(manager.active_session_count().await);
    let config = TableConfig {
        name: request.name.unwrap_or(defaults.name),
        max_players: request.max_players.unwrap_or(defaults.max_players),
    };

    let session_id = track("create", None, manager.create_session(config)).await?;
    metrics::active_sessions(manager.active_session_count().await);
    let snapshot = manager.get_snapshot(session_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateTableResponse {
            session_id,
            table: snapshot.table_view(),
        }),
    ))
}

/// Get the shared view of a table.
///
/// Each player appears with their seat, roles and a pocket card count. Pocket
/// cards themselves are only served by [`get_player_view`].
///
/// # Errors
///
/// - `404 Not Found`: Unknown session
pub async fn get_table(
    State(state): State<AppState>,
    Path(session_id): Path<SessionId>,
) -> Result<Json<TableView>, ApiError> {
    let snapshot = state.table_manager.get_snapshot(session_id).await?;
    Ok(Json(snapshot.table_view()))
}

/// Get one player's view: their pocket cards, roles and the board.
///
/// # Errors
///
/// - `404 Not Found`: Unknown session, or player not seated
pub async fn get_player_view(
    State(state): State<AppState>,
    Path((session_id, player_id)): Path<(SessionId, PlayerId)>,
) -> Result<Json<PlayerView>, ApiError> {
    let snapshot = state.table_manager.get_snapshot(session_id).await?;
    Ok(Json(snapshot.player_view(player_id)?))
}

/// Advance the table to its next phase.
///
/// Not idempotent: two accepted requests advance twice.
///
/// # Errors
///
/// - `404 Not Found`: Unknown session
pub async fn advance(
    State(state): State<AppState>,
    Path(session_id): Path<SessionId>,
) -> Result<Json<TableView>, ApiError> {
    let snapshot = track(
        "advance",
        Some(session_id),
        state.table_manager.advance(session_id),
    )
    .await?;

    if snapshot.phase == Phase::PreFlop {
        metrics::hands_dealt_total();
    }

    Ok(Json(snapshot.table_view()))
}

/// Seat a new player at the end of the seating order.
///
/// # Request Body (optional)
///
/// ```json
/// {"alias": "alice"}
/// ```
///
/// # Errors
///
/// - `404 Not Found`: Unknown session
/// - `409 Conflict`: Table is full
pub async fn join_table(
    State(state): State<AppState>,
    Path(session_id): Path<SessionId>,
    body: Bytes,
) -> Result<(StatusCode, Json<JoinTableResponse>), ApiError> {
    let request: JoinTableRequest = optional_body(&body)?;
    let (player_id, snapshot) = track(
        "join",
        Some(session_id),
        state.table_manager.join(session_id, request.alias),
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(JoinTableResponse {
            player_id,
            table: snapshot.table_view(),
        }),
    ))
}

/// Remove a player from the table. Their pocket cards go with them.
///
/// # Errors
///
/// - `404 Not Found`: Unknown session, or player not seated
pub async fn kick_player(
    State(state): State<AppState>,
    Path((session_id, player_id)): Path<(SessionId, PlayerId)>,
) -> Result<Json<TableView>, ApiError> {
    let snapshot = track(
        "kick",
        Some(session_id),
        state.table_manager.kick(session_id, player_id),
    )
    .await?;
    Ok(Json(snapshot.table_view()))
}

/// Close a table session and drop everyone seated at it.
///
/// # Errors
///
/// - `404 Not Found`: Unknown session
pub async fn close_table(
    State(state): State<AppState>,
    Path(session_id): Path<SessionId>,
) -> Result<StatusCode, ApiError> {
    let manager = &state.table_manager;
    track("close", Some(session_id), manager.close_session(session_id)).await?;
    metrics::active_sessions(manager.active_session_count().await);
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_body_empty_is_default() {
        let request: JoinTableRequest = optional_body(&Bytes::from_static(b"")).unwrap();
        assert!(request.alias.is_none());
        let request: JoinTableRequest = optional_body(&Bytes::from_static(b"  \n")).unwrap();
        assert!(request.alias.is_none());
    }

    #[test]
    fn test_optional_body_parses_json() {
        let request: CreateTableRequest =
            optional_body(&Bytes::from_static(br#"{"max_players": 4}"#)).unwrap();
        assert_eq!(request.max_players, Some(4));
        assert!(request.name.is_none());
    }

    #[test]
    fn test_optional_body_rejects_garbage() {
        let result: Result<JoinTableRequest, _> = optional_body(&Bytes::from_static(b"{alias"));
        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }
}
