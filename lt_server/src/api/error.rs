//! Mapping from table errors to HTTP responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use live_table::{TableError, TableResult};
use serde::{Deserialize, Serialize};

const LOG_TARGET: &str = "lt_server::api::error";

/// JSON error body: `{"error": "..."}`
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug)]
pub enum ApiError {
    Table(TableError),
    BadRequest(String),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Table(err) => match err {
                TableError::SessionNotFound(_) | TableError::PlayerNotFound(_) => {
                    StatusCode::NOT_FOUND
                }
                TableError::TableFull { .. } => StatusCode::CONFLICT,
                TableError::InvalidConfig(_) => StatusCode::BAD_REQUEST,
                TableError::DeckExhausted { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<TableError> for ApiError {
    fn from(err: TableError) -> Self {
        ApiError::Table(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::Table(err) => {
                if status.is_server_error() {
                    tracing::error!(target: LOG_TARGET, error = %err, "table invariant violated");
                }
                err.client_message()
            }
            ApiError::BadRequest(message) => message,
        };
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

/// Metric/log label for the result of a table operation.
pub fn outcome<T>(result: &TableResult<T>) -> &'static str {
    match result {
        Ok(_) => "ok",
        Err(TableError::SessionNotFound(_)) => "session_not_found",
        Err(TableError::PlayerNotFound(_)) => "player_not_found",
        Err(TableError::TableFull { .. }) => "table_full",
        Err(TableError::DeckExhausted { .. }) => "deck_exhausted",
        Err(TableError::InvalidConfig(_)) => "invalid_config",
    }
}
