//! HTTP API client for the live table server.
//!
//! Every read returns a complete view. Failures are split into transport
//! errors (the server could not be reached), server errors (the server
//! answered with a non-success status) and decode errors, so pollers can
//! tell a dropped connection from a closed table.

use std::time::Duration;

use live_table::{PlayerId, PlayerView, PollingConfig, SessionId, TableView, table::TableMetadata};
use reqwest::{Response, StatusCode};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;

/// Errors returned by [`ApiClient`].
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Server returned {status}: {message}")]
    Server { status: u16, message: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("No response within {0:?}")]
    Timeout(Duration),
}

impl ClientError {
    /// True when the request never got an answer from the server.
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Transport(_) | ClientError::Timeout(_))
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The session or player no longer exists on the server.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND.as_u16())
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Serialize)]
struct CreateTableRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_players: Option<usize>,
}

#[derive(Debug, Serialize)]
struct JoinTableRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    alias: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// A freshly created session and its initial table view.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedTable {
    pub session_id: SessionId,
    pub table: TableView,
}

/// The id handed to a newly seated player and the table view after joining.
#[derive(Debug, Clone, Deserialize)]
pub struct JoinedTable {
    pub player_id: PlayerId,
    pub table: TableView,
}

/// API client for communicating with the live table server
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl ApiClient {
    /// Create a new API client. A trailing slash on `base_url` is ignored.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base_url(base_url.into()),
            client: reqwest::Client::new(),
        }
    }

    /// Create a client whose requests give up after `timeout`.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> ClientResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: normalize_base_url(base_url.into()),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.base_url, path)
    }

    /// Poll intervals and stale threshold served by the server.
    pub async fn polling_config(&self) -> ClientResult<PollingConfig> {
        let response = self.client.get(self.url("/polling")).send().await?;
        decode(response).await
    }

    /// List all live sessions
    pub async fn list_tables(&self) -> ClientResult<Vec<TableMetadata>> {
        let response = self.client.get(self.url("/tables")).send().await?;
        decode(response).await
    }

    /// Create a session. Missing fields fall back to the server's defaults.
    pub async fn create_table(
        &self,
        name: Option<String>,
        max_players: Option<usize>,
    ) -> ClientResult<CreatedTable> {
        let response = self
            .client
            .post(self.url("/tables"))
            .json(&CreateTableRequest { name, max_players })
            .send()
            .await?;
        decode(response).await
    }

    pub async fn get_table(&self, session_id: SessionId) -> ClientResult<TableView> {
        let response = self
            .client
            .get(self.url(&format!("/tables/{session_id}")))
            .send()
            .await?;
        decode(response).await
    }

    pub async fn get_player_view(
        &self,
        session_id: SessionId,
        player_id: PlayerId,
    ) -> ClientResult<PlayerView> {
        let response = self
            .client
            .get(self.url(&format!("/tables/{session_id}/players/{player_id}")))
            .send()
            .await?;
        decode(response).await
    }

    /// Advance the table one phase. Not idempotent.
    pub async fn advance(&self, session_id: SessionId) -> ClientResult<TableView> {
        let response = self
            .client
            .post(self.url(&format!("/tables/{session_id}/advance")))
            .send()
            .await?;
        decode(response).await
    }

    /// Seat a player. The server picks a fallback alias when none is given.
    pub async fn join(
        &self,
        session_id: SessionId,
        alias: Option<String>,
    ) -> ClientResult<JoinedTable> {
        let response = self
            .client
            .post(self.url(&format!("/tables/{session_id}/players")))
            .json(&JoinTableRequest { alias })
            .send()
            .await?;
        decode(response).await
    }

    pub async fn kick(&self, session_id: SessionId, player_id: PlayerId) -> ClientResult<TableView> {
        let response = self
            .client
            .delete(self.url(&format!("/tables/{session_id}/players/{player_id}")))
            .send()
            .await?;
        decode(response).await
    }

    pub async fn close_table(&self, session_id: SessionId) -> ClientResult<()> {
        let response = self
            .client
            .delete(self.url(&format!("/tables/{session_id}")))
            .send()
            .await?;
        check_status(response).await.map(|_| ())
    }
}

fn normalize_base_url(mut base_url: String) -> String {
    while base_url.ends_with('/') {
        base_url.pop();
    }
    base_url
}

/// Turn a non-success response into [`ClientError::Server`], preferring the
/// server's `{"error": ...}` message over the raw body.
async fn check_status(response: Response) -> ClientResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await?;
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|e| e.error)
        .unwrap_or_else(|_| {
            if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("Unknown error").to_string()
            } else {
                body
            }
        });

    Err(ClientError::Server {
        status: status.as_u16(),
        message,
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let response = check_status(response).await?;
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
}
