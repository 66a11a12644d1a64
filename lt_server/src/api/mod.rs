//! HTTP API for live table sessions.
//!
//! # Architecture
//!
//! The API is built with:
//! - **Axum**: Async web framework for HTTP
//! - **Tower**: Middleware for CORS and request correlation
//! - **Actor Model**: Table state owned by one actor task per session
//!
//! There is no push channel. Viewers poll the read routes at the intervals
//! served by `/api/v1/polling` and replace whatever they held with the
//! complete view they get back.
//!
//! # Modules
//!
//! - [`tables`]: Session reads and mutations
//! - [`error`]: Table error to HTTP status mapping
//! - [`request_id`]: Request correlation and access logging
//!
//! # Endpoints Overview
//!
//! ```text
//! GET    /health                                        - Health check
//! GET    /api/v1/polling                                - Poll intervals and stale threshold
//! GET    /api/v1/tables                                 - List sessions
//! POST   /api/v1/tables                                 - Create session
//! GET    /api/v1/tables/{session_id}                    - Shared table view
//! DELETE /api/v1/tables/{session_id}                    - Close session
//! POST   /api/v1/tables/{session_id}/advance            - Advance phase
//! POST   /api/v1/tables/{session_id}/players            - Seat a player
//! GET    /api/v1/tables/{session_id}/players/{player_id} - Player view
//! DELETE /api/v1/tables/{session_id}/players/{player_id} - Kick a player
//! ```
//!
//! # CORS
//!
//! CORS is permissive so browser pollers on other origins can read tables.

pub mod error;
pub mod request_id;
pub mod tables;

use axum::{
    Router,
    extract::State,
    response::Json,
    routing::{get, post},
};
use live_table::{PollingConfig, TableManager};
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::config::TableDefaultsConfig;

/// Application state shared across all HTTP handlers.
///
/// Cloned for each request (cheap due to Arc wrappers).
#[derive(Clone)]
pub struct AppState {
    pub table_manager: Arc<TableManager>,
    pub table_defaults: TableDefaultsConfig,
    pub polling: PollingConfig,
}

impl AppState {
    pub fn new(table_manager: Arc<TableManager>) -> Self {
        Self {
            table_manager,
            table_defaults: TableDefaultsConfig::default(),
            polling: PollingConfig::default(),
        }
    }
}

/// Create the complete API router with all endpoints and middleware.
///
/// # Example
///
/// ```rust,no_run
/// # use lt_server::api::{create_router, AppState};
/// # use live_table::TableManager;
/// # use std::sync::Arc;
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let state = AppState::new(Arc::new(TableManager::new()));
/// let app = create_router(state);
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:6969").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```
pub fn create_router(state: AppState) -> Router {
    let v1_routes = create_v1_router();

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", v1_routes)
        .layer(axum::middleware::from_fn(request_id::request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Create API v1 router with all versioned endpoints.
fn create_v1_router() -> Router<AppState> {
    Router::new()
        .route("/polling", get(polling_config))
        .route("/tables", get(tables::list_tables).post(tables::create_table))
        .route(
            "/tables/{session_id}",
            get(tables::get_table).delete(tables::close_table),
        )
        .route("/tables/{session_id}/advance", post(tables::advance))
        .route("/tables/{session_id}/players", post(tables::join_table))
        .route(
            "/tables/{session_id}/players/{player_id}",
            get(tables::get_player_view).delete(tables::kick_player),
        )
}

/// Health check endpoint for monitoring and load balancers.
///
/// # Example
///
/// ```bash
/// curl http://localhost:6969/health
/// # {"status":"healthy","version":"0.1.0","active_sessions":1,"timestamp":"2026-10-19T10:30:00+00:00"}
/// ```
async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "active_sessions": state.table_manager.active_session_count().await,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Poll intervals and stale threshold, so browser clients use the server's values.
async fn polling_config(State(state): State<AppState>) -> Json<PollingConfig> {
    Json(state.polling)
}
