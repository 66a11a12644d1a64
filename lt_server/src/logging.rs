//! Structured logging configuration.
//!
//! Installs the tracing subscriber and provides the structured events the
//! server emits for table operations and completed HTTP requests.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Operations slower than this are logged at `warn`.
const SLOW_OPERATION_MS: u64 = 1000;

/// Initialize structured logging
///
/// Log levels come from `RUST_LOG`. Records emitted through the `log` facade
/// by the table library are bridged into the same subscriber.
///
/// # Example
///
/// ```no_run
/// use lt_server::logging;
///
/// #[tokio::main]
/// async fn main() {
///     logging::init();
///     tracing::info!("Server starting");
/// }
/// ```
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=warn,hyper=warn"));

    // Console layer for development
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::info!("Structured logging initialized");
}

/// Log one mutating table request
///
/// # Arguments
///
/// * `operation` - Operation name (advance, join, kick, create, close)
/// * `session_id` - Target session, if one was resolved
/// * `outcome` - `ok` or the error label
/// * `duration_ms` - Time spent waiting on the table actor
pub fn log_table_operation(
    operation: &str,
    session_id: Option<&str>,
    outcome: &str,
    duration_ms: u64,
) {
    if duration_ms > SLOW_OPERATION_MS {
        tracing::warn!(
            operation = operation,
            session_id = session_id,
            outcome = outcome,
            duration_ms = duration_ms,
            "PERFORMANCE: Slow table operation"
        );
    } else {
        tracing::debug!(
            operation = operation,
            session_id = session_id,
            outcome = outcome,
            duration_ms = duration_ms,
            "Table operation"
        );
    }
}

/// Log API request/response
///
/// # Arguments
///
/// * `method` - HTTP method
/// * `path` - Matched route
/// * `status_code` - Response status code
/// * `duration_ms` - Request duration in milliseconds
pub fn log_api_request(method: &str, path: &str, status_code: u16, duration_ms: u64) {
    tracing::info!(
        http_method = method,
        http_path = path,
        http_status = status_code,
        duration_ms = duration_ms,
        "API request completed"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_table_operation() {
        // Just ensure it doesn't panic
        log_table_operation("advance", Some("8c1f"), "ok", 3);
        log_table_operation("join", None, "table_full", 2500);
    }

    #[test]
    fn test_log_api_request() {
        log_api_request("GET", "/api/v1/tables/{session_id}", 200, 1);
        log_api_request("POST", "/api/v1/tables/{session_id}/players", 409, 4);
    }
}
