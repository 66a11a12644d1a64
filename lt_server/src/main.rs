//! Live table server.
//!
//! Spawns one table actor per session behind a TableManager and serves the
//! polling API over HTTP.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Error};
use live_table::TableManager;
use lt_server::{api, config::ServerConfig, logging, metrics};
use pico_args::Arguments;
use tracing::{error, info};

const HELP: &str = "\
Run a live poker table server

USAGE:
  lt_server [OPTIONS]

OPTIONS:
  --bind       IP:PORT     Server socket bind address  [default: env SERVER_BIND or 127.0.0.1:6969]
  --tables     N           Number of tables to create  [default: env INITIAL_TABLES or 1]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  SERVER_BIND              Server bind address (e.g., 0.0.0.0:8080)
  INITIAL_TABLES           Tables created at startup
  TABLE_MAX_PLAYERS        Seats per table (1-23)
  TABLE_NAME_PREFIX        Prefix for generated table names
  METRICS_BIND             Prometheus exporter address (disabled when unset)
  PLAYER_POLL_INTERVAL_MS  Poll interval for a player's own view
  TABLE_POLL_INTERVAL_MS   Poll interval for the shared table view
  STALE_AFTER_MS           Age after which clients mark data stale
  RUST_LOG                 Log filter (e.g., info,live_table=debug)
";

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let bind_override: Option<SocketAddr> = pargs
        .opt_value_from_str("--bind")
        .context("Invalid --bind address")?;
    let tables_override: Option<usize> = pargs
        .opt_value_from_str("--tables")
        .context("Invalid --tables count")?;

    logging::init();

    let config = ServerConfig::from_env(bind_override, tables_override)?;
    config.validate()?;
    info!("Starting live table server at {}", config.bind);

    if let Some(addr) = config.metrics_bind {
        metrics::init_metrics(addr).map_err(anyhow::Error::msg)?;
        info!("Prometheus metrics exported at http://{addr}/metrics");
    }

    let table_manager = Arc::new(TableManager::new());

    info!("Creating {} initial table(s)...", config.num_tables);
    for i in 0..config.num_tables {
        match table_manager
            .create_session(config.table_defaults.table_config(i))
            .await
        {
            Ok(session_id) => info!("✓ Created table {} with ID {}", i + 1, session_id),
            Err(e) => error!("Failed to create table {}: {}", i + 1, e),
        }
    }

    let tables = table_manager.list_sessions().await;
    metrics::active_sessions(tables.len());
    info!("Server ready with {} active table(s)", tables.len());
    for table in tables {
        info!(
            "  - {} (ID: {}) - {}/{} players",
            table.name, table.id, table.player_count, table.max_players
        );
    }

    let state = api::AppState {
        table_manager,
        table_defaults: config.table_defaults.clone(),
        polling: config.polling,
    };
    let app = api::create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind))?;

    info!(
        "Server is running at http://{}. Press Ctrl+C to stop.",
        config.bind
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shutting down server...");

    Ok(())
}

/// Graceful shutdown signal
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl+C: {e}");
        std::future::pending::<()>().await;
    }
}
