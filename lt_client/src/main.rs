//! Command-line client for the live table server.
//!
//! One-shot commands seat players, advance and kick. `watch` polls a table
//! (or one player's view) at a fixed interval and prints every update,
//! marking held data `[STALE]` once it is older than the stale threshold.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use live_table::{PlayerId, PollingConfig, SessionId};
use lt_client::{
    ApiClient, Poller, SnapshotSource,
    display::{render_player, render_status, render_table},
    poller::{PlayerSource, TableSource},
};
use pico_args::Arguments;
use tokio::sync::watch;

const HELP: &str = "\
Talk to a live poker table server

USAGE:
  lt_client [OPTIONS] <COMMAND> [ARGS]

COMMANDS:
  list                          List live tables
  create [--name N] [--max-players N]
                                Create a table
  join <SESSION> [--alias A]    Seat a player and print their id
  advance <SESSION>             Advance the table one phase
  kick <SESSION> <PLAYER>       Remove a player
  close <SESSION>               Close a table
  watch <SESSION> [--player P]  Poll a table (or one player's view) until Ctrl+C

OPTIONS:
  --server URL                  Server URL  [default: http://127.0.0.1:6969]
  --interval-ms MS              Override the poll interval for `watch`
  --stale-after-ms MS           Override the stale threshold for `watch`

FLAGS:
  -h, --help                    Print help information

ENVIRONMENT:
  PLAYER_POLL_INTERVAL_MS       Poll interval for a player's own view
  TABLE_POLL_INTERVAL_MS        Poll interval for the shared table view
  STALE_AFTER_MS                Age after which held data is marked stale
  RUST_LOG                      Log filter (e.g., lt_client=debug)
";

const DEFAULT_SERVER: &str = "http://127.0.0.1:6969";

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let mut pargs = Arguments::from_env();

    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let server: String = pargs
        .opt_value_from_str("--server")
        .context("Invalid --server")?
        .unwrap_or_else(|| DEFAULT_SERVER.to_string());
    let client = Arc::new(ApiClient::new(server));

    let Some(command) = pargs.subcommand().context("Invalid command")? else {
        print!("{HELP}");
        bail!("Missing command");
    };

    match command.as_str() {
        "list" => {
            let tables = client.list_tables().await?;
            if tables.is_empty() {
                println!("No live tables");
            }
            for table in tables {
                println!(
                    "{}  {}  {}/{} players  {}  hand #{}",
                    table.id,
                    table.name,
                    table.player_count,
                    table.max_players,
                    table.phase,
                    table.hand_number
                );
            }
        }
        "create" => {
            let name: Option<String> = pargs.opt_value_from_str("--name")?;
            let max_players: Option<usize> = pargs
                .opt_value_from_str("--max-players")
                .context("Invalid --max-players")?;
            let created = client.create_table(name, max_players).await?;
            println!("{}", created.session_id);
            println!("{}", render_table(&created.table));
        }
        "join" => {
            let alias: Option<String> = pargs.opt_value_from_str("--alias")?;
            let session_id: SessionId = pargs.free_from_str().context("Missing or invalid SESSION")?;
            let joined = client.join(session_id, alias).await?;
            println!("{}", joined.player_id);
            println!("{}", render_table(&joined.table));
        }
        "advance" => {
            let session_id: SessionId = pargs.free_from_str().context("Missing or invalid SESSION")?;
            let table = client.advance(session_id).await?;
            println!("{}", render_table(&table));
        }
        "kick" => {
            let session_id: SessionId = pargs.free_from_str().context("Missing or invalid SESSION")?;
            let player_id: PlayerId = pargs.free_from_str().context("Missing or invalid PLAYER")?;
            let table = client.kick(session_id, player_id).await?;
            println!("{}", render_table(&table));
        }
        "close" => {
            let session_id: SessionId = pargs.free_from_str().context("Missing or invalid SESSION")?;
            client.close_table(session_id).await?;
            println!("Closed {session_id}");
        }
        "watch" => {
            let player_id: Option<PlayerId> = pargs
                .opt_value_from_str("--player")
                .context("Invalid --player")?;
            let interval_ms: Option<u64> = pargs
                .opt_value_from_str("--interval-ms")
                .context("Invalid --interval-ms")?;
            let stale_after_ms: Option<u64> = pargs
                .opt_value_from_str("--stale-after-ms")
                .context("Invalid --stale-after-ms")?;

            // Options must be taken before positional arguments.
            let session_id: SessionId = pargs.free_from_str().context("Missing or invalid SESSION")?;

            let mut config = PollingConfig::from_env()?;
            if let Some(ms) = interval_ms {
                config.player_interval_ms = ms;
                config.table_interval_ms = ms;
            }
            if let Some(ms) = stale_after_ms {
                config.stale_after_ms = ms;
            }
            config.validate().map_err(anyhow::Error::msg)?;

            // A server that accepts but never answers must not wedge the watch.
            let client = Arc::new(ApiClient::with_timeout(client.base_url(), config.stale_after())?);

            match player_id {
                Some(player_id) => {
                    let source = PlayerSource::new(client.clone(), session_id, player_id);
                    watch_view(source, &config, render_player).await;
                }
                None => {
                    let source = TableSource::new(client.clone(), session_id);
                    watch_view(source, &config, render_table).await;
                }
            }
        }
        other => {
            print!("{HELP}");
            bail!("Unknown command: {other}");
        }
    }

    let remaining = pargs.finish();
    if !remaining.is_empty() {
        log::warn!("Ignored extra arguments: {remaining:?}");
    }

    Ok(())
}

/// Print every poll update until Ctrl+C.
async fn watch_view<S>(source: S, config: &PollingConfig, render: fn(&S::View) -> String)
where
    S: SnapshotSource + 'static,
{
    let poller = Poller::new(source, config);
    let (tx, mut rx) = watch::channel(poller.status(Instant::now()));
    let task = tokio::spawn(poller.run(tx));

    loop {
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let status = rx.borrow_and_update().clone();
                println!("{}\n", render_status(&status, render));
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    task.abort();
}
