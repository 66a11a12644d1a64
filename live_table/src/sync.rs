//! Polling contract between the store and whoever displays it.
//!
//! The store does not push. Consumers poll at a fixed interval, each read
//! returning a complete snapshot, and decide for themselves whether what they
//! are showing is still current. This module holds the shared numbers and the
//! freshness rule so the server and every client agree on them.

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

pub const DEFAULT_PLAYER_POLL_INTERVAL_MS: u64 = 1000;
pub const DEFAULT_TABLE_POLL_INTERVAL_MS: u64 = 2000;
pub const DEFAULT_STALE_AFTER_MS: u64 = 5000;

/// Which screen a poller is feeding.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewKind {
    /// One player's own hand.
    Player,
    /// The shared table screen.
    Table,
}

/// Poll intervals per consumer class plus the freshness threshold.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PollingConfig {
    pub player_interval_ms: u64,
    pub table_interval_ms: u64,
    pub stale_after_ms: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            player_interval_ms: DEFAULT_PLAYER_POLL_INTERVAL_MS,
            table_interval_ms: DEFAULT_TABLE_POLL_INTERVAL_MS,
            stale_after_ms: DEFAULT_STALE_AFTER_MS,
        }
    }
}

impl PollingConfig {
    /// Read `PLAYER_POLL_INTERVAL_MS`, `TABLE_POLL_INTERVAL_MS` and
    /// `STALE_AFTER_MS`. Unset variables take their defaults; a variable that
    /// is set but does not parse is an error.
    pub fn from_env() -> Result<Self, EnvVarError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Like [`PollingConfig::from_env`], reading variables through `lookup`.
    pub fn from_vars<F>(lookup: F) -> Result<Self, EnvVarError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: u64| {
            parse_var(key, lookup(key)).map(|value| value.unwrap_or(default))
        };
        Ok(Self {
            player_interval_ms: var("PLAYER_POLL_INTERVAL_MS", DEFAULT_PLAYER_POLL_INTERVAL_MS)?,
            table_interval_ms: var("TABLE_POLL_INTERVAL_MS", DEFAULT_TABLE_POLL_INTERVAL_MS)?,
            stale_after_ms: var("STALE_AFTER_MS", DEFAULT_STALE_AFTER_MS)?,
        })
    }

    pub fn player_interval(&self) -> Duration {
        Duration::from_millis(self.player_interval_ms)
    }

    pub fn table_interval(&self) -> Duration {
        Duration::from_millis(self.table_interval_ms)
    }

    pub fn stale_after(&self) -> Duration {
        Duration::from_millis(self.stale_after_ms)
    }

    pub fn interval_for(&self, kind: ViewKind) -> Duration {
        match kind {
            ViewKind::Player => self.player_interval(),
            ViewKind::Table => self.table_interval(),
        }
    }

    /// Intervals must be positive and the threshold must leave room for at
    /// least one missed poll of the slowest consumer.
    pub fn validate(&self) -> Result<(), String> {
        if self.player_interval_ms == 0 || self.table_interval_ms == 0 {
            return Err("Poll intervals must be greater than 0".to_string());
        }

        let slowest = self.player_interval_ms.max(self.table_interval_ms);
        if self.stale_after_ms <= slowest {
            return Err(format!(
                "Stale threshold ({}ms) must exceed the slowest poll interval ({slowest}ms)",
                self.stale_after_ms
            ));
        }

        Ok(())
    }

    pub fn classify(&self, last_success: Option<Instant>, now: Instant) -> Freshness {
        Freshness::classify(last_success, now, self.stale_after())
    }
}

/// How much a consumer should trust what it is showing.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Freshness {
    /// Last successful read is within the threshold.
    Live,
    /// Showing held data that is older than the threshold.
    Stale,
    /// Nothing has ever been read.
    Unavailable,
}

impl Freshness {
    pub fn classify(last_success: Option<Instant>, now: Instant, threshold: Duration) -> Self {
        match last_success {
            None => Self::Unavailable,
            Some(at) if now.saturating_duration_since(at) > threshold => Self::Stale,
            Some(_) => Self::Live,
        }
    }

    pub fn is_live(self) -> bool {
        self == Self::Live
    }
}

/// A configuration variable that is set to something unusable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid value for {var}: {reason}")]
pub struct EnvVarError {
    pub var: String,
    pub reason: String,
}

/// Parse the raw value of variable `key`. Unset is `Ok(None)`.
pub fn parse_var<T>(key: &str, raw: Option<String>) -> Result<Option<T>, EnvVarError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let Some(raw) = raw else {
        return Ok(None);
    };
    raw.trim().parse().map(Some).map_err(|e| EnvVarError {
        var: key.to_string(),
        reason: format!("'{raw}' does not parse: {e}"),
    })
}
