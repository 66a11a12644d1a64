//! Server configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use live_table::sync::parse_var;
use live_table::{DEFAULT_MAX_PLAYERS, EnvVarError, MAX_PLAYERS, PollingConfig, TableConfig};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

const DEFAULT_BIND: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 6969);

/// Complete server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server bind address
    pub bind: SocketAddr,
    /// Number of tables to create on startup
    pub num_tables: usize,
    /// Table defaults configuration
    pub table_defaults: TableDefaultsConfig,
    /// Poll intervals and freshness threshold handed to clients
    pub polling: PollingConfig,
    /// Prometheus exporter address, if metrics are enabled
    pub metrics_bind: Option<SocketAddr>,
}

/// Default table configuration
#[derive(Debug, Clone)]
pub struct TableDefaultsConfig {
    /// Maximum players per table
    pub max_players: usize,
    /// Prefix for generated table names ("Table 1", "Table 2", ...)
    pub name_prefix: String,
}

impl TableDefaultsConfig {
    /// Config for the `index`-th table created at startup (zero-based)
    pub fn table_config(&self, index: usize) -> TableConfig {
        TableConfig {
            name: format!("{} {}", self.name_prefix, index + 1),
            max_players: self.max_players,
        }
    }
}

impl Default for TableDefaultsConfig {
    fn default() -> Self {
        Self {
            max_players: DEFAULT_MAX_PLAYERS,
            name_prefix: "Table".to_string(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `bind_override` - Optional bind address override (from CLI args)
    /// * `num_tables_override` - Optional number of tables override (from CLI args)
    ///
    /// # Errors
    ///
    /// Returns error if a set variable cannot be parsed
    pub fn from_env(
        bind_override: Option<SocketAddr>,
        num_tables_override: Option<usize>,
    ) -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok(), bind_override, num_tables_override)
    }

    /// Like [`ServerConfig::from_env`], reading variables through `lookup`.
    pub fn from_vars<F>(
        lookup: F,
        bind_override: Option<SocketAddr>,
        num_tables_override: Option<usize>,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind = match bind_override {
            Some(addr) => addr,
            None => parse_var("SERVER_BIND", lookup("SERVER_BIND"))?.unwrap_or(DEFAULT_BIND),
        };

        let num_tables = match num_tables_override {
            Some(n) => n,
            None => parse_var("INITIAL_TABLES", lookup("INITIAL_TABLES"))?.unwrap_or(1),
        };

        let table_defaults = TableDefaultsConfig {
            max_players: parse_var("TABLE_MAX_PLAYERS", lookup("TABLE_MAX_PLAYERS"))?
                .unwrap_or(DEFAULT_MAX_PLAYERS),
            name_prefix: lookup("TABLE_NAME_PREFIX").unwrap_or_else(|| "Table".to_string()),
        };

        Ok(Self {
            bind,
            num_tables,
            table_defaults,
            polling: PollingConfig::from_vars(&lookup)?,
            metrics_bind: parse_var("METRICS_BIND", lookup("METRICS_BIND"))?,
        })
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.table_defaults.max_players == 0 {
            return Err(ConfigError::Invalid {
                var: "TABLE_MAX_PLAYERS".to_string(),
                reason: "Must be at least 1".to_string(),
            });
        }

        if self.table_defaults.max_players > MAX_PLAYERS {
            return Err(ConfigError::Invalid {
                var: "TABLE_MAX_PLAYERS".to_string(),
                reason: format!("Must be at most {MAX_PLAYERS} (max players with 52-card deck)"),
            });
        }

        if self.table_defaults.name_prefix.trim().is_empty() {
            return Err(ConfigError::Invalid {
                var: "TABLE_NAME_PREFIX".to_string(),
                reason: "Must not be empty".to_string(),
            });
        }

        self.polling
            .validate()
            .map_err(|reason| ConfigError::Invalid {
                var: "STALE_AFTER_MS".to_string(),
                reason,
            })?;

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

impl From<EnvVarError> for ConfigError {
    fn from(e: EnvVarError) -> Self {
        ConfigError::Invalid {
            var: e.var,
            reason: e.reason,
        }
    }
}
