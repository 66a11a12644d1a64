//! Table configuration models.

use serde::{Deserialize, Serialize};

use super::errors::{TableError, TableResult};
use crate::game::constants::{DEFAULT_MAX_PLAYERS, MAX_PLAYERS};

/// Table configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Table name shown in listings
    pub name: String,

    /// Maximum number of seated players (default: 10)
    pub max_players: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            name: "Table".to_string(),
            max_players: DEFAULT_MAX_PLAYERS,
        }
    }
}

impl TableConfig {
    /// Validate configuration
    pub fn validate(&self) -> TableResult<()> {
        if self.name.trim().is_empty() {
            return Err(TableError::InvalidConfig(
                "Table name must not be empty".to_string(),
            ));
        }

        if self.max_players == 0 || self.max_players > MAX_PLAYERS {
            return Err(TableError::InvalidConfig(format!(
                "Max players must be between 1 and {MAX_PLAYERS}"
            )));
        }

        Ok(())
    }
}
