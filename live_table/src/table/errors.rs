use thiserror::Error;

use crate::game::entities::{PlayerId, SessionId};

/// Everything that can go wrong while operating on a table session.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("session {0} not found")]
    SessionNotFound(SessionId),

    #[error("player {0} not found")]
    PlayerNotFound(PlayerId),

    #[error("table is full ({max_players} players)")]
    TableFull { max_players: usize },

    #[error("deck exhausted: requested {requested} card(s), {remaining} remaining")]
    DeckExhausted { requested: usize, remaining: usize },

    #[error("invalid table config: {0}")]
    InvalidConfig(String),
}

impl TableError {
    /// Message safe to hand back to a remote caller.
    #[must_use]
    pub fn client_message(&self) -> String {
        match self {
            Self::SessionNotFound(_) => "Table not found".to_string(),
            Self::PlayerNotFound(_) => "Player not found".to_string(),
            Self::TableFull { max_players } => format!("Table is full ({max_players} players)"),
            // Only reachable with a corrupted session; keep the details in the logs.
            Self::DeckExhausted { .. } => "Internal table error".to_string(),
            Self::InvalidConfig(reason) => reason.clone(),
        }
    }
}

pub type TableResult<T> = Result<T, TableError>;
