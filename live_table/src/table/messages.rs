//! Table actor message types.

use std::sync::Arc;
use tokio::sync::oneshot;

use super::errors::TableResult;
use crate::game::{PlayerId, TableOperation, TableSnapshot};

/// Messages that can be sent to a TableActor
#[derive(Debug)]
pub enum TableMessage {
    /// Apply one operation. The reply carries the snapshot published for it.
    Mutate {
        operation: TableOperation,
        response: oneshot::Sender<TableResult<Applied>>,
    },

    /// Seat a player. Unlike a generic `Mutate`, the reply always names
    /// the seated player.
    Join {
        alias: Option<String>,
        response: oneshot::Sender<TableResult<(PlayerId, Arc<TableSnapshot>)>>,
    },

    /// Stop the actor once every earlier message has been served
    Close { response: oneshot::Sender<()> },
}

/// Outcome of an accepted mutation.
#[derive(Debug, Clone)]
pub struct Applied {
    /// State right after this mutation, before any later one.
    pub snapshot: Arc<TableSnapshot>,

    /// Set when the operation seated a new player.
    pub joined: Option<PlayerId>,
}
