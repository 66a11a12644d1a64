//! Table actor implementation with async message handling.

use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};

use super::{
    config::TableConfig,
    errors::{TableError, TableResult},
    messages::{Applied, TableMessage},
};
use crate::game::{PlayerId, SessionId, TableOperation, TableSession, TableSnapshot};

/// Bound on queued mutations per table.
const INBOX_CAPACITY: usize = 100;

/// Table actor handle for sending messages and reading published snapshots
#[derive(Clone, Debug)]
pub struct TableHandle {
    sender: mpsc::Sender<TableMessage>,
    snapshots: watch::Receiver<Arc<TableSnapshot>>,
    session_id: SessionId,
}

impl TableHandle {
    /// Get session ID
    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    /// Latest published snapshot. Never waits on the actor.
    pub fn snapshot(&self) -> TableResult<Arc<TableSnapshot>> {
        if self.is_closed() {
            return Err(TableError::SessionNotFound(self.session_id));
        }
        Ok(self.snapshots.borrow().clone())
    }

    /// Queue one operation behind any already waiting and await its result.
    pub async fn mutate(&self, operation: TableOperation) -> TableResult<Applied> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(TableMessage::Mutate {
                operation,
                response: tx,
            })
            .await
            .map_err(|_| TableError::SessionNotFound(self.session_id))?;

        // The actor drops queued replies when it shuts down.
        rx.await
            .map_err(|_| TableError::SessionNotFound(self.session_id))?
    }

    /// Seat a player through the actor, returning their id with the
    /// snapshot published for the join.
    pub async fn join(
        &self,
        alias: Option<String>,
    ) -> TableResult<(PlayerId, Arc<TableSnapshot>)> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(TableMessage::Join {
                alias,
                response: tx,
            })
            .await
            .map_err(|_| TableError::SessionNotFound(self.session_id))?;
        rx.await
            .map_err(|_| TableError::SessionNotFound(self.session_id))?
    }

    /// Ask the actor to stop. Mutations queued ahead of this are still served.
    pub async fn close(&self) -> TableResult<()> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(TableMessage::Close { response: tx })
            .await
            .map_err(|_| TableError::SessionNotFound(self.session_id))?;
        rx.await
            .map_err(|_| TableError::SessionNotFound(self.session_id))
    }

    /// A receiver that is notified every time a mutation is published.
    pub fn subscribe(&self) -> watch::Receiver<Arc<TableSnapshot>> {
        self.snapshots.clone()
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// Table actor owning a single live session
pub struct TableActor {
    session: TableSession,

    /// Message inbox
    inbox: mpsc::Receiver<TableMessage>,

    /// Publishing side of the snapshot channel
    published: watch::Sender<Arc<TableSnapshot>>,
}

impl TableActor {
    /// Create a new table actor
    ///
    /// # Returns
    ///
    /// * `(TableActor, TableHandle)` - Actor and handle for sending messages
    pub fn new(id: SessionId, config: &TableConfig) -> (Self, TableHandle) {
        let (sender, inbox) = mpsc::channel(INBOX_CAPACITY);
        let session = TableSession::new(id, config);
        let (published, snapshots) = watch::channel(Arc::new(session.snapshot()));

        let actor = Self {
            session,
            inbox,
            published,
        };
        let handle = TableHandle {
            sender,
            snapshots,
            session_id: id,
        };

        (actor, handle)
    }

    /// Run the table actor event loop
    pub async fn run(mut self) {
        let id = self.session.id();
        log::info!("Table {id} starting");

        while let Some(message) = self.inbox.recv().await {
            match message {
                TableMessage::Mutate {
                    operation,
                    response,
                } => {
                    let result = self.handle_mutation(&operation);
                    if response.send(result).is_err() {
                        log::warn!("Table {id}: caller went away before {} reply", operation.name());
                    }
                }

                TableMessage::Join { alias, response } => {
                    let result = self.handle_join(alias.as_deref());
                    if response.send(result).is_err() {
                        log::warn!("Table {id}: caller went away before join reply");
                    }
                }

                TableMessage::Close { response } => {
                    let _ = response.send(());
                    break;
                }
            }
        }

        log::info!("Table {id} closed");
    }

    fn handle_mutation(&mut self, operation: &TableOperation) -> TableResult<Applied> {
        match self.session.apply(operation) {
            Ok(joined) => {
                let snapshot = self.publish(operation.name());
                Ok(Applied { snapshot, joined })
            }
            Err(e) => Err(self.rejected(operation.name(), e)),
        }
    }

    fn handle_join(&mut self, alias: Option<&str>) -> TableResult<(PlayerId, Arc<TableSnapshot>)> {
        match self.session.apply_join(alias) {
            Ok(player_id) => Ok((player_id, self.publish("join"))),
            Err(e) => Err(self.rejected("join", e)),
        }
    }

    /// Publish the session's current state to every subscriber.
    fn publish(&mut self, operation: &str) -> Arc<TableSnapshot> {
        let snapshot = Arc::new(self.session.snapshot());
        self.published.send_replace(Arc::clone(&snapshot));
        log::debug!(
            "Table {}: {operation} applied (version {}, phase {}, hand #{})",
            snapshot.session_id,
            snapshot.version,
            snapshot.phase,
            snapshot.hand_number
        );
        snapshot
    }

    fn rejected(&self, operation: &str, e: TableError) -> TableError {
        log::debug!("Table {}: {operation} rejected: {e}", self.session.id());
        e
    }
}
