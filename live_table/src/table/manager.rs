//! Table manager for spawning and managing multiple table actors.

use serde::{Deserialize, Serialize};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;

use super::{
    actor::{TableActor, TableHandle},
    config::TableConfig,
    errors::{TableError, TableResult},
    messages::Applied,
};
use crate::game::{Phase, PlayerId, SessionId, TableOperation, TableSnapshot};

/// Table metadata for discovery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableMetadata {
    pub id: SessionId,
    pub name: String,
    pub player_count: usize,
    pub max_players: usize,
    pub phase: Phase,
    pub hand_number: u64,
}

impl From<&TableSnapshot> for TableMetadata {
    fn from(snapshot: &TableSnapshot) -> Self {
        Self {
            id: snapshot.session_id,
            name: snapshot.name.clone(),
            player_count: snapshot.player_count(),
            max_players: snapshot.max_players,
            phase: snapshot.phase,
            hand_number: snapshot.hand_number,
        }
    }
}

/// Registry of live table sessions.
///
/// The lock only guards the map itself and is held just long enough to clone
/// a handle, so traffic on one table never waits on another.
#[derive(Default)]
pub struct TableManager {
    /// Active table handles
    tables: Arc<RwLock<HashMap<SessionId, TableHandle>>>,
}

impl TableManager {
    /// Create a new table manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table and spawn its actor
    ///
    /// # Returns
    ///
    /// * `TableResult<SessionId>` - Session ID, or `InvalidConfig`
    pub async fn create_session(&self, config: TableConfig) -> TableResult<SessionId> {
        config.validate()?;

        let id = SessionId::new();
        let (actor, handle) = TableActor::new(id, &config);

        let mut tables = self.tables.write().await;
        tables.insert(id, handle);
        drop(tables);

        tokio::spawn(async move {
            actor.run().await;
        });

        log::info!(
            "Created table {id} '{}' (max {} players)",
            config.name,
            config.max_players
        );

        Ok(id)
    }

    /// Get a table handle
    pub async fn get_table(&self, session_id: SessionId) -> Option<TableHandle> {
        let tables = self.tables.read().await;
        tables.get(&session_id).cloned()
    }

    async fn handle(&self, session_id: SessionId) -> TableResult<TableHandle> {
        self.get_table(session_id)
            .await
            .ok_or(TableError::SessionNotFound(session_id))
    }

    /// Latest consistent state of a table. Does not queue behind writers.
    pub async fn get_snapshot(&self, session_id: SessionId) -> TableResult<Arc<TableSnapshot>> {
        self.handle(session_id).await?.snapshot()
    }

    /// Apply one operation to a table, in arrival order with respect to every
    /// other mutation on the same table.
    pub async fn mutate(
        &self,
        session_id: SessionId,
        operation: TableOperation,
    ) -> TableResult<Applied> {
        self.handle(session_id).await?.mutate(operation).await
    }

    pub async fn advance(&self, session_id: SessionId) -> TableResult<Arc<TableSnapshot>> {
        let applied = self.mutate(session_id, TableOperation::AdvancePhase).await?;
        Ok(applied.snapshot)
    }

    /// Seat a player, returning their new id alongside the resulting state.
    pub async fn join(
        &self,
        session_id: SessionId,
        alias: Option<String>,
    ) -> TableResult<(PlayerId, Arc<TableSnapshot>)> {
        self.handle(session_id).await?.join(alias).await
    }

    pub async fn kick(
        &self,
        session_id: SessionId,
        player_id: PlayerId,
    ) -> TableResult<Arc<TableSnapshot>> {
        let applied = self
            .mutate(session_id, TableOperation::KickPlayer { player_id })
            .await?;
        Ok(applied.snapshot)
    }

    /// Close a table
    ///
    /// The session is unregistered first so no new request can reach it, then
    /// its actor drains what is already queued and stops.
    pub async fn close_session(&self, session_id: SessionId) -> TableResult<()> {
        let mut tables = self.tables.write().await;
        let handle = tables
            .remove(&session_id)
            .ok_or(TableError::SessionNotFound(session_id))?;
        drop(tables);

        // An actor that already stopped is as closed as it gets.
        if let Err(e) = handle.close().await {
            log::warn!("Table {session_id}: actor gone before close: {e}");
        }

        log::info!("Closed table {session_id}");

        Ok(())
    }

    /// List all active tables
    pub async fn list_sessions(&self) -> Vec<TableMetadata> {
        let tables = self.tables.read().await;
        let mut sessions: Vec<TableMetadata> = tables
            .values()
            .filter_map(|handle| handle.snapshot().ok())
            .map(|snapshot| TableMetadata::from(snapshot.as_ref()))
            .collect();
        drop(tables);

        sessions.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        sessions
    }

    /// Get active table count
    pub async fn active_session_count(&self) -> usize {
        let tables = self.tables.read().await;
        tables.len()
    }
}
