//! Session store with one async actor per table.
//!
//! This module implements:
//! - TableActor: Async actor owning a single table session
//! - TableHandle: Cheap, cloneable front door to one actor
//! - TableManager: Registry that creates, finds and closes sessions
//!
//! ## Architecture
//!
//! Each table runs in a separate Tokio task with an mpsc message inbox, so
//! mutations on one table are served strictly in arrival order while other
//! tables proceed independently. After every accepted mutation the actor
//! publishes an immutable snapshot on a watch channel. Reads take the latest
//! published snapshot and never enter the inbox.
//!
//! ## Example
//!
//! ```
//! use live_table::{TableConfig, TableManager};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), live_table::TableError> {
//! let manager = TableManager::new();
//! let id = manager.create_session(TableConfig::default()).await?;
//!
//! let (player, _) = manager.join(id, Some("alice".to_string())).await?;
//! let snapshot = manager.advance(id).await?;
//! assert_eq!(snapshot.player_view(player)?.pocket_cards.len(), 2);
//! # Ok(())
//! # }
//! ```

pub mod actor;
pub mod config;
pub mod errors;
pub mod manager;
pub mod messages;

pub use actor::{TableActor, TableHandle};
pub use config::TableConfig;
pub use errors::{TableError, TableResult};
pub use manager::{TableManager, TableMetadata};
pub use messages::{Applied, TableMessage};
