//! # Live Table
//!
//! One authoritative poker table session, many viewers.
//!
//! A session advances through a fixed cycle of phases while a small number of
//! privileged callers (a dealer's laptop, a presentation clicker, a retried
//! browser tab) push mutations at it and any number of pollers read it. The
//! library keeps the state machine pure and puts a single serialization point
//! in front of it per session.
//!
//! ## Architecture
//!
//! The hand lifecycle has six phases:
//!
//! - **Waiting**: between hands, roster can change freely
//! - **Pre-Flop**: dealer rotated, pocket cards dealt
//! - **Flop/Turn/River**: community cards revealed 3, 1, 1
//! - **Shuffle**: cards collected, deck discarded
//!
//! ## Core Modules
//!
//! - [`game`]: cards, deck, phase state machine, roster bookkeeping, snapshots
//! - [`table`]: per-session actors and the session registry
//! - [`sync`]: polling intervals and freshness classification for consumers
//!
//! ## Example
//!
//! ```
//! use live_table::{TableConfig, TableSession, game::Phase};
//! use live_table::game::SessionId;
//!
//! let mut session = TableSession::new(SessionId::new(), &TableConfig::default());
//! session.join(Some("alice")).unwrap();
//! session.advance().unwrap();
//! assert_eq!(session.phase(), Phase::PreFlop);
//! ```

/// Cards, deck, phase state machine, roster and snapshots.
pub mod game;
pub use game::{
    Phase, TableOperation, TableSession,
    constants::{self, DEFAULT_MAX_PLAYERS, MAX_PLAYERS},
    entities::{self, Alias, Card, Deck, HandId, PlayerId, SessionId, Suit},
    views::{PlayerView, Roles, SeatSummary, TableSnapshot, TableView},
};

/// Polling contract shared by the server and its consumers.
pub mod sync;
pub use sync::{EnvVarError, Freshness, PollingConfig, ViewKind};

/// Session store: one actor per table plus the registry in front of them.
pub mod table;
pub use table::{TableConfig, TableError, TableManager, TableResult};
