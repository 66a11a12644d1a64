//! Table game engine.
//!
//! This module provides the state that a single table session owns:
//! - Card and deck model
//! - Phase state machine (Waiting through Shuffle)
//! - Roster join/kick with dealer and blind bookkeeping
//! - Immutable snapshots and the narrowed table/player views

pub mod constants;
pub mod entities;
pub mod roster;
pub mod state_machine;
pub mod views;

pub use entities::{Alias, Card, Deck, HandId, Player, PlayerId, SessionId, Suit};
pub use state_machine::{Phase, TableOperation, TableSession};
pub use views::{PlayerView, Roles, Seat, SeatSummary, TableSnapshot, TableView};
