//! Immutable snapshots of a table and the views carved out of them.
//!
//! A [`TableSnapshot`] is a full, consistent copy of one session taken right
//! after a mutation committed. It is what gets published to readers.
//! Nothing outside the session's owner ever sees a half-applied change.
//!
//! Two narrowed views are derived from a snapshot:
//!
//! - [`TableView`]: the shared screen. Roster, roles and board, but only a
//!   card count for each player.
//! - [`PlayerView`]: one player's own screen. Their pocket cards plus the
//!   public board.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entities::{Alias, Card, HandId, PlayerId, SessionId};
use super::state_machine::{Phase, TableSession};
use crate::table::{TableError, TableResult};

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Roles {
    pub is_dealer: bool,
    pub is_small_blind: bool,
    pub is_big_blind: bool,
}

/// A seated player as captured in a snapshot.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Seat {
    pub player_id: PlayerId,
    pub alias: Alias,
    pub seat: usize,
    #[serde(flatten)]
    pub roles: Roles,
    pub cards: Vec<Card>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct TableSnapshot {
    pub session_id: SessionId,
    pub name: String,
    pub phase: Phase,
    pub hand_id: Option<HandId>,
    pub hand_number: u64,
    pub community_cards: Vec<Card>,
    pub max_players: usize,
    pub deck_remaining: usize,
    pub seats: Vec<Seat>,
    pub version: u64,
    pub updated_at: DateTime<Utc>,
}

/// Per-player summary shown on the shared table screen.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct SeatSummary {
    pub player_id: PlayerId,
    pub alias: Alias,
    pub seat: usize,
    #[serde(flatten)]
    pub roles: Roles,
    pub card_count: usize,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct TableView {
    pub session_id: SessionId,
    pub name: String,
    pub phase: Phase,
    pub hand_id: Option<HandId>,
    pub hand_number: u64,
    pub community_cards: Vec<Card>,
    pub players: Vec<SeatSummary>,
    pub max_players: usize,
    pub version: u64,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PlayerView {
    pub session_id: SessionId,
    pub player_id: PlayerId,
    pub alias: Alias,
    pub seat: usize,
    #[serde(flatten)]
    pub roles: Roles,
    pub pocket_cards: Vec<Card>,
    pub phase: Phase,
    pub hand_id: Option<HandId>,
    pub hand_number: u64,
    pub community_cards: Vec<Card>,
    pub version: u64,
    pub updated_at: DateTime<Utc>,
}

impl TableSession {
    /// Capture the current state. Role flags are resolved here from the
    /// session's role holders.
    #[must_use]
    pub fn snapshot(&self) -> TableSnapshot {
        let role_seats = self.role_seats();
        let seats = self
            .players
            .iter()
            .enumerate()
            .map(|(seat, player)| Seat {
                player_id: player.id,
                alias: player.alias.clone(),
                seat,
                roles: role_seats
                    .map(|(d, sb, bb)| Roles {
                        is_dealer: seat == d,
                        is_small_blind: seat == sb,
                        is_big_blind: seat == bb,
                    })
                    .unwrap_or_default(),
                cards: player.cards.clone(),
            })
            .collect();

        TableSnapshot {
            session_id: self.id,
            name: self.name.clone(),
            phase: self.phase,
            hand_id: self.hand_id,
            hand_number: self.hand_number,
            community_cards: self.board.clone(),
            max_players: self.max_players,
            deck_remaining: self.deck.len(),
            seats,
            version: self.version,
            updated_at: self.updated_at,
        }
    }
}

impl TableSnapshot {
    #[must_use]
    pub fn seat(&self, player_id: PlayerId) -> Option<&Seat> {
        self.seats.iter().find(|s| s.player_id == player_id)
    }

    #[must_use]
    pub fn dealer(&self) -> Option<&Seat> {
        self.seats.iter().find(|s| s.roles.is_dealer)
    }

    #[must_use]
    pub fn small_blind(&self) -> Option<&Seat> {
        self.seats.iter().find(|s| s.roles.is_small_blind)
    }

    #[must_use]
    pub fn big_blind(&self) -> Option<&Seat> {
        self.seats.iter().find(|s| s.roles.is_big_blind)
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.seats.len()
    }

    /// The shared screen. Never carries pocket cards.
    #[must_use]
    pub fn table_view(&self) -> TableView {
        TableView {
            session_id: self.session_id,
            name: self.name.clone(),
            phase: self.phase,
            hand_id: self.hand_id,
            hand_number: self.hand_number,
            community_cards: self.community_cards.clone(),
            players: self
                .seats
                .iter()
                .map(|s| SeatSummary {
                    player_id: s.player_id,
                    alias: s.alias.clone(),
                    seat: s.seat,
                    roles: s.roles,
                    card_count: s.cards.len(),
                })
                .collect(),
            max_players: self.max_players,
            version: self.version,
            updated_at: self.updated_at,
        }
    }

    /// One player's screen. Fails if they are not seated in this snapshot.
    pub fn player_view(&self, player_id: PlayerId) -> TableResult<PlayerView> {
        let seat = self
            .seat(player_id)
            .ok_or(TableError::PlayerNotFound(player_id))?;
        Ok(PlayerView {
            session_id: self.session_id,
            player_id,
            alias: seat.alias.clone(),
            seat: seat.seat,
            roles: seat.roles,
            pocket_cards: seat.cards.clone(),
            phase: self.phase,
            hand_id: self.hand_id,
            hand_number: self.hand_number,
            community_cards: self.community_cards.clone(),
            version: self.version,
            updated_at: self.updated_at,
        })
    }
}
