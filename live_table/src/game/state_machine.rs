//! Phase state machine for a single table session.
//!
//! `TableSession` is the live, mutable state of one table. Every change goes
//! through [`TableSession::apply`], which either commits the whole operation
//! or returns an error with the session untouched.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::constants::POCKET_CARDS;
use super::entities::{Card, Deck, HandId, Player, PlayerId, SessionId};
use crate::table::{TableConfig, TableResult};

/// Step of the recurring hand lifecycle.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    #[default]
    Waiting,
    PreFlop,
    Flop,
    Turn,
    River,
    Shuffle,
}

impl Phase {
    /// Phase reached by one advance from `self`.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Waiting => Self::PreFlop,
            Self::PreFlop => Self::Flop,
            Self::Flop => Self::Turn,
            Self::Turn => Self::River,
            Self::River => Self::Shuffle,
            Self::Shuffle => Self::Waiting,
        }
    }

    /// Community cards on the table while in this phase.
    #[must_use]
    pub const fn community_cards(self) -> usize {
        match self {
            Self::Waiting | Self::PreFlop | Self::Shuffle => 0,
            Self::Flop => 3,
            Self::Turn => 4,
            Self::River => 5,
        }
    }

    /// Whether pocket cards are out.
    #[must_use]
    pub const fn is_hand_live(self) -> bool {
        matches!(self, Self::PreFlop | Self::Flop | Self::Turn | Self::River)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Waiting => "Waiting",
            Self::PreFlop => "Pre-Flop",
            Self::Flop => "Flop",
            Self::Turn => "Turn",
            Self::River => "River",
            Self::Shuffle => "Shuffle",
        };
        write!(f, "{repr}")
    }
}

/// The privileged actions a session accepts.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TableOperation {
    AdvancePhase,
    JoinPlayer { alias: Option<String> },
    KickPlayer { player_id: PlayerId },
}

impl TableOperation {
    /// Short label for logs and metrics.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AdvancePhase => "advance",
            Self::JoinPlayer { .. } => "join",
            Self::KickPlayer { .. } => "kick",
        }
    }
}

/// Live state of one table.
#[derive(Debug)]
pub struct TableSession {
    pub(super) id: SessionId,
    pub(super) name: String,
    pub(super) max_players: usize,
    pub(super) phase: Phase,
    /// Seating order. Dealer succession walks this list.
    pub(super) players: Vec<Player>,
    /// Community cards shared amongst all players.
    pub(super) board: Vec<Card>,
    /// Remainder of the current hand's deck. Empty between hands.
    pub(super) deck: Deck,
    pub(super) dealer: Option<PlayerId>,
    /// Blind holders, fixed whenever roles are assigned. Later joins leave
    /// them alone.
    pub(super) small_blind: Option<PlayerId>,
    pub(super) big_blind: Option<PlayerId>,
    /// True once the current dealer has dealt; the next deal rotates the button.
    pub(super) button_dealt: bool,
    pub(super) hand_id: Option<HandId>,
    pub(super) hand_number: u64,
    /// Running count of accepted joins, used for fallback aliases.
    pub(super) joins: u64,
    pub(super) version: u64,
    pub(super) updated_at: DateTime<Utc>,
}

impl TableSession {
    #[must_use]
    pub fn new(id: SessionId, config: &TableConfig) -> Self {
        Self {
            id,
            name: config.name.clone(),
            max_players: config.max_players,
            phase: Phase::Waiting,
            players: Vec::with_capacity(config.max_players),
            board: Vec::with_capacity(5),
            deck: Deck::empty(),
            dealer: None,
            small_blind: None,
            big_blind: None,
            button_dealt: false,
            hand_id: None,
            hand_number: 0,
            joins: 0,
            version: 0,
            updated_at: Utc::now(),
        }
    }

    /// Apply one operation atomically. On success the version is bumped and
    /// the id of a newly joined player (if any) is returned.
    pub fn apply(&mut self, operation: &TableOperation) -> TableResult<Option<PlayerId>> {
        self.apply_with(operation, &mut rand::rng())
    }

    pub fn apply_with<R: Rng + ?Sized>(
        &mut self,
        operation: &TableOperation,
        rng: &mut R,
    ) -> TableResult<Option<PlayerId>> {
        let joined = match operation {
            TableOperation::AdvancePhase => self.advance_with(rng).map(|()| None)?,
            TableOperation::JoinPlayer { alias } => Some(self.join(alias.as_deref())?),
            TableOperation::KickPlayer { player_id } => self.kick(*player_id).map(|()| None)?,
        };
        self.commit();
        Ok(joined)
    }

    /// Join as a versioned mutation, yielding the new player's id.
    pub fn apply_join(&mut self, alias: Option<&str>) -> TableResult<PlayerId> {
        let player_id = self.join(alias)?;
        self.commit();
        Ok(player_id)
    }

    fn commit(&mut self) {
        self.version += 1;
        self.updated_at = Utc::now();
    }

    pub fn advance(&mut self) -> TableResult<()> {
        self.advance_with(&mut rand::rng())
    }

    /// Move to the next phase, performing that transition's dealing.
    pub fn advance_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> TableResult<()> {
        match self.phase {
            Phase::Waiting => self.start_hand(rng),
            Phase::PreFlop => self.reveal(3),
            Phase::Flop | Phase::Turn => self.reveal(1),
            Phase::River => {
                self.end_hand();
                Ok(())
            }
            Phase::Shuffle => {
                self.phase = Phase::Waiting;
                Ok(())
            }
        }
    }

    fn start_hand<R: Rng + ?Sized>(&mut self, rng: &mut R) -> TableResult<()> {
        // Everything fallible happens before the first write to `self`.
        let mut deck = Deck::shuffled_with(rng);
        let mut pockets = Vec::with_capacity(self.players.len());
        for _ in &self.players {
            pockets.push(deck.draw(POCKET_CARDS)?);
        }

        let dealer = self.next_dealer();
        for (player, cards) in self.players.iter_mut().zip(pockets) {
            player.cards = cards;
        }
        self.board.clear();
        self.deck = deck;
        self.assign_roles(dealer);
        self.button_dealt = dealer.is_some();
        self.hand_number += 1;
        self.hand_id = Some(HandId::new());
        self.phase = Phase::PreFlop;
        log::debug!(
            "Table {} dealt hand #{} to {} player(s)",
            self.id,
            self.hand_number,
            self.players.len()
        );
        Ok(())
    }

    fn reveal(&mut self, count: usize) -> TableResult<()> {
        let cards = self.deck.draw(count)?;
        self.board.extend(cards);
        self.phase = self.phase.next();
        Ok(())
    }

    fn end_hand(&mut self) {
        self.board.clear();
        for player in &mut self.players {
            player.reset();
        }
        self.deck = Deck::empty();
        self.phase = Phase::Shuffle;
    }

    /// Button holder for the hand about to be dealt: the dealer-elect if they
    /// have not dealt yet, otherwise their successor in seating order.
    fn next_dealer(&self) -> Option<PlayerId> {
        match self.dealer.and_then(|id| self.seat_of(id)) {
            Some(seat) if self.button_dealt => self.player_at(seat + 1),
            Some(seat) => self.player_at(seat),
            None => self.player_at(0),
        }
    }

    /// Give the button to `dealer` and the blinds to its first and second
    /// successors in seating order. They coincide on short rosters.
    pub(super) fn assign_roles(&mut self, dealer: Option<PlayerId>) {
        let seat = dealer.and_then(|id| self.seat_of(id));
        self.dealer = seat.and(dealer);
        self.small_blind = seat.and_then(|s| self.player_at(s + 1));
        self.big_blind = seat.and_then(|s| self.player_at(s + 2));
    }

    /// Player at `seat`, wrapping around the roster.
    pub(super) fn player_at(&self, seat: usize) -> Option<PlayerId> {
        if self.players.is_empty() {
            return None;
        }
        Some(self.players[seat % self.players.len()].id)
    }

    pub(super) fn seat_of(&self, player_id: PlayerId) -> Option<usize> {
        self.players.iter().position(|p| p.id == player_id)
    }

    /// Seats of (dealer, small blind, big blind).
    pub(super) fn role_seats(&self) -> Option<(usize, usize, usize)> {
        Some((
            self.seat_of(self.dealer?)?,
            self.seat_of(self.small_blind?)?,
            self.seat_of(self.big_blind?)?,
        ))
    }

    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    #[must_use]
    pub fn board(&self) -> &[Card] {
        &self.board
    }

    #[must_use]
    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    #[must_use]
    pub fn dealer(&self) -> Option<PlayerId> {
        self.dealer
    }

    #[must_use]
    pub fn hand_number(&self) -> u64 {
        self.hand_number
    }

    #[must_use]
    pub fn hand_id(&self) -> Option<HandId> {
        self.hand_id
    }

    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    #[must_use]
    pub fn max_players(&self) -> usize {
        self.max_players
    }

    #[cfg(test)]
    pub(crate) fn replace_deck(&mut self, deck: Deck) {
        self.deck = deck;
    }
}
