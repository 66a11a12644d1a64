use rand::{Rng, seq::SliceRandom};
use serde::{Deserialize, Deserializer, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;

use super::constants;
use crate::table::{TableError, TableResult};

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Suit {
    Club,
    Spade,
    Diamond,
    Heart,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Club, Suit::Spade, Suit::Diamond, Suit::Heart];
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Club => "♣",
            Self::Spade => "♠",
            Self::Diamond => "♦",
            Self::Heart => "♥",
        };
        write!(f, "{repr}")
    }
}

/// Placeholder for card values.
pub type Value = u8;

/// A card is a tuple of a uInt8 value (ace=1u8 ... king=13u8)
/// and a suit.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Card(pub Value, pub Suit);

impl Card {
    /// Every card of a standard deck, ordered by value then suit.
    pub fn all() -> impl Iterator<Item = Card> {
        (1u8..=13u8).flat_map(|value| Suit::ALL.into_iter().map(move |suit| Card(value, suit)))
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let value = match self.0 {
            1 => "A",
            11 => "J",
            12 => "Q",
            13 => "K",
            v => &v.to_string(),
        };
        let repr = format!("{value}/{}", self.1);
        write!(f, "{repr:>4}")
    }
}

/// A single-use deck. Cards come off the top (front) and never go back;
/// a new hand gets a new deck.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// All 52 cards in a fixed order.
    #[must_use]
    pub fn ordered() -> Self {
        Self {
            cards: Card::all().collect(),
        }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Deck with an explicit top-to-bottom order. Useful for replays.
    #[must_use]
    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    #[must_use]
    pub fn shuffled() -> Self {
        Self::shuffled_with(&mut rand::rng())
    }

    pub fn shuffled_with<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut deck = Self::ordered();
        deck.cards.shuffle(rng);
        deck
    }

    /// Take `n` cards off the top. Either all `n` come off or none do.
    pub fn draw(&mut self, n: usize) -> TableResult<Vec<Card>> {
        if n > self.cards.len() {
            return Err(TableError::DeckExhausted {
                requested: n,
                remaining: self.cards.len(),
            });
        }
        Ok(self.cards.drain(..n).collect())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn contains(&self, card: &Card) -> bool {
        self.cards.contains(card)
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
}

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            #[must_use]
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }
    };
}

uuid_id!(
    /// Stable identifier of a table session.
    SessionId
);
uuid_id!(
    /// Opaque player identifier, issued once per join and never reused.
    PlayerId
);
uuid_id!(
    /// Identifier of one dealt hand.
    HandId
);

/// Display name of a seated player.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Alias(String);

impl Alias {
    pub fn new(s: &str) -> Self {
        let mut alias: String = s
            .trim()
            .chars()
            .map(|c| if c.is_whitespace() { '_' } else { c })
            .collect();
        if let Some((idx, _)) = alias.char_indices().nth(constants::MAX_ALIAS_LENGTH) {
            alias.truncate(idx);
        }
        Self(alias)
    }

    /// Label for a player who joined without choosing a name.
    pub fn fallback(join_number: u64) -> Self {
        Self(format!("Player {join_number}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Alias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// Aliases are sanitized when a player joins. Deserializing keeps the text
// as served so fallback labels like `Player 2` survive a round trip.
impl<'de> Deserialize<'de> for Alias {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(Self)
    }
}

/// A seated player. Roles are not stored here; the session tracks who
/// holds the button and blinds.
#[derive(Clone, Debug)]
pub struct Player {
    pub id: PlayerId,
    pub alias: Alias,
    pub cards: Vec<Card>,
}

impl Player {
    #[must_use]
    pub fn new(id: PlayerId, alias: Alias) -> Self {
        Self {
            id,
            alias,
            cards: Vec::with_capacity(constants::POCKET_CARDS),
        }
    }

    pub fn reset(&mut self) {
        self.cards.clear();
    }
}
