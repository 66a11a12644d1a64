pub const DECK_SIZE: usize = 52;
pub const POCKET_CARDS: usize = 2;
pub const MAX_COMMUNITY_CARDS: usize = 5;

pub const DEFAULT_MAX_PLAYERS: usize = 10;

/// Largest roster a single deck can serve: 2 * 23 + 5 = 51.
pub const MAX_PLAYERS: usize = (DECK_SIZE - MAX_COMMUNITY_CARDS) / POCKET_CARDS;

pub const MAX_ALIAS_LENGTH: usize = 32;
