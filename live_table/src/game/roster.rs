use super::entities::{Alias, Player, PlayerId};
use super::state_machine::TableSession;
use crate::table::{TableError, TableResult};

impl TableSession {
    /// Seat a new player at the end of the seating order.
    ///
    /// Blank or missing aliases fall back to `Player N`, where N counts
    /// accepted joins over the session's lifetime. A player joining mid-hand
    /// sits out until the next deal. The first player to sit at an empty
    /// table becomes dealer-elect and deals the next hand. Any other join
    /// leaves the dealer and blinds where they are.
    pub fn join(&mut self, alias: Option<&str>) -> TableResult<PlayerId> {
        if self.players.len() >= self.max_players {
            return Err(TableError::TableFull {
                max_players: self.max_players,
            });
        }

        self.joins += 1;
        let alias = alias
            .map(Alias::new)
            .filter(|alias| !alias.is_empty())
            .unwrap_or_else(|| Alias::fallback(self.joins));
        let id = PlayerId::new();
        log::debug!("Table {}: {alias} joined as {id}", self.id);
        self.players.push(Player::new(id, alias));

        if self.dealer.is_none() {
            self.assign_roles(Some(id));
            self.button_dealt = false;
        }
        Ok(id)
    }

    /// Remove a player, taking their pocket cards with them.
    ///
    /// If the dealer leaves, the button passes to whoever now occupies the
    /// dealer's old seat (their successor) and that player deals next. When
    /// any role holder leaves, the blinds are reseated behind the dealer.
    pub fn kick(&mut self, player_id: PlayerId) -> TableResult<()> {
        let seat = self
            .seat_of(player_id)
            .ok_or(TableError::PlayerNotFound(player_id))?;
        let removed = self.players.remove(seat);
        log::debug!("Table {}: {} was kicked", self.id, removed.alias);

        if self.dealer == Some(player_id) {
            let successor = self.player_at(seat);
            self.assign_roles(successor);
            self.button_dealt = false;
        } else if [self.small_blind, self.big_blind].contains(&Some(player_id)) {
            self.assign_roles(self.dealer);
        }
        Ok(())
    }
}
