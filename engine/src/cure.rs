// ═══════════════════════════════════════════════════════════════════════
// Cures — discovery, eradication and the victory condition
// ═══════════════════════════════════════════════════════════════════════

use crate::cards::PlayerCard;
use crate::error::ActionError;
use crate::types::*;

impl GameState {
    /// City cards in `player`'s hand that could cure a color, first color in
    /// `Color::ALL` order with enough cards and no cure yet.
    pub fn cure_candidate(&self, player: usize) -> Option<(Color, Vec<PlayerCard>)> {
        let hand = &self.players.get(player)?.hand;
        Color::ALL.into_iter().find_map(|color| {
            if self.is_cured(color) {
                return None;
            }
            let cards: Vec<PlayerCard> = hand
                .iter()
                .copied()
                .filter(|&c| self.card_color(c) == Some(color))
                .take(CURE_CARDS)
                .collect();
            (cards.len() == CURE_CARDS).then_some((color, cards))
        })
    }

    /// Spend five same-colored city cards at a research station.
    pub(crate) fn discover_cure(&mut self, player: usize) -> Result<Color, ActionError> {
        let location = self.players[player].location;
        if !self.has_station(location) {
            return Err(ActionError::NoStation(location));
        }
        let (color, cards) = self.cure_candidate(player).ok_or(ActionError::CureUnavailable)?;

        for card in cards {
            self.players[player].take(card);
            self.player_deck.discard(card);
        }
        self.cures[color.index()] = true;
        self.log(format!("[CURE] {} discovered the {color} cure!", self.players[player].name));
        self.check_eradication(color);
        Ok(color)
    }

    /// Mark `color` eradicated if it is cured and no cube of it remains.
    pub fn check_eradication(&mut self, color: Color) {
        if !self.is_cured(color) || self.is_eradicated(color) {
            return;
        }
        if self.cubes_of(color) == 0 {
            self.eradicated[color.index()] = true;
            self.log(format!("[ERADICATED] {color} has been eradicated from the board!"));
        }
    }

    pub(crate) fn check_all_eradication(&mut self) {
        for color in Color::ALL {
            self.check_eradication(color);
        }
    }

    /// Ends the game in victory once every cure is found.
    pub(crate) fn check_victory(&mut self) -> bool {
        if self.cures.iter().all(|&c| c) {
            self.finish(Outcome::Victory);
            return true;
        }
        false
    }
}
