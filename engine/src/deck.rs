// ═══════════════════════════════════════════════════════════════════════
// Decks — infection deck and player deck
//
// Both piles are ordered with the top card at the front. Neither deck ever
// touches city state; callers apply the effect of a drawn card.
// ═══════════════════════════════════════════════════════════════════════

use crate::cards::{EventKind, InfectionCard, PlayerCard};
use crate::error::DeckError;
use crate::types::CityId;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::VecDeque;

// ── Infection deck ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfectionDeck {
    pub draw_pile: VecDeque<InfectionCard>,
    pub discard_pile: Vec<InfectionCard>,
    /// Cards taken out of the game by Resilient Population.
    pub removed: Vec<InfectionCard>,
}

impl InfectionDeck {
    /// A shuffled deck holding one card per city.
    pub fn new<R: Rng + ?Sized>(cities: impl IntoIterator<Item = CityId>, rng: &mut R) -> Self {
        let mut cards: Vec<InfectionCard> = cities.into_iter().collect();
        cards.shuffle(rng);
        InfectionDeck { draw_pile: cards.into(), discard_pile: Vec::new(), removed: Vec::new() }
    }

    pub fn draw_top(&mut self) -> Result<InfectionCard, DeckError> {
        self.draw_pile.pop_front().ok_or(DeckError::Exhausted)
    }

    pub fn draw_bottom(&mut self) -> Result<InfectionCard, DeckError> {
        self.draw_pile.pop_back().ok_or(DeckError::Exhausted)
    }

    pub fn discard(&mut self, card: InfectionCard) {
        self.discard_pile.push(card);
    }

    /// Up to `n` cards from the top, top first, without drawing them.
    pub fn peek_top(&self, n: usize) -> Vec<InfectionCard> {
        self.draw_pile.iter().take(n).copied().collect()
    }

    /// Replace the top `new_order.len()` cards with `new_order`. The new order
    /// must be a permutation of the cards it replaces.
    pub fn modify_top(&mut self, new_order: &[InfectionCard]) -> Result<(), DeckError> {
        let n = new_order.len();
        if n > self.draw_pile.len() {
            return Err(DeckError::InvalidReorder(n));
        }
        let mut current = self.peek_top(n);
        let mut proposed = new_order.to_vec();
        current.sort_unstable();
        proposed.sort_unstable();
        if current != proposed {
            return Err(DeckError::InvalidReorder(n));
        }
        for (slot, &card) in self.draw_pile.iter_mut().zip(new_order) {
            *slot = card;
        }
        Ok(())
    }

    /// Shuffle the discard pile and put it on top of the draw pile.
    pub fn shuffle_discard_onto_top<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if self.discard_pile.is_empty() {
            return;
        }
        self.discard_pile.shuffle(rng);
        for card in self.discard_pile.drain(..).rev() {
            self.draw_pile.push_front(card);
        }
    }

    /// Move `card` from the discard pile out of the game.
    pub fn remove_from_discard(&mut self, card: InfectionCard) -> bool {
        match self.discard_pile.iter().position(|&c| c == card) {
            Some(pos) => {
                self.discard_pile.remove(pos);
                self.removed.push(card);
                true
            }
            None => false,
        }
    }

    /// Cards in every pile, including removed ones.
    pub fn total(&self) -> usize {
        self.draw_pile.len() + self.discard_pile.len() + self.removed.len()
    }
}

// ── Player deck ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerDeck {
    pub draw_pile: VecDeque<PlayerCard>,
    pub discard_pile: Vec<PlayerCard>,
    /// Size of each epidemic pile as built, top pile first.
    pub pile_sizes: Vec<usize>,
}

impl PlayerDeck {
    /// Build the deck: shuffle cities and events together, cut into
    /// `epidemics` equal piles (leftovers join the last), add one epidemic to
    /// each pile, shuffle each pile, then stack them in order.
    pub fn build<R: Rng + ?Sized>(
        cities: impl IntoIterator<Item = CityId>,
        events: usize,
        epidemics: usize,
        rng: &mut R,
    ) -> Self {
        let mut base: Vec<PlayerCard> = cities.into_iter().map(PlayerCard::City).collect();
        base.extend(EventKind::POOL.iter().cycle().take(events).map(|&k| PlayerCard::Event(k)));
        base.shuffle(rng);

        if epidemics == 0 {
            let size = base.len();
            return PlayerDeck { draw_pile: base.into(), discard_pile: Vec::new(), pile_sizes: vec![size] };
        }

        let pile_size = (base.len() / epidemics).max(1);
        let mut draw_pile = VecDeque::with_capacity(base.len() + epidemics);
        let mut pile_sizes = Vec::with_capacity(epidemics);
        for i in 0..epidemics {
            let start = (i * pile_size).min(base.len());
            let end = if i + 1 == epidemics { base.len() } else { ((i + 1) * pile_size).min(base.len()) };
            let mut pile = base[start..end].to_vec();
            pile.push(PlayerCard::Epidemic);
            pile.shuffle(rng);
            pile_sizes.push(pile.len());
            draw_pile.extend(pile);
        }

        PlayerDeck { draw_pile, discard_pile: Vec::new(), pile_sizes }
    }

    pub fn draw(&mut self) -> Result<PlayerCard, DeckError> {
        self.draw_pile.pop_front().ok_or(DeckError::Exhausted)
    }

    pub fn discard(&mut self, card: PlayerCard) {
        self.discard_pile.push(card);
    }

    pub fn remaining(&self) -> usize {
        self.draw_pile.len()
    }

    pub fn epidemics_remaining(&self) -> usize {
        self.draw_pile.iter().filter(|c| c.is_epidemic()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn ids(n: u8) -> impl Iterator<Item = CityId> {
        (0..n).map(CityId)
    }

    #[test]
    fn infection_draws_from_both_ends_until_exhausted() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut deck = InfectionDeck::new(ids(3), &mut rng);
        let top = deck.draw_pile[0];
        let bottom = deck.draw_pile[2];
        assert_eq!(deck.draw_top().unwrap(), top);
        assert_eq!(deck.draw_bottom().unwrap(), bottom);
        deck.draw_top().unwrap();
        assert_eq!(deck.draw_top(), Err(DeckError::Exhausted));
        assert_eq!(deck.draw_bottom(), Err(DeckError::Exhausted));
    }

    #[test]
    fn discard_goes_back_on_top() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut deck = InfectionDeck::new(ids(10), &mut rng);
        let mut drawn = Vec::new();
        for _ in 0..4 {
            let card = deck.draw_top().unwrap();
            deck.discard(card);
            drawn.push(card);
        }
        let untouched: Vec<_> = deck.draw_pile.iter().copied().collect();

        deck.shuffle_discard_onto_top(&mut rng);

        assert!(deck.discard_pile.is_empty());
        assert_eq!(deck.draw_pile.len(), 10);
        let mut top: Vec<_> = deck.peek_top(4);
        top.sort();
        drawn.sort();
        assert_eq!(top, drawn);
        assert_eq!(deck.draw_pile.iter().skip(4).copied().collect::<Vec<_>>(), untouched);
    }

    #[test]
    fn modify_top_requires_a_permutation() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut deck = InfectionDeck::new(ids(8), &mut rng);
        let mut top = deck.peek_top(3);
        top.reverse();
        deck.modify_top(&top).unwrap();
        assert_eq!(deck.peek_top(3), top);

        let foreign = vec![top[0], top[1], deck.draw_pile[5]];
        assert_eq!(deck.modify_top(&foreign), Err(DeckError::InvalidReorder(3)));
        assert_eq!(deck.peek_top(3), top);
        assert_eq!(deck.peek_top(100).len(), 8);
    }

    #[test]
    fn removed_cards_stay_counted() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut deck = InfectionDeck::new(ids(4), &mut rng);
        let card = deck.draw_top().unwrap();
        assert!(!deck.remove_from_discard(card));
        deck.discard(card);
        assert!(deck.remove_from_discard(card));
        assert_eq!(deck.removed, vec![card]);
        assert_eq!(deck.total(), 4);
    }

    #[test]
    fn player_deck_spaces_one_epidemic_per_pile() {
        for seed in 0..20 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let deck = PlayerDeck::build(ids(48), 5, 4, &mut rng);
            assert_eq!(deck.draw_pile.len(), 48 + 5 + 4);
            // 53 cards / 4 piles = 13 each, last pile keeps the leftover
            assert_eq!(deck.pile_sizes, vec![14, 14, 14, 15]);

            let mut start = 0;
            for &size in &deck.pile_sizes {
                let epidemics = deck.draw_pile.range(start..start + size).filter(|c| c.is_epidemic()).count();
                assert_eq!(epidemics, 1, "seed {seed}, pile at {start}");
                start += size;
            }
        }
    }

    #[test]
    fn event_cards_cycle_through_the_pool() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let deck = PlayerDeck::build(ids(10), 7, 2, &mut rng);
        let airlifts = deck.draw_pile.iter().filter(|&&c| c == PlayerCard::Event(EventKind::Airlift)).count();
        let forecasts = deck.draw_pile.iter().filter(|&&c| c == PlayerCard::Event(EventKind::Forecast)).count();
        assert_eq!(airlifts, 2);
        assert_eq!(forecasts, 1);
        assert_eq!(deck.epidemics_remaining(), 2);
    }

    #[test]
    fn same_seed_same_order() {
        let a = PlayerDeck::build(ids(48), 5, 6, &mut ChaCha8Rng::seed_from_u64(42));
        let b = PlayerDeck::build(ids(48), 5, 6, &mut ChaCha8Rng::seed_from_u64(42));
        assert_eq!(a, b);
    }
}
