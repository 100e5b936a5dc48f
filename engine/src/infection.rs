// ═══════════════════════════════════════════════════════════════════════
// Infection — cube placement, outbreak chains, epidemics, infection phase
//
// Outbreak chains run on an explicit stack of (city, next neighbour) frames
// so the visiting order matches a depth-first recursion without its depth
// limit. A city outbreaks at most once per chain.
// ═══════════════════════════════════════════════════════════════════════

use crate::cards::PlayerCard;
use crate::types::*;
use std::collections::HashSet;

/// Why cubes are being placed. Only used for the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfectionSource {
    Setup,
    InfectionPhase,
    Epidemic,
    Manual,
}

impl std::fmt::Display for InfectionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InfectionSource::Setup => write!(f, "setup"),
            InfectionSource::InfectionPhase => write!(f, "infection deck"),
            InfectionSource::Epidemic => write!(f, "epidemic"),
            InfectionSource::Manual => write!(f, "manual"),
        }
    }
}

impl GameState {
    /// Add `cubes` to `city` one at a time. The cube that would take a city
    /// past `MAX_CUBES` starts an outbreak chain instead; any cubes left
    /// after that are dropped.
    pub fn infect_city(&mut self, city: CityId, cubes: u8, source: InfectionSource) {
        if self.is_game_over() || !self.map.contains(city) {
            return;
        }
        let color = self.map.color(city);
        if self.is_eradicated(color) {
            self.log(format!("[INFECT] {}: {color} is eradicated, no cube placed.", self.city_name(city)));
            return;
        }

        self.log(format!("[INFECT] {} +{cubes} ({source})", self.city_name(city)));
        for _ in 0..cubes {
            if self.city(city).cubes < MAX_CUBES {
                self.city_mut(city).cubes += 1;
            } else {
                self.outbreak_chain(city);
                return;
            }
        }
        self.log(format!("  -> {} now has {} cubes.", self.city_name(city), self.city(city).cubes));
    }

    /// Name-based entry point for drivers. Unknown names are ignored.
    pub fn infect_city_named(&mut self, name: &str, cubes: u8, source: InfectionSource) {
        match self.map.lookup(name) {
            Ok(city) => self.infect_city(city, cubes, source),
            Err(err) => tracing::warn!(%err, "infection skipped"),
        }
    }

    fn outbreak_chain(&mut self, origin: CityId) {
        let mut visited: HashSet<CityId> = HashSet::new();
        let mut stack: Vec<(CityId, usize)> = Vec::new();
        if !self.begin_outbreak(origin, &mut visited) {
            return;
        }
        stack.push((origin, 0));

        while let Some((city, cursor)) = stack.pop() {
            let Some(&neighbor) = self.map.neighbors(city).get(cursor) else {
                continue;
            };
            // Come back for the remaining neighbours after this one
            stack.push((city, cursor + 1));

            if self.is_eradicated(self.map.color(neighbor)) {
                continue;
            }
            if self.city(neighbor).cubes < MAX_CUBES {
                self.city_mut(neighbor).cubes += 1;
                self.log(format!(
                    "  [OUTBREAK->INFECT] {} receives 1 cube (now {})",
                    self.city_name(neighbor),
                    self.city(neighbor).cubes
                ));
            } else if !visited.contains(&neighbor) {
                self.log(format!("  [OUTBREAK->CHAIN] {} also outbreaks.", self.city_name(neighbor)));
                if !self.begin_outbreak(neighbor, &mut visited) {
                    return;
                }
                stack.push((neighbor, 0));
            }
        }
    }

    /// Count one outbreak at `city`. Returns false once the game is lost.
    fn begin_outbreak(&mut self, city: CityId, visited: &mut HashSet<CityId>) -> bool {
        visited.insert(city);
        self.outbreaks += 1;
        self.log(format!("[OUTBREAK] {} outbreaks! ({}/{OUTBREAK_LIMIT})", self.city_name(city), self.outbreaks));
        if self.outbreaks >= OUTBREAK_LIMIT {
            self.finish(Outcome::Defeat(DefeatReason::OutbreakLimit));
            return false;
        }
        true
    }

    /// Increase, Infect, Intensify.
    pub(crate) fn resolve_epidemic(&mut self) {
        self.log("[EPIDEMIC] An epidemic strikes!");
        if self.infection_rate_index < INFECTION_RATES.len() - 1 {
            self.infection_rate_index += 1;
        }
        self.log(format!("  [EPIDEMIC] Infection rate rises to {}.", self.infection_rate()));

        let card = match self.infection_deck.draw_bottom() {
            Ok(card) => card,
            Err(_) => {
                self.finish(Outcome::Defeat(DefeatReason::InfectionDeckExhaustedOnEpidemic));
                return;
            }
        };
        self.log(format!("  [EPIDEMIC] Bottom card: {} takes 3 cubes.", self.city_name(card)));
        self.infect_city(card, MAX_CUBES, InfectionSource::Epidemic);
        self.infection_deck.discard(card);
        if self.is_game_over() {
            return;
        }
        self.infection_deck.shuffle_discard_onto_top(&mut self.rng);
    }

    /// Draw `rate` infection cards and place one cube for each, unless One
    /// Quiet Night is pending. The flag is cleared either way.
    pub(crate) fn run_infection_phase(&mut self) {
        if self.is_game_over() {
            return;
        }
        let skip = std::mem::take(&mut self.skip_next_infection);
        if skip {
            self.log("[EVENT] Infection phase skipped (One Quiet Night).");
            return;
        }

        let rate = self.infection_rate();
        self.log(format!("--- Infection phase (drawing {rate} cards) ---"));
        for _ in 0..rate {
            let card = match self.infection_deck.draw_top() {
                Ok(card) => card,
                Err(_) => {
                    self.finish(Outcome::Defeat(DefeatReason::InfectionDeckExhausted));
                    return;
                }
            };
            self.infect_city(card, 1, InfectionSource::InfectionPhase);
            self.infection_deck.discard(card);
            if self.is_game_over() {
                return;
            }
        }
    }

    /// Draw one player card for `player`. Epidemics are resolved and
    /// discarded; everything else goes to the hand. Returns the card drawn,
    /// or None if the deck ran out and the game is lost.
    pub(crate) fn draw_player_card(&mut self, player: usize) -> Option<PlayerCard> {
        let card = match self.player_deck.draw() {
            Ok(card) => card,
            Err(_) => {
                self.finish(Outcome::Defeat(DefeatReason::PlayerDeckExhausted));
                return None;
            }
        };
        match card {
            PlayerCard::Epidemic => {
                self.player_deck.discard(card);
                self.resolve_epidemic();
            }
            _ => {
                let line = format!("[DRAW] {} drew {}.", self.players[player].name, self.card_name(card));
                self.log(line);
                self.players[player].hand.push(card);
            }
        }
        Some(card)
    }
}
