// ═══════════════════════════════════════════════════════════════════════
// Actions — the eight standard actions, skip, and free event plays
//
// Every action checks all of its preconditions before it mutates anything,
// so a refused action leaves the state exactly as it was.
// ═══════════════════════════════════════════════════════════════════════

use crate::cards::{EventPlay, PlayerCard};
use crate::error::ActionError;
use crate::types::*;

/// One entry in a planned turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Drive or ferry to an adjacent city.
    Move(CityId),
    /// Discard the destination's card to fly there.
    DirectFlight(CityId),
    /// Discard the current city's card to fly anywhere.
    CharterFlight(CityId),
    /// Fly between two research stations.
    Shuttle(CityId),
    BuildStation,
    /// Remove one cube, or every cube once the color is cured.
    Treat,
    DiscoverCure,
    /// Hand the card of the shared city from `giver` to `receiver`.
    ShareKnowledge { giver: usize, receiver: usize },
    Skip,
    /// Free: does not use the action budget.
    Event(EventPlay),
}

impl Action {
    pub fn is_free(&self) -> bool {
        matches!(self, Action::Event(_))
    }
}

impl GameState {
    fn ensure_city(&self, city: CityId) -> Result<(), ActionError> {
        if self.map.contains(city) {
            Ok(())
        } else {
            Err(ActionError::UnknownCity(city))
        }
    }

    fn ensure_player(&self, player: usize) -> Result<(), ActionError> {
        if player < self.players.len() {
            Ok(())
        } else {
            Err(ActionError::UnknownPlayer(player))
        }
    }

    fn ensure_holds(&self, player: usize, card: PlayerCard) -> Result<(), ActionError> {
        if self.players[player].holds(card) {
            Ok(())
        } else {
            Err(ActionError::MissingCard(card))
        }
    }

    fn spend_card(&mut self, player: usize, card: PlayerCard) {
        if self.players[player].take(card) {
            self.player_deck.discard(card);
        }
    }

    fn relocate(&mut self, player: usize, to: CityId, how: &str) {
        let from = self.players[player].location;
        self.players[player].location = to;
        self.log(format!(
            "[ACTION] {} {how} from {} to {}.",
            self.players[player].name,
            self.city_name(from),
            self.city_name(to)
        ));
    }

    /// Resolve one standard action for `player`. Does not touch the budget.
    pub(crate) fn perform_action(&mut self, player: usize, action: &Action) -> Result<(), ActionError> {
        self.ensure_player(player)?;
        let here = self.players[player].location;

        match *action {
            Action::Move(to) => {
                self.ensure_city(to)?;
                if !self.map.are_adjacent(here, to) {
                    return Err(ActionError::NotAdjacent { from: here, to });
                }
                self.relocate(player, to, "moved");
            }

            Action::DirectFlight(to) => {
                self.ensure_city(to)?;
                if to == here {
                    return Err(ActionError::AlreadyThere(to));
                }
                self.ensure_holds(player, PlayerCard::City(to))?;
                self.spend_card(player, PlayerCard::City(to));
                self.relocate(player, to, "took a direct flight");
            }

            Action::CharterFlight(to) => {
                self.ensure_city(to)?;
                if to == here {
                    return Err(ActionError::AlreadyThere(to));
                }
                self.ensure_holds(player, PlayerCard::City(here))?;
                self.spend_card(player, PlayerCard::City(here));
                self.relocate(player, to, "took a charter flight");
            }

            Action::Shuttle(to) => {
                self.ensure_city(to)?;
                if to == here {
                    return Err(ActionError::AlreadyThere(to));
                }
                if !self.has_station(here) {
                    return Err(ActionError::NoStation(here));
                }
                if !self.has_station(to) {
                    return Err(ActionError::NoStation(to));
                }
                self.relocate(player, to, "took a shuttle flight");
            }

            Action::BuildStation => {
                if self.has_station(here) {
                    return Err(ActionError::StationExists(here));
                }
                if self.stations.len() >= MAX_STATIONS {
                    return Err(ActionError::StationLimit);
                }
                self.ensure_holds(player, PlayerCard::City(here))?;
                self.spend_card(player, PlayerCard::City(here));
                self.stations.push(here);
                self.log(format!(
                    "[ACTION] {} built a research station in {}.",
                    self.players[player].name,
                    self.city_name(here)
                ));
            }

            Action::Treat => {
                let cubes = self.city(here).cubes;
                if cubes == 0 {
                    return Err(ActionError::NothingToTreat(here));
                }
                let color = self.map.color(here);
                let removed = if self.is_cured(color) { cubes } else { 1 };
                self.city_mut(here).cubes -= removed;
                self.log(format!(
                    "[ACTION] {} treated {}, removing {removed} cube(s).",
                    self.players[player].name,
                    self.city_name(here)
                ));
                self.check_eradication(color);
            }

            Action::DiscoverCure => {
                self.discover_cure(player)?;
                self.check_victory();
            }

            Action::ShareKnowledge { giver, receiver } => {
                self.ensure_player(giver)?;
                self.ensure_player(receiver)?;
                if giver == receiver {
                    return Err(ActionError::SamePlayer);
                }
                if giver != player && receiver != player {
                    return Err(ActionError::NotActingPlayer);
                }
                let city = self.players[giver].location;
                if self.players[receiver].location != city {
                    return Err(ActionError::NotColocated);
                }
                let card = PlayerCard::City(city);
                self.ensure_holds(giver, card)?;
                self.players[giver].take(card);
                self.players[receiver].hand.push(card);
                self.log(format!(
                    "[ACTION] {} gave {} to {}.",
                    self.players[giver].name,
                    self.city_name(city),
                    self.players[receiver].name
                ));
            }

            Action::Skip => {
                self.log(format!("[ACTION] {} skips an action.", self.players[player].name));
            }

            Action::Event(ref play) => self.play_event(player, play)?,
        }
        Ok(())
    }

    /// Play an event card from `player`'s hand. Events are free and can be
    /// played in any phase while the game is running.
    pub fn play_event(&mut self, player: usize, play: &EventPlay) -> Result<(), ActionError> {
        if self.is_game_over() {
            return Err(ActionError::GameOver);
        }
        self.ensure_player(player)?;
        let card = play.card();
        self.ensure_holds(player, card)?;

        // Each branch validates before mutating
        let effect = match play {
            EventPlay::OneQuietNight => {
                self.skip_next_infection = true;
                "the next infection phase will be skipped".to_string()
            }
            EventPlay::ResilientPopulation { card: target } => {
                self.ensure_city(*target)?;
                if !self.infection_deck.remove_from_discard(*target) {
                    return Err(ActionError::NotInDiscard(*target));
                }
                format!("{} is removed from the game", self.city_name(*target))
            }
            EventPlay::GovernmentGrant { city } => {
                self.ensure_city(*city)?;
                if self.has_station(*city) {
                    return Err(ActionError::StationExists(*city));
                }
                if self.stations.len() >= MAX_STATIONS {
                    return Err(ActionError::StationLimit);
                }
                self.stations.push(*city);
                format!("research station built in {}", self.city_name(*city))
            }
            EventPlay::Airlift { player: target, city } => {
                self.ensure_player(*target)?;
                self.ensure_city(*city)?;
                self.players[*target].location = *city;
                format!("{} is flown to {}", self.players[*target].name, self.city_name(*city))
            }
            EventPlay::Forecast { order } => {
                if order.is_empty() || order.len() > FORECAST_DEPTH {
                    return Err(ActionError::InvalidForecast);
                }
                self.infection_deck.modify_top(order).map_err(|_| ActionError::InvalidForecast)?;
                "the top of the infection deck is rearranged".to_string()
            }
        };

        self.spend_card(player, card);
        self.log(format!("[EVENT] {} played {}: {effect}.", self.players[player].name, play.kind()));
        Ok(())
    }
}
