// ═══════════════════════════════════════════════════════════════════════
// Core types — colors, ids, players, and the GameState aggregate
// ═══════════════════════════════════════════════════════════════════════

use crate::cards::PlayerCard;
use crate::deck::{InfectionDeck, PlayerDeck};
use crate::journal::Journal;
use crate::map::WorldMap;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// ── Rule constants ─────────────────────────────────────────────────────

/// Cubes a city can hold before the next one causes an outbreak.
pub const MAX_CUBES: u8 = 3;
/// Reaching this many outbreaks loses the game.
pub const OUTBREAK_LIMIT: u8 = 8;
/// Infection cards drawn per infection phase, indexed by epidemics so far.
pub const INFECTION_RATES: [u8; 7] = [2, 2, 2, 3, 3, 4, 4];
pub const MAX_STATIONS: usize = 6;
pub const HAND_LIMIT: usize = 7;
pub const ACTIONS_PER_TURN: u8 = 4;
/// Same-colored city cards spent to discover a cure.
pub const CURE_CARDS: usize = 5;
/// Deepest the Forecast event may look into the infection deck.
pub const FORECAST_DEPTH: usize = 6;

// ── Enums ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Color {
    Blue,
    Yellow,
    Black,
    Red,
}

impl Color {
    /// Iteration order used everywhere a color is picked (cure discovery).
    pub const ALL: [Color; 4] = [Color::Blue, Color::Yellow, Color::Black, Color::Red];

    pub fn index(self) -> usize {
        match self {
            Color::Blue => 0,
            Color::Yellow => 1,
            Color::Black => 2,
            Color::Red => 3,
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Color::Blue => write!(f, "Blue"),
            Color::Yellow => write!(f, "Yellow"),
            Color::Black => write!(f, "Black"),
            Color::Red => write!(f, "Red"),
        }
    }
}

/// Where the current player is inside their turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnPhase {
    Actions,
    Draw,
    /// Hand is over the limit; the driver must discard before infection.
    Discard,
    Infection,
}

impl std::fmt::Display for TurnPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TurnPhase::Actions => write!(f, "actions"),
            TurnPhase::Draw => write!(f, "draw"),
            TurnPhase::Discard => write!(f, "discard"),
            TurnPhase::Infection => write!(f, "infection"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DefeatReason {
    OutbreakLimit,
    InfectionDeckExhausted,
    InfectionDeckExhaustedOnEpidemic,
    PlayerDeckExhausted,
    PlayerDeckExhaustedOnDeal,
}

impl std::fmt::Display for DefeatReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            DefeatReason::OutbreakLimit => "outbreak limit reached",
            DefeatReason::InfectionDeckExhausted => "infection deck exhausted",
            DefeatReason::InfectionDeckExhaustedOnEpidemic => "infection deck exhausted on epidemic",
            DefeatReason::PlayerDeckExhausted => "player deck exhausted",
            DefeatReason::PlayerDeckExhaustedOnDeal => "player deck exhausted during initial deal",
        };
        f.write_str(text)
    }
}

/// Terminal result. Once set it never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Victory,
    Defeat(DefeatReason),
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Victory => write!(f, "all four cures discovered"),
            Outcome::Defeat(reason) => write!(f, "{reason}"),
        }
    }
}

// ── City ID ────────────────────────────────────────────────────────────
// Compact, copyable city identifier. Index into the WorldMap city table.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct CityId(pub u8);

impl CityId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Bare id for messages that have no map at hand; `GameState::city_name`
/// gives the real name.
impl std::fmt::Display for CityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "city #{}", self.0)
    }
}

// ── Per-city dynamic state ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityState {
    /// Disease cubes of the city's own color, 0..=MAX_CUBES.
    pub cubes: u8,
}

// ── Player ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub location: CityId,
    pub hand: Vec<PlayerCard>,
}

impl Player {
    pub fn new(name: impl Into<String>, location: CityId) -> Self {
        Player { name: name.into(), location, hand: Vec::new() }
    }

    pub fn holds(&self, card: PlayerCard) -> bool {
        self.hand.contains(&card)
    }

    /// Removes the first copy of `card`, returning whether it was held.
    pub fn take(&mut self, card: PlayerCard) -> bool {
        match self.hand.iter().position(|&c| c == card) {
            Some(pos) => {
                self.hand.remove(pos);
                true
            }
            None => false,
        }
    }
}

// ── Game State ─────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct GameState {
    /// Static graph, shared between a state and its validation clones.
    pub map: Arc<WorldMap>,
    /// Dynamic state per city, indexed by CityId.
    pub cities: Vec<CityState>,
    pub players: Vec<Player>,
    pub current_player: usize,
    pub turn: u32,
    pub phase: TurnPhase,
    pub actions_remaining: u8,

    pub outbreaks: u8,
    pub infection_rate_index: usize,
    /// Indexed by `Color::index()`.
    pub cures: [bool; 4],
    pub eradicated: [bool; 4],
    pub stations: Vec<CityId>,
    pub skip_next_infection: bool,

    pub infection_deck: InfectionDeck,
    pub player_deck: PlayerDeck,

    pub outcome: Option<Outcome>,
    pub journal: Journal,

    // Deterministic RNG
    pub seed: u64,
    pub rng: ChaCha8Rng,
}

impl GameState {
    pub fn city(&self, id: CityId) -> &CityState {
        &self.cities[id.index()]
    }

    pub fn city_mut(&mut self, id: CityId) -> &mut CityState {
        &mut self.cities[id.index()]
    }

    /// Player whose turn it is.
    pub fn active_player(&self) -> &Player {
        &self.players[self.current_player]
    }

    pub fn infection_rate(&self) -> u8 {
        INFECTION_RATES[self.infection_rate_index]
    }

    pub fn is_cured(&self, color: Color) -> bool {
        self.cures[color.index()]
    }

    pub fn is_eradicated(&self, color: Color) -> bool {
        self.eradicated[color.index()]
    }

    pub fn has_station(&self, city: CityId) -> bool {
        self.stations.contains(&city)
    }

    pub fn is_game_over(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn game_over_reason(&self) -> Option<String> {
        self.outcome.map(|o| o.to_string())
    }

    pub fn city_name(&self, id: CityId) -> &str {
        self.map.name(id)
    }

    /// Human-readable card token, resolving city cards through the map.
    pub fn card_name(&self, card: PlayerCard) -> String {
        match card {
            PlayerCard::City(id) => self.map.name(id).to_string(),
            PlayerCard::Event(kind) => kind.name().to_string(),
            PlayerCard::Epidemic => "EPIDEMIC".to_string(),
        }
    }

    /// Color of a city card, or None for events and epidemics.
    pub fn card_color(&self, card: PlayerCard) -> Option<Color> {
        match card {
            PlayerCard::City(id) => Some(self.map.color(id)),
            _ => None,
        }
    }

    /// Total cubes currently on cities of `color`.
    pub fn cubes_of(&self, color: Color) -> u32 {
        self.map
            .cities_of(color)
            .map(|id| self.city(id).cubes as u32)
            .sum()
    }

    pub(crate) fn log(&mut self, entry: impl Into<String>) {
        self.journal.push(entry);
    }

    /// Freeze the game. A second call keeps the first outcome.
    pub(crate) fn finish(&mut self, outcome: Outcome) {
        if self.outcome.is_some() {
            return;
        }
        self.outcome = Some(outcome);
        match outcome {
            Outcome::Victory => self.log("[VICTORY] All four cures discovered. You win!"),
            Outcome::Defeat(reason) => self.log(format!("[DEFEAT] {reason}")),
        }
    }
}
