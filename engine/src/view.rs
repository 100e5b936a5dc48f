// ═══════════════════════════════════════════════════════════════════════
// Board View — read-only snapshot for renderers and drivers
//
// Everything on the table is public in a cooperative game:
//   • cubes per city, research stations, player locations and hands
//   • outbreak counter, infection rate, cures and eradications
//   • the infection discard pile and the size of every pile
//
// Only the order of the draw piles stays hidden, so the view carries
// their sizes but never their contents.
// ═══════════════════════════════════════════════════════════════════════

use crate::types::*;
use serde::{Deserialize, Serialize};

/// Journal entries included in a view.
pub const VIEW_LOG_LINES: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityView {
    pub name: String,
    pub color: Color,
    pub cubes: u8,
    pub station: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    pub name: String,
    pub location: String,
    pub hand: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardView {
    /// Seed the game was set up from; replaying it reproduces the board.
    pub seed: u64,
    pub turn: u32,
    pub current_player: usize,
    pub phase: TurnPhase,
    pub actions_remaining: u8,
    pub cities: Vec<CityView>,
    pub players: Vec<PlayerView>,
    pub outbreaks: u8,
    pub infection_rate: u8,
    pub cured: Vec<Color>,
    pub eradicated: Vec<Color>,
    pub stations: Vec<String>,
    pub infection_discard: Vec<String>,
    pub infection_deck_size: usize,
    pub player_deck_size: usize,
    pub game_over: bool,
    pub reason: Option<String>,
    pub log: Vec<String>,
}

impl BoardView {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Snapshot `state` for display.
pub fn board_view(state: &GameState) -> BoardView {
    let cities = state
        .map
        .ids()
        .map(|id| CityView {
            name: state.city_name(id).to_string(),
            color: state.map.color(id),
            cubes: state.city(id).cubes,
            station: state.has_station(id),
        })
        .collect();

    let players = state
        .players
        .iter()
        .map(|p| PlayerView {
            name: p.name.clone(),
            location: state.city_name(p.location).to_string(),
            hand: p.hand.iter().map(|&c| state.card_name(c)).collect(),
        })
        .collect();

    BoardView {
        seed: state.seed,
        turn: state.turn,
        current_player: state.current_player,
        phase: state.phase,
        actions_remaining: state.actions_remaining,
        cities,
        players,
        outbreaks: state.outbreaks,
        infection_rate: state.infection_rate(),
        cured: Color::ALL.into_iter().filter(|&c| state.is_cured(c)).collect(),
        eradicated: Color::ALL.into_iter().filter(|&c| state.is_eradicated(c)).collect(),
        stations: state.stations.iter().map(|&s| state.city_name(s).to_string()).collect(),
        infection_discard: state.infection_deck.discard_pile.iter().map(|&c| state.city_name(c).to_string()).collect(),
        infection_deck_size: state.infection_deck.draw_pile.len(),
        player_deck_size: state.player_deck.remaining(),
        game_over: state.is_game_over(),
        reason: state.game_over_reason(),
        log: state.journal.tail(VIEW_LOG_LINES).into_iter().map(str::to_string).collect(),
    }
}
