// ═══════════════════════════════════════════════════════════════════════
// Game setup — creates the initial GameState for 2-4 players
// ═══════════════════════════════════════════════════════════════════════

use crate::cards::PlayerCard;
use crate::deck::{InfectionDeck, PlayerDeck};
use crate::error::SetupError;
use crate::infection::InfectionSource;
use crate::journal::{Journal, DEFAULT_LOG_CAPACITY};
use crate::map::WorldMap;
use crate::types::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;

/// Cubes placed by the six setup infection cards, in draw order.
const SETUP_INFECTIONS: [u8; 6] = [3, 2, 1, 1, 1, 1];

// ── Config ─────────────────────────────────────────────────────────────

/// Knobs for a new game. Defaults match the standard board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub epidemics: usize,
    pub events: usize,
    /// Name of the city every player starts in; it gets the first station.
    pub start_city: String,
    pub log_capacity: usize,
}

impl GameConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_epidemics(mut self, epidemics: usize) -> Self {
        self.epidemics = epidemics;
        self
    }

    pub fn with_events(mut self, events: usize) -> Self {
        self.events = events;
        self
    }

    pub fn with_start_city(mut self, city: impl Into<String>) -> Self {
        self.start_city = city.into();
        self
    }

    pub fn with_log_capacity(mut self, capacity: usize) -> Self {
        self.log_capacity = capacity;
        self
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self { epidemics: 4, events: 5, start_city: "Atlanta".to_string(), log_capacity: DEFAULT_LOG_CAPACITY }
    }
}

/// Cards dealt to each player before the first turn.
pub fn starting_hand_size(num_players: usize) -> usize {
    match num_players {
        2 => 4,
        3 => 3,
        _ => 2,
    }
}

// ── Entry points ───────────────────────────────────────────────────────

/// Standard board with default settings.
pub fn new_game(num_players: usize, seed: u64) -> Result<GameState, SetupError> {
    new_game_with(&GameConfig::default(), num_players, seed)
}

pub fn new_game_with(config: &GameConfig, num_players: usize, seed: u64) -> Result<GameState, SetupError> {
    new_game_on(WorldMap::standard(), config, num_players, seed)
}

/// Full setup on any map: decks, players, six initial infections and the
/// opening deal. Running out of player cards during the deal returns a game
/// already lost rather than an error.
pub fn new_game_on(map: WorldMap, config: &GameConfig, num_players: usize, seed: u64) -> Result<GameState, SetupError> {
    if map.len() < SETUP_INFECTIONS.len() {
        return Err(SetupError::MapTooSmall("initial infections need at least six cities"));
    }
    let mut state = assemble(map, config, num_players, seed)?;
    seed_board(&mut state);
    if !state.is_game_over() {
        state.log(format!("--- Turn 1: {} ---", state.players[0].name));
    }
    tracing::info!(seed, players = num_players, epidemics = config.epidemics, "new game");
    Ok(state)
}

/// Decks, players and the first station, with no cubes or hands yet.
pub(crate) fn assemble(map: WorldMap, config: &GameConfig, num_players: usize, seed: u64) -> Result<GameState, SetupError> {
    if !(2..=4).contains(&num_players) {
        return Err(SetupError::InvalidPlayerCount(num_players));
    }
    if config.epidemics == 0 {
        return Err(SetupError::NoEpidemics);
    }
    let start = map.lookup(&config.start_city)?;

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let infection_deck = InfectionDeck::new(map.ids(), &mut rng);
    let player_deck = PlayerDeck::build(map.ids(), config.events, config.epidemics, &mut rng);

    let players = (1..=num_players).map(|i| Player::new(format!("Player {i}"), start)).collect();

    Ok(GameState {
        cities: vec![CityState::default(); map.len()],
        map: Arc::new(map),
        players,
        current_player: 0,
        turn: 1,
        phase: TurnPhase::Actions,
        actions_remaining: ACTIONS_PER_TURN,
        outbreaks: 0,
        infection_rate_index: 0,
        cures: [false; 4],
        eradicated: [false; 4],
        stations: vec![start],
        skip_next_infection: false,
        infection_deck,
        player_deck,
        outcome: None,
        journal: Journal::new(config.log_capacity),
        seed,
        rng,
    })
}

fn seed_board(state: &mut GameState) {
    state.log(format!("[SETUP] Research station built in {}.", state.city_name(state.stations[0])));

    for cubes in SETUP_INFECTIONS {
        match state.infection_deck.draw_top() {
            Ok(card) => {
                state.infect_city(card, cubes, InfectionSource::Setup);
                state.infection_deck.discard(card);
            }
            Err(_) => {
                state.finish(Outcome::Defeat(DefeatReason::InfectionDeckExhausted));
                return;
            }
        }
    }

    deal_hands(state);
}

/// Deal starting hands. Epidemics met during the deal are set aside and
/// shuffled back into what remains of the pile they came from.
fn deal_hands(state: &mut GameState) {
    let per_player = starting_hand_size(state.players.len());
    let mut set_aside: Vec<usize> = Vec::new();
    let mut drawn = 0;

    for player in 0..state.players.len() {
        let mut dealt = 0;
        while dealt < per_player {
            let Ok(card) = state.player_deck.draw() else {
                state.finish(Outcome::Defeat(DefeatReason::PlayerDeckExhaustedOnDeal));
                return;
            };
            drawn += 1;
            if card.is_epidemic() {
                set_aside.push(drawn - 1);
                continue;
            }
            state.players[player].hand.push(card);
            dealt += 1;
        }
        let names: Vec<String> = state.players[player].hand.iter().map(|&c| state.card_name(c)).collect();
        state.log(format!("[DEAL] {} receives {}.", state.players[player].name, names.join(", ")));
    }

    // Later piles first so earlier insert positions stay valid
    for &position in set_aside.iter().rev() {
        let (start, end) = pile_bounds(&state.player_deck.pile_sizes, position);
        let lo = start.saturating_sub(drawn);
        let hi = end.saturating_sub(drawn).max(lo);
        let slot = state.rng.gen_range(lo..=hi);
        state.player_deck.draw_pile.insert(slot, PlayerCard::Epidemic);
    }
}

/// Absolute `[start, end)` range of the pile holding deck position `position`.
fn pile_bounds(pile_sizes: &[usize], position: usize) -> (usize, usize) {
    let mut start = 0;
    for &size in pile_sizes {
        if position < start + size {
            return (start, start + size);
        }
        start += size;
    }
    (start, start)
}
