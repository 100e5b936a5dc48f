// ═══════════════════════════════════════════════════════════════════════
// Whole-game test suite for the Pandemic engine
// ═══════════════════════════════════════════════════════════════════════

use crate::actions::Action;
use crate::cards::*;
use crate::error::ActionError;
use crate::infection::InfectionSource;
use crate::map::*;
use crate::setup::{assemble, new_game, GameConfig};
use crate::types::*;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const PLAYER_CARDS: usize = 48 + 5 + 4;

// ── Helpers ──────────────────────────────────────────────────────────────

/// A ring of `n` red cities named C0..Cn, each at three cubes.
fn loaded_ring(n: usize) -> GameState {
    let names: Vec<String> = (0..n).map(|i| format!("C{i}")).collect();
    let cities: Vec<(&str, Color)> = names.iter().map(|s| (s.as_str(), Color::Red)).collect();
    let edges: Vec<(&str, &str)> = (0..n).map(|i| (names[i].as_str(), names[(i + 1) % n].as_str())).collect();
    let map = WorldMap::from_parts(&cities, &edges).unwrap();
    let config = GameConfig::new().with_start_city("C0").with_events(0).with_epidemics(1);
    let mut state = assemble(map, &config, 2, 0).unwrap();
    for city in state.cities.iter_mut() {
        city.cubes = MAX_CUBES;
    }
    state
}

/// Move epidemics out of the top `n` player cards.
fn calm_top(state: &mut GameState, n: usize) {
    let epidemics: Vec<usize> = (0..n).filter(|&i| state.player_deck.draw_pile[i].is_epidemic()).collect();
    for &i in epidemics.iter().rev() {
        state.player_deck.draw_pile.remove(i);
        state.player_deck.draw_pile.push_back(PlayerCard::Epidemic);
    }
}

/// Up to four random actions for the current player. Many will be refused.
fn random_plan(state: &GameState, rng: &mut ChaCha8Rng) -> Vec<Action> {
    let player = state.active_player();
    let cities: Vec<CityId> = player.hand.iter().filter_map(|c| c.city()).collect();
    let mut here = player.location;
    let mut plan = Vec::new();
    for _ in 0..4 {
        let action = match rng.gen_range(0..6) {
            0 | 1 => match state.map.neighbors(here).choose(rng) {
                Some(&to) => {
                    here = to;
                    Action::Move(to)
                }
                None => Action::Skip,
            },
            2 => Action::Treat,
            3 => match cities.choose(rng) {
                Some(&to) => {
                    here = to;
                    Action::DirectFlight(to)
                }
                None => Action::Skip,
            },
            4 => Action::DiscoverCure,
            _ => Action::BuildStation,
        };
        plan.push(action);
    }
    plan
}

fn assert_invariants(state: &GameState) {
    assert!(state.cities.iter().all(|c| c.cubes <= MAX_CUBES));
    assert!(state.outbreaks <= OUTBREAK_LIMIT);
    assert_eq!(state.infection_deck.total(), state.map.len());
    let in_hands: usize = state.players.iter().map(|p| p.hand.len()).sum();
    assert_eq!(state.player_deck.remaining() + state.player_deck.discard_pile.len() + in_hands, PLAYER_CARDS);
    for color in Color::ALL {
        if state.is_eradicated(color) {
            assert!(state.is_cured(color));
            assert_eq!(state.cubes_of(color), 0);
        }
    }
    assert!(state.stations.len() <= MAX_STATIONS);
}

/// One full turn of random play, checking that validation predicts execution.
fn play_random_turn(state: &mut GameState, rng: &mut ChaCha8Rng) {
    let plan = random_plan(state, rng);
    let predicted = state.validate_turn_plan(state.current_player, &plan);
    let report = state.execute_turn_actions(&plan).unwrap();
    assert_eq!(predicted, report.is_clean(), "plan {plan:?}");
    if state.is_game_over() {
        return;
    }

    state.draw_phase_cards().unwrap();
    while !state.is_game_over() && state.phase == TurnPhase::Discard {
        let oldest = state.active_player().hand[0];
        state.discard_card(oldest).unwrap();
    }
    if state.is_game_over() {
        return;
    }
    state.end_turn_sequence().unwrap();
}

fn play_random_game(seed: u64, players: usize) -> GameState {
    let mut state = new_game(players, seed).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_mul(999_961));
    let mut eradicated = state.eradicated;
    for _ in 0..200 {
        if state.is_game_over() {
            break;
        }
        play_random_turn(&mut state, &mut rng);
        assert_invariants(&state);
        for (before, now) in eradicated.iter().zip(state.eradicated) {
            assert!(!before || now, "eradication was undone");
        }
        eradicated = state.eradicated;
    }
    state
}

// ── Outbreaks ────────────────────────────────────────────────────────────

#[test]
fn test_ring_outbreaks_each_city_once() {
    let mut state = loaded_ring(4);
    state.infect_city(CityId(0), 1, InfectionSource::Manual);
    assert_eq!(state.outbreaks, 4);
    assert!(state.cities.iter().all(|c| c.cubes == MAX_CUBES));
    assert!(!state.is_game_over());
}

#[test]
fn test_outbreak_limit_stops_the_chain() {
    let mut state = loaded_ring(10);
    state.outbreaks = 5;
    state.infect_city(CityId(0), 1, InfectionSource::Manual);
    assert_eq!(state.outbreaks, OUTBREAK_LIMIT);
    assert_eq!(state.outcome, Some(Outcome::Defeat(DefeatReason::OutbreakLimit)));
    assert_eq!(state.game_over_reason().as_deref(), Some("outbreak limit reached"));

    // Frozen: further infections change nothing
    let before = state.cities.clone();
    state.infect_city(CityId(5), 3, InfectionSource::Manual);
    assert_eq!(state.cities, before);
    assert_eq!(state.outbreaks, OUTBREAK_LIMIT);
}

#[test]
fn test_chain_skips_cities_below_three() {
    let mut state = loaded_ring(4);
    state.city_mut(CityId(2)).cubes = 1;
    state.infect_city(CityId(0), 1, InfectionSource::Manual);
    // C0, C1 and C3 outbreak; C2 takes one cube from each side
    assert_eq!(state.outbreaks, 3);
    assert_eq!(state.city(CityId(2)).cubes, 3);
}

// ── Scenarios ────────────────────────────────────────────────────────────

#[test]
fn test_skip_turn_on_seed_42() {
    let mut state = new_game(2, 42).unwrap();
    let next_infections = state.infection_deck.peek_top(2);
    let cubes_before: Vec<u8> = next_infections.iter().map(|&c| state.city(c).cubes).collect();
    let hand_before = state.players[0].hand.len();
    assert_eq!(state.infection_deck.discard_pile.len(), 6);

    let report = state.execute_turn_actions(&vec![Action::Skip; 4]).unwrap();
    assert!(report.is_clean());
    assert_eq!(state.actions_remaining, 0);

    let drawn = state.draw_phase_cards().unwrap();
    assert_eq!(drawn.len(), 2);
    assert_eq!(state.infection_rate_index, 0);
    assert_eq!(state.players[0].hand.len(), hand_before + 2);
    assert_eq!(state.phase, TurnPhase::Infection);
    state.end_turn_sequence().unwrap();

    assert!(!state.is_game_over());
    assert_eq!(state.turn, 2);
    assert_eq!(state.current_player, 1);
    assert_eq!(state.outbreaks, 0);
    assert_eq!(state.infection_deck.discard_pile.len(), 8);
    assert_eq!(state.infection_deck.draw_pile.len(), 40);
    for (city, before) in next_infections.into_iter().zip(cubes_before) {
        assert_eq!(state.city(city).cubes, before + 1, "{}", state.city_name(city));
        assert!(state.infection_deck.discard_pile.contains(&city));
    }
    assert!(state.journal.entries().any(|e| e == "--- Turn 2: Player 2 ---"));
}

#[test]
fn test_blue_cure_at_atlanta() {
    let mut state = new_game(2, 1).unwrap();
    let blues = [CHICAGO, MONTREAL, NEW_YORK, WASHINGTON, LONDON];
    state.players[0].hand = blues.iter().map(|&c| PlayerCard::City(c)).collect();

    let report = state.execute_turn_actions(&[Action::DiscoverCure]).unwrap();
    assert!(report.is_clean());
    assert!(state.is_cured(Color::Blue));
    assert!(state.players[0].hand.is_empty());
    let spent: Vec<PlayerCard> = blues.iter().map(|&c| PlayerCard::City(c)).collect();
    assert_eq!(state.player_deck.discard_pile, spent);
    assert!(state.journal.entries().any(|e| e.starts_with("[CURE]")));
    assert_eq!(
        state.execute_turn_actions(&[Action::DiscoverCure]).unwrap().failures,
        vec![(0, ActionError::CureUnavailable)]
    );
}

#[test]
fn test_last_cure_wins_and_halts_the_plan() {
    let mut state = new_game(2, 2).unwrap();
    state.cures = [true, true, true, false];
    let reds = [TOKYO, OSAKA, SEOUL, BEIJING, SYDNEY];
    state.players[0].hand = reds.iter().map(|&c| PlayerCard::City(c)).collect();

    let report = state.execute_turn_actions(&[Action::DiscoverCure, Action::Skip]).unwrap();
    assert_eq!(report.performed, vec![0]);
    assert!(report.halted);
    assert_eq!(state.outcome, Some(Outcome::Victory));
    assert_eq!(state.journal.tail(1), vec!["[VICTORY] All four cures discovered. You win!"]);
    assert_eq!(state.draw_phase_cards(), Err(ActionError::GameOver));
}

#[test]
fn test_treating_last_cube_of_cured_color_eradicates() {
    let mut state = new_game(2, 3).unwrap();
    for id in state.map.ids().collect::<Vec<_>>() {
        state.city_mut(id).cubes = 0;
    }
    state.city_mut(ATLANTA).cubes = 2;
    state.cures[Color::Blue.index()] = true;

    state.execute_turn_actions(&[Action::Treat]).unwrap();
    assert!(state.is_eradicated(Color::Blue));

    // Eradicated colors take no more cubes
    state.infect_city(CHICAGO, 2, InfectionSource::Manual);
    assert_eq!(state.city(CHICAGO).cubes, 0);
}

#[test]
fn test_epidemic_draw_raises_rate_and_infects_bottom_card() {
    let mut state = new_game(2, 4).unwrap();
    calm_top(&mut state, 2);
    state.player_deck.draw_pile.push_front(PlayerCard::Epidemic);
    let bottom = *state.infection_deck.draw_pile.back().unwrap();
    // Undrawn infection cards name clean cities
    assert_eq!(state.city(bottom).cubes, 0);

    let drawn = state.draw_phase_cards().unwrap();
    assert_eq!(drawn.len(), 1);
    assert_eq!(state.infection_rate_index, 1);
    assert!(state.journal.entries().any(|e| e.starts_with("[EPIDEMIC]")));
    // Intensify put the bottom card back on top
    assert!(state.infection_deck.peek_top(7).contains(&bottom));
    assert!(state.infection_deck.discard_pile.is_empty());
    assert_eq!(state.city(bottom).cubes, MAX_CUBES);
    assert_eq!(state.outbreaks, 0);
}

// ── Whole games ──────────────────────────────────────────────────────────

#[test]
fn test_random_games_terminate_and_keep_invariants() {
    for seed in 0..12 {
        for players in 2..=4 {
            let state = play_random_game(seed, players);
            assert!(state.is_game_over(), "seed {seed} with {players} players never ended");
            assert!(state.journal.len() <= state.journal.capacity());
        }
    }
}

#[test]
fn test_deterministic_replay() {
    let a = play_random_game(77, 3);
    let b = play_random_game(77, 3);
    assert_eq!(a.outcome, b.outcome);
    assert_eq!(a.turn, b.turn);
    assert_eq!(a.cities, b.cities);
    assert_eq!(a.journal.entries().collect::<Vec<_>>(), b.journal.entries().collect::<Vec<_>>());
}

#[test]
fn test_different_seeds_differ() {
    let boards: Vec<Vec<CityState>> = (0..5).map(|s| new_game(2, s).unwrap().cities).collect();
    assert!(boards.windows(2).any(|w| w[0] != w[1]));
}

#[test]
fn test_one_quiet_night_from_the_plan() {
    let mut state = new_game(2, 9).unwrap();
    calm_top(&mut state, 2);
    state.players[0].hand.push(PlayerCard::Event(EventKind::OneQuietNight));
    let plan = vec![Action::Event(EventPlay::OneQuietNight), Action::Skip, Action::Skip, Action::Skip, Action::Skip];
    assert!(state.validate_turn_plan(0, &plan));
    assert!(state.execute_turn_actions(&plan).unwrap().is_clean());

    state.draw_phase_cards().unwrap();
    state.end_turn_sequence().unwrap();
    assert_eq!(state.infection_deck.discard_pile.len(), 6);
    assert!(!state.skip_next_infection);
}
