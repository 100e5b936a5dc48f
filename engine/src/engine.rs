// ═══════════════════════════════════════════════════════════════════════
// Game Engine — turn sequencing and the driver-facing command surface
//
// Architecture:
//   The engine is a pure state machine. It never does I/O and never picks
//   moves. A driver (the runner, a test) submits commands for the current
//   phase and reads the state back between them.
//
// Flow per turn:
//   1. Actions    `execute_turn_actions()` any number of times, four
//                 standard actions in total; events are free
//   2. Draw       `draw_phase_cards()` draws two cards, resolving epidemics
//   3. Discard    `discard_card()` until the hand is back within the limit
//   4. Infection  `end_turn_sequence()` infects, then passes the turn on
//
//   Every command is refused once `state.outcome` is set.
// ═══════════════════════════════════════════════════════════════════════

use crate::actions::Action;
use crate::cards::PlayerCard;
use crate::error::ActionError;
use crate::types::*;

/// Cards drawn during each draw phase.
pub const CARDS_PER_DRAW: usize = 2;

/// What happened to each entry of a submitted plan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionReport {
    /// Indices into the plan of actions that took effect.
    pub performed: Vec<usize>,
    /// Refused actions with their plan index. A refused action changes nothing.
    pub failures: Vec<(usize, ActionError)>,
    /// The game ended part way; later actions were not attempted.
    pub halted: bool,
}

impl ExecutionReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && !self.halted
    }
}

impl GameState {
    fn require_running(&self) -> Result<(), ActionError> {
        if self.is_game_over() {
            Err(ActionError::GameOver)
        } else {
            Ok(())
        }
    }

    fn require_phase(&self, expected: TurnPhase) -> Result<(), ActionError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(ActionError::WrongPhase { expected, actual: self.phase })
        }
    }

    fn set_phase(&mut self, phase: TurnPhase) {
        tracing::debug!(from = %self.phase, to = %phase, turn = self.turn, "phase change");
        self.phase = phase;
    }

    // ── Actions ────────────────────────────────────────────────────────

    /// Run `actions` in order for the current player. A refused action is
    /// recorded and the rest of the plan still runs. Stops early if the
    /// game ends.
    pub fn execute_turn_actions(&mut self, actions: &[Action]) -> Result<ExecutionReport, ActionError> {
        self.require_running()?;
        self.require_phase(TurnPhase::Actions)?;
        let player = self.current_player;

        let mut report = ExecutionReport::default();
        for (i, action) in actions.iter().enumerate() {
            if self.is_game_over() {
                report.halted = true;
                break;
            }
            match self.run_one(player, action) {
                Ok(()) => report.performed.push(i),
                Err(err) => {
                    tracing::debug!(player, index = i, %err, "action refused");
                    let line = format!(
                        "[ACTION] {} could not perform action {}: {}.",
                        self.players[player].name,
                        i + 1,
                        self.describe_error(&err)
                    );
                    self.log(line);
                    report.failures.push((i, err));
                }
            }
        }
        if self.is_game_over() && report.performed.len() + report.failures.len() < actions.len() {
            report.halted = true;
        }
        Ok(report)
    }

    fn run_one(&mut self, player: usize, action: &Action) -> Result<(), ActionError> {
        if action.is_free() {
            return self.perform_action(player, action);
        }
        if self.actions_remaining == 0 {
            return Err(ActionError::NoActionsLeft);
        }
        self.perform_action(player, action)?;
        self.actions_remaining -= 1;
        Ok(())
    }

    /// Would `actions` all succeed for `player` right now? Runs the plan on a
    /// silent copy, so the answer matches what execution would do.
    pub fn validate_turn_plan(&self, player: usize, actions: &[Action]) -> bool {
        if player >= self.players.len() {
            return false;
        }
        let mut sim = self.clone();
        sim.journal.mute();
        if player != self.current_player {
            // Judge the plan as that player's own fresh turn
            sim.current_player = player;
            sim.phase = TurnPhase::Actions;
            sim.actions_remaining = ACTIONS_PER_TURN;
        }
        let valid = matches!(sim.execute_turn_actions(actions), Ok(report) if report.is_clean());
        tracing::debug!(player, actions = actions.len(), valid, "validated turn plan");
        valid
    }

    /// `err` as text with city ids resolved to names.
    pub fn describe_error(&self, err: &ActionError) -> String {
        match *err {
            ActionError::NotAdjacent { from, to } => {
                format!("{} is not adjacent to {}", self.label(to), self.label(from))
            }
            ActionError::MissingCard(card) => format!("card {} is not in hand", self.card_label(card)),
            ActionError::AlreadyThere(city) => format!("already standing in {}", self.label(city)),
            ActionError::NoStation(city) => format!("no research station at {}", self.label(city)),
            ActionError::StationExists(city) => format!("research station already built at {}", self.label(city)),
            ActionError::NothingToTreat(city) => format!("no disease cubes to treat at {}", self.label(city)),
            ActionError::NotInDiscard(city) => {
                format!("infection card {} is not in the discard pile", self.label(city))
            }
            _ => err.to_string(),
        }
    }

    fn label(&self, city: CityId) -> String {
        if self.map.contains(city) {
            self.city_name(city).to_string()
        } else {
            city.to_string()
        }
    }

    fn card_label(&self, card: PlayerCard) -> String {
        match card {
            PlayerCard::City(city) => self.label(city),
            other => self.card_name(other),
        }
    }

    // ── Draw / discard ─────────────────────────────────────────────────

    /// End the action phase and draw two player cards. Epidemics resolve as
    /// they are drawn and are not returned. The game may end here.
    pub fn draw_phase_cards(&mut self) -> Result<Vec<PlayerCard>, ActionError> {
        self.require_running()?;
        self.require_phase(TurnPhase::Actions)?;
        self.set_phase(TurnPhase::Draw);

        let player = self.current_player;
        let mut drawn = Vec::with_capacity(CARDS_PER_DRAW);
        for _ in 0..CARDS_PER_DRAW {
            match self.draw_player_card(player) {
                Some(PlayerCard::Epidemic) => {}
                Some(card) => drawn.push(card),
                None => break,
            }
            if self.is_game_over() {
                break;
            }
        }
        self.check_all_eradication();

        if !self.is_game_over() {
            let next = if self.check_hand_limit() { TurnPhase::Discard } else { TurnPhase::Infection };
            self.set_phase(next);
        }
        Ok(drawn)
    }

    /// True when the current player holds more than the hand limit.
    pub fn check_hand_limit(&self) -> bool {
        self.active_player().hand.len() > HAND_LIMIT
    }

    /// Discard a card from the current player's hand. Allowed in any phase;
    /// during the discard phase, getting back to the limit moves on to
    /// infection.
    pub fn discard_card(&mut self, card: PlayerCard) -> Result<(), ActionError> {
        self.require_running()?;
        let player = self.current_player;
        if !self.players[player].take(card) {
            return Err(ActionError::MissingCard(card));
        }
        self.player_deck.discard(card);
        self.log(format!("[DISCARD] {} discarded {}.", self.players[player].name, self.card_name(card)));

        if self.phase == TurnPhase::Discard && !self.check_hand_limit() {
            self.set_phase(TurnPhase::Infection);
        }
        Ok(())
    }

    // ── Infection and turn hand-off ────────────────────────────────────

    /// Infect cities, then pass the turn to the next player.
    pub fn end_turn_sequence(&mut self) -> Result<(), ActionError> {
        self.require_running()?;
        if self.phase == TurnPhase::Discard {
            return Err(ActionError::OverHandLimit);
        }
        self.require_phase(TurnPhase::Infection)?;

        self.run_infection_phase();
        if self.is_game_over() {
            return Ok(());
        }
        self.check_all_eradication();
        if self.check_victory() {
            return Ok(());
        }

        self.turn += 1;
        self.current_player = (self.current_player + 1) % self.players.len();
        self.actions_remaining = ACTIONS_PER_TURN;
        self.set_phase(TurnPhase::Actions);
        self.log(format!("--- Turn {}: {} ---", self.turn, self.active_player().name));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{EventKind, EventPlay};
    use crate::map::*;
    use crate::setup::{assemble, GameConfig};

    fn board() -> GameState {
        assemble(WorldMap::standard(), &GameConfig::default(), 2, 21).unwrap()
    }

    /// Drop epidemics from the top of the player deck so draws are plain.
    fn calm_top(state: &mut GameState, n: usize) {
        let epidemics: Vec<usize> =
            (0..n).filter(|&i| state.player_deck.draw_pile[i].is_epidemic()).collect();
        for &i in epidemics.iter().rev() {
            state.player_deck.draw_pile.remove(i);
            state.player_deck.draw_pile.push_back(PlayerCard::Epidemic);
        }
    }

    #[test]
    fn budget_is_shared_across_calls() {
        let mut state = board();
        let report = state.execute_turn_actions(&[Action::Skip, Action::Skip, Action::Skip]).unwrap();
        assert_eq!(report.performed, vec![0, 1, 2]);
        assert_eq!(state.actions_remaining, 1);

        let report = state.execute_turn_actions(&[Action::Skip, Action::Skip]).unwrap();
        assert_eq!(report.performed, vec![0]);
        assert_eq!(report.failures, vec![(1, ActionError::NoActionsLeft)]);
        assert!(!report.is_clean());
        assert_eq!(state.actions_remaining, 0);
    }

    #[test]
    fn events_do_not_use_the_budget() {
        let mut state = board();
        state.players[0].hand.push(PlayerCard::Event(EventKind::OneQuietNight));
        state.actions_remaining = 0;
        let report = state.execute_turn_actions(&[Action::Event(EventPlay::OneQuietNight)]).unwrap();
        assert!(report.is_clean());
        assert!(state.skip_next_infection);
    }

    #[test]
    fn failed_actions_keep_the_budget() {
        let mut state = board();
        let report = state.execute_turn_actions(&[Action::Move(TOKYO), Action::Move(CHICAGO)]).unwrap();
        assert_eq!(report.performed, vec![1]);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(state.actions_remaining, 3);
        assert_eq!(state.players[0].location, CHICAGO);
    }

    #[test]
    fn refused_actions_are_journaled() {
        let mut state = board();
        let mark = state.journal.written();
        let report = state.execute_turn_actions(&[Action::Move(TOKYO)]).unwrap();
        assert_eq!(report.failures, vec![(0, ActionError::NotAdjacent { from: ATLANTA, to: TOKYO })]);

        let lines = state.journal.since(mark);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("[ACTION] Player 1"));
        assert!(lines[0].contains("Tokyo is not adjacent to Atlanta"));
    }

    #[test]
    fn errors_are_described_with_city_names() {
        let state = board();
        let err = ActionError::NotAdjacent { from: ATLANTA, to: TOKYO };
        assert_eq!(state.describe_error(&err), "Tokyo is not adjacent to Atlanta");
        assert!(!err.to_string().contains("CityId"));
        assert_eq!(
            state.describe_error(&ActionError::MissingCard(PlayerCard::City(LIMA))),
            "card Lima is not in hand"
        );
        assert_eq!(state.describe_error(&ActionError::UnknownCity(CityId(200))), "city #200 is not on the map");
        assert_eq!(state.describe_error(&ActionError::NoActionsLeft), "no actions left this turn");
    }

    #[test]
    fn phases_are_enforced() {
        let mut state = board();
        assert_eq!(
            state.end_turn_sequence(),
            Err(ActionError::WrongPhase { expected: TurnPhase::Infection, actual: TurnPhase::Actions })
        );
        calm_top(&mut state, 2);
        state.draw_phase_cards().unwrap();
        assert_eq!(state.phase, TurnPhase::Infection);
        assert!(matches!(
            state.execute_turn_actions(&[Action::Skip]),
            Err(ActionError::WrongPhase { expected: TurnPhase::Actions, .. })
        ));
        assert!(matches!(state.draw_phase_cards(), Err(ActionError::WrongPhase { .. })));
    }

    #[test]
    fn full_turn_passes_to_next_player() {
        let mut state = board();
        calm_top(&mut state, 2);
        state.execute_turn_actions(&vec![Action::Skip; 4]).unwrap();
        let drawn = state.draw_phase_cards().unwrap();
        assert_eq!(drawn.len(), 2);
        assert_eq!(state.players[0].hand, drawn);

        state.end_turn_sequence().unwrap();
        assert_eq!(state.infection_deck.discard_pile.len(), 2);
        assert_eq!(state.current_player, 1);
        assert_eq!(state.turn, 2);
        assert_eq!(state.phase, TurnPhase::Actions);
        assert_eq!(state.actions_remaining, ACTIONS_PER_TURN);
    }

    #[test]
    fn over_the_limit_must_discard() {
        let mut state = board();
        calm_top(&mut state, 2);
        let cities = [LONDON, PARIS, MADRID, ESSEN, MILAN, CAIRO, LIMA];
        state.players[0].hand = cities.iter().map(|&c| PlayerCard::City(c)).collect();

        state.draw_phase_cards().unwrap();
        assert_eq!(state.players[0].hand.len(), 9);
        assert!(state.check_hand_limit());
        assert_eq!(state.phase, TurnPhase::Discard);
        assert_eq!(state.end_turn_sequence(), Err(ActionError::OverHandLimit));

        assert_eq!(state.discard_card(PlayerCard::Epidemic), Err(ActionError::MissingCard(PlayerCard::Epidemic)));
        state.discard_card(PlayerCard::City(LONDON)).unwrap();
        assert_eq!(state.phase, TurnPhase::Discard);
        state.discard_card(PlayerCard::City(PARIS)).unwrap();
        assert_eq!(state.phase, TurnPhase::Infection);
        assert!(!state.check_hand_limit());
        state.end_turn_sequence().unwrap();
    }

    #[test]
    fn validation_matches_execution() {
        let state = board();
        let plans: Vec<Vec<Action>> = vec![
            vec![Action::Move(CHICAGO), Action::Move(MONTREAL), Action::Treat],
            vec![Action::Move(CHICAGO), Action::Move(MONTREAL), Action::Move(NEW_YORK)],
            vec![Action::Skip; 5],
            vec![Action::BuildStation],
        ];
        for plan in plans {
            let predicted = state.validate_turn_plan(0, &plan);
            let mut copy = state.clone();
            let report = copy.execute_turn_actions(&plan).unwrap();
            assert_eq!(predicted, report.is_clean(), "{plan:?}");
        }
        // Validation leaves the real state alone
        assert_eq!(state.players[0].location, ATLANTA);
        assert!(!state.validate_turn_plan(7, &[Action::Skip]));
    }

    #[test]
    fn other_players_plans_start_from_a_fresh_turn() {
        let mut state = board();
        state.execute_turn_actions(&vec![Action::Skip; 4]).unwrap();
        assert!(!state.validate_turn_plan(0, &[Action::Skip]));
        assert!(state.validate_turn_plan(1, &vec![Action::Skip; 4]));
        assert!(!state.validate_turn_plan(1, &vec![Action::Skip; 5]));

        calm_top(&mut state, 2);
        state.draw_phase_cards().unwrap();
        assert_eq!(state.phase, TurnPhase::Infection);
        assert!(state.validate_turn_plan(1, &[Action::Skip]));
        assert!(!state.validate_turn_plan(0, &[Action::Skip]));
        // The real turn is untouched
        assert_eq!(state.current_player, 0);
        assert_eq!(state.actions_remaining, 0);
    }

    #[test]
    fn commands_refused_after_game_over() {
        let mut state = board();
        state.finish(Outcome::Defeat(DefeatReason::OutbreakLimit));
        assert_eq!(state.execute_turn_actions(&[Action::Skip]), Err(ActionError::GameOver));
        assert_eq!(state.draw_phase_cards(), Err(ActionError::GameOver));
        assert_eq!(state.end_turn_sequence(), Err(ActionError::GameOver));
        assert!(!state.validate_turn_plan(0, &[Action::Skip]));
    }

    #[test]
    fn empty_player_deck_loses_during_draw() {
        let mut state = board();
        state.player_deck.draw_pile.truncate(1);
        state.player_deck.draw_pile[0] = PlayerCard::City(LIMA);
        let drawn = state.draw_phase_cards().unwrap();
        assert_eq!(drawn, vec![PlayerCard::City(LIMA)]);
        assert_eq!(state.outcome, Some(Outcome::Defeat(DefeatReason::PlayerDeckExhausted)));
        assert_eq!(state.phase, TurnPhase::Draw);
    }
}
