// ═══════════════════════════════════════════════════════════════════════
// Runner — CLI entry point for building, playing and inspecting games
// ═══════════════════════════════════════════════════════════════════════

mod parse;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use pandemic_engine::{
    board_view, new_game_with, Action, Color, GameConfig, GameState, TurnPhase, WorldMap, ACTIONS_PER_TURN,
    OUTBREAK_LIMIT,
};
use std::io::BufRead;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pandemic-runner", about = "Pandemic rules engine")]
struct Cli {
    /// Mirror the game log and engine diagnostics to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct GameArgs {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 2)]
    players: usize,
    /// Epidemic cards in the player deck (difficulty)
    #[arg(short, long, default_value_t = 4)]
    epidemics: usize,
    #[arg(long, default_value_t = 5)]
    events: usize,
    #[arg(long, default_value = "Atlanta")]
    start: String,
}

impl GameArgs {
    fn config(&self) -> GameConfig {
        GameConfig::new()
            .with_epidemics(self.epidemics)
            .with_events(self.events)
            .with_start_city(self.start.clone())
    }

    fn build(&self) -> Result<GameState> {
        new_game_with(&self.config(), self.players, self.seed)
            .with_context(|| format!("setting up a {}-player game with seed {}", self.players, self.seed))
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List every city with its color and neighbours
    Map,
    /// Set up a game and print the opening board
    Status {
        #[command(flatten)]
        game: GameArgs,
        /// Print the board as JSON
        #[arg(long)]
        json: bool,
    },
    /// Play from stdin, one line of `;`-separated commands per turn
    Play {
        #[command(flatten)]
        game: GameArgs,
        #[arg(long, default_value_t = 200)]
        max_turns: u32,
    },
    /// Skip every action until the game ends
    Autoplay {
        #[command(flatten)]
        game: GameArgs,
        #[arg(long, default_value_t = 200)]
        max_turns: u32,
        /// Print the final board as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Map => cmd_map(),
        Commands::Status { game, json } => cmd_status(&game, json),
        Commands::Play { game, max_turns } => cmd_play(&game, max_turns),
        Commands::Autoplay { game, max_turns, json } => cmd_autoplay(&game, max_turns, json),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn cmd_map() -> Result<()> {
    let map = WorldMap::standard();
    for color in Color::ALL {
        println!("── {color} ──");
        for id in map.cities_of(color) {
            let neighbours: Vec<&str> = map.neighbors(id).iter().map(|&n| map.name(n)).collect();
            println!("  {:<16} {}", map.name(id), neighbours.join(", "));
        }
    }
    Ok(())
}

fn cmd_status(game: &GameArgs, json: bool) -> Result<()> {
    let state = game.build()?;
    if json {
        println!("{}", board_view(&state).to_json()?);
    } else {
        print_board(&state);
    }
    Ok(())
}

fn cmd_play(game: &GameArgs, max_turns: u32) -> Result<()> {
    let mut state = game.build()?;
    let mut mark = 0;
    print_new_log(&state, &mut mark);
    print_board(&state);

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    while !state.is_game_over() && state.turn <= max_turns {
        println!("\n{} (turn {}) >", state.active_player().name, state.turn);
        let Some(line) = lines.next() else { break };
        let line = line.context("reading stdin")?;

        let plan = match parse::parse_plan(&state.map, state.current_player, &line) {
            Ok(plan) => plan,
            Err(err) => {
                println!("  ! {err:#}");
                continue;
            }
        };
        if !state.validate_turn_plan(state.current_player, &plan) {
            println!("  ! some actions in this plan will be refused");
        }
        let report = state.execute_turn_actions(&plan)?;
        for (index, err) in &report.failures {
            println!("  ! action {}: {}", index + 1, state.describe_error(err));
        }
        finish_turn(&mut state)?;
        print_new_log(&state, &mut mark);
        print_summary(&state);
    }
    print_result(&state);
    Ok(())
}

fn cmd_autoplay(game: &GameArgs, max_turns: u32, json: bool) -> Result<()> {
    let mut state = game.build()?;
    let skips = vec![Action::Skip; ACTIONS_PER_TURN as usize];
    while !state.is_game_over() && state.turn <= max_turns {
        let report = state.execute_turn_actions(&skips)?;
        tracing::debug!(turn = state.turn, performed = report.performed.len(), "autoplay turn");
        finish_turn(&mut state)?;
    }
    if json {
        println!("{}", board_view(&state).to_json()?);
    } else {
        print_summary(&state);
        print_result(&state);
    }
    Ok(())
}

/// Draw, trim the hand by discarding the oldest cards, then infect.
fn finish_turn(state: &mut GameState) -> Result<()> {
    if state.is_game_over() {
        return Ok(());
    }
    state.draw_phase_cards()?;
    while !state.is_game_over() && state.phase == TurnPhase::Discard {
        let oldest = state.active_player().hand[0];
        state.discard_card(oldest)?;
    }
    if !state.is_game_over() {
        state.end_turn_sequence()?;
    }
    Ok(())
}

// ── Output ─────────────────────────────────────────────────────────────

fn print_new_log(state: &GameState, mark: &mut u64) {
    for line in state.journal.since(*mark) {
        println!("{line}");
    }
    *mark = state.journal.written();
}

fn print_board(state: &GameState) {
    let view = board_view(state);
    println!("\nSeed {}", view.seed);
    println!("Infected cities:");
    for city in view.cities.iter().filter(|c| c.cubes > 0) {
        println!("  {:<16} {:<6} {}", city.name, city.color.to_string(), "#".repeat(city.cubes as usize));
    }
    println!("Research stations: {}", view.stations.join(", "));
    for player in &view.players {
        println!("{} in {}: {}", player.name, player.location, player.hand.join(", "));
    }
    print_summary(state);
}

fn print_summary(state: &GameState) {
    let view = board_view(state);
    let cured: Vec<String> = view.cured.iter().map(Color::to_string).collect();
    println!(
        "Turn {} | outbreaks {}/{OUTBREAK_LIMIT} | infection rate {} | cures [{}] | player deck {} | infection deck {}",
        view.turn,
        view.outbreaks,
        view.infection_rate,
        cured.join(", "),
        view.player_deck_size,
        view.infection_deck_size,
    );
}

fn print_result(state: &GameState) {
    match &state.outcome {
        Some(outcome) => println!("\nGame over after {} turns: {outcome}.", state.turn),
        None => println!("\nStopped at turn {} with the game still running.", state.turn),
    }
}
