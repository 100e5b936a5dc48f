pub mod types;
pub mod map;
pub mod cards;
pub mod deck;
pub mod error;
pub mod journal;
pub mod setup;
pub mod infection;
pub mod cure;
pub mod actions;
pub mod engine;
pub mod view;

#[cfg(test)]
mod tests;

pub use types::*;
pub use map::WorldMap;
pub use cards::*;
pub use actions::Action;
pub use engine::ExecutionReport;
pub use error::{ActionError, DeckError, MapError, SetupError};
pub use infection::InfectionSource;
pub use setup::{new_game, new_game_on, new_game_with, GameConfig};
pub use view::{board_view, BoardView};
