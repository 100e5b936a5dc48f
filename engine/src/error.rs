//! Error types for the rules engine.
//!
//! Caller errors (`ActionError`, `MapError`) are returned without touching
//! state. Running out of cards during a required draw is not an error at this
//! level: it ends the game and is reported through `GameState::outcome`.

use crate::cards::PlayerCard;
use crate::types::{CityId, TurnPhase};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MapError {
    #[error("unknown city: {0}")]
    UnknownCity(String),

    #[error("duplicate city: {0}")]
    DuplicateCity(String),

    #[error("map holds at most 255 cities, got {0}")]
    TooManyCities(usize),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DeckError {
    #[error("deck exhausted")]
    Exhausted,

    /// Replacement order is not a permutation of the cards it replaces.
    #[error("new order does not match the top {0} cards")]
    InvalidReorder(usize),
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SetupError {
    #[error("player count must be 2-4, got {0}")]
    InvalidPlayerCount(usize),

    #[error("at least one epidemic card is required")]
    NoEpidemics,

    #[error("map too small: {0}")]
    MapTooSmall(&'static str),

    #[error(transparent)]
    Map(#[from] MapError),
}

/// Why an action, event or phase command was refused. `Display` has no map
/// to resolve ids against; `GameState::describe_error` renders city names.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("game already over")]
    GameOver,

    #[error("not allowed during the {actual} phase (expected {expected})")]
    WrongPhase { expected: TurnPhase, actual: TurnPhase },

    #[error("no actions left this turn")]
    NoActionsLeft,

    #[error("no player with index {0}")]
    UnknownPlayer(usize),

    #[error("{0} is not on the map")]
    UnknownCity(CityId),

    #[error("{to} is not adjacent to {from}")]
    NotAdjacent { from: CityId, to: CityId },

    #[error("card {0} is not in hand")]
    MissingCard(PlayerCard),

    #[error("already standing in {0}")]
    AlreadyThere(CityId),

    #[error("no research station at {0}")]
    NoStation(CityId),

    #[error("research station already built at {0}")]
    StationExists(CityId),

    #[error("all research stations are already built")]
    StationLimit,

    #[error("no disease cubes to treat at {0}")]
    NothingToTreat(CityId),

    #[error("no uncured color with enough cards in hand")]
    CureUnavailable,

    #[error("players must share a city to exchange cards")]
    NotColocated,

    #[error("one of the sharing players must be the acting player")]
    NotActingPlayer,

    #[error("a player cannot share cards with themselves")]
    SamePlayer,

    #[error("infection card {0} is not in the discard pile")]
    NotInDiscard(CityId),

    #[error("forecast order does not match the top of the infection deck")]
    InvalidForecast,

    #[error("hand is over the limit; discard first")]
    OverHandLimit,
}
