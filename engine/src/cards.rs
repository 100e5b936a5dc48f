// ═══════════════════════════════════════════════════════════════════════
// Player cards, event cards and event payloads — static data
// ═══════════════════════════════════════════════════════════════════════

use crate::types::CityId;
use serde::{Deserialize, Serialize};

// ── Events ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// Skip the next infection phase.
    OneQuietNight,
    /// Remove a card from the infection discard pile for the rest of the game.
    ResilientPopulation,
    /// Build a research station anywhere.
    GovernmentGrant,
    /// Move any player to any city.
    Airlift,
    /// Rearrange the top cards of the infection deck.
    Forecast,
}

impl EventKind {
    /// Fixed pool the player deck cycles through when adding event cards.
    pub const POOL: [EventKind; 5] = [
        EventKind::ResilientPopulation,
        EventKind::Airlift,
        EventKind::GovernmentGrant,
        EventKind::Forecast,
        EventKind::OneQuietNight,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EventKind::OneQuietNight => "One Quiet Night",
            EventKind::ResilientPopulation => "Resilient Population",
            EventKind::GovernmentGrant => "Government Grant",
            EventKind::Airlift => "Airlift",
            EventKind::Forecast => "Forecast",
        }
    }

    /// Case-insensitive match on the display name, ignoring spaces and underscores.
    pub fn from_name(name: &str) -> Option<EventKind> {
        let wanted = normalize(name);
        EventKind::POOL.into_iter().find(|k| normalize(k.name()) == wanted)
    }
}

fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ── Cards ──────────────────────────────────────────────────────────────

/// A card in the player deck or a player's hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerCard {
    City(CityId),
    Event(EventKind),
    Epidemic,
}

impl PlayerCard {
    pub fn city(self) -> Option<CityId> {
        match self {
            PlayerCard::City(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_epidemic(self) -> bool {
        self == PlayerCard::Epidemic
    }
}

impl std::fmt::Display for PlayerCard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlayerCard::City(id) => write!(f, "{id}"),
            PlayerCard::Event(kind) => write!(f, "{kind}"),
            PlayerCard::Epidemic => f.write_str("EPIDEMIC"),
        }
    }
}

/// Infection cards carry nothing but the city they name.
pub type InfectionCard = CityId;

// ── Event payloads ─────────────────────────────────────────────────────

/// An event card play with the fields that event needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventPlay {
    OneQuietNight,
    ResilientPopulation { card: InfectionCard },
    GovernmentGrant { city: CityId },
    Airlift { player: usize, city: CityId },
    /// New order for the top `order.len()` infection cards, top first.
    Forecast { order: Vec<InfectionCard> },
}

impl EventPlay {
    pub fn kind(&self) -> EventKind {
        match self {
            EventPlay::OneQuietNight => EventKind::OneQuietNight,
            EventPlay::ResilientPopulation { .. } => EventKind::ResilientPopulation,
            EventPlay::GovernmentGrant { .. } => EventKind::GovernmentGrant,
            EventPlay::Airlift { .. } => EventKind::Airlift,
            EventPlay::Forecast { .. } => EventKind::Forecast,
        }
    }

    pub fn card(&self) -> PlayerCard {
        PlayerCard::Event(self.kind())
    }
}
