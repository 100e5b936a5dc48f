// ═══════════════════════════════════════════════════════════════════════
// Turn-line parser — text commands to engine actions
//
// One line is one turn's plan, commands separated by `;`:
//
//   move Chicago; treat; fly New York; skip
//   give 2; take 3; build; cure; charter Lima; shuttle Paris
//   event quiet | event resilient Lagos | event grant Tokyo
//   event airlift 2 Sydney | event forecast Lima, Bogota, Miami
//
// Players are numbered from 1 in text.
// ═══════════════════════════════════════════════════════════════════════

use anyhow::{anyhow, bail, Context, Result};
use pandemic_engine::{Action, CityId, EventKind, EventPlay, WorldMap};

/// Parse a whole turn line for the player at `current`.
pub fn parse_plan(map: &WorldMap, current: usize, line: &str) -> Result<Vec<Action>> {
    line.split(';')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| parse_action(map, current, part).with_context(|| format!("in `{part}`")))
        .collect()
}

pub fn parse_action(map: &WorldMap, current: usize, text: &str) -> Result<Action> {
    let (verb, rest) = split_word(text);
    let action = match verb.to_lowercase().as_str() {
        "move" | "drive" => Action::Move(city(map, rest)?),
        "fly" | "direct" => Action::DirectFlight(city(map, rest)?),
        "charter" => Action::CharterFlight(city(map, rest)?),
        "shuttle" => Action::Shuttle(city(map, rest)?),
        "build" => Action::BuildStation,
        "treat" => Action::Treat,
        "cure" => Action::DiscoverCure,
        "give" => Action::ShareKnowledge { giver: current, receiver: player_number(rest)? },
        "take" => Action::ShareKnowledge { giver: player_number(rest)?, receiver: current },
        "skip" | "pass" => Action::Skip,
        "event" => Action::Event(parse_event(map, rest)?),
        "" => bail!("empty command"),
        other => bail!("unknown command `{other}`"),
    };
    Ok(action)
}

fn parse_event(map: &WorldMap, text: &str) -> Result<EventPlay> {
    let (name, rest) = split_word(text);
    let kind = match name.to_lowercase().as_str() {
        "quiet" => EventKind::OneQuietNight,
        "resilient" => EventKind::ResilientPopulation,
        "grant" => EventKind::GovernmentGrant,
        "airlift" => EventKind::Airlift,
        "forecast" => EventKind::Forecast,
        _ => EventKind::from_name(text).ok_or_else(|| anyhow!("unknown event `{text}`"))?,
    };
    let play = match kind {
        EventKind::OneQuietNight => EventPlay::OneQuietNight,
        EventKind::ResilientPopulation => EventPlay::ResilientPopulation { card: city(map, rest)? },
        EventKind::GovernmentGrant => EventPlay::GovernmentGrant { city: city(map, rest)? },
        EventKind::Airlift => {
            let (who, dest) = split_word(rest);
            EventPlay::Airlift { player: player_number(who)?, city: city(map, dest)? }
        }
        EventKind::Forecast => {
            let order = rest.split(',').map(|name| city(map, name)).collect::<Result<Vec<_>>>()?;
            EventPlay::Forecast { order }
        }
    };
    Ok(play)
}

fn split_word(text: &str) -> (&str, &str) {
    let text = text.trim();
    match text.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (text, ""),
    }
}

fn city(map: &WorldMap, name: &str) -> Result<CityId> {
    if name.trim().is_empty() {
        bail!("missing city name");
    }
    Ok(map.lookup(name)?)
}

/// 1-based player number in text, 0-based index out.
fn player_number(text: &str) -> Result<usize> {
    let n: usize = text.trim().parse().with_context(|| format!("bad player number `{text}`"))?;
    n.checked_sub(1).ok_or_else(|| anyhow!("players are numbered from 1"))
}
