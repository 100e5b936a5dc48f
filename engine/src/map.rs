// ═══════════════════════════════════════════════════════════════════════
// World map — the fixed 48-city graph and the WorldMap lookup structure
// City names, colors and connections never change during a game.
// ═══════════════════════════════════════════════════════════════════════

use crate::error::MapError;
use crate::types::{CityId, Color};
use std::collections::HashMap;

/// Static description of a city on the standard board.
#[derive(Debug, Clone, Copy)]
pub struct CityDef {
    pub id: CityId,
    pub name: &'static str,
    pub color: Color,
}

// ── City ID constants ──────────────────────────────────────────────────
// Ordered by color group, 12 cities each.

// BLUE — North America / Europe
pub const SAN_FRANCISCO: CityId   = CityId(0);
pub const CHICAGO: CityId         = CityId(1);
pub const ATLANTA: CityId         = CityId(2);
pub const MONTREAL: CityId        = CityId(3);
pub const NEW_YORK: CityId        = CityId(4);
pub const WASHINGTON: CityId      = CityId(5);
pub const LONDON: CityId          = CityId(6);
pub const MADRID: CityId          = CityId(7);
pub const PARIS: CityId           = CityId(8);
pub const ESSEN: CityId           = CityId(9);
pub const MILAN: CityId           = CityId(10);
pub const ST_PETERSBURG: CityId   = CityId(11);
// YELLOW — Latin America / Africa
pub const LOS_ANGELES: CityId     = CityId(12);
pub const MEXICO_CITY: CityId     = CityId(13);
pub const MIAMI: CityId           = CityId(14);
pub const BOGOTA: CityId          = CityId(15);
pub const LIMA: CityId            = CityId(16);
pub const SANTIAGO: CityId        = CityId(17);
pub const BUENOS_AIRES: CityId    = CityId(18);
pub const SAO_PAULO: CityId       = CityId(19);
pub const LAGOS: CityId           = CityId(20);
pub const KHARTOUM: CityId        = CityId(21);
pub const KINSHASA: CityId        = CityId(22);
pub const JOHANNESBURG: CityId    = CityId(23);
// BLACK — Middle East / South Asia
pub const ALGIERS: CityId         = CityId(24);
pub const ISTANBUL: CityId        = CityId(25);
pub const MOSCOW: CityId          = CityId(26);
pub const CAIRO: CityId           = CityId(27);
pub const BAGHDAD: CityId         = CityId(28);
pub const TEHRAN: CityId          = CityId(29);
pub const KARACHI: CityId         = CityId(30);
pub const RIYADH: CityId          = CityId(31);
pub const DELHI: CityId           = CityId(32);
pub const MUMBAI: CityId          = CityId(33);
pub const CHENNAI: CityId         = CityId(34);
pub const KOLKATA: CityId         = CityId(35);
// RED — East Asia / Oceania
pub const BANGKOK: CityId         = CityId(36);
pub const JAKARTA: CityId         = CityId(37);
pub const HO_CHI_MINH: CityId     = CityId(38);
pub const HONG_KONG: CityId       = CityId(39);
pub const SHANGHAI: CityId        = CityId(40);
pub const BEIJING: CityId         = CityId(41);
pub const SEOUL: CityId           = CityId(42);
pub const TOKYO: CityId           = CityId(43);
pub const OSAKA: CityId           = CityId(44);
pub const TAIPEI: CityId          = CityId(45);
pub const MANILA: CityId          = CityId(46);
pub const SYDNEY: CityId          = CityId(47);

pub const NUM_CITIES: usize = 48;

macro_rules! city {
    ($name:expr, $id:expr, $color:ident) => {
        CityDef { id: $id, name: $name, color: Color::$color }
    };
}

pub static CITIES: [CityDef; NUM_CITIES] = [
    // ═══ BLUE ═══
    city!("San Francisco", SAN_FRANCISCO, Blue),
    city!("Chicago", CHICAGO, Blue),
    city!("Atlanta", ATLANTA, Blue),
    city!("Montreal", MONTREAL, Blue),
    city!("New York", NEW_YORK, Blue),
    city!("Washington", WASHINGTON, Blue),
    city!("London", LONDON, Blue),
    city!("Madrid", MADRID, Blue),
    city!("Paris", PARIS, Blue),
    city!("Essen", ESSEN, Blue),
    city!("Milan", MILAN, Blue),
    city!("St. Petersburg", ST_PETERSBURG, Blue),
    // ═══ YELLOW ═══
    city!("Los Angeles", LOS_ANGELES, Yellow),
    city!("Mexico City", MEXICO_CITY, Yellow),
    city!("Miami", MIAMI, Yellow),
    city!("Bogota", BOGOTA, Yellow),
    city!("Lima", LIMA, Yellow),
    city!("Santiago", SANTIAGO, Yellow),
    city!("Buenos Aires", BUENOS_AIRES, Yellow),
    city!("Sao Paulo", SAO_PAULO, Yellow),
    city!("Lagos", LAGOS, Yellow),
    city!("Khartoum", KHARTOUM, Yellow),
    city!("Kinshasa", KINSHASA, Yellow),
    city!("Johannesburg", JOHANNESBURG, Yellow),
    // ═══ BLACK ═══
    city!("Algiers", ALGIERS, Black),
    city!("Istanbul", ISTANBUL, Black),
    city!("Moscow", MOSCOW, Black),
    city!("Cairo", CAIRO, Black),
    city!("Baghdad", BAGHDAD, Black),
    city!("Tehran", TEHRAN, Black),
    city!("Karachi", KARACHI, Black),
    city!("Riyadh", RIYADH, Black),
    city!("Delhi", DELHI, Black),
    city!("Mumbai", MUMBAI, Black),
    city!("Chennai", CHENNAI, Black),
    city!("Kolkata", KOLKATA, Black),
    // ═══ RED ═══
    city!("Bangkok", BANGKOK, Red),
    city!("Jakarta", JAKARTA, Red),
    city!("Ho Chi Minh", HO_CHI_MINH, Red),
    city!("Hong Kong", HONG_KONG, Red),
    city!("Shanghai", SHANGHAI, Red),
    city!("Beijing", BEIJING, Red),
    city!("Seoul", SEOUL, Red),
    city!("Tokyo", TOKYO, Red),
    city!("Osaka", OSAKA, Red),
    city!("Taipei", TAIPEI, Red),
    city!("Manila", MANILA, Red),
    city!("Sydney", SYDNEY, Red),
];

/// Undirected connections. The Pacific crossings (San Francisco to Tokyo
/// and Manila, Los Angeles to Sydney) wrap around the map edge.
pub static EDGES: [(CityId, CityId); 93] = [
    (SAN_FRANCISCO, TOKYO), (SAN_FRANCISCO, MANILA), (SAN_FRANCISCO, LOS_ANGELES), (SAN_FRANCISCO, CHICAGO),
    (CHICAGO, LOS_ANGELES), (CHICAGO, MEXICO_CITY), (CHICAGO, ATLANTA), (CHICAGO, MONTREAL),
    (ATLANTA, WASHINGTON), (ATLANTA, MIAMI),
    (MONTREAL, NEW_YORK), (MONTREAL, WASHINGTON),
    (NEW_YORK, WASHINGTON), (NEW_YORK, LONDON), (NEW_YORK, MADRID),
    (WASHINGTON, MIAMI),
    (LONDON, MADRID), (LONDON, PARIS), (LONDON, ESSEN),
    (MADRID, PARIS), (MADRID, ALGIERS), (MADRID, SAO_PAULO),
    (PARIS, ESSEN), (PARIS, MILAN), (PARIS, ALGIERS),
    (ESSEN, MILAN), (ESSEN, ST_PETERSBURG),
    (MILAN, ISTANBUL),
    (ST_PETERSBURG, ISTANBUL), (ST_PETERSBURG, MOSCOW),
    (LOS_ANGELES, MEXICO_CITY), (LOS_ANGELES, SYDNEY),
    (MEXICO_CITY, MIAMI), (MEXICO_CITY, BOGOTA), (MEXICO_CITY, LIMA),
    (MIAMI, BOGOTA),
    (BOGOTA, LIMA), (BOGOTA, BUENOS_AIRES), (BOGOTA, SAO_PAULO),
    (LIMA, SANTIAGO),
    (BUENOS_AIRES, SAO_PAULO),
    (SAO_PAULO, LAGOS),
    (LAGOS, KHARTOUM), (LAGOS, KINSHASA),
    (KHARTOUM, KINSHASA), (KHARTOUM, JOHANNESBURG), (KHARTOUM, CAIRO),
    (KINSHASA, JOHANNESBURG),
    (ALGIERS, ISTANBUL), (ALGIERS, CAIRO),
    (ISTANBUL, MOSCOW), (ISTANBUL, BAGHDAD), (ISTANBUL, CAIRO),
    (MOSCOW, TEHRAN),
    (CAIRO, BAGHDAD), (CAIRO, RIYADH),
    (BAGHDAD, TEHRAN), (BAGHDAD, KARACHI), (BAGHDAD, RIYADH),
    (TEHRAN, KARACHI), (TEHRAN, DELHI),
    (KARACHI, RIYADH), (KARACHI, MUMBAI), (KARACHI, DELHI),
    (DELHI, MUMBAI), (DELHI, CHENNAI), (DELHI, KOLKATA),
    (MUMBAI, CHENNAI),
    (CHENNAI, KOLKATA), (CHENNAI, BANGKOK), (CHENNAI, JAKARTA),
    (KOLKATA, BANGKOK), (KOLKATA, HONG_KONG),
    (BANGKOK, JAKARTA), (BANGKOK, HO_CHI_MINH), (BANGKOK, HONG_KONG),
    (JAKARTA, HO_CHI_MINH), (JAKARTA, SYDNEY),
    (HO_CHI_MINH, HONG_KONG), (HO_CHI_MINH, MANILA),
    (HONG_KONG, SHANGHAI), (HONG_KONG, TAIPEI), (HONG_KONG, MANILA),
    (SHANGHAI, BEIJING), (SHANGHAI, SEOUL), (SHANGHAI, TOKYO), (SHANGHAI, TAIPEI),
    (BEIJING, SEOUL),
    (SEOUL, TOKYO),
    (TOKYO, OSAKA),
    (OSAKA, TAIPEI),
    (TAIPEI, MANILA),
    (MANILA, SYDNEY),
];

// ── WorldMap ───────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct MapCity {
    name: String,
    color: Color,
    neighbors: Vec<CityId>,
}

/// City graph built once at game start. Lookup by name is case-insensitive.
#[derive(Debug, Clone)]
pub struct WorldMap {
    cities: Vec<MapCity>,
    index: HashMap<String, CityId>,
}

impl WorldMap {
    /// The standard 48-city board.
    pub fn standard() -> Self {
        let mut map = WorldMap { cities: Vec::with_capacity(NUM_CITIES), index: HashMap::new() };
        for def in &CITIES {
            map.push_city(def.name.to_string(), def.color);
        }
        for &(a, b) in &EDGES {
            map.connect(a, b);
        }
        map
    }

    /// Build a custom graph from named cities and named connections.
    pub fn from_parts(cities: &[(&str, Color)], edges: &[(&str, &str)]) -> Result<Self, MapError> {
        if cities.len() > u8::MAX as usize {
            return Err(MapError::TooManyCities(cities.len()));
        }
        let mut map = WorldMap { cities: Vec::with_capacity(cities.len()), index: HashMap::new() };
        for &(name, color) in cities {
            if map.index.contains_key(&name.to_lowercase()) {
                return Err(MapError::DuplicateCity(name.to_string()));
            }
            map.push_city(name.to_string(), color);
        }
        for &(a, b) in edges {
            let a = map.lookup(a)?;
            let b = map.lookup(b)?;
            map.connect(a, b);
        }
        Ok(map)
    }

    fn push_city(&mut self, name: String, color: Color) {
        let id = CityId(self.cities.len() as u8);
        self.index.insert(name.to_lowercase(), id);
        self.cities.push(MapCity { name, color, neighbors: Vec::new() });
    }

    fn connect(&mut self, a: CityId, b: CityId) {
        if a == b {
            return;
        }
        if !self.cities[a.index()].neighbors.contains(&b) {
            self.cities[a.index()].neighbors.push(b);
        }
        if !self.cities[b.index()].neighbors.contains(&a) {
            self.cities[b.index()].neighbors.push(a);
        }
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = CityId> {
        (0..self.cities.len()).map(|i| CityId(i as u8))
    }

    pub fn contains(&self, id: CityId) -> bool {
        id.index() < self.cities.len()
    }

    pub fn lookup(&self, name: &str) -> Result<CityId, MapError> {
        self.index
            .get(&name.trim().to_lowercase())
            .copied()
            .ok_or_else(|| MapError::UnknownCity(name.to_string()))
    }

    pub fn name(&self, id: CityId) -> &str {
        &self.cities[id.index()].name
    }

    pub fn color(&self, id: CityId) -> Color {
        self.cities[id.index()].color
    }

    pub fn neighbors(&self, id: CityId) -> &[CityId] {
        &self.cities[id.index()].neighbors
    }

    pub fn are_adjacent(&self, a: CityId, b: CityId) -> bool {
        self.neighbors(a).contains(&b)
    }

    pub fn cities_of(&self, color: Color) -> impl Iterator<Item = CityId> + '_ {
        self.ids().filter(move |&id| self.color(id) == color)
    }
}
