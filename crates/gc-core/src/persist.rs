//! Persisted key layout and the string codecs for each key.
//!
//! | key          | value                                              |
//! |--------------|----------------------------------------------------|
//! | `curPos`     | `lat,lng`                                          |
//! | `knownCells` | `i,j has <memento>` entries joined by ` and `      |
//! | `wallet`     | coin memento, bottom to top                        |
//! | `travelHist` | `lat,lng` entries joined by `;`                    |
//!
//! A missing key always means "use the default".

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::cell::{Cell, LatLng};
use crate::error::{Result, WorldError};
use crate::memento::decode_coins;

pub const CUR_POS_KEY: &str = "curPos";
pub const KNOWN_CELLS_KEY: &str = "knownCells";
pub const WALLET_KEY: &str = "wallet";
pub const TRAVEL_HIST_KEY: &str = "travelHist";

pub const ALL_KEYS: [&str; 4] = [CUR_POS_KEY, KNOWN_CELLS_KEY, WALLET_KEY, TRAVEL_HIST_KEY];

const ENTRY_SEPARATOR: &str = " and ";
const POSITION_SEPARATOR: &str = ";";

static KNOWN_CELL_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(-?\d+),(-?\d+) has (.*)$").expect("known-cell entry pattern is valid")
});

/// String-keyed durable storage underneath a session.
///
/// The session writes related keys through `set_many`/`remove_many`.
/// Stores that can apply a batch atomically should override them; the
/// defaults apply entries one at a time.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;

    fn set_many(&mut self, entries: &[(&str, &str)]) -> Result<()> {
        for (key, value) in entries {
            self.set(key, value)?;
        }
        Ok(())
    }

    fn remove_many(&mut self, keys: &[&str]) -> Result<()> {
        for key in keys {
            self.remove(key)?;
        }
        Ok(())
    }
}

/// In-process store. Counts writes so callers can check that a no-op
/// really touched nothing.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with existing entries without counting them as writes.
    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            writes: 0,
        }
    }

    /// Number of `set` and `remove` calls so far.
    pub fn writes(&self) -> usize {
        self.writes
    }

    pub fn entries(&self) -> &BTreeMap<String, String> {
        &self.entries
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.writes += 1;
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.writes += 1;
        self.entries.remove(key);
        Ok(())
    }
}

// --- curPos / travelHist ---

pub fn encode_position(point: LatLng) -> String {
    point.to_string()
}

pub fn decode_position(key: &'static str, value: &str) -> Result<LatLng> {
    let (lat, lng) = value
        .split_once(',')
        .ok_or_else(|| invalid(key, format!("expected 'lat,lng', got '{value}'")))?;
    let point = LatLng::new(parse_degrees(key, lat)?, parse_degrees(key, lng)?);
    if !point.is_valid() {
        return Err(invalid(key, format!("'{value}' is outside lat ±90, lng ±180")));
    }
    Ok(point)
}

fn parse_degrees(key: &'static str, raw: &str) -> Result<f64> {
    let value: f64 = raw
        .parse()
        .map_err(|e| invalid(key, format!("'{raw}' is not a number: {e}")))?;
    if !value.is_finite() {
        return Err(invalid(key, format!("'{raw}' is not finite")));
    }
    Ok(value)
}

pub fn encode_history(history: &[LatLng]) -> String {
    history
        .iter()
        .map(|p| encode_position(*p))
        .collect::<Vec<_>>()
        .join(POSITION_SEPARATOR)
}

/// Decode a travel log. The log always holds at least the start position,
/// so an empty value is invalid.
pub fn decode_history(value: &str) -> Result<Vec<LatLng>> {
    if value.is_empty() {
        return Err(invalid(TRAVEL_HIST_KEY, "history is empty".to_string()));
    }
    value
        .split(POSITION_SEPARATOR)
        .map(|entry| decode_position(TRAVEL_HIST_KEY, entry))
        .collect()
}

// --- wallet ---

pub fn decode_wallet(value: &str) -> Result<Vec<crate::coin::Coin>> {
    decode_coins(value).map_err(|e| invalid(WALLET_KEY, e.to_string()))
}

// --- knownCells ---

pub fn encode_known_cells(known: &BTreeMap<Cell, String>) -> String {
    known
        .iter()
        .map(|(cell, memento)| format!("{cell} has {memento}"))
        .collect::<Vec<_>>()
        .join(ENTRY_SEPARATOR)
}

/// Decode remembered caches. Every memento is validated here so a corrupt
/// entry is caught at load time rather than on first visit.
pub fn decode_known_cells(value: &str) -> Result<BTreeMap<Cell, String>> {
    let mut known = BTreeMap::new();
    if value.is_empty() {
        return Ok(known);
    }
    for entry in value.split(ENTRY_SEPARATOR) {
        let caps = KNOWN_CELL_ENTRY.captures(entry).ok_or_else(|| {
            invalid(
                KNOWN_CELLS_KEY,
                format!("expected 'i,j has <memento>', got '{entry}'"),
            )
        })?;
        let i = parse_index(&caps[1])?;
        let j = parse_index(&caps[2])?;
        let memento = &caps[3];
        decode_coins(memento).map_err(|e| invalid(KNOWN_CELLS_KEY, e.to_string()))?;
        known.insert(Cell::new(i, j), memento.to_string());
    }
    Ok(known)
}

fn parse_index(raw: &str) -> Result<i32> {
    raw.parse()
        .map_err(|e| invalid(KNOWN_CELLS_KEY, format!("cell index '{raw}': {e}")))
}

fn invalid(key: &'static str, reason: String) -> WorldError {
    WorldError::InvalidPersistedValue { key, reason }
}
