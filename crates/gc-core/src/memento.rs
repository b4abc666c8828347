//! Compact string form of a coin stack.
//!
//! Each coin is written as `i,j,serial` and coins are joined with `;` from
//! the bottom of the stack to the top. The empty stack is the empty string.
//! There is no escaping; every field is an integer.

use crate::cell::Cell;
use crate::coin::Coin;
use crate::error::{Result, WorldError};

const COIN_SEPARATOR: &str = ";";
const FIELD_SEPARATOR: &str = ",";

/// Something whose state can be captured in, and restored from, a memento.
pub trait Memento {
    fn to_memento(&self) -> String;

    /// Replace the current state with the one captured in `memento`.
    /// On error the state is left untouched.
    fn restore(&mut self, memento: &str) -> Result<()>;
}

pub fn encode_coins(coins: &[Coin]) -> String {
    coins
        .iter()
        .map(|c| format!("{},{},{}", c.origin.i, c.origin.j, c.serial))
        .collect::<Vec<_>>()
        .join(COIN_SEPARATOR)
}

pub fn decode_coins(memento: &str) -> Result<Vec<Coin>> {
    if memento.is_empty() {
        return Ok(Vec::new());
    }
    memento.split(COIN_SEPARATOR).map(decode_coin).collect()
}

fn decode_coin(record: &str) -> Result<Coin> {
    let fields: Vec<&str> = record.split(FIELD_SEPARATOR).collect();
    let [i, j, serial] = fields.as_slice() else {
        return Err(malformed(
            record,
            format!("expected 3 fields, found {}", fields.len()),
        ));
    };

    let i: i32 = i
        .parse()
        .map_err(|e| malformed(record, format!("cell i '{i}': {e}")))?;
    let j: i32 = j
        .parse()
        .map_err(|e| malformed(record, format!("cell j '{j}': {e}")))?;
    let serial: u32 = serial
        .parse()
        .map_err(|e| malformed(record, format!("serial '{serial}': {e}")))?;

    Ok(Coin::new(Cell::new(i, j), serial))
}

fn malformed(record: &str, reason: String) -> WorldError {
    WorldError::MalformedMemento {
        record: record.to_string(),
        reason,
    }
}
