//! Deterministic pseudo-randomness for world generation.
//!
//! `luck` is the only source of randomness in the world model. It is never
//! persisted; only its consequences (whether a cell holds a cache, and how
//! many coins the cache started with) survive, indirectly, in mementos.

use crate::cell::Cell;
use crate::constants::{INITIAL_VALUE_SALT, MAX_INITIAL_COINS};

const C1: u32 = 0xcc9e_2d51;
const C2: u32 = 0x1b87_3593;

/// MurmurHash3, x86 32-bit variant.
pub fn murmur3_32(data: &[u8], seed: u32) -> u32 {
    let mut h = seed;
    let chunks = data.chunks_exact(4);
    let tail = chunks.remainder();

    for chunk in chunks {
        let k = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        h ^= scramble(k);
        h = h.rotate_left(13).wrapping_mul(5).wrapping_add(0xe654_6b64);
    }

    if !tail.is_empty() {
        let k = tail
            .iter()
            .enumerate()
            .fold(0u32, |k, (idx, byte)| k ^ (u32::from(*byte) << (8 * idx)));
        h ^= scramble(k);
    }

    h ^= data.len() as u32;
    fmix32(h)
}

#[inline]
fn scramble(k: u32) -> u32 {
    k.wrapping_mul(C1).rotate_left(15).wrapping_mul(C2)
}

#[inline]
fn fmix32(mut h: u32) -> u32 {
    h ^= h >> 16;
    h = h.wrapping_mul(0x85eb_ca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2_ae35);
    h ^= h >> 16;
    h
}

/// Map an arbitrary seed string to a real number in [0, 1).
pub fn luck(seed: &str) -> f64 {
    f64::from(murmur3_32(seed.as_bytes(), 0)) / 4_294_967_296.0
}

/// Spawn roll for a cell: a cache exists iff `luck("i,j") < probability`.
pub fn spawns_cache(cell: Cell, probability: f64) -> bool {
    luck(&cell.key()) < probability
}

/// Initial coin count for a freshly generated cache at `cell`.
pub fn initial_coin_count(cell: Cell) -> u32 {
    coin_count_from_luck(luck(&format!("{},{}", cell.key(), INITIAL_VALUE_SALT)))
}

/// `floor(value * MAX_INITIAL_COINS)`.
pub fn coin_count_from_luck(value: f64) -> u32 {
    (value * f64::from(MAX_INITIAL_COINS)).floor() as u32
}
