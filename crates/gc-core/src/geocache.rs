use serde::Serialize;

use crate::cell::Cell;
use crate::coin::Coin;
use crate::error::Result;
use crate::luck::initial_coin_count;
use crate::memento::{Memento, decode_coins, encode_coins};

/// A cache at one grid cell: a LIFO stack of coins, top at the end.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Geocache {
    cell: Cell,
    coins: Vec<Coin>,
}

impl Geocache {
    pub fn empty(cell: Cell) -> Self {
        Self {
            cell,
            coins: Vec::new(),
        }
    }

    /// Deterministic initial content for `cell`: `count` coins minted at
    /// this cell with serials `0..count`, serial 0 at the bottom.
    pub fn generate(cell: Cell) -> Self {
        Self::with_coin_count(cell, initial_coin_count(cell))
    }

    pub fn with_coin_count(cell: Cell, count: u32) -> Self {
        Self {
            cell,
            coins: (0..count).map(|serial| Coin::new(cell, serial)).collect(),
        }
    }

    pub fn from_memento(cell: Cell, memento: &str) -> Result<Self> {
        Ok(Self {
            cell,
            coins: decode_coins(memento)?,
        })
    }

    pub fn cell(&self) -> Cell {
        self.cell
    }

    /// Coins from bottom to top.
    pub fn coins(&self) -> &[Coin] {
        &self.coins
    }

    pub fn len(&self) -> usize {
        self.coins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coins.is_empty()
    }

    /// The coin the next collect would take.
    pub fn top(&self) -> Option<&Coin> {
        self.coins.last()
    }

    pub(crate) fn push(&mut self, coin: Coin) {
        self.coins.push(coin);
    }

    pub(crate) fn pop(&mut self) -> Option<Coin> {
        self.coins.pop()
    }
}

impl Memento for Geocache {
    fn to_memento(&self) -> String {
        encode_coins(&self.coins)
    }

    fn restore(&mut self, memento: &str) -> Result<()> {
        self.coins = decode_coins(memento)?;
        Ok(())
    }
}
