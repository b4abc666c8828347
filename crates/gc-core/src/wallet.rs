use serde::Serialize;

use crate::coin::Coin;
use crate::error::Result;
use crate::memento::{Memento, decode_coins, encode_coins};

/// The coins the player is carrying. A LIFO stack, top at the end.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Wallet {
    coins: Vec<Coin>,
}

impl Wallet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn coins(&self) -> &[Coin] {
        &self.coins
    }

    pub fn len(&self) -> usize {
        self.coins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coins.is_empty()
    }

    /// The most recently collected coin.
    pub fn top(&self) -> Option<&Coin> {
        self.coins.last()
    }

    /// One-line status: count plus the coin on top.
    pub fn summary(&self) -> String {
        match self.top() {
            None => "No coins yet...".to_string(),
            Some(top) => format!("{} coins (Last coin: {top})", self.len()),
        }
    }

    pub(crate) fn from_coins(coins: Vec<Coin>) -> Self {
        Self { coins }
    }

    pub(crate) fn push(&mut self, coin: Coin) {
        self.coins.push(coin);
    }

    pub(crate) fn pop(&mut self) -> Option<Coin> {
        self.coins.pop()
    }

    pub(crate) fn clear(&mut self) {
        self.coins.clear();
    }
}

impl Memento for Wallet {
    fn to_memento(&self) -> String {
        encode_coins(&self.coins)
    }

    fn restore(&mut self, memento: &str) -> Result<()> {
        self.coins = decode_coins(memento)?;
        Ok(())
    }
}
