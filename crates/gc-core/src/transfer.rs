//! Moving single coins between a cache and the wallet.
//!
//! Both operations only move a coin; the multiset of coins across all
//! caches plus the wallet never changes. When the source stack is empty the
//! result is `EmptyStack` and nothing, including the board, is touched.

use tracing::debug;

use crate::board::Board;
use crate::coin::Coin;
use crate::error::{Result, StackSource, WorldError};
use crate::geocache::Geocache;
use crate::wallet::Wallet;

/// Take the top coin of `cache` into the wallet, then remember the cache.
pub fn collect(board: &mut Board, wallet: &mut Wallet, cache: &mut Geocache) -> Result<Coin> {
    let coin = cache
        .pop()
        .ok_or(WorldError::EmptyStack(StackSource::Cache))?;
    wallet.push(coin);
    board.save(cache);
    debug!(%coin, cell = %cache.cell(), left = cache.len(), "collected");
    Ok(coin)
}

/// Put the wallet's top coin onto `cache`, then remember the cache.
pub fn deposit(board: &mut Board, wallet: &mut Wallet, cache: &mut Geocache) -> Result<Coin> {
    let coin = wallet
        .pop()
        .ok_or(WorldError::EmptyStack(StackSource::Wallet))?;
    cache.push(coin);
    board.save(cache);
    debug!(%coin, cell = %cache.cell(), held = wallet.len(), "deposited");
    Ok(coin)
}
