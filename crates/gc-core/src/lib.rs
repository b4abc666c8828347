//! Geocoin world model.
//!
//! The world is an integer grid of tiles over latitude/longitude. A tile may
//! hold a cache of coins; whether it does, and how many coins it starts with,
//! is a pure function of the tile's indices. Coins move one at a time between
//! caches and the player's wallet, and only the caches that were actually
//! touched are remembered, as compact string mementos.
//!
//! Zero I/O: persistence goes through the `KeyValueStore` trait.

pub mod board;
pub mod cell;
pub mod coin;
pub mod config;
pub mod constants;
pub mod error;
pub mod geocache;
pub mod luck;
pub mod memento;
pub mod persist;
pub mod session;
pub mod tracker;
pub mod transfer;
pub mod wallet;

pub use board::Board;
pub use cell::{Cell, CellBounds, CellIndex, LatLng};
pub use coin::Coin;
pub use config::WorldConfig;
pub use constants::{
    CACHE_SPAWN_PROBABILITY, MAX_INITIAL_COINS, NEIGHBORHOOD_SIZE, START_LAT, START_LNG,
    TILE_DEGREES,
};
pub use error::{Result, StackSource, WorldError};
pub use geocache::Geocache;
pub use luck::luck;
pub use memento::Memento;
pub use persist::{KeyValueStore, MemoryStore};
pub use session::{CacheStatus, LoadIssue, Session, StatusReport, TransferReport};
pub use tracker::{Direction, PositionTracker, SensorMode};
pub use wallet::Wallet;
