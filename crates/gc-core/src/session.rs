use serde::Serialize;
use tracing::{info, warn};

use crate::board::Board;
use crate::cell::{Cell, CellIndex, LatLng};
use crate::coin::Coin;
use crate::config::WorldConfig;
use crate::error::{Result, WorldError};
use crate::geocache::Geocache;
use crate::memento::Memento;
use crate::persist::{
    ALL_KEYS, CUR_POS_KEY, KNOWN_CELLS_KEY, KeyValueStore, TRAVEL_HIST_KEY, WALLET_KEY,
    decode_history, decode_known_cells, decode_position, decode_wallet, encode_history,
    encode_known_cells, encode_position,
};
use crate::tracker::{Direction, PositionTracker, SensorMode};
use crate::transfer;
use crate::wallet::Wallet;

/// A persisted value that failed to parse on load. The store it belongs to
/// was reset to its default and the session carried on.
#[derive(Clone, Debug, PartialEq)]
pub struct LoadIssue {
    pub key: &'static str,
    pub error: WorldError,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CacheStatus {
    pub cell: Cell,
    pub coins: usize,
}

/// What the presentation layer needs to refresh after a mutation.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StatusReport {
    pub position: LatLng,
    pub cell: Cell,
    pub wallet_coins: usize,
    pub wallet_summary: String,
    pub sensor: SensorMode,
    /// The cache touched by the operation, if any.
    pub cache: Option<CacheStatus>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TransferReport {
    pub coin: Coin,
    pub status: StatusReport,
}

/// All state of one player's session, plus the store it is persisted to.
///
/// Every mutation goes through `&mut self`, works on a copy of the state
/// it touches, and adopts that copy only once the affected keys are
/// written. A failed write leaves the session as it was.
pub struct Session<S> {
    config: WorldConfig,
    index: CellIndex,
    board: Board,
    wallet: Wallet,
    tracker: PositionTracker,
    store: S,
}

impl<S: KeyValueStore> Session<S> {
    /// A fresh session at the configured start. Ignores whatever `store`
    /// already holds until the first write.
    pub fn new(config: WorldConfig, store: S) -> Self {
        let index = config.cell_index();
        let board = Board::new(config.spawn_probability);
        let tracker = PositionTracker::new(config.start);
        Self {
            config,
            index,
            board,
            wallet: Wallet::new(),
            tracker,
            store,
        }
    }

    /// Restore a session from `store`.
    ///
    /// Each persisted key is parsed on its own. A value that does not parse
    /// is reported as a `LoadIssue` and replaced by its default; only a
    /// failing store is an error.
    pub fn load(config: WorldConfig, store: S) -> Result<(Self, Vec<LoadIssue>)> {
        let mut issues = Vec::new();
        let start = config.start;

        let position = load_key(
            &store,
            CUR_POS_KEY,
            |v| decode_position(CUR_POS_KEY, v),
            &mut issues,
        )?
        .unwrap_or(start);
        let history = load_key(&store, TRAVEL_HIST_KEY, decode_history, &mut issues)?
            .unwrap_or_else(|| vec![start]);
        let coins = load_key(&store, WALLET_KEY, decode_wallet, &mut issues)?.unwrap_or_default();
        let known = load_key(&store, KNOWN_CELLS_KEY, decode_known_cells, &mut issues)?
            .unwrap_or_default();

        info!(
            position = %position,
            history = history.len(),
            wallet = coins.len(),
            known_cells = known.len(),
            issues = issues.len(),
            "session loaded"
        );

        let session = Self {
            index: config.cell_index(),
            board: Board::with_known_cells(config.spawn_probability, known),
            wallet: Wallet::from_coins(coins),
            tracker: PositionTracker::restore(start, position, history),
            config,
            store,
        };
        Ok((session, issues))
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn index(&self) -> &CellIndex {
        &self.index
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn wallet(&self) -> &Wallet {
        &self.wallet
    }

    pub fn tracker(&self) -> &PositionTracker {
        &self.tracker
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn position(&self) -> LatLng {
        self.tracker.position()
    }

    pub fn current_cell(&self) -> Cell {
        self.index.cell_of(self.tracker.position())
    }

    /// Cells in the square neighborhood around the player.
    pub fn visible_cells(&self) -> Vec<Cell> {
        self.index
            .neighborhood(self.tracker.position(), self.config.neighborhood_radius)
    }

    /// Caches the presentation layer should draw around the player.
    pub fn visible_caches(&self) -> Result<Vec<Geocache>> {
        self.board.list_active(&self.visible_cells())
    }

    pub fn cache_at(&self, cell: Cell) -> Result<Option<Geocache>> {
        self.board.get_or_create(cell)
    }

    pub fn in_reach(&self, cell: Cell) -> bool {
        let here = self.current_cell();
        let radius = i64::from(self.config.neighborhood_radius);
        (i64::from(cell.i) - i64::from(here.i)).abs() <= radius
            && (i64::from(cell.j) - i64::from(here.j)).abs() <= radius
    }

    fn reachable_cache(&self, cell: Cell) -> Result<Geocache> {
        if !self.in_reach(cell) {
            return Err(WorldError::OutOfReach(cell));
        }
        self.board
            .get_or_create(cell)?
            .ok_or(WorldError::NoCache(cell))
    }

    /// Take the top coin of the cache at `cell` into the wallet.
    pub fn collect(&mut self, cell: Cell) -> Result<TransferReport> {
        let mut cache = self.reachable_cache(cell)?;
        let mut board = self.board.clone();
        let mut wallet = self.wallet.clone();
        let coin = transfer::collect(&mut board, &mut wallet, &mut cache)?;
        self.commit_transfer(board, wallet)?;
        info!(%coin, %cell, "coin collected");
        Ok(TransferReport {
            coin,
            status: self.status_with(Some(&cache)),
        })
    }

    /// Put the wallet's top coin onto the cache at `cell`.
    pub fn deposit(&mut self, cell: Cell) -> Result<TransferReport> {
        let mut cache = self.reachable_cache(cell)?;
        let mut board = self.board.clone();
        let mut wallet = self.wallet.clone();
        let coin = transfer::deposit(&mut board, &mut wallet, &mut cache)?;
        self.commit_transfer(board, wallet)?;
        info!(%coin, %cell, "coin deposited");
        Ok(TransferReport {
            coin,
            status: self.status_with(Some(&cache)),
        })
    }

    /// Manual one-tile move. Refused while the sensor is tracking.
    pub fn step(&mut self, direction: Direction) -> Result<StatusReport> {
        let mut tracker = self.tracker.clone();
        let position = tracker.step(&self.index, direction)?;
        self.commit_position(tracker)?;
        info!(%direction, %position, "moved");
        Ok(self.status())
    }

    /// Apply a sensor fix.
    pub fn locate(&mut self, point: LatLng) -> Result<StatusReport> {
        let mut tracker = self.tracker.clone();
        let position = tracker.set_absolute(point)?;
        self.commit_position(tracker)?;
        info!(%position, "position fix applied");
        Ok(self.status())
    }

    pub fn toggle_sensor(&mut self) -> SensorMode {
        let mode = self.tracker.toggle_sensor();
        info!(?mode, "sensor toggled");
        mode
    }

    /// Stop sensor tracking; idempotent.
    pub fn stop_sensor(&mut self) -> bool {
        self.tracker.stop_tracking()
    }

    /// Forget everything: start position, single-entry history, empty
    /// wallet, no remembered caches.
    pub fn reset(&mut self) -> Result<StatusReport> {
        self.store.remove_many(&ALL_KEYS)?;
        self.board.clear();
        self.wallet.clear();
        self.tracker.reset();
        info!("session reset");
        Ok(self.status())
    }

    pub fn status(&self) -> StatusReport {
        self.status_with(None)
    }

    fn status_with(&self, cache: Option<&Geocache>) -> StatusReport {
        StatusReport {
            position: self.tracker.position(),
            cell: self.current_cell(),
            wallet_coins: self.wallet.len(),
            wallet_summary: self.wallet.summary(),
            sensor: self.tracker.sensor_mode(),
            cache: cache.map(|c| CacheStatus {
                cell: c.cell(),
                coins: c.len(),
            }),
        }
    }

    /// Write the new board and wallet, then adopt them. On a store error
    /// the session keeps its previous state.
    fn commit_transfer(&mut self, board: Board, wallet: Wallet) -> Result<()> {
        let known_cells = encode_known_cells(board.known_cells());
        let coins = wallet.to_memento();
        self.store
            .set_many(&[(KNOWN_CELLS_KEY, &known_cells), (WALLET_KEY, &coins)])?;
        self.board = board;
        self.wallet = wallet;
        Ok(())
    }

    fn commit_position(&mut self, tracker: PositionTracker) -> Result<()> {
        let position = encode_position(tracker.position());
        let history = encode_history(tracker.history());
        self.store
            .set_many(&[(CUR_POS_KEY, &position), (TRAVEL_HIST_KEY, &history)])?;
        self.tracker = tracker;
        Ok(())
    }
}

fn load_key<S, T>(
    store: &S,
    key: &'static str,
    decode: impl Fn(&str) -> Result<T>,
    issues: &mut Vec<LoadIssue>,
) -> Result<Option<T>>
where
    S: KeyValueStore,
{
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };
    match decode(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(error) => {
            warn!(key, %error, "persisted value unreadable, using default");
            issues.push(LoadIssue { key, error });
            Ok(None)
        }
    }
}
