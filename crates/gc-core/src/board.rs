use std::collections::BTreeMap;

use tracing::debug;

use crate::cell::Cell;
use crate::error::Result;
use crate::geocache::Geocache;
use crate::luck::spawns_cache;
use crate::memento::Memento;

/// Sparse, lazily materialized mapping from cells to cache state.
///
/// Only caches that have been mutated are remembered, as mementos in
/// `known_cells`. Every other cache is regenerated from `luck` whenever it
/// is looked up, which yields the same content every time.
#[derive(Clone, Debug)]
pub struct Board {
    spawn_probability: f64,
    known_cells: BTreeMap<Cell, String>,
}

impl Board {
    pub fn new(spawn_probability: f64) -> Self {
        Self::with_known_cells(spawn_probability, BTreeMap::new())
    }

    pub fn with_known_cells(spawn_probability: f64, known_cells: BTreeMap<Cell, String>) -> Self {
        Self {
            spawn_probability,
            known_cells,
        }
    }

    pub fn spawn_probability(&self) -> f64 {
        self.spawn_probability
    }

    /// Whether the spawn roll places a cache at `cell`.
    pub fn spawns_at(&self, cell: Cell) -> bool {
        spawns_cache(cell, self.spawn_probability)
    }

    /// Resolve the cache at `cell`.
    ///
    /// A remembered memento wins over generation. Otherwise the spawn roll
    /// decides: `None` for an empty cell, or freshly generated content that
    /// is not remembered until it is first saved.
    pub fn get_or_create(&self, cell: Cell) -> Result<Option<Geocache>> {
        if let Some(memento) = self.known_cells.get(&cell) {
            debug!(%cell, "restoring cache from memento");
            return Geocache::from_memento(cell, memento).map(Some);
        }
        if !self.spawns_at(cell) {
            return Ok(None);
        }
        let cache = Geocache::generate(cell);
        debug!(%cell, coins = cache.len(), "generated cache");
        Ok(Some(cache))
    }

    /// Remember the current state of `cache`.
    pub fn save(&mut self, cache: &Geocache) {
        self.known_cells.insert(cache.cell(), cache.to_memento());
    }

    /// The caches among `cells` whose spawn roll succeeds, in input order.
    pub fn list_active(&self, cells: &[Cell]) -> Result<Vec<Geocache>> {
        let mut caches = Vec::new();
        for &cell in cells {
            if !self.spawns_at(cell) {
                continue;
            }
            if let Some(cache) = self.get_or_create(cell)? {
                caches.push(cache);
            }
        }
        Ok(caches)
    }

    pub fn known_cells(&self) -> &BTreeMap<Cell, String> {
        &self.known_cells
    }

    pub fn is_known(&self, cell: Cell) -> bool {
        self.known_cells.contains_key(&cell)
    }

    pub fn clear(&mut self) {
        self.known_cells.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CACHE_CELL: Cell = Cell::new(2, 2);
    const EMPTY_CELL: Cell = Cell::new(0, 0);

    #[test]
    fn test_empty_cell_has_no_cache() {
        let board = Board::new(0.1);
        assert!(board.get_or_create(EMPTY_CELL).unwrap().is_none());
    }

    #[test]
    fn test_generated_cache_not_remembered() {
        let board = Board::new(0.1);
        let cache = board.get_or_create(CACHE_CELL).unwrap().unwrap();
        assert_eq!(cache.len(), 26);
        assert!(!board.is_known(CACHE_CELL));
        assert_eq!(board.get_or_create(CACHE_CELL).unwrap().unwrap(), cache);
    }

    #[test]
    fn test_memento_wins_over_generation() {
        let mut board = Board::new(0.1);
        let cache = Geocache::from_memento(CACHE_CELL, "9,9,1;2,2,0").unwrap();
        board.save(&cache);

        assert_eq!(board.known_cells()[&CACHE_CELL], "9,9,1;2,2,0");
        assert_eq!(board.get_or_create(CACHE_CELL).unwrap().unwrap(), cache);
    }

    #[test]
    fn test_saved_empty_cache_stays_empty() {
        let mut board = Board::new(0.1);
        board.save(&Geocache::empty(CACHE_CELL));
        let cache = board.get_or_create(CACHE_CELL).unwrap().unwrap();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_list_active_filters_spawn_roll() {
        let board = Board::new(0.1);
        let cells = [EMPTY_CELL, CACHE_CELL, Cell::new(-1, -3), Cell::new(1, 1)];
        let active: Vec<Cell> = board
            .list_active(&cells)
            .unwrap()
            .iter()
            .map(Geocache::cell)
            .collect();
        assert_eq!(active, vec![CACHE_CELL, Cell::new(-1, -3)]);
    }

    #[test]
    fn test_clear_forgets_mutations() {
        let mut board = Board::new(0.1);
        board.save(&Geocache::empty(CACHE_CELL));
        board.clear();
        assert!(board.known_cells().is_empty());
        assert_eq!(board.get_or_create(CACHE_CELL).unwrap().unwrap().len(), 26);
    }
}
