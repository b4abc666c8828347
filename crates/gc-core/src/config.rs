use serde::{Deserialize, Serialize};

use crate::cell::{CellIndex, LatLng};
use crate::constants::{
    CACHE_SPAWN_PROBABILITY, MAX_NEIGHBORHOOD_RADIUS, MIN_TILE_DEGREES, NEIGHBORHOOD_SIZE,
    START_LAT, START_LNG, TILE_DEGREES,
};

/// Fixed parameters of a world. Two sessions with the same config see the
/// same caches in the same cells.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub tile_degrees: f64,
    pub neighborhood_radius: i32,
    pub spawn_probability: f64,
    pub start: LatLng,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            tile_degrees: TILE_DEGREES,
            neighborhood_radius: NEIGHBORHOOD_SIZE,
            spawn_probability: CACHE_SPAWN_PROBABILITY,
            start: LatLng::new(START_LAT, START_LNG),
        }
    }
}

impl WorldConfig {
    pub fn cell_index(&self) -> CellIndex {
        CellIndex::new(self.tile_degrees)
    }

    /// Check ranges. Returns a description of the first problem found.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if !(self.tile_degrees.is_finite() && self.tile_degrees >= MIN_TILE_DEGREES) {
            return Err(format!(
                "tile_degrees must be at least {MIN_TILE_DEGREES}, got {}",
                self.tile_degrees
            ));
        }
        if !(0..=MAX_NEIGHBORHOOD_RADIUS).contains(&self.neighborhood_radius) {
            return Err(format!(
                "neighborhood_radius must be within [0, {MAX_NEIGHBORHOOD_RADIUS}], got {}",
                self.neighborhood_radius
            ));
        }
        if !(0.0..=1.0).contains(&self.spawn_probability) {
            return Err(format!(
                "spawn_probability must be within [0, 1], got {}",
                self.spawn_probability
            ));
        }
        if !self.start.is_valid() {
            return Err(format!("start must be a valid lat,lng, got {}", self.start));
        }
        Ok(())
    }
}
