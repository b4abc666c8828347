use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{MAX_LAT, MAX_LNG, MIN_TILE_DEGREES};

/// A continuous geographic coordinate in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }

    /// Finite, with `|lat| <= 90` and `|lng| <= 180`.
    pub fn is_valid(&self) -> bool {
        self.is_finite() && self.lat.abs() <= MAX_LAT && self.lng.abs() <= MAX_LNG
    }
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

/// Canonical grid coordinate. `i` follows latitude, `j` follows longitude.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub i: i32,
    pub j: i32,
}

impl Cell {
    pub const fn new(i: i32, j: i32) -> Self {
        Self { i, j }
    }

    /// Saturates at the edges of the index space.
    pub fn offset(self, di: i32, dj: i32) -> Self {
        Self::new(self.i.saturating_add(di), self.j.saturating_add(dj))
    }

    /// The `"i,j"` key used for spawn rolls and persisted known-cell entries.
    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.i, self.j)
    }
}

/// Axis-aligned rectangle covered by one cell, half-open on the north and
/// east edges.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CellBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl CellBounds {
    pub fn contains(&self, point: LatLng) -> bool {
        point.lat >= self.south_west.lat
            && point.lat < self.north_east.lat
            && point.lng >= self.south_west.lng
            && point.lng < self.north_east.lng
    }

    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.south_west.lat + self.north_east.lat) / 2.0,
            (self.south_west.lng + self.north_east.lng) / 2.0,
        )
    }
}

/// Coordinate transform between continuous positions and grid cells.
///
/// A cell `(i, j)` is anchored at `(i * w, j * w)` and covers the tile of
/// width `w` centred on that anchor, so rounding a coordinate to the nearest
/// anchor and testing containment in a cell's bounds always agree.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellIndex {
    tile_degrees: f64,
}

impl CellIndex {
    /// `tile_degrees` must be finite and at least `MIN_TILE_DEGREES`; only
    /// debug builds check this. `WorldConfig::validate` enforces it for
    /// configured worlds.
    pub fn new(tile_degrees: f64) -> Self {
        debug_assert!(
            tile_degrees.is_finite() && tile_degrees >= MIN_TILE_DEGREES,
            "tile width must be at least {MIN_TILE_DEGREES}, got {tile_degrees}"
        );
        Self { tile_degrees }
    }

    pub fn tile_degrees(&self) -> f64 {
        self.tile_degrees
    }

    pub fn cell_of(&self, point: LatLng) -> Cell {
        Cell::new(
            round_half_up(point.lat / self.tile_degrees),
            round_half_up(point.lng / self.tile_degrees),
        )
    }

    /// The tile-aligned anchor of a cell: `(i * w, j * w)`.
    pub fn center_of(&self, cell: Cell) -> LatLng {
        LatLng::new(
            f64::from(cell.i) * self.tile_degrees,
            f64::from(cell.j) * self.tile_degrees,
        )
    }

    pub fn bounds_of(&self, cell: Cell) -> CellBounds {
        let w = self.tile_degrees;
        CellBounds {
            south_west: LatLng::new(
                (f64::from(cell.i) - 0.5) * w,
                (f64::from(cell.j) - 0.5) * w,
            ),
            north_east: LatLng::new(
                (f64::from(cell.i) + 0.5) * w,
                (f64::from(cell.j) + 0.5) * w,
            ),
        }
    }

    /// Every cell in the `(2r + 1)²` square around the cell containing
    /// `center`, in row-major order.
    pub fn neighborhood(&self, center: LatLng, radius: i32) -> Vec<Cell> {
        let origin = self.cell_of(center);
        let radius = radius.max(0);
        let side = 2 * radius as usize + 1;
        let mut cells = Vec::with_capacity(side * side);
        for di in -radius..=radius {
            for dj in -radius..=radius {
                cells.push(origin.offset(di, dj));
            }
        }
        cells
    }
}

/// Round to nearest, ties toward positive infinity.
fn round_half_up(x: f64) -> i32 {
    (x + 0.5).floor() as i32
}
