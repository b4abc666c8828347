/// Width of one grid cell in degrees of latitude/longitude
pub const TILE_DEGREES: f64 = 1e-4;

/// Cells drawn in each direction around the player's cell
pub const NEIGHBORHOOD_SIZE: i32 = 6;

/// Chance that any given cell holds a cache
pub const CACHE_SPAWN_PROBABILITY: f64 = 0.1;

/// Initial coin counts are drawn from [0, MAX_INITIAL_COINS)
pub const MAX_INITIAL_COINS: u32 = 100;

/// Salt appended to a cell key when drawing its initial coin count,
/// so the count is independent of the spawn roll for the same cell.
pub const INITIAL_VALUE_SALT: &str = "initialValue";

/// Merrill College classroom, the default starting point.
pub const START_LAT: f64 = 36.9995;
pub const START_LNG: f64 = -122.0533;

/// Smallest accepted tile width. Keeps every valid coordinate's cell index,
/// plus any neighborhood offset, well inside `i32`.
pub const MIN_TILE_DEGREES: f64 = 1e-6;

/// Largest accepted neighborhood radius.
pub const MAX_NEIGHBORHOOD_RADIUS: i32 = 64;

pub const MAX_LAT: f64 = 90.0;
pub const MAX_LNG: f64 = 180.0;
