use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::cell::{CellIndex, LatLng};
use crate::error::{Result, WorldError};

/// One manual movement step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// Cell offset `(di, dj)` for one step.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (1, 0),
            Direction::South => (-1, 0),
            Direction::East => (0, 1),
            Direction::West => (0, -1),
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "north" | "n" => Ok(Direction::North),
            "south" | "s" => Ok(Direction::South),
            "east" | "e" => Ok(Direction::East),
            "west" | "w" => Ok(Direction::West),
            other => Err(format!("unknown direction '{other}'")),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::North => "north",
            Direction::South => "south",
            Direction::East => "east",
            Direction::West => "west",
        };
        f.write_str(name)
    }
}

/// Whether position updates come from the sensor or the movement controls.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorMode {
    #[default]
    Idle,
    Tracking,
}

/// Current position plus the append-only log of every position reached.
///
/// Manual steps and sensor fixes are mutually exclusive: while the sensor is
/// tracking, `step` is refused.
#[derive(Clone, Debug, PartialEq)]
pub struct PositionTracker {
    start: LatLng,
    position: LatLng,
    history: Vec<LatLng>,
    sensor: SensorMode,
}

impl PositionTracker {
    pub fn new(start: LatLng) -> Self {
        Self {
            start,
            position: start,
            history: vec![start],
            sensor: SensorMode::Idle,
        }
    }

    /// Rebuild from persisted state. An empty history is reseeded with the
    /// start position.
    pub fn restore(start: LatLng, position: LatLng, mut history: Vec<LatLng>) -> Self {
        if history.is_empty() {
            history.push(start);
        }
        Self {
            start,
            position,
            history,
            sensor: SensorMode::Idle,
        }
    }

    pub fn start(&self) -> LatLng {
        self.start
    }

    pub fn position(&self) -> LatLng {
        self.position
    }

    pub fn history(&self) -> &[LatLng] {
        &self.history
    }

    pub fn sensor_mode(&self) -> SensorMode {
        self.sensor
    }

    pub fn manual_movement_enabled(&self) -> bool {
        self.sensor == SensorMode::Idle
    }

    /// Move one tile in `direction`, landing on the neighbouring cell's
    /// tile-aligned anchor.
    pub fn step(&mut self, index: &CellIndex, direction: Direction) -> Result<LatLng> {
        if !self.manual_movement_enabled() {
            return Err(WorldError::ManualMovementLocked);
        }
        let (di, dj) = direction.delta();
        let target = index.cell_of(self.position).offset(di, dj);
        self.advance_to(index.center_of(target));
        Ok(self.position)
    }

    /// Jump to a sensor-reported coordinate, kept verbatim. Rejects anything
    /// that is not a real latitude/longitude.
    pub fn set_absolute(&mut self, point: LatLng) -> Result<LatLng> {
        if !point.is_valid() {
            return Err(WorldError::InvalidCoordinate(point));
        }
        self.advance_to(point);
        Ok(self.position)
    }

    fn advance_to(&mut self, point: LatLng) {
        self.position = point;
        self.history.push(point);
    }

    /// Flip between `Idle` and `Tracking`; returns the new mode.
    pub fn toggle_sensor(&mut self) -> SensorMode {
        self.sensor = match self.sensor {
            SensorMode::Idle => SensorMode::Tracking,
            SensorMode::Tracking => SensorMode::Idle,
        };
        self.sensor
    }

    /// Stop tracking. Safe to call any number of times; returns whether
    /// tracking was active.
    pub fn stop_tracking(&mut self) -> bool {
        let was_tracking = self.sensor == SensorMode::Tracking;
        self.sensor = SensorMode::Idle;
        was_tracking
    }

    /// Back to the start with a single-entry history.
    pub fn reset(&mut self) {
        self.position = self.start;
        self.history.clear();
        self.history.push(self.start);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const START: LatLng = LatLng::new(36.9995, -122.0533);

    fn index() -> CellIndex {
        CellIndex::new(1e-4)
    }

    #[test]
    fn test_step_moves_one_tile() {
        let idx = index();
        let mut tracker = PositionTracker::new(START);
        let start_cell = idx.cell_of(START);

        let pos = tracker.step(&idx, Direction::North).unwrap();
        assert_eq!(idx.cell_of(pos), start_cell.offset(1, 0));
        assert_relative_eq!(pos.lat, START.lat + 1e-4, epsilon = 1e-9);
        assert_relative_eq!(pos.lng, START.lng, epsilon = 1e-9);

        tracker.step(&idx, Direction::West).unwrap();
        assert_eq!(idx.cell_of(tracker.position()), start_cell.offset(1, -1));
        assert_eq!(tracker.history().len(), 3);
    }

    #[test]
    fn test_steps_do_not_drift() {
        let idx = index();
        let mut tracker = PositionTracker::new(START);
        for _ in 0..1000 {
            tracker.step(&idx, Direction::East).unwrap();
        }
        for _ in 0..1000 {
            tracker.step(&idx, Direction::West).unwrap();
        }
        assert_eq!(idx.cell_of(tracker.position()), idx.cell_of(START));
        assert_eq!(tracker.position(), idx.center_of(idx.cell_of(START)));
    }

    #[test]
    fn test_set_absolute_keeps_coordinate() {
        let mut tracker = PositionTracker::new(START);
        let fix = LatLng::new(36.999_537, -122.053_318);
        tracker.set_absolute(fix).unwrap();
        assert_eq!(tracker.position(), fix);
        assert_eq!(tracker.history(), &[START, fix]);
    }

    #[test]
    fn test_set_absolute_rejects_nan() {
        let mut tracker = PositionTracker::new(START);
        let err = tracker.set_absolute(LatLng::new(f64::NAN, 0.0)).unwrap_err();
        assert!(matches!(err, WorldError::InvalidCoordinate(_)));
        assert_eq!(tracker.history().len(), 1);
    }

    #[test]
    fn test_set_absolute_rejects_out_of_range() {
        let mut tracker = PositionTracker::new(START);
        for bad in [LatLng::new(1.0e6, 0.0), LatLng::new(0.0, 181.0), LatLng::new(-90.5, 0.0)] {
            let err = tracker.set_absolute(bad).unwrap_err();
            assert_eq!(err, WorldError::InvalidCoordinate(bad));
        }
        assert_eq!(tracker.position(), START);
        assert_eq!(tracker.history().len(), 1);
    }

    #[test]
    fn test_tracking_locks_manual_movement() {
        let idx = index();
        let mut tracker = PositionTracker::new(START);
        assert_eq!(tracker.toggle_sensor(), SensorMode::Tracking);

        let err = tracker.step(&idx, Direction::South).unwrap_err();
        assert_eq!(err, WorldError::ManualMovementLocked);
        assert_eq!(tracker.position(), START);
        assert_eq!(tracker.history().len(), 1);

        assert_eq!(tracker.toggle_sensor(), SensorMode::Idle);
        assert!(tracker.step(&idx, Direction::South).is_ok());
    }

    #[test]
    fn test_stop_tracking_is_idempotent() {
        let mut tracker = PositionTracker::new(START);
        tracker.toggle_sensor();
        assert!(tracker.stop_tracking());
        assert!(!tracker.stop_tracking());
        assert_eq!(tracker.sensor_mode(), SensorMode::Idle);
    }

    #[test]
    fn test_reset_truncates_history() {
        let idx = index();
        let mut tracker = PositionTracker::new(START);
        tracker.step(&idx, Direction::North).unwrap();
        tracker.step(&idx, Direction::East).unwrap();
        tracker.reset();
        assert_eq!(tracker.position(), START);
        assert_eq!(tracker.history(), &[START]);
    }

    #[test]
    fn test_direction_parse() {
        assert_eq!("North".parse::<Direction>().unwrap(), Direction::North);
        assert_eq!("w".parse::<Direction>().unwrap(), Direction::West);
        assert!("up".parse::<Direction>().is_err());
    }
}
