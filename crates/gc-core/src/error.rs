use std::fmt;

use crate::cell::{Cell, LatLng};

/// Which stack a transfer tried to take a coin from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StackSource {
    Cache,
    Wallet,
}

impl fmt::Display for StackSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StackSource::Cache => write!(f, "cache"),
            StackSource::Wallet => write!(f, "wallet"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum WorldError {
    /// A memento record that is not exactly three integers.
    MalformedMemento { record: String, reason: String },
    /// Collect or deposit found nothing to move. Nothing was mutated.
    EmptyStack(StackSource),
    /// A persisted key whose value does not have the expected shape.
    InvalidPersistedValue { key: &'static str, reason: String },
    /// A coordinate that is not a finite latitude/longitude within range.
    InvalidCoordinate(LatLng),
    /// Manual movement was attempted while sensor tracking is active.
    ManualMovementLocked,
    /// A transfer targeted a cell that holds no cache.
    NoCache(Cell),
    /// A transfer targeted a cache outside the player's neighborhood.
    OutOfReach(Cell),
    /// The key-value store failed underneath the session.
    Storage(String),
}

impl fmt::Display for WorldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorldError::MalformedMemento { record, reason } => {
                write!(f, "malformed memento record '{record}': {reason}")
            }
            WorldError::EmptyStack(source) => write!(f, "the {source} has no coins"),
            WorldError::InvalidPersistedValue { key, reason } => {
                write!(f, "invalid persisted value for '{key}': {reason}")
            }
            WorldError::InvalidCoordinate(point) => {
                write!(f, "coordinate out of range: {point}")
            }
            WorldError::ManualMovementLocked => {
                write!(f, "manual movement is disabled while sensor tracking is on")
            }
            WorldError::NoCache(cell) => write!(f, "no cache at {cell}"),
            WorldError::OutOfReach(cell) => write!(f, "cache at {cell} is out of reach"),
            WorldError::Storage(msg) => write!(f, "storage error: {msg}"),
        }
    }
}

impl std::error::Error for WorldError {}

pub type Result<T> = std::result::Result<T, WorldError>;
