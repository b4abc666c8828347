use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cell::Cell;

/// A uniquely identified coin. Its identity is fixed when its origin cache
/// is generated and never changes as it moves between wallet and caches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coin {
    pub origin: Cell,
    pub serial: u32,
}

impl Coin {
    pub const fn new(origin: Cell, serial: u32) -> Self {
        Self { origin, serial }
    }
}

/// Short human form, `i:j#serial`.
impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}#{}", self.origin.i, self.origin.j, self.serial)
    }
}
