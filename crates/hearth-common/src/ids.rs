//! ID types for items and resources.

use serde::{Deserialize, Serialize};

/// Unique identifier for an item type in the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemTypeId(u32);

impl ItemTypeId {
    /// Creates an item type ID from a raw value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// The "no item" type.
    pub const NONE: Self = Self(0);

    /// Checks whether this is the "no item" type.
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }
}
