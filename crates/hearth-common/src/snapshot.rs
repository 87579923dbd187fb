//! Immutable item stack snapshots.
//!
//! A snapshot describes the contents of an inventory slot at a point in
//! time, detached from any live game object: item type, metadata variant,
//! stack size, and an optional opaque extra-data blob. Recipes and grids
//! own their snapshots independently; cloning one never aliases live state.

use serde::{Deserialize, Serialize};

use crate::ids::ItemTypeId;

/// Reserved metadata value meaning "any variant" on the recipe side of a
/// legacy exact match.
pub const WILDCARD_METADATA: i32 = 32767;

/// Immutable description of an item stack.
///
/// Two snapshots compare equal when every field is equal, including stack
/// size and extra data. Matching code that wants looser semantics (the
/// legacy exact-match rule ignores size and extra data) implements its own
/// comparison on top of the accessors here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemStackSnapshot {
    item: ItemTypeId,
    metadata: i32,
    quantity: u32,
    extra: Option<Vec<u8>>,
}

impl ItemStackSnapshot {
    /// The empty stack.
    pub const EMPTY: Self = Self {
        item: ItemTypeId::NONE,
        metadata: 0,
        quantity: 0,
        extra: None,
    };

    /// Creates a snapshot of `quantity` items of the given type, metadata 0.
    #[must_use]
    pub const fn new(item: ItemTypeId, quantity: u32) -> Self {
        Self {
            item,
            metadata: 0,
            quantity,
            extra: None,
        }
    }

    /// Creates a snapshot with an explicit metadata variant.
    #[must_use]
    pub const fn with_metadata(item: ItemTypeId, quantity: u32, metadata: i32) -> Self {
        Self {
            item,
            metadata,
            quantity,
            extra: None,
        }
    }

    /// Returns a copy of this snapshot carrying an extra-data blob.
    #[must_use]
    pub fn with_extra(mut self, extra: Vec<u8>) -> Self {
        self.extra = Some(extra);
        self
    }

    /// The item type.
    #[must_use]
    pub const fn item(&self) -> ItemTypeId {
        self.item
    }

    /// The metadata variant.
    #[must_use]
    pub const fn metadata(&self) -> i32 {
        self.metadata
    }

    /// The stack size.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// The extra-data blob, if any.
    #[must_use]
    pub fn extra(&self) -> Option<&[u8]> {
        self.extra.as_deref()
    }

    /// Checks whether this snapshot describes "no item".
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.item.is_none() || self.quantity == 0
    }
}

impl Default for ItemStackSnapshot {
    fn default() -> Self {
        Self::EMPTY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_snapshot() {
        assert!(ItemStackSnapshot::EMPTY.is_empty());
        assert!(ItemStackSnapshot::default().is_empty());
        assert!(ItemStackSnapshot::new(ItemTypeId::new(7), 0).is_empty());
        assert!(!ItemStackSnapshot::new(ItemTypeId::new(7), 1).is_empty());
    }

    #[test]
    fn test_value_equality() {
        let a = ItemStackSnapshot::with_metadata(ItemTypeId::new(3), 4, 1);
        let b = ItemStackSnapshot::with_metadata(ItemTypeId::new(3), 4, 1);
        assert_eq!(a, b);

        let c = b.clone().with_extra(vec![1, 2, 3]);
        assert_ne!(a, c);
        assert_eq!(c.extra(), Some(&[1, 2, 3][..]));
    }
}
