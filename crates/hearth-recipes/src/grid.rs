//! Grid inventory views.
//!
//! Matching code consumes inventories through the [`GridInventory`] trait so
//! a host can expose its own live containers. [`CraftingGrid`] is the
//! concrete value-type implementation used by tests and by hosts that build
//! grids out of snapshots directly.
//!
//! An absent slot and an empty peek both denote "no item" to matching code,
//! but the two are distinct at this layer: a slot missing *inside* the
//! declared `rows x columns` bounds is a broken container contract, which
//! matchers report by panicking rather than treating as "no match".

use serde::{Deserialize, Serialize};

use hearth_common::ItemStackSnapshot;

/// Maximum supported grid dimension.
pub const MAX_GRID_SIZE: u32 = 9;

/// A single inventory slot.
pub trait Slot {
    /// Returns a snapshot of the slot contents, or `None` when empty.
    fn peek(&self) -> Option<ItemStackSnapshot>;
}

/// A rectangular view over item slots.
pub trait GridInventory {
    /// Number of rows (the Y extent).
    fn rows(&self) -> u32;

    /// Number of columns (the X extent).
    fn columns(&self) -> u32;

    /// The slot at `(x, y)`, or `None` when no such slot exists.
    fn slot(&self, x: u32, y: u32) -> Option<&dyn Slot>;
}

/// Snapshot of the grid cell at `(x, y)`, with absent-slot-out-of-bounds
/// treated as a contract violation.
///
/// # Panics
/// Panics when `(x, y)` lies inside the grid's declared bounds but the grid
/// returns no slot for it. Callers are expected to stay inside
/// `columns() x rows()`.
#[must_use]
pub fn snapshot_at(grid: &dyn GridInventory, x: u32, y: u32) -> ItemStackSnapshot {
    let slot = grid.slot(x, y).unwrap_or_else(|| {
        panic!(
            "slot ({x}, {y}) missing from a {}x{} grid",
            grid.columns(),
            grid.rows()
        )
    });
    slot.peek().unwrap_or(ItemStackSnapshot::EMPTY)
}

impl Slot for ItemStackSnapshot {
    fn peek(&self) -> Option<ItemStackSnapshot> {
        if self.is_empty() {
            None
        } else {
            Some(self.clone())
        }
    }
}

/// A concrete crafting grid backed by a row-major snapshot vector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CraftingGrid {
    columns: u32,
    rows: u32,
    slots: Vec<ItemStackSnapshot>,
}

impl Default for CraftingGrid {
    fn default() -> Self {
        Self::new(3, 3)
    }
}

impl CraftingGrid {
    /// Creates an empty grid with the given dimensions.
    ///
    /// # Panics
    /// Panics if either dimension is zero or exceeds [`MAX_GRID_SIZE`].
    #[must_use]
    pub fn new(columns: u32, rows: u32) -> Self {
        assert!(
            columns > 0 && columns <= MAX_GRID_SIZE,
            "Invalid grid width"
        );
        assert!(rows > 0 && rows <= MAX_GRID_SIZE, "Invalid grid height");

        Self {
            columns,
            rows,
            slots: vec![ItemStackSnapshot::EMPTY; (columns * rows) as usize],
        }
    }

    /// Creates a 2x2 grid (inventory crafting).
    #[must_use]
    pub fn inventory() -> Self {
        Self::new(2, 2)
    }

    /// Creates a 3x3 grid (workbench).
    #[must_use]
    pub fn workbench() -> Self {
        Self::new(3, 3)
    }

    /// Places a snapshot at `(x, y)`. Returns false when out of bounds.
    pub fn set(&mut self, x: u32, y: u32, snapshot: ItemStackSnapshot) -> bool {
        if x < self.columns && y < self.rows {
            self.slots[(y * self.columns + x) as usize] = snapshot;
            true
        } else {
            false
        }
    }

    /// The snapshot at `(x, y)`, or `None` when out of bounds.
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> Option<&ItemStackSnapshot> {
        if x < self.columns && y < self.rows {
            Some(&self.slots[(y * self.columns + x) as usize])
        } else {
            None
        }
    }

    /// Empties every slot.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = ItemStackSnapshot::EMPTY;
        }
    }

    /// Checks whether every slot is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(ItemStackSnapshot::is_empty)
    }

    /// Counts non-empty slots.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.slots.iter().filter(|s| !s.is_empty()).count()
    }
}

impl GridInventory for CraftingGrid {
    fn rows(&self) -> u32 {
        self.rows
    }

    fn columns(&self) -> u32 {
        self.columns
    }

    fn slot(&self, x: u32, y: u32) -> Option<&dyn Slot> {
        self.get(x, y).map(|s| s as &dyn Slot)
    }
}
