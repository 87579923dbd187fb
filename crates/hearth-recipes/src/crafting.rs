//! Crafting recipes and the crafting recipe registry.
//!
//! This module provides:
//! - The [`CraftingRecipe`] capability trait shared by shaped and shapeless
//!   recipes
//! - [`CraftingResult`], the output plus per-slot remainder items
//! - [`DelegateCraftingRecipe`], a forwarding adapter for foreign matching
//!   logic
//! - [`CraftingRecipeRegistry`], an ordered first-match-wins registry

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use hearth_common::ItemStackSnapshot;

use crate::grid::{snapshot_at, GridInventory};

/// Host-supplied rule mapping a consumed item to its post-consumption
/// remainder (a filled bucket becomes an empty one). `None` means the item
/// leaves nothing behind.
pub type ContainerRule = Arc<dyn Fn(&ItemStackSnapshot) -> Option<ItemStackSnapshot> + Send + Sync>;

/// The rule for hosts whose items never leave containers behind.
#[must_use]
pub fn no_containers() -> ContainerRule {
    Arc::new(|_| None)
}

/// Output of a successful crafting match.
///
/// Produced fresh per match and owned solely by the caller; mutating it never
/// affects the recipe it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CraftingResult {
    /// The crafted item.
    pub main_item: ItemStackSnapshot,
    /// One remainder per consumed slot, in grid raster order. Slots whose
    /// item leaves nothing behind contribute an empty snapshot.
    pub remaining_items: Vec<ItemStackSnapshot>,
}

impl CraftingResult {
    /// Creates a crafting result.
    #[must_use]
    pub const fn new(main_item: ItemStackSnapshot, remaining_items: Vec<ItemStackSnapshot>) -> Self {
        Self {
            main_item,
            remaining_items,
        }
    }
}

/// Computes the remainder list for a matched grid: one entry per non-empty
/// slot in raster order, substituting the container rule's answer or an
/// empty snapshot.
fn remaining_items(grid: &dyn GridInventory, containers: &ContainerRule) -> Vec<ItemStackSnapshot> {
    let mut remainders = Vec::new();
    for y in 0..grid.rows() {
        for x in 0..grid.columns() {
            let snapshot = snapshot_at(grid, x, y);
            if snapshot.is_empty() {
                continue;
            }
            remainders.push(containers(&snapshot).unwrap_or(ItemStackSnapshot::EMPTY));
        }
    }
    remainders
}

/// Capability set of a crafting recipe.
///
/// Implemented natively by [`ShapedRecipe`](crate::shaped::ShapedRecipe) and
/// [`ShapelessRecipe`](crate::shapeless::ShapelessRecipe); foreign matching
/// logic is lifted into this trait with [`DelegateCraftingRecipe`].
pub trait CraftingRecipe: Send + Sync {
    /// The canonical result stack, for display and registration purposes.
    fn exemplary_result(&self) -> ItemStackSnapshot;

    /// Tests whether the grid contains this recipe.
    ///
    /// # Panics
    /// Panics when the grid violates its own bounds contract (a slot missing
    /// inside `columns() x rows()`); absence of a match is a plain `false`.
    fn is_valid(&self, grid: &dyn GridInventory) -> bool;

    /// Computes the crafting result for the grid, or `None` when the recipe
    /// does not match.
    ///
    /// The main item is a fresh copy of the exemplary result; callers may
    /// mutate it freely.
    fn result(
        &self,
        grid: &dyn GridInventory,
        containers: &ContainerRule,
    ) -> Option<CraftingResult> {
        if !self.is_valid(grid) {
            return None;
        }
        Some(CraftingResult::new(
            self.exemplary_result(),
            remaining_items(grid, containers),
        ))
    }

    /// For forwarding adapters, the wrapped recipe; `None` for native
    /// recipes. Lets the registry treat a wrapper and its target as the same
    /// registration.
    fn delegate_target(&self) -> Option<&Arc<dyn CraftingRecipe>> {
        None
    }
}

/// Forwarding adapter lifting any [`CraftingRecipe`] handle into a distinct
/// registration while delegating every call to the wrapped recipe.
///
/// Hosts use this to register matching logic that lives behind another
/// ownership scheme; the registry sees through the wrapper when removing by
/// identity.
pub struct DelegateCraftingRecipe {
    inner: Arc<dyn CraftingRecipe>,
}

impl DelegateCraftingRecipe {
    /// Wraps a recipe handle.
    #[must_use]
    pub fn new(inner: Arc<dyn CraftingRecipe>) -> Self {
        Self { inner }
    }

    /// The wrapped recipe.
    #[must_use]
    pub fn inner(&self) -> &Arc<dyn CraftingRecipe> {
        &self.inner
    }
}

impl CraftingRecipe for DelegateCraftingRecipe {
    fn exemplary_result(&self) -> ItemStackSnapshot {
        self.inner.exemplary_result()
    }

    fn is_valid(&self, grid: &dyn GridInventory) -> bool {
        self.inner.is_valid(grid)
    }

    fn result(
        &self,
        grid: &dyn GridInventory,
        containers: &ContainerRule,
    ) -> Option<CraftingResult> {
        self.inner.result(grid, containers)
    }

    fn delegate_target(&self) -> Option<&Arc<dyn CraftingRecipe>> {
        Some(&self.inner)
    }
}

/// Identity comparison over recipe handles, seeing through delegates in
/// either direction.
fn same_registration(a: &Arc<dyn CraftingRecipe>, b: &Arc<dyn CraftingRecipe>) -> bool {
    fn thin(ptr: &Arc<dyn CraftingRecipe>) -> *const () {
        Arc::as_ptr(ptr).cast::<()>()
    }

    thin(a) == thin(b)
        || a.delegate_target().is_some_and(|t| thin(t) == thin(b))
        || b.delegate_target().is_some_and(|t| thin(t) == thin(a))
}

/// Ordered collection of crafting recipes.
///
/// Registration order is priority order: the first registered recipe that
/// matches a grid wins. Structurally identical recipes may coexist; identity
/// is per handle, not per value.
pub struct CraftingRecipeRegistry {
    recipes: Vec<Arc<dyn CraftingRecipe>>,
    containers: ContainerRule,
}

impl fmt::Debug for CraftingRecipeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CraftingRecipeRegistry")
            .field("recipes", &self.recipes.len())
            .finish_non_exhaustive()
    }
}

impl Default for CraftingRecipeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CraftingRecipeRegistry {
    /// Creates an empty registry with no container rule.
    #[must_use]
    pub fn new() -> Self {
        Self::with_container_rule(no_containers())
    }

    /// Creates an empty registry using the host's container rule for
    /// remainder computation.
    #[must_use]
    pub fn with_container_rule(containers: ContainerRule) -> Self {
        Self {
            recipes: Vec::new(),
            containers,
        }
    }

    /// Appends a recipe at the lowest priority.
    pub fn register(&mut self, recipe: Arc<dyn CraftingRecipe>) {
        debug!(total = self.recipes.len() + 1, "registered crafting recipe");
        self.recipes.push(recipe);
    }

    /// Removes a recipe by identity. Removing a recipe that is not present
    /// is a no-op.
    pub fn remove(&mut self, recipe: &Arc<dyn CraftingRecipe>) {
        if let Some(index) = self
            .recipes
            .iter()
            .position(|entry| same_registration(entry, recipe))
        {
            self.recipes.remove(index);
            debug!(total = self.recipes.len(), "removed crafting recipe");
        }
    }

    /// Read-only view of the registered recipes, in priority order.
    #[must_use]
    pub fn recipes(&self) -> &[Arc<dyn CraftingRecipe>] {
        &self.recipes
    }

    /// Number of registered recipes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    /// Checks whether no recipes are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Finds the first matching recipe in registration order, paired with
    /// its freshly computed result.
    #[must_use]
    pub fn find_match(
        &self,
        grid: &dyn GridInventory,
    ) -> Option<(Arc<dyn CraftingRecipe>, CraftingResult)> {
        for (index, recipe) in self.recipes.iter().enumerate() {
            if let Some(result) = recipe.result(grid, &self.containers) {
                trace!(index, "crafting grid matched");
                return Some((Arc::clone(recipe), result));
            }
        }
        None
    }

    /// Checks whether any registered recipe matches the grid.
    #[must_use]
    pub fn matches(&self, grid: &dyn GridInventory) -> bool {
        self.recipes.iter().any(|recipe| recipe.is_valid(grid))
    }

    /// The result of the first matching recipe, or `None`.
    #[must_use]
    pub fn get_result(&self, grid: &dyn GridInventory) -> Option<CraftingResult> {
        self.find_match(grid).map(|(_, result)| result)
    }

    /// The remainder items of the first matching recipe, or `None`.
    #[must_use]
    pub fn get_remaining_items(&self, grid: &dyn GridInventory) -> Option<Vec<ItemStackSnapshot>> {
        self.find_match(grid).map(|(_, result)| result.remaining_items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::CraftingGrid;
    use hearth_common::ItemTypeId;

    const STICK: ItemTypeId = ItemTypeId::new(280);
    const BUCKET: ItemTypeId = ItemTypeId::new(325);
    const MILK_BUCKET: ItemTypeId = ItemTypeId::new(335);
    const CAKE: ItemTypeId = ItemTypeId::new(354);

    /// Matches any grid holding exactly `count` non-empty slots.
    struct CountingRecipe {
        count: usize,
        output: ItemStackSnapshot,
    }

    impl CraftingRecipe for CountingRecipe {
        fn exemplary_result(&self) -> ItemStackSnapshot {
            self.output.clone()
        }

        fn is_valid(&self, grid: &dyn GridInventory) -> bool {
            let mut occupied = 0;
            for y in 0..grid.rows() {
                for x in 0..grid.columns() {
                    if !snapshot_at(grid, x, y).is_empty() {
                        occupied += 1;
                    }
                }
            }
            occupied == self.count
        }
    }

    fn counting(count: usize, output: ItemTypeId) -> Arc<dyn CraftingRecipe> {
        Arc::new(CountingRecipe {
            count,
            output: ItemStackSnapshot::new(output, 1),
        })
    }

    #[test]
    fn test_registration_order_is_priority() {
        let mut registry = CraftingRecipeRegistry::new();
        let first = counting(1, STICK);
        let second = counting(1, CAKE);
        registry.register(Arc::clone(&first));
        registry.register(second);

        let mut grid = CraftingGrid::inventory();
        grid.set(0, 0, ItemStackSnapshot::new(STICK, 1));

        let (matched, result) = registry.find_match(&grid).expect("should match");
        assert!(same_registration(&matched, &first));
        assert_eq!(result.main_item, ItemStackSnapshot::new(STICK, 1));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut registry = CraftingRecipeRegistry::new();
        let recipe = counting(1, STICK);
        registry.register(Arc::clone(&recipe));
        assert_eq!(registry.len(), 1);

        registry.remove(&recipe);
        assert!(registry.is_empty());
        registry.remove(&recipe);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_identical_values_are_distinct_registrations() {
        let mut registry = CraftingRecipeRegistry::new();
        let a = counting(1, STICK);
        let b = counting(1, STICK);
        registry.register(Arc::clone(&a));
        registry.register(Arc::clone(&b));

        registry.remove(&a);
        assert_eq!(registry.len(), 1);
        assert!(same_registration(&registry.recipes()[0], &b));
    }

    #[test]
    fn test_delegate_forwards_and_removes_transparently() {
        let mut registry = CraftingRecipeRegistry::new();
        let inner = counting(1, CAKE);
        let wrapper: Arc<dyn CraftingRecipe> =
            Arc::new(DelegateCraftingRecipe::new(Arc::clone(&inner)));
        registry.register(wrapper);

        let mut grid = CraftingGrid::inventory();
        grid.set(1, 1, ItemStackSnapshot::new(STICK, 1));
        assert!(registry.matches(&grid));

        // Removing by the original handle sees through the wrapper.
        registry.remove(&inner);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_no_match_is_absence_not_error() {
        let registry = CraftingRecipeRegistry::new();
        let grid = CraftingGrid::inventory();
        assert!(registry.find_match(&grid).is_none());
        assert!(registry.get_result(&grid).is_none());
    }

    #[test]
    fn test_container_rule_supplies_remainders() {
        let containers: ContainerRule = Arc::new(|snapshot: &ItemStackSnapshot| {
            (snapshot.item() == MILK_BUCKET).then(|| ItemStackSnapshot::new(BUCKET, 1))
        });
        let mut registry = CraftingRecipeRegistry::with_container_rule(containers);
        registry.register(counting(2, CAKE));

        let mut grid = CraftingGrid::workbench();
        grid.set(0, 0, ItemStackSnapshot::new(MILK_BUCKET, 1));
        grid.set(2, 1, ItemStackSnapshot::new(STICK, 1));

        let result = registry.get_result(&grid).expect("should match");
        // Raster order: the bucket slot first, then the stick slot.
        assert_eq!(
            result.remaining_items,
            vec![ItemStackSnapshot::new(BUCKET, 1), ItemStackSnapshot::EMPTY]
        );
    }

    #[test]
    fn test_result_is_fresh_per_match() {
        let mut registry = CraftingRecipeRegistry::new();
        registry.register(counting(1, CAKE));

        let mut grid = CraftingGrid::inventory();
        grid.set(0, 0, ItemStackSnapshot::new(STICK, 1));

        let mut first = registry.get_result(&grid).expect("should match");
        first.main_item = ItemStackSnapshot::EMPTY;

        let second = registry.get_result(&grid).expect("should match");
        assert_eq!(second.main_item, ItemStackSnapshot::new(CAKE, 1));
    }
}
