//! Shaped crafting recipes.
//!
//! A shaped recipe is an immutable `width x height` aisle of symbols, each
//! mapped to an ingredient predicate. Matching slides the aisle across the
//! grid at every legal offset, in raster order (increasing X, then
//! increasing Y per X), and accepts the first offset where every footprint
//! cell satisfies its predicate and every cell outside the footprint is
//! empty. The raster tie-break is part of the contract: overlapping recipes
//! resolve to the lexicographically smallest offset.

use std::fmt;
use std::sync::Arc;

use ahash::AHashMap;
use tracing::trace;

use hearth_common::ItemStackSnapshot;

use crate::crafting::CraftingRecipe;
use crate::error::{BuildResult, RecipeBuildError};
use crate::grid::{snapshot_at, GridInventory};
use crate::predicate::{SharedPredicate, VanillaMatcher};

/// An immutable shaped crafting recipe.
///
/// Aisle cells whose symbol has no predicate mapping (including the space
/// symbol) require the corresponding grid cell to be empty.
pub struct ShapedRecipe {
    width: u32,
    height: u32,
    aisle: Vec<String>,
    symbols: AHashMap<char, SharedPredicate>,
    /// Per-cell classification in row-major order: `Some` = predicate cell,
    /// `None` = must-be-empty cell. Every cell inside the aisle bounds is
    /// classified here at build time.
    cells: Vec<Option<SharedPredicate>>,
    result: ItemStackSnapshot,
}

impl fmt::Debug for ShapedRecipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShapedRecipe")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("aisle", &self.aisle)
            .field("result", &self.result)
            .finish_non_exhaustive()
    }
}

impl ShapedRecipe {
    /// Creates a new shaped recipe builder.
    #[must_use]
    pub fn builder() -> ShapedRecipeBuilder {
        ShapedRecipeBuilder::new()
    }

    /// Pattern width.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Pattern height.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// The row-by-row textual layout of the pattern.
    #[must_use]
    pub fn aisle(&self) -> &[String] {
        &self.aisle
    }

    /// The predicate mapped to an aisle symbol, if any.
    #[must_use]
    pub fn predicate_for(&self, symbol: char) -> Option<&SharedPredicate> {
        self.symbols.get(&symbol)
    }

    /// The predicate at pattern cell `(x, y)`; `None` for out-of-bounds
    /// coordinates and for must-be-empty cells.
    #[must_use]
    pub fn predicate_at(&self, x: u32, y: u32) -> Option<&SharedPredicate> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells[(y * self.width + x) as usize].as_ref()
    }

    /// Finds the first grid offset at which the pattern matches, trying
    /// offsets in raster order.
    ///
    /// Returns `None` when the grid is smaller than the pattern or no offset
    /// satisfies both the footprint predicates and the surrounding-gap
    /// emptiness requirement.
    #[must_use]
    pub fn matched_offset(&self, grid: &dyn GridInventory) -> Option<(u32, u32)> {
        let columns = grid.columns();
        let rows = grid.rows();
        if columns < self.width || rows < self.height {
            return None;
        }

        for offset_x in 0..=(columns - self.width) {
            'shift: for offset_y in 0..=(rows - self.height) {
                // Test each footprint cell against its classification.
                for aisle_y in 0..self.height {
                    for aisle_x in 0..self.width {
                        let snapshot =
                            snapshot_at(grid, aisle_x + offset_x, aisle_y + offset_y);
                        match self.predicate_at(aisle_x, aisle_y) {
                            Some(predicate) => {
                                if !predicate.test(&snapshot) {
                                    continue 'shift;
                                }
                            }
                            None => {
                                if !snapshot.is_empty() {
                                    continue 'shift;
                                }
                            }
                        }
                    }
                }

                // Every grid cell outside the footprint must be empty.
                for y in 0..rows {
                    for x in 0..columns {
                        let inside = x >= offset_x
                            && x < offset_x + self.width
                            && y >= offset_y
                            && y < offset_y + self.height;
                        if !inside && !snapshot_at(grid, x, y).is_empty() {
                            continue 'shift;
                        }
                    }
                }

                trace!(offset_x, offset_y, "shaped pattern matched");
                return Some((offset_x, offset_y));
            }
        }

        None
    }
}

impl CraftingRecipe for ShapedRecipe {
    fn exemplary_result(&self) -> ItemStackSnapshot {
        self.result.clone()
    }

    fn is_valid(&self, grid: &dyn GridInventory) -> bool {
        self.matched_offset(grid).is_some()
    }
}

/// Builder for [`ShapedRecipe`].
///
/// Not thread-safe; assemble on one thread and hand the built recipe off.
#[derive(Default)]
pub struct ShapedRecipeBuilder {
    aisle: Vec<String>,
    symbols: AHashMap<char, SharedPredicate>,
    result: Option<ItemStackSnapshot>,
}

impl ShapedRecipeBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the aisle rows, replacing any previous aisle.
    #[must_use]
    pub fn aisle<I, S>(mut self, rows: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aisle = rows.into_iter().map(Into::into).collect();
        self
    }

    /// Maps an aisle symbol to an ingredient predicate.
    #[must_use]
    pub fn where_symbol(mut self, symbol: char, predicate: SharedPredicate) -> Self {
        self.symbols.insert(symbol, predicate);
        self
    }

    /// Maps an aisle symbol to the legacy exact match for a stack.
    #[must_use]
    pub fn where_stack(self, symbol: char, stack: ItemStackSnapshot) -> Self {
        self.where_symbol(symbol, Arc::new(VanillaMatcher::new(stack)))
    }

    /// Removes a symbol mapping, turning its cells back into must-be-empty
    /// cells.
    #[must_use]
    pub fn clear_symbol(mut self, symbol: char) -> Self {
        self.symbols.remove(&symbol);
        self
    }

    /// Sets the exemplary result.
    #[must_use]
    pub fn result(mut self, result: ItemStackSnapshot) -> Self {
        self.result = Some(result);
        self
    }

    /// Re-derives builder state from an existing recipe, synthesizing one
    /// symbol per occupied cell.
    ///
    /// Synthesized symbols are internal; they round-trip the predicates but
    /// are not stable across calls.
    #[must_use]
    pub fn from_recipe(mut self, recipe: &ShapedRecipe) -> Self {
        self.aisle.clear();
        self.symbols.clear();

        for y in 0..recipe.height() {
            let mut row = String::new();
            for x in 0..recipe.width() {
                match recipe.predicate_at(x, y) {
                    Some(predicate) => {
                        let symbol = char::from_u32('a' as u32 + y * recipe.width() + x)
                            .expect("synthesized symbol out of range");
                        self.symbols.insert(symbol, Arc::clone(predicate));
                        row.push(symbol);
                    }
                    None => row.push(' '),
                }
            }
            self.aisle.push(row);
        }

        self.result = Some(recipe.result.clone());
        self
    }

    /// Clears all builder state.
    #[must_use]
    pub fn reset(mut self) -> Self {
        self.aisle.clear();
        self.symbols.clear();
        self.result = None;
        self
    }

    /// Validates the builder state and produces the recipe.
    ///
    /// # Errors
    /// - [`RecipeBuildError::EmptyAisle`] when no rows are set or the rows
    ///   have zero width
    /// - [`RecipeBuildError::InconsistentAisleWidth`] when rows differ in
    ///   width
    /// - [`RecipeBuildError::NoIngredients`] when no aisle cell maps to a
    ///   predicate
    /// - [`RecipeBuildError::NoResult`] / [`RecipeBuildError::EmptyResult`]
    ///   when the result is missing or empty
    pub fn build(self) -> BuildResult<ShapedRecipe> {
        let rows: Vec<Vec<char>> = self.aisle.iter().map(|row| row.chars().collect()).collect();

        let width = rows.first().map_or(0, Vec::len);
        if rows.is_empty() || width == 0 {
            return Err(RecipeBuildError::EmptyAisle);
        }
        for (index, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(RecipeBuildError::InconsistentAisleWidth {
                    row: index,
                    found: row.len(),
                    expected: width,
                });
            }
        }

        let result = self.result.ok_or(RecipeBuildError::NoResult)?;
        if result.is_empty() {
            return Err(RecipeBuildError::EmptyResult);
        }

        let mut cells = Vec::with_capacity(width * rows.len());
        for row in &rows {
            for &symbol in row {
                cells.push(self.symbols.get(&symbol).map(Arc::clone));
            }
        }
        if cells.iter().all(Option::is_none) {
            return Err(RecipeBuildError::NoIngredients);
        }

        Ok(ShapedRecipe {
            width: width as u32,
            height: rows.len() as u32,
            aisle: self.aisle,
            symbols: self.symbols,
            cells,
            result,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::CraftingGrid;
    use hearth_common::ItemTypeId;
    use proptest::prelude::*;

    const IRON: ItemTypeId = ItemTypeId::new(265);
    const STICK: ItemTypeId = ItemTypeId::new(280);
    const LOG: ItemTypeId = ItemTypeId::new(17);
    const COAL: ItemTypeId = ItemTypeId::new(263);
    const PLANKS: ItemTypeId = ItemTypeId::new(5);
    const TORCH: ItemTypeId = ItemTypeId::new(50);

    fn matches_item(item: ItemTypeId) -> SharedPredicate {
        Arc::new(move |s: &ItemStackSnapshot| s.item() == item)
    }

    fn stack(item: ItemTypeId) -> ItemStackSnapshot {
        ItemStackSnapshot::new(item, 1)
    }

    fn ring_recipe() -> ShapedRecipe {
        ShapedRecipe::builder()
            .aisle(["#X#", "X X", "#X#"])
            .where_symbol('#', matches_item(IRON))
            .result(stack(TORCH))
            .build()
            .expect("should build")
    }

    #[test]
    fn test_ring_pattern_round_trip() {
        let recipe = ring_recipe();
        assert_eq!(recipe.width(), 3);
        assert_eq!(recipe.height(), 3);

        let mut grid = CraftingGrid::workbench();
        for (x, y) in [(0, 0), (2, 0), (0, 2), (2, 2)] {
            grid.set(x, y, stack(IRON));
        }
        assert_eq!(recipe.matched_offset(&grid), Some((0, 0)));

        // Unmapped symbols demand emptiness.
        grid.set(1, 1, stack(STICK));
        assert_eq!(recipe.matched_offset(&grid), None);
    }

    #[test]
    fn test_shifted_match_on_larger_grid() {
        let recipe = ShapedRecipe::builder()
            .aisle(["##", "##"])
            .where_symbol('#', matches_item(IRON))
            .result(stack(TORCH))
            .build()
            .expect("should build");

        let mut grid = CraftingGrid::new(4, 4);
        for (x, y) in [(1, 2), (2, 2), (1, 3), (2, 3)] {
            grid.set(x, y, stack(IRON));
        }
        assert_eq!(recipe.matched_offset(&grid), Some((1, 2)));
        assert!(recipe.is_valid(&grid));
    }

    #[test]
    fn test_raster_tie_break() {
        // Every offset of this 1x1 pattern matches an empty grid; the first
        // offset in raster order must win.
        let recipe = ShapedRecipe::builder()
            .aisle(["#"])
            .where_symbol('#', Arc::new(|_: &ItemStackSnapshot| true))
            .result(stack(TORCH))
            .build()
            .expect("should build");

        let grid = CraftingGrid::workbench();
        assert_eq!(recipe.matched_offset(&grid), Some((0, 0)));
    }

    #[test]
    fn test_offset_is_deterministic() {
        let recipe = ShapedRecipe::builder()
            .aisle(["#"])
            .where_symbol('#', matches_item(STICK))
            .result(stack(TORCH))
            .build()
            .expect("should build");

        let mut grid = CraftingGrid::workbench();
        grid.set(2, 0, stack(STICK));

        let first = recipe.matched_offset(&grid);
        assert_eq!(first, Some((2, 0)));
        assert_eq!(recipe.matched_offset(&grid), first);
    }

    #[test]
    fn test_two_by_two_scenario() {
        let recipe = ShapedRecipe::builder()
            .aisle(["AB", "CD"])
            .where_symbol('A', matches_item(STICK))
            .where_symbol('B', matches_item(LOG))
            .where_symbol('C', matches_item(COAL))
            .where_symbol('D', matches_item(PLANKS))
            .result(stack(TORCH))
            .build()
            .expect("should build");

        let mut grid = CraftingGrid::inventory();
        grid.set(0, 0, stack(STICK));
        grid.set(1, 0, stack(LOG));
        grid.set(0, 1, stack(COAL));
        grid.set(1, 1, stack(PLANKS));
        assert!(recipe.is_valid(&grid));
        assert_eq!(recipe.exemplary_result(), stack(TORCH));

        grid.set(0, 0, stack(LOG));
        assert!(!recipe.is_valid(&grid));
    }

    #[test]
    fn test_grid_smaller_than_pattern() {
        let recipe = ring_recipe();
        let grid = CraftingGrid::inventory();
        assert_eq!(recipe.matched_offset(&grid), None);
    }

    #[test]
    fn test_gap_must_be_empty() {
        let recipe = ShapedRecipe::builder()
            .aisle(["#"])
            .where_symbol('#', matches_item(STICK))
            .result(stack(TORCH))
            .build()
            .expect("should build");

        let mut grid = CraftingGrid::workbench();
        grid.set(0, 0, stack(STICK));
        assert_eq!(recipe.matched_offset(&grid), Some((0, 0)));

        // A stray item outside the footprint spoils every offset.
        grid.set(2, 2, stack(COAL));
        assert_eq!(recipe.matched_offset(&grid), None);
    }

    #[test]
    fn test_builder_validation() {
        let result = ShapedRecipe::builder().build();
        assert!(matches!(result, Err(RecipeBuildError::EmptyAisle)));

        let result = ShapedRecipe::builder()
            .aisle(["##", "#"])
            .where_symbol('#', matches_item(IRON))
            .result(stack(TORCH))
            .build();
        assert!(matches!(
            result,
            Err(RecipeBuildError::InconsistentAisleWidth {
                row: 1,
                found: 1,
                expected: 2
            })
        ));

        let result = ShapedRecipe::builder()
            .aisle(["XX"])
            .result(stack(TORCH))
            .build();
        assert!(matches!(result, Err(RecipeBuildError::NoIngredients)));

        let result = ShapedRecipe::builder()
            .aisle(["#"])
            .where_symbol('#', matches_item(IRON))
            .build();
        assert!(matches!(result, Err(RecipeBuildError::NoResult)));

        let result = ShapedRecipe::builder()
            .aisle(["#"])
            .where_symbol('#', matches_item(IRON))
            .result(ItemStackSnapshot::EMPTY)
            .build();
        assert!(matches!(result, Err(RecipeBuildError::EmptyResult)));
    }

    #[test]
    fn test_from_recipe_round_trip() {
        let original = ring_recipe();
        let rebuilt = ShapedRecipe::builder()
            .from_recipe(&original)
            .build()
            .expect("should rebuild");

        assert_eq!(rebuilt.width(), original.width());
        assert_eq!(rebuilt.height(), original.height());

        let mut grid = CraftingGrid::workbench();
        for (x, y) in [(0, 0), (2, 0), (0, 2), (2, 2)] {
            grid.set(x, y, stack(IRON));
        }
        assert_eq!(rebuilt.matched_offset(&grid), Some((0, 0)));
    }

    #[test]
    fn test_predicate_accessors() {
        let recipe = ring_recipe();
        assert!(recipe.predicate_for('#').is_some());
        assert!(recipe.predicate_for('X').is_none());
        assert!(recipe.predicate_at(0, 0).is_some());
        assert!(recipe.predicate_at(1, 0).is_none());
        assert!(recipe.predicate_at(9, 9).is_none());
    }

    proptest! {
        #[test]
        fn prop_single_item_offset(x in 0u32..3, y in 0u32..3) {
            let recipe = ShapedRecipe::builder()
                .aisle(["#"])
                .where_symbol('#', matches_item(STICK))
                .result(stack(TORCH))
                .build()
                .expect("should build");

            let mut grid = CraftingGrid::workbench();
            grid.set(x, y, stack(STICK));

            prop_assert_eq!(recipe.matched_offset(&grid), Some((x, y)));
            // Matching is a pure function of the grid contents.
            prop_assert_eq!(recipe.matched_offset(&grid), Some((x, y)));
        }
    }
}
