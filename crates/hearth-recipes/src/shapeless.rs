//! Shapeless crafting recipes.
//!
//! A shapeless recipe is an unordered list of ingredient predicates with
//! multiplicity. Matching pairs every non-empty grid slot with a distinct
//! predicate using maximum bipartite matching, so overlapping predicates
//! (one accepting a superset of another) still find a pairing whenever one
//! exists. Greedy first-fit would not: assigning the broad predicate to the
//! only item the narrow one accepts must be undone by an augmenting path.

use std::fmt;
use std::sync::Arc;

use hearth_common::ItemStackSnapshot;

use crate::crafting::CraftingRecipe;
use crate::error::{BuildResult, RecipeBuildError};
use crate::grid::{snapshot_at, GridInventory};
use crate::predicate::{SharedPredicate, VanillaMatcher};

/// An immutable shapeless crafting recipe.
pub struct ShapelessRecipe {
    ingredients: Vec<SharedPredicate>,
    result: ItemStackSnapshot,
}

impl fmt::Debug for ShapelessRecipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShapelessRecipe")
            .field("ingredients", &self.ingredients.len())
            .field("result", &self.result)
            .finish_non_exhaustive()
    }
}

impl ShapelessRecipe {
    /// Creates a new shapeless recipe builder.
    #[must_use]
    pub fn builder() -> ShapelessRecipeBuilder {
        ShapelessRecipeBuilder::new()
    }

    /// The ingredient predicates, in the order they were added.
    #[must_use]
    pub fn ingredients(&self) -> &[SharedPredicate] {
        &self.ingredients
    }

    /// Number of required ingredients.
    #[must_use]
    pub fn ingredient_count(&self) -> usize {
        self.ingredients.len()
    }

    /// Tries to extend the pairing with an augmenting path starting at
    /// `item`. Classic Kuhn's algorithm over the item-predicate
    /// acceptability graph.
    fn assign(
        &self,
        item: usize,
        items: &[ItemStackSnapshot],
        visited: &mut [bool],
        owner: &mut [Option<usize>],
    ) -> bool {
        for (index, predicate) in self.ingredients.iter().enumerate() {
            if visited[index] || !predicate.test(&items[item]) {
                continue;
            }
            visited[index] = true;

            let displaced = owner[index];
            if displaced.is_none()
                || displaced.is_some_and(|prev| self.assign(prev, items, visited, owner))
            {
                owner[index] = Some(item);
                return true;
            }
        }
        false
    }

    /// Checks whether the multiset of non-empty grid items can be paired
    /// one-to-one with the ingredient predicates.
    fn pairs_with(&self, items: &[ItemStackSnapshot]) -> bool {
        if items.len() != self.ingredients.len() {
            return false;
        }

        let mut owner: Vec<Option<usize>> = vec![None; self.ingredients.len()];
        for item in 0..items.len() {
            let mut visited = vec![false; self.ingredients.len()];
            if !self.assign(item, items, &mut visited, &mut owner) {
                return false;
            }
        }
        true
    }
}

impl CraftingRecipe for ShapelessRecipe {
    fn exemplary_result(&self) -> ItemStackSnapshot {
        self.result.clone()
    }

    fn is_valid(&self, grid: &dyn GridInventory) -> bool {
        let mut items = Vec::new();
        for y in 0..grid.rows() {
            for x in 0..grid.columns() {
                let snapshot = snapshot_at(grid, x, y);
                if !snapshot.is_empty() {
                    items.push(snapshot);
                }
            }
        }
        self.pairs_with(&items)
    }
}

/// Builder for [`ShapelessRecipe`].
#[derive(Default)]
pub struct ShapelessRecipeBuilder {
    ingredients: Vec<SharedPredicate>,
    result: Option<ItemStackSnapshot>,
    saw_empty_ingredient: bool,
}

impl ShapelessRecipeBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an ingredient predicate.
    #[must_use]
    pub fn add_ingredient(mut self, ingredient: SharedPredicate) -> Self {
        self.ingredients.push(ingredient);
        self
    }

    /// Adds the legacy exact match for a stack as an ingredient.
    #[must_use]
    pub fn add_ingredient_stack(mut self, stack: ItemStackSnapshot) -> Self {
        if stack.is_empty() {
            self.saw_empty_ingredient = true;
            return self;
        }
        self.ingredients.push(Arc::new(VanillaMatcher::new(stack)));
        self
    }

    /// Sets the exemplary result.
    #[must_use]
    pub fn result(mut self, result: ItemStackSnapshot) -> Self {
        self.result = Some(result);
        self
    }

    /// Re-derives builder state from an existing recipe.
    #[must_use]
    pub fn from_recipe(mut self, recipe: &ShapelessRecipe) -> Self {
        self.ingredients = recipe.ingredients.iter().map(Arc::clone).collect();
        self.result = Some(recipe.result.clone());
        self.saw_empty_ingredient = false;
        self
    }

    /// Clears all builder state.
    #[must_use]
    pub fn reset(mut self) -> Self {
        self.ingredients.clear();
        self.result = None;
        self.saw_empty_ingredient = false;
        self
    }

    /// Validates the builder state and produces the recipe.
    ///
    /// # Errors
    /// - [`RecipeBuildError::EmptyIngredient`] when an empty stack was added
    ///   as an ingredient
    /// - [`RecipeBuildError::NoIngredients`] when no ingredients were added
    /// - [`RecipeBuildError::NoResult`] / [`RecipeBuildError::EmptyResult`]
    ///   when the result is missing or empty
    pub fn build(self) -> BuildResult<ShapelessRecipe> {
        if self.saw_empty_ingredient {
            return Err(RecipeBuildError::EmptyIngredient);
        }
        if self.ingredients.is_empty() {
            return Err(RecipeBuildError::NoIngredients);
        }

        let result = self.result.ok_or(RecipeBuildError::NoResult)?;
        if result.is_empty() {
            return Err(RecipeBuildError::EmptyResult);
        }

        Ok(ShapelessRecipe {
            ingredients: self.ingredients,
            result,
        })
    }
}
