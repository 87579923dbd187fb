//! Smelting recipes and the smelting recipe registry.
//!
//! Smelting is single-ingredient: a recipe binds one ingredient predicate
//! (plus an exemplary ingredient for display) to a result and an experience
//! yield. The registry keeps two populations:
//!
//! - *custom* recipes, predicate-capable, registered as recipe objects
//! - a *legacy exact-match index* of raw ingredient/result/experience
//!   entries, fed by direct callers that bypass recipe objects
//!
//! Custom recipes always win over the exact index in lookups. Enumerating
//! recipes materializes unowned index entries into recipe values on the fly
//! without mutating the index.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use hearth_common::ItemStackSnapshot;

use crate::error::{BuildResult, RecipeBuildError, RegistryError};
use crate::predicate::{IngredientPredicate, SharedPredicate, SmeltingVanillaMatcher, VanillaMatcher};

/// Output of a successful smelting lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmeltingResult {
    /// The smelted item.
    pub result: ItemStackSnapshot,
    /// Experience released, non-negative.
    pub experience: f64,
}

impl SmeltingResult {
    /// Creates a smelting result.
    #[must_use]
    pub const fn new(result: ItemStackSnapshot, experience: f64) -> Self {
        Self { result, experience }
    }
}

/// An immutable smelting recipe.
///
/// The ingredient predicate is guaranteed (at build time) to accept the
/// exemplary ingredient.
pub struct SmeltingRecipe {
    exemplary_ingredient: ItemStackSnapshot,
    exemplary_result: ItemStackSnapshot,
    predicate: SharedPredicate,
    experience: f64,
}

impl fmt::Debug for SmeltingRecipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmeltingRecipe")
            .field("exemplary_ingredient", &self.exemplary_ingredient)
            .field("exemplary_result", &self.exemplary_result)
            .field("experience", &self.experience)
            .finish_non_exhaustive()
    }
}

impl SmeltingRecipe {
    /// Creates a new smelting recipe builder.
    #[must_use]
    pub fn builder() -> SmeltingRecipeBuilder {
        SmeltingRecipeBuilder::new()
    }

    fn from_parts(
        exemplary_ingredient: ItemStackSnapshot,
        exemplary_result: ItemStackSnapshot,
        predicate: SharedPredicate,
        experience: f64,
    ) -> Self {
        Self {
            exemplary_ingredient,
            exemplary_result,
            predicate,
            experience,
        }
    }

    /// The canonical ingredient stack, for display and index purposes.
    #[must_use]
    pub const fn exemplary_ingredient(&self) -> &ItemStackSnapshot {
        &self.exemplary_ingredient
    }

    /// The canonical result stack.
    #[must_use]
    pub const fn exemplary_result(&self) -> &ItemStackSnapshot {
        &self.exemplary_result
    }

    /// The experience yield.
    #[must_use]
    pub const fn experience(&self) -> f64 {
        self.experience
    }

    /// The ingredient predicate.
    #[must_use]
    pub fn predicate(&self) -> &SharedPredicate {
        &self.predicate
    }

    /// Computes the smelting result for an ingredient, or `None` when the
    /// predicate rejects it.
    #[must_use]
    pub fn result(&self, ingredient: &ItemStackSnapshot) -> Option<SmeltingResult> {
        if self.predicate.test(ingredient) {
            Some(SmeltingResult::new(
                self.exemplary_result.clone(),
                self.experience,
            ))
        } else {
            None
        }
    }
}

/// Builder for [`SmeltingRecipe`].
#[derive(Default)]
pub struct SmeltingRecipeBuilder {
    exemplary_ingredient: Option<ItemStackSnapshot>,
    exemplary_result: Option<ItemStackSnapshot>,
    predicate: Option<SharedPredicate>,
    experience: Option<f64>,
}

impl SmeltingRecipeBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the ingredient predicate together with the exemplary ingredient
    /// it must accept.
    #[must_use]
    pub fn ingredient(
        mut self,
        predicate: SharedPredicate,
        exemplary: ItemStackSnapshot,
    ) -> Self {
        self.predicate = Some(predicate);
        self.exemplary_ingredient = Some(exemplary);
        self
    }

    /// Sets the ingredient as a legacy exact match for a stack (type and
    /// metadata must match exactly).
    #[must_use]
    pub fn ingredient_stack(self, stack: ItemStackSnapshot) -> Self {
        let predicate: SharedPredicate = Arc::new(SmeltingVanillaMatcher::new(stack.clone()));
        self.ingredient(predicate, stack)
    }

    /// Sets the exemplary result.
    #[must_use]
    pub fn result(mut self, result: ItemStackSnapshot) -> Self {
        self.exemplary_result = Some(result);
        self
    }

    /// Sets the experience yield.
    #[must_use]
    pub fn experience(mut self, experience: f64) -> Self {
        self.experience = Some(experience);
        self
    }

    /// Re-derives builder state from an existing recipe. The experience
    /// yield is deliberately not carried over and must be restated.
    #[must_use]
    pub fn from_recipe(mut self, recipe: &SmeltingRecipe) -> Self {
        self.exemplary_ingredient = Some(recipe.exemplary_ingredient.clone());
        self.exemplary_result = Some(recipe.exemplary_result.clone());
        self.predicate = Some(Arc::clone(&recipe.predicate));
        self.experience = None;
        self
    }

    /// Clears all builder state.
    #[must_use]
    pub fn reset(mut self) -> Self {
        self.exemplary_ingredient = None;
        self.exemplary_result = None;
        self.predicate = None;
        self.experience = None;
        self
    }

    /// Validates the builder state and produces the recipe.
    ///
    /// # Errors
    /// - [`RecipeBuildError::NoIngredients`] / [`RecipeBuildError::EmptyIngredient`]
    ///   when the ingredient is missing or empty
    /// - [`RecipeBuildError::NoResult`] / [`RecipeBuildError::EmptyResult`]
    ///   when the result is missing or empty
    /// - [`RecipeBuildError::IngredientRejected`] when the predicate does
    ///   not accept the exemplary ingredient
    /// - [`RecipeBuildError::NoExperience`] / [`RecipeBuildError::NegativeExperience`]
    ///   when the experience yield is missing or below zero
    pub fn build(self) -> BuildResult<SmeltingRecipe> {
        let (predicate, ingredient) = match (self.predicate, self.exemplary_ingredient) {
            (Some(predicate), Some(ingredient)) => (predicate, ingredient),
            _ => return Err(RecipeBuildError::NoIngredients),
        };
        if ingredient.is_empty() {
            return Err(RecipeBuildError::EmptyIngredient);
        }

        let result = self.exemplary_result.ok_or(RecipeBuildError::NoResult)?;
        if result.is_empty() {
            return Err(RecipeBuildError::EmptyResult);
        }

        if !predicate.test(&ingredient) {
            return Err(RecipeBuildError::IngredientRejected);
        }

        let experience = self.experience.ok_or(RecipeBuildError::NoExperience)?;
        // NaN fails the non-negativity requirement too.
        if experience.is_nan() || experience < 0.0 {
            return Err(RecipeBuildError::NegativeExperience(experience));
        }

        Ok(SmeltingRecipe::from_parts(
            ingredient, result, predicate, experience,
        ))
    }
}

/// One entry of the legacy exact-match index.
#[derive(Debug, Clone)]
struct ExactEntry {
    ingredient: ItemStackSnapshot,
    result: ItemStackSnapshot,
    experience: f64,
}

/// Registry of smelting recipes plus the legacy exact-match index.
///
/// The index is keyed by ingredient snapshot value; entries registered
/// through [`register_with_exact`](Self::register_with_exact) stay
/// associated with their owning recipe so they are excluded from
/// materialized enumeration and removed together with the recipe.
pub struct SmeltingRecipeRegistry {
    custom: Vec<Arc<SmeltingRecipe>>,
    exact: Vec<ExactEntry>,
    /// Association from an owning custom recipe (by handle identity) to its
    /// mirrored exact-index ingredient key.
    owners: Vec<(Arc<SmeltingRecipe>, ItemStackSnapshot)>,
}

impl fmt::Debug for SmeltingRecipeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmeltingRecipeRegistry")
            .field("custom", &self.custom.len())
            .field("exact", &self.exact.len())
            .finish_non_exhaustive()
    }
}

impl Default for SmeltingRecipeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SmeltingRecipeRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            custom: Vec::new(),
            exact: Vec::new(),
            owners: Vec::new(),
        }
    }

    /// Registers a custom recipe. The exact-match index is left untouched;
    /// use [`register_exact`](Self::register_exact) or
    /// [`register_with_exact`](Self::register_with_exact) for that.
    ///
    /// # Errors
    /// [`RegistryError::DuplicateRecipe`] when this exact recipe handle is
    /// already registered; the recipe set is unchanged.
    pub fn register(&mut self, recipe: Arc<SmeltingRecipe>) -> Result<(), RegistryError> {
        if self.custom.iter().any(|entry| Arc::ptr_eq(entry, &recipe)) {
            return Err(RegistryError::DuplicateRecipe);
        }
        debug!(total = self.custom.len() + 1, "registered smelting recipe");
        self.custom.push(recipe);
        Ok(())
    }

    /// Registers a raw ingredient/result/experience triple into the legacy
    /// exact-match index, replacing any entry for the same ingredient value.
    /// A recipe that owned the replaced entry loses its mirror association;
    /// the new entry is unowned.
    ///
    /// This is the compatibility entry point for callers that bypass recipe
    /// objects entirely.
    pub fn register_exact(
        &mut self,
        ingredient: ItemStackSnapshot,
        result: ItemStackSnapshot,
        experience: f64,
    ) {
        debug!("registered exact-match smelting entry");
        self.owners.retain(|(_, key)| *key != ingredient);
        if let Some(entry) = self
            .exact
            .iter_mut()
            .find(|entry| entry.ingredient == ingredient)
        {
            entry.result = result;
            entry.experience = experience;
        } else {
            self.exact.push(ExactEntry {
                ingredient,
                result,
                experience,
            });
        }
    }

    /// Registers a custom recipe and mirrors its exemplary triple into the
    /// exact-match index, keeping the two associated so
    /// [`remove`](Self::remove) clears both and enumeration does not count
    /// the entry twice.
    ///
    /// The index holds one entry per ingredient value, so a later
    /// registration for the same exemplary ingredient takes over that entry
    /// and its association; the superseded recipe stays registered but no
    /// longer owns a mirror.
    ///
    /// # Errors
    /// [`RegistryError::DuplicateRecipe`] as for [`register`](Self::register).
    pub fn register_with_exact(&mut self, recipe: Arc<SmeltingRecipe>) -> Result<(), RegistryError> {
        self.register(Arc::clone(&recipe))?;

        let key = recipe.exemplary_ingredient().clone();
        self.register_exact(
            key.clone(),
            recipe.exemplary_result().clone(),
            recipe.experience(),
        );
        self.owners.push((recipe, key));
        Ok(())
    }

    /// Looks up the smelting result for an ingredient.
    ///
    /// Custom recipes are consulted first, in registration order, each with
    /// its own predicate; when none match, the exact-match index is scanned
    /// under the legacy crafting-equivalence rule (wildcard metadata on the
    /// entry side accepts any candidate metadata).
    #[must_use]
    pub fn get_result(&self, ingredient: &ItemStackSnapshot) -> Option<SmeltingResult> {
        for recipe in &self.custom {
            if let Some(result) = recipe.result(ingredient) {
                return Some(result);
            }
        }

        self.exact
            .iter()
            .find(|entry| VanillaMatcher::new(entry.ingredient.clone()).test(ingredient))
            .map(|entry| SmeltingResult::new(entry.result.clone(), entry.experience))
    }

    /// Removes a custom recipe by handle identity, along with any exact-index
    /// entry it owns. Removing an unregistered recipe is a no-op.
    pub fn remove(&mut self, recipe: &Arc<SmeltingRecipe>) {
        if let Some(index) = self.custom.iter().position(|entry| Arc::ptr_eq(entry, recipe)) {
            self.custom.remove(index);
            debug!(total = self.custom.len(), "removed smelting recipe");
        }

        if let Some(index) = self
            .owners
            .iter()
            .position(|(owner, _)| Arc::ptr_eq(owner, recipe))
        {
            let (_, key) = self.owners.remove(index);
            self.exact.retain(|entry| entry.ingredient != key);
        }
    }

    /// The custom recipes, in registration order.
    #[must_use]
    pub fn custom_recipes(&self) -> &[Arc<SmeltingRecipe>] {
        &self.custom
    }

    /// All recipes: exact-index entries without an owning custom recipe are
    /// materialized into recipe values (wrapping the exact-metadata legacy
    /// matcher), followed by the custom recipes. Materialization never
    /// mutates the index; the returned handles are fresh each call.
    #[must_use]
    pub fn recipes(&self) -> Vec<Arc<SmeltingRecipe>> {
        let mut all = Vec::with_capacity(self.exact.len() + self.custom.len());

        for entry in &self.exact {
            let owned = self.owners.iter().any(|(_, key)| *key == entry.ingredient);
            if owned {
                continue;
            }
            let predicate: SharedPredicate =
                Arc::new(SmeltingVanillaMatcher::new(entry.ingredient.clone()));
            all.push(Arc::new(SmeltingRecipe::from_parts(
                entry.ingredient.clone(),
                entry.result.clone(),
                predicate,
                entry.experience,
            )));
        }

        all.extend(self.custom.iter().map(Arc::clone));
        all
    }
}
