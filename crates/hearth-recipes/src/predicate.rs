//! Ingredient predicates.
//!
//! A predicate is the atomic matching unit: a pure boolean test over an item
//! stack snapshot. Recipes hold predicates behind [`SharedPredicate`] so a
//! single predicate can be referenced from several aisle cells.
//!
//! Two stock predicates implement the legacy exact-match rules:
//! - [`VanillaMatcher`] for crafting, honoring the [`WILDCARD_METADATA`]
//!   sentinel on the recipe side
//! - [`SmeltingVanillaMatcher`] for smelting, requiring exact metadata
//!
//! The asymmetry between the two is intentional and mirrors how furnace
//! matching has always differed from crafting-table matching.

use std::sync::Arc;

use hearth_common::{ItemStackSnapshot, WILDCARD_METADATA};

/// A pure boolean test over an item stack snapshot.
///
/// Implementations must be stable: the same input always yields the same
/// output, since matching may evaluate a predicate several times per grid.
pub trait IngredientPredicate: Send + Sync {
    /// Tests whether `candidate` satisfies this ingredient.
    fn test(&self, candidate: &ItemStackSnapshot) -> bool;
}

impl<F> IngredientPredicate for F
where
    F: Fn(&ItemStackSnapshot) -> bool + Send + Sync,
{
    fn test(&self, candidate: &ItemStackSnapshot) -> bool {
        self(candidate)
    }
}

/// Shared handle to an ingredient predicate.
pub type SharedPredicate = Arc<dyn IngredientPredicate>;

/// Legacy exact-match rule for crafting ingredients.
///
/// Matches when both sides are empty, or both are non-empty with equal item
/// type and equal metadata. A recipe-side metadata of [`WILDCARD_METADATA`]
/// accepts any candidate metadata. Stack size and extra data never matter.
#[derive(Debug, Clone)]
pub struct VanillaMatcher {
    recipe_side: ItemStackSnapshot,
}

impl VanillaMatcher {
    /// Creates a matcher for the given recipe-side snapshot.
    #[must_use]
    pub const fn new(recipe_side: ItemStackSnapshot) -> Self {
        Self { recipe_side }
    }

    /// The recipe-side snapshot this matcher was built from.
    #[must_use]
    pub const fn recipe_side(&self) -> &ItemStackSnapshot {
        &self.recipe_side
    }
}

impl IngredientPredicate for VanillaMatcher {
    fn test(&self, candidate: &ItemStackSnapshot) -> bool {
        if self.recipe_side.is_empty() || candidate.is_empty() {
            return self.recipe_side.is_empty() && candidate.is_empty();
        }
        if self.recipe_side.item() != candidate.item() {
            return false;
        }
        self.recipe_side.metadata() == candidate.metadata()
            || self.recipe_side.metadata() == WILDCARD_METADATA
    }
}

/// Legacy exact-match rule for smelting ingredients.
///
/// Like [`VanillaMatcher`] but without the wildcard-metadata escape: the
/// candidate metadata must equal the recipe-side metadata exactly.
#[derive(Debug, Clone)]
pub struct SmeltingVanillaMatcher {
    recipe_side: ItemStackSnapshot,
}

impl SmeltingVanillaMatcher {
    /// Creates a matcher for the given recipe-side snapshot.
    #[must_use]
    pub const fn new(recipe_side: ItemStackSnapshot) -> Self {
        Self { recipe_side }
    }

    /// The recipe-side snapshot this matcher was built from.
    #[must_use]
    pub const fn recipe_side(&self) -> &ItemStackSnapshot {
        &self.recipe_side
    }
}

impl IngredientPredicate for SmeltingVanillaMatcher {
    fn test(&self, candidate: &ItemStackSnapshot) -> bool {
        if self.recipe_side.is_empty() || candidate.is_empty() {
            return self.recipe_side.is_empty() && candidate.is_empty();
        }
        self.recipe_side.item() == candidate.item()
            && self.recipe_side.metadata() == candidate.metadata()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearth_common::ItemTypeId;

    const STICK: ItemTypeId = ItemTypeId::new(280);
    const LOG: ItemTypeId = ItemTypeId::new(17);

    #[test]
    fn test_vanilla_both_empty() {
        let matcher = VanillaMatcher::new(ItemStackSnapshot::EMPTY);
        assert!(matcher.test(&ItemStackSnapshot::EMPTY));
    }

    #[test]
    fn test_vanilla_one_empty() {
        let stick = ItemStackSnapshot::new(STICK, 1);
        assert!(!VanillaMatcher::new(ItemStackSnapshot::EMPTY).test(&stick));
        assert!(!VanillaMatcher::new(stick).test(&ItemStackSnapshot::EMPTY));
    }

    #[test]
    fn test_vanilla_type_mismatch() {
        let matcher = VanillaMatcher::new(ItemStackSnapshot::new(STICK, 1));
        assert!(!matcher.test(&ItemStackSnapshot::new(LOG, 1)));
    }

    #[test]
    fn test_vanilla_metadata_wildcard() {
        let wildcard =
            VanillaMatcher::new(ItemStackSnapshot::with_metadata(STICK, 1, WILDCARD_METADATA));
        assert!(wildcard.test(&ItemStackSnapshot::with_metadata(STICK, 1, 0)));
        assert!(wildcard.test(&ItemStackSnapshot::with_metadata(STICK, 1, 13)));

        let exact = VanillaMatcher::new(ItemStackSnapshot::with_metadata(STICK, 1, 1));
        assert!(!exact.test(&ItemStackSnapshot::with_metadata(STICK, 1, 2)));
    }

    #[test]
    fn test_vanilla_ignores_quantity_and_extra() {
        let matcher = VanillaMatcher::new(ItemStackSnapshot::new(STICK, 1));
        let candidate = ItemStackSnapshot::new(STICK, 64).with_extra(vec![0xff]);
        assert!(matcher.test(&candidate));
    }

    #[test]
    fn test_smelting_has_no_wildcard() {
        let matcher = SmeltingVanillaMatcher::new(ItemStackSnapshot::with_metadata(
            STICK,
            1,
            WILDCARD_METADATA,
        ));
        // The sentinel is just an ordinary metadata value here.
        assert!(!matcher.test(&ItemStackSnapshot::with_metadata(STICK, 1, 0)));
        assert!(matcher.test(&ItemStackSnapshot::with_metadata(STICK, 1, WILDCARD_METADATA)));
    }

    #[test]
    fn test_recipe_side_accessor() {
        let stick = ItemStackSnapshot::new(STICK, 1);
        assert_eq!(VanillaMatcher::new(stick.clone()).recipe_side(), &stick);
        assert_eq!(
            SmeltingVanillaMatcher::new(stick.clone()).recipe_side(),
            &stick
        );
    }

    #[test]
    fn test_closure_predicate() {
        let any_stick: SharedPredicate = Arc::new(|s: &ItemStackSnapshot| s.item() == STICK);
        assert!(any_stick.test(&ItemStackSnapshot::with_metadata(STICK, 3, 9)));
        assert!(!any_stick.test(&ItemStackSnapshot::new(LOG, 1)));
    }
}
