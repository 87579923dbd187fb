//! # Hearth Recipes
//!
//! Recipe matching and recipe registries for Hearth.
//!
//! This crate provides the extensible crafting layer:
//! - Ingredient predicates, including the vanilla equivalence matchers
//! - Grid inventory views for matching
//! - Shaped (pattern-based) crafting recipes with an aisle builder
//! - Shapeless crafting recipes with bipartite ingredient pairing
//! - A crafting recipe registry with priority ordering and delegates
//! - Smelting recipes and a registry bridging a legacy exact-match index

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod crafting;
pub mod error;
pub mod grid;
pub mod predicate;
pub mod shaped;
pub mod shapeless;
pub mod smelting;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::crafting::*;
    pub use crate::error::*;
    pub use crate::grid::*;
    pub use crate::predicate::*;
    pub use crate::shaped::*;
    pub use crate::shapeless::*;
    pub use crate::smelting::*;
    pub use crate::{SharedCraftingRegistry, SharedSmeltingRegistry};
}

pub use prelude::*;

use std::sync::Arc;

/// A crafting registry shared between systems.
pub type SharedCraftingRegistry = Arc<parking_lot::RwLock<crafting::CraftingRecipeRegistry>>;

/// A smelting registry shared between systems.
pub type SharedSmeltingRegistry = Arc<parking_lot::RwLock<smelting::SmeltingRecipeRegistry>>;
