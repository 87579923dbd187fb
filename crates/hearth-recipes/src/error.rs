//! Error types for recipe construction and registration.

use thiserror::Error;

/// Builder validation errors.
///
/// All of these surface at `build()` time; a recipe that builds successfully
/// never fails validation later during matching.
#[derive(Debug, Error)]
pub enum RecipeBuildError {
    /// Aisle not set, or set to zero rows / zero-width rows
    #[error("the aisle must not be empty")]
    EmptyAisle,
    /// One aisle row differs in width from the first
    #[error("inconsistent aisle width: row {row} has {found} symbols, expected {expected}")]
    InconsistentAisleWidth {
        /// Index of the offending row
        row: usize,
        /// Symbols in the offending row
        found: usize,
        /// Symbols in the first row
        expected: usize,
    },
    /// No aisle symbol maps to a predicate, or no ingredient was added
    #[error("no ingredients set")]
    NoIngredients,
    /// An ingredient was given as an empty stack snapshot
    #[error("an ingredient stack must not be empty")]
    EmptyIngredient,
    /// No result set
    #[error("no result set")]
    NoResult,
    /// Result set to an empty stack snapshot
    #[error("the result must not be empty")]
    EmptyResult,
    /// The ingredient predicate rejects its own exemplary ingredient
    #[error("the ingredient predicate does not accept the exemplary ingredient")]
    IngredientRejected,
    /// Experience yield was never set
    #[error("no experience yield set")]
    NoExperience,
    /// Experience yield below zero
    #[error("experience must be non-negative, got {0}")]
    NegativeExperience(f64),
}

/// Registry precondition failures.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The same recipe object was registered twice
    #[error("this recipe has already been registered")]
    DuplicateRecipe,
}

/// Result type alias for builder operations.
pub type BuildResult<T> = Result<T, RecipeBuildError>;
