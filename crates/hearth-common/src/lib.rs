//! # Hearth Common
//!
//! Shared value types for the Hearth content-extension layer:
//! - Item type identifiers
//! - Immutable item stack snapshots
//!
//! These types carry no behavior beyond construction and inspection; all
//! matching logic lives in `hearth-recipes`.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod ids;
pub mod snapshot;

pub use ids::ItemTypeId;
pub use snapshot::{ItemStackSnapshot, WILDCARD_METADATA};
