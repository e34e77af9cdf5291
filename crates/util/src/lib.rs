//! keydelta-util - structural predicates over keydelta documents
//!
//! Equality, emptiness and membership checks used by the diff engine.

pub mod has_own_property;
pub mod is_empty;
pub mod json_equal;

// Re-exports for convenience
pub use has_own_property::has_own_property;
pub use is_empty::is_empty_object;
pub use json_equal::{deep_equal, deep_equal_opt, numbers_equal};
