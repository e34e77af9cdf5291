//! Document equality utilities.
//!
//! Provides deep equality comparison functions for document values.

mod deep_equal;

pub use deep_equal::{deep_equal, deep_equal_opt, numbers_equal};
