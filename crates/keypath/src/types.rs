//! Type definitions for keypaths.

/// A dot-delimited keypath such as `a.b.2.c`.
pub type Keypath = String;

/// Options for [`keypaths`](crate::keypaths).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeypathsOptions {
    /// Also emit branch paths, not only leaves. A branch is emitted before
    /// its descendants.
    pub all_levels: bool,
}

impl KeypathsOptions {
    pub fn leaves() -> Self {
        Self { all_levels: false }
    }

    pub fn all_levels() -> Self {
        Self { all_levels: true }
    }
}
