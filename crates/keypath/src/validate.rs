//! Validation functions for keypaths.

use thiserror::Error;

use crate::SEPARATOR;

/// Maximum allowed keypath string length.
const MAX_KEYPATH_LENGTH: usize = 1024;

/// Maximum allowed path depth.
const MAX_PATH_LENGTH: usize = 256;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("KEYPATH_TOO_LONG")]
    KeypathTooLong,
    #[error("PATH_TOO_LONG")]
    PathTooLong,
    #[error("EMPTY_SEGMENT")]
    EmptySegment,
}

/// Validate a keypath string.
///
/// # Errors
///
/// Returns an error if:
/// - Any segment is empty (`""`, `"a..b"`, `".a"`, `"a."`)
/// - The keypath exceeds the maximum length (1024 characters)
/// - The keypath has more than 256 segments
///
/// # Example
///
/// ```
/// use keydelta_keypath::validate_keypath;
///
/// validate_keypath("foo.bar").unwrap();
/// validate_keypath("foo.0.bar").unwrap();
/// validate_keypath("foo..bar").unwrap_err();
/// validate_keypath("").unwrap_err();
/// ```
pub fn validate_keypath(keypath: &str) -> Result<(), ValidationError> {
    if keypath.len() > MAX_KEYPATH_LENGTH {
        return Err(ValidationError::KeypathTooLong);
    }
    let mut depth = 0usize;
    for segment in keypath.split(SEPARATOR) {
        if segment.is_empty() {
            return Err(ValidationError::EmptySegment);
        }
        depth += 1;
    }
    if depth > MAX_PATH_LENGTH {
        return Err(ValidationError::PathTooLong);
    }
    Ok(())
}
