//! Path validation errors and limits.

use thiserror::Error;

/// Maximum number of keys in a compiled path.
pub const MAX_PATH_DEPTH: usize = 256;

/// Largest number of `null` holes a single write may add to an array.
pub const MAX_ARRAY_PADDING: usize = 1024;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("path is empty")]
    Empty,
    #[error("empty segment at position {position}")]
    EmptySegment { position: usize },
    #[error("array index `{segment}` does not fit in usize")]
    IndexOverflow { segment: String },
    #[error("path deeper than {max} segments")]
    TooDeep { max: usize },
    #[error("value at position {position} cannot hold child keys")]
    NotContainer { position: usize },
    #[error("index {index} at position {position} is too far past the array end ({len})")]
    IndexOutOfRange {
        position: usize,
        index: usize,
        len: usize,
    },
}

/// Check that `path` would compile, without keeping the result.
///
/// # Example
///
/// ```
/// use varden_path::validate_path;
///
/// validate_path("address.street").unwrap();
/// validate_path("tags.0").unwrap();
/// validate_path("a..b").unwrap_err();
/// validate_path("").unwrap_err();
/// ```
pub fn validate_path(path: &str) -> Result<(), PathError> {
    crate::compile(path).map(drop)
}
