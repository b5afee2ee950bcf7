//! Dotted path utilities.
//!
//! Paths such as `address.street` or `tags.0` address values inside a
//! [`serde_json::Value`] tree. A segment made only of ASCII digits is an
//! array index, every other segment is a property name. There is no escape
//! syntax, so property names cannot contain `.`.
//!
//! # Example
//!
//! ```
//! use varden_path::{compile, read, remove, write};
//! use serde_json::json;
//!
//! let path = compile("user.tags.0").unwrap();
//!
//! let mut doc = json!({});
//! write(&mut doc, &path, json!("admin")).unwrap();
//! assert_eq!(doc, json!({"user": {"tags": ["admin"]}}));
//! assert_eq!(read(&doc, &path), Some(&json!("admin")));
//!
//! remove(&mut doc, &path);
//! assert_eq!(doc, json!({"user": {"tags": []}}));
//! ```

pub mod access;
pub mod cache;
pub mod types;
pub mod validate;

pub use access::{read, read_mut, read_or, remove, write};
pub use cache::PathCache;
pub use types::{CompiledPath, PathKey};
pub use validate::{validate_path, PathError, MAX_ARRAY_PADDING, MAX_PATH_DEPTH};

/// Check if a path segment is an array index.
///
/// A segment is an index iff it is non-empty and every character is an
/// ASCII digit. Leading zeros are allowed.
///
/// # Example
///
/// ```
/// use varden_path::is_index;
///
/// assert!(is_index("0"));
/// assert!(is_index("123"));
/// assert!(!is_index("123test"));
/// assert!(!is_index("-1"));
/// assert!(!is_index(""));
/// ```
pub fn is_index(segment: &str) -> bool {
    !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit())
}

/// Compile a dotted path string into keys.
///
/// # Errors
///
/// - `PathError::Empty` for the empty string
/// - `PathError::EmptySegment` for `a..b`, `.a` or `a.`
/// - `PathError::IndexOverflow` for digit runs that do not fit in `usize`
/// - `PathError::TooDeep` past [`MAX_PATH_DEPTH`] segments
///
/// # Example
///
/// ```
/// use varden_path::{compile, PathKey};
///
/// let path = compile("items.2.title").unwrap();
/// assert_eq!(
///     path.keys(),
///     &[
///         PathKey::Name("items".into()),
///         PathKey::Index(2),
///         PathKey::Name("title".into()),
///     ]
/// );
/// ```
pub fn compile(path: &str) -> Result<CompiledPath, PathError> {
    if path.is_empty() {
        return Err(PathError::Empty);
    }
    let mut keys = Vec::new();
    for (position, segment) in path.split('.').enumerate() {
        if position >= MAX_PATH_DEPTH {
            return Err(PathError::TooDeep {
                max: MAX_PATH_DEPTH,
            });
        }
        keys.push(parse_segment(segment, position)?);
    }
    Ok(CompiledPath::from_keys(keys))
}

fn parse_segment(segment: &str, position: usize) -> Result<PathKey, PathError> {
    if segment.is_empty() {
        return Err(PathError::EmptySegment { position });
    }
    if !is_index(segment) {
        return Ok(PathKey::Name(segment.to_string()));
    }
    segment
        .parse()
        .map(PathKey::Index)
        .map_err(|_| PathError::IndexOverflow {
            segment: segment.to_string(),
        })
}

/// Format keys back into a dotted path string.
///
/// # Example
///
/// ```
/// use varden_path::{format, PathKey};
///
/// assert_eq!(format(&[]), "");
/// assert_eq!(format(&["tags".into(), PathKey::Index(0)]), "tags.0");
/// ```
pub fn format(keys: &[PathKey]) -> String {
    let mut out = String::new();
    for (i, key) in keys.iter().enumerate() {
        if i > 0 {
            out.push('.');
        }
        out.push_str(&key.as_property());
    }
    out
}
