//! Type definitions for compiled paths.

use std::borrow::Cow;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// A single step of a compiled path.
///
/// A segment made only of ASCII digits compiles to [`PathKey::Index`], every
/// other segment to [`PathKey::Name`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathKey {
    /// Object property name.
    Name(String),
    /// Array position.
    Index(usize),
}

impl PathKey {
    pub fn is_index(&self) -> bool {
        matches!(self, PathKey::Index(_))
    }

    /// The key as used for an object property lookup.
    ///
    /// Indices address objects through their decimal representation, so
    /// `{"0": "x"}` is reachable via `0`.
    pub fn as_property(&self) -> Cow<'_, str> {
        match self {
            PathKey::Name(name) => Cow::Borrowed(name),
            PathKey::Index(idx) => Cow::Owned(idx.to_string()),
        }
    }
}

impl fmt::Display for PathKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathKey::Name(name) => f.write_str(name),
            PathKey::Index(idx) => write!(f, "{idx}"),
        }
    }
}

impl From<usize> for PathKey {
    fn from(idx: usize) -> Self {
        PathKey::Index(idx)
    }
}

impl From<&str> for PathKey {
    fn from(name: &str) -> Self {
        PathKey::Name(name.to_string())
    }
}

impl From<String> for PathKey {
    fn from(name: String) -> Self {
        PathKey::Name(name)
    }
}

/// An immutable, compiled dotted path.
///
/// Cloning is cheap: the keys live in a shared slice.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompiledPath {
    keys: Arc<[PathKey]>,
}

impl CompiledPath {
    /// Build a path from already classified keys.
    ///
    /// No validation happens here; use [`crate::compile`] for untrusted input.
    pub fn from_keys(keys: Vec<PathKey>) -> Self {
        Self { keys: keys.into() }
    }

    pub fn keys(&self) -> &[PathKey] {
        &self.keys
    }
}

impl Deref for CompiledPath {
    type Target = [PathKey];

    fn deref(&self) -> &[PathKey] {
        &self.keys
    }
}

impl AsRef<[PathKey]> for CompiledPath {
    fn as_ref(&self) -> &[PathKey] {
        &self.keys
    }
}

impl fmt::Display for CompiledPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::format(&self.keys))
    }
}
