//! Memoized path compilation.

use std::collections::HashMap;

use crate::{compile, CompiledPath, PathError};

/// Maps path strings to their compiled form so repeated lookups of the
/// same field skip re-parsing.
///
/// Failed compilations are not cached.
#[derive(Debug, Default, Clone)]
pub struct PathCache {
    entries: HashMap<String, CompiledPath>,
}

impl PathCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile `path`, reusing an earlier result when there is one.
    pub fn compile(&mut self, path: &str) -> Result<CompiledPath, PathError> {
        if let Some(hit) = self.entries.get(path) {
            return Ok(hit.clone());
        }
        let compiled = compile(path)?;
        self.entries.insert(path.to_string(), compiled.clone());
        Ok(compiled)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
