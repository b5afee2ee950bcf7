//! The validation contract a form is checked against.
//!
//! A [`Schema`] receives the whole value tree and reports problems as data:
//! a list of [`SchemaIssue`]s, each carrying the path it applies to. Only
//! failures of the schema itself travel through [`SchemaError`].
//!
//! [`Shape`] is a ready-made declarative schema:
//!
//! ```
//! use varden_schema::{Schema, Shape};
//! use serde_json::json;
//!
//! let schema = Shape::object([
//!     ("name", Shape::string().non_empty().into()),
//!     ("age", Shape::number().integer().min(0.0).optional()),
//! ]);
//!
//! let result = schema.validate(&json!({"name": "", "age": 1.5})).unwrap();
//! let issues = result.issues.unwrap();
//! assert_eq!(issues.len(), 2);
//! assert_eq!(issues[0].path_string(), "name");
//! assert_eq!(issues[1].path_string(), "age");
//! ```

use std::rc::Rc;
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use varden_path::PathKey;

mod check;
pub mod shape;

pub use shape::{ArrayShape, BooleanShape, NumberShape, ObjectShape, Shape, StringShape};

/// One problem reported by a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaIssue {
    pub message: String,
    pub path: Vec<PathKey>,
}

impl SchemaIssue {
    pub fn new(path: Vec<PathKey>, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            path,
        }
    }

    /// The issue path joined with `.`.
    pub fn path_string(&self) -> String {
        varden_path::format(&self.path)
    }
}

/// Outcome of one validation run. `None` or an empty list means valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaResult {
    pub issues: Option<Vec<SchemaIssue>>,
}

impl SchemaResult {
    pub fn valid() -> Self {
        Self { issues: None }
    }

    pub fn from_issues(issues: Vec<SchemaIssue>) -> Self {
        if issues.is_empty() {
            Self::valid()
        } else {
            Self {
                issues: Some(issues),
            }
        }
    }

    pub fn is_valid(&self) -> bool {
        self.issues.as_ref().map_or(true, Vec::is_empty)
    }

    pub fn into_issues(self) -> Vec<SchemaIssue> {
        self.issues.unwrap_or_default()
    }
}

/// Internal failure of a schema, as opposed to a reported issue.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("schema failed: {0}")]
    Failed(String),
}

impl SchemaError {
    pub fn failed(reason: impl Into<String>) -> Self {
        SchemaError::Failed(reason.into())
    }
}

/// The validation entry point a form is built around.
pub trait Schema {
    fn validate(&self, value: &Value) -> Result<SchemaResult, SchemaError>;
}

impl<S: Schema + ?Sized> Schema for &S {
    fn validate(&self, value: &Value) -> Result<SchemaResult, SchemaError> {
        (**self).validate(value)
    }
}

impl<S: Schema + ?Sized> Schema for Box<S> {
    fn validate(&self, value: &Value) -> Result<SchemaResult, SchemaError> {
        (**self).validate(value)
    }
}

impl<S: Schema + ?Sized> Schema for Rc<S> {
    fn validate(&self, value: &Value) -> Result<SchemaResult, SchemaError> {
        (**self).validate(value)
    }
}

impl<S: Schema + ?Sized> Schema for Arc<S> {
    fn validate(&self, value: &Value) -> Result<SchemaResult, SchemaError> {
        (**self).validate(value)
    }
}

/// Adapter turning a closure into a [`Schema`].
///
/// ```
/// use varden_schema::{schema_fn, Schema, SchemaIssue, SchemaResult};
/// use serde_json::json;
///
/// let schema = schema_fn(|value| {
///     let mut issues = Vec::new();
///     if value["name"].as_str().map_or(true, str::is_empty) {
///         issues.push(SchemaIssue::new(vec!["name".into()], "required"));
///     }
///     Ok(SchemaResult::from_issues(issues))
/// });
///
/// assert!(!schema.validate(&json!({})).unwrap().is_valid());
/// assert!(schema.validate(&json!({"name": "Ann"})).unwrap().is_valid());
/// ```
pub struct FnSchema<F>(F);

pub fn schema_fn<F>(f: F) -> FnSchema<F>
where
    F: Fn(&Value) -> Result<SchemaResult, SchemaError>,
{
    FnSchema(f)
}

impl<F> Schema for FnSchema<F>
where
    F: Fn(&Value) -> Result<SchemaResult, SchemaError>,
{
    fn validate(&self, value: &Value) -> Result<SchemaResult, SchemaError> {
        (self.0)(value)
    }
}

impl<F> std::fmt::Debug for FnSchema<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FnSchema")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_result_validity() {
        assert!(SchemaResult::valid().is_valid());
        assert!(SchemaResult { issues: Some(vec![]) }.is_valid());
        assert!(SchemaResult::from_issues(vec![]).issues.is_none());
        let bad = SchemaResult::from_issues(vec![SchemaIssue::new(vec![], "x")]);
        assert!(!bad.is_valid());
        assert_eq!(bad.into_issues().len(), 1);
    }

    #[test]
    fn test_issue_path_string() {
        let issue = SchemaIssue::new(vec!["tags".into(), PathKey::Index(2)], "bad");
        assert_eq!(issue.path_string(), "tags.2");
    }

    #[test]
    fn test_schema_error_propagates_through_wrappers() {
        let schema: Box<dyn Schema> = Box::new(schema_fn(|_| Err(SchemaError::failed("boom"))));
        let shared = Rc::new(schema);
        assert_eq!(
            shared.validate(&json!(null)),
            Err(SchemaError::Failed("boom".into()))
        );
    }
}
