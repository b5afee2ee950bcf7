//! Runs a schema against a value snapshot and flattens its report.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use varden_schema::{Schema, SchemaError, SchemaIssue};

/// A validation failure addressed by dotted path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub path: String,
    pub message: String,
}

impl Issue {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl From<SchemaIssue> for Issue {
    fn from(issue: SchemaIssue) -> Self {
        Issue {
            path: issue.path_string(),
            message: issue.message,
        }
    }
}

/// Validate `value` and return the issues in the order the schema reported
/// them. Schema failures propagate unchanged.
pub fn collect_issues<S: Schema + ?Sized>(
    schema: &S,
    value: &Value,
) -> Result<Vec<Issue>, SchemaError> {
    let result = schema.validate(value)?;
    let issues: Vec<Issue> = result.into_issues().into_iter().map(Issue::from).collect();
    tracing::trace!(issues = issues.len(), "schema validated snapshot");
    Ok(issues)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use varden_path::PathKey;
    use varden_schema::{schema_fn, SchemaResult};

    #[test]
    fn test_issue_paths_are_joined() {
        let schema = schema_fn(|_| {
            Ok(SchemaResult::from_issues(vec![
                SchemaIssue::new(vec!["tags".into(), PathKey::Index(0)], "bad tag"),
                SchemaIssue::new(vec!["name".into()], "required"),
            ]))
        });
        assert_eq!(
            collect_issues(&schema, &json!({})).unwrap(),
            vec![Issue::new("tags.0", "bad tag"), Issue::new("name", "required")]
        );
    }

    #[test]
    fn test_missing_issue_list_is_valid() {
        let schema = schema_fn(|_| Ok(SchemaResult { issues: None }));
        assert!(collect_issues(&schema, &json!(null)).unwrap().is_empty());
    }

    #[test]
    fn test_schema_failure_propagates() {
        let schema = schema_fn(|_| Err(SchemaError::failed("offline")));
        assert_eq!(
            collect_issues(&schema, &json!({})),
            Err(SchemaError::Failed("offline".into()))
        );
    }
}
