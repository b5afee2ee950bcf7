//! Merges a fresh issue list into the per-path field metadata table.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::validation::Issue;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMeta {
    pub touched: bool,
    pub dirty: bool,
    pub error: String,
}

impl FieldMeta {
    fn flagged(error: String) -> Self {
        FieldMeta {
            touched: false,
            dirty: false,
            error,
        }
    }
}

/// Field metadata keyed by dotted path, in registration order.
pub type FieldTable = IndexMap<String, FieldMeta>;

/// Apply `issues` to `table` and return whether the run was valid.
///
/// Every existing entry takes the message of the first issue for its path,
/// or has its error cleared when there is none; `touched` and `dirty` are
/// left alone. Issues for paths without an entry create one, in issue order.
/// Each issue is consumed at most once and entries are never removed.
pub fn reconcile(table: &mut FieldTable, issues: Vec<Issue>) -> bool {
    let valid = issues.is_empty();
    let mut pending: Vec<Option<Issue>> = issues.into_iter().map(Some).collect();

    for (path, meta) in table.iter_mut() {
        let matched = pending
            .iter_mut()
            .find(|slot| matches!(slot, Some(issue) if issue.path == *path))
            .and_then(Option::take);
        match matched {
            Some(issue) => meta.error = issue.message,
            None => meta.error.clear(),
        }
    }

    let mut created = 0usize;
    for issue in pending.into_iter().flatten() {
        if !table.contains_key(&issue.path) {
            table.insert(issue.path, FieldMeta::flagged(issue.message));
            created += 1;
        }
    }

    tracing::debug!(valid, fields = table.len(), created, "reconciled field metadata");
    valid
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(touched: bool, dirty: bool, error: &str) -> FieldMeta {
        FieldMeta {
            touched,
            dirty,
            error: error.to_string(),
        }
    }

    #[test]
    fn test_stale_error_cleared_flags_kept() {
        let mut table = FieldTable::new();
        table.insert("a".into(), meta(true, false, "old"));

        assert!(reconcile(&mut table, vec![]));
        assert_eq!(table["a"], meta(true, false, ""));
    }

    #[test]
    fn test_unknown_path_creates_entry() {
        let mut table = FieldTable::new();

        assert!(!reconcile(&mut table, vec![Issue::new("b", "required")]));
        assert_eq!(table.len(), 1);
        assert_eq!(table["b"], meta(false, false, "required"));
    }

    #[test]
    fn test_existing_entry_takes_message() {
        let mut table = FieldTable::new();
        table.insert("name".into(), meta(true, true, ""));
        table.insert("age".into(), meta(false, true, "too young"));

        let valid = reconcile(&mut table, vec![Issue::new("name", "required")]);
        assert!(!valid);
        assert_eq!(table["name"], meta(true, true, "required"));
        assert_eq!(table["age"], meta(false, true, ""));
    }

    #[test]
    fn test_synthetic_entries_follow_issue_order() {
        let mut table = FieldTable::new();
        table.insert("a".into(), FieldMeta::default());

        reconcile(
            &mut table,
            vec![
                Issue::new("z", "last letter"),
                Issue::new("a", "first letter"),
                Issue::new("m", "middle"),
            ],
        );
        let keys: Vec<&str> = table.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["a", "z", "m"]);
        assert_eq!(table["a"].error, "first letter");
    }

    #[test]
    fn test_duplicate_issues_first_wins() {
        let mut table = FieldTable::new();
        table.insert("a".into(), meta(true, true, ""));

        reconcile(
            &mut table,
            vec![
                Issue::new("a", "one"),
                Issue::new("a", "two"),
                Issue::new("b", "three"),
                Issue::new("b", "four"),
            ],
        );
        assert_eq!(table["a"], meta(true, true, "one"));
        assert_eq!(table["b"], meta(false, false, "three"));
        assert_eq!(table.len(), 2);
    }
}
