use serde_json::json;
use varden_schema::{Schema, SchemaError, Shape};

fn signup() -> Box<dyn Schema> {
    Box::new(
        Shape::object([
            ("email", Shape::string().non_empty().into()),
            ("age", Shape::number().integer().min(18.0).into()),
            (
                "address",
                Shape::object([
                    ("street", Shape::string().non_empty().into()),
                    ("zip", Shape::string().max_len(5).optional()),
                ])
                .into(),
            ),
            ("tags", Shape::array(Shape::string()).min_items(1).into()),
        ])
        .field("newsletter", Shape::boolean().optional()),
    )
}

#[test]
fn shape_reports_issues_in_document_order() {
    let result = signup()
        .validate(&json!({
            "email": "",
            "age": 17,
            "address": {"street": "", "zip": "1234567"},
            "tags": [],
            "newsletter": "yes"
        }))
        .unwrap();

    let issues: Vec<(String, String)> = result
        .into_issues()
        .into_iter()
        .map(|issue| (issue.path_string(), issue.message))
        .collect();

    assert_eq!(
        issues,
        vec![
            ("email".into(), "must not be empty".into()),
            ("age".into(), "must be at least 18".into()),
            ("address.street".into(), "must not be empty".into()),
            ("address.zip".into(), "must be at most 5 characters".into()),
            ("tags".into(), "must contain at least 1 items".into()),
            ("newsletter".into(), "expected boolean, received string".into()),
        ]
    );
}

#[test]
fn shape_accepts_valid_document() {
    let result = signup()
        .validate(&json!({
            "email": "a@b.c",
            "age": 30,
            "address": {"street": "Main"},
            "tags": ["x"]
        }))
        .unwrap();
    assert!(result.is_valid());
    assert!(result.issues.is_none());
}

#[test]
fn shape_missing_tree_reports_each_required_field() {
    let result = signup().validate(&json!({})).unwrap();
    let paths: Vec<String> = result
        .into_issues()
        .iter()
        .map(|issue| issue.path_string())
        .collect();
    assert_eq!(paths, vec!["email", "age", "address", "tags"]);
}

#[test]
fn shape_never_fails_as_schema() {
    let result: Result<_, SchemaError> = Shape::any().validate(&json!(null));
    assert!(result.unwrap().is_valid());
}
