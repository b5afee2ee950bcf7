//! Structural get/set/remove over a JSON value tree.
//!
//! `None` is the "no value" marker throughout. Under an object key JSON
//! `null` is a real value and reads as `Some(&Value::Null)`. Inside an array
//! a `null` element is a hole: padding added by [`write`] and slots emptied
//! by [`remove`] both read as `None`, and the elements around them keep their
//! indices.

use serde_json::{Map, Value};

use crate::{PathError, PathKey, MAX_ARRAY_PADDING};

fn child<'a>(node: &'a Value, key: &PathKey) -> Option<&'a Value> {
    match (node, key) {
        (Value::Object(map), key) => map.get(&*key.as_property()),
        (Value::Array(items), PathKey::Index(idx)) => {
            items.get(*idx).filter(|item| !item.is_null())
        }
        _ => None,
    }
}

fn child_mut<'a>(node: &'a mut Value, key: &PathKey) -> Option<&'a mut Value> {
    match (node, key) {
        (Value::Object(map), key) => map.get_mut(&*key.as_property()),
        (Value::Array(items), PathKey::Index(idx)) => {
            items.get_mut(*idx).filter(|item| !item.is_null())
        }
        _ => None,
    }
}

/// Read the value at `path`.
///
/// Returns `None` when the path cannot be followed. The empty path reads the
/// root.
///
/// # Example
///
/// ```
/// use varden_path::{compile, read};
/// use serde_json::json;
///
/// let doc = json!({"foo": {"bar": 2}});
/// assert_eq!(read(&doc, &compile("foo.bar").unwrap()), Some(&json!(2)));
/// assert_eq!(read(&doc, &compile("foo.bar.baz.qwe").unwrap()), None);
/// ```
pub fn read<'a>(tree: &'a Value, path: &[PathKey]) -> Option<&'a Value> {
    read_or(tree, path, None)
}

/// Read the value at `path`, falling back to `default` when an
/// intermediate segment cannot be traversed.
///
/// The final segment is never defaulted: once its parent resolves, whatever
/// the parent holds under the last key is returned, including `null`, `0`,
/// `""` and `None` for a missing key.
///
/// # Example
///
/// ```
/// use varden_path::{compile, read_or};
/// use serde_json::json;
///
/// let fallback = json!("TEST");
/// let doc = json!({"foo": {"bar": null}});
///
/// // Intermediate miss: default.
/// let deep = compile("foo.bar.baz.qwe").unwrap();
/// assert_eq!(read_or(&doc, &deep, Some(&fallback)), Some(&fallback));
///
/// // Parent resolved: the stored null wins over the default.
/// let leaf = compile("foo.bar").unwrap();
/// assert_eq!(read_or(&doc, &leaf, Some(&fallback)), Some(&json!(null)));
///
/// // Parent resolved, key missing: no value, still not the default.
/// let missing = compile("foo.nope").unwrap();
/// assert_eq!(read_or(&doc, &missing, Some(&fallback)), None);
/// ```
pub fn read_or<'a>(
    tree: &'a Value,
    path: &[PathKey],
    default: Option<&'a Value>,
) -> Option<&'a Value> {
    let Some((last, parents)) = path.split_last() else {
        return Some(tree);
    };
    let mut current = tree;
    for key in parents {
        match child(current, key) {
            Some(next) => current = next,
            None => return default,
        }
    }
    child(current, last)
}

/// Strict mutable lookup; `None` if any segment is missing or lands on an
/// array hole.
pub fn read_mut<'a>(tree: &'a mut Value, path: &[PathKey]) -> Option<&'a mut Value> {
    let mut current = tree;
    for key in path {
        current = child_mut(current, key)?;
    }
    Some(current)
}

/// Slot for `key` in `node`, inserting a `null` placeholder when absent.
fn slot<'a>(
    node: &'a mut Value,
    key: &PathKey,
    position: usize,
) -> Result<&'a mut Value, PathError> {
    match (node, key) {
        (Value::Object(map), key) => Ok(map
            .entry(key.as_property().into_owned())
            .or_insert(Value::Null)),
        (Value::Array(items), PathKey::Index(idx)) => {
            let idx = *idx;
            if idx >= items.len() {
                let out_of_range = PathError::IndexOutOfRange {
                    position,
                    index: idx,
                    len: items.len(),
                };
                if idx - items.len() > MAX_ARRAY_PADDING {
                    return Err(out_of_range);
                }
                let len = idx.checked_add(1).ok_or(out_of_range)?;
                items.resize(len, Value::Null);
            }
            Ok(&mut items[idx])
        }
        _ => Err(PathError::NotContainer { position }),
    }
}

/// Write `value` at `path`, creating missing intermediate containers.
///
/// A missing or `null` intermediate becomes an array when the following key
/// is an index, otherwise an object. Writing past the end of an array pads
/// the gap with `null` holes. The empty path replaces the root.
///
/// # Errors
///
/// `PathError::NotContainer` when a segment would have to descend into a
/// scalar, or a property name is applied to an array.
/// `PathError::IndexOutOfRange` when an index lies more than
/// [`MAX_ARRAY_PADDING`] slots past the end of its array. In both cases
/// containers created along the way may remain.
///
/// # Example
///
/// ```
/// use varden_path::{compile, write};
/// use serde_json::json;
///
/// let mut doc = json!({"foo": {}});
/// write(&mut doc, &compile("foo.bar.0.baz").unwrap(), json!(4)).unwrap();
/// assert_eq!(doc, json!({"foo": {"bar": [{"baz": 4}]}}));
/// ```
pub fn write(tree: &mut Value, path: &[PathKey], value: Value) -> Result<(), PathError> {
    let Some((last, parents)) = path.split_last() else {
        *tree = value;
        return Ok(());
    };
    let mut current = tree;
    for (position, key) in parents.iter().enumerate() {
        current = slot(current, key, position)?;
        if current.is_null() {
            *current = if path[position + 1].is_index() {
                Value::Array(Vec::new())
            } else {
                Value::Object(Map::new())
            };
        }
    }
    *slot(current, last, parents.len())? = value;
    Ok(())
}

/// Remove the value at `path` from its parent and return it.
///
/// Missing intermediates, a missing final key or a non-container parent make
/// this a no-op. Removing an array element leaves a `null` hole so later
/// elements keep their indices; holes at the end of the array are dropped.
/// Remaining object keys keep their order.
///
/// # Example
///
/// ```
/// use varden_path::{compile, remove};
/// use serde_json::json;
///
/// let mut doc = json!({"foo": {"bar": 2, "baz": 3}});
/// assert_eq!(remove(&mut doc, &compile("foo.bar").unwrap()), Some(json!(2)));
/// assert_eq!(doc, json!({"foo": {"baz": 3}}));
///
/// assert_eq!(remove(&mut doc, &compile("a.b.c").unwrap()), None);
/// assert_eq!(doc, json!({"foo": {"baz": 3}}));
/// ```
pub fn remove(tree: &mut Value, path: &[PathKey]) -> Option<Value> {
    let (last, parents) = path.split_last()?;
    let parent = read_mut(tree, parents)?;
    match (parent, last) {
        (Value::Object(map), key) => map.shift_remove(&*key.as_property()),
        (Value::Array(items), PathKey::Index(idx)) => {
            let removed = std::mem::take(items.get_mut(*idx)?);
            while items.last().is_some_and(Value::is_null) {
                items.pop();
            }
            Some(removed).filter(|value| !value.is_null())
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile;
    use serde_json::json;

    fn p(path: &str) -> crate::CompiledPath {
        compile(path).unwrap()
    }

    #[test]
    fn test_read_nested() {
        let doc = json!({"foo": {"bar": 2}});
        assert_eq!(read(&doc, &p("foo.bar")), Some(&json!(2)));
        assert_eq!(read(&doc, &p("foo")), Some(&json!({"bar": 2})));
    }

    #[test]
    fn test_read_unknown_path() {
        let doc = json!({"foo": {"bar": 2}});
        assert_eq!(read(&doc, &p("foo.bar.baz.qwe.asd")), None);
    }

    #[test]
    fn test_read_default_for_unknown_path() {
        let doc = json!({"foo": {"bar": 2}});
        let fallback = json!("TEST");
        assert_eq!(
            read_or(&doc, &p("foo.bar.baz.qwe.asd"), Some(&fallback)),
            Some(&fallback)
        );
    }

    #[test]
    fn test_read_falsy_values_over_default() {
        let fallback = json!("TEST");
        for stored in [json!(null), json!(0), json!(""), json!(false)] {
            let doc = json!({"foo": {"bar": stored.clone()}});
            assert_eq!(read_or(&doc, &p("foo.bar"), Some(&fallback)), Some(&stored));
        }
        let doc = json!({"foo": {}});
        assert_eq!(read_or(&doc, &p("foo.bar"), Some(&fallback)), None);
    }

    #[test]
    fn test_read_array_elements() {
        let doc = json!({"tags": ["a", "b"]});
        assert_eq!(read(&doc, &p("tags.1")), Some(&json!("b")));
        assert_eq!(read(&doc, &p("tags.2")), None);
        assert_eq!(read(&doc, &p("tags.name")), None);
    }

    #[test]
    fn test_read_index_key_on_object() {
        let doc = json!({"0": "zero"});
        assert_eq!(read(&doc, &p("0")), Some(&json!("zero")));
    }

    #[test]
    fn test_write_existing() {
        let mut doc = json!({"foo": {"bar": 2}});
        write(&mut doc, &p("foo.bar"), json!(4)).unwrap();
        assert_eq!(doc, json!({"foo": {"bar": 4}}));
    }

    #[test]
    fn test_write_creates_objects() {
        let mut doc = json!({"foo": {}});
        write(&mut doc, &p("foo.bar.baz"), json!(4)).unwrap();
        assert_eq!(doc, json!({"foo": {"bar": {"baz": 4}}}));
    }

    #[test]
    fn test_write_creates_arrays_for_index_keys() {
        let mut doc = json!({"foo": {}});
        write(&mut doc, &p("foo.bar.0.baz"), json!(4)).unwrap();
        assert_eq!(doc["foo"]["bar"][0]["baz"], json!(4));
    }

    #[test]
    fn test_write_replaces_null_intermediate() {
        let mut doc = json!({"foo": null});
        write(&mut doc, &p("foo.1"), json!("x")).unwrap();
        assert_eq!(doc, json!({"foo": [null, "x"]}));
    }

    #[test]
    fn test_write_into_scalar_fails() {
        let mut doc = json!({"foo": 2});
        assert_eq!(
            write(&mut doc, &p("foo.bar"), json!(1)),
            Err(PathError::NotContainer { position: 1 })
        );
        assert_eq!(doc, json!({"foo": 2}));
    }

    #[test]
    fn test_write_name_on_array_fails() {
        let mut doc = json!({"tags": []});
        assert!(write(&mut doc, &p("tags.first"), json!(1)).is_err());
    }

    #[test]
    fn test_write_empty_path_replaces_root() {
        let mut doc = json!({"a": 1});
        write(&mut doc, &[], json!([1])).unwrap();
        assert_eq!(doc, json!([1]));
    }

    #[test]
    fn test_remove_leaf_and_subtree() {
        let mut doc = json!({"foo": {"bar": 2, "baz": 3}});
        remove(&mut doc, &p("foo.bar"));
        assert_eq!(doc, json!({"foo": {"baz": 3}}));

        let mut doc = json!({"foo": {"bar": {"baz": 3}, "zab": 4}});
        remove(&mut doc, &p("foo.bar"));
        assert_eq!(doc, json!({"foo": {"zab": 4}}));
    }

    #[test]
    fn test_remove_missing_path_is_noop() {
        let mut doc = json!({"foo": {"bar": 2, "baz": 3}});
        assert_eq!(remove(&mut doc, &p("test1.test2.test3.test4")), None);
        assert_eq!(doc, json!({"foo": {"bar": 2, "baz": 3}}));
    }

    #[test]
    fn test_remove_keeps_key_order() {
        let mut doc = json!({"a": 1, "b": 2, "c": 3});
        remove(&mut doc, &p("a"));
        let keys: Vec<_> = doc.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["b", "c"]);
    }

    #[test]
    fn test_remove_array_element_leaves_hole() {
        let mut doc = json!({"tags": ["a", "b", "c"]});
        assert_eq!(remove(&mut doc, &p("tags.0")), Some(json!("a")));
        assert_eq!(doc, json!({"tags": [null, "b", "c"]}));
        assert_eq!(read(&doc, &p("tags.0")), None);
        assert_eq!(read(&doc, &p("tags.1")), Some(&json!("b")));
        assert_eq!(remove(&mut doc, &p("tags.0")), None);
        assert_eq!(remove(&mut doc, &p("tags.5")), None);
    }

    #[test]
    fn test_remove_last_element_drops_trailing_holes() {
        let mut doc = json!({"tags": ["a", null, "c"]});
        assert_eq!(remove(&mut doc, &p("tags.2")), Some(json!("c")));
        assert_eq!(doc, json!({"tags": ["a"]}));
    }

    #[test]
    fn test_read_padding_is_a_hole() {
        let mut doc = json!({});
        write(&mut doc, &p("tags.2"), json!("c")).unwrap();
        assert_eq!(doc, json!({"tags": [null, null, "c"]}));
        assert_eq!(read(&doc, &p("tags.0")), None);
        let fallback = json!("TEST");
        assert_eq!(read_or(&doc, &p("tags.0"), Some(&fallback)), None);
        assert_eq!(read_or(&doc, &p("tags.0.name"), Some(&fallback)), Some(&fallback));
    }

    #[test]
    fn test_write_far_past_array_end_fails() {
        let mut doc = json!({"tags": []});
        assert_eq!(
            write(&mut doc, &p("tags.18446744073709551615"), json!(1)),
            Err(PathError::IndexOutOfRange {
                position: 1,
                index: usize::MAX,
                len: 0,
            })
        );
        assert!(write(&mut doc, &p("tags.100000000000"), json!(1)).is_err());
        assert_eq!(doc, json!({"tags": []}));

        write(&mut doc, &p(&format!("tags.{MAX_ARRAY_PADDING}")), json!(1)).unwrap();
        assert_eq!(doc["tags"].as_array().unwrap().len(), MAX_ARRAY_PADDING + 1);
    }
}
