use serde_json::json;
use varden_path::{
    compile, read, read_mut, remove, write, PathCache, PathError, MAX_ARRAY_PADDING,
};

#[test]
fn accessor_mixed_container_matrix() {
    let mut doc = json!({
        "user": {"name": "Ann", "tags": ["a", "b"]},
        "items": [{"title": "x"}, {"title": "y"}]
    });

    let cases = [
        ("user.name", Some(json!("Ann"))),
        ("user.tags.0", Some(json!("a"))),
        ("user.tags.2", None),
        ("items.1.title", Some(json!("y"))),
        ("items.1.missing", None),
        ("items.title", None),
    ];
    for (path, expected) in cases {
        assert_eq!(
            read(&doc, &compile(path).unwrap()).cloned(),
            expected,
            "path {path}"
        );
    }

    write(&mut doc, &compile("items.3.title").unwrap(), json!("z")).unwrap();
    assert_eq!(doc["items"], json!([{"title": "x"}, {"title": "y"}, null, {"title": "z"}]));
    assert_eq!(read(&doc, &compile("items.2").unwrap()), None);

    *read_mut(&mut doc, &compile("user.name").unwrap()).unwrap() = json!("Bea");
    assert_eq!(doc["user"]["name"], json!("Bea"));
}

#[test]
fn accessor_write_errors_do_not_clobber_scalars() {
    let mut doc = json!({"count": 3});
    let err = write(&mut doc, &compile("count.value").unwrap(), json!(1)).unwrap_err();
    assert_eq!(err, PathError::NotContainer { position: 1 });
    assert_eq!(doc, json!({"count": 3}));
}

#[test]
fn accessor_remove_then_rewrite() {
    let mut doc = json!({"address": {"street": "Main", "city": "X"}});
    let street = compile("address.street").unwrap();
    remove(&mut doc, &street);
    assert_eq!(read(&doc, &street), None);
    write(&mut doc, &street, json!("Side")).unwrap();
    assert_eq!(doc, json!({"address": {"city": "X", "street": "Side"}}));
}

#[test]
fn accessor_cache_feeds_accessors() {
    let mut cache = PathCache::new();
    let mut doc = json!({});
    for _ in 0..3 {
        let path = cache.compile("a.0.b").unwrap();
        write(&mut doc, &path, json!(true)).unwrap();
    }
    assert_eq!(cache.len(), 1);
    assert_eq!(doc, json!({"a": [{"b": true}]}));
}

#[test]
fn accessor_remove_interior_element_keeps_siblings() {
    let mut doc = json!({"tags": ["a", "b", "c"]});
    let first = compile("tags.0").unwrap();
    assert_eq!(remove(&mut doc, &first), Some(json!("a")));
    assert_eq!(read(&doc, &first), None);
    assert_eq!(read(&doc, &compile("tags.1").unwrap()), Some(&json!("b")));
    assert_eq!(read(&doc, &compile("tags.2").unwrap()), Some(&json!("c")));

    write(&mut doc, &first, json!("z")).unwrap();
    assert_eq!(doc, json!({"tags": ["z", "b", "c"]}));
}

#[test]
fn accessor_huge_index_is_rejected() {
    let mut doc = json!({"tags": []});
    let path = compile(&format!("tags.{}", usize::MAX)).unwrap();
    let err = write(&mut doc, &path, json!(1)).unwrap_err();
    assert!(matches!(err, PathError::IndexOutOfRange { position: 1, .. }));

    let path = compile(&format!("tags.{}", MAX_ARRAY_PADDING + 1)).unwrap();
    assert!(write(&mut doc, &path, json!(1)).is_err());
    assert_eq!(doc, json!({"tags": []}));
}
