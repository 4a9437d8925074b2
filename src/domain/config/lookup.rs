//! Dotted-path access into nested configuration values.

use serde_json::{Map, Value};

pub(crate) fn get_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(value, |current, segment| current.as_object()?.get(segment))
}

/// Set `new` at `path`, replacing any non-table value found on the way.
pub(crate) fn set_path(value: &mut Value, path: &str, new: Value) {
    match path.split_once('.') {
        Some((head, rest)) => {
            let child = ensure_table(value).entry(head.to_string()).or_insert(Value::Null);
            set_path(child, rest, new);
        }
        None => {
            ensure_table(value).insert(path.to_string(), new);
        }
    }
}

/// Replace `value` with an empty table unless it already is one.
pub(crate) fn ensure_table(value: &mut Value) -> &mut Map<String, Value> {
    match value {
        Value::Object(table) => table,
        other => {
            *other = Value::Object(Map::new());
            ensure_table(other)
        }
    }
}

pub(crate) fn remove_path(value: &mut Value, path: &str) -> bool {
    let (parent, leaf) = match path.rsplit_once('.') {
        Some((parent, leaf)) => (get_path_mut(value, parent), leaf),
        None => (Some(value), path),
    };

    parent.and_then(Value::as_object_mut).and_then(|table| table.remove(leaf)).is_some()
}

fn get_path_mut<'a>(value: &'a mut Value, path: &str) -> Option<&'a mut Value> {
    path.split('.').try_fold(value, |current, segment| current.as_object_mut()?.get_mut(segment))
}

/// Recursively merge `overlay` into `base`. Tables merge key by key; anything else is replaced.
pub(crate) fn merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn get_path_walks_nested_tables() {
        let value = json!({ "a": { "b": { "c": 3 } } });
        assert_eq!(get_path(&value, "a.b.c"), Some(&json!(3)));
        assert_eq!(get_path(&value, "a.b"), Some(&json!({ "c": 3 })));
        assert_eq!(get_path(&value, "a.x"), None);
        assert_eq!(get_path(&value, "a.b.c.d"), None);
    }

    #[test]
    fn set_path_creates_and_overwrites_tables() {
        let mut value = json!({ "a": 1 });
        set_path(&mut value, "a.b", json!("x"));
        set_path(&mut value, "c.d.e", json!(true));
        assert_eq!(value, json!({ "a": { "b": "x" }, "c": { "d": { "e": true } } }));
    }

    #[test]
    fn remove_path_reports_whether_a_value_was_removed() {
        let mut value = json!({ "a": { "b": 1, "c": 2 } });
        assert!(remove_path(&mut value, "a.b"));
        assert!(!remove_path(&mut value, "a.b"));
        assert!(!remove_path(&mut value, "missing.key"));
        assert_eq!(value, json!({ "a": { "c": 2 } }));
    }

    #[test]
    fn merge_is_recursive_for_tables_only() {
        let mut base = json!({ "db": { "host": "localhost", "port": 5432 }, "list": [1, 2] });
        merge(&mut base, json!({ "db": { "host": "db.internal" }, "list": [3] }));
        assert_eq!(
            base,
            json!({ "db": { "host": "db.internal", "port": 5432 }, "list": [3] })
        );
    }
}
