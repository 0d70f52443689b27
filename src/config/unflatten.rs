//! Rebuilds nested JSON from dot-delimited keys, for typed extraction.

use serde_json::{Map, Value as Json};

use super::value::Value;
use super::ConfigError;

/// Builds a nested JSON object from `(dotted key, leaf)` pairs.
///
/// Fails with [`ConfigError::KeyConflict`] when a key is both a leaf and a
/// namespace, e.g. `a` and `a.b` are both set.
pub fn unflatten<'a, I>(leaves: I) -> Result<Json, ConfigError>
where
    I: IntoIterator<Item = (&'a str, &'a Value)>,
{
    let mut root = Map::new();
    for (key, value) in leaves {
        insert_path(&mut root, key, value.to_json())?;
    }
    Ok(Json::Object(root))
}

fn insert_path(root: &mut Map<String, Json>, key: &str, leaf: Json) -> Result<(), ConfigError> {
    let conflict = || ConfigError::KeyConflict(key.to_string());

    let mut parts = key.split('.').peekable();
    let mut current = root;

    while let Some(part) = parts.next() {
        if parts.peek().is_none() {
            // Last segment: the slot must be free.
            if current.contains_key(part) {
                return Err(conflict());
            }
            current.insert(part.to_string(), leaf);
            return Ok(());
        }

        current = current
            .entry(part.to_string())
            .or_insert_with(|| Json::Object(Map::new()))
            .as_object_mut()
            .ok_or_else(conflict)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nested_paths() {
        let port = Value::Number(8080.0);
        let host = Value::from("example.com");
        let debug = Value::Bool(true);

        let tree = unflatten([
            ("server.port", &port),
            ("server.host", &host),
            ("debug", &debug),
        ])
        .unwrap();

        assert_eq!(
            tree,
            json!({"server": {"port": 8080, "host": "example.com"}, "debug": true})
        );
    }

    #[test]
    fn test_leaf_then_namespace_conflicts() {
        let one = Value::Number(1.0);
        let result = unflatten([("a", &one), ("a.b", &one)]);
        assert!(matches!(result, Err(ConfigError::KeyConflict(k)) if k == "a.b"));
    }

    #[test]
    fn test_namespace_then_leaf_conflicts() {
        let one = Value::Number(1.0);
        let result = unflatten([("a.b", &one), ("a", &one)]);
        assert!(matches!(result, Err(ConfigError::KeyConflict(k)) if k == "a"));
    }

    #[test]
    fn test_arrays_are_kept_whole() {
        let tags = Value::from(vec!["x", "y"]);
        let tree = unflatten([("tags", &tags)]).unwrap();
        assert_eq!(tree, json!({"tags": ["x", "y"]}));
    }
}
