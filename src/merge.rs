use serde_json::{Map, Value};

/// Deep-merge `overlay` on top of `base`.
/// If both sides have an object for the same key, recurse.
/// Otherwise, `overlay`'s value wins.
pub fn deep_merge(mut base: Map<String, Value>, overlay: Map<String, Value>) -> Map<String, Value> {
    for (key, overlay_val) in overlay {
        match (base.remove(&key), overlay_val) {
            (Some(Value::Object(base_obj)), Value::Object(overlay_obj)) => {
                base.insert(key, Value::Object(deep_merge(base_obj, overlay_obj)));
            }
            (_, overlay_val) => {
                base.insert(key, overlay_val);
            }
        }
    }
    base
}

/// Navigate an object tree by dotted key path (e.g. `"codeFormatting.preset"`).
pub fn get_path<'a>(map: &'a Map<String, Value>, dotted_key: &str) -> Option<&'a Value> {
    let (path, leaf) = match dotted_key.rsplit_once('.') {
        Some((p, l)) => (Some(p), l),
        None => (None, dotted_key),
    };

    let obj = match path {
        Some(path) => {
            let mut current = map;
            for segment in path.split('.') {
                current = current.get(segment)?.as_object()?;
            }
            current
        }
        None => map,
    };

    obj.get(leaf)
}

/// Set `value` at a dotted key path, creating intermediate objects as needed.
/// A non-object value in the way is replaced by an object.
pub fn set_path(map: &mut Map<String, Value>, dotted_key: &str, value: Value) {
    let (path, leaf) = match dotted_key.rsplit_once('.') {
        Some((p, l)) => (Some(p), l),
        None => (None, dotted_key),
    };

    let mut current = map;
    if let Some(path) = path {
        for segment in path.split('.') {
            let slot = current
                .entry(segment)
                .or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            current = match slot {
                Value::Object(obj) => obj,
                _ => unreachable!("slot was just made an object"),
            };
        }
    }

    current.insert(leaf.to_string(), value);
}

/// Remove the value at a dotted key path. Returns the removed value.
/// Intermediate objects left empty are kept.
pub fn remove_path(map: &mut Map<String, Value>, dotted_key: &str) -> Option<Value> {
    let (path, leaf) = match dotted_key.rsplit_once('.') {
        Some((p, l)) => (Some(p), l),
        None => (None, dotted_key),
    };

    let mut current = map;
    if let Some(path) = path {
        for segment in path.split('.') {
            current = current.get_mut(segment)?.as_object_mut()?;
        }
    }

    current.remove(leaf)
}
