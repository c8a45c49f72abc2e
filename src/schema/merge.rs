//! Instance-over-base merge for schema trees
//!
//! Used for `extends` chains, object templates, predicate-map defaults and
//! per-value predicate overrides alike.

use serde_json::Value;

/// Merge `overlay` on top of `base`, returning a new tree.
///
/// - mapping + mapping: keys merged recursively, overlay wins
/// - sequence + sequence: base items followed by overlay items
/// - anything else: overlay replaces base
pub fn merge(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            let mut merged = base_map.clone();
            for (key, value) in overlay_map {
                let next = match base_map.get(key) {
                    Some(existing) => merge(existing, value),
                    None => value.clone(),
                };
                merged.insert(key.clone(), next);
            }
            Value::Object(merged)
        }
        (Value::Array(base_items), Value::Array(overlay_items)) => Value::Array(
            base_items
                .iter()
                .chain(overlay_items.iter())
                .cloned()
                .collect(),
        ),
        _ => overlay.clone(),
    }
}
