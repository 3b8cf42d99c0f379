//! Helpers over untyped character drafts.
//!
//! Drafts are JSON trees: partially filled forms that may not satisfy the
//! character schema yet, so they are handled as [`serde_json::Value`].

use serde_json::{Map, Value};

/// Character draft as edited by the UI.
pub type CharacterDraft = Value;

/// Structural deep copy of a draft.
///
/// Object keys are re-inserted in sorted order, so two equivalent drafts
/// always produce identical copies regardless of how they were built.
#[must_use]
pub fn structural_clone(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut copy = Map::new();
            for key in keys {
                if let Some(child) = map.get(key) {
                    copy.insert(key.clone(), structural_clone(child));
                }
            }
            Value::Object(copy)
        }
        Value::Array(items) => Value::Array(items.iter().map(structural_clone).collect()),
        Value::Null => Value::Null,
        Value::Bool(flag) => Value::Bool(*flag),
        Value::Number(number) => Value::Number(number.clone()),
        Value::String(text) => Value::String(text.clone()),
    }
}

/// Assign `value` at a dotted `path` such as `abilityScores.strength`.
///
/// Missing intermediate objects are created. Array segments are addressed by
/// in-range numeric index. When an intermediate segment holds a scalar (or an
/// out-of-range index) nothing is written and `false` is returned.
pub fn set_path(target: &mut Value, path: &str, value: Value) -> bool {
    let segments: Vec<&str> = path.split('.').collect();
    if path.is_empty() || segments.iter().any(|segment| segment.is_empty()) {
        return false;
    }
    assign(target, &segments, value)
}

fn assign(node: &mut Value, segments: &[&str], value: Value) -> bool {
    let Some((head, rest)) = segments.split_first() else {
        return false;
    };
    match node {
        Value::Object(map) => {
            if rest.is_empty() {
                map.insert((*head).to_string(), value);
                return true;
            }
            let child = map
                .entry((*head).to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if child.is_null() {
                *child = Value::Object(Map::new());
            }
            assign(child, rest, value)
        }
        Value::Array(items) => {
            let Some(slot) = head.parse::<usize>().ok().and_then(|index| items.get_mut(index))
            else {
                return false;
            };
            if rest.is_empty() {
                *slot = value;
                return true;
            }
            if slot.is_null() {
                *slot = Value::Object(Map::new());
            }
            assign(slot, rest, value)
        }
        _ => false,
    }
}

/// Presence test used by the cheap heuristics.
///
/// `null`, `false`, `0` and the empty string count as absent; arrays and
/// objects (even empty ones) are present.
#[must_use]
pub fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(number)) => number.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::String(text)) => !text.is_empty(),
        Some(Value::Array(_) | Value::Object(_)) => true,
    }
}

/// True when `draft` is an object with at least one key.
#[must_use]
pub fn has_populated_fields(draft: &Value) -> bool {
    draft.as_object().is_some_and(|map| !map.is_empty())
}
