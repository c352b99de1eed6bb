use crate::key::Key;
use crate::raw::{next_index, reindex, Map, Raw, Slots};

/// Deep-merge `b` into `a`.
///
/// - Two arrays: integer-keyed slots of `a` and then `b` are renumbered
///   contiguously; a name key present on both sides is merged as two arrays
///   (a scalar side counts as a one-element array), so colliding scalars are
///   collected rather than overwritten.
/// - Two objects: properties that are containers on both sides merge
///   recursively, otherwise `b` wins.
/// - Anything else: `b`.
///
/// # Examples
///
/// ```
/// use json_walker_raw::{recursive_merge, Raw};
/// use serde_json::json;
///
/// let merged = recursive_merge(Raw::from(json!([1, 2])), Raw::from(json!([3])));
/// assert_eq!(merged, Raw::from(json!([1, 2, 3])));
///
/// let merged = recursive_merge(
///     Raw::from(json!({"a": {"x": 1}, "b": 1})),
///     Raw::from(json!({"a": {"y": 2}, "b": 2})),
/// );
/// assert_eq!(merged, Raw::from(json!({"a": {"x": 1, "y": 2}, "b": 2})));
/// ```
pub fn recursive_merge(a: Raw, b: Raw) -> Raw {
    match (a, b) {
        (Raw::Array(a), Raw::Array(b)) => Raw::Array(merge_slots(a, b)),
        (Raw::Object(a), Raw::Object(b)) => Raw::Object(merge_maps(a, b)),
        (_, b) => b,
    }
}

fn merge_slots(a: Slots, b: Slots) -> Slots {
    let mut out = reindex(a);
    let mut next = next_index(&out);
    for (key, value) in b {
        match key {
            Key::Index(_) => {
                out.insert(Key::Index(next), value);
                next += 1;
            }
            name => match out.get_mut(&name) {
                Some(existing) => {
                    let prev = std::mem::take(existing);
                    *existing = recursive_merge(as_array(prev), as_array(value));
                }
                None => {
                    out.insert(name, value);
                }
            },
        }
    }
    out
}

fn merge_maps(mut a: Map, b: Map) -> Map {
    for (key, value) in b {
        match a.get_mut(&key) {
            Some(existing) if existing.is_container() && value.is_container() => {
                let prev = std::mem::take(existing);
                *existing = recursive_merge(prev, value);
            }
            _ => {
                a.insert(key, value);
            }
        }
    }
    a
}

fn as_array(raw: Raw) -> Raw {
    match raw {
        Raw::Array(_) => raw,
        other => Raw::array([other]),
    }
}
