use crate::raw::Raw;

/// Encode a raw value as compact JSON.
///
/// Numeric arrays encode as JSON arrays, associative arrays and objects as
/// JSON objects. Key order is preserved.
///
/// # Examples
///
/// ```
/// use json_walker_raw::{to_canonical_string, Raw};
/// use serde_json::json;
///
/// assert_eq!(to_canonical_string(&Raw::from("foo")), r#""foo""#);
/// assert_eq!(to_canonical_string(&Raw::from(json!({"b": [1, 2], "a": null}))), r#"{"b":[1,2],"a":null}"#);
/// ```
pub fn to_canonical_string(raw: &Raw) -> String {
    raw.to_json().to_string()
}
