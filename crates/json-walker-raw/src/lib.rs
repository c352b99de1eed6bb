//! Raw value model for json-walker.
//!
//! [`Raw`] is the plain data a json-walker node wraps: scalars, objects and
//! *keyed* arrays. Keyed arrays keep explicit slot keys so that associative
//! arrays and holes survive edits; an array is *numeric* when its keys are
//! exactly `0..len` in order.
//!
//! The crate also provides the two primitives the node layer builds on:
//! [`to_canonical_string`] (compact JSON encoding) and [`recursive_merge`].
//!
//! # Example
//!
//! ```
//! use json_walker_raw::{recursive_merge, to_canonical_string, Raw};
//! use serde_json::json;
//!
//! let raw = Raw::from(json!({"tags": ["a"]}));
//! let merged = recursive_merge(raw, Raw::from(json!({"tags": ["b"]})));
//! assert_eq!(to_canonical_string(&merged), r#"{"tags":["a","b"]}"#);
//! ```

mod key;
pub use key::Key;

mod raw;
pub use raw::{is_sequence, next_index, reindex, Map, Raw, Slots};

mod canonical;
pub use canonical::to_canonical_string;

mod merge;
pub use merge::recursive_merge;
