//! Parent-aware navigation, querying and editing of JSON-like trees.
//!
//! [`wrap`] turns a value into a [`Node`]: an array node, an object node or a
//! value (leaf) node. Nodes can be navigated by key or by path, with
//! pseudo-selectors (`::parent()`, `::nthChild(n)`, `::first()`, `::last()`,
//! `::closest(k)`) and wildcard segments. Values can be searched with glob
//! patterns and flattened into path/value maps. Edits made on any node are
//! pushed up through its ancestors so the root always reflects them.
//!
//! # Example
//!
//! ```
//! use json_walker::wrap;
//! use json_walker_raw::Raw;
//! use serde_json::json;
//!
//! let root = wrap(json!({"users": [{"name": "ann"}, {"name": "bob"}]}));
//!
//! // Wildcard query
//! let names = root.find("users/*/name").unwrap().unwrap();
//! assert_eq!(names.raw(), Raw::from(json!(["ann", "bob"])));
//!
//! // Edit deep inside the tree, observe it at the root
//! let bob = root.find("users/1").unwrap().unwrap();
//! bob.set("name", "bo").unwrap();
//! assert_eq!(root.raw(), Raw::from(json!({"users": [{"name": "ann"}, {"name": "bo"}]})));
//!
//! // Pseudo-selectors
//! let users = bob.get("::parent()").unwrap().unwrap();
//! assert_eq!(users.key().unwrap().to_string(), "users");
//! ```

use json_walker_raw::Raw;

mod config;
pub use config::PathConfig;

mod error;
pub use error::{Result, WalkError};

mod parser;
pub use parser::{ParseError, PseudoSelector, Segment, SegmentParser};

mod node;
pub use node::{Node, NodeKind};

mod mutate;
mod resolve;

mod search;
pub use search::{Flattened, Matcher};

pub mod cli;

/// Values that can become the root of a tree.
///
/// Raw data is wrapped with the default [`PathConfig`]; a [`Node`] is returned
/// unchanged.
pub trait IntoNode {
    fn into_node(self) -> Node;
}

impl IntoNode for Node {
    fn into_node(self) -> Node {
        self
    }
}

impl IntoNode for &Node {
    fn into_node(self) -> Node {
        self.clone()
    }
}

macro_rules! impl_into_node {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoNode for $ty {
                fn into_node(self) -> Node {
                    Node::wrap_with(self, PathConfig::default())
                }
            }
        )*
    };
}

impl_into_node!(
    Raw,
    serde_json::Value,
    &str,
    String,
    bool,
    i32,
    i64,
    u64,
    f64,
    Vec<Raw>,
);

/// Wrap a value as the root of a new tree. See [`Node::wrap`].
pub fn wrap(value: impl IntoNode) -> Node {
    value.into_node()
}
