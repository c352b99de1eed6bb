//! Core logic of the `json-walk` command-line tool.
//!
//! Each command takes the input document as a JSON string and returns its
//! output as a pretty-printed JSON string:
//! - `find <path>`     : value at `path`, `null` when nothing resolves
//! - `search <pattern>`: `{ path: value }` of matching leaves
//! - `flatten`         : `{ path: value }` of every leaf
//! - `keys <path>`     : keys of the container at `path`

use serde_json::{Map, Value};

use crate::config::PathConfig;
use crate::error::Result;
use crate::node::Node;

fn parse_document(json: &str, config: &PathConfig) -> Result<Node> {
    let value: Value = serde_json::from_str(json)?;
    Ok(Node::wrap_with(value, config.clone()))
}

/// Resolve `path` in the document.
pub fn find(json: &str, path: &str, config: &PathConfig) -> Result<String> {
    let root = parse_document(json, config)?;
    let value = match root.find(path)? {
        Some(node) => Value::from(node.raw()),
        None => Value::Null,
    };
    Ok(serde_json::to_string_pretty(&value)?)
}

/// Search leaves matching `pattern`.
///
/// The pattern is read as JSON when it parses (`12`, `true`, `"x"`), and as a
/// plain string otherwise.
pub fn search(json: &str, pattern: &str, insensitive: bool, config: &PathConfig) -> Result<String> {
    let root = parse_document(json, config)?;
    let pattern: Value =
        serde_json::from_str(pattern).unwrap_or_else(|_| Value::String(pattern.to_string()));
    let found: Map<String, Value> = root
        .search_with(pattern, insensitive)?
        .into_iter()
        .map(|node| (node.path(), Value::from(node.raw())))
        .collect();
    Ok(serde_json::to_string_pretty(&Value::Object(found))?)
}

/// Flatten the document into a path/value map.
pub fn flatten(json: &str, config: &PathConfig) -> Result<String> {
    let root = parse_document(json, config)?;
    let flat: Map<String, Value> = root
        .flatten(true)?
        .into_iter()
        .map(|(path, leaf)| (path, Value::from(leaf.raw())))
        .collect();
    Ok(serde_json::to_string_pretty(&Value::Object(flat))?)
}

/// Keys of the container at `path`; an empty path names the document root.
pub fn keys(json: &str, path: &str, config: &PathConfig) -> Result<String> {
    let root = parse_document(json, config)?;
    let target = if path.is_empty() {
        Some(root)
    } else {
        root.find(path)?
    };
    let keys: Vec<Value> = target
        .map(|node| node.keys())
        .unwrap_or_default()
        .into_iter()
        .map(|key| match key.as_index() {
            Some(index) => Value::from(index),
            None => Value::String(key.to_string()),
        })
        .collect();
    Ok(serde_json::to_string_pretty(&keys)?)
}
