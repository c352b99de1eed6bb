//! Glob-style value matching, depth-first search and flattening.

use indexmap::IndexMap;
use json_walker_raw::{to_canonical_string, Raw};
use regex::{Regex, RegexBuilder};

use crate::error::Result;
use crate::node::Node;

/// Compiled glob pattern over canonical encodings.
///
/// The pattern is encoded with [`to_canonical_string`] and split on the
/// wildcard character; fragments are matched literally and the wildcard
/// matches any run of characters, newlines included. The match is anchored at
/// both ends of the encoded value.
///
/// # Example
///
/// ```
/// use json_walker::Matcher;
/// use json_walker_raw::Raw;
///
/// let matcher = Matcher::new(&Raw::from("f*o"), '*', false).unwrap();
/// assert!(matcher.is_match(&Raw::from("foo")));
/// assert!(!matcher.is_match(&Raw::from("bar")));
/// ```
#[derive(Debug, Clone)]
pub struct Matcher {
    regex: Regex,
}

impl Matcher {
    pub fn new(pattern: &Raw, wildcard: char, insensitive: bool) -> Result<Self> {
        let encoded = to_canonical_string(pattern);
        let body = encoded
            .split(wildcard)
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(".*");
        let regex = RegexBuilder::new(&format!("^(?:{body})$"))
            .dot_matches_new_line(true)
            .case_insensitive(insensitive)
            .build()?;
        Ok(Self { regex })
    }

    pub fn is_match(&self, value: &Raw) -> bool {
        self.regex.is_match(&to_canonical_string(value))
    }
}

/// Flattened leaf: the node itself or its raw value.
#[derive(Debug, Clone)]
pub enum Flattened {
    Node(Node),
    Raw(Raw),
}

impl Flattened {
    pub fn raw(&self) -> Raw {
        match self {
            Flattened::Node(node) => node.raw(),
            Flattened::Raw(raw) => raw.clone(),
        }
    }
}

impl Node {
    /// Glob-match this node's value against `pattern`.
    ///
    /// Strings are compared in their quoted encoding, so `"f*o"` matches the
    /// string `foo` but not a number.
    pub fn matches(&self, pattern: impl Into<Raw>, insensitive: bool) -> Result<bool> {
        self.ensure_attached()?;
        let wildcard = self.config_rc().wildcard;
        let matcher = Matcher::new(&pattern.into(), wildcard, insensitive)?;
        Ok(matcher.is_match(&self.raw()))
    }

    /// Leaf nodes below this node whose value matches `pattern`, in document
    /// order.
    ///
    /// # Example
    ///
    /// ```
    /// use json_walker::wrap;
    /// use serde_json::json;
    ///
    /// let root = wrap(json!({"a": "foo", "b": ["flo", "bar"]}));
    /// let paths: Vec<String> = root
    ///     .search("f*o")
    ///     .unwrap()
    ///     .iter()
    ///     .map(|node| node.path())
    ///     .collect();
    /// assert_eq!(paths, vec!["a", "b/0"]);
    /// ```
    pub fn search(&self, pattern: impl Into<Raw>) -> Result<Vec<Node>> {
        self.search_with(pattern, false)
    }

    /// Case-insensitive [`Node::search`].
    pub fn isearch(&self, pattern: impl Into<Raw>) -> Result<Vec<Node>> {
        self.search_with(pattern, true)
    }

    pub fn search_with(&self, pattern: impl Into<Raw>, insensitive: bool) -> Result<Vec<Node>> {
        self.ensure_attached()?;
        let matcher = Matcher::new(&pattern.into(), self.config_rc().wildcard, insensitive)?;
        let mut found = Vec::new();
        self.search_into(&matcher, &mut found)?;
        Ok(found)
    }

    fn search_into(&self, matcher: &Matcher, found: &mut Vec<Node>) -> Result<()> {
        for item in self.items()?.into_values() {
            if item.is_iterable() {
                item.search_into(matcher, found)?;
            } else if matcher.is_match(&item.raw()) {
                found.push(item);
            }
        }
        Ok(())
    }

    /// Leaves below this node keyed by their path from this node.
    ///
    /// With `raw_values` the map holds plain values, otherwise the leaf nodes.
    /// Empty containers contribute nothing.
    pub fn flatten(&self, raw_values: bool) -> Result<IndexMap<String, Flattened>> {
        let separator = self.separator();
        self.flatten_with(raw_values, &separator)
    }

    pub fn flatten_with(
        &self,
        raw_values: bool,
        separator: &str,
    ) -> Result<IndexMap<String, Flattened>> {
        self.ensure_attached()?;
        let mut out = IndexMap::new();
        self.flatten_into("", raw_values, separator, &mut out)?;
        Ok(out)
    }

    fn flatten_into(
        &self,
        prefix: &str,
        raw_values: bool,
        separator: &str,
        out: &mut IndexMap<String, Flattened>,
    ) -> Result<()> {
        for (key, item) in self.items()? {
            let path = if prefix.is_empty() {
                key.to_string()
            } else {
                format!("{prefix}{separator}{key}")
            };
            if item.is_iterable() {
                item.flatten_into(&path, raw_values, separator, out)?;
            } else if raw_values {
                out.insert(path, Flattened::Raw(item.raw()));
            } else {
                out.insert(path, Flattened::Node(item));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wrap;
    use serde_json::json;

    fn matches(pattern: serde_json::Value, value: serde_json::Value, insensitive: bool) -> bool {
        Matcher::new(&Raw::from(pattern), '*', insensitive)
            .unwrap()
            .is_match(&Raw::from(value))
    }

    #[test]
    fn test_glob_fragments_are_literal() {
        assert!(matches(json!("a.c"), json!("a.c"), false));
        assert!(!matches(json!("a.c"), json!("abc"), false));
        assert!(matches(json!("(x)*"), json!("(x)+y"), false));
    }

    #[test]
    fn test_match_is_anchored() {
        assert!(!matches(json!("oo"), json!("foo"), false));
        assert!(matches(json!("*oo"), json!("foo"), false));
    }

    #[test]
    fn test_wildcard_crosses_newlines() {
        assert!(matches(json!("a*b"), json!("a\nb"), false));
    }

    #[test]
    fn test_case_insensitive() {
        assert!(!matches(json!("FOO"), json!("foo"), false));
        assert!(matches(json!("FOO"), json!("foo"), true));
    }

    #[test]
    fn test_numbers_match_by_encoding() {
        assert!(matches(json!(12), json!(12), false));
        assert!(matches(json!("*"), json!("12"), false));
        assert!(!matches(json!("12"), json!(12), false));
    }

    #[test]
    fn test_custom_wildcard() {
        let root = wrap(json!({"a": "foo*"}));
        let matcher = Matcher::new(&Raw::from("f%"), '%', false).unwrap();
        let a = root.get("a").unwrap().unwrap();
        assert!(matcher.is_match(&a.raw()));
    }

    #[test]
    fn test_flatten_nodes_keep_parents() {
        let root = wrap(json!({"a": {"b": 1}}));
        let flat = root.flatten(false).unwrap();
        let Some(Flattened::Node(b)) = flat.get("a/b") else {
            panic!("expected a node");
        };
        assert_eq!(b.path(), "a/b");
        b.set_value(2).unwrap();
        assert_eq!(root.raw(), Raw::from(json!({"a": {"b": 2}})));
    }

    #[test]
    fn test_flatten_skips_empty_containers() {
        let root = wrap(json!({"a": [], "b": {}, "c": null}));
        let flat = root.flatten(true).unwrap();
        assert_eq!(flat.keys().collect::<Vec<_>>(), vec!["c"]);
    }
}
