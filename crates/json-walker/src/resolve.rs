//! Path resolution.
//!
//! A path is a list of segments joined by the tree separator; each segment is
//! parsed by [`SegmentParser`](crate::SegmentParser). A segment equal to the
//! wildcard character turns the lookup into a multi-level query.

use indexmap::IndexSet;
use json_walker_raw::Key;
use tracing::debug;

use crate::config::PathConfig;
use crate::error::Result;
use crate::mutate::split_path;
use crate::node::Node;

/// One step of a concrete path.
#[derive(Debug, Clone)]
enum Step<'a> {
    /// Literal segment, resolved through [`Node::get`].
    Segment(&'a str),
    /// Key produced by wildcard expansion, resolved through [`Node::child`].
    Key(Key),
}

impl Node {
    /// Resolve `path` relative to this node, using the tree separator.
    ///
    /// - `""` resolves to `None`; a lone wildcard resolves to this node when
    ///   it is iterable.
    /// - Without wildcards, segments are followed left to right; resolution
    ///   stops with `None` as soon as a non-final segment is missing or not
    ///   iterable.
    /// - With wildcards, the path is expanded into every concrete path and
    ///   the results are gathered into an aggregate array node (see
    ///   [`Node::collect`]), possibly empty.
    ///
    /// # Example
    ///
    /// ```
    /// use json_walker::wrap;
    /// use json_walker_raw::Raw;
    /// use serde_json::json;
    ///
    /// let root = wrap(json!({"a": {"x": {"b": 1}, "y": {"b": 2}}}));
    /// let found = root.find("a/*/b").unwrap().unwrap();
    /// assert_eq!(found.raw(), Raw::from(json!([1, 2])));
    /// ```
    pub fn find(&self, path: &str) -> Result<Option<Node>> {
        let separator = self.separator();
        self.find_with(path, &separator)
    }

    pub fn find_with(&self, path: &str, separator: &str) -> Result<Option<Node>> {
        self.ensure_attached()?;
        let config = self.config_rc();

        if path.is_empty() {
            return Ok(None);
        }
        if config.is_wildcard(path) {
            return Ok(self.is_iterable().then(|| self.clone()));
        }

        let segments = split_path(path, separator);
        if segments.iter().any(|segment| config.is_wildcard(segment)) {
            let paths = self.expand(&segments, &config)?;
            debug!(path, concrete = paths.len(), "expanded wildcard path");
            let mut found = Vec::new();
            for steps in &paths {
                if let Some(node) = self.walk(steps)? {
                    found.push(node);
                }
            }
            return Ok(Some(Node::collect_with(found, config)));
        }

        let steps: Vec<Step<'_>> = segments.into_iter().map(Step::Segment).collect();
        self.walk(&steps)
    }

    /// Resolve a path of plain keys: no wildcards, no pseudo-selectors.
    ///
    /// Only descendants of this node can be reached this way.
    pub(crate) fn resolve_keys(&self, path: &str, separator: &str) -> Result<Option<Node>> {
        let steps: Vec<Step<'_>> = split_path(path, separator)
            .into_iter()
            .map(|segment| Step::Key(Key::parse(segment)))
            .collect();
        self.walk(&steps)
    }

    fn walk(&self, steps: &[Step<'_>]) -> Result<Option<Node>> {
        let mut current = self.clone();
        for (i, step) in steps.iter().enumerate() {
            let next = match step {
                Step::Segment(segment) => current.get(segment)?,
                Step::Key(key) => current.child(key),
            };
            if i + 1 == steps.len() {
                return Ok(next);
            }
            match next {
                Some(node) if node.is_iterable() => current = node,
                _ => return Ok(None),
            }
        }
        Ok(None)
    }

    /// Expand a wildcard path into concrete paths.
    ///
    /// A frontier of every node reached so far is carried from level to
    /// level. A wildcard level's candidates are the de-duplicated keys of the
    /// iterable frontier nodes, and the next frontier is all of their
    /// children. Candidates are a superset of what actually resolves; each
    /// concrete path is checked by [`Node::walk`] afterwards.
    fn expand<'a>(&self, segments: &[&'a str], config: &PathConfig) -> Result<Vec<Vec<Step<'a>>>> {
        let mut frontier = vec![self.clone()];
        let mut levels: Vec<Vec<Step<'a>>> = Vec::with_capacity(segments.len());

        for segment in segments {
            let mut next = Vec::new();
            if config.is_wildcard(segment) {
                let mut keys = IndexSet::new();
                for node in frontier.iter().filter(|node| node.is_iterable()) {
                    for key in node.keys() {
                        if let Some(child) = node.child(&key) {
                            next.push(child);
                        }
                        // `0` below an array and `"0"` below an object name
                        // the same step.
                        keys.insert(Key::parse(&key.to_string()));
                    }
                }
                levels.push(keys.into_iter().map(Step::Key).collect());
            } else {
                for node in &frontier {
                    if let Some(child) = node.get(segment)? {
                        next.push(child);
                    }
                }
                levels.push(vec![Step::Segment(segment)]);
            }
            frontier = next;
        }

        Ok(cartesian(levels))
    }
}

/// Cartesian product of the per-level steps; earlier levels vary slowest,
/// so concrete paths come out in document order.
fn cartesian<'a>(levels: Vec<Vec<Step<'a>>>) -> Vec<Vec<Step<'a>>> {
    let mut paths: Vec<Vec<Step<'a>>> = vec![Vec::new()];
    for level in levels {
        let mut extended = Vec::with_capacity(paths.len() * level.len());
        for path in &paths {
            for step in &level {
                let mut concrete = path.clone();
                concrete.push(step.clone());
                extended.push(concrete);
            }
        }
        paths = extended;
    }
    paths
}
