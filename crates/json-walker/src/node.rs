//! Parent-aware node views over raw values.
//!
//! A [`Node`] is a handle to a *view*: it owns a copy of its subtree, the key
//! it was reached through and a handle to the node that produced it. Parents
//! never reference their children, so navigating twice to the same key yields
//! two independent views. Edits are kept consistent along the ancestor chain
//! by pushing the edited node's value into its parent (see `mutate.rs`).

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use json_walker_raw::{is_sequence, Key, Raw};

use crate::config::PathConfig;
use crate::error::{Result, WalkError};
use crate::parser::{PseudoSelector, SegmentParser};

/// Node variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Keyed array; iterable.
    Array,
    /// Key to value mapping; iterable.
    Object,
    /// Terminal leaf.
    Value,
}

impl NodeKind {
    pub fn name(self) -> &'static str {
        match self {
            NodeKind::Array => "array",
            NodeKind::Object => "object",
            NodeKind::Value => "value",
        }
    }
}

/// Handle to a node view.
///
/// Cloning the handle does not copy the view; both handles observe the same
/// node. Use [`Node::ptr_eq`] to compare identity.
#[derive(Clone)]
pub struct Node(pub(crate) Rc<RefCell<Inner>>);

pub(crate) struct Inner {
    pub(crate) store: Store,
    pub(crate) key: Option<Key>,
    pub(crate) parent: Option<Node>,
    pub(crate) config: Rc<PathConfig>,
    pub(crate) detached: bool,
}

/// Backing store of a node.
pub(crate) enum Store {
    Array(IndexMap<Key, Slot>),
    Object(IndexMap<String, Slot>),
    Value(Raw),
}

/// A container entry: either plain data or a node handle kept as-is.
///
/// Handles only appear in aggregates built by [`Node::collect`]; any refresh
/// turns them back into plain data.
#[derive(Clone)]
pub(crate) enum Slot {
    Raw(Raw),
    Node(Node),
}

impl Slot {
    pub(crate) fn to_raw(&self) -> Raw {
        match self {
            Slot::Raw(raw) => raw.clone(),
            Slot::Node(node) => node.raw(),
        }
    }
}

impl Store {
    pub(crate) fn from_raw(raw: Raw) -> Self {
        match raw {
            Raw::Array(slots) => Store::Array(
                slots
                    .into_iter()
                    .map(|(k, v)| (k, Slot::Raw(v)))
                    .collect(),
            ),
            Raw::Object(map) => Store::Object(
                map.into_iter()
                    .map(|(k, v)| (k, Slot::Raw(v)))
                    .collect(),
            ),
            other => Store::Value(other),
        }
    }

    pub(crate) fn kind(&self) -> NodeKind {
        match self {
            Store::Array(_) => NodeKind::Array,
            Store::Object(_) => NodeKind::Object,
            Store::Value(_) => NodeKind::Value,
        }
    }

    fn to_raw(&self) -> Raw {
        match self {
            Store::Array(slots) => Raw::Array(
                slots
                    .iter()
                    .map(|(k, slot)| (k.clone(), slot.to_raw()))
                    .collect(),
            ),
            Store::Object(map) => Raw::Object(
                map.iter()
                    .map(|(k, slot)| (k.clone(), slot.to_raw()))
                    .collect(),
            ),
            Store::Value(raw) => raw.clone(),
        }
    }

    /// Write `value` at `segments` inside this store.
    ///
    /// Only the touched slot is rewritten; a missing intermediate segment
    /// leaves the store untouched.
    pub(crate) fn write(&mut self, segments: &[&str], value: Raw) {
        let Some((head, rest)) = segments.split_first() else {
            return;
        };
        let slot = match self {
            Store::Array(slots) => {
                let key = Key::parse(head);
                if rest.is_empty() {
                    slots.insert(key, Slot::Raw(value));
                    return;
                }
                slots.get_mut(&key)
            }
            Store::Object(map) => {
                if rest.is_empty() {
                    map.insert((*head).to_string(), Slot::Raw(value));
                    return;
                }
                map.get_mut(*head)
            }
            Store::Value(_) => None,
        };
        if let Some(slot) = slot {
            let mut raw = slot.to_raw();
            if raw.write_path(rest, value) {
                *slot = Slot::Raw(raw);
            }
        }
    }
}

impl Node {
    pub(crate) fn from_store(
        store: Store,
        parent: Option<Node>,
        key: Option<Key>,
        config: Rc<PathConfig>,
    ) -> Node {
        Node(Rc::new(RefCell::new(Inner {
            store,
            key,
            parent,
            config,
            detached: false,
        })))
    }

    pub(crate) fn from_raw(
        raw: Raw,
        parent: Option<Node>,
        key: Option<Key>,
        config: Rc<PathConfig>,
    ) -> Node {
        Node::from_store(Store::from_raw(raw), parent, key, config)
    }

    /// Wrap a value as a root node with the default [`PathConfig`].
    ///
    /// Arrays become array nodes, objects become object nodes and everything
    /// else a value node. Wrapping a [`Node`] returns it unchanged.
    pub fn wrap(value: impl crate::IntoNode) -> Node {
        value.into_node()
    }

    /// Wrap a value as a root node using `config` for the whole tree.
    pub fn wrap_with(value: impl Into<Raw>, config: PathConfig) -> Node {
        Node::from_raw(value.into(), None, None, Rc::new(config))
    }

    /// Build a root array node whose slots are the given node handles.
    ///
    /// [`Node::get`] on the result returns the original handles, so edits made
    /// through them still propagate into the trees they came from.
    pub fn collect<I: IntoIterator<Item = Node>>(nodes: I) -> Node {
        Node::collect_with(nodes, Rc::new(PathConfig::default()))
    }

    pub(crate) fn collect_with<I: IntoIterator<Item = Node>>(
        nodes: I,
        config: Rc<PathConfig>,
    ) -> Node {
        let slots = nodes
            .into_iter()
            .enumerate()
            .map(|(i, node)| (Key::from(i), Slot::Node(node)))
            .collect();
        Node::from_store(Store::Array(slots), None, None, config)
    }

    // ── Introspection ────────────────────────────────────────────────────

    pub fn kind(&self) -> NodeKind {
        self.0.borrow().store.kind()
    }

    pub fn is_array(&self) -> bool {
        self.kind() == NodeKind::Array
    }

    pub fn is_object(&self) -> bool {
        self.kind() == NodeKind::Object
    }

    pub fn is_value(&self) -> bool {
        self.kind() == NodeKind::Value
    }

    /// Array and object nodes are iterable; value nodes never are.
    pub fn is_iterable(&self) -> bool {
        !self.is_value()
    }

    /// `true` for array nodes whose keys are exactly `0..len` in order.
    pub fn is_numeric_array(&self) -> bool {
        match &self.0.borrow().store {
            Store::Array(slots) => is_sequence(slots.keys()),
            _ => false,
        }
    }

    /// `true` once the node has been removed from its tree.
    pub fn is_detached(&self) -> bool {
        self.0.borrow().detached
    }

    /// Key under which the node was reached; `None` for a root or a removed
    /// node.
    pub fn key(&self) -> Option<Key> {
        self.0.borrow().key.clone()
    }

    pub fn parent(&self) -> Option<Node> {
        self.0.borrow().parent.clone()
    }

    /// Copy of the tree's path configuration.
    pub fn config(&self) -> PathConfig {
        (*self.0.borrow().config).clone()
    }

    pub(crate) fn config_rc(&self) -> Rc<PathConfig> {
        Rc::clone(&self.0.borrow().config)
    }

    pub(crate) fn separator(&self) -> String {
        self.0.borrow().config.separator.clone()
    }

    /// `true` if both handles point at the same node view.
    pub fn ptr_eq(a: &Node, b: &Node) -> bool {
        Rc::ptr_eq(&a.0, &b.0)
    }

    /// Plain data of this node, with any kept handles converted.
    pub fn raw(&self) -> Raw {
        self.0.borrow().store.to_raw()
    }

    /// Alias of [`Node::raw`].
    pub fn value(&self) -> Raw {
        self.raw()
    }

    /// Type name of the wrapped data, see [`Raw::type_name`].
    pub fn value_type(&self) -> &'static str {
        match &self.0.borrow().store {
            Store::Array(_) => "array",
            Store::Object(_) => "object",
            Store::Value(raw) => raw.type_name(),
        }
    }

    /// Keys in order: slot keys for arrays, property names for objects,
    /// nothing for values.
    pub fn keys(&self) -> Vec<Key> {
        match &self.0.borrow().store {
            Store::Array(slots) => slots.keys().cloned().collect(),
            Store::Object(map) => map.keys().map(|k| Key::Name(k.clone())).collect(),
            Store::Value(_) => Vec::new(),
        }
    }

    /// `true` if `key` names a direct child. No pseudo-selector parsing.
    pub fn has(&self, key: &str) -> bool {
        match &self.0.borrow().store {
            Store::Array(slots) => slots.contains_key(&Key::parse(key)),
            Store::Object(map) => map.contains_key(key),
            Store::Value(_) => false,
        }
    }

    pub fn count(&self) -> usize {
        match &self.0.borrow().store {
            Store::Array(slots) => slots.len(),
            Store::Object(map) => map.len(),
            Store::Value(_) => 0,
        }
    }

    pub(crate) fn ensure_attached(&self) -> Result<()> {
        if self.is_detached() {
            return Err(WalkError::Detached);
        }
        Ok(())
    }

    /// Fails if this node or any ancestor has been removed.
    pub(crate) fn ensure_chain_attached(&self) -> Result<()> {
        let mut current = Some(self.clone());
        while let Some(node) = current {
            node.ensure_attached()?;
            current = node.parent();
        }
        Ok(())
    }

    // ── Navigation ───────────────────────────────────────────────────────

    /// Direct child under `key`, wrapped with this node as its parent.
    ///
    /// Kept handles (see [`Node::collect`]) are returned as-is.
    pub fn child(&self, key: &Key) -> Option<Node> {
        let (slot, key, config) = {
            let inner = self.0.borrow();
            let (slot, key) = match &inner.store {
                Store::Array(slots) => (slots.get(key)?.clone(), key.clone()),
                Store::Object(map) => {
                    let name = key.to_string();
                    let slot = map.get(&name)?.clone();
                    (slot, Key::Name(name))
                }
                Store::Value(_) => return None,
            };
            (slot, key, Rc::clone(&inner.config))
        };
        Some(match slot {
            Slot::Node(node) => node,
            Slot::Raw(raw) => Node::from_raw(raw, Some(self.clone()), Some(key), config),
        })
    }

    /// Child by literal path segment, without pseudo-selector parsing.
    pub(crate) fn lookup(&self, segment: &str) -> Option<Node> {
        let key = if self.is_array() {
            Key::parse(segment)
        } else {
            Key::Name(segment.to_string())
        };
        self.child(&key)
    }

    /// Get a child by key.
    ///
    /// The key may carry a pseudo-selector suffix (`::parent()`,
    /// `::nthChild(n)`, `::first()`, `::last()`, `::closest(k)`). With an
    /// empty literal key the selector applies to this node; otherwise it
    /// applies to the child, and only when the child is iterable.
    ///
    /// # Example
    ///
    /// ```
    /// use json_walker::wrap;
    /// use json_walker_raw::Raw;
    /// use serde_json::json;
    ///
    /// let root = wrap(json!({"list": [1, 2, 3]}));
    /// let last = root.get("list::last()").unwrap().unwrap();
    /// assert_eq!(last.raw(), Raw::from(3));
    /// assert!(root.get("missing").unwrap().is_none());
    /// ```
    pub fn get(&self, key: &str) -> Result<Option<Node>> {
        self.ensure_attached()?;
        if !self.is_iterable() {
            return Ok(None);
        }
        let segment = SegmentParser::parse(key)?;

        if segment.key.is_empty() {
            if let Some(selector) = &segment.selector {
                return self.select(selector);
            }
        }

        let Some(child) = self.lookup(segment.key) else {
            return Ok(None);
        };
        match &segment.selector {
            None => Ok(Some(child)),
            Some(selector) if child.is_iterable() => child.select(selector),
            Some(_) => Ok(None),
        }
    }

    fn select(&self, selector: &PseudoSelector) -> Result<Option<Node>> {
        match selector {
            PseudoSelector::Parent => Ok(self.parent()),
            PseudoSelector::First => self.first(),
            PseudoSelector::Last => self.last(),
            PseudoSelector::NthChild(n) => match usize::try_from(*n) {
                Ok(n) => self.nth_child(n),
                Err(_) => Ok(None),
            },
            PseudoSelector::Closest(key) => self.closest(key),
        }
    }

    /// Every child keyed by its key, in key order.
    pub fn items(&self) -> Result<IndexMap<Key, Node>> {
        self.ensure_attached()?;
        Ok(self
            .keys()
            .into_iter()
            .filter_map(|key| self.child(&key).map(|node| (key, node)))
            .collect())
    }

    pub fn first(&self) -> Result<Option<Node>> {
        self.ensure_attached()?;
        Ok(self.keys().first().and_then(|key| self.child(key)))
    }

    pub fn last(&self) -> Result<Option<Node>> {
        self.ensure_attached()?;
        Ok(self.keys().last().and_then(|key| self.child(key)))
    }

    /// Child at 1-based position `n`; `None` when out of range.
    pub fn nth_child(&self, n: usize) -> Result<Option<Node>> {
        self.ensure_attached()?;
        let Some(index) = n.checked_sub(1) else {
            return Ok(None);
        };
        Ok(self.keys().get(index).and_then(|key| self.child(key)))
    }

    /// Like [`Node::nth_child`] with the position computed by `position`.
    pub fn nth_child_with<F: FnOnce() -> usize>(&self, position: F) -> Result<Option<Node>> {
        self.nth_child(position())
    }

    /// Nearest ancestor reached through `key`.
    pub fn closest(&self, key: &str) -> Result<Option<Node>> {
        self.ensure_attached()?;
        let mut current = self.parent();
        while let Some(node) = current {
            if node.key().is_some_and(|k| k.to_string() == key) {
                return Ok(Some(node));
            }
            current = node.parent();
        }
        Ok(None)
    }

    /// Topmost ancestor, or this node when it has no parent.
    pub fn root(&self) -> Node {
        let mut current = self.clone();
        while let Some(parent) = current.parent() {
            current = parent;
        }
        current
    }

    /// Keys from the root down to this node joined with the tree separator.
    pub fn path(&self) -> String {
        self.path_with(&self.separator())
    }

    pub fn path_with(&self, separator: &str) -> String {
        let mut keys = Vec::new();
        let mut current = Some(self.clone());
        while let Some(node) = current {
            if let Some(key) = node.key() {
                keys.push(key.to_string());
            }
            current = node.parent();
        }
        keys.reverse();
        keys.join(separator)
    }

    /// JSONPath-like address: `.name` below objects, `[key]` below arrays.
    ///
    /// # Example
    ///
    /// ```
    /// use json_walker::wrap;
    /// use serde_json::json;
    ///
    /// let root = wrap(json!({"a": [{"b": 1}]}));
    /// let b = root.find("a/0/b").unwrap().unwrap();
    /// assert_eq!(b.json_path(), ".a[0].b");
    /// ```
    pub fn json_path(&self) -> String {
        let mut parts = Vec::new();
        let mut current = self.clone();
        while let Some(parent) = current.parent() {
            if let Some(key) = current.key() {
                if parent.is_array() {
                    parts.push(format!("[{key}]"));
                } else {
                    parts.push(format!(".{key}"));
                }
            }
            current = parent;
        }
        parts.reverse();
        parts.concat()
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("kind", &self.kind())
            .field("key", &self.key())
            .field("detached", &self.is_detached())
            .field("raw", &self.raw())
            .finish()
    }
}

impl From<&Node> for Raw {
    fn from(node: &Node) -> Self {
        node.raw()
    }
}

impl From<Node> for Raw {
    fn from(node: Node) -> Self {
        node.raw()
    }
}
