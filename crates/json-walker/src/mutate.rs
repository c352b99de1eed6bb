//! Mutation and upward propagation.
//!
//! Every edit rewrites the node's own store and then pushes the node's value
//! into its parent under the node's key, which in turn pushes its own value
//! upward, up to the root. Afterwards `parent.raw()[key] == node.raw()` holds
//! along the whole ancestor chain. Views obtained earlier for siblings or
//! descendants are not updated.
//!
//! Edits check the complete ancestor chain for removed nodes before touching
//! any store, so a failing edit leaves every store unchanged.

use json_walker_raw::{next_index, recursive_merge, reindex, Key, Raw, Slots};
use tracing::{debug, trace};

use crate::error::{Result, WalkError};
use crate::node::{Node, NodeKind, Slot, Store};

impl Node {
    /// Set `value` at `key`, where `key` may be a path split on the tree
    /// separator.
    ///
    /// Intermediate containers are never created: when an intermediate
    /// segment is missing nothing is written locally, though the (unchanged)
    /// value is still pushed to the parent.
    ///
    /// # Example
    ///
    /// ```
    /// use json_walker::wrap;
    /// use json_walker_raw::Raw;
    /// use serde_json::json;
    ///
    /// let root = wrap(json!({"a": {"b": 1}}));
    /// let a = root.get("a").unwrap().unwrap();
    /// a.set("b", 2).unwrap();
    /// assert_eq!(root.raw(), Raw::from(json!({"a": {"b": 2}})));
    /// ```
    pub fn set(&self, key: &str, value: impl Into<Raw>) -> Result<&Self> {
        let separator = self.separator();
        self.set_with(key, value, &separator)
    }

    pub fn set_with(&self, key: &str, value: impl Into<Raw>, separator: &str) -> Result<&Self> {
        self.ensure_chain_attached()?;
        self.expect_iterable()?;
        let segments = split_path(key, separator);
        self.0.borrow_mut().store.write(&segments, value.into());
        self.propagate();
        Ok(self)
    }

    /// Replace the data of a value node and push it to the parent.
    pub fn set_value(&self, value: impl Into<Raw>) -> Result<&Self> {
        self.ensure_chain_attached()?;
        let kind = self.kind();
        if kind != NodeKind::Value {
            return Err(WalkError::TypeMismatch {
                expected: NodeKind::Value.name(),
                found: kind.name(),
            });
        }
        self.0.borrow_mut().store = Store::Value(value.into());
        self.propagate();
        Ok(self)
    }

    /// Rebuild the store from the node's current data and push it upward.
    pub fn refresh(&self) -> Result<&Self> {
        let raw = self.raw();
        self.refresh_with(raw)
    }

    /// Rebuild the store from `raw` and push it upward.
    ///
    /// `raw` must match the node's shape: an array for array nodes, an
    /// object for object nodes, a non-container for value nodes.
    pub fn refresh_with(&self, raw: impl Into<Raw>) -> Result<&Self> {
        self.ensure_chain_attached()?;
        let raw = raw.into();
        let kind = self.kind();
        let compatible = match kind {
            NodeKind::Array => raw.is_array(),
            NodeKind::Object => raw.is_object(),
            NodeKind::Value => !raw.is_container(),
        };
        if !compatible {
            return Err(WalkError::TypeMismatch {
                expected: kind.name(),
                found: raw.type_name(),
            });
        }
        debug!(path = %self.path(), kind = kind.name(), "refreshing node");
        self.0.borrow_mut().store = Store::from_raw(raw);
        self.propagate();
        Ok(self)
    }

    /// Write a child's value into this node's store and keep propagating.
    pub(crate) fn assign(&self, key: &Key, value: Raw) {
        match &mut self.0.borrow_mut().store {
            Store::Array(slots) => {
                slots.insert(key.clone(), Slot::Raw(value));
            }
            Store::Object(map) => {
                map.insert(key.to_string(), Slot::Raw(value));
            }
            Store::Value(_) => {}
        }
        self.propagate();
    }

    pub(crate) fn propagate(&self) {
        let (parent, key) = {
            let inner = self.0.borrow();
            (inner.parent.clone(), inner.key.clone())
        };
        if let (Some(parent), Some(key)) = (parent, key) {
            trace!(key = %key, "propagating into parent");
            parent.assign(&key, self.raw());
        }
    }

    /// Detach this node from its tree.
    ///
    /// The node's key is deleted from the parent's data (renumbering the
    /// parent when it is a numeric array), the parent is refreshed, and this
    /// node loses its key and parent. Any later navigation or edit through
    /// this handle fails with [`WalkError::Detached`].
    pub fn remove(&self) -> Result<&Self> {
        self.ensure_chain_attached()?;
        let (parent, key) = {
            let inner = self.0.borrow();
            (inner.parent.clone(), inner.key.clone())
        };

        if let (Some(parent), Some(key)) = (parent, key) {
            let mut data = parent.raw();
            let numeric = data.is_numeric_array();
            match &mut data {
                Raw::Array(slots) => {
                    slots.shift_remove(&key);
                    if numeric && key.is_index() {
                        *slots = reindex(std::mem::take(slots));
                    }
                }
                Raw::Object(map) => {
                    map.shift_remove(&key.to_string());
                }
                _ => {}
            }
            debug!(key = %key, renumbered = numeric, "removing node from parent");
            parent.refresh_with(data)?;
        }

        let mut inner = self.0.borrow_mut();
        inner.key = None;
        inner.parent = None;
        inner.detached = true;
        Ok(self)
    }

    /// Remove the child at `key`, or this node itself when `key` is empty.
    ///
    /// A key containing the tree separator is resolved as a path of plain
    /// keys below this node; pseudo-selectors are not applied, so only a
    /// descendant can be removed. Returns whether something was removed.
    pub fn unset(&self, key: &str) -> Result<bool> {
        let separator = self.separator();
        self.unset_with(key, &separator)
    }

    pub fn unset_with(&self, key: &str, separator: &str) -> Result<bool> {
        if key.is_empty() {
            self.remove()?;
            return Ok(true);
        }
        self.ensure_chain_attached()?;
        if !self.is_iterable() {
            return Ok(false);
        }

        let target = if self.has(key) {
            self.lookup(key)
        } else if !separator.is_empty() && key.contains(separator) {
            self.resolve_keys(key, separator)?
        } else {
            None
        };

        match target {
            Some(node) => {
                node.remove()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Append values to an array node.
    ///
    /// Each value gets the key one past the largest integer key.
    pub fn append<I>(&self, values: I) -> Result<&Self>
    where
        I: IntoIterator,
        I::Item: Into<Raw>,
    {
        self.ensure_chain_attached()?;
        let mut slots = self.array_slots()?;
        for value in values {
            let index = next_index(&slots);
            slots.insert(Key::Index(index), value.into());
        }
        self.refresh_with(Raw::Array(slots))
    }

    /// Prepend values to an array node.
    ///
    /// Integer keys are renumbered from zero across the new and existing
    /// slots; name keys are kept.
    pub fn prepend<I>(&self, values: I) -> Result<&Self>
    where
        I: IntoIterator,
        I::Item: Into<Raw>,
    {
        self.ensure_chain_attached()?;
        let existing = self.array_slots()?;
        let mut slots = Slots::with_capacity(existing.len());
        let mut next = 0i64;
        for value in values {
            slots.insert(Key::Index(next), value.into());
            next += 1;
        }
        for (key, value) in existing {
            match key {
                Key::Index(_) => {
                    slots.insert(Key::Index(next), value);
                    next += 1;
                }
                name => {
                    slots.insert(name, value);
                }
            }
        }
        self.refresh_with(Raw::Array(slots))
    }

    /// Remove and return the first element of an array node.
    ///
    /// Remaining integer keys are renumbered from zero. The returned node is a
    /// new root, unless the slot held a kept handle.
    pub fn shift(&self) -> Result<Option<Node>> {
        self.take_slot(true)
    }

    /// Remove and return the last element of an array node.
    pub fn pop(&self) -> Result<Option<Node>> {
        self.take_slot(false)
    }

    fn take_slot(&self, front: bool) -> Result<Option<Node>> {
        self.ensure_chain_attached()?;
        let mut slots = match &self.0.borrow().store {
            Store::Array(slots) => slots.clone(),
            other => {
                return Err(WalkError::TypeMismatch {
                    expected: NodeKind::Array.name(),
                    found: other.kind().name(),
                })
            }
        };

        let taken = if front {
            slots.shift_remove_index(0)
        } else {
            slots.pop()
        };
        let Some((_, slot)) = taken else {
            return Ok(None);
        };

        let remainder: Slots = slots
            .iter()
            .map(|(k, slot)| (k.clone(), slot.to_raw()))
            .collect();
        let remainder = if front { reindex(remainder) } else { remainder };
        self.refresh_with(Raw::Array(remainder))?;

        Ok(Some(match slot {
            Slot::Node(node) => node,
            Slot::Raw(raw) => Node::from_raw(raw, None, None, self.config_rc()),
        }))
    }

    /// Deep-merge `other` into this container with
    /// [`json_walker_raw::recursive_merge`] and refresh.
    ///
    /// Array nodes accept anything (a non-array is merged as a one-element
    /// array); object nodes require an object.
    pub fn merge(&self, other: impl Into<Raw>) -> Result<&Self> {
        self.ensure_chain_attached()?;
        let other = other.into();
        let other = match self.kind() {
            NodeKind::Array if other.is_array() => other,
            NodeKind::Array => Raw::array([other]),
            NodeKind::Object if other.is_object() => other,
            NodeKind::Object => {
                return Err(WalkError::TypeMismatch {
                    expected: NodeKind::Object.name(),
                    found: other.type_name(),
                })
            }
            NodeKind::Value => {
                return Err(WalkError::TypeMismatch {
                    expected: "array or object",
                    found: NodeKind::Value.name(),
                })
            }
        };
        debug!(path = %self.path(), "merging into node");
        let merged = recursive_merge(self.raw(), other);
        self.refresh_with(merged)
    }

    fn expect_iterable(&self) -> Result<()> {
        if self.is_iterable() {
            return Ok(());
        }
        Err(WalkError::TypeMismatch {
            expected: "array or object",
            found: NodeKind::Value.name(),
        })
    }

    fn array_slots(&self) -> Result<Slots> {
        match self.raw() {
            Raw::Array(slots) if self.is_array() => Ok(slots),
            _ => Err(WalkError::TypeMismatch {
                expected: NodeKind::Array.name(),
                found: self.kind().name(),
            }),
        }
    }
}

pub(crate) fn split_path<'a>(path: &'a str, separator: &str) -> Vec<&'a str> {
    if separator.is_empty() {
        return vec![path];
    }
    path.split(separator).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wrap;
    use serde_json::json;

    #[test]
    fn test_split_path() {
        assert_eq!(split_path("a/b", "/"), vec!["a", "b"]);
        assert_eq!(split_path("a/b", ""), vec!["a/b"]);
        assert_eq!(split_path("", "/"), vec![""]);
        assert_eq!(split_path("a::b", "::"), vec!["a", "b"]);
    }

    #[test]
    fn test_set_on_value_node_is_type_mismatch() {
        let value = wrap(json!(1));
        assert!(matches!(
            value.set("a", 1),
            Err(WalkError::TypeMismatch { expected: "array or object", found: "value" })
        ));
    }

    #[test]
    fn test_set_value_on_container_is_type_mismatch() {
        let root = wrap(json!([]));
        assert!(matches!(
            root.set_value(1),
            Err(WalkError::TypeMismatch { expected: "value", found: "array" })
        ));
    }

    #[test]
    fn test_refresh_rejects_wrong_shape() {
        let arr = wrap(json!([1]));
        assert!(matches!(
            arr.refresh_with(json!({"a": 1})),
            Err(WalkError::TypeMismatch { expected: "array", found: "object" })
        ));
        let obj = wrap(json!({}));
        assert!(matches!(
            obj.refresh_with(json!([1])),
            Err(WalkError::TypeMismatch { expected: "object", found: "array" })
        ));
        let value = wrap(json!(1));
        assert!(value.refresh_with(json!({"a": 1})).is_err());
        assert!(value.refresh_with(2).is_ok());
    }

    #[test]
    fn test_assign_keeps_slot_position() {
        let root = wrap(json!({"a": 1, "b": 2, "c": 3}));
        let b = root.get("b").unwrap().unwrap();
        b.set_value(20).unwrap();
        assert_eq!(root.raw().to_json().to_string(), r#"{"a":1,"b":20,"c":3}"#);
    }

    #[test]
    fn test_shift_and_pop_on_non_array() {
        let obj = wrap(json!({"a": 1}));
        assert!(obj.shift().is_err());
        assert!(obj.pop().is_err());
        assert!(obj.append([1]).is_err());
        assert!(obj.prepend([1]).is_err());
    }

    #[test]
    fn test_merge_into_value_is_type_mismatch() {
        assert!(wrap(json!(1)).merge(json!([2])).is_err());
        assert!(wrap(json!({})).merge(json!([2])).is_err());
    }
}
