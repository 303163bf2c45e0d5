//! Object node type.

use core::ops::Index;

use indexmap::IndexMap;
use indexmap::map::Entry;

use crate::{JsonArray, JsonNode, JsonValue};

/// A mapping from unique string keys to nodes.
///
/// Insertion order is kept so that formatting reproduces the source order;
/// lookups do not depend on it. Equality ignores order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonObject {
    map: IndexMap<String, JsonNode>,
}

impl JsonObject {
    /// Creates an empty object.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty object with room for `cap` entries.
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            map: IndexMap::with_capacity(cap),
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if the object has no entries.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Returns `true` if `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    /// Inserts or replaces an entry, returning the previous node.
    ///
    /// A replaced entry keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, node: impl Into<JsonNode>) -> Option<JsonNode> {
        self.map.insert(key.into(), node.into())
    }

    /// Inserts an entry only if `key` is absent.
    ///
    /// On a duplicate the object is left untouched and the rejected node is
    /// handed back.
    pub fn try_insert(&mut self, key: String, node: JsonNode) -> Result<(), (String, JsonNode)> {
        match self.map.entry(key) {
            Entry::Occupied(occupied) => Err((occupied.key().clone(), node)),
            Entry::Vacant(vacant) => {
                vacant.insert(node);
                Ok(())
            }
        }
    }

    /// Removes an entry, keeping the order of the remaining ones.
    pub fn remove(&mut self, key: &str) -> Option<JsonNode> {
        self.map.shift_remove(key)
    }

    /// The node stored under `key`, whatever its shape.
    pub fn get(&self, key: &str) -> Option<&JsonNode> {
        self.map.get(key)
    }

    /// The leaf under `key`; `None` if absent or not a leaf.
    pub fn get_value(&self, key: &str) -> Option<&JsonValue> {
        self.get(key).and_then(JsonNode::as_value)
    }

    /// The object under `key`; `None` if absent or not an object.
    pub fn get_object(&self, key: &str) -> Option<&JsonObject> {
        self.get(key).and_then(JsonNode::as_object)
    }

    /// The array under `key`; `None` if absent or not an array.
    pub fn get_array(&self, key: &str) -> Option<&JsonArray> {
        self.get(key).and_then(JsonNode::as_array)
    }

    /// Iterates over entries in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, JsonNode> {
        self.map.iter()
    }

    /// Iterates over keys in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, String, JsonNode> {
        self.map.keys()
    }
}

impl Index<&str> for JsonObject {
    type Output = JsonNode;

    /// Panics if `key` is absent; use [`JsonObject::get`] to probe.
    fn index(&self, key: &str) -> &JsonNode {
        &self.map[key]
    }
}

impl<'a> IntoIterator for &'a JsonObject {
    type Item = (&'a String, &'a JsonNode);
    type IntoIter = indexmap::map::Iter<'a, String, JsonNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.map.iter()
    }
}

impl IntoIterator for JsonObject {
    type Item = (String, JsonNode);
    type IntoIter = indexmap::map::IntoIter<String, JsonNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.map.into_iter()
    }
}

impl<K: Into<String>, N: Into<JsonNode>> FromIterator<(K, N)> for JsonObject {
    fn from_iter<I: IntoIterator<Item = (K, N)>>(iter: I) -> Self {
        Self {
            map: iter
                .into_iter()
                .map(|(k, n)| (k.into(), n.into()))
                .collect(),
        }
    }
}
