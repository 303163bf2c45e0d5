//! Array node type.

use core::ops::Index;

use crate::{JsonNode, JsonObject, JsonValue};

/// An ordered, index-addressable sequence of nodes.
///
/// Iteration order is insertion order and is significant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonArray {
    items: Vec<JsonNode>,
}

impl JsonArray {
    /// Creates an empty array.
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Creates an empty array with room for `cap` nodes.
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            items: Vec::with_capacity(cap),
        }
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the array holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Appends a node.
    pub fn push(&mut self, node: impl Into<JsonNode>) {
        self.items.push(node.into());
    }

    /// Removes and returns the node at `index`, shifting later nodes down.
    /// Returns `None` when `index` is out of bounds.
    pub fn remove(&mut self, index: usize) -> Option<JsonNode> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    /// The node at `index`, whatever its shape.
    pub fn get(&self, index: usize) -> Option<&JsonNode> {
        self.items.get(index)
    }

    /// The leaf at `index`; `None` if out of bounds or not a leaf.
    pub fn get_value(&self, index: usize) -> Option<&JsonValue> {
        self.get(index).and_then(JsonNode::as_value)
    }

    /// The object at `index`; `None` if out of bounds or not an object.
    pub fn get_object(&self, index: usize) -> Option<&JsonObject> {
        self.get(index).and_then(JsonNode::as_object)
    }

    /// The array at `index`; `None` if out of bounds or not an array.
    pub fn get_array(&self, index: usize) -> Option<&JsonArray> {
        self.get(index).and_then(JsonNode::as_array)
    }

    /// Iterates over the nodes in order.
    pub fn iter(&self) -> core::slice::Iter<'_, JsonNode> {
        self.items.iter()
    }

    /// The nodes as a slice.
    pub fn as_slice(&self) -> &[JsonNode] {
        &self.items
    }
}

impl Index<usize> for JsonArray {
    type Output = JsonNode;

    fn index(&self, index: usize) -> &JsonNode {
        &self.items[index]
    }
}

impl<'a> IntoIterator for &'a JsonArray {
    type Item = &'a JsonNode;
    type IntoIter = core::slice::Iter<'a, JsonNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl IntoIterator for JsonArray {
    type Item = JsonNode;
    type IntoIter = std::vec::IntoIter<JsonNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<N: Into<JsonNode>> FromIterator<N> for JsonArray {
    fn from_iter<I: IntoIterator<Item = N>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<Vec<JsonNode>> for JsonArray {
    fn from(items: Vec<JsonNode>) -> Self {
        Self { items }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probing_accessors_return_none_on_mismatch() {
        let mut arr = JsonArray::new();
        arr.push(1.5);
        arr.push(JsonObject::new());
        arr.push(JsonArray::new());

        assert_eq!(arr.get_value(0), Some(&JsonValue::Number(1.5)));
        assert!(arr.get_object(0).is_none());
        assert!(arr.get_object(1).is_some());
        assert!(arr.get_value(1).is_none());
        assert!(arr.get_array(2).is_some());
        assert!(arr.get_value(3).is_none());
    }

    #[test]
    fn remove_keeps_order() {
        let mut arr: JsonArray = [1, 2, 3].into_iter().collect();
        assert_eq!(arr.remove(1), Some(JsonNode::from(2)));
        assert_eq!(arr.remove(7), None);
        let rest: Vec<f64> = arr
            .iter()
            .filter_map(|n| n.as_value()?.as_f64().ok())
            .collect();
        assert_eq!(rest, vec![1.0, 3.0]);
    }
}
