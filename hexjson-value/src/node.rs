use crate::{JsonArray, JsonObject, JsonValue, ValueType};

/// Any node of a value tree: a leaf, an array or an object.
#[derive(Debug, Clone, PartialEq)]
pub enum JsonNode {
    /// A null, boolean, number or string leaf
    Value(JsonValue),
    /// An ordered sequence of nodes
    Array(JsonArray),
    /// A keyed collection of nodes
    Object(JsonObject),
}

impl JsonNode {
    /// The `null` leaf.
    pub const NULL: JsonNode = JsonNode::Value(JsonValue::Null);

    /// The shape of this node.
    pub const fn value_type(&self) -> ValueType {
        match self {
            JsonNode::Value(v) => v.value_type(),
            JsonNode::Array(_) => ValueType::Array,
            JsonNode::Object(_) => ValueType::Object,
        }
    }

    /// Returns `true` for null, boolean, number and string nodes.
    pub const fn is_leaf(&self) -> bool {
        matches!(self, JsonNode::Value(_))
    }

    /// Returns `true` if this is the `null` leaf.
    pub const fn is_null(&self) -> bool {
        matches!(self, JsonNode::Value(JsonValue::Null))
    }

    /// The leaf, or `None` for containers.
    pub fn as_value(&self) -> Option<&JsonValue> {
        match self {
            JsonNode::Value(v) => Some(v),
            _ => None,
        }
    }

    /// The array, or `None` for any other shape.
    pub fn as_array(&self) -> Option<&JsonArray> {
        match self {
            JsonNode::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Mutable access to the array, or `None` for any other shape.
    pub fn as_array_mut(&mut self) -> Option<&mut JsonArray> {
        match self {
            JsonNode::Array(a) => Some(a),
            _ => None,
        }
    }

    /// The object, or `None` for any other shape.
    pub fn as_object(&self) -> Option<&JsonObject> {
        match self {
            JsonNode::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Mutable access to the object, or `None` for any other shape.
    pub fn as_object_mut(&mut self) -> Option<&mut JsonObject> {
        match self {
            JsonNode::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Converts into the object, handing the node back on mismatch.
    pub fn into_object(self) -> Result<JsonObject, JsonNode> {
        match self {
            JsonNode::Object(o) => Ok(o),
            other => Err(other),
        }
    }

    /// Converts into the array, handing the node back on mismatch.
    pub fn into_array(self) -> Result<JsonArray, JsonNode> {
        match self {
            JsonNode::Array(a) => Ok(a),
            other => Err(other),
        }
    }
}

impl Default for JsonNode {
    fn default() -> Self {
        JsonNode::NULL
    }
}

impl From<JsonValue> for JsonNode {
    fn from(v: JsonValue) -> Self {
        JsonNode::Value(v)
    }
}

impl From<JsonArray> for JsonNode {
    fn from(a: JsonArray) -> Self {
        JsonNode::Array(a)
    }
}

impl From<JsonObject> for JsonNode {
    fn from(o: JsonObject) -> Self {
        JsonNode::Object(o)
    }
}

macro_rules! leaf_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for JsonNode {
                fn from(v: $ty) -> Self {
                    JsonNode::Value(JsonValue::from(v))
                }
            }
        )*
    };
}

leaf_from!(bool, f64, i32, &str, String);
