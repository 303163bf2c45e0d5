//! Leaf values and the shape tag shared by every node.

use core::fmt;

/// Enum distinguishing the six JSON shapes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ValueType {
    /// `null`
    Null,
    /// `true` or `false`
    Boolean,
    /// A double-precision number
    Number,
    /// A string
    String,
    /// An ordered sequence of nodes
    Array,
    /// A keyed collection of nodes
    Object,
}

impl ValueType {
    /// Lower-case name used in error messages.
    pub const fn name(self) -> &'static str {
        match self {
            ValueType::Null => "null",
            ValueType::Boolean => "boolean",
            ValueType::Number => "number",
            ValueType::String => "string",
            ValueType::Array => "array",
            ValueType::Object => "object",
        }
    }

    /// Returns `true` for the four leaf shapes.
    pub const fn is_leaf(self) -> bool {
        matches!(
            self,
            ValueType::Null | ValueType::Boolean | ValueType::Number | ValueType::String
        )
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned by a leaf accessor invoked against a value of another shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeMismatch {
    /// The shape the accessor requires
    pub expected: ValueType,
    /// The shape actually stored
    pub found: ValueType,
}

impl fmt::Display for ShapeMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected {}, found {}", self.expected, self.found)
    }
}

impl std::error::Error for ShapeMismatch {}

/// A leaf node: null, boolean, number or string.
///
/// Leaves are immutable once constructed. The typed accessors fail with
/// [`ShapeMismatch`] when the tag does not match; use
/// [`JsonNode::as_value`](crate::JsonNode::as_value) and friends to probe
/// shapes without failing.
#[derive(Debug, Clone, PartialEq)]
pub enum JsonValue {
    /// `null`
    Null,
    /// `true` or `false`
    Boolean(bool),
    /// Every JSON number is stored as a double
    Number(f64),
    /// A decoded string
    String(String),
}

macro_rules! truncating_accessors {
    ($($(#[$meta:meta])* $name:ident => $ty:ty),* $(,)?) => {
        $(
            $(#[$meta])*
            pub fn $name(&self) -> Result<$ty, ShapeMismatch> {
                self.as_f64().map(|n| n as $ty)
            }
        )*
    };
}

impl JsonValue {
    /// The shape of this leaf.
    pub const fn value_type(&self) -> ValueType {
        match self {
            JsonValue::Null => ValueType::Null,
            JsonValue::Boolean(_) => ValueType::Boolean,
            JsonValue::Number(_) => ValueType::Number,
            JsonValue::String(_) => ValueType::String,
        }
    }

    /// Returns `true` if this is `null`.
    pub const fn is_null(&self) -> bool {
        matches!(self, JsonValue::Null)
    }

    const fn mismatch(&self, expected: ValueType) -> ShapeMismatch {
        ShapeMismatch {
            expected,
            found: self.value_type(),
        }
    }

    /// The boolean, if this is a boolean leaf.
    pub fn as_bool(&self) -> Result<bool, ShapeMismatch> {
        match self {
            JsonValue::Boolean(b) => Ok(*b),
            _ => Err(self.mismatch(ValueType::Boolean)),
        }
    }

    /// The number, if this is a number leaf.
    pub fn as_f64(&self) -> Result<f64, ShapeMismatch> {
        match self {
            JsonValue::Number(n) => Ok(*n),
            _ => Err(self.mismatch(ValueType::Number)),
        }
    }

    /// The string, if this is a string leaf.
    pub fn as_str(&self) -> Result<&str, ShapeMismatch> {
        match self {
            JsonValue::String(s) => Ok(s),
            _ => Err(self.mismatch(ValueType::String)),
        }
    }

    /// Succeeds only for `null`.
    pub fn as_null(&self) -> Result<(), ShapeMismatch> {
        match self {
            JsonValue::Null => Ok(()),
            _ => Err(self.mismatch(ValueType::Null)),
        }
    }

    // Rust `as` casts truncate toward zero and saturate at the bounds.
    truncating_accessors! {
        /// The number truncated to `i32`.
        as_i32 => i32,
        /// The number truncated to `i64`.
        as_i64 => i64,
        /// The number truncated to `u32`.
        as_u32 => u32,
        /// The number truncated to `u64`.
        as_u64 => u64,
        /// The number narrowed to `f32`.
        as_f32 => f32,
    }
}

impl From<bool> for JsonValue {
    fn from(b: bool) -> Self {
        JsonValue::Boolean(b)
    }
}

impl From<f64> for JsonValue {
    fn from(n: f64) -> Self {
        JsonValue::Number(n)
    }
}

impl From<i32> for JsonValue {
    fn from(n: i32) -> Self {
        JsonValue::Number(f64::from(n))
    }
}

impl From<&str> for JsonValue {
    fn from(s: &str) -> Self {
        JsonValue::String(s.to_owned())
    }
}

impl From<String> for JsonValue {
    fn from(s: String) -> Self {
        JsonValue::String(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_require_matching_tag() {
        let v = JsonValue::from("hi");
        assert_eq!(v.as_str(), Ok("hi"));
        assert_eq!(
            v.as_bool(),
            Err(ShapeMismatch {
                expected: ValueType::Boolean,
                found: ValueType::String
            })
        );
        assert!(JsonValue::Null.as_f64().is_err());
        assert!(JsonValue::Null.as_null().is_ok());
    }

    #[test]
    fn integer_access_truncates() {
        assert_eq!(JsonValue::Number(3.9).as_i32(), Ok(3));
        assert_eq!(JsonValue::Number(-3.9).as_i64(), Ok(-3));
        assert_eq!(JsonValue::Number(-1.0).as_u32(), Ok(0));
        assert!(JsonValue::Boolean(true).as_i32().is_err());
    }

    #[test]
    fn mismatch_message() {
        let err = JsonValue::Number(1.0).as_str().unwrap_err();
        assert_eq!(err.to_string(), "expected string, found number");
    }
}
