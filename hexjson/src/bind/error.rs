//! Errors raised while building a procedure and while running one.

use core::fmt::{self, Display};

use hexjson_value::{ShapeMismatch, ValueType};

/// A type that cannot be bound, reported before any conversion runs.
///
/// Failures are cached per type: asking again returns the same error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingError {
    /// The type does not carry the `#[json(bind)]` opt-in marker
    NotBindable {
        /// The type that was asked for
        type_name: &'static str,
    },
    /// A member names a conversion method the type does not register
    UnknownPipe {
        /// The type declaring the member
        type_name: &'static str,
        /// The member
        member: &'static str,
        /// The method name that failed to resolve
        pipe: &'static str,
    },
    /// A conversion method returns a type other than the member's
    PipeSignature {
        /// The type declaring the member
        type_name: &'static str,
        /// The member
        member: &'static str,
        /// The conversion method
        pipe: &'static str,
        /// The member's declared type
        expected: &'static str,
        /// What the method returns
        found: &'static str,
    },
    /// Bound types that reach themselves again through their members
    Cycle {
        /// Type names from the first occurrence to the repeated one
        path: Vec<&'static str>,
    },
    /// A member type the binder has no conversion for, such as a list of
    /// lists
    Unsupported {
        /// The type declaring the member
        type_name: &'static str,
        /// The member
        member: &'static str,
        /// The member's declared type
        declared: &'static str,
    },
    /// The type's description names a bound member without a store for it
    MissingStore {
        /// The type declaring the member
        type_name: &'static str,
        /// The member
        member: &'static str,
    },
}

impl Display for BindingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindingError::NotBindable { type_name } => {
                write!(f, "`{type_name}` is not marked with #[json(bind)]")
            }
            BindingError::UnknownPipe {
                type_name,
                member,
                pipe,
            } => write!(
                f,
                "`{type_name}::{member}` uses pipe `{pipe}`, which `{type_name}` does not register"
            ),
            BindingError::PipeSignature {
                type_name,
                member,
                pipe,
                expected,
                found,
            } => write!(
                f,
                "pipe `{pipe}` returns `{found}` but `{type_name}::{member}` is `{expected}`"
            ),
            BindingError::Cycle { path } => {
                write!(f, "bound types form a cycle: {}", path.join(" -> "))
            }
            BindingError::Unsupported {
                type_name,
                member,
                declared,
            } => write!(
                f,
                "`{type_name}::{member}` has unsupported type `{declared}`"
            ),
            BindingError::MissingStore { type_name, member } => {
                write!(f, "`{type_name}::{member}` has no field store")
            }
        }
    }
}

impl std::error::Error for BindingError {}

/// One step on the way from the root object to a failing value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// An object key
    Key(String),
    /// An array index
    Index(usize),
}

impl Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => write!(f, ".{key}"),
            PathSegment::Index(i) => write!(f, "[{i}]"),
        }
    }
}

/// What went wrong while storing one value.
#[derive(Debug, Clone, PartialEq)]
pub enum ConvertErrorKind {
    /// A required key is absent
    MissingKey,
    /// The node has the wrong shape for the member
    Shape(ShapeMismatch),
    /// A number does not fit the member's numeric type
    OutOfRange {
        /// The number as parsed
        value: f64,
        /// The member's numeric type
        target: &'static str,
    },
    /// A conversion method rejected the node
    Custom(String),
}

impl Display for ConvertErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvertErrorKind::MissingKey => write!(f, "missing key"),
            ConvertErrorKind::Shape(mismatch) => write!(f, "{mismatch}"),
            ConvertErrorKind::OutOfRange { value, target } => {
                write!(f, "{value} is out of range for {target}")
            }
            ConvertErrorKind::Custom(msg) => f.write_str(msg),
        }
    }
}

/// A conversion that failed at a specific field; the object being built is
/// dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertError {
    /// The specific kind of error
    pub kind: ConvertErrorKind,
    path: Vec<PathSegment>,
}

impl ConvertError {
    /// Create an error located at the value being converted.
    pub const fn new(kind: ConvertErrorKind) -> Self {
        ConvertError {
            kind,
            path: Vec::new(),
        }
    }

    /// An error with a free-form message, for conversion methods.
    pub fn custom(msg: impl Display) -> Self {
        Self::new(ConvertErrorKind::Custom(msg.to_string()))
    }

    /// The node has shape `found` where `expected` was required.
    pub const fn shape(expected: ValueType, found: ValueType) -> Self {
        Self::new(ConvertErrorKind::Shape(ShapeMismatch { expected, found }))
    }

    /// Prefix the path with an object key.
    pub fn in_key(mut self, key: &str) -> Self {
        self.path.insert(0, PathSegment::Key(key.to_owned()));
        self
    }

    /// Prefix the path with an array index.
    pub fn at_index(mut self, index: usize) -> Self {
        self.path.insert(0, PathSegment::Index(index));
        self
    }

    /// Segments from the root object to the failing value.
    pub fn path(&self) -> &[PathSegment] {
        &self.path
    }
}

impl From<ShapeMismatch> for ConvertError {
    fn from(mismatch: ShapeMismatch) -> Self {
        Self::new(ConvertErrorKind::Shape(mismatch))
    }
}

impl Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if !self.path.is_empty() {
            f.write_str(" at ")?;
            for segment in &self.path {
                write!(f, "{segment}")?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ConvertError {}

#[cfg(test)]
mod tests {
    use super::*;
    use hexjson_testhelpers::test;

    #[test]
    fn path_is_built_inside_out() {
        let err = ConvertError::shape(ValueType::Number, ValueType::String)
            .in_key("x")
            .at_index(2)
            .in_key("points");
        assert_eq!(
            err.path(),
            [
                PathSegment::Key("points".into()),
                PathSegment::Index(2),
                PathSegment::Key("x".into()),
            ]
        );
        insta::assert_snapshot!(err, @"expected number, found string at .points[2].x");
    }

    #[test]
    fn cycle_message() {
        let err = BindingError::Cycle {
            path: vec!["Node", "Edge", "Node"],
        };
        insta::assert_snapshot!(err, @"bound types form a cycle: Node -> Edge -> Node");
    }
}
