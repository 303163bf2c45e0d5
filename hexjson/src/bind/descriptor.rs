//! Field-binding descriptors produced by the resolver.

use std::sync::Arc;

use super::{Access, MethodShape, TypeShape};

/// Leaf kinds with a dedicated extraction path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    /// `i8`
    I8,
    /// `i16`
    I16,
    /// `i32`
    I32,
    /// `i64`
    I64,
    /// `isize`
    Isize,
    /// `u8`
    U8,
    /// `u16`
    U16,
    /// `u32`
    U32,
    /// `u64`
    U64,
    /// `usize`
    Usize,
    /// `f32`
    F32,
    /// `f64`
    F64,
    /// `bool`
    Bool,
    /// `String`
    String,
    /// A `JsonNode` of any shape, stored as-is
    Any,
}

impl Primitive {
    /// The Rust spelling of the kind (`"any"` for [`Primitive::Any`]).
    pub const fn name(self) -> &'static str {
        match self {
            Primitive::I8 => "i8",
            Primitive::I16 => "i16",
            Primitive::I32 => "i32",
            Primitive::I64 => "i64",
            Primitive::Isize => "isize",
            Primitive::U8 => "u8",
            Primitive::U16 => "u16",
            Primitive::U32 => "u32",
            Primitive::U64 => "u64",
            Primitive::Usize => "usize",
            Primitive::F32 => "f32",
            Primitive::F64 => "f64",
            Primitive::Bool => "bool",
            Primitive::String => "String",
            Primitive::Any => "any",
        }
    }
}

/// Structure of a member's declared type, as far as conversion cares.
#[derive(Debug, Clone, Copy)]
pub enum TypeDesc {
    /// A leaf kind
    Primitive(Primitive),
    /// `Vec<E>` or `Box<[E]>`
    Seq(fn() -> TypeDesc),
    /// `Option<E>`
    Optional(fn() -> TypeDesc),
    /// Another described struct
    Bound(fn() -> &'static TypeShape),
}

/// How a bound member is filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// One leaf value
    Scalar(Primitive),
    /// One nested bound struct
    Nested,
    /// A list of leaf values
    List(Primitive),
    /// A list of nested bound structs
    ListWithNest,
    /// Whatever a registered conversion method returns
    Piped,
}

/// How one member maps to one JSON key.
///
/// Built once per type and shared by every conversion of that type.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    /// Name of the type declaring the member
    pub owner: &'static str,
    /// The JSON key
    pub key: &'static str,
    /// The member name
    pub member: &'static str,
    /// Position of the member in [`TypeShape::members`]
    pub member_index: usize,
    /// Field store or setter
    pub access: Access,
    /// The member's declared type as written
    pub declared: &'static str,
    /// How the member is filled
    pub kind: FieldKind,
    /// `Option<_>` member: a missing key or `null` leaves `None`
    pub optional: bool,
    /// Descriptors of the nested struct for [`FieldKind::Nested`] and
    /// [`FieldKind::ListWithNest`]
    pub children: Option<Arc<TypeDescriptors>>,
    /// The conversion method for [`FieldKind::Piped`]
    pub pipe: Option<&'static MethodShape>,
}

/// Every bound member of one type.
#[derive(Debug)]
pub struct TypeDescriptors {
    /// The type the descriptors belong to
    pub shape: &'static TypeShape,
    /// Bound members in declaration order
    pub fields: Vec<FieldDescriptor>,
}

impl TypeDescriptors {
    /// The descriptor for JSON key `key`.
    pub fn field(&self, key: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.key == key)
    }
}
