//! Static descriptions of bindable types.
//!
//! A [`TypeShape`] is what `#[derive(Describe)]` emits: a table of every
//! member, which of them are bound to a JSON key, and the conversion
//! methods ("pipes") the type registers. It carries no generic code; the
//! typed half lives in [`Describe::stores`].

use core::any::{Any, TypeId};

use hexjson_value::JsonNode;

use super::{ConvertError, FieldStore};

/// A type that can be resolved and compiled into a conversion procedure.
///
/// Usually derived:
///
/// ```
/// use hexjson::Describe;
///
/// #[derive(Default, Describe)]
/// #[json(bind)]
/// struct Point {
///     #[json(key = "x")]
///     x: i32,
///     #[json(key = "y")]
///     y: i32,
/// }
///
/// let p: Point = hexjson::from_str(r#"{"x": 1, "y": 2}"#).unwrap();
/// assert_eq!((p.x, p.y), (1, 2));
/// ```
///
/// Blank instances come from [`Default`]; the procedure stores every bound
/// member into one.
pub trait Describe: Default + Send + Sync + 'static {
    /// The static description of this type.
    fn shape() -> &'static TypeShape;

    /// One linking function per bound member, in any order.
    fn stores() -> Vec<FieldStore<Self>>;
}

/// Static description of a struct.
#[derive(Debug)]
pub struct TypeShape {
    /// Name used in error messages
    pub type_name: &'static str,
    /// Identity used as the cache key
    pub type_id: fn() -> TypeId,
    /// Whether the type opted into binding with `#[json(bind)]`
    pub bind: bool,
    /// Every member, bound or not, in declaration order
    pub members: &'static [MemberShape],
    /// Registered conversion methods
    pub methods: &'static [MethodShape],
}

impl TypeShape {
    /// The cache key of this type.
    pub fn id(&self) -> TypeId {
        (self.type_id)()
    }

    /// Look up a registered conversion method by name.
    pub fn method(&self, name: &str) -> Option<&'static MethodShape> {
        self.methods.iter().find(|m| m.name == name)
    }
}

/// How a bound value reaches its member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Direct field assignment
    Field,
    /// A `fn(&mut self, value)` method with this name
    Setter(&'static str),
}

/// One member of a described struct.
#[derive(Debug)]
pub struct MemberShape {
    /// Field name
    pub name: &'static str,
    /// Declared type as written
    pub type_name: &'static str,
    /// The JSON key, for members annotated with `#[json(key = "..")]`
    pub key: Option<&'static str>,
    /// Field store or setter
    pub access: Access,
    /// Read-only members are skipped by the resolver, even when they carry
    /// a key.
    ///
    /// `#[derive(Describe)]` always sets this to `true`: every named field
    /// of a struct can be assigned. It is for hand-written [`Describe`]
    /// impls that list members the binder must leave alone.
    pub writable: bool,
    /// Conversion-relevant structure of the declared type; `None` for
    /// unbound or piped members
    pub ty: Option<fn() -> super::TypeDesc>,
    /// Name of a registered conversion method to use instead of the
    /// built-in conversion
    pub pipe: Option<&'static str>,
}

/// Erased conversion method: JSON node in, boxed member value out.
pub type PipeFn = fn(&JsonNode) -> Result<Box<dyn Any + Send>, ConvertError>;

/// A conversion method registered with `#[json(pipes(...))]`.
#[derive(Debug)]
pub struct MethodShape {
    /// Method name
    pub name: &'static str,
    /// The method, with its result boxed
    pub call: PipeFn,
    /// `TypeId` of the method's success type
    pub returns: fn() -> TypeId,
    /// Name of the method's success type
    pub returns_name: fn() -> &'static str,
}

/// Boxes the result of a typed conversion method.
pub fn erase_pipe<R: Send + 'static>(
    method: fn(&JsonNode) -> Result<R, ConvertError>,
    node: &JsonNode,
) -> Result<Box<dyn Any + Send>, ConvertError> {
    method(node).map(|value| Box::new(value) as Box<dyn Any + Send>)
}

/// `TypeId` of a conversion method's success type.
pub fn pipe_return_id<R: 'static>(_: fn(&JsonNode) -> Result<R, ConvertError>) -> TypeId {
    TypeId::of::<R>()
}

/// Name of a conversion method's success type.
pub fn pipe_return_name<R: 'static>(
    _: fn(&JsonNode) -> Result<R, ConvertError>,
) -> &'static str {
    core::any::type_name::<R>()
}
