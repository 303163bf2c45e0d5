//! Member types the compiler knows how to fill.

use std::sync::Arc;

use hexjson_value::{JsonArray, JsonNode, ValueType};

use super::{
    BindingError, ConvertError, ConvertErrorKind, Describe, FieldDescriptor, Linker, Primitive,
    TypeDesc,
};

/// Converts one JSON node into a member value.
pub type Converter<F> = Arc<dyn Fn(&JsonNode) -> Result<F, ConvertError> + Send + Sync>;

/// A type a bound member can have.
///
/// Implemented for the integer and float primitives, `bool`, `String`,
/// [`JsonNode`], `Vec<E>`, `Box<[E]>`, `Option<E>`, and by
/// `#[derive(Describe)]` for every described struct.
pub trait FieldType: Sized + 'static {
    /// Structure of the type, for the resolver.
    fn desc() -> TypeDesc;

    /// The dedicated converter for this type.
    fn converter(
        linker: &mut Linker<'_>,
        desc: &FieldDescriptor,
    ) -> Result<Converter<Self>, BindingError>;
}

fn number(node: &JsonNode) -> Result<f64, ConvertError> {
    match node {
        JsonNode::Value(v) => Ok(v.as_f64()?),
        other => Err(ConvertError::shape(ValueType::Number, other.value_type())),
    }
}

fn array(node: &JsonNode) -> Result<&JsonArray, ConvertError> {
    node.as_array()
        .ok_or_else(|| ConvertError::shape(ValueType::Array, node.value_type()))
}

/// Truncates toward zero; fails unless the result fits `I`.
fn integer<I: TryFrom<i128>>(node: &JsonNode, target: &'static str) -> Result<I, ConvertError> {
    let value = number(node)?;
    let out_of_range = || ConvertError::new(ConvertErrorKind::OutOfRange { value, target });
    let truncated = value.trunc();
    if !truncated.is_finite()
        || truncated < i128::MIN as f64
        || truncated >= i128::MAX as f64
    {
        return Err(out_of_range());
    }
    I::try_from(truncated as i128).map_err(|_| out_of_range())
}

macro_rules! integer_field {
    ($($ty:ty => $prim:ident),* $(,)?) => {
        $(
            impl FieldType for $ty {
                fn desc() -> TypeDesc {
                    TypeDesc::Primitive(Primitive::$prim)
                }

                fn converter(
                    _: &mut Linker<'_>,
                    _: &FieldDescriptor,
                ) -> Result<Converter<Self>, BindingError> {
                    Ok(Arc::new(|node: &JsonNode| {
                        integer::<$ty>(node, Primitive::$prim.name())
                    }))
                }
            }
        )*
    };
}

integer_field! {
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    usize => Usize,
}

impl FieldType for f64 {
    fn desc() -> TypeDesc {
        TypeDesc::Primitive(Primitive::F64)
    }

    fn converter(_: &mut Linker<'_>, _: &FieldDescriptor) -> Result<Converter<Self>, BindingError> {
        Ok(Arc::new(number))
    }
}

impl FieldType for f32 {
    fn desc() -> TypeDesc {
        TypeDesc::Primitive(Primitive::F32)
    }

    fn converter(_: &mut Linker<'_>, _: &FieldDescriptor) -> Result<Converter<Self>, BindingError> {
        Ok(Arc::new(|node: &JsonNode| {
            let value = number(node)?;
            if value.is_finite() && value.abs() > f64::from(f32::MAX) {
                return Err(ConvertError::new(ConvertErrorKind::OutOfRange {
                    value,
                    target: "f32",
                }));
            }
            Ok(value as f32)
        }))
    }
}

impl FieldType for bool {
    fn desc() -> TypeDesc {
        TypeDesc::Primitive(Primitive::Bool)
    }

    fn converter(_: &mut Linker<'_>, _: &FieldDescriptor) -> Result<Converter<Self>, BindingError> {
        Ok(Arc::new(|node: &JsonNode| match node {
            JsonNode::Value(v) => Ok(v.as_bool()?),
            other => Err(ConvertError::shape(ValueType::Boolean, other.value_type())),
        }))
    }
}

impl FieldType for String {
    fn desc() -> TypeDesc {
        TypeDesc::Primitive(Primitive::String)
    }

    fn converter(_: &mut Linker<'_>, _: &FieldDescriptor) -> Result<Converter<Self>, BindingError> {
        Ok(Arc::new(|node: &JsonNode| match node {
            JsonNode::Value(v) => Ok(v.as_str()?.to_owned()),
            other => Err(ConvertError::shape(ValueType::String, other.value_type())),
        }))
    }
}

impl FieldType for JsonNode {
    fn desc() -> TypeDesc {
        TypeDesc::Primitive(Primitive::Any)
    }

    fn converter(_: &mut Linker<'_>, _: &FieldDescriptor) -> Result<Converter<Self>, BindingError> {
        Ok(Arc::new(|node: &JsonNode| Ok(node.clone())))
    }
}

impl<E: FieldType> FieldType for Vec<E> {
    fn desc() -> TypeDesc {
        TypeDesc::Seq(E::desc)
    }

    fn converter(
        linker: &mut Linker<'_>,
        desc: &FieldDescriptor,
    ) -> Result<Converter<Self>, BindingError> {
        let element = E::converter(linker, desc)?;
        Ok(Arc::new(move |node: &JsonNode| {
            let items = array(node)?;
            let mut out = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                out.push(element(item).map_err(|e| e.at_index(i))?);
            }
            Ok(out)
        }))
    }
}

impl<E: FieldType> FieldType for Box<[E]> {
    fn desc() -> TypeDesc {
        TypeDesc::Seq(E::desc)
    }

    fn converter(
        linker: &mut Linker<'_>,
        desc: &FieldDescriptor,
    ) -> Result<Converter<Self>, BindingError> {
        let list = <Vec<E>>::converter(linker, desc)?;
        Ok(Arc::new(move |node: &JsonNode| list(node).map(Vec::into_boxed_slice)))
    }
}

impl<E: FieldType> FieldType for Option<E> {
    fn desc() -> TypeDesc {
        TypeDesc::Optional(E::desc)
    }

    fn converter(
        linker: &mut Linker<'_>,
        desc: &FieldDescriptor,
    ) -> Result<Converter<Self>, BindingError> {
        let inner = E::converter(linker, desc)?;
        Ok(Arc::new(move |node: &JsonNode| {
            if node.is_null() {
                Ok(None)
            } else {
                inner(node).map(Some)
            }
        }))
    }
}

/// [`FieldType::desc`] of a described struct.
pub fn bound_desc<U: Describe>() -> TypeDesc {
    TypeDesc::Bound(U::shape)
}

/// [`FieldType::converter`] of a described struct: the node must be an
/// object, handed to `U`'s compiled procedure.
pub fn bound_converter<U: Describe>(
    linker: &mut Linker<'_>,
) -> Result<Converter<U>, BindingError> {
    let procedure = linker.nested::<U>()?;
    Ok(Arc::new(move |node: &JsonNode| procedure.call_node(node)))
}
