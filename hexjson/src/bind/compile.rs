//! The deserialization compiler: descriptors in, [`Procedure`] out.
//!
//! Compiling a type links every bound member once. Linking picks the
//! dedicated converter for the member's kind, pulls in the already-compiled
//! procedures of nested types, and wraps it all in a boxed store closure.
//! Running a procedure afterwards is a walk over those closures; no
//! descriptor is consulted again.

use core::any::TypeId;
use std::sync::Arc;

use hexjson_value::{JsonArray, JsonNode, JsonObject, ValueType};

use super::{
    BindState, BindingError, ConvertError, ConvertErrorKind, Converter, Describe,
    FieldDescriptor, FieldKind, FieldType, Registry, TypeDescriptors, TypeShape,
    resolve::Resolver,
};
use crate::tracing_macros::{debug, trace};

/// A linked store: converts one node and writes it into the target.
pub type StoreOp<T> = Box<dyn Fn(&mut T, &JsonNode) -> Result<(), ConvertError> + Send + Sync>;

/// Builds the [`StoreOp`] of one member from its descriptor.
pub type LinkFn<T> = fn(&mut Linker<'_>, &FieldDescriptor) -> Result<StoreOp<T>, BindingError>;

/// The typed half of a member's description, emitted by
/// `#[derive(Describe)]` next to the static [`TypeShape`](super::TypeShape).
pub struct FieldStore<T> {
    member: usize,
    link: LinkFn<T>,
}

impl<T> FieldStore<T> {
    /// The linking function for member `member` (an index into
    /// [`TypeShape::members`](super::TypeShape::members)).
    pub const fn new(member: usize, link: LinkFn<T>) -> Self {
        FieldStore { member, link }
    }
}

/// Compiler state handed to linking functions.
///
/// Holds the registry's build lock for its whole life, so every type it
/// compiles is built exactly once.
pub struct Linker<'r> {
    registry: &'r Registry,
    resolver: Resolver<'r>,
}

impl<'r> Linker<'r> {
    pub(crate) fn new(registry: &'r Registry) -> Self {
        Linker {
            registry,
            resolver: Resolver::new(registry),
        }
    }

    /// The built-in converter for member type `F`.
    pub fn converter<F: FieldType>(
        &mut self,
        desc: &FieldDescriptor,
    ) -> Result<Converter<F>, BindingError> {
        F::converter(self, desc)
    }

    /// A converter that runs the member's registered conversion method.
    ///
    /// Fails if the method's success type is not `F`.
    pub fn piped<F: 'static>(
        &mut self,
        desc: &FieldDescriptor,
    ) -> Result<Converter<F>, BindingError> {
        let Some(method) = desc.pipe else {
            return Err(BindingError::MissingStore {
                type_name: desc.owner,
                member: desc.member,
            });
        };
        if (method.returns)() != TypeId::of::<F>() {
            return Err(BindingError::PipeSignature {
                type_name: desc.owner,
                member: desc.member,
                pipe: method.name,
                expected: core::any::type_name::<F>(),
                found: (method.returns_name)(),
            });
        }
        let call = method.call;
        Ok(Arc::new(move |node: &JsonNode| {
            let boxed = call(node)?;
            boxed
                .downcast::<F>()
                .map(|value| *value)
                .map_err(|_| ConvertError::custom("conversion method returned another type"))
        }))
    }

    /// Descriptors for `shape`, from the cache or freshly resolved.
    pub(crate) fn descriptors(
        &mut self,
        shape: &'static TypeShape,
    ) -> Result<Arc<TypeDescriptors>, BindingError> {
        self.resolver.resolve(shape)
    }

    /// The compiled procedure of a nested bound type, building it first if
    /// needed.
    pub fn nested<U: Describe>(&mut self) -> Result<Arc<Procedure<U>>, BindingError> {
        let id = TypeId::of::<U>();
        if let Some(procedure) = self.registry.cached_procedure::<U>() {
            trace!(type_name = U::shape().type_name, "procedure cache hit");
            return Ok(procedure);
        }
        if let Some(err) = self.registry.cached_failure(id) {
            return Err(err);
        }
        let result = self.build::<U>();
        if let Err(err) = &result {
            self.registry.record_failure(id, err.clone());
        }
        result
    }

    fn build<U: Describe>(&mut self) -> Result<Arc<Procedure<U>>, BindingError> {
        let descriptors = self.resolver.resolve(U::shape())?;
        let id = TypeId::of::<U>();
        self.registry.set_state(id, BindState::Compiling);
        debug!(type_name = descriptors.shape.type_name, "compiling procedure");
        let procedure = compile::<U>(self, &descriptors)?;
        Ok(self.registry.commit_procedure(procedure))
    }
}

static NULL: JsonNode = JsonNode::NULL;

/// What a procedure does when a bound key is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Absent {
    Fail,
    Skip,
    StoreNull,
}

struct Slot<T> {
    key: &'static str,
    absent: Absent,
    store: StoreOp<T>,
}

/// A compiled, type-specialized conversion from [`JsonObject`] to `T`.
///
/// Cached per type by the [`Registry`]; share it with
/// [`Registry::procedure`].
pub struct Procedure<T> {
    type_name: &'static str,
    slots: Vec<Slot<T>>,
}

impl<T> Procedure<T> {
    /// Name of the type this procedure builds.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Number of bound members.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if the type has no bound members.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl<T: Default> Procedure<T> {
    /// Build a `T` from `obj`.
    ///
    /// The first failing member aborts the conversion; the partly built
    /// value is dropped.
    pub fn call(&self, obj: &JsonObject) -> Result<T, ConvertError> {
        let mut target = T::default();
        for slot in &self.slots {
            let node = match obj.get(slot.key) {
                Some(node) => node,
                None => match slot.absent {
                    Absent::Fail => {
                        return Err(
                            ConvertError::new(ConvertErrorKind::MissingKey).in_key(slot.key)
                        );
                    }
                    Absent::Skip => continue,
                    Absent::StoreNull => &NULL,
                },
            };
            (slot.store)(&mut target, node).map_err(|e| e.in_key(slot.key))?;
        }
        Ok(target)
    }

    /// Build a `T` from a node that must be an object.
    pub fn call_node(&self, node: &JsonNode) -> Result<T, ConvertError> {
        match node.as_object() {
            Some(obj) => self.call(obj),
            None => Err(ConvertError::shape(ValueType::Object, node.value_type())),
        }
    }

    /// Build one `T` per element of `arr`, which must hold only objects.
    pub fn call_array(&self, arr: &JsonArray) -> Result<Vec<T>, ConvertError> {
        let mut out = Vec::with_capacity(arr.len());
        for (i, node) in arr.iter().enumerate() {
            out.push(self.call_node(node).map_err(|e| e.at_index(i))?);
        }
        Ok(out)
    }
}

impl<T> core::fmt::Debug for Procedure<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Procedure")
            .field("type_name", &self.type_name)
            .field("keys", &self.slots.iter().map(|s| s.key).collect::<Vec<_>>())
            .finish()
    }
}

fn compile<T: Describe>(
    linker: &mut Linker<'_>,
    descriptors: &TypeDescriptors,
) -> Result<Procedure<T>, BindingError> {
    let stores = T::stores();
    let mut slots = Vec::with_capacity(descriptors.fields.len());

    for field in &descriptors.fields {
        let store = stores
            .iter()
            .find(|s| s.member == field.member_index)
            .ok_or_else(|| BindingError::MissingStore {
                type_name: descriptors.shape.type_name,
                member: field.member,
            })?;
        let absent = if field.kind == FieldKind::Piped {
            Absent::StoreNull
        } else if field.optional {
            Absent::Skip
        } else {
            Absent::Fail
        };
        trace!(key = field.key, kind = ?field.kind, "linking member");
        slots.push(Slot {
            key: field.key,
            absent,
            store: (store.link)(linker, field)?,
        });
    }

    Ok(Procedure {
        type_name: descriptors.shape.type_name,
        slots,
    })
}
