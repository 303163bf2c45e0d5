//! Type metadata resolution: [`TypeShape`] tables to [`TypeDescriptors`].
//!
//! Resolution recurses into every nested bound type before the parent's
//! descriptors are committed, so children are always cached first. The
//! stack of types being resolved doubles as the cycle detector.

use std::sync::Arc;

use super::{
    BindState, BindingError, FieldDescriptor, FieldKind, MemberShape, Registry, TypeDesc,
    TypeDescriptors, TypeShape,
};
use crate::tracing_macros::{debug, trace};

pub(crate) struct Resolver<'r> {
    registry: &'r Registry,
    stack: Vec<&'static TypeShape>,
}

impl<'r> Resolver<'r> {
    pub(crate) fn new(registry: &'r Registry) -> Self {
        Resolver {
            registry,
            stack: Vec::new(),
        }
    }

    /// Descriptors for `shape`, from the cache or freshly resolved.
    pub(crate) fn resolve(
        &mut self,
        shape: &'static TypeShape,
    ) -> Result<Arc<TypeDescriptors>, BindingError> {
        let id = shape.id();
        if let Some(descriptors) = self.registry.cached_descriptors(id) {
            trace!(type_name = shape.type_name, "descriptor cache hit");
            return Ok(descriptors);
        }
        if let Some(err) = self.registry.cached_failure(id) {
            return Err(err);
        }
        if let Some(pos) = self.stack.iter().position(|s| s.id() == id) {
            let mut path: Vec<&'static str> =
                self.stack[pos..].iter().map(|s| s.type_name).collect();
            path.push(shape.type_name);
            return Err(BindingError::Cycle { path });
        }

        debug!(type_name = shape.type_name, "resolving descriptors");
        self.registry.set_state(id, BindState::Resolving);
        self.stack.push(shape);
        let result = self.resolve_members(shape);
        self.stack.pop();

        match result {
            Ok(fields) => {
                debug!(
                    type_name = shape.type_name,
                    fields = fields.len(),
                    "resolved descriptors"
                );
                let descriptors = Arc::new(TypeDescriptors { shape, fields });
                self.registry.commit_descriptors(id, descriptors.clone());
                Ok(descriptors)
            }
            Err(err) => {
                self.registry.record_failure(id, err.clone());
                Err(err)
            }
        }
    }

    fn resolve_members(
        &mut self,
        shape: &'static TypeShape,
    ) -> Result<Vec<FieldDescriptor>, BindingError> {
        if !shape.bind {
            return Err(BindingError::NotBindable {
                type_name: shape.type_name,
            });
        }

        let mut fields = Vec::new();
        for (member_index, member) in shape.members.iter().enumerate() {
            let Some(key) = member.key else {
                continue;
            };
            if !member.writable {
                trace!(member = member.name, "skipping read-only member");
                continue;
            }

            let mut field = FieldDescriptor {
                owner: shape.type_name,
                key,
                member: member.name,
                member_index,
                access: member.access,
                declared: member.type_name,
                kind: FieldKind::Piped,
                optional: false,
                children: None,
                pipe: None,
            };

            if let Some(pipe) = member.pipe {
                let method = shape.method(pipe).ok_or(BindingError::UnknownPipe {
                    type_name: shape.type_name,
                    member: member.name,
                    pipe,
                })?;
                field.pipe = Some(method);
                fields.push(field);
                continue;
            }

            let Some(ty) = member.ty else {
                return Err(unsupported(shape, member));
            };
            let (desc, optional) = match ty() {
                TypeDesc::Optional(inner) => (inner(), true),
                desc => (desc, false),
            };
            let (kind, children) = match desc {
                TypeDesc::Primitive(p) => (FieldKind::Scalar(p), None),
                TypeDesc::Bound(child) => (FieldKind::Nested, Some(self.resolve(child())?)),
                TypeDesc::Seq(element) => match element() {
                    TypeDesc::Primitive(p) => (FieldKind::List(p), None),
                    TypeDesc::Bound(child) => {
                        (FieldKind::ListWithNest, Some(self.resolve(child())?))
                    }
                    TypeDesc::Seq(_) | TypeDesc::Optional(_) => {
                        return Err(unsupported(shape, member));
                    }
                },
                TypeDesc::Optional(_) => return Err(unsupported(shape, member)),
            };
            field.kind = kind;
            field.optional = optional;
            field.children = children;
            fields.push(field);
        }
        Ok(fields)
    }
}

fn unsupported(shape: &TypeShape, member: &MemberShape) -> BindingError {
    BindingError::Unsupported {
        type_name: shape.type_name,
        member: member.name,
        declared: member.type_name,
    }
}
