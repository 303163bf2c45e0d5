//! Binding JSON objects into described structs.
//!
//! The first request for a type resolves its [`TypeShape`] into
//! [`TypeDescriptors`] (recursing into nested bound types), then compiles
//! them into a [`Procedure`]. Both are cached in a [`Registry`] keyed by
//! `TypeId` and reused for every later conversion of that type.

mod error;
pub use error::*;

mod shape;
pub use shape::*;

mod descriptor;
pub use descriptor::*;

mod field_types;
pub use field_types::*;

mod resolve;

mod compile;
pub use compile::{FieldStore, LinkFn, Linker, Procedure, StoreOp};

mod registry;
pub use registry::{BindState, Registry};
