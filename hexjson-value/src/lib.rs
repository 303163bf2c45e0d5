#![doc = include_str!("../README.md")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod value;
pub use value::*;

mod node;
pub use node::*;

mod array;
pub use array::*;

mod object;
pub use object::*;
