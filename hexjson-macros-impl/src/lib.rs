#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

use proc_macro2::TokenStream;

mod parsed;
pub use parsed::*;

mod process_struct;

/// Expand `#[derive(Describe)]`. Errors become `compile_error!` invocations.
pub fn derive_describe(input: TokenStream) -> TokenStream {
    match parse_struct(input) {
        Ok(parsed) => process_struct::process_struct(&parsed),
        Err(err) => err.to_compile_error(),
    }
}
