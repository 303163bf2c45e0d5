#![doc = include_str!("../README.md")]

/// Describe a struct for binding: emits `hexjson::bind::Describe` and
/// `hexjson::bind::FieldType` impls.
///
/// Type-level: `#[json(bind)]` opts in, `#[json(pipes(a, b))]` registers
/// conversion methods. Member-level: `#[json(key = "k")]`, optionally with
/// `setter = method` or `pipe = "a"`.
#[proc_macro_derive(Describe, attributes(json))]
pub fn describe(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    hexjson_macros_impl::derive_describe(input.into()).into()
}
