#![doc = include_str!("../README.md")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

extern crate self as hexjson;

mod tracing_macros;

mod error;
pub use error::*;

mod options;
pub use options::*;

pub mod lexer;
pub mod parser;

pub mod format;
pub use format::{Formatter, ToJson, to_string, to_string_with_options};

pub mod bind;
pub use bind::{
    BindState, BindingError, ConvertError, ConvertErrorKind, Describe, PathSegment, Procedure,
    Registry,
};

pub use hexjson_macros::Describe;
pub use hexjson_value::{JsonArray, JsonNode, JsonObject, JsonValue, ShapeMismatch, ValueType};

use parser::Parser;

/// Parse a document whose root is an object or an array.
pub fn parse(text: &str) -> Result<JsonNode, ParseError> {
    parse_with_options(text, &ParseOptions::default())
}

/// Parse a document with explicit options.
pub fn parse_with_options(text: &str, options: &ParseOptions) -> Result<JsonNode, ParseError> {
    Parser::new(text, options.clone()).parse_document()
}

/// Parse UTF-8 bytes.
pub fn parse_slice(bytes: &[u8]) -> Result<JsonNode, ParseError> {
    parse(utf8(bytes)?)
}

/// Parse a document whose root must be an object.
pub fn parse_object(text: &str) -> Result<JsonObject, ParseError> {
    Parser::new(text, ParseOptions::default()).parse_object_document()
}

/// Parse a document whose root must be an array.
pub fn parse_array(text: &str) -> Result<JsonArray, ParseError> {
    Parser::new(text, ParseOptions::default()).parse_array_document()
}

fn utf8(bytes: &[u8]) -> Result<&str, ParseError> {
    core::str::from_utf8(bytes)
        .map_err(|e| ParseError::new(ParseErrorKind::InvalidUtf8, e.valid_up_to()))
}

/// Parse `text` as an object and bind it into a `T` using the global
/// registry.
pub fn from_str<T: Describe>(text: &str) -> Result<T, Error> {
    from_str_with_options(text, &ParseOptions::default())
}

/// [`from_str`] with explicit parse options.
pub fn from_str_with_options<T: Describe>(text: &str, options: &ParseOptions) -> Result<T, Error> {
    let obj = Parser::new(text, options.clone()).parse_object_document()?;
    from_object(&obj)
}

/// [`from_str`] over UTF-8 bytes.
pub fn from_slice<T: Describe>(bytes: &[u8]) -> Result<T, Error> {
    from_str(utf8(bytes)?)
}

/// Parse `text` as an array of objects and bind each into a `T`.
pub fn from_str_array<T: Describe>(text: &str) -> Result<Vec<T>, Error> {
    from_str_array_with_options(text, &ParseOptions::default())
}

/// [`from_str_array`] with explicit parse options.
pub fn from_str_array_with_options<T: Describe>(
    text: &str,
    options: &ParseOptions,
) -> Result<Vec<T>, Error> {
    let arr = Parser::new(text, options.clone()).parse_array_document()?;
    from_array(&arr)
}

/// Bind an already parsed object into a `T` using the global registry.
pub fn from_object<T: Describe>(obj: &JsonObject) -> Result<T, Error> {
    Registry::global().deserialize(obj)
}

/// Bind every object of an already parsed array into a `T`.
pub fn from_array<T: Describe>(arr: &JsonArray) -> Result<Vec<T>, Error> {
    Registry::global().deserialize_array(arr)
}
