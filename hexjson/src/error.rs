//! Parse errors and the crate-wide error type.

use core::fmt::{self, Display};

use crate::bind::{BindingError, ConvertError};

/// Error produced while turning text into a value tree.
///
/// The parser stops at the first problem; there is no recovery.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    /// The specific kind of error
    pub kind: ParseErrorKind,
    /// Byte offset in the input where the error was detected
    pub offset: usize,
}

impl ParseError {
    /// Create a new error at `offset`.
    pub const fn new(kind: ParseErrorKind, offset: usize) -> Self {
        ParseError { kind, offset }
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at byte {}", self.kind, self.offset)
    }
}

impl std::error::Error for ParseError {}

/// Specific parse error kinds
#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorKind {
    /// Input ended inside a token or before a container was closed
    UnexpectedEof {
        /// What was expected before the end
        expected: &'static str,
    },
    /// A character that cannot start any token
    UnexpectedCharacter(char),
    /// A well-formed token where the grammar wants something else
    UnexpectedToken {
        /// Description of the token that was found
        found: &'static str,
        /// What was expected instead
        expected: &'static str,
    },
    /// A keyword that is not `null`, `true` or `false`
    InvalidLiteral {
        /// The keyword the first character announced
        expected: &'static str,
    },
    /// A number with no digits, two decimal points or an empty exponent
    MalformedNumber,
    /// A well-formed number whose value is not a finite double
    NumberOutOfRange,
    /// A backslash followed by a character that has no escape meaning
    InvalidEscape(char),
    /// A `\u` escape with bad hex digits or an unpaired surrogate
    InvalidUnicodeEscape,
    /// An object repeated a key under [`DuplicateKeys::Reject`](crate::DuplicateKeys::Reject)
    DuplicateKey {
        /// The repeated key
        key: String,
    },
    /// Containers nested deeper than [`ParseOptions::max_depth`](crate::ParseOptions::max_depth)
    DepthLimitExceeded {
        /// The configured limit
        limit: usize,
    },
    /// Something other than whitespace after the top-level container
    TrailingCharacters,
    /// Byte input that is not UTF-8
    InvalidUtf8,
}

impl Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseErrorKind::UnexpectedEof { expected } => {
                write!(f, "unexpected end of input, expected {expected}")
            }
            ParseErrorKind::UnexpectedCharacter(c) => write!(f, "unexpected character {c:?}"),
            ParseErrorKind::UnexpectedToken { found, expected } => {
                write!(f, "expected {expected}, found {found}")
            }
            ParseErrorKind::InvalidLiteral { expected } => {
                write!(f, "invalid literal, expected `{expected}`")
            }
            ParseErrorKind::MalformedNumber => write!(f, "malformed number"),
            ParseErrorKind::NumberOutOfRange => write!(f, "number is not a finite double"),
            ParseErrorKind::InvalidEscape(c) => write!(f, "invalid escape `\\{c}`"),
            ParseErrorKind::InvalidUnicodeEscape => write!(f, "invalid unicode escape"),
            ParseErrorKind::DuplicateKey { key } => write!(f, "duplicate key `{key}`"),
            ParseErrorKind::DepthLimitExceeded { limit } => {
                write!(f, "nesting deeper than {limit} levels")
            }
            ParseErrorKind::TrailingCharacters => {
                write!(f, "trailing characters after the document")
            }
            ParseErrorKind::InvalidUtf8 => write!(f, "invalid UTF-8"),
        }
    }
}

impl ParseErrorKind {
    /// Get an error code for this kind of error.
    pub const fn code(&self) -> &'static str {
        match self {
            ParseErrorKind::UnexpectedEof { .. } => "hexjson::unexpected_eof",
            ParseErrorKind::UnexpectedCharacter(_) => "hexjson::unexpected_character",
            ParseErrorKind::UnexpectedToken { .. } => "hexjson::unexpected_token",
            ParseErrorKind::InvalidLiteral { .. } => "hexjson::invalid_literal",
            ParseErrorKind::MalformedNumber => "hexjson::malformed_number",
            ParseErrorKind::NumberOutOfRange => "hexjson::number_out_of_range",
            ParseErrorKind::InvalidEscape(_) => "hexjson::invalid_escape",
            ParseErrorKind::InvalidUnicodeEscape => "hexjson::invalid_unicode_escape",
            ParseErrorKind::DuplicateKey { .. } => "hexjson::duplicate_key",
            ParseErrorKind::DepthLimitExceeded { .. } => "hexjson::depth_limit",
            ParseErrorKind::TrailingCharacters => "hexjson::trailing_characters",
            ParseErrorKind::InvalidUtf8 => "hexjson::invalid_utf8",
        }
    }
}

/// Any failure from the text-to-struct entry points.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// The text is not a JSON document this parser accepts
    Parse(ParseError),
    /// The target type cannot be bound
    Binding(BindingError),
    /// A field value did not convert into its declared type
    Convert(ConvertError),
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Parse(e) => write!(f, "parse error: {e}"),
            Error::Binding(e) => write!(f, "binding error: {e}"),
            Error::Convert(e) => write!(f, "conversion error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Parse(e) => Some(e),
            Error::Binding(e) => Some(e),
            Error::Convert(e) => Some(e),
        }
    }
}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Self {
        Error::Parse(err)
    }
}

impl From<BindingError> for Error {
    fn from(err: BindingError) -> Self {
        Error::Binding(err)
    }
}

impl From<ConvertError> for Error {
    fn from(err: ConvertError) -> Self {
        Error::Convert(err)
    }
}
