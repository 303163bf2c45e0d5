//! Parser and formatter configuration.

/// How the lexer combines a mantissa with the digits after `e`/`E`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExponentMode {
    /// `mantissa.powf(exponent)`, the historical hexjson reading.
    ///
    /// `2e3` is `8`, not `2000`. The exponent run follows the same grammar
    /// as the mantissa (an optional `-`, digits, at most one `.`).
    #[default]
    Power,
    /// RFC 8259: `mantissa * 10^exponent`, with an optional `+` or `-` sign.
    Standard,
}

/// What the parser does when an object repeats a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicateKeys {
    /// Fail with [`ParseErrorKind::DuplicateKey`](crate::ParseErrorKind::DuplicateKey).
    #[default]
    Reject,
    /// Keep the last value; the key keeps its first position.
    LastWins,
}

/// Options for parsing JSON text.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Exponent semantics (default: [`ExponentMode::Power`])
    pub exponent: ExponentMode,
    /// Duplicate key policy (default: [`DuplicateKeys::Reject`])
    pub duplicate_keys: DuplicateKeys,
    /// Deepest allowed container nesting (default: 128)
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            exponent: ExponentMode::Power,
            duplicate_keys: DuplicateKeys::Reject,
            max_depth: 128,
        }
    }
}

impl ParseOptions {
    /// Create new default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read exponents the RFC 8259 way.
    pub fn standard_exponent(mut self) -> Self {
        self.exponent = ExponentMode::Standard;
        self
    }

    /// Set the exponent semantics.
    pub fn exponent(mut self, mode: ExponentMode) -> Self {
        self.exponent = mode;
        self
    }

    /// Set the duplicate key policy.
    pub fn duplicate_keys(mut self, policy: DuplicateKeys) -> Self {
        self.duplicate_keys = policy;
        self
    }

    /// Set the nesting limit. A document at exactly `depth` levels parses.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }
}

/// Options for formatting a value tree.
#[derive(Debug, Clone)]
pub struct FormatOptions {
    /// Write every non-ASCII character as `\uXXXX` (default: true)
    pub escape_non_ascii: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            escape_non_ascii: true,
        }
    }
}

impl FormatOptions {
    /// Create new default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pass non-ASCII characters through unchanged.
    pub fn preserve_non_ascii(mut self) -> Self {
        self.escape_non_ascii = false;
        self
    }

    /// Choose whether non-ASCII characters are escaped.
    pub fn escape_non_ascii(mut self, escape: bool) -> Self {
        self.escape_non_ascii = escape;
        self
    }
}
