//! Pull-based tokenizer.
//!
//! The lexer hands out one token at a time into a caller-owned [`Token`],
//! which the parser reuses for the whole document so string tokens share a
//! single buffer.

use crate::{ExponentMode, ParseError, ParseErrorKind};

/// Token kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// `{`
    ObjectStart,
    /// `}`
    ObjectEnd,
    /// `[`
    ArrayStart,
    /// `]`
    ArrayEnd,
    /// `:`
    Colon,
    /// `,`
    Comma,
    /// A string literal; the decoded content is in [`Token::text`]
    String,
    /// A number literal; the value is in [`Token::number`]
    Number,
    /// `true`
    True,
    /// `false`
    False,
    /// `null`
    Null,
    /// End of input
    Eof,
}

impl TokenKind {
    /// How the token reads in an error message.
    pub const fn describe(self) -> &'static str {
        match self {
            TokenKind::ObjectStart => "`{`",
            TokenKind::ObjectEnd => "`}`",
            TokenKind::ArrayStart => "`[`",
            TokenKind::ArrayEnd => "`]`",
            TokenKind::Colon => "`:`",
            TokenKind::Comma => "`,`",
            TokenKind::String => "string",
            TokenKind::Number => "number",
            TokenKind::True => "`true`",
            TokenKind::False => "`false`",
            TokenKind::Null => "`null`",
            TokenKind::Eof => "end of input",
        }
    }
}

/// The token most recently produced by [`Lexer::next`].
#[derive(Debug, Clone)]
pub struct Token {
    /// What was scanned
    pub kind: TokenKind,
    /// Value of a number token
    pub number: f64,
    /// Decoded content of a string token
    pub text: String,
    /// Byte offset of the first character of the token
    pub offset: usize,
}

impl Default for Token {
    fn default() -> Self {
        Token {
            kind: TokenKind::Eof,
            number: 0.0,
            text: String::new(),
            offset: 0,
        }
    }
}

impl Token {
    /// Create an empty token to pass to [`Lexer::next`].
    pub fn new() -> Self {
        Self::default()
    }
}

/// Cursor over a complete JSON document.
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    exponent: ExponentMode,
}

impl<'a> Lexer<'a> {
    /// Create a lexer positioned at the start of `input`.
    pub const fn new(input: &'a str, exponent: ExponentMode) -> Self {
        Lexer {
            input,
            pos: 0,
            exponent,
        }
    }

    /// Moves the cursor back to `offset`, which must be the start of a
    /// token this lexer already produced.
    pub fn rewind(&mut self, offset: usize) {
        debug_assert!(offset <= self.pos);
        self.pos = offset;
    }

    /// Returns `true` once the cursor has reached the end of the input.
    pub const fn done(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Skips whitespace and scans the next token into `token`.
    ///
    /// At the end of the input the token kind becomes [`TokenKind::Eof`].
    pub fn next(&mut self, token: &mut Token) -> Result<(), ParseError> {
        self.skip_whitespace();

        let start = self.pos;
        token.offset = start;
        let bytes = self.input.as_bytes();
        let Some(&byte) = bytes.get(start) else {
            token.kind = TokenKind::Eof;
            return Ok(());
        };

        let single = match byte {
            b'{' => Some(TokenKind::ObjectStart),
            b'}' => Some(TokenKind::ObjectEnd),
            b'[' => Some(TokenKind::ArrayStart),
            b']' => Some(TokenKind::ArrayEnd),
            b':' => Some(TokenKind::Colon),
            b',' => Some(TokenKind::Comma),
            _ => None,
        };
        if let Some(kind) = single {
            self.pos += 1;
            token.kind = kind;
            return Ok(());
        }

        match byte {
            b'"' => self.scan_string(token),
            b'-' | b'0'..=b'9' => self.scan_number(token),
            b't' => self.scan_literal(token, "true", TokenKind::True),
            b'f' => self.scan_literal(token, "false", TokenKind::False),
            b'n' => self.scan_literal(token, "null", TokenKind::Null),
            _ => {
                let c = self.input[start..].chars().next().unwrap_or('\0');
                Err(ParseError::new(
                    ParseErrorKind::UnexpectedCharacter(c),
                    start,
                ))
            }
        }
    }

    fn skip_whitespace(&mut self) {
        let bytes = self.input.as_bytes();
        while let Some(&b) = bytes.get(self.pos) {
            match b {
                b' ' | b'\t' | b'\n' | b'\r' => self.pos += 1,
                _ => break,
            }
        }
    }

    fn scan_literal(
        &mut self,
        token: &mut Token,
        word: &'static str,
        kind: TokenKind,
    ) -> Result<(), ParseError> {
        let rest = &self.input[self.pos..];
        if rest.starts_with(word) {
            self.pos += word.len();
            token.kind = kind;
            Ok(())
        } else if word.starts_with(rest) {
            Err(ParseError::new(
                ParseErrorKind::UnexpectedEof { expected: word },
                self.input.len(),
            ))
        } else {
            Err(ParseError::new(
                ParseErrorKind::InvalidLiteral { expected: word },
                self.pos,
            ))
        }
    }

    /// Scans a run of an optional `-`, digits and at most one `.`, returning
    /// its end offset.
    fn sniff_decimal(&self, from: usize) -> Result<usize, ParseError> {
        let bytes = self.input.as_bytes();
        let mut end = from;
        if bytes.get(end) == Some(&b'-') {
            end += 1;
        }
        let mut digits = 0;
        let mut dots = 0;
        while let Some(&b) = bytes.get(end) {
            match b {
                b'0'..=b'9' => digits += 1,
                b'.' => {
                    dots += 1;
                    if dots > 1 {
                        return Err(ParseError::new(ParseErrorKind::MalformedNumber, end));
                    }
                }
                _ => break,
            }
            end += 1;
        }
        if digits == 0 {
            return Err(if end >= bytes.len() {
                ParseError::new(
                    ParseErrorKind::UnexpectedEof { expected: "digits" },
                    end,
                )
            } else {
                ParseError::new(ParseErrorKind::MalformedNumber, from)
            });
        }
        Ok(end)
    }

    fn scan_number(&mut self, token: &mut Token) -> Result<(), ParseError> {
        let start = self.pos;
        let mantissa_end = self.sniff_decimal(start)?;
        let bytes = self.input.as_bytes();

        let value = match bytes.get(mantissa_end) {
            Some(b'e' | b'E') => {
                let exp_start = mantissa_end + 1;
                match self.exponent {
                    ExponentMode::Power => {
                        let exp_end = self.sniff_decimal(exp_start)?;
                        let base = self.decimal(start, mantissa_end)?;
                        let exp = self.decimal(exp_start, exp_end)?;
                        self.pos = exp_end;
                        base.powf(exp)
                    }
                    ExponentMode::Standard => {
                        let mut digits_start = exp_start;
                        if matches!(bytes.get(digits_start), Some(b'+' | b'-')) {
                            digits_start += 1;
                        }
                        let mut exp_end = digits_start;
                        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
                            exp_end += 1;
                        }
                        if exp_end == digits_start {
                            let kind = if exp_end >= bytes.len() {
                                ParseErrorKind::UnexpectedEof { expected: "digits" }
                            } else {
                                ParseErrorKind::MalformedNumber
                            };
                            return Err(ParseError::new(kind, exp_end));
                        }
                        self.pos = exp_end;
                        self.decimal(start, exp_end)?
                    }
                }
            }
            _ => {
                self.pos = mantissa_end;
                self.decimal(start, mantissa_end)?
            }
        };

        // overflow and negative bases under a fractional power
        if !value.is_finite() {
            return Err(ParseError::new(ParseErrorKind::NumberOutOfRange, start));
        }

        token.kind = TokenKind::Number;
        token.number = value;
        Ok(())
    }

    fn decimal(&self, start: usize, end: usize) -> Result<f64, ParseError> {
        self.input[start..end]
            .parse::<f64>()
            .map_err(|_| ParseError::new(ParseErrorKind::MalformedNumber, start))
    }

    fn scan_string(&mut self, token: &mut Token) -> Result<(), ParseError> {
        let bytes = self.input.as_bytes();
        token.text.clear();
        // opening quote
        self.pos += 1;
        let mut chunk_start = self.pos;

        loop {
            let Some(&b) = bytes.get(self.pos) else {
                return Err(ParseError::new(
                    ParseErrorKind::UnexpectedEof {
                        expected: "closing quote",
                    },
                    self.pos,
                ));
            };
            match b {
                b'"' => {
                    token.text.push_str(&self.input[chunk_start..self.pos]);
                    self.pos += 1;
                    token.kind = TokenKind::String;
                    return Ok(());
                }
                b'\\' => {
                    token.text.push_str(&self.input[chunk_start..self.pos]);
                    self.scan_escape(&mut token.text)?;
                    chunk_start = self.pos;
                }
                _ => self.pos += 1,
            }
        }
    }

    /// Decodes the escape at the cursor (which points at the backslash).
    fn scan_escape(&mut self, out: &mut String) -> Result<(), ParseError> {
        let at = self.pos;
        let Some(&b) = self.input.as_bytes().get(at + 1) else {
            return Err(ParseError::new(
                ParseErrorKind::UnexpectedEof {
                    expected: "escape character",
                },
                at + 1,
            ));
        };
        let decoded = match b {
            b'n' => '\n',
            b'b' => '\x08',
            b'r' => '\r',
            b't' => '\t',
            b'f' => '\x0c',
            b'"' => '"',
            b'\\' => '\\',
            b'/' => '/',
            b'u' => {
                self.pos = at + 2;
                let c = self.scan_unicode_escape(at)?;
                out.push(c);
                return Ok(());
            }
            _ => {
                let c = self.input[at + 1..].chars().next().unwrap_or('\0');
                return Err(ParseError::new(ParseErrorKind::InvalidEscape(c), at));
            }
        };
        out.push(decoded);
        self.pos = at + 2;
        Ok(())
    }

    /// Reads the four hex digits after `\u` (and a trailing low surrogate
    /// escape when the first unit is a high surrogate).
    fn scan_unicode_escape(&mut self, escape_start: usize) -> Result<char, ParseError> {
        let high = self.hex4()?;
        let code_point = match high {
            0xD800..=0xDBFF => {
                let rest = &self.input.as_bytes()[self.pos..];
                if rest.len() < 2 {
                    return Err(ParseError::new(
                        ParseErrorKind::UnexpectedEof {
                            expected: "low surrogate",
                        },
                        self.input.len(),
                    ));
                }
                if &rest[..2] != b"\\u" {
                    return Err(ParseError::new(
                        ParseErrorKind::InvalidUnicodeEscape,
                        escape_start,
                    ));
                }
                self.pos += 2;
                let low = self.hex4()?;
                if !(0xDC00..=0xDFFF).contains(&low) {
                    return Err(ParseError::new(
                        ParseErrorKind::InvalidUnicodeEscape,
                        escape_start,
                    ));
                }
                0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00)
            }
            0xDC00..=0xDFFF => {
                return Err(ParseError::new(
                    ParseErrorKind::InvalidUnicodeEscape,
                    escape_start,
                ));
            }
            _ => high,
        };
        char::from_u32(code_point)
            .ok_or_else(|| ParseError::new(ParseErrorKind::InvalidUnicodeEscape, escape_start))
    }

    fn hex4(&mut self) -> Result<u32, ParseError> {
        let bytes = self.input.as_bytes();
        let Some(digits) = bytes.get(self.pos..self.pos + 4) else {
            return Err(ParseError::new(
                ParseErrorKind::UnexpectedEof {
                    expected: "four hex digits",
                },
                self.input.len(),
            ));
        };
        let mut value = 0u32;
        for &d in digits {
            let nibble = char::from(d).to_digit(16).ok_or_else(|| {
                ParseError::new(ParseErrorKind::InvalidUnicodeEscape, self.pos)
            })?;
            value = value * 16 + nibble;
        }
        self.pos += 4;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexjson_testhelpers::test;

    fn kinds(input: &str) -> Vec<TokenKind> {
        let mut lexer = Lexer::new(input, ExponentMode::Power);
        let mut token = Token::new();
        let mut out = Vec::new();
        loop {
            lexer.next(&mut token).unwrap();
            out.push(token.kind);
            if token.kind == TokenKind::Eof {
                return out;
            }
        }
    }

    fn number(input: &str, mode: ExponentMode) -> Result<f64, ParseError> {
        let mut lexer = Lexer::new(input, mode);
        let mut token = Token::new();
        lexer.next(&mut token)?;
        assert_eq!(token.kind, TokenKind::Number);
        Ok(token.number)
    }

    fn string(input: &str) -> Result<String, ParseError> {
        let mut lexer = Lexer::new(input, ExponentMode::Power);
        let mut token = Token::new();
        lexer.next(&mut token)?;
        assert_eq!(token.kind, TokenKind::String);
        Ok(token.text)
    }

    #[test]
    fn structural_tokens_and_keywords() {
        assert_eq!(
            kinds(" { } [ ] , : true false null "),
            [
                TokenKind::ObjectStart,
                TokenKind::ObjectEnd,
                TokenKind::ArrayStart,
                TokenKind::ArrayEnd,
                TokenKind::Comma,
                TokenKind::Colon,
                TokenKind::True,
                TokenKind::False,
                TokenKind::Null,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn done_tracks_the_cursor() {
        let mut lexer = Lexer::new("[]", ExponentMode::Power);
        let mut token = Token::new();
        assert!(!lexer.done());
        lexer.next(&mut token).unwrap();
        lexer.next(&mut token).unwrap();
        assert!(lexer.done());
    }

    #[test]
    fn plain_numbers() {
        assert_eq!(number("42", ExponentMode::Power), Ok(42.0));
        assert_eq!(number("-0.5,", ExponentMode::Power), Ok(-0.5));
        assert_eq!(number("3.0]", ExponentMode::Power), Ok(3.0));
    }

    #[test]
    fn power_exponent_raises_the_mantissa() {
        assert_eq!(number("2e3", ExponentMode::Power), Ok(8.0));
        assert_eq!(number("2E-1", ExponentMode::Power), Ok(0.5));
        assert_eq!(number("1.5e2", ExponentMode::Power), Ok(2.25));
    }

    #[test]
    fn standard_exponent_scales_by_ten() {
        assert_eq!(number("2e3", ExponentMode::Standard), Ok(2000.0));
        assert_eq!(number("2E+1", ExponentMode::Standard), Ok(20.0));
        assert_eq!(number("25e-1", ExponentMode::Standard), Ok(2.5));
    }

    #[test]
    fn malformed_numbers() {
        let err = number("1.2.3", ExponentMode::Power).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::MalformedNumber);
        assert_eq!(err.offset, 3);

        let err = number("-,", ExponentMode::Power).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::MalformedNumber);

        let err = number("1e,", ExponentMode::Standard).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::MalformedNumber);

        let err = number("1e", ExponentMode::Power).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnexpectedEof { expected: "digits" });
    }

    #[test]
    fn non_finite_numbers() {
        for (input, mode) in [
            ("10e400", ExponentMode::Power),
            ("-2e0.5", ExponentMode::Power),
            ("1e999", ExponentMode::Standard),
            ("-1e999", ExponentMode::Standard),
        ] {
            let err = number(input, mode).unwrap_err();
            assert_eq!(err.kind, ParseErrorKind::NumberOutOfRange, "{input}");
            assert_eq!(err.offset, 0);
        }
        assert_eq!(number("1e308", ExponentMode::Standard), Ok(1e308));
    }

    #[test]
    fn string_escapes() {
        assert_eq!(string(r#""a\nb\t\"\\\/""#).unwrap(), "a\nb\t\"\\/");
        assert_eq!(string(r#""\b\f\r""#).unwrap(), "\x08\x0c\r");
        assert_eq!(string(r#""éé""#).unwrap(), "éé");
        assert_eq!(string(r#""😀""#).unwrap(), "😀");
        assert_eq!(string("\"raw é\"").unwrap(), "raw é");
    }

    #[test]
    fn string_errors() {
        let err = string(r#""\q""#).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidEscape('q'));
        assert_eq!(err.offset, 1);

        let err = string(r#""\ud83d!""#).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidUnicodeEscape);

        let err = string(r#""\ude00""#).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidUnicodeEscape);

        let err = string(r#""\u12g4""#).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidUnicodeEscape);

        let err = string(r#""abc"#).unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::UnexpectedEof {
                expected: "closing quote"
            }
        );
    }

    #[test]
    fn truncated_and_unknown_input() {
        let mut token = Token::new();

        let err = Lexer::new("tru", ExponentMode::Power)
            .next(&mut token)
            .unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnexpectedEof { expected: "true" });

        let err = Lexer::new("nope", ExponentMode::Power)
            .next(&mut token)
            .unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidLiteral { expected: "null" });

        let err = Lexer::new("  @", ExponentMode::Power)
            .next(&mut token)
            .unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnexpectedCharacter('@'));
        assert_eq!(err.offset, 2);
    }

    #[test]
    fn token_buffer_is_reused() {
        let mut lexer = Lexer::new(r#""first" "2nd""#, ExponentMode::Power);
        let mut token = Token::new();
        lexer.next(&mut token).unwrap();
        assert_eq!(token.text, "first");
        lexer.next(&mut token).unwrap();
        assert_eq!(token.text, "2nd");
        assert_eq!(token.offset, 8);
    }
}
