//! Recursive-descent parser over the [`Lexer`].
//!
//! One token of lookahead. When a value turns out to be a container, the
//! lexer is rewound to the bracket so `parse_object`/`parse_array` can check
//! their own opening token.

use hexjson_value::{JsonArray, JsonNode, JsonObject, JsonValue};

use crate::lexer::{Lexer, Token, TokenKind};
use crate::tracing_macros::trace;
use crate::{DuplicateKeys, ParseError, ParseErrorKind, ParseOptions};

/// Parser state for one document.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    token: Token,
    options: ParseOptions,
    depth: usize,
}

impl<'a> Parser<'a> {
    /// Create a parser over `input`.
    pub fn new(input: &'a str, options: ParseOptions) -> Self {
        Parser {
            lexer: Lexer::new(input, options.exponent),
            token: Token::new(),
            options,
            depth: 0,
        }
    }

    /// Parses a whole document whose root is an object or an array.
    pub fn parse_document(mut self) -> Result<JsonNode, ParseError> {
        trace!(max_depth = self.options.max_depth, "parsing document");
        self.advance()?;
        let root = match self.token.kind {
            TokenKind::ObjectStart => {
                self.lexer.rewind(self.token.offset);
                JsonNode::Object(self.parse_object()?)
            }
            TokenKind::ArrayStart => {
                self.lexer.rewind(self.token.offset);
                JsonNode::Array(self.parse_array()?)
            }
            _ => return Err(self.unexpected("`{` or `[`")),
        };
        self.finish()?;
        Ok(root)
    }

    /// Parses a document whose root must be an object.
    pub fn parse_object_document(mut self) -> Result<JsonObject, ParseError> {
        let obj = self.parse_object()?;
        self.finish()?;
        Ok(obj)
    }

    /// Parses a document whose root must be an array.
    pub fn parse_array_document(mut self) -> Result<JsonArray, ParseError> {
        let arr = self.parse_array()?;
        self.finish()?;
        Ok(arr)
    }

    fn advance(&mut self) -> Result<(), ParseError> {
        self.lexer.next(&mut self.token)
    }

    fn finish(&mut self) -> Result<(), ParseError> {
        self.advance()?;
        if self.token.kind != TokenKind::Eof {
            return Err(ParseError::new(
                ParseErrorKind::TrailingCharacters,
                self.token.offset,
            ));
        }
        debug_assert!(self.lexer.done());
        Ok(())
    }

    /// Error for the current token not being `expected`.
    fn unexpected(&self, expected: &'static str) -> ParseError {
        let kind = match self.token.kind {
            TokenKind::Eof => ParseErrorKind::UnexpectedEof { expected },
            found => ParseErrorKind::UnexpectedToken {
                found: found.describe(),
                expected,
            },
        };
        ParseError::new(kind, self.token.offset)
    }

    fn expect(&mut self, kind: TokenKind) -> Result<(), ParseError> {
        self.advance()?;
        if self.token.kind == kind {
            Ok(())
        } else {
            Err(self.unexpected(kind.describe()))
        }
    }

    fn enter(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > self.options.max_depth {
            return Err(ParseError::new(
                ParseErrorKind::DepthLimitExceeded {
                    limit: self.options.max_depth,
                },
                self.token.offset,
            ));
        }
        Ok(())
    }

    fn parse_value(&mut self) -> Result<JsonNode, ParseError> {
        self.advance()?;
        let node = match self.token.kind {
            TokenKind::ObjectStart => {
                self.lexer.rewind(self.token.offset);
                JsonNode::Object(self.parse_object()?)
            }
            TokenKind::ArrayStart => {
                self.lexer.rewind(self.token.offset);
                JsonNode::Array(self.parse_array()?)
            }
            TokenKind::String => {
                JsonNode::Value(JsonValue::String(core::mem::take(&mut self.token.text)))
            }
            TokenKind::Number => JsonNode::Value(JsonValue::Number(self.token.number)),
            TokenKind::True => JsonNode::Value(JsonValue::Boolean(true)),
            TokenKind::False => JsonNode::Value(JsonValue::Boolean(false)),
            TokenKind::Null => JsonNode::NULL,
            _ => return Err(self.unexpected("value")),
        };
        Ok(node)
    }

    fn parse_object(&mut self) -> Result<JsonObject, ParseError> {
        self.expect(TokenKind::ObjectStart)?;
        self.enter()?;
        let mut obj = JsonObject::new();

        self.advance()?;
        if self.token.kind == TokenKind::ObjectEnd {
            self.depth -= 1;
            return Ok(obj);
        }

        loop {
            if self.token.kind != TokenKind::String {
                return Err(self.unexpected("string key"));
            }
            let key = core::mem::take(&mut self.token.text);
            let key_offset = self.token.offset;
            self.expect(TokenKind::Colon)?;
            let value = self.parse_value()?;

            match self.options.duplicate_keys {
                DuplicateKeys::Reject => {
                    if let Err((key, _)) = obj.try_insert(key, value) {
                        return Err(ParseError::new(
                            ParseErrorKind::DuplicateKey { key },
                            key_offset,
                        ));
                    }
                }
                DuplicateKeys::LastWins => {
                    obj.insert(key, value);
                }
            }

            self.advance()?;
            match self.token.kind {
                TokenKind::Comma => self.advance()?,
                TokenKind::ObjectEnd => break,
                _ => return Err(self.unexpected("`,` or `}`")),
            }
        }

        self.depth -= 1;
        Ok(obj)
    }

    fn parse_array(&mut self) -> Result<JsonArray, ParseError> {
        self.expect(TokenKind::ArrayStart)?;
        self.enter()?;
        let mut arr = JsonArray::new();

        self.advance()?;
        if self.token.kind == TokenKind::ArrayEnd {
            self.depth -= 1;
            return Ok(arr);
        }
        self.lexer.rewind(self.token.offset);

        loop {
            arr.push(self.parse_value()?);
            self.advance()?;
            match self.token.kind {
                TokenKind::Comma => {}
                TokenKind::ArrayEnd => break,
                _ => return Err(self.unexpected("`,` or `]`")),
            }
        }

        self.depth -= 1;
        Ok(arr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexjson_testhelpers::test;

    fn parse(input: &str) -> Result<JsonNode, ParseError> {
        Parser::new(input, ParseOptions::default()).parse_document()
    }

    #[test]
    fn nested_document() {
        let node = parse(r#"{"a": [1, {"b": null}], "c": "d"}"#).unwrap();
        let obj = node.as_object().unwrap();
        let a = obj.get_array("a").unwrap();
        assert_eq!(a.get_value(0), Some(&JsonValue::Number(1.0)));
        assert!(a.get_object(1).unwrap().get_value("b").unwrap().is_null());
        assert_eq!(obj.get_value("c").unwrap().as_str(), Ok("d"));
    }

    #[test]
    fn rewinding_keeps_string_tokens_intact() {
        let node = parse(r#"[["x"], {"k": "v"}, "y"]"#).unwrap();
        let arr = node.as_array().unwrap();
        assert_eq!(arr.get_array(0).unwrap().get_value(0).unwrap().as_str(), Ok("x"));
        assert_eq!(arr.get_object(1).unwrap().get_value("k").unwrap().as_str(), Ok("v"));
        assert_eq!(arr.get_value(2).unwrap().as_str(), Ok("y"));
    }

    #[test]
    fn structural_errors() {
        let err = parse(r#"{"a" 1}"#).unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::UnexpectedToken {
                found: "number",
                expected: "`:`"
            }
        );
        assert_eq!(err.offset, 5);

        let err = parse("{1: 2}").unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::UnexpectedToken {
                found: "number",
                expected: "string key"
            }
        );

        let err = parse("[1,]").unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::UnexpectedToken {
                found: "`]`",
                expected: "value"
            }
        );

        let err = parse("[1, 2").unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::UnexpectedEof {
                expected: "`,` or `]`"
            }
        );
    }

    #[test]
    fn depth_limit() {
        let options = ParseOptions::default().max_depth(3);
        assert!(Parser::new("[[[]]]", options.clone()).parse_document().is_ok());
        let err = Parser::new("[[[[]]]]", options).parse_document().unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::DepthLimitExceeded { limit: 3 });
        assert_eq!(err.offset, 3);
    }

    #[test]
    fn trailing_characters() {
        let err = parse("{} []").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::TrailingCharacters);
        assert_eq!(err.offset, 3);
        assert!(parse("{}  \n").is_ok());
    }

    #[test]
    fn root_must_be_a_container() {
        let err = parse("42").unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::UnexpectedToken {
                found: "number",
                expected: "`{` or `[`"
            }
        );
        let err = parse("   ").unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::UnexpectedEof {
                expected: "`{` or `[`"
            }
        );
    }

    #[test]
    fn typed_roots() {
        let err = Parser::new("[]", ParseOptions::default())
            .parse_object_document()
            .unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::UnexpectedToken {
                found: "`[`",
                expected: "`{`"
            }
        );
        let arr = Parser::new("[true]", ParseOptions::default())
            .parse_array_document()
            .unwrap();
        assert_eq!(arr.get_value(0), Some(&JsonValue::Boolean(true)));
    }
}
