//! Forward-only token reader

use crate::error::{Error, Result};
use crate::limits::Limits;
use crate::token::TokenKind;

/// Forward-only cursor over structural JSON tokens
///
/// Readers never rewind. Every consuming method checks the kind of the next token
/// and fails with [`Error::MalformedInput`] when it does not match, leaving the
/// reader position undefined for recovery purposes.
pub trait TokenReader {
    /// Kind of the next token without consuming it
    fn peek(&mut self) -> Result<TokenKind>;
    /// Consume `{`
    fn begin_object(&mut self) -> Result<()>;
    /// Consume `}`
    fn end_object(&mut self) -> Result<()>;
    /// Consume `[`
    fn begin_array(&mut self) -> Result<()>;
    /// Consume `]`
    fn end_array(&mut self) -> Result<()>;
    /// Consume an object member name and its `:` separator
    fn next_name(&mut self) -> Result<String>;
    /// Consume a string scalar
    fn next_string(&mut self) -> Result<String>;
    /// Consume a number scalar that fits in an `i64`
    fn next_i64(&mut self) -> Result<i64>;
    /// Consume a number scalar as `f64`
    fn next_f64(&mut self) -> Result<f64>;
    /// Consume `true` or `false`
    fn next_bool(&mut self) -> Result<bool>;
    /// Consume `null`
    fn next_null(&mut self) -> Result<()>;
    /// Consume the next complete value, whatever its shape
    fn skip_value(&mut self) -> Result<()>;
    /// Current nesting depth (0 at top level)
    fn depth(&self) -> usize;
    /// Byte offset of the cursor
    fn offset(&self) -> usize;
}

#[derive(Debug, Clone, Copy)]
enum Scope {
    Document { done: bool },
    Object { first: bool, awaiting_value: bool },
    Array { first: bool },
}

/// JSON tokenizer over an in-memory UTF-8 document
pub struct JsonReader<'a> {
    text: &'a str,
    input: &'a [u8],
    pos: usize,
    stack: Vec<Scope>,
    peeked: Option<TokenKind>,
    limits: Limits,
}

impl<'a> JsonReader<'a> {
    /// Create a reader with default limits
    pub fn new(text: &'a str) -> Self {
        Self::with_limits(text, Limits::default())
    }

    /// Create a reader with explicit limits
    pub fn with_limits(text: &'a str, limits: Limits) -> Self {
        Self {
            text,
            input: text.as_bytes(),
            pos: 0,
            stack: vec![Scope::Document { done: false }],
            peeked: None,
            limits,
        }
    }

    /// Verify that nothing but whitespace follows the top-level value
    pub fn end_document(&mut self) -> Result<()> {
        self.expect_kind(TokenKind::EndDocument, "end of document")
    }

    fn syntax(&self, reason: impl Into<String>) -> Error {
        Error::Syntax {
            reason: reason.into(),
            offset: self.pos,
        }
    }

    fn byte(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while let Some(b' ' | b'\t' | b'\n' | b'\r') = self.byte() {
            self.pos += 1;
        }
    }

    fn set_top(&mut self, scope: Scope) {
        if let Some(top) = self.stack.last_mut() {
            *top = scope;
        }
    }

    fn expect_byte(&mut self, expected: u8, what: &str) -> Result<()> {
        if self.byte() == Some(expected) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.syntax(format!("expected {what}")))
        }
    }

    fn compute_peek(&mut self) -> Result<TokenKind> {
        self.skip_whitespace();
        let top = self
            .stack
            .last()
            .copied()
            .ok_or_else(|| self.syntax("reader has no open scope"))?;

        match top {
            Scope::Document { done: true } => {
                if self.pos == self.input.len() {
                    Ok(TokenKind::EndDocument)
                } else {
                    Err(self.syntax("trailing characters after top-level value"))
                }
            }
            Scope::Document { done: false } => self.value_kind(),
            Scope::Array { first } => {
                if self.byte() == Some(b']') {
                    return Ok(TokenKind::EndArray);
                }
                if !first {
                    self.expect_byte(b',', "',' or ']'")?;
                    self.skip_whitespace();
                }
                self.set_top(Scope::Array { first: false });
                self.value_kind()
            }
            Scope::Object {
                first,
                awaiting_value: false,
            } => {
                if self.byte() == Some(b'}') {
                    return Ok(TokenKind::EndObject);
                }
                if !first {
                    self.expect_byte(b',', "',' or '}'")?;
                    self.skip_whitespace();
                }
                self.set_top(Scope::Object {
                    first: false,
                    awaiting_value: false,
                });
                match self.byte() {
                    Some(b'"') => Ok(TokenKind::Name),
                    _ => Err(self.syntax("expected member name")),
                }
            }
            Scope::Object {
                awaiting_value: true,
                ..
            } => self.value_kind(),
        }
    }

    fn value_kind(&self) -> Result<TokenKind> {
        match self.byte() {
            Some(b'{') => Ok(TokenKind::BeginObject),
            Some(b'[') => Ok(TokenKind::BeginArray),
            Some(b'"') => Ok(TokenKind::String),
            Some(b't' | b'f') => Ok(TokenKind::Bool),
            Some(b'n') => Ok(TokenKind::Null),
            Some(b'-' | b'0'..=b'9') => Ok(TokenKind::Number),
            Some(other) => Err(self.syntax(format!("unexpected character '{}'", other as char))),
            None => Err(self.syntax("unexpected end of input")),
        }
    }

    fn expect_kind(&mut self, expected: TokenKind, what: &'static str) -> Result<()> {
        let found = self.peek()?;
        if found != expected {
            return Err(Error::MalformedInput {
                expected: what,
                found,
                offset: self.pos,
            });
        }
        self.peeked = None;
        Ok(())
    }

    fn mark_value_consumed(&mut self) {
        match self.stack.last_mut() {
            Some(Scope::Object { awaiting_value, .. }) => *awaiting_value = false,
            Some(Scope::Document { done }) => *done = true,
            _ => {}
        }
    }

    fn push_scope(&mut self, scope: Scope) -> Result<()> {
        if self.depth() >= self.limits.max_depth {
            return Err(Error::LimitExceeded(format!(
                "nesting depth exceeds limit {} at byte {}",
                self.limits.max_depth, self.pos
            )));
        }
        self.stack.push(scope);
        Ok(())
    }

    fn read_string(&mut self) -> Result<String> {
        self.expect_byte(b'"', "'\"'")?;
        let start = self.pos;
        let mut escaped = false;
        loop {
            match self.byte() {
                None => return Err(self.syntax("unterminated string")),
                Some(b'"') => break,
                Some(b'\\') => {
                    escaped = true;
                    self.pos += 2;
                }
                Some(b) if b < 0x20 => return Err(self.syntax("control character in string")),
                Some(_) => self.pos += 1,
            }
        }
        let end = self.pos;
        self.pos += 1;

        if end - start > self.limits.max_string_len {
            return Err(Error::LimitExceeded(format!(
                "string of {} bytes exceeds limit {}",
                end - start,
                self.limits.max_string_len
            )));
        }

        if escaped {
            // Quotes included so serde_json handles the escape grammar.
            Ok(serde_json::from_str::<String>(&self.text[start - 1..end + 1])?)
        } else {
            Ok(self.text[start..end].to_string())
        }
    }

    fn read_number(&mut self) -> Result<&'a str> {
        let start = self.pos;
        if self.byte() == Some(b'-') {
            self.pos += 1;
        }
        match self.byte() {
            Some(b'0') => self.pos += 1,
            Some(b'1'..=b'9') => self.skip_digits(),
            _ => return Err(self.syntax("invalid number")),
        }
        if self.byte() == Some(b'.') {
            self.pos += 1;
            if !matches!(self.byte(), Some(b'0'..=b'9')) {
                return Err(self.syntax("expected digit after decimal point"));
            }
            self.skip_digits();
        }
        if let Some(b'e' | b'E') = self.byte() {
            self.pos += 1;
            if let Some(b'+' | b'-') = self.byte() {
                self.pos += 1;
            }
            if !matches!(self.byte(), Some(b'0'..=b'9')) {
                return Err(self.syntax("expected digit in exponent"));
            }
            self.skip_digits();
        }
        let text = self.text;
        Ok(&text[start..self.pos])
    }

    fn skip_digits(&mut self) {
        while let Some(b'0'..=b'9') = self.byte() {
            self.pos += 1;
        }
    }

    fn read_literal(&mut self, literal: &str) -> Result<()> {
        if self.input[self.pos..].starts_with(literal.as_bytes()) {
            self.pos += literal.len();
            Ok(())
        } else {
            Err(self.syntax(format!("expected '{literal}'")))
        }
    }
}

impl TokenReader for JsonReader<'_> {
    fn peek(&mut self) -> Result<TokenKind> {
        if let Some(kind) = self.peeked {
            return Ok(kind);
        }
        let kind = self.compute_peek()?;
        self.peeked = Some(kind);
        Ok(kind)
    }

    fn begin_object(&mut self) -> Result<()> {
        self.expect_kind(TokenKind::BeginObject, "begin object")?;
        self.mark_value_consumed();
        self.pos += 1;
        self.push_scope(Scope::Object {
            first: true,
            awaiting_value: false,
        })
    }

    fn end_object(&mut self) -> Result<()> {
        self.expect_kind(TokenKind::EndObject, "end object")?;
        self.pos += 1;
        self.stack.pop();
        Ok(())
    }

    fn begin_array(&mut self) -> Result<()> {
        self.expect_kind(TokenKind::BeginArray, "begin array")?;
        self.mark_value_consumed();
        self.pos += 1;
        self.push_scope(Scope::Array { first: true })
    }

    fn end_array(&mut self) -> Result<()> {
        self.expect_kind(TokenKind::EndArray, "end array")?;
        self.pos += 1;
        self.stack.pop();
        Ok(())
    }

    fn next_name(&mut self) -> Result<String> {
        self.expect_kind(TokenKind::Name, "member name")?;
        let name = self.read_string()?;
        self.skip_whitespace();
        self.expect_byte(b':', "':' after member name")?;
        self.set_top(Scope::Object {
            first: false,
            awaiting_value: true,
        });
        Ok(name)
    }

    fn next_string(&mut self) -> Result<String> {
        self.expect_kind(TokenKind::String, "string")?;
        self.mark_value_consumed();
        self.read_string()
    }

    fn next_i64(&mut self) -> Result<i64> {
        self.expect_kind(TokenKind::Number, "number")?;
        self.mark_value_consumed();
        let text = self.read_number()?;
        text.parse::<i64>().map_err(|_| Error::InvalidValue {
            expected: "integer",
            found: text.to_string(),
        })
    }

    fn next_f64(&mut self) -> Result<f64> {
        self.expect_kind(TokenKind::Number, "number")?;
        self.mark_value_consumed();
        let text = self.read_number()?;
        text.parse::<f64>().map_err(|_| Error::InvalidValue {
            expected: "float",
            found: text.to_string(),
        })
    }

    fn next_bool(&mut self) -> Result<bool> {
        self.expect_kind(TokenKind::Bool, "boolean")?;
        self.mark_value_consumed();
        if self.byte() == Some(b't') {
            self.read_literal("true")?;
            Ok(true)
        } else {
            self.read_literal("false")?;
            Ok(false)
        }
    }

    fn next_null(&mut self) -> Result<()> {
        self.expect_kind(TokenKind::Null, "null")?;
        self.mark_value_consumed();
        self.read_literal("null")
    }

    fn skip_value(&mut self) -> Result<()> {
        match self.peek()? {
            TokenKind::BeginObject => {
                self.begin_object()?;
                while self.peek()? != TokenKind::EndObject {
                    self.next_name()?;
                    self.skip_value()?;
                }
                self.end_object()
            }
            TokenKind::BeginArray => {
                self.begin_array()?;
                while self.peek()? != TokenKind::EndArray {
                    self.skip_value()?;
                }
                self.end_array()
            }
            TokenKind::String => self.next_string().map(drop),
            TokenKind::Number => {
                self.expect_kind(TokenKind::Number, "number")?;
                self.mark_value_consumed();
                self.read_number().map(drop)
            }
            TokenKind::Bool => self.next_bool().map(drop),
            TokenKind::Null => self.next_null(),
            found => Err(Error::MalformedInput {
                expected: "value",
                found,
                offset: self.pos,
            }),
        }
    }

    fn depth(&self) -> usize {
        self.stack.len().saturating_sub(1)
    }

    fn offset(&self) -> usize {
        self.pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_nested_structure() {
        let mut reader = JsonReader::new(r#" {"a": [1, -2.5, true], "b": null, "c": "x"} "#);
        reader.begin_object().unwrap();
        assert_eq!(reader.next_name().unwrap(), "a");
        reader.begin_array().unwrap();
        assert_eq!(reader.depth(), 2);
        assert_eq!(reader.next_i64().unwrap(), 1);
        assert_eq!(reader.next_f64().unwrap(), -2.5);
        assert!(reader.next_bool().unwrap());
        assert_eq!(reader.peek().unwrap(), TokenKind::EndArray);
        reader.end_array().unwrap();
        assert_eq!(reader.next_name().unwrap(), "b");
        reader.next_null().unwrap();
        assert_eq!(reader.next_name().unwrap(), "c");
        assert_eq!(reader.next_string().unwrap(), "x");
        reader.end_object().unwrap();
        reader.end_document().unwrap();
    }

    #[test]
    fn test_peek_is_idempotent() {
        let mut reader = JsonReader::new("[1,2]");
        reader.begin_array().unwrap();
        assert_eq!(reader.peek().unwrap(), TokenKind::Number);
        assert_eq!(reader.peek().unwrap(), TokenKind::Number);
        assert_eq!(reader.next_i64().unwrap(), 1);
        assert_eq!(reader.peek().unwrap(), TokenKind::Number);
        assert_eq!(reader.next_i64().unwrap(), 2);
        reader.end_array().unwrap();
    }

    #[test]
    fn test_escaped_strings() {
        let mut reader = JsonReader::new(r#"{"k\"ey": "line\nbreak é"}"#);
        reader.begin_object().unwrap();
        assert_eq!(reader.next_name().unwrap(), "k\"ey");
        assert_eq!(reader.next_string().unwrap(), "line\nbreak é");
        reader.end_object().unwrap();
    }

    #[test]
    fn test_shape_mismatch_is_malformed_input() {
        let mut reader = JsonReader::new(r#"{"a": 1}"#);
        reader.begin_object().unwrap();
        reader.next_name().unwrap();
        match reader.begin_array() {
            Err(Error::MalformedInput {
                expected, found, ..
            }) => {
                assert_eq!(expected, "begin array");
                assert_eq!(found, TokenKind::Number);
            }
            other => panic!("expected malformed input, got {other:?}"),
        }
    }

    #[test]
    fn test_trailing_content_rejected() {
        let mut reader = JsonReader::new("1 2");
        assert_eq!(reader.next_i64().unwrap(), 1);
        assert!(matches!(reader.end_document(), Err(Error::Syntax { .. })));
    }

    #[test]
    fn test_trailing_comma_rejected() {
        let mut reader = JsonReader::new("[1,]");
        reader.begin_array().unwrap();
        reader.next_i64().unwrap();
        assert!(matches!(reader.peek(), Err(Error::Syntax { .. })));
    }

    #[test]
    fn test_non_integer_rejected_by_next_i64() {
        let mut reader = JsonReader::new("1.5");
        match reader.next_i64() {
            Err(Error::InvalidValue { expected, found }) => {
                assert_eq!(expected, "integer");
                assert_eq!(found, "1.5");
            }
            other => panic!("expected invalid value, got {other:?}"),
        }
    }

    #[test]
    fn test_depth_limit() {
        let limits = Limits {
            max_depth: 2,
            ..Limits::default()
        };
        let mut reader = JsonReader::with_limits("[[[1]]]", limits);
        reader.begin_array().unwrap();
        reader.begin_array().unwrap();
        assert!(matches!(reader.begin_array(), Err(Error::LimitExceeded(_))));
    }

    #[test]
    fn test_string_limit() {
        let limits = Limits {
            max_string_len: 3,
            ..Limits::default()
        };
        let mut reader = JsonReader::with_limits(r#""abcd""#, limits);
        assert!(matches!(reader.next_string(), Err(Error::LimitExceeded(_))));
    }

    #[test]
    fn test_skip_value() {
        let mut reader = JsonReader::new(r#"{"skip": {"x": [1, {"y": null}], "z": "s"}, "keep": 3}"#);
        reader.begin_object().unwrap();
        assert_eq!(reader.next_name().unwrap(), "skip");
        reader.skip_value().unwrap();
        assert_eq!(reader.next_name().unwrap(), "keep");
        assert_eq!(reader.next_i64().unwrap(), 3);
        reader.end_object().unwrap();
        reader.end_document().unwrap();
    }

    #[test]
    fn test_skip_value_rejects_structural_token() {
        let mut reader = JsonReader::new("[]");
        reader.begin_array().unwrap();
        assert!(matches!(
            reader.skip_value(),
            Err(Error::MalformedInput {
                found: TokenKind::EndArray,
                ..
            })
        ));
    }

    #[test]
    fn test_invalid_numbers() {
        for input in ["-", "01", "1.", "1e", "--1"] {
            let mut reader = JsonReader::new(input);
            let result = reader.skip_value().and_then(|_| reader.end_document());
            assert!(result.is_err(), "{input} should be rejected");
        }
    }
}
