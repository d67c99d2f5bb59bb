//! Structural token kinds

use std::fmt;

/// Kind of the next token produced by a [`TokenReader`](crate::TokenReader)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// `{`
    BeginObject,
    /// `}`
    EndObject,
    /// `[`
    BeginArray,
    /// `]`
    EndArray,
    /// Object member name
    Name,
    /// String scalar
    String,
    /// Number scalar
    Number,
    /// `true` or `false`
    Bool,
    /// `null`
    Null,
    /// No more input after the top-level value
    EndDocument,
}

impl TokenKind {
    /// Whether the token starts a complete scalar value
    pub fn is_scalar(self) -> bool {
        matches!(
            self,
            TokenKind::String | TokenKind::Number | TokenKind::Bool | TokenKind::Null
        )
    }

    /// Human-readable description used in error messages
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::BeginObject => "begin object",
            TokenKind::EndObject => "end object",
            TokenKind::BeginArray => "begin array",
            TokenKind::EndArray => "end array",
            TokenKind::Name => "member name",
            TokenKind::String => "string",
            TokenKind::Number => "number",
            TokenKind::Bool => "boolean",
            TokenKind::Null => "null",
            TokenKind::EndDocument => "end of document",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_kinds() {
        let scalars = [
            TokenKind::String,
            TokenKind::Number,
            TokenKind::Bool,
            TokenKind::Null,
        ];
        for kind in scalars {
            assert!(kind.is_scalar(), "{kind} should be scalar");
        }

        let structural = [
            TokenKind::BeginObject,
            TokenKind::EndObject,
            TokenKind::BeginArray,
            TokenKind::EndArray,
            TokenKind::Name,
            TokenKind::EndDocument,
        ];
        for kind in structural {
            assert!(!kind.is_scalar(), "{kind} should not be scalar");
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(TokenKind::BeginArray.to_string(), "begin array");
        assert_eq!(TokenKind::EndDocument.to_string(), "end of document");
    }
}
