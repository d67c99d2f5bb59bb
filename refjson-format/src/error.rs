//! Error types for refjson

use thiserror::Error;

use crate::identity::{IdKey, IdScope};
use crate::token::TokenKind;

/// refjson error types
///
/// Every error is terminal for the top-level decode or encode call that raised it.
/// Errors produced by key and value decoders travel through containers and bean
/// decoders unchanged, so callers can match on the original variant.
#[derive(Debug, Error)]
pub enum Error {
    /// Token stream does not have the expected structural shape.
    #[error("Malformed input at byte {offset}: expected {expected}, found {found}")]
    MalformedInput {
        /// What the decoder was expecting at this position
        expected: &'static str,
        /// Token actually found
        found: TokenKind,
        /// Byte offset into the input
        offset: usize,
    },
    /// Input text is not valid JSON at the given position.
    #[error("Syntax error at byte {offset}: {reason}")]
    Syntax {
        /// Description of the problem
        reason: String,
        /// Byte offset into the input
        offset: usize,
    },
    /// The same scope and id were bound to two distinct objects.
    #[error("Duplicate identity: {key} is already bound to another object")]
    DuplicateIdentity {
        /// Scope and id that were bound twice
        key: IdKey,
    },
    /// A reference was never matched by an object literal.
    #[error("Unresolved identity: {key} was referenced but never defined ({pending} pending)")]
    UnresolvedIdentity {
        /// First unresolved key in sorted order
        key: IdKey,
        /// Total number of unresolved keys
        pending: usize,
    },
    /// A scope was used with two different object types.
    #[error("Identity scope {scope} is bound to a different object type")]
    ScopeTypeMismatch {
        /// Offending scope
        scope: IdScope,
    },
    /// An object member name could not be converted to the key type.
    #[error("Invalid key '{key}': expected {expected}")]
    InvalidKey {
        /// Raw member name
        key: String,
        /// Expected key type
        expected: &'static str,
    },
    /// A scalar could not be converted to the requested type.
    #[error("Invalid value '{found}': expected {expected}")]
    InvalidValue {
        /// Expected value type
        expected: &'static str,
        /// Raw text that was found
        found: String,
    },
    /// Object literal carried a member the bean does not know.
    #[error("Unknown property '{name}'")]
    UnknownProperty {
        /// Member name
        name: String,
    },
    /// Object literal carried the same member twice.
    #[error("Duplicate property '{name}'")]
    DuplicateProperty {
        /// Member name
        name: String,
    },
    /// A decoder or generator was misconfigured at construction time.
    #[error("Configuration error: {0}")]
    Configuration(String),
    /// A configured security limit was exceeded.
    #[error("Limit exceeded: {0}")]
    LimitExceeded(String),
    /// String unescaping or number formatting failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// I/O operation failed while reading or writing data.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Error raised by a custom decoder or encoder.
    #[error("{0}")]
    Custom(String),
}

impl Error {
    /// Build a [`Error::Custom`] from any displayable message
    pub fn custom(msg: impl std::fmt::Display) -> Self {
        Error::Custom(msg.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
