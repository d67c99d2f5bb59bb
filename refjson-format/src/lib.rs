//! refjson Format - Core primitives for identity-aware JSON decoding
//!
//! This crate provides the building blocks shared by the codec and I/O layers,
//! with no decoding logic of its own. It includes:
//!
//! - Error types
//! - Token kinds
//! - Identity keys (scope + id value)
//! - Security limits
//! - The forward-only token reader contract and a JSON tokenizer
//! - A compact JSON writer

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod identity;
pub mod limits;
pub mod reader;
pub mod token;
pub mod writer;

// Re-export commonly used types
pub use error::{Error, Result};
pub use identity::{IdKey, IdScope, IdValue};
pub use limits::Limits;
pub use reader::{JsonReader, TokenReader};
pub use token::TokenKind;
pub use writer::JsonWriter;
