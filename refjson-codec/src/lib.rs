//! refjson Codec - Decoding and encoding engines
//!
//! This crate provides the engines that turn a token stream into object graphs
//! with shared references and cycles:
//!
//! - Decode/encode contexts carrying per-call state
//! - Identity registry with deferred-resolution cells
//! - Id generators (integer sequence, UUID, property-derived)
//! - Value and key decoder contracts with scalar implementations
//! - Bean decoders for object literals with or without identity
//! - Multimap builder driven by delegate decoders
//! - Back-reference propagation
//! - Encoders producing the matching wire format

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod backref;
pub mod context;
pub mod decode;
pub mod encode;
pub mod identity;

// Re-export commonly used types
pub use refjson_format::{
    Error, IdKey, IdScope, IdValue, JsonReader, JsonWriter, Limits, Result, TokenKind,
    TokenReader,
};

// Re-export our own types
pub use backref::{BackReference, Backlinks, Holder};
pub use context::{DecodeContext, DecodeOpts, EncodeContext, EncodeOpts};
pub use decode::bean::{BeanDecoder, IdentityDecoder, ObjectDecoder};
pub use decode::multimap::{build_multimap, Multimap, MultimapDecoder, MultimapDecoderBuilder};
pub use decode::{KeyDecoder, ValueDecoder};
pub use encode::bean::{BeanEncoder, IdentityEncoder, ObjectEncoder};
pub use encode::multimap::MultimapEncoder;
pub use encode::{KeyEncoder, ValueEncoder};
pub use identity::{IdGenerator, IdentityInfo, IdentityRegistry, Ref, Slot};
