//! Decoder contracts and the stock implementations
//!
//! [`ValueDecoder`] turns the next value of a token stream into a typed value;
//! [`KeyDecoder`] turns an object member name into a typed key. Containers and
//! bean decoders are written once against these traits.

pub mod bean;
pub mod key;
pub mod multimap;
pub mod scalar;

pub use key::{I32KeyDecoder, I64KeyDecoder, ParseKeyDecoder, StringKeyDecoder, UuidKeyDecoder};
pub use scalar::{
    BoolDecoder, F64Decoder, I32Decoder, I64Decoder, ListDecoder, Nullable, StringDecoder,
    UuidDecoder,
};

use std::rc::Rc;

use refjson_format::{Result, TokenReader};

use crate::backref::Holder;
use crate::context::DecodeContext;

/// Decodes one value from the token stream
pub trait ValueDecoder {
    /// Decoded value type
    type Value;

    /// Consume exactly one value from `reader`
    fn decode(&self, reader: &mut dyn TokenReader, ctx: &mut DecodeContext) -> Result<Self::Value>;

    /// Tell `value` that it was reached through member `name` of `holder`
    ///
    /// Called once the holder is fully built. The default ignores it.
    fn set_back_reference(
        &self,
        _name: &str,
        _holder: &Holder,
        _value: &Self::Value,
        _ctx: &mut DecodeContext,
    ) {
    }
}

/// Decodes an object member name into a typed key
pub trait KeyDecoder {
    /// Decoded key type
    type Key;

    /// Convert `name`
    fn decode(&self, name: &str, ctx: &mut DecodeContext) -> Result<Self::Key>;
}

impl<D: ValueDecoder + ?Sized> ValueDecoder for Box<D> {
    type Value = D::Value;

    fn decode(&self, reader: &mut dyn TokenReader, ctx: &mut DecodeContext) -> Result<Self::Value> {
        (**self).decode(reader, ctx)
    }

    fn set_back_reference(&self, name: &str, holder: &Holder, value: &Self::Value, ctx: &mut DecodeContext) {
        (**self).set_back_reference(name, holder, value, ctx)
    }
}

impl<D: ValueDecoder + ?Sized> ValueDecoder for Rc<D> {
    type Value = D::Value;

    fn decode(&self, reader: &mut dyn TokenReader, ctx: &mut DecodeContext) -> Result<Self::Value> {
        (**self).decode(reader, ctx)
    }

    fn set_back_reference(&self, name: &str, holder: &Holder, value: &Self::Value, ctx: &mut DecodeContext) {
        (**self).set_back_reference(name, holder, value, ctx)
    }
}

impl<D: KeyDecoder + ?Sized> KeyDecoder for Box<D> {
    type Key = D::Key;

    fn decode(&self, name: &str, ctx: &mut DecodeContext) -> Result<Self::Key> {
        (**self).decode(name, ctx)
    }
}

impl<D: KeyDecoder + ?Sized> KeyDecoder for Rc<D> {
    type Key = D::Key;

    fn decode(&self, name: &str, ctx: &mut DecodeContext) -> Result<Self::Key> {
        (**self).decode(name, ctx)
    }
}
