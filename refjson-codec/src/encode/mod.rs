//! Encoder contracts and the stock implementations
//!
//! Encoders produce exactly the wire form the decoders read back.

pub mod bean;
pub mod multimap;

use std::fmt::Display;
use std::marker::PhantomData;
use std::rc::Rc;

use refjson_format::{JsonWriter, Result};
use uuid::Uuid;

use crate::context::EncodeContext;

/// Writes one value
pub trait ValueEncoder {
    /// Encoded value type
    type Value: ?Sized;

    /// Write `value` as exactly one JSON value
    fn encode(&self, writer: &mut JsonWriter, value: &Self::Value, ctx: &mut EncodeContext) -> Result<()>;
}

/// Turns a key into an object member name
pub trait KeyEncoder {
    /// Encoded key type
    type Key: ?Sized;

    /// Member name for `key`
    fn encode(&self, key: &Self::Key) -> Result<String>;
}

impl<E: ValueEncoder + ?Sized> ValueEncoder for Box<E> {
    type Value = E::Value;

    fn encode(&self, writer: &mut JsonWriter, value: &Self::Value, ctx: &mut EncodeContext) -> Result<()> {
        (**self).encode(writer, value, ctx)
    }
}

impl<E: ValueEncoder + ?Sized> ValueEncoder for Rc<E> {
    type Value = E::Value;

    fn encode(&self, writer: &mut JsonWriter, value: &Self::Value, ctx: &mut EncodeContext) -> Result<()> {
        (**self).encode(writer, value, ctx)
    }
}

/// JSON string
#[derive(Debug, Clone, Copy, Default)]
pub struct StringEncoder;

impl ValueEncoder for StringEncoder {
    type Value = String;

    fn encode(&self, writer: &mut JsonWriter, value: &String, _ctx: &mut EncodeContext) -> Result<()> {
        writer.string(value)
    }
}

/// `i64` number
#[derive(Debug, Clone, Copy, Default)]
pub struct I64Encoder;

impl ValueEncoder for I64Encoder {
    type Value = i64;

    fn encode(&self, writer: &mut JsonWriter, value: &i64, _ctx: &mut EncodeContext) -> Result<()> {
        writer.i64(*value)
    }
}

/// `i32` number
#[derive(Debug, Clone, Copy, Default)]
pub struct I32Encoder;

impl ValueEncoder for I32Encoder {
    type Value = i32;

    fn encode(&self, writer: &mut JsonWriter, value: &i32, _ctx: &mut EncodeContext) -> Result<()> {
        writer.i64(i64::from(*value))
    }
}

/// Finite `f64` number
#[derive(Debug, Clone, Copy, Default)]
pub struct F64Encoder;

impl ValueEncoder for F64Encoder {
    type Value = f64;

    fn encode(&self, writer: &mut JsonWriter, value: &f64, _ctx: &mut EncodeContext) -> Result<()> {
        writer.f64(*value)
    }
}

/// Boolean
#[derive(Debug, Clone, Copy, Default)]
pub struct BoolEncoder;

impl ValueEncoder for BoolEncoder {
    type Value = bool;

    fn encode(&self, writer: &mut JsonWriter, value: &bool, _ctx: &mut EncodeContext) -> Result<()> {
        writer.bool(*value)
    }
}

/// Hyphenated UUID string
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidEncoder;

impl ValueEncoder for UuidEncoder {
    type Value = Uuid;

    fn encode(&self, writer: &mut JsonWriter, value: &Uuid, _ctx: &mut EncodeContext) -> Result<()> {
        writer.string(&value.hyphenated().to_string())
    }
}

/// `None` as `null`, `Some` through the inner encoder
#[derive(Debug, Clone, Copy, Default)]
pub struct NullableEncoder<E>(pub E);

impl<E> ValueEncoder for NullableEncoder<E>
where
    E: ValueEncoder,
    E::Value: Sized,
{
    type Value = Option<E::Value>;

    fn encode(&self, writer: &mut JsonWriter, value: &Self::Value, ctx: &mut EncodeContext) -> Result<()> {
        match value {
            Some(inner) => self.0.encode(writer, inner, ctx),
            None => writer.null(),
        }
    }
}

/// Slice as a JSON array
#[derive(Debug, Clone, Copy, Default)]
pub struct ListEncoder<E>(pub E);

impl<E> ValueEncoder for ListEncoder<E>
where
    E: ValueEncoder,
    E::Value: Sized,
{
    type Value = [E::Value];

    fn encode(&self, writer: &mut JsonWriter, value: &Self::Value, ctx: &mut EncodeContext) -> Result<()> {
        ctx.enter()?;
        writer.begin_array()?;
        for element in value {
            self.0.encode(writer, element, ctx)?;
        }
        writer.end_array()?;
        ctx.leave();
        Ok(())
    }
}

/// Key written with its [`Display`] form
pub struct DisplayKeyEncoder<T: ?Sized>(PhantomData<fn(&T)>);

impl<T: ?Sized> DisplayKeyEncoder<T> {
    /// Create the encoder
    pub fn new() -> Self {
        DisplayKeyEncoder(PhantomData)
    }
}

impl<T: ?Sized> Default for DisplayKeyEncoder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> Clone for DisplayKeyEncoder<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T: Display + ?Sized> KeyEncoder for DisplayKeyEncoder<T> {
    type Key = T;

    fn encode(&self, key: &T) -> Result<String> {
        Ok(key.to_string())
    }
}
