//! Scalar, nullable and list decoders

use refjson_format::{Error, Result, TokenKind, TokenReader};
use uuid::Uuid;

use super::ValueDecoder;
use crate::backref::{propagate, Holder};
use crate::context::DecodeContext;

/// JSON string
#[derive(Debug, Clone, Copy, Default)]
pub struct StringDecoder;

impl ValueDecoder for StringDecoder {
    type Value = String;

    fn decode(&self, reader: &mut dyn TokenReader, _ctx: &mut DecodeContext) -> Result<String> {
        reader.next_string()
    }
}

/// JSON integer as `i64`
#[derive(Debug, Clone, Copy, Default)]
pub struct I64Decoder;

impl ValueDecoder for I64Decoder {
    type Value = i64;

    fn decode(&self, reader: &mut dyn TokenReader, _ctx: &mut DecodeContext) -> Result<i64> {
        reader.next_i64()
    }
}

/// JSON integer as `i32`, range checked
#[derive(Debug, Clone, Copy, Default)]
pub struct I32Decoder;

impl ValueDecoder for I32Decoder {
    type Value = i32;

    fn decode(&self, reader: &mut dyn TokenReader, _ctx: &mut DecodeContext) -> Result<i32> {
        let value = reader.next_i64()?;
        i32::try_from(value).map_err(|_| Error::InvalidValue {
            expected: "32-bit integer",
            found: value.to_string(),
        })
    }
}

/// JSON number as `f64`
#[derive(Debug, Clone, Copy, Default)]
pub struct F64Decoder;

impl ValueDecoder for F64Decoder {
    type Value = f64;

    fn decode(&self, reader: &mut dyn TokenReader, _ctx: &mut DecodeContext) -> Result<f64> {
        reader.next_f64()
    }
}

/// JSON boolean
#[derive(Debug, Clone, Copy, Default)]
pub struct BoolDecoder;

impl ValueDecoder for BoolDecoder {
    type Value = bool;

    fn decode(&self, reader: &mut dyn TokenReader, _ctx: &mut DecodeContext) -> Result<bool> {
        reader.next_bool()
    }
}

/// UUID in its textual form
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidDecoder;

impl ValueDecoder for UuidDecoder {
    type Value = Uuid;

    fn decode(&self, reader: &mut dyn TokenReader, _ctx: &mut DecodeContext) -> Result<Uuid> {
        let text = reader.next_string()?;
        Uuid::parse_str(&text).map_err(|_| Error::InvalidValue {
            expected: "UUID",
            found: text,
        })
    }
}

/// Accepts `null` in front of another decoder
#[derive(Debug, Clone, Copy, Default)]
pub struct Nullable<D>(pub D);

impl<D: ValueDecoder> ValueDecoder for Nullable<D> {
    type Value = Option<D::Value>;

    fn decode(&self, reader: &mut dyn TokenReader, ctx: &mut DecodeContext) -> Result<Self::Value> {
        if reader.peek()? == TokenKind::Null {
            reader.next_null()?;
            return Ok(None);
        }
        self.0.decode(reader, ctx).map(Some)
    }

    fn set_back_reference(&self, name: &str, holder: &Holder, value: &Self::Value, ctx: &mut DecodeContext) {
        if let Some(inner) = value {
            self.0.set_back_reference(name, holder, inner, ctx);
        }
    }
}

/// JSON array decoded element by element
#[derive(Debug, Clone, Copy, Default)]
pub struct ListDecoder<D>(pub D);

impl<D: ValueDecoder> ValueDecoder for ListDecoder<D> {
    type Value = Vec<D::Value>;

    fn decode(&self, reader: &mut dyn TokenReader, ctx: &mut DecodeContext) -> Result<Self::Value> {
        reader.begin_array()?;
        let mut values = Vec::new();
        while reader.peek()? != TokenKind::EndArray {
            values.push(self.0.decode(reader, ctx)?);
        }
        reader.end_array()?;
        Ok(values)
    }

    fn set_back_reference(&self, name: &str, holder: &Holder, value: &Self::Value, ctx: &mut DecodeContext) {
        for element in value {
            propagate(&self.0, name, holder, element, ctx);
        }
    }
}
