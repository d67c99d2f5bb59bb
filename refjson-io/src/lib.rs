//! refjson I/O - High-level decode and encode APIs
//!
//! This crate wraps the codec engines into one-call entry points:
//!
//! - Decoding from strings and byte readers
//! - Encoding to strings and byte writers
//! - An [`ObjectMapper`] pairing a decoder with its encoder

#![deny(unsafe_code)]
#![warn(missing_docs)]

// Re-export commonly used types
pub use refjson_codec::{
    DecodeContext, DecodeOpts, EncodeContext, EncodeOpts, ValueDecoder, ValueEncoder,
};
pub use refjson_format::{Error, JsonReader, JsonWriter, Limits, Result};

use std::io::{Read, Write};

use tracing::{debug, debug_span};

/// High-level decoding options
#[derive(Debug, Clone)]
pub struct DecodeOptions {
    /// Reject object members the target type does not declare
    pub fail_on_unknown_properties: bool,
    /// Security limits
    pub limits: Limits,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            fail_on_unknown_properties: true,
            limits: Limits::default(),
        }
    }
}

impl From<DecodeOptions> for DecodeOpts {
    fn from(opts: DecodeOptions) -> Self {
        DecodeOpts {
            fail_on_unknown_properties: opts.fail_on_unknown_properties,
            limits: opts.limits,
        }
    }
}

/// High-level encoding options
#[derive(Debug, Clone, Default)]
pub struct EncodeOptions {
    /// Security limits
    pub limits: Limits,
}

impl From<EncodeOptions> for EncodeOpts {
    fn from(opts: EncodeOptions) -> Self {
        EncodeOpts {
            limits: opts.limits,
        }
    }
}

/// Decode one JSON document from `input`
///
/// The whole graph is resolved before returning: a reference whose object
/// literal never appeared fails with [`Error::UnresolvedIdentity`].
pub fn decode_str<D: ValueDecoder + ?Sized>(
    input: &str,
    decoder: &D,
    opts: DecodeOptions,
) -> Result<D::Value> {
    let span = debug_span!("decode", len = input.len());
    let _guard = span.enter();

    let limits = opts.limits.clone();
    let mut ctx = DecodeContext::new(opts.into())?;
    let mut reader = JsonReader::with_limits(input, limits);

    let value = decoder.decode(&mut reader, &mut ctx)?;
    reader.end_document()?;

    let bindings = ctx.registry().len();
    ctx.finish()?;
    debug!(bindings, "decoded document");
    Ok(value)
}

/// Decode one UTF-8 JSON document read fully from `input`
pub fn decode_reader<R: Read, D: ValueDecoder + ?Sized>(
    mut input: R,
    decoder: &D,
    opts: DecodeOptions,
) -> Result<D::Value> {
    let mut text = String::new();
    input.read_to_string(&mut text)?;
    decode_str(&text, decoder, opts)
}

/// Encode `value` to a JSON string
pub fn encode_to_string<E: ValueEncoder + ?Sized>(
    value: &E::Value,
    encoder: &E,
    opts: EncodeOptions,
) -> Result<String> {
    let span = debug_span!("encode");
    let _guard = span.enter();

    let mut ctx = EncodeContext::new(opts.into())?;
    let mut writer = JsonWriter::new();
    encoder.encode(&mut writer, value, &mut ctx)?;
    let text = writer.into_string()?;
    debug!(len = text.len(), "encoded document");
    Ok(text)
}

/// Encode `value` into `output`
pub fn encode_to_writer<W: Write, E: ValueEncoder + ?Sized>(
    mut output: W,
    value: &E::Value,
    encoder: &E,
    opts: EncodeOptions,
) -> Result<()> {
    let text = encode_to_string(value, encoder, opts)?;
    output.write_all(text.as_bytes())?;
    output.flush()?;
    Ok(())
}

/// A decoder and encoder for the same type, with their options
#[derive(Debug, Clone, Default)]
pub struct ObjectMapper<D, E> {
    decoder: D,
    encoder: E,
    decode_opts: DecodeOptions,
    encode_opts: EncodeOptions,
}

impl<D, E> ObjectMapper<D, E>
where
    D: ValueDecoder,
    E: ValueEncoder<Value = D::Value>,
{
    /// Pair `decoder` and `encoder` with default options
    pub fn new(decoder: D, encoder: E) -> Self {
        Self {
            decoder,
            encoder,
            decode_opts: DecodeOptions::default(),
            encode_opts: EncodeOptions::default(),
        }
    }

    /// Replace the decoding options
    pub fn with_decode_options(mut self, opts: DecodeOptions) -> Self {
        self.decode_opts = opts;
        self
    }

    /// Replace the encoding options
    pub fn with_encode_options(mut self, opts: EncodeOptions) -> Self {
        self.encode_opts = opts;
        self
    }

    /// Decode `input`
    pub fn decode(&self, input: &str) -> Result<D::Value> {
        decode_str(input, &self.decoder, self.decode_opts.clone())
    }

    /// Decode everything read from `input`
    pub fn decode_from<R: Read>(&self, input: R) -> Result<D::Value> {
        decode_reader(input, &self.decoder, self.decode_opts.clone())
    }

    /// Encode `value`
    pub fn encode(&self, value: &D::Value) -> Result<String> {
        encode_to_string(value, &self.encoder, self.encode_opts.clone())
    }

    /// Encode `value` into `output`
    pub fn encode_into<W: Write>(&self, output: W, value: &D::Value) -> Result<()> {
        encode_to_writer(output, value, &self.encoder, self.encode_opts.clone())
    }
}
