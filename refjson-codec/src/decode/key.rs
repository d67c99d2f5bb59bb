//! Key decoders for object member names

use std::any::type_name;
use std::marker::PhantomData;
use std::str::FromStr;

use refjson_format::{Error, Result};
use uuid::Uuid;

use super::KeyDecoder;
use crate::context::DecodeContext;

/// Member name used as-is
#[derive(Debug, Clone, Copy, Default)]
pub struct StringKeyDecoder;

impl KeyDecoder for StringKeyDecoder {
    type Key = String;

    fn decode(&self, name: &str, _ctx: &mut DecodeContext) -> Result<String> {
        Ok(name.to_string())
    }
}

/// Member name parsed with [`FromStr`]
pub struct ParseKeyDecoder<T>(PhantomData<fn() -> T>);

impl<T> ParseKeyDecoder<T> {
    /// Create the decoder
    pub fn new() -> Self {
        ParseKeyDecoder(PhantomData)
    }
}

impl<T> Default for ParseKeyDecoder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for ParseKeyDecoder<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for ParseKeyDecoder<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ParseKeyDecoder<{}>", type_name::<T>())
    }
}

impl<T: FromStr> KeyDecoder for ParseKeyDecoder<T> {
    type Key = T;

    fn decode(&self, name: &str, _ctx: &mut DecodeContext) -> Result<T> {
        name.parse().map_err(|_| Error::InvalidKey {
            key: name.to_string(),
            expected: type_name::<T>(),
        })
    }
}

/// `i64` keys
pub type I64KeyDecoder = ParseKeyDecoder<i64>;
/// `i32` keys
pub type I32KeyDecoder = ParseKeyDecoder<i32>;
/// UUID keys
pub type UuidKeyDecoder = ParseKeyDecoder<Uuid>;
