//! Multimap encoder

use std::hash::Hash;

use refjson_format::{JsonWriter, Result};

use super::{KeyEncoder, ValueEncoder};
use crate::context::EncodeContext;
use crate::decode::multimap::Multimap;

/// Writes a [`Multimap`] as an object of arrays, keeping key and value order
#[derive(Debug, Clone, Default)]
pub struct MultimapEncoder<KE, VE> {
    keys: KE,
    values: VE,
}

impl<KE, VE> MultimapEncoder<KE, VE> {
    /// Create the encoder from its two delegates
    pub fn new(keys: KE, values: VE) -> Self {
        Self { keys, values }
    }
}

impl<KE, VE> ValueEncoder for MultimapEncoder<KE, VE>
where
    KE: KeyEncoder,
    KE::Key: Sized + Hash + Eq,
    VE: ValueEncoder,
    VE::Value: Sized,
{
    type Value = Multimap<KE::Key, VE::Value>;

    fn encode(&self, writer: &mut JsonWriter, value: &Self::Value, ctx: &mut EncodeContext) -> Result<()> {
        ctx.enter()?;
        writer.begin_object()?;
        for (key, values) in value.entries() {
            writer.name(&self.keys.encode(key)?)?;
            writer.begin_array()?;
            for element in values {
                self.values.encode(writer, element, ctx)?;
            }
            writer.end_array()?;
        }
        writer.end_object()?;
        ctx.leave();
        Ok(())
    }
}
