//! Object encoders, with and without identity

use std::rc::Rc;

use refjson_format::{Error, IdValue, JsonWriter, Result};
use tracing::trace;

use super::ValueEncoder;
use crate::context::EncodeContext;
use crate::identity::{IdGenerator, IdentityInfo, Ref};

/// Per-type member wiring for writing object literals
pub trait BeanEncoder {
    /// Encoded type
    type Bean: 'static;

    /// Write every member of `bean` into the already open object
    ///
    /// When the type takes its id from one of its own properties, that property
    /// is written by [`IdentityEncoder`] and must be left out here.
    fn write_properties(&self, writer: &mut JsonWriter, bean: &Self::Bean, ctx: &mut EncodeContext) -> Result<()>;

    /// The id held by the object itself, for the property generator
    fn property_id(&self, _bean: &Self::Bean) -> Option<IdValue> {
        None
    }
}

/// Plain object literal
#[derive(Debug, Clone, Default)]
pub struct ObjectEncoder<B>(pub B);

impl<B: BeanEncoder> ValueEncoder for ObjectEncoder<B> {
    type Value = Rc<B::Bean>;

    fn encode(&self, writer: &mut JsonWriter, value: &Self::Value, ctx: &mut EncodeContext) -> Result<()> {
        ctx.enter()?;
        writer.begin_object()?;
        self.0.write_properties(writer, value, ctx)?;
        writer.end_object()?;
        ctx.leave();
        Ok(())
    }
}

/// Identity-bearing object: literal with its id on first occurrence, bare id afterwards
#[derive(Debug, Clone)]
pub struct IdentityEncoder<B> {
    bean: B,
    identity: IdentityInfo,
}

impl<B: BeanEncoder> IdentityEncoder<B> {
    /// Wrap `bean` with the identity metadata of its type or of the annotated field
    pub fn new(bean: B, identity: IdentityInfo) -> Self {
        Self { bean, identity }
    }

    /// Identity metadata
    pub fn identity(&self) -> &IdentityInfo {
        &self.identity
    }

    /// Write `bean`, keyed on its address for the rest of the call
    pub fn encode_rc(&self, writer: &mut JsonWriter, bean: &Rc<B::Bean>, ctx: &mut EncodeContext) -> Result<()> {
        let scope = self.identity.scope();
        let addr = Rc::as_ptr(bean) as usize;

        if let Some(id) = ctx.written_id(scope, addr) {
            trace!(%scope, %id, "write identity reference");
            return IdGenerator::write_id(writer, id);
        }

        let id = match self.identity.generator() {
            IdGenerator::Property => self.bean.property_id(bean).ok_or_else(|| {
                Error::Configuration(format!(
                    "object in scope {scope} has no value for id property '{}'",
                    self.identity.property_name()
                ))
            })?,
            _ => ctx.generate_id(&self.identity)?,
        };
        trace!(%scope, %id, "write identity literal");

        // Remembered before the members so self-references come out as bare ids.
        ctx.remember(scope, addr, id.clone());

        ctx.enter()?;
        writer.begin_object()?;
        writer.name(self.identity.property_name())?;
        IdGenerator::write_id(writer, &id)?;
        self.bean.write_properties(writer, bean, ctx)?;
        writer.end_object()?;
        ctx.leave();
        Ok(())
    }
}

impl<B: BeanEncoder> ValueEncoder for IdentityEncoder<B> {
    type Value = Ref<B::Bean>;

    fn encode(&self, writer: &mut JsonWriter, value: &Self::Value, ctx: &mut EncodeContext) -> Result<()> {
        let bean = value.get().ok_or_else(|| {
            Error::custom(format!(
                "reference in scope {} does not point at a live object",
                self.identity.scope()
            ))
        })?;
        self.encode_rc(writer, &bean, ctx)
    }
}
