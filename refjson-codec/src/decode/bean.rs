//! Object literal decoders
//!
//! A [`BeanDecoder`] knows the members of one concrete type. It is the piece a
//! code generator would emit per type; [`ObjectDecoder`] and
//! [`IdentityDecoder`] wrap it into a [`ValueDecoder`].

use std::rc::Rc;

use ahash::AHashSet;
use refjson_format::{Error, IdValue, Result, TokenKind, TokenReader};
use tracing::{debug, trace};

use super::ValueDecoder;
use crate::backref::Holder;
use crate::context::DecodeContext;
use crate::identity::{IdGenerator, IdentityInfo, Ref};

/// Per-type member wiring for object literals
pub trait BeanDecoder {
    /// Constructed type
    type Bean: 'static;
    /// Accumulator filled member by member
    type Builder;

    /// Fresh accumulator for one literal
    fn new_builder(&self) -> Self::Builder;

    /// Decode member `name` into `builder`
    ///
    /// Returns `false` without consuming anything when the member is unknown.
    fn decode_property(
        &self,
        builder: &mut Self::Builder,
        name: &str,
        reader: &mut dyn TokenReader,
        ctx: &mut DecodeContext,
    ) -> Result<bool>;

    /// Receive the id when it is one of the object's own properties
    fn assign_id(&self, _builder: &mut Self::Builder, _id: &IdValue) -> Result<()> {
        Ok(())
    }

    /// Finish the object once the literal is closed
    fn build(&self, builder: Self::Builder) -> Result<Self::Bean>;

    /// Offer every member decoder the back-reference `(member, bean)`
    fn set_back_references(&self, _bean: &Rc<Self::Bean>, _ctx: &mut DecodeContext) {}

    /// Receive a back-reference from whatever holds `bean`
    fn accept_back_reference(
        &self,
        _name: &str,
        _holder: &Holder,
        _bean: &Rc<Self::Bean>,
        _ctx: &mut DecodeContext,
    ) {
    }
}

/// Read one object literal, returning the built object and the id it carried
fn read_literal<B: BeanDecoder>(
    bean: &B,
    identity: Option<&IdentityInfo>,
    reader: &mut dyn TokenReader,
    ctx: &mut DecodeContext,
) -> Result<(B::Bean, Option<IdValue>)> {
    reader.begin_object()?;
    let mut builder = bean.new_builder();
    let mut id = None;
    let mut seen = AHashSet::new();

    while reader.peek()? != TokenKind::EndObject {
        let name = reader.next_name()?;
        if !seen.insert(name.clone()) {
            return Err(Error::DuplicateProperty { name });
        }

        if let Some(info) = identity.filter(|info| info.property_name() == name) {
            let value = info.generator().read_id(reader)?;
            trace!(scope = %info.scope(), id = %value, "read identity");
            if info.generator() == IdGenerator::Property {
                bean.assign_id(&mut builder, &value)?;
            }
            id = Some(value);
            continue;
        }

        if !bean.decode_property(&mut builder, &name, reader, ctx)? {
            if ctx.options().fail_on_unknown_properties {
                return Err(Error::UnknownProperty { name });
            }
            debug!(property = %name, "skipping unknown property");
            reader.skip_value()?;
        }
    }

    reader.end_object()?;
    Ok((bean.build(builder)?, id))
}

/// Object literal without identity
#[derive(Debug, Clone, Default)]
pub struct ObjectDecoder<B>(pub B);

impl<B: BeanDecoder> ValueDecoder for ObjectDecoder<B> {
    type Value = Rc<B::Bean>;

    fn decode(&self, reader: &mut dyn TokenReader, ctx: &mut DecodeContext) -> Result<Self::Value> {
        let (bean, _) = read_literal(&self.0, None, reader, ctx)?;
        let bean = Rc::new(bean);
        self.0.set_back_references(&bean, ctx);
        Ok(bean)
    }

    fn set_back_reference(&self, name: &str, holder: &Holder, value: &Self::Value, ctx: &mut DecodeContext) {
        self.0.accept_back_reference(name, holder, value, ctx);
    }
}

/// Identity-bearing object: a literal on first occurrence, a bare id afterwards
///
/// The literal is bound once it is complete, so members of the literal may
/// reference the object itself and the id member may come last.
#[derive(Debug, Clone)]
pub struct IdentityDecoder<B> {
    bean: B,
    identity: IdentityInfo,
}

impl<B: BeanDecoder> IdentityDecoder<B> {
    /// Wrap `bean` with the identity metadata of its type or of the annotated field
    pub fn new(bean: B, identity: IdentityInfo) -> Self {
        Self { bean, identity }
    }

    /// Identity metadata
    pub fn identity(&self) -> &IdentityInfo {
        &self.identity
    }
}

impl<B: BeanDecoder> ValueDecoder for IdentityDecoder<B> {
    type Value = Ref<B::Bean>;

    fn decode(&self, reader: &mut dyn TokenReader, ctx: &mut DecodeContext) -> Result<Self::Value> {
        match reader.peek()? {
            TokenKind::BeginObject => {
                let (bean, id) = read_literal(&self.bean, Some(&self.identity), reader, ctx)?;
                let bean = Rc::new(bean);
                match id {
                    Some(id) => ctx.bind(&self.identity.key(id), &bean)?,
                    None => debug!(scope = %self.identity.scope(), "literal without id, not bound"),
                }
                self.bean.set_back_references(&bean, ctx);
                Ok(Ref::Owned(bean))
            }
            TokenKind::Number | TokenKind::String => {
                let id = self.identity.generator().read_id(reader)?;
                let slot = ctx.resolve::<B::Bean>(&self.identity.key(id))?;
                Ok(Ref::Linked(slot))
            }
            found => Err(Error::MalformedInput {
                expected: "object literal or identity reference",
                found,
                offset: reader.offset(),
            }),
        }
    }

    fn set_back_reference(&self, name: &str, holder: &Holder, value: &Self::Value, ctx: &mut DecodeContext) {
        // A forward reference has nothing to deliver to yet.
        if let Some(bean) = value.get() {
            self.bean.accept_back_reference(name, holder, &bean, ctx);
        }
    }
}
