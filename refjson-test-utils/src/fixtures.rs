//! Identity fixtures
//!
//! Each type comes with the bean decoder and encoder a code generator would
//! emit for it. Identity metadata is declared either on the type (shared by
//! every field of that type) or on a single field (its own scope).

use std::rc::{Rc, Weak};

use refjson_codec::decode::{I32Decoder, Nullable};
use refjson_codec::encode::{I32Encoder, NullableEncoder};
use refjson_codec::{
    BeanDecoder, BeanEncoder, DecodeContext, EncodeContext, Error, IdScope, IdValue,
    IdentityDecoder, IdentityEncoder, IdentityInfo, JsonWriter, ObjectDecoder, ObjectEncoder,
    Ref, Result, TokenReader, ValueDecoder, ValueEncoder,
};

fn int_id(id: &IdValue) -> Result<i32> {
    match id {
        IdValue::Int(v) => i32::try_from(*v).map_err(|_| Error::InvalidValue {
            expected: "32-bit integer id",
            found: v.to_string(),
        }),
        other => Err(Error::InvalidValue {
            expected: "32-bit integer id",
            found: other.to_string(),
        }),
    }
}

// ---------------------------------------------------------------------------
// Sequence ids declared on the type

/// Node with sequence ids under `"id"`
#[derive(Debug)]
pub struct Identifiable {
    /// Payload
    pub value: i32,
    /// Next node, possibly itself
    pub next: Option<Ref<Identifiable>>,
}

/// Members of [`Identifiable`]
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentifiableBean;

/// Accumulator for [`Identifiable`]
#[derive(Default)]
pub struct IdentifiableBuilder {
    value: i32,
    next: Option<Ref<Identifiable>>,
}

/// Identity of [`Identifiable`]
pub fn identifiable_identity() -> Result<IdentityInfo> {
    IdentityInfo::int_sequence("id", IdScope::new("Identifiable"))
}

/// Decoder for [`Identifiable`] fields and documents
pub fn identifiable_decoder() -> Result<IdentityDecoder<IdentifiableBean>> {
    Ok(IdentityDecoder::new(IdentifiableBean, identifiable_identity()?))
}

/// Encoder for [`Identifiable`] fields and documents
pub fn identifiable_encoder() -> Result<IdentityEncoder<IdentifiableBean>> {
    Ok(IdentityEncoder::new(IdentifiableBean, identifiable_identity()?))
}

impl BeanDecoder for IdentifiableBean {
    type Bean = Identifiable;
    type Builder = IdentifiableBuilder;

    fn new_builder(&self) -> IdentifiableBuilder {
        IdentifiableBuilder::default()
    }

    fn decode_property(
        &self,
        builder: &mut IdentifiableBuilder,
        name: &str,
        reader: &mut dyn TokenReader,
        ctx: &mut DecodeContext,
    ) -> Result<bool> {
        match name {
            "value" => builder.value = I32Decoder.decode(reader, ctx)?,
            "next" => builder.next = Nullable(identifiable_decoder()?).decode(reader, ctx)?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn build(&self, builder: IdentifiableBuilder) -> Result<Identifiable> {
        Ok(Identifiable {
            value: builder.value,
            next: builder.next,
        })
    }
}

impl BeanEncoder for IdentifiableBean {
    type Bean = Identifiable;

    fn write_properties(&self, writer: &mut JsonWriter, bean: &Identifiable, ctx: &mut EncodeContext) -> Result<()> {
        writer.name("value")?;
        I32Encoder.encode(writer, &bean.value, ctx)?;
        writer.name("next")?;
        NullableEncoder(identifiable_encoder()?).encode(writer, &bean.next, ctx)
    }
}

// ---------------------------------------------------------------------------
// UUID ids declared on the type

/// Tree node with UUID ids under `"#"`
#[derive(Debug, Default)]
pub struct UuidNode {
    /// Payload
    pub value: i32,
    /// Parent, written as a reference once the parent literal is open
    pub parent: Option<Ref<UuidNode>>,
    /// First child
    pub first: Option<Ref<UuidNode>>,
    /// Second child
    pub second: Option<Ref<UuidNode>>,
}

/// Members of [`UuidNode`]
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidNodeBean;

/// Identity of [`UuidNode`]
pub fn uuid_node_identity() -> Result<IdentityInfo> {
    IdentityInfo::uuid("#", IdScope::new("UuidNode"))
}

/// Decoder for [`UuidNode`] fields and documents
pub fn uuid_node_decoder() -> Result<IdentityDecoder<UuidNodeBean>> {
    Ok(IdentityDecoder::new(UuidNodeBean, uuid_node_identity()?))
}

/// Encoder for [`UuidNode`] fields and documents
pub fn uuid_node_encoder() -> Result<IdentityEncoder<UuidNodeBean>> {
    Ok(IdentityEncoder::new(UuidNodeBean, uuid_node_identity()?))
}

/// Root (1) with children (2, 3); both children point back at the root and
/// child 2 also points at child 3
pub fn uuid_sample_graph() -> Rc<UuidNode> {
    Rc::new_cyclic(|root: &Weak<UuidNode>| {
        let child2 = Rc::new(UuidNode {
            value: 3,
            parent: Some(Ref::from_weak(root.clone())),
            ..UuidNode::default()
        });
        let child1 = Rc::new(UuidNode {
            value: 2,
            parent: Some(Ref::from_weak(root.clone())),
            first: Some(Ref::Owned(Rc::clone(&child2))),
            ..UuidNode::default()
        });
        UuidNode {
            value: 1,
            parent: None,
            first: Some(Ref::Owned(child1)),
            second: Some(Ref::Owned(child2)),
        }
    })
}

impl BeanDecoder for UuidNodeBean {
    type Bean = UuidNode;
    type Builder = UuidNode;

    fn new_builder(&self) -> UuidNode {
        UuidNode::default()
    }

    fn decode_property(
        &self,
        builder: &mut UuidNode,
        name: &str,
        reader: &mut dyn TokenReader,
        ctx: &mut DecodeContext,
    ) -> Result<bool> {
        let field = match name {
            "value" => {
                builder.value = I32Decoder.decode(reader, ctx)?;
                return Ok(true);
            }
            "parent" => &mut builder.parent,
            "first" => &mut builder.first,
            "second" => &mut builder.second,
            _ => return Ok(false),
        };
        *field = Nullable(uuid_node_decoder()?).decode(reader, ctx)?;
        Ok(true)
    }

    fn build(&self, builder: UuidNode) -> Result<UuidNode> {
        Ok(builder)
    }
}

impl BeanEncoder for UuidNodeBean {
    type Bean = UuidNode;

    fn write_properties(&self, writer: &mut JsonWriter, bean: &UuidNode, ctx: &mut EncodeContext) -> Result<()> {
        let nodes = NullableEncoder(uuid_node_encoder()?);
        writer.name("value")?;
        I32Encoder.encode(writer, &bean.value, ctx)?;
        writer.name("parent")?;
        nodes.encode(writer, &bean.parent, ctx)?;
        writer.name("first")?;
        nodes.encode(writer, &bean.first, ctx)?;
        writer.name("second")?;
        nodes.encode(writer, &bean.second, ctx)
    }
}

// ---------------------------------------------------------------------------
// Sequence ids declared on a field

/// Wrapper whose `node` field carries sequence ids under `"@id"`
#[derive(Debug, Default)]
pub struct IdWrapper {
    /// Identity-bearing node
    pub node: Option<Ref<ValueNode>>,
}

/// Node reachable through [`IdWrapper::node`]
#[derive(Debug, Default)]
pub struct ValueNode {
    /// Payload
    pub value: i32,
    /// Wrapper leading to the next node
    pub next: Option<Rc<IdWrapper>>,
}

/// Members of [`IdWrapper`]
#[derive(Debug, Clone, Copy, Default)]
pub struct IdWrapperBean;

/// Members of [`ValueNode`]
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueNodeBean;

/// Identity of the `IdWrapper.node` field
pub fn id_wrapper_node_identity() -> Result<IdentityInfo> {
    IdentityInfo::int_sequence("@id", IdScope::new("IdWrapper.node"))
}

impl BeanDecoder for IdWrapperBean {
    type Bean = IdWrapper;
    type Builder = IdWrapper;

    fn new_builder(&self) -> IdWrapper {
        IdWrapper::default()
    }

    fn decode_property(
        &self,
        builder: &mut IdWrapper,
        name: &str,
        reader: &mut dyn TokenReader,
        ctx: &mut DecodeContext,
    ) -> Result<bool> {
        if name != "node" {
            return Ok(false);
        }
        let nodes = Nullable(IdentityDecoder::new(ValueNodeBean, id_wrapper_node_identity()?));
        builder.node = nodes.decode(reader, ctx)?;
        Ok(true)
    }

    fn build(&self, builder: IdWrapper) -> Result<IdWrapper> {
        Ok(builder)
    }
}

impl BeanDecoder for ValueNodeBean {
    type Bean = ValueNode;
    type Builder = ValueNode;

    fn new_builder(&self) -> ValueNode {
        ValueNode::default()
    }

    fn decode_property(
        &self,
        builder: &mut ValueNode,
        name: &str,
        reader: &mut dyn TokenReader,
        ctx: &mut DecodeContext,
    ) -> Result<bool> {
        match name {
            "value" => builder.value = I32Decoder.decode(reader, ctx)?,
            "next" => builder.next = Nullable(ObjectDecoder(IdWrapperBean)).decode(reader, ctx)?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn build(&self, builder: ValueNode) -> Result<ValueNode> {
        Ok(builder)
    }
}

impl BeanEncoder for IdWrapperBean {
    type Bean = IdWrapper;

    fn write_properties(&self, writer: &mut JsonWriter, bean: &IdWrapper, ctx: &mut EncodeContext) -> Result<()> {
        writer.name("node")?;
        NullableEncoder(IdentityEncoder::new(ValueNodeBean, id_wrapper_node_identity()?))
            .encode(writer, &bean.node, ctx)
    }
}

impl BeanEncoder for ValueNodeBean {
    type Bean = ValueNode;

    fn write_properties(&self, writer: &mut JsonWriter, bean: &ValueNode, ctx: &mut EncodeContext) -> Result<()> {
        writer.name("value")?;
        I32Encoder.encode(writer, &bean.value, ctx)?;
        writer.name("next")?;
        NullableEncoder(ObjectEncoder(IdWrapperBean)).encode(writer, &bean.next, ctx)
    }
}

// ---------------------------------------------------------------------------
// Property ids declared on the type

/// Node whose own `customId` property is its id
#[derive(Debug, Default)]
pub struct IdentifiableCustom {
    /// Payload
    pub value: i32,
    /// Id, also a regular property
    pub custom_id: i32,
    /// Next node, possibly itself
    pub next: Option<Ref<IdentifiableCustom>>,
}

/// Members of [`IdentifiableCustom`]
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentifiableCustomBean;

/// Identity of [`IdentifiableCustom`]
pub fn identifiable_custom_identity() -> Result<IdentityInfo> {
    IdentityInfo::property("customId", IdScope::new("IdentifiableCustom"))
}

/// Decoder for [`IdentifiableCustom`] fields and documents
pub fn identifiable_custom_decoder() -> Result<IdentityDecoder<IdentifiableCustomBean>> {
    Ok(IdentityDecoder::new(IdentifiableCustomBean, identifiable_custom_identity()?))
}

/// Encoder for [`IdentifiableCustom`] fields and documents
pub fn identifiable_custom_encoder() -> Result<IdentityEncoder<IdentifiableCustomBean>> {
    Ok(IdentityEncoder::new(IdentifiableCustomBean, identifiable_custom_identity()?))
}

impl BeanDecoder for IdentifiableCustomBean {
    type Bean = IdentifiableCustom;
    type Builder = IdentifiableCustom;

    fn new_builder(&self) -> IdentifiableCustom {
        IdentifiableCustom {
            custom_id: -1,
            ..IdentifiableCustom::default()
        }
    }

    fn decode_property(
        &self,
        builder: &mut IdentifiableCustom,
        name: &str,
        reader: &mut dyn TokenReader,
        ctx: &mut DecodeContext,
    ) -> Result<bool> {
        match name {
            "value" => builder.value = I32Decoder.decode(reader, ctx)?,
            "next" => builder.next = Nullable(identifiable_custom_decoder()?).decode(reader, ctx)?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn assign_id(&self, builder: &mut IdentifiableCustom, id: &IdValue) -> Result<()> {
        builder.custom_id = int_id(id)?;
        Ok(())
    }

    fn build(&self, builder: IdentifiableCustom) -> Result<IdentifiableCustom> {
        Ok(builder)
    }
}

impl BeanEncoder for IdentifiableCustomBean {
    type Bean = IdentifiableCustom;

    fn write_properties(
        &self,
        writer: &mut JsonWriter,
        bean: &IdentifiableCustom,
        ctx: &mut EncodeContext,
    ) -> Result<()> {
        writer.name("value")?;
        I32Encoder.encode(writer, &bean.value, ctx)?;
        writer.name("next")?;
        NullableEncoder(identifiable_custom_encoder()?).encode(writer, &bean.next, ctx)
    }

    fn property_id(&self, bean: &IdentifiableCustom) -> Option<IdValue> {
        Some(IdValue::from(bean.custom_id))
    }
}

// ---------------------------------------------------------------------------
// Property ids declared on a field

/// Wrapper whose `node` field takes its id from the node's `customId`
#[derive(Debug, Default)]
pub struct IdWrapperExt {
    /// Identity-bearing node
    pub node: Option<Ref<ValueNodeExt>>,
}

/// Node reachable through [`IdWrapperExt::node`]
#[derive(Debug, Default)]
pub struct ValueNodeExt {
    /// Payload
    pub value: i32,
    /// Wrapper leading to the next node
    pub next: Option<Rc<IdWrapperExt>>,
    custom_id: i32,
}

impl ValueNodeExt {
    /// Node with the given payload and id
    pub fn new(value: i32, custom_id: i32) -> Self {
        Self {
            value,
            next: None,
            custom_id,
        }
    }

    /// Id, only settable through the identity property
    pub fn custom_id(&self) -> i32 {
        self.custom_id
    }
}

/// Members of [`IdWrapperExt`]
#[derive(Debug, Clone, Copy, Default)]
pub struct IdWrapperExtBean;

/// Members of [`ValueNodeExt`]
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueNodeExtBean;

/// Identity of the `IdWrapperExt.node` field
pub fn id_wrapper_ext_node_identity() -> Result<IdentityInfo> {
    IdentityInfo::property("customId", IdScope::new("IdWrapperExt.node"))
}

impl BeanDecoder for IdWrapperExtBean {
    type Bean = IdWrapperExt;
    type Builder = IdWrapperExt;

    fn new_builder(&self) -> IdWrapperExt {
        IdWrapperExt::default()
    }

    fn decode_property(
        &self,
        builder: &mut IdWrapperExt,
        name: &str,
        reader: &mut dyn TokenReader,
        ctx: &mut DecodeContext,
    ) -> Result<bool> {
        if name != "node" {
            return Ok(false);
        }
        let nodes = Nullable(IdentityDecoder::new(ValueNodeExtBean, id_wrapper_ext_node_identity()?));
        builder.node = nodes.decode(reader, ctx)?;
        Ok(true)
    }

    fn build(&self, builder: IdWrapperExt) -> Result<IdWrapperExt> {
        Ok(builder)
    }
}

impl BeanDecoder for ValueNodeExtBean {
    type Bean = ValueNodeExt;
    type Builder = ValueNodeExt;

    fn new_builder(&self) -> ValueNodeExt {
        ValueNodeExt::default()
    }

    fn decode_property(
        &self,
        builder: &mut ValueNodeExt,
        name: &str,
        reader: &mut dyn TokenReader,
        ctx: &mut DecodeContext,
    ) -> Result<bool> {
        match name {
            "value" => builder.value = I32Decoder.decode(reader, ctx)?,
            "next" => builder.next = Nullable(ObjectDecoder(IdWrapperExtBean)).decode(reader, ctx)?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn assign_id(&self, builder: &mut ValueNodeExt, id: &IdValue) -> Result<()> {
        builder.custom_id = int_id(id)?;
        Ok(())
    }

    fn build(&self, builder: ValueNodeExt) -> Result<ValueNodeExt> {
        Ok(builder)
    }
}

impl BeanEncoder for IdWrapperExtBean {
    type Bean = IdWrapperExt;

    fn write_properties(&self, writer: &mut JsonWriter, bean: &IdWrapperExt, ctx: &mut EncodeContext) -> Result<()> {
        writer.name("node")?;
        NullableEncoder(IdentityEncoder::new(ValueNodeExtBean, id_wrapper_ext_node_identity()?))
            .encode(writer, &bean.node, ctx)
    }
}

impl BeanEncoder for ValueNodeExtBean {
    type Bean = ValueNodeExt;

    fn write_properties(&self, writer: &mut JsonWriter, bean: &ValueNodeExt, ctx: &mut EncodeContext) -> Result<()> {
        writer.name("value")?;
        I32Encoder.encode(writer, &bean.value, ctx)?;
        writer.name("next")?;
        NullableEncoder(ObjectEncoder(IdWrapperExtBean)).encode(writer, &bean.next, ctx)
    }

    fn property_id(&self, bean: &ValueNodeExt) -> Option<IdValue> {
        Some(IdValue::from(bean.custom_id))
    }
}
