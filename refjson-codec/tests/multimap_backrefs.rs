//! Multimap decoding through bean fields, back-reference delivery and error passthrough

use std::rc::Rc;

use refjson_codec::backref::{holder_of, Backlinks, Holder};
use refjson_codec::decode::{I32KeyDecoder, I64Decoder, Nullable, StringKeyDecoder};
use refjson_codec::encode::{DisplayKeyEncoder, I64Encoder};
use refjson_codec::{
    BeanDecoder, DecodeContext, EncodeContext, Error, IdScope, IdentityDecoder, IdentityInfo,
    JsonReader, JsonWriter, Multimap, MultimapDecoder, MultimapEncoder, ObjectDecoder, Ref,
    Result, TokenReader, ValueDecoder, ValueEncoder,
};

#[derive(Debug)]
struct Child {
    value: i64,
    links: Backlinks,
}

struct ChildDecoder;

impl BeanDecoder for ChildDecoder {
    type Bean = Child;
    type Builder = Option<i64>;

    fn new_builder(&self) -> Option<i64> {
        None
    }

    fn decode_property(
        &self,
        builder: &mut Option<i64>,
        name: &str,
        reader: &mut dyn TokenReader,
        ctx: &mut DecodeContext,
    ) -> Result<bool> {
        if name != "value" {
            return Ok(false);
        }
        *builder = Some(I64Decoder.decode(reader, ctx)?);
        Ok(true)
    }

    fn build(&self, builder: Option<i64>) -> Result<Child> {
        Ok(Child {
            value: builder.unwrap_or_default(),
            links: Backlinks::new(),
        })
    }

    fn accept_back_reference(&self, name: &str, holder: &Holder, bean: &Rc<Child>, _ctx: &mut DecodeContext) {
        bean.links.record(name, holder);
    }
}

type ChildrenDecoder = MultimapDecoder<StringKeyDecoder, ObjectDecoder<ChildDecoder>>;

fn children_decoder() -> ChildrenDecoder {
    MultimapDecoder::builder()
        .key_decoder(StringKeyDecoder)
        .value_decoder(ObjectDecoder(ChildDecoder))
        .build()
        .expect("both decoders set")
}

struct Parent {
    children: Multimap<String, Rc<Child>>,
    spare: Option<Multimap<String, Rc<Child>>>,
}

#[derive(Default)]
struct ParentBuilder {
    children: Option<Multimap<String, Rc<Child>>>,
    spare: Option<Multimap<String, Rc<Child>>>,
}

struct ParentDecoder;

impl BeanDecoder for ParentDecoder {
    type Bean = Parent;
    type Builder = ParentBuilder;

    fn new_builder(&self) -> ParentBuilder {
        ParentBuilder::default()
    }

    fn decode_property(
        &self,
        builder: &mut ParentBuilder,
        name: &str,
        reader: &mut dyn TokenReader,
        ctx: &mut DecodeContext,
    ) -> Result<bool> {
        match name {
            "children" => builder.children = Some(children_decoder().decode(reader, ctx)?),
            "spare" => builder.spare = Nullable(children_decoder()).decode(reader, ctx)?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn build(&self, builder: ParentBuilder) -> Result<Parent> {
        Ok(Parent {
            children: builder.children.unwrap_or_default(),
            spare: builder.spare,
        })
    }

    fn set_back_references(&self, bean: &Rc<Parent>, ctx: &mut DecodeContext) {
        let holder = holder_of(bean);
        children_decoder().set_back_reference("children", &holder, &bean.children, ctx);
        Nullable(children_decoder()).set_back_reference("spare", &holder, &bean.spare, ctx);
    }
}

fn decode_parent(text: &str) -> Result<Rc<Parent>> {
    let mut reader = JsonReader::new(text);
    let mut ctx = DecodeContext::default();
    let parent = ObjectDecoder(ParentDecoder).decode(&mut reader, &mut ctx)?;
    reader.end_document()?;
    ctx.finish()?;
    Ok(parent)
}

#[test]
fn back_reference_reaches_every_value_once() {
    let parent = decode_parent(
        r#"{"children":{"a":[{"value":1},{"value":2}],"b":[{"value":3}]},"spare":null}"#,
    )
    .expect("decode parent");

    assert_eq!(parent.children.len(), 3);
    assert!(parent.spare.is_none());

    for child in parent.children.values() {
        let links = child.links.all();
        assert_eq!(links.len(), 1, "child {} got {links:?}", child.value);
        assert_eq!(links[0].name(), "children");
        assert!(links[0].is_held_by(&parent));
    }

    let values: Vec<i64> = parent.children.values().map(|c| c.value).collect();
    assert_eq!(values, [1, 2, 3]);
}

#[test]
fn back_reference_names_the_field() {
    let parent = decode_parent(r#"{"children":{},"spare":{"x":[{"value":9}]}}"#).expect("decode parent");

    let spare = parent.spare.as_ref().expect("spare present");
    let child = &spare.get("x")[0];
    assert_eq!(child.links.len(), 1);
    assert!(child.links.holder("spare").is_some());
    assert!(child.links.holder("children").is_none());
}

#[test]
fn propagation_is_not_idempotent() {
    let parent = decode_parent(r#"{"children":{"a":[{"value":1}]}}"#).expect("decode parent");
    let holder = holder_of(&parent);
    let mut ctx = DecodeContext::default();

    children_decoder().set_back_reference("children", &holder, &parent.children, &mut ctx);

    let child = &parent.children.get("a")[0];
    assert_eq!(child.links.len(), 2);
}

#[test]
fn null_container_is_none() {
    let mut reader = JsonReader::new("null");
    let mut ctx = DecodeContext::default();
    let decoder = Nullable(children_decoder());
    let value = decoder.decode(&mut reader, &mut ctx).expect("decode null");
    assert!(value.is_none());

    let holder: Holder = Rc::new(());
    decoder.set_back_reference("children", &holder, &value, &mut ctx);
}

#[test]
fn duplicate_values_kept_in_order() {
    let mut reader = JsonReader::new(r#"{"1":[5,5,4],"2":[5]}"#);
    let mut ctx = DecodeContext::default();
    let decoder = MultimapDecoder::new(I32KeyDecoder::new(), I64Decoder);
    let map = decoder.decode(&mut reader, &mut ctx).expect("decode");

    assert_eq!(map.get(&1), &[5, 5, 4]);
    assert_eq!(map.get(&2), &[5]);
    assert_eq!(map.iter().count(), 4);
}

#[test]
fn key_decoder_error_passes_through() {
    let mut reader = JsonReader::new(r#"{"1":[1],"one":[2]}"#);
    let mut ctx = DecodeContext::default();
    let decoder = MultimapDecoder::new(I32KeyDecoder::new(), I64Decoder);

    match decoder.decode(&mut reader, &mut ctx) {
        Err(Error::InvalidKey { key, .. }) => assert_eq!(key, "one"),
        other => panic!("expected invalid key, got {other:?}"),
    }
}

#[test]
fn value_decoder_error_passes_through() {
    let err = decode_parent(r#"{"children":{"a":[{"value":1,"color":"red"}]}}"#)
        .err()
        .expect("unknown member rejected");
    assert!(matches!(err, Error::UnknownProperty { ref name } if name == "color"));
}

#[test]
fn decode_then_encode_keeps_shape() {
    let text = r#"{"a":[1,2],"b":[3],"c":[]}"#;
    let mut reader = JsonReader::new(text);
    let mut ctx = DecodeContext::default();
    let map = MultimapDecoder::new(StringKeyDecoder, I64Decoder)
        .decode(&mut reader, &mut ctx)
        .expect("decode");

    assert_eq!(map.get("a"), &[1, 2]);
    assert_eq!(map.get("b"), &[3]);
    assert!(map.contains_key("c"));

    let mut writer = JsonWriter::new();
    let mut ectx = EncodeContext::default();
    MultimapEncoder::new(DisplayKeyEncoder::<String>::new(), I64Encoder)
        .encode(&mut writer, &map, &mut ectx)
        .expect("encode");
    assert_eq!(writer.into_string().expect("closed"), text);
}

// Identity-bearing values inside a multimap

fn member_decoder() -> IdentityDecoder<ChildDecoder> {
    let identity = IdentityInfo::int_sequence("id", IdScope::new("Member")).expect("identity config");
    IdentityDecoder::new(ChildDecoder, identity)
}

fn roster_decoder() -> MultimapDecoder<StringKeyDecoder, IdentityDecoder<ChildDecoder>> {
    MultimapDecoder::new(StringKeyDecoder, member_decoder())
}

struct Team {
    captain: Option<Ref<Child>>,
    roster: Multimap<String, Ref<Child>>,
}

#[derive(Default)]
struct TeamBuilder {
    captain: Option<Ref<Child>>,
    roster: Option<Multimap<String, Ref<Child>>>,
}

struct TeamDecoder;

impl BeanDecoder for TeamDecoder {
    type Bean = Team;
    type Builder = TeamBuilder;

    fn new_builder(&self) -> TeamBuilder {
        TeamBuilder::default()
    }

    fn decode_property(
        &self,
        builder: &mut TeamBuilder,
        name: &str,
        reader: &mut dyn TokenReader,
        ctx: &mut DecodeContext,
    ) -> Result<bool> {
        match name {
            "captain" => builder.captain = Nullable(member_decoder()).decode(reader, ctx)?,
            "roster" => builder.roster = Some(roster_decoder().decode(reader, ctx)?),
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn build(&self, builder: TeamBuilder) -> Result<Team> {
        Ok(Team {
            captain: builder.captain,
            roster: builder.roster.unwrap_or_default(),
        })
    }

    // Only the roster announces its holder.
    fn set_back_references(&self, bean: &Rc<Team>, ctx: &mut DecodeContext) {
        roster_decoder().set_back_reference("roster", &holder_of(bean), &bean.roster, ctx);
    }
}

fn decode_team(text: &str) -> Result<Rc<Team>> {
    let mut reader = JsonReader::new(text);
    let mut ctx = DecodeContext::default();
    let team = ObjectDecoder(TeamDecoder).decode(&mut reader, &mut ctx)?;
    reader.end_document()?;
    ctx.finish()?;
    Ok(team)
}

fn assert_single_roster_link(team: &Rc<Team>) {
    let captain = team.captain.as_ref().and_then(Ref::get).expect("captain");
    let entry = &team.roster.get("lead")[0];
    assert!(!entry.is_owned());
    assert!(entry.points_to(&captain));

    let links = captain.links.all();
    assert_eq!(links.len(), 1, "captain got {links:?}");
    assert_eq!(links[0].name(), "roster");
    assert!(links[0].is_held_by(team));
}

#[test]
fn bare_id_in_multimap_gets_back_reference() {
    let team = decode_team(r#"{"captain":{"id":1,"value":7},"roster":{"lead":[1]}}"#).expect("decode team");
    assert_single_roster_link(&team);
}

#[test]
fn forward_id_in_multimap_gets_back_reference() {
    let team = decode_team(r#"{"roster":{"lead":[1]},"captain":{"id":1,"value":7}}"#).expect("decode team");
    assert_single_roster_link(&team);
}

#[test]
fn dangling_id_in_multimap_fails_at_finish() {
    let err = decode_team(r#"{"roster":{"lead":[4]}}"#)
        .err()
        .expect("unresolved id rejected");
    assert!(matches!(err, Error::UnresolvedIdentity { pending: 1, .. }));
}
