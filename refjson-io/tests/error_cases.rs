//! Limit and malformed-input handling through the high-level API

use refjson_codec::decode::{I64Decoder, ListDecoder, StringDecoder};
use refjson_io::{decode_str, DecodeOptions, Error, Limits};
use refjson_test_utils::fixtures::identifiable_decoder;
use refjson_test_utils::init_tracing;

fn with_limits(limits: Limits) -> DecodeOptions {
    DecodeOptions {
        limits,
        ..DecodeOptions::default()
    }
}

fn nested_chain(levels: usize) -> String {
    let mut text = String::new();
    for id in 1..=levels {
        text.push_str(&format!(r#"{{"id":{id},"value":0,"next":"#));
    }
    text.push_str("null");
    text.push_str(&"}".repeat(levels));
    text
}

#[test]
fn self_nesting_beyond_depth_limit() {
    init_tracing();
    let text = nested_chain(10);

    let decoder = identifiable_decoder().expect("identity config");
    assert!(decode_str(&text, &decoder, DecodeOptions::default()).is_ok());

    let shallow = with_limits(Limits {
        max_depth: 4,
        ..Limits::default()
    });
    assert!(matches!(
        decode_str(&text, &decoder, shallow),
        Err(Error::LimitExceeded(_))
    ));
}

#[test]
fn nesting_at_hard_maximum_depth() {
    init_tracing();
    let decoder = identifiable_decoder().expect("identity config");
    let hard = Limits::hard_maximums();
    let levels = hard.max_depth;

    let root = decode_str(&nested_chain(levels), &decoder, with_limits(hard.clone()))
        .expect("decode at hard maximum")
        .get()
        .expect("root");
    let mut depth = 1;
    let mut node = root;
    while let Some(next) = node.next.as_ref().and_then(|r| r.get()) {
        node = next;
        depth += 1;
    }
    assert_eq!(depth, levels);

    assert!(matches!(
        decode_str(&nested_chain(levels + 1), &decoder, with_limits(hard)),
        Err(Error::LimitExceeded(_))
    ));
}

#[test]
fn binding_limit() {
    init_tracing();
    let decoder = ListDecoder(identifiable_decoder().expect("identity config"));
    let text = r#"[{"id":1,"value":0,"next":null},{"id":2,"value":0,"next":null},3]"#;

    let tight = with_limits(Limits {
        max_bindings: 2,
        ..Limits::default()
    });
    assert!(matches!(
        decode_str(text, &decoder, tight),
        Err(Error::LimitExceeded(_))
    ));
}

#[test]
fn string_limit() {
    init_tracing();
    let tight = with_limits(Limits {
        max_string_len: 4,
        ..Limits::default()
    });
    assert_eq!(
        decode_str(r#""abcd""#, &StringDecoder, tight.clone()).expect("at limit"),
        "abcd"
    );
    assert!(matches!(
        decode_str(r#""abcde""#, &StringDecoder, tight),
        Err(Error::LimitExceeded(_))
    ));
}

#[test]
fn limits_above_hard_maximum_are_configuration_errors() {
    let opts = with_limits(Limits {
        max_depth: Limits::hard_maximums().max_depth + 1,
        ..Limits::default()
    });
    assert!(matches!(
        decode_str("1", &I64Decoder, opts),
        Err(Error::Configuration(_))
    ));
}

#[test]
fn syntax_errors() {
    init_tracing();
    for text in ["[1,]", "[1 2]", "{\"a\" 1}", "[01]", "", "[1"] {
        let result = decode_str(text, &ListDecoder(I64Decoder), DecodeOptions::default());
        assert!(result.is_err(), "{text:?} should be rejected");
    }
}
