//! Property-based tests for the tokenizer and writer

use proptest::prelude::*;
use refjson_format::{JsonReader, JsonWriter, TokenKind, TokenReader};
use serde_json::{Map, Number, Value};

fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| Value::Number(n.into())),
        "[a-zA-Z0-9 \"\\\\/\n\té]{0,12}".prop_map(Value::String),
    ];
    leaf.prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::vec(("[a-z]{1,6}", inner), 0..6).prop_map(|members| {
                let mut map = Map::new();
                for (k, v) in members {
                    map.insert(k, v);
                }
                Value::Object(map)
            }),
        ]
    })
}

fn read_value(reader: &mut JsonReader<'_>) -> refjson_format::Result<Value> {
    Ok(match reader.peek()? {
        TokenKind::BeginObject => {
            reader.begin_object()?;
            let mut map = Map::new();
            while reader.peek()? != TokenKind::EndObject {
                let name = reader.next_name()?;
                let value = read_value(reader)?;
                map.insert(name, value);
            }
            reader.end_object()?;
            Value::Object(map)
        }
        TokenKind::BeginArray => {
            reader.begin_array()?;
            let mut items = Vec::new();
            while reader.peek()? != TokenKind::EndArray {
                items.push(read_value(reader)?);
            }
            reader.end_array()?;
            Value::Array(items)
        }
        TokenKind::String => Value::String(reader.next_string()?),
        TokenKind::Number => Value::Number(Number::from(reader.next_i64()?)),
        TokenKind::Bool => Value::Bool(reader.next_bool()?),
        TokenKind::Null => {
            reader.next_null()?;
            Value::Null
        }
        other => panic!("unexpected token {other}"),
    })
}

fn write_value(writer: &mut JsonWriter, value: &Value) -> refjson_format::Result<()> {
    match value {
        Value::Null => writer.null(),
        Value::Bool(b) => writer.bool(*b),
        Value::Number(n) => writer.i64(n.as_i64().expect("integer fixture")),
        Value::String(s) => writer.string(s),
        Value::Array(items) => {
            writer.begin_array()?;
            for item in items {
                write_value(writer, item)?;
            }
            writer.end_array()
        }
        Value::Object(map) => {
            writer.begin_object()?;
            for (k, v) in map {
                writer.name(k)?;
                write_value(writer, v)?;
            }
            writer.end_object()
        }
    }
}

proptest! {
    #[test]
    fn tokens_rebuild_serde_json_documents(value in arb_json()) {
        let text = serde_json::to_string_pretty(&value).unwrap();
        let mut reader = JsonReader::new(&text);
        let rebuilt = read_value(&mut reader).unwrap();
        reader.end_document().unwrap();
        prop_assert_eq!(rebuilt, value);
    }

    #[test]
    fn skip_value_consumes_whole_document(value in arb_json()) {
        let text = serde_json::to_string(&value).unwrap();
        let mut reader = JsonReader::new(&text);
        reader.skip_value().unwrap();
        prop_assert!(reader.end_document().is_ok());
    }

    #[test]
    fn writer_output_parses_back(value in arb_json()) {
        let mut writer = JsonWriter::new();
        write_value(&mut writer, &value).unwrap();
        let text = writer.into_string().unwrap();
        let parsed: Value = serde_json::from_str(&text).unwrap();
        prop_assert_eq!(parsed, value);
    }
}
