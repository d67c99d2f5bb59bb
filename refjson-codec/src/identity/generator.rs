//! Id generator policies

use refjson_format::{Error, IdValue, JsonWriter, Result, TokenKind, TokenReader};
use uuid::Uuid;

/// How ids are produced on encode and read back on decode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdGenerator {
    /// Ascending integers per scope, starting at 1 for each encode call
    IntSequence,
    /// Random 128-bit tokens in their textual UUID form
    Uuid,
    /// Value of a designated property of the object (integer or string)
    Property,
}

impl IdGenerator {
    /// Read an id written by this generator, either inside a literal or as a bare reference
    pub fn read_id(&self, reader: &mut dyn TokenReader) -> Result<IdValue> {
        match self {
            IdGenerator::IntSequence => Ok(IdValue::Int(reader.next_i64()?)),
            IdGenerator::Uuid => {
                let text = reader.next_string()?;
                Uuid::parse_str(&text)
                    .map(IdValue::Uuid)
                    .map_err(|_| Error::InvalidValue {
                        expected: "UUID",
                        found: text,
                    })
            }
            IdGenerator::Property => match reader.peek()? {
                TokenKind::Number => Ok(IdValue::Int(reader.next_i64()?)),
                TokenKind::String => Ok(IdValue::Text(reader.next_string()?)),
                found => Err(Error::MalformedInput {
                    expected: "integer or string id",
                    found,
                    offset: reader.offset(),
                }),
            },
        }
    }

    /// Write an id in its wire form
    pub fn write_id(writer: &mut JsonWriter, id: &IdValue) -> Result<()> {
        match id {
            IdValue::Int(v) => writer.i64(*v),
            IdValue::Uuid(v) => writer.string(&v.hyphenated().to_string()),
            IdValue::Text(v) => writer.string(v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use refjson_format::JsonReader;

    #[test]
    fn test_read_sequence_id() {
        let mut reader = JsonReader::new("42");
        assert_eq!(
            IdGenerator::IntSequence.read_id(&mut reader).unwrap(),
            IdValue::Int(42)
        );
    }

    #[test]
    fn test_read_uuid_id() {
        let text = "\"67e55044-10b1-426f-9247-bb680e5fe0c8\"";
        let mut reader = JsonReader::new(text);
        let id = IdGenerator::Uuid.read_id(&mut reader).unwrap();
        assert_eq!(
            id,
            IdValue::Uuid(Uuid::parse_str("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap())
        );
    }

    #[test]
    fn test_read_uuid_rejects_bad_text() {
        let mut reader = JsonReader::new("\"not-a-uuid\"");
        assert!(matches!(
            IdGenerator::Uuid.read_id(&mut reader),
            Err(Error::InvalidValue { expected: "UUID", .. })
        ));
    }

    #[test]
    fn test_sequence_rejects_string() {
        let mut reader = JsonReader::new("\"1\"");
        assert!(matches!(
            IdGenerator::IntSequence.read_id(&mut reader),
            Err(Error::MalformedInput { .. })
        ));
    }

    #[test]
    fn test_property_accepts_int_or_string() {
        let mut reader = JsonReader::new("[3, \"x\", true]");
        reader.begin_array().unwrap();
        assert_eq!(
            IdGenerator::Property.read_id(&mut reader).unwrap(),
            IdValue::Int(3)
        );
        assert_eq!(
            IdGenerator::Property.read_id(&mut reader).unwrap(),
            IdValue::Text("x".to_string())
        );
        assert!(matches!(
            IdGenerator::Property.read_id(&mut reader),
            Err(Error::MalformedInput {
                found: TokenKind::Bool,
                ..
            })
        ));
    }

    #[test]
    fn test_write_ids() {
        let uuid = Uuid::parse_str("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap();
        let mut writer = JsonWriter::new();
        writer.begin_array().unwrap();
        IdGenerator::write_id(&mut writer, &IdValue::Int(1)).unwrap();
        IdGenerator::write_id(&mut writer, &IdValue::Uuid(uuid)).unwrap();
        IdGenerator::write_id(&mut writer, &IdValue::Text("a".into())).unwrap();
        writer.end_array().unwrap();
        assert_eq!(
            writer.into_string().unwrap(),
            r#"[1,"67e55044-10b1-426f-9247-bb680e5fe0c8","a"]"#
        );
    }
}
