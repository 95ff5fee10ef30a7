//! Parse JSON schema objects into the message model.
//!
//! One `build_*` function per node kind, walking the parsed JSON tree.
//! Validation happens here, once: missing required keys fail fast with an
//! error naming the message and the offending field, and the field-kind
//! invariants (unique names, bitfield/enum exclusivity, ordered bit
//! ranges, values within representation width) are enforced before any
//! compiler sees the schema.

use crate::schema::*;
use crate::types;
use crate::version::ProtocolGroup;
use serde_json::Value as Json;
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("schema root must be an object")]
    NotAnObject,
    #[error("message {message}: missing required key `{key}`")]
    MissingKey { message: String, key: &'static str },
    #[error("message {message}: {reason}")]
    Invalid { message: String, reason: String },
    #[error("message {message}, field {field}: missing required key `{key}`")]
    MissingFieldKey {
        message: String,
        field: String,
        key: &'static str,
    },
    #[error("message {message}, field {field}: {reason}")]
    InvalidField {
        message: String,
        field: String,
        reason: String,
    },
}

/// Parse one message schema from JSON source text.
pub fn parse_message(source: &str) -> Result<MessageSchema, SchemaError> {
    let json: Json = serde_json::from_str(source)?;
    message_from_json(&json)
}

/// Build a message schema from an already-parsed JSON value.
pub fn message_from_json(json: &Json) -> Result<MessageSchema, SchemaError> {
    let obj = json.as_object().ok_or(SchemaError::NotAnObject)?;

    let name = obj
        .get("name")
        .and_then(Json::as_str)
        .ok_or(SchemaError::MissingKey {
            message: "<unnamed>".to_string(),
            key: "name",
        })?
        .to_string();

    let class_id = build_id(obj.get("class_id")).ok_or(SchemaError::MissingKey {
        message: name.clone(),
        key: "class_id",
    })?;
    let message_id = build_id(obj.get("message_id")).ok_or(SchemaError::MissingKey {
        message: name.clone(),
        key: "message_id",
    })?;

    let description = obj
        .get("description")
        .and_then(Json::as_str)
        .map(str::to_string);
    let declared_len = obj
        .get("payload_length")
        .and_then(Json::as_u64)
        .map(|n| n as usize);

    let raw_fields = obj
        .get("fields")
        .and_then(Json::as_array)
        .ok_or(SchemaError::MissingKey {
            message: name.clone(),
            key: "fields",
        })?;

    let mut fields = Vec::with_capacity(raw_fields.len());
    let mut seen = HashSet::new();
    for raw in raw_fields {
        let field = build_field(&name, raw)?;
        if !seen.insert(field.name.clone()) {
            return Err(SchemaError::Invalid {
                message: name,
                reason: format!("duplicate field name `{}`", field.name),
            });
        }
        fields.push(field);
    }

    Ok(MessageSchema {
        name,
        class_id,
        message_id,
        description,
        fields,
        declared_len,
    })
}

/// Class/message ids may be JSON integers or hex strings ("0x0A").
fn build_id(v: Option<&Json>) -> Option<u8> {
    match v? {
        Json::Number(n) => n.as_u64().and_then(|x| u8::try_from(x).ok()),
        Json::String(s) => {
            let s = s.trim();
            if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
                u8::from_str_radix(hex, 16).ok()
            } else {
                s.parse().ok()
            }
        }
        _ => None,
    }
}

fn build_field(message: &str, json: &Json) -> Result<Field, SchemaError> {
    let obj = json.as_object().ok_or_else(|| SchemaError::Invalid {
        message: message.to_string(),
        reason: "field entry must be an object".to_string(),
    })?;

    let name = obj
        .get("name")
        .and_then(Json::as_str)
        .ok_or(SchemaError::MissingFieldKey {
            message: message.to_string(),
            field: "<unnamed>".to_string(),
            key: "name",
        })?
        .to_string();

    let data_type = build_data_type(message, &name, obj.get("data_type"))?;

    let bitfield = obj.get("bitfield");
    let enumeration = obj.get("enumeration");
    let kind = match (bitfield, enumeration) {
        (Some(_), Some(_)) => {
            return Err(SchemaError::InvalidField {
                message: message.to_string(),
                field: name,
                reason: "field declares both a bitfield and an enumeration".to_string(),
            })
        }
        (Some(b), None) => FieldKind::Bitfield(build_bitfield(message, &name, b)?),
        (None, Some(e)) => FieldKind::Enum(build_enum(message, &name, e, &data_type)?),
        (None, None) => FieldKind::Plain,
    };

    let scale = match obj.get("scale") {
        Some(s) => Some(
            s.get("multiplier")
                .and_then(Json::as_f64)
                .ok_or(SchemaError::MissingFieldKey {
                    message: message.to_string(),
                    field: name.clone(),
                    key: "scale.multiplier",
                })?,
        ),
        None => None,
    };

    let overrides = build_overrides(message, &name, obj.get("version_specific"))?;
    let reserved = obj.get("reserved").and_then(Json::as_bool).unwrap_or(false);
    let description = obj
        .get("description")
        .and_then(Json::as_str)
        .map(str::to_string);

    Ok(Field {
        name,
        data_type,
        kind,
        scale,
        overrides,
        reserved,
        description,
    })
}

fn build_data_type(
    message: &str,
    field: &str,
    json: Option<&Json>,
) -> Result<DataType, SchemaError> {
    let json = json.ok_or(SchemaError::MissingFieldKey {
        message: message.to_string(),
        field: field.to_string(),
        key: "data_type",
    })?;
    match json {
        Json::String(tag) => Ok(DataType::Scalar(tag.clone())),
        Json::Object(obj) => {
            let elem = obj
                .get("array_of")
                .and_then(Json::as_str)
                .ok_or(SchemaError::MissingFieldKey {
                    message: message.to_string(),
                    field: field.to_string(),
                    key: "data_type.array_of",
                })?
                .to_string();
            let count = obj.get("count").and_then(Json::as_u64).unwrap_or(1) as usize;
            Ok(DataType::Array { elem, count })
        }
        _ => Err(SchemaError::InvalidField {
            message: message.to_string(),
            field: field.to_string(),
            reason: "data_type must be a tag string or {array_of, count}".to_string(),
        }),
    }
}

fn build_bitfield(message: &str, field: &str, json: &Json) -> Result<BitfieldSpec, SchemaError> {
    let raw_bits = json
        .get("bits")
        .and_then(Json::as_array)
        .ok_or(SchemaError::MissingFieldKey {
            message: message.to_string(),
            field: field.to_string(),
            key: "bitfield.bits",
        })?;
    let mut bits = Vec::with_capacity(raw_bits.len());
    for raw in raw_bits {
        let name = raw
            .get("name")
            .and_then(Json::as_str)
            .ok_or(SchemaError::MissingFieldKey {
                message: message.to_string(),
                field: field.to_string(),
                key: "bits[].name",
            })?
            .to_string();
        let bit_start = raw.get("bit_start").and_then(Json::as_u64).unwrap_or(0) as u32;
        let bit_end = raw.get("bit_end").and_then(Json::as_u64).unwrap_or(0) as u32;
        if bit_start > bit_end {
            return Err(SchemaError::InvalidField {
                message: message.to_string(),
                field: field.to_string(),
                reason: format!("bit range `{}`: bit_start {} > bit_end {}", name, bit_start, bit_end),
            });
        }
        bits.push(BitRange {
            name,
            bit_start,
            bit_end,
            reserved: raw.get("reserved").and_then(Json::as_bool).unwrap_or(false),
            description: raw
                .get("description")
                .and_then(Json::as_str)
                .map(str::to_string),
        });
    }
    Ok(BitfieldSpec { bits })
}

fn build_enum(
    message: &str,
    field: &str,
    json: &Json,
    data_type: &DataType,
) -> Result<EnumSpec, SchemaError> {
    let name = json.get("name").and_then(Json::as_str).map(str::to_string);
    let raw_values = json
        .get("values")
        .and_then(Json::as_array)
        .ok_or(SchemaError::MissingFieldKey {
            message: message.to_string(),
            field: field.to_string(),
            key: "enumeration.values",
        })?;

    // Declared values must fit the base representation width.
    let width = types::resolve(data_type).kind.bit_width();
    let max = if width >= 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    };

    let mut values = Vec::with_capacity(raw_values.len());
    for raw in raw_values {
        let value_name = raw
            .get("name")
            .and_then(Json::as_str)
            .ok_or(SchemaError::MissingFieldKey {
                message: message.to_string(),
                field: field.to_string(),
                key: "values[].name",
            })?
            .to_string();
        let value = raw
            .get("value")
            .and_then(Json::as_u64)
            .ok_or(SchemaError::MissingFieldKey {
                message: message.to_string(),
                field: field.to_string(),
                key: "values[].value",
            })?;
        if value > max {
            return Err(SchemaError::InvalidField {
                message: message.to_string(),
                field: field.to_string(),
                reason: format!(
                    "enum value `{}` = {} exceeds the {}-bit representation",
                    value_name, value, width
                ),
            });
        }
        values.push(EnumValue {
            name: value_name,
            value,
            description: raw
                .get("description")
                .and_then(Json::as_str)
                .map(str::to_string),
        });
    }
    Ok(EnumSpec { name, values })
}

fn build_overrides(
    message: &str,
    field: &str,
    json: Option<&Json>,
) -> Result<BTreeMap<ProtocolGroup, FieldOverride>, SchemaError> {
    let mut out = BTreeMap::new();
    let Some(json) = json else {
        return Ok(out);
    };
    let obj = json.as_object().ok_or_else(|| SchemaError::InvalidField {
        message: message.to_string(),
        field: field.to_string(),
        reason: "version_specific must be an object keyed by group name".to_string(),
    })?;
    for (key, raw) in obj {
        // A typo'd group key would silently compile to the base layout
        // everywhere, so unknown keys are rejected rather than skipped.
        let group = ProtocolGroup::from_name(key).ok_or_else(|| SchemaError::InvalidField {
            message: message.to_string(),
            field: field.to_string(),
            reason: format!("unknown protocol group `{}` in version_specific", key),
        })?;
        let data_type = match raw.get("data_type") {
            Some(dt) => Some(build_data_type(message, field, Some(dt))?),
            None => None,
        };
        let size_bytes = raw
            .get("size_bytes")
            .and_then(Json::as_u64)
            .map(|n| n as usize);
        out.insert(group, FieldOverride { data_type, size_bytes });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_message_parses() {
        let schema = parse_message(
            r#"{
                "name": "MON-TEST",
                "class_id": "0x0A",
                "message_id": 9,
                "fields": [
                    {"name": "version", "data_type": "U1"}
                ]
            }"#,
        )
        .expect("parse");
        assert_eq!(schema.name, "MON-TEST");
        assert_eq!(schema.class_id, 0x0A);
        assert_eq!(schema.message_id, 9);
        assert_eq!(schema.fields.len(), 1);
    }

    #[test]
    fn missing_field_name_identifies_message() {
        let err = parse_message(
            r#"{"name": "MON-TEST", "class_id": 1, "message_id": 2,
                "fields": [{"data_type": "U1"}]}"#,
        )
        .unwrap_err();
        let text = err.to_string();
        assert!(text.contains("MON-TEST"), "error should name the message: {}", text);
        assert!(text.contains("name"), "error should name the key: {}", text);
    }

    #[test]
    fn missing_data_type_identifies_field() {
        let err = parse_message(
            r#"{"name": "MON-TEST", "class_id": 1, "message_id": 2,
                "fields": [{"name": "flags"}]}"#,
        )
        .unwrap_err();
        let text = err.to_string();
        assert!(text.contains("flags"));
        assert!(text.contains("data_type"));
    }

    #[test]
    fn bitfield_and_enum_are_mutually_exclusive() {
        let err = parse_message(
            r#"{"name": "M", "class_id": 1, "message_id": 2, "fields": [
                {"name": "x", "data_type": "X1",
                 "bitfield": {"bits": []},
                 "enumeration": {"values": []}}
            ]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::InvalidField { .. }));
    }

    #[test]
    fn duplicate_field_names_rejected() {
        let err = parse_message(
            r#"{"name": "M", "class_id": 1, "message_id": 2, "fields": [
                {"name": "x", "data_type": "U1"},
                {"name": "x", "data_type": "U1"}
            ]}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("duplicate field name"));
    }

    #[test]
    fn inverted_bit_range_rejected() {
        let err = parse_message(
            r#"{"name": "M", "class_id": 1, "message_id": 2, "fields": [
                {"name": "x", "data_type": "X1",
                 "bitfield": {"bits": [{"name": "b", "bit_start": 3, "bit_end": 1}]}}
            ]}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("bit_start"));
    }

    #[test]
    fn enum_value_must_fit_representation() {
        let err = parse_message(
            r#"{"name": "M", "class_id": 1, "message_id": 2, "fields": [
                {"name": "mode", "data_type": "U1",
                 "enumeration": {"values": [{"name": "big", "value": 256}]}}
            ]}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("exceeds"));
    }

    #[test]
    fn unknown_override_group_rejected() {
        let err = parse_message(
            r#"{"name": "M", "class_id": 1, "message_id": 2, "fields": [
                {"name": "x", "data_type": "U4",
                 "version_specific": {"group99": {"data_type": "U2"}}}
            ]}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("group99"));
    }

    #[test]
    fn overrides_parse_into_group_map() {
        let schema = parse_message(
            r#"{"name": "M", "class_id": 1, "message_id": 2, "fields": [
                {"name": "x", "data_type": "U4",
                 "version_specific": {"group14": {"data_type": "U2", "size_bytes": 2}}}
            ]}"#,
        )
        .expect("parse");
        let ov = schema.fields[0]
            .overrides
            .get(&ProtocolGroup::Group14)
            .expect("override");
        assert_eq!(ov.data_type, Some(DataType::Scalar("U2".to_string())));
        assert_eq!(ov.size_bytes, Some(2));
        assert_eq!(schema.override_groups(), vec![ProtocolGroup::Group14]);
    }
}
