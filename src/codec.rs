//! Encode/decode record payloads against a compiled layout.
//!
//! Multi-byte integers and floats are little-endian; byte arrays are raw.
//! Decoding also exposes per-field views that apply the transform chain
//! (bit decomposition, enum mapping, scale).

use crate::bitfield::BitValue;
use crate::enums::EnumCase;
use crate::packet::{CompiledField, CompiledRecord};
use crate::types::PrimKind;
use crate::value::FieldValue;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::Cursor;

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),
    #[error("field {field}: expected a {expected} value")]
    TypeMismatch { field: String, expected: &'static str },
    #[error("field {field}: expected {expected} array elements, got {got}")]
    ArrayLength {
        field: String,
        expected: usize,
        got: usize,
    },
    #[error("expected {expected} field values, got {got}")]
    ValueCount { expected: usize, got: usize },
    #[error("payload is {got} bytes, record layout is {expected}")]
    PayloadLength { expected: usize, got: usize },
}

/// Serialize one value per compiled field, in wire order.
pub fn encode_payload(
    record: &CompiledRecord,
    values: &[FieldValue],
) -> Result<Vec<u8>, CodecError> {
    if values.len() != record.fields.len() {
        return Err(CodecError::ValueCount {
            expected: record.fields.len(),
            got: values.len(),
        });
    }
    let mut out = Vec::with_capacity(record.payload_len);
    for (field, value) in record.fields.iter().zip(values) {
        encode_field(&mut out, field, value)?;
    }
    Ok(out)
}

fn encode_field(
    out: &mut Vec<u8>,
    field: &CompiledField,
    value: &FieldValue,
) -> Result<(), CodecError> {
    match field.count {
        Some(count) => {
            let items = value.as_array().ok_or_else(|| CodecError::TypeMismatch {
                field: field.name.clone(),
                expected: "array",
            })?;
            if items.len() != count {
                return Err(CodecError::ArrayLength {
                    field: field.name.clone(),
                    expected: count,
                    got: items.len(),
                });
            }
            for item in items {
                encode_scalar(out, field, item)?;
            }
            Ok(())
        }
        None => encode_scalar(out, field, value),
    }
}

fn encode_scalar(
    out: &mut Vec<u8>,
    field: &CompiledField,
    value: &FieldValue,
) -> Result<(), CodecError> {
    let mismatch = || CodecError::TypeMismatch {
        field: field.name.clone(),
        expected: field.kind.name(),
    };
    match (field.kind, value) {
        (PrimKind::U8, FieldValue::U8(x)) => out.write_u8(*x)?,
        (PrimKind::U16, FieldValue::U16(x)) => out.write_u16::<LittleEndian>(*x)?,
        (PrimKind::U32, FieldValue::U32(x)) => out.write_u32::<LittleEndian>(*x)?,
        (PrimKind::I8, FieldValue::I8(x)) => out.write_i8(*x)?,
        (PrimKind::I16, FieldValue::I16(x)) => out.write_i16::<LittleEndian>(*x)?,
        (PrimKind::I32, FieldValue::I32(x)) => out.write_i32::<LittleEndian>(*x)?,
        (PrimKind::I64, FieldValue::I64(x)) => out.write_i64::<LittleEndian>(*x)?,
        (PrimKind::F32, FieldValue::F32(x)) => out.write_f32::<LittleEndian>(*x)?,
        (PrimKind::F64, FieldValue::F64(x)) => out.write_f64::<LittleEndian>(*x)?,
        _ => return Err(mismatch()),
    }
    Ok(())
}

/// Decode a payload back into one raw value per field. The payload must be
/// exactly the record's computed length.
pub fn decode_payload(
    record: &CompiledRecord,
    bytes: &[u8],
) -> Result<Vec<FieldValue>, CodecError> {
    if bytes.len() != record.payload_len {
        return Err(CodecError::PayloadLength {
            expected: record.payload_len,
            got: bytes.len(),
        });
    }
    let mut cursor = Cursor::new(bytes);
    let mut out = Vec::with_capacity(record.fields.len());
    for field in &record.fields {
        out.push(decode_field(&mut cursor, field)?);
    }
    Ok(out)
}

fn decode_field(r: &mut Cursor<&[u8]>, field: &CompiledField) -> Result<FieldValue, CodecError> {
    match field.count {
        Some(count) => {
            let mut items = Vec::with_capacity(count);
            for _ in 0..count {
                items.push(decode_scalar(r, field.kind)?);
            }
            Ok(FieldValue::Array(items))
        }
        None => decode_scalar(r, field.kind),
    }
}

fn decode_scalar(r: &mut Cursor<&[u8]>, kind: PrimKind) -> Result<FieldValue, CodecError> {
    Ok(match kind {
        PrimKind::U8 => FieldValue::U8(r.read_u8()?),
        PrimKind::U16 => FieldValue::U16(r.read_u16::<LittleEndian>()?),
        PrimKind::U32 => FieldValue::U32(r.read_u32::<LittleEndian>()?),
        PrimKind::I8 => FieldValue::I8(r.read_i8()?),
        PrimKind::I16 => FieldValue::I16(r.read_i16::<LittleEndian>()?),
        PrimKind::I32 => FieldValue::I32(r.read_i32::<LittleEndian>()?),
        PrimKind::I64 => FieldValue::I64(r.read_i64::<LittleEndian>()?),
        PrimKind::F32 => FieldValue::F32(r.read_f32::<LittleEndian>()?),
        PrimKind::F64 => FieldValue::F64(r.read_f64::<LittleEndian>()?),
    })
}

/// A decoded field with its transform chain applied.
#[derive(Debug)]
pub struct FieldView<'a> {
    pub field: &'a CompiledField,
    pub raw: FieldValue,
    /// Accessor values for bitfield-marked fields, in retained order.
    pub bits: Vec<(&'a str, BitValue)>,
    /// Declared variant or reserved case for enum-marked fields.
    pub enum_case: Option<EnumCase<'a>>,
    /// Stored integer × multiplier for scaled fields.
    pub scaled: Option<f64>,
}

/// Decode a payload and apply each field's transform chain.
pub fn decode_views<'a>(
    record: &'a CompiledRecord,
    bytes: &[u8],
) -> Result<Vec<FieldView<'a>>, CodecError> {
    let raws = decode_payload(record, bytes)?;
    let mut out = Vec::with_capacity(raws.len());
    for (field, raw) in record.fields.iter().zip(raws) {
        let raw_int = raw.raw_bits();
        let bits = match (&field.bits, raw_int) {
            (Some(layout), Some(n)) => layout
                .accessors
                .iter()
                .map(|a| (a.name.as_str(), a.decode(n)))
                .collect(),
            _ => Vec::new(),
        };
        let enum_case = match (&field.enum_domain, raw_int) {
            (Some(domain), Some(n)) => Some(domain.decode(n)),
            _ => None,
        };
        let scaled = field.scale.and_then(|m| {
            raw.as_i64()
                .map(|n| n as f64)
                .or_else(|| raw.as_f64())
                .map(|x| x * m)
        });
        out.push(FieldView {
            field,
            raw,
            bits,
            enum_case,
            scaled,
        });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::parse_message;
    use crate::packet;

    fn compiled(source: &str) -> CompiledRecord {
        packet::compile(&parse_message(source).expect("parse"), None).expect("compile")
    }

    #[test]
    fn encode_is_little_endian_in_field_order() {
        let record = compiled(
            r#"{"name": "M", "class_id": 1, "message_id": 2, "fields": [
                {"name": "a", "data_type": "U2"},
                {"name": "b", "data_type": "I4"},
                {"name": "c", "data_type": {"array_of": "U1", "count": 2}}
            ]}"#,
        );
        let payload = encode_payload(
            &record,
            &[
                FieldValue::U16(0x1234),
                FieldValue::I32(-2),
                FieldValue::Array(vec![FieldValue::U8(0xAA), FieldValue::U8(0xBB)]),
            ],
        )
        .expect("encode");
        assert_eq!(payload, vec![0x34, 0x12, 0xFE, 0xFF, 0xFF, 0xFF, 0xAA, 0xBB]);
    }

    #[test]
    fn decode_reverses_encode() {
        let record = compiled(
            r#"{"name": "M", "class_id": 1, "message_id": 2, "fields": [
                {"name": "x", "data_type": "R4"},
                {"name": "y", "data_type": "I8"}
            ]}"#,
        );
        let values = vec![FieldValue::F32(123.5), FieldValue::I64(-7)];
        let payload = encode_payload(&record, &values).expect("encode");
        let decoded = decode_payload(&record, &payload).expect("decode");
        assert_eq!(decoded, values);
    }

    #[test]
    fn wrong_value_shape_is_an_error() {
        let record = compiled(
            r#"{"name": "M", "class_id": 1, "message_id": 2, "fields": [
                {"name": "x", "data_type": "U2"}
            ]}"#,
        );
        let err = encode_payload(&record, &[FieldValue::U8(1)]).unwrap_err();
        assert!(matches!(err, CodecError::TypeMismatch { .. }));
        let err = encode_payload(&record, &[]).unwrap_err();
        assert!(matches!(err, CodecError::ValueCount { expected: 1, got: 0 }));
    }

    #[test]
    fn short_payload_is_an_error() {
        let record = compiled(
            r#"{"name": "M", "class_id": 1, "message_id": 2, "fields": [
                {"name": "x", "data_type": "U4"}
            ]}"#,
        );
        let err = decode_payload(&record, &[0x01, 0x02]).unwrap_err();
        assert!(matches!(err, CodecError::PayloadLength { expected: 4, got: 2 }));
    }

    #[test]
    fn views_apply_scale_bitfield_and_enum() {
        let record = compiled(
            r#"{"name": "M", "class_id": 1, "message_id": 2, "fields": [
                {"name": "speed", "data_type": "U2", "scale": {"multiplier": 0.01}},
                {"name": "flags", "data_type": "X1",
                 "bitfield": {"bits": [
                    {"name": "valid", "bit_start": 0, "bit_end": 0},
                    {"name": "mode", "bit_start": 1, "bit_end": 3}
                 ]}},
                {"name": "fix", "data_type": "U1",
                 "enumeration": {"values": [{"name": "none", "value": 0}, {"name": "ok", "value": 1}]}}
            ]}"#,
        );
        let payload = encode_payload(
            &record,
            &[
                FieldValue::U16(12345),
                FieldValue::U8(0b0000_1011),
                FieldValue::U8(9),
            ],
        )
        .expect("encode");
        let views = decode_views(&record, &payload).expect("views");

        assert_eq!(views[0].scaled, Some(123.45));
        assert_eq!(
            views[1].bits,
            vec![("valid", BitValue::Flag(true)), ("mode", BitValue::Uint(5))]
        );
        assert_eq!(views[2].enum_case, Some(EnumCase::Reserved(9)));
    }
}
