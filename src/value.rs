//! Runtime field values for encoding/decoding generated records.

/// A single field value: one sized scalar, or a fixed array of scalars.
#[derive(Debug, Clone)]
pub enum FieldValue {
    U8(u8),
    U16(u16),
    U32(u32),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    Array(Vec<FieldValue>),
}

impl FieldValue {
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            FieldValue::U8(x) => Some(*x as u64),
            FieldValue::U16(x) => Some(*x as u64),
            FieldValue::U32(x) => Some(*x as u64),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::I8(x) => Some(*x as i64),
            FieldValue::I16(x) => Some(*x as i64),
            FieldValue::I32(x) => Some(*x as i64),
            FieldValue::I64(x) => Some(*x),
            FieldValue::U8(x) => Some(*x as i64),
            FieldValue::U16(x) => Some(*x as i64),
            FieldValue::U32(x) => Some(*x as i64),
            _ => None,
        }
    }

    /// The raw bit pattern of an integer value, reinterpreting signed
    /// values as unsigned. Used for bitfield decomposition and enum
    /// matching on bit-pattern typed fields.
    pub fn raw_bits(&self) -> Option<u64> {
        match self {
            FieldValue::U8(x) => Some(*x as u64),
            FieldValue::U16(x) => Some(*x as u64),
            FieldValue::U32(x) => Some(*x as u64),
            FieldValue::I8(x) => Some(*x as u8 as u64),
            FieldValue::I16(x) => Some(*x as u16 as u64),
            FieldValue::I32(x) => Some(*x as u32 as u64),
            FieldValue::I64(x) => Some(*x as u64),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::F32(x) => Some(*x as f64),
            FieldValue::F64(x) => Some(*x),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[FieldValue]> {
        match self {
            FieldValue::Array(v) => Some(v),
            _ => None,
        }
    }
}

/// Round-trip equality is bit-exact: floats compare by bit pattern so NaN
/// payloads and signed zeros survive the assertion.
impl PartialEq for FieldValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FieldValue::U8(a), FieldValue::U8(b)) => a == b,
            (FieldValue::U16(a), FieldValue::U16(b)) => a == b,
            (FieldValue::U32(a), FieldValue::U32(b)) => a == b,
            (FieldValue::I8(a), FieldValue::I8(b)) => a == b,
            (FieldValue::I16(a), FieldValue::I16(b)) => a == b,
            (FieldValue::I32(a), FieldValue::I32(b)) => a == b,
            (FieldValue::I64(a), FieldValue::I64(b)) => a == b,
            (FieldValue::F32(a), FieldValue::F32(b)) => a.to_bits() == b.to_bits(),
            (FieldValue::F64(a), FieldValue::F64(b)) => a.to_bits() == b.to_bits(),
            (FieldValue::Array(a), FieldValue::Array(b)) => a == b,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_equality_is_bitwise() {
        assert_eq!(FieldValue::F32(f32::NAN), FieldValue::F32(f32::NAN));
        assert_ne!(FieldValue::F64(0.0), FieldValue::F64(-0.0));
    }

    #[test]
    fn raw_bits_reinterprets_signed() {
        assert_eq!(FieldValue::I8(-1).raw_bits(), Some(0xFF));
        assert_eq!(FieldValue::I16(-2).raw_bits(), Some(0xFFFE));
        assert_eq!(FieldValue::F32(1.0).raw_bits(), None);
    }
}
