//! Map abstract schema type tags to concrete sized primitives.
//!
//! The wire vocabulary is twelve scalar tags: unsigned `U1`/`U2`/`U4`,
//! signed `I1`/`I2`/`I4`/`I8`, bit-pattern `X1`/`X2`/`X4` (aliased to the
//! unsigned integer of their width), and IEEE floats `R4`/`R8`.

use crate::schema::DataType;

/// Concrete sized primitive kind a schema tag resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimKind {
    U8,
    U16,
    U32,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
}

impl PrimKind {
    pub fn size_bytes(self) -> usize {
        match self {
            PrimKind::U8 | PrimKind::I8 => 1,
            PrimKind::U16 | PrimKind::I16 => 2,
            PrimKind::U32 | PrimKind::I32 | PrimKind::F32 => 4,
            PrimKind::I64 | PrimKind::F64 => 8,
        }
    }

    pub fn bit_width(self) -> u32 {
        self.size_bytes() as u32 * 8
    }

    pub fn is_float(self) -> bool {
        matches!(self, PrimKind::F32 | PrimKind::F64)
    }

    pub fn is_signed(self) -> bool {
        matches!(
            self,
            PrimKind::I8 | PrimKind::I16 | PrimKind::I32 | PrimKind::I64
        )
    }

    /// Name of the primitive in generated-source terms ("u8", "f64", ...).
    pub fn name(self) -> &'static str {
        match self {
            PrimKind::U8 => "u8",
            PrimKind::U16 => "u16",
            PrimKind::U32 => "u32",
            PrimKind::I8 => "i8",
            PrimKind::I16 => "i16",
            PrimKind::I32 => "i32",
            PrimKind::I64 => "i64",
            PrimKind::F32 => "f32",
            PrimKind::F64 => "f64",
        }
    }
}

/// Resolve a scalar tag to its primitive kind.
///
/// Unknown tags are NOT an error: they deliberately fall back to a 1-byte
/// unsigned kind. Callers compiling a schema that uses a tag from a newer
/// protocol revision get a 1-byte placeholder field rather than a failure,
/// which silently changes the field's effective size; the fallback is part
/// of the compilation contract and is asserted by tests.
pub fn primitive_kind(tag: &str) -> PrimKind {
    match tag {
        "U1" | "X1" => PrimKind::U8,
        "U2" | "X2" => PrimKind::U16,
        "U4" | "X4" => PrimKind::U32,
        "I1" => PrimKind::I8,
        "I2" => PrimKind::I16,
        "I4" => PrimKind::I32,
        "I8" => PrimKind::I64,
        "R4" => PrimKind::F32,
        "R8" => PrimKind::F64,
        _ => PrimKind::U8,
    }
}

/// Byte size of a scalar tag (1 for unknown tags, same fallback as
/// [`primitive_kind`]).
pub fn scalar_size(tag: &str) -> usize {
    primitive_kind(tag).size_bytes()
}

/// A data type resolved to its primitive kind and element count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedType {
    pub kind: PrimKind,
    /// `Some(n)` for `{array_of, count}` types, `None` for scalars.
    pub count: Option<usize>,
}

impl ResolvedType {
    pub fn size_bytes(&self) -> usize {
        self.kind.size_bytes() * self.count.unwrap_or(1)
    }

    pub fn is_array(&self) -> bool {
        self.count.is_some()
    }
}

/// Resolve a schema data type (scalar or array) to kind + count.
pub fn resolve(data_type: &DataType) -> ResolvedType {
    match data_type {
        DataType::Scalar(tag) => ResolvedType {
            kind: primitive_kind(tag),
            count: None,
        },
        DataType::Array { elem, count } => ResolvedType {
            kind: primitive_kind(elem),
            count: Some(*count),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_tags_map_to_sized_kinds() {
        assert_eq!(primitive_kind("U1"), PrimKind::U8);
        assert_eq!(primitive_kind("U2"), PrimKind::U16);
        assert_eq!(primitive_kind("U4"), PrimKind::U32);
        assert_eq!(primitive_kind("I8"), PrimKind::I64);
        assert_eq!(primitive_kind("R4"), PrimKind::F32);
        assert_eq!(primitive_kind("R8"), PrimKind::F64);
    }

    #[test]
    fn bit_pattern_tags_alias_unsigned() {
        assert_eq!(primitive_kind("X1"), PrimKind::U8);
        assert_eq!(primitive_kind("X2"), PrimKind::U16);
        assert_eq!(primitive_kind("X4"), PrimKind::U32);
    }

    #[test]
    fn unknown_tag_defaults_to_one_byte_unsigned() {
        // Documented fallback, not an error.
        assert_eq!(primitive_kind("U3"), PrimKind::U8);
        assert_eq!(primitive_kind("Z9"), PrimKind::U8);
        assert_eq!(scalar_size("whatever"), 1);
    }

    #[test]
    fn array_size_is_element_times_count() {
        let r = resolve(&DataType::Array {
            elem: "U2".to_string(),
            count: 6,
        });
        assert_eq!(r.kind, PrimKind::U16);
        assert_eq!(r.size_bytes(), 12);
    }
}
