//! Input data model: one validated schema object per wire message.
//!
//! The model is deliberately a discriminated union: a field is plain, a
//! bitfield, or an enumeration, and carries only the attributes of its
//! kind. The loader enforces this shape once; the compilers never probe
//! for optional keys.

use crate::version::ProtocolGroup;
use std::collections::BTreeMap;

/// A declarative description of one binary wire message.
///
/// Identity is (class id, message id, name). Field order is wire order.
#[derive(Debug, Clone)]
pub struct MessageSchema {
    pub name: String,
    pub class_id: u8,
    pub message_id: u8,
    pub description: Option<String>,
    pub fields: Vec<Field>,
    /// Consensus payload length from the schema source, if declared.
    /// Cross-checked against the computed length for base compilations.
    pub declared_len: Option<usize>,
}

impl MessageSchema {
    /// All groups for which at least one field carries an override, in
    /// group order. Drives the "compile every overridden group" batch
    /// operation.
    pub fn override_groups(&self) -> Vec<ProtocolGroup> {
        let mut out = Vec::new();
        for g in ProtocolGroup::ALL {
            if self.fields.iter().any(|f| f.overrides.contains_key(&g)) {
                out.push(g);
            }
        }
        out
    }
}

/// One wire field of a message.
#[derive(Debug, Clone)]
pub struct Field {
    pub name: String,
    pub data_type: DataType,
    pub kind: FieldKind,
    /// Decode-side multiplier: stored integer × scale -> engineering value.
    pub scale: Option<f64>,
    pub overrides: BTreeMap<ProtocolGroup, FieldOverride>,
    pub reserved: bool,
    pub description: Option<String>,
}

/// What a field is beyond its raw representation. Bitfield and enumeration
/// are mutually exclusive; the loader rejects a field claiming both.
#[derive(Debug, Clone)]
pub enum FieldKind {
    Plain,
    Bitfield(BitfieldSpec),
    Enum(EnumSpec),
}

/// Scalar tag ("U2", "X4", ...) or fixed-count array of a scalar tag.
///
/// Tags stay raw strings: resolution to a primitive kind happens in
/// [`crate::types`], where unknown tags get their documented 1-byte
/// unsigned fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataType {
    Scalar(String),
    Array { elem: String, count: usize },
}

/// Per-group replacement of a field's base definition.
#[derive(Debug, Clone)]
pub struct FieldOverride {
    pub data_type: Option<DataType>,
    pub size_bytes: Option<usize>,
}

/// Named bit ranges packed into one integer field.
#[derive(Debug, Clone)]
pub struct BitfieldSpec {
    pub bits: Vec<BitRange>,
}

/// One named bit range, inclusive on both ends.
#[derive(Debug, Clone)]
pub struct BitRange {
    pub name: String,
    pub bit_start: u32,
    pub bit_end: u32,
    pub reserved: bool,
    pub description: Option<String>,
}

impl BitRange {
    pub fn width(&self) -> u32 {
        self.bit_end - self.bit_start + 1
    }
}

/// A closed set of named integer values for one field.
#[derive(Debug, Clone)]
pub struct EnumSpec {
    /// Domain name; when absent the compiler derives one from the record
    /// and field names.
    pub name: Option<String>,
    pub values: Vec<EnumValue>,
}

#[derive(Debug, Clone)]
pub struct EnumValue {
    pub name: String,
    pub value: u64,
    pub description: Option<String>,
}
