//! Compile enumeration specs into closed domains with a catch-all case.
//!
//! Every domain carries one synthesized reserved case holding the raw
//! integer, so decoding an enumerated field is total: unmatched values
//! degrade to the catch-all instead of failing. Random generation for
//! round-trip tests draws only the declared values.

use crate::ident;
use crate::schema::EnumSpec;

/// A compiled enumeration domain.
#[derive(Debug, Clone)]
pub struct EnumDomain {
    pub name: String,
    pub variants: Vec<EnumVariant>,
}

/// One declared variant: normalized identifier plus discriminant.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumVariant {
    pub ident: String,
    pub value: u64,
    pub description: Option<String>,
}

/// Decoding result: a declared variant, or the reserved case with the raw
/// integer that matched nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EnumCase<'a> {
    Declared(&'a EnumVariant),
    Reserved(u64),
}

impl EnumDomain {
    /// Derive a domain from a spec. `fallback_name` is used when the spec
    /// carries no name of its own (record ident + field ident, the way the
    /// accessor structs are named).
    pub fn compile(spec: &EnumSpec, fallback_name: &str) -> EnumDomain {
        let name = spec
            .name
            .as_deref()
            .map(ident::pascal_case)
            .unwrap_or_else(|| fallback_name.to_string());
        let variants = spec
            .values
            .iter()
            .map(|v| EnumVariant {
                ident: ident::enum_variant(&v.name),
                value: v.value,
                description: v.description.clone(),
            })
            .collect();
        EnumDomain { name, variants }
    }

    /// Total decode: the first declared variant with a matching value, or
    /// the reserved case carrying `raw`.
    pub fn decode(&self, raw: u64) -> EnumCase<'_> {
        self.variants
            .iter()
            .find(|v| v.value == raw)
            .map(EnumCase::Declared)
            .unwrap_or(EnumCase::Reserved(raw))
    }

    /// The declared (non-catch-all) values, in declared order. This is the
    /// set random generators draw from so round-trips always hit a
    /// declared case.
    pub fn declared_values(&self) -> Vec<u64> {
        self.variants.iter().map(|v| v.value).collect()
    }
}
