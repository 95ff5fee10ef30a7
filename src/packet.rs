//! Assemble a message schema into an immutable record layout.
//!
//! One pass over the declared field list: resolve the version override,
//! map the type, derive bit accessors and enum domains where marked, and
//! accumulate offsets. Declared order is wire order and is never
//! reordered, sorted, or deduplicated.

use crate::bitfield::BitfieldLayout;
use crate::enums::EnumDomain;
use crate::ident;
use crate::schema::{FieldKind, MessageSchema};
use crate::types::{self, PrimKind};
use crate::version::{self, ProtocolGroup};

#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("message {message}: declared payload length {declared} != computed {computed}")]
    PayloadLengthMismatch {
        message: String,
        declared: usize,
        computed: usize,
    },
}

/// One field of a compiled record: resolved representation plus the
/// decode-transform chain (bit accessors -> enum domain -> scale).
#[derive(Debug, Clone)]
pub struct CompiledField {
    /// snake_case identifier derived from the schema field name.
    pub name: String,
    pub kind: PrimKind,
    /// Element count for array fields.
    pub count: Option<usize>,
    pub size_bytes: usize,
    /// Byte offset from the start of the payload.
    pub offset: usize,
    pub reserved: bool,
    pub bits: Option<BitfieldLayout>,
    pub enum_domain: Option<EnumDomain>,
    pub scale: Option<f64>,
    pub description: Option<String>,
}

impl CompiledField {
    pub fn is_array(&self) -> bool {
        self.count.is_some()
    }

    /// Apply the scale step: stored integer × multiplier.
    pub fn scaled(&self, raw: f64) -> Option<f64> {
        self.scale.map(|m| raw * m)
    }
}

/// A complete record layout for one (message, protocol group) pair.
/// Immutable after assembly.
#[derive(Debug, Clone)]
pub struct CompiledRecord {
    /// PascalCase identifier derived from the message name.
    pub name: String,
    pub class_id: u8,
    pub message_id: u8,
    pub group: Option<ProtocolGroup>,
    pub fields: Vec<CompiledField>,
    /// Sum of resolved field sizes; the frame header length value.
    pub payload_len: usize,
    pub description: Option<String>,
}

impl CompiledRecord {
    pub fn field(&self, name: &str) -> Option<&CompiledField> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Compile one message for one target group (or the base definition when
/// `group` is `None`).
pub fn compile(
    schema: &MessageSchema,
    group: Option<ProtocolGroup>,
) -> Result<CompiledRecord, CompileError> {
    let record_name = ident::pascal_case(&schema.name);
    let mut fields = Vec::with_capacity(schema.fields.len());
    let mut offset = 0usize;

    for field in &schema.fields {
        let resolution = version::resolve(field, group);
        let resolved = types::resolve(&resolution.data_type);
        let size_bytes = resolution.size_override.unwrap_or_else(|| resolved.size_bytes());
        let field_ident = ident::snake_case(&field.name);

        // Accessor retention depends on the resolved width: an override
        // that narrows the field changes which bit ranges survive.
        let (bits, enum_domain) = match &field.kind {
            FieldKind::Plain => (None, None),
            FieldKind::Bitfield(spec) => (
                Some(BitfieldLayout::compile(spec, resolved.kind.bit_width())),
                None,
            ),
            FieldKind::Enum(spec) => {
                let fallback = format!("{}{}", record_name, ident::pascal_case(&field.name));
                (None, Some(EnumDomain::compile(spec, &fallback)))
            }
        };

        fields.push(CompiledField {
            name: field_ident,
            kind: resolved.kind,
            count: resolved.count,
            size_bytes,
            offset,
            reserved: field.reserved,
            bits,
            enum_domain,
            scale: field.scale,
            description: field.description.clone(),
        });
        offset += size_bytes;
    }

    let payload_len = offset;
    // The declared length is only meaningful against the base layout;
    // group overrides legitimately change the total.
    if group.is_none() {
        if let Some(declared) = schema.declared_len {
            if declared != payload_len {
                return Err(CompileError::PayloadLengthMismatch {
                    message: schema.name.clone(),
                    declared,
                    computed: payload_len,
                });
            }
        }
    }

    Ok(CompiledRecord {
        name: record_name,
        class_id: schema.class_id,
        message_id: schema.message_id,
        group,
        fields,
        payload_len,
        description: schema.description.clone(),
    })
}
