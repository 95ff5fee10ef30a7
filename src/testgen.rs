//! Derive round-trip test scaffolds from compiled records.
//!
//! A scaffold pairs a record layout with one value-generation strategy per
//! field: plain fields draw uniformly over their representation's full
//! range, enumerated fields draw only from the declared values (so a
//! round-trip always decodes to a non-catch-all case). The strategy list
//! is flat — one independent generator per field, composed by the test
//! harness with no fixed grouping limit — and the scaffold stays plain
//! data so it renders into any harness.
//!
//! The round-trip contract: build a frame, scan it back, and require
//! exactly one recovered frame with zero rejects and a value-exact payload
//! decode.

use crate::codec::{self, CodecError};
use crate::frame;
use crate::packet::CompiledRecord;
use crate::types::PrimKind;
use crate::value::FieldValue;

/// How to generate one field's random value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldStrategy {
    /// Uniform over the representation's full range.
    Uniform(PrimKind),
    /// Element-wise uniform over a fixed-count array.
    UniformArray(PrimKind, usize),
    /// Uniform over the declared enum values, paired with the
    /// representation width for literal construction.
    OneOf { kind: PrimKind, values: Vec<u64> },
}

/// A compiled test scaffold for one record.
#[derive(Debug, Clone)]
pub struct TestScaffold {
    pub record: CompiledRecord,
    pub strategies: Vec<FieldStrategy>,
}

#[derive(Debug, thiserror::Error)]
pub enum RoundTripError {
    #[error("no frame recovered from built bytes")]
    NoFrame,
    #[error("frame rejected: {0}")]
    Rejected(String),
    #[error("expected exactly one frame, recovered {0}")]
    MultipleFrames(usize),
    #[error("frame header mismatch: class {class:#04x}, id {id:#04x}")]
    HeaderMismatch { class: u8, id: u8 },
    #[error("field {field}: decoded {decoded:?} != generated {generated:?}")]
    ValueMismatch {
        field: String,
        generated: FieldValue,
        decoded: FieldValue,
    },
    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl TestScaffold {
    /// Derive the per-field strategy set from a compiled record.
    pub fn derive(record: CompiledRecord) -> TestScaffold {
        let strategies = record
            .fields
            .iter()
            .map(|f| match (&f.enum_domain, f.count) {
                (Some(domain), None) => FieldStrategy::OneOf {
                    kind: f.kind,
                    values: domain.declared_values(),
                },
                // Enum-marked arrays draw per-element over the full range;
                // the domain only shapes scalar fields.
                (_, Some(count)) => FieldStrategy::UniformArray(f.kind, count),
                (None, None) => FieldStrategy::Uniform(f.kind),
            })
            .collect();
        TestScaffold { record, strategies }
    }

    /// Serialize a generated value set into a payload.
    pub fn encode(&self, values: &[FieldValue]) -> Result<Vec<u8>, CodecError> {
        codec::encode_payload(&self.record, values)
    }

    /// Wrap a generated value set into a complete frame.
    pub fn build_frame(&self, values: &[FieldValue]) -> Result<Vec<u8>, CodecError> {
        let payload = self.encode(values)?;
        Ok(frame::build_frame(
            self.record.class_id,
            self.record.message_id,
            &payload,
        ))
    }

    /// The round-trip assertion: exactly one frame back, no rejects, and
    /// every decoded field value equal to the generated one.
    pub fn check_roundtrip(&self, values: &[FieldValue]) -> Result<(), RoundTripError> {
        let bytes = self.build_frame(values)?;
        let scan = frame::scan_frames(&bytes);
        if let Some(rejected) = scan.rejected.first() {
            return Err(RoundTripError::Rejected(rejected.reason.clone()));
        }
        match scan.frames.len() {
            0 => return Err(RoundTripError::NoFrame),
            1 => {}
            n => return Err(RoundTripError::MultipleFrames(n)),
        }
        let recovered = &scan.frames[0];
        if recovered.class_id != self.record.class_id
            || recovered.msg_id != self.record.message_id
        {
            return Err(RoundTripError::HeaderMismatch {
                class: recovered.class_id,
                id: recovered.msg_id,
            });
        }
        let decoded = codec::decode_payload(&self.record, &recovered.payload)?;
        for ((field, generated), decoded) in
            self.record.fields.iter().zip(values).zip(&decoded)
        {
            if generated != decoded {
                return Err(RoundTripError::ValueMismatch {
                    field: field.name.clone(),
                    generated: generated.clone(),
                    decoded: decoded.clone(),
                });
            }
        }
        Ok(())
    }
}
