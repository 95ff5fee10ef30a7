//! Format compiled layouts and scaffolds as text reports for the CLI.
//!
//! Diagnostic rendering only: the intermediate representation stays the
//! contract, and emitting source text in any target language is a caller
//! concern.

use crate::bitfield::BitfieldLayout;
use crate::enums::EnumDomain;
use crate::packet::{CompiledField, CompiledRecord};
use crate::testgen::{FieldStrategy, TestScaffold};

/// Multi-line report of one compiled record.
pub fn record_report(record: &CompiledRecord) -> String {
    let mut lines = Vec::new();
    let group = record
        .group
        .map(|g| format!(" [{}]", g))
        .unwrap_or_default();
    lines.push(format!(
        "record {}{} class {:#04x} id {:#04x} payload {} bytes",
        record.name, group, record.class_id, record.message_id, record.payload_len
    ));
    if let Some(desc) = &record.description {
        lines.push(format!("  // {}", desc));
    }
    for field in &record.fields {
        lines.push(field_line(field));
        if let Some(bits) = &field.bits {
            lines.extend(bitfield_lines(bits));
        }
        if let Some(domain) = &field.enum_domain {
            lines.extend(enum_lines(domain));
        }
    }
    lines.join("\n")
}

fn field_line(field: &CompiledField) -> String {
    let ty = match field.count {
        Some(n) => format!("[{}; {}]", field.kind.name(), n),
        None => field.kind.name().to_string(),
    };
    let mut line = format!(
        "  {:>4}  {}: {} ({} bytes)",
        field.offset, field.name, ty, field.size_bytes
    );
    if let Some(scale) = field.scale {
        line.push_str(&format!(" scale {}", scale));
    }
    if field.reserved {
        line.push_str(" reserved");
    }
    line
}

fn bitfield_lines(layout: &BitfieldLayout) -> Vec<String> {
    layout
        .accessors
        .iter()
        .map(|a| {
            format!(
                "          .{}: {} = bits[{}..{}]",
                a.name,
                a.repr.name(),
                a.bit_start,
                a.bit_start + a.width - 1
            )
        })
        .collect()
}

fn enum_lines(domain: &EnumDomain) -> Vec<String> {
    let mut out = vec![format!("          enum {} (+ reserved catch-all)", domain.name)];
    for v in &domain.variants {
        out.push(format!("            {} = {}", v.ident, v.value));
    }
    out
}

/// One-line-per-field summary of a scaffold's generation strategies.
pub fn scaffold_report(scaffold: &TestScaffold) -> String {
    let mut lines = vec![format!(
        "scaffold for {}: {} fields, frame = sync + header + {} payload bytes + checksum",
        scaffold.record.name,
        scaffold.record.fields.len(),
        scaffold.record.payload_len
    )];
    for (field, strategy) in scaffold.record.fields.iter().zip(&scaffold.strategies) {
        let desc = match strategy {
            FieldStrategy::Uniform(kind) => format!("uniform {}", kind.name()),
            FieldStrategy::UniformArray(kind, n) => format!("uniform [{}; {}]", kind.name(), n),
            FieldStrategy::OneOf { kind, values } => {
                format!("one of {:?} as {}", values, kind.name())
            }
        };
        lines.push(format!("  {}: {}", field.name, desc));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::parse_message;
    use crate::packet;

    #[test]
    fn report_covers_fields_bits_and_enums() {
        let schema = parse_message(
            r#"{"name": "MON-TEST", "class_id": "0x0A", "message_id": "0x31", "fields": [
                {"name": "flags", "data_type": "X1",
                 "bitfield": {"bits": [{"name": "valid", "bit_start": 0, "bit_end": 0}]}},
                {"name": "fixType", "data_type": "U1",
                 "enumeration": {"values": [{"name": "no fix", "value": 0}]}},
                {"name": "speed", "data_type": "U2", "scale": {"multiplier": 0.001}}
            ]}"#,
        )
        .expect("parse");
        let record = packet::compile(&schema, None).expect("compile");
        let text = record_report(&record);
        assert!(text.contains("record MonTest"));
        assert!(text.contains(".valid: bool = bits[0..0]"));
        assert!(text.contains("NoFix = 0"));
        assert!(text.contains("scale 0.001"));
        assert!(text.contains("payload 4 bytes"));
    }
}
