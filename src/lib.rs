//! # wiregen — schema compiler for framed binary wire messages
//!
//! Compiles declarative message schemas (JSON objects: fields, bitfields,
//! enumerations, scale factors, protocol-version overrides) into typed
//! record layouts and round-trip test scaffolds over a fixed framed wire
//! format.
//!
//! ## Pipeline
//!
//! - **schema/loader**: JSON -> validated message model (fail-fast on
//!   missing keys, duplicate fields, bitfield/enum conflicts)
//! - **types**: scalar tags (`U1`..`R8`) -> sized primitive kinds; unknown
//!   tags fall back to a 1-byte unsigned kind by contract
//! - **version**: raw version strings -> one of four protocol groups;
//!   per-group field overrides applied copy-on-resolve
//! - **bitfield/enums**: bit-range accessors and closed enum domains with
//!   a reserved catch-all case (decode is total)
//! - **packet**: ordered field list -> immutable [`CompiledRecord`] with
//!   byte offsets and total payload length
//! - **frame**: sync bytes `B5 62`, class/id header, LE length, payload,
//!   two-byte running-sum checksum; frame building and stream scanning
//! - **testgen**: per-field random-value strategies (enums restricted to
//!   declared values), byte encoder, frame builder, round-trip contract
//!
//! ## Example
//!
//! ```
//! use wiregen::{loader, packet, testgen::TestScaffold, value::FieldValue};
//!
//! let schema = loader::parse_message(r#"{
//!     "name": "MON-PING",
//!     "class_id": "0x0A",
//!     "message_id": "0x09",
//!     "fields": [
//!         {"name": "seq", "data_type": "U2"},
//!         {"name": "flags", "data_type": "X1",
//!          "bitfield": {"bits": [{"name": "ack", "bit_start": 0, "bit_end": 0}]}}
//!     ]
//! }"#).unwrap();
//!
//! let record = packet::compile(&schema, None).unwrap();
//! assert_eq!(record.payload_len, 3);
//!
//! let scaffold = TestScaffold::derive(record);
//! let values = [FieldValue::U16(42), FieldValue::U8(1)];
//! scaffold.check_roundtrip(&values).unwrap();
//! ```

pub mod bitfield;
pub mod codec;
pub mod enums;
pub mod frame;
pub mod ident;
pub mod loader;
pub mod packet;
pub mod registry;
pub mod report;
pub mod schema;
pub mod testgen;
pub mod types;
pub mod value;
pub mod version;

pub use bitfield::{BitAccessor, BitRepr, BitValue, BitfieldLayout};
pub use codec::{CodecError, FieldView};
pub use enums::{EnumCase, EnumDomain, EnumVariant};
pub use frame::{build_frame, checksum, scan_frames, Frame, FrameScan};
pub use loader::{parse_message, SchemaError};
pub use packet::{compile, CompileError, CompiledField, CompiledRecord};
pub use registry::{RegistryError, SchemaRegistry};
pub use schema::{DataType, Field, FieldKind, MessageSchema};
pub use testgen::{FieldStrategy, RoundTripError, TestScaffold};
pub use types::PrimKind;
pub use value::FieldValue;
pub use version::ProtocolGroup;
