//! Protocol-group resolution and version-specific field overrides.
//!
//! Raw interface-description version strings ("27.11", "15.01") bucket into
//! four compatibility groups. A field may carry per-group overrides that
//! replace its data type and/or byte size when compiling for that group;
//! resolution copies, it never mutates the schema.

use crate::schema::{DataType, Field};

/// One of the four fixed protocol compatibility groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProtocolGroup {
    Group14,
    Group23,
    Group27,
    Group31,
}

impl ProtocolGroup {
    pub const ALL: [ProtocolGroup; 4] = [
        ProtocolGroup::Group14,
        ProtocolGroup::Group23,
        ProtocolGroup::Group27,
        ProtocolGroup::Group31,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ProtocolGroup::Group14 => "group14",
            ProtocolGroup::Group23 => "group23",
            ProtocolGroup::Group27 => "group27",
            ProtocolGroup::Group31 => "group31",
        }
    }

    pub fn from_name(name: &str) -> Option<ProtocolGroup> {
        match name {
            "group14" => Some(ProtocolGroup::Group14),
            "group23" => Some(ProtocolGroup::Group23),
            "group27" => Some(ProtocolGroup::Group27),
            "group31" => Some(ProtocolGroup::Group31),
            _ => None,
        }
    }

    /// Bucket a raw version string into its group.
    ///
    /// Versions outside the table resolve to `None`: they are excluded from
    /// compilation rather than treated as an error.
    pub fn from_raw_version(raw: &str) -> Option<ProtocolGroup> {
        const GROUP14: &[&str] = &[
            "14", "14.00", "15", "15.00", "15.01", "17", "18", "18.00", "19", "20",
        ];
        const GROUP23: &[&str] = &["23", "23.00", "23.01", "24", "25", "26"];
        const GROUP27: &[&str] = &[
            "27", "27.00", "27.10", "27.11", "27.12", "27.30", "27.31", "27.50", "28",
        ];
        const GROUP31: &[&str] = &["31", "31.00", "31.10", "31.20", "32", "33", "34"];

        if GROUP14.contains(&raw) {
            Some(ProtocolGroup::Group14)
        } else if GROUP23.contains(&raw) {
            Some(ProtocolGroup::Group23)
        } else if GROUP27.contains(&raw) {
            Some(ProtocolGroup::Group27)
        } else if GROUP31.contains(&raw) {
            Some(ProtocolGroup::Group31)
        } else {
            None
        }
    }
}

impl std::fmt::Display for ProtocolGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A field's effective definition for one compilation.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub data_type: DataType,
    /// Explicit byte-size override, replacing the size derived from the type.
    pub size_override: Option<usize>,
}

/// Apply the override matching `group`, if any; otherwise the base
/// definition is used unchanged. The schema field itself is never touched,
/// so the same message can be compiled for several groups independently.
pub fn resolve(field: &Field, group: Option<ProtocolGroup>) -> Resolution {
    if let Some(g) = group {
        if let Some(ov) = field.overrides.get(&g) {
            return Resolution {
                data_type: ov.data_type.clone().unwrap_or_else(|| field.data_type.clone()),
                size_override: ov.size_bytes,
            };
        }
    }
    Resolution {
        data_type: field.data_type.clone(),
        size_override: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Field, FieldKind, FieldOverride};
    use std::collections::BTreeMap;

    fn field_with_override(group: ProtocolGroup, ty: &str) -> Field {
        let mut overrides = BTreeMap::new();
        overrides.insert(
            group,
            FieldOverride {
                data_type: Some(DataType::Scalar(ty.to_string())),
                size_bytes: None,
            },
        );
        Field {
            name: "flags".to_string(),
            data_type: DataType::Scalar("U4".to_string()),
            kind: FieldKind::Plain,
            scale: None,
            overrides,
            reserved: false,
            description: None,
        }
    }

    #[test]
    fn raw_versions_bucket_into_groups() {
        assert_eq!(
            ProtocolGroup::from_raw_version("14.00"),
            Some(ProtocolGroup::Group14)
        );
        assert_eq!(
            ProtocolGroup::from_raw_version("23.01"),
            Some(ProtocolGroup::Group23)
        );
        assert_eq!(
            ProtocolGroup::from_raw_version("27.11"),
            Some(ProtocolGroup::Group27)
        );
        assert_eq!(
            ProtocolGroup::from_raw_version("34"),
            Some(ProtocolGroup::Group31)
        );
    }

    #[test]
    fn unlisted_version_resolves_to_nothing() {
        assert_eq!(ProtocolGroup::from_raw_version("12.00"), None);
        assert_eq!(ProtocolGroup::from_raw_version("29"), None);
        assert_eq!(ProtocolGroup::from_raw_version(""), None);
    }

    #[test]
    fn override_applies_only_for_matching_group() {
        let field = field_with_override(ProtocolGroup::Group27, "U2");

        let hit = resolve(&field, Some(ProtocolGroup::Group27));
        assert_eq!(hit.data_type, DataType::Scalar("U2".to_string()));

        let miss = resolve(&field, Some(ProtocolGroup::Group14));
        assert_eq!(miss.data_type, DataType::Scalar("U4".to_string()));

        let none = resolve(&field, None);
        assert_eq!(none.data_type, DataType::Scalar("U4".to_string()));
    }

    #[test]
    fn size_override_carries_through() {
        let mut field = field_with_override(ProtocolGroup::Group14, "U2");
        field
            .overrides
            .get_mut(&ProtocolGroup::Group14)
            .unwrap()
            .size_bytes = Some(2);
        let r = resolve(&field, Some(ProtocolGroup::Group14));
        assert_eq!(r.size_override, Some(2));
    }
}
