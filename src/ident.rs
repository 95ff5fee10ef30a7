//! Deterministic identifier normalization for generated layouts.
//!
//! Schema names arrive as camelCase field names ("numRfBlocks"), dashed
//! message names ("MON-RXBUF"), and free-form enum value names ("2D fix").
//! All three are normalized by explicit character scans so the rules are
//! testable on their own, with no pattern syntax involved.

/// Convert camelCase/PascalCase (and dashed/spaced) names to snake_case.
///
/// An underscore is inserted before an uppercase letter that either follows
/// a lowercase letter or digit, or starts a new word at the end of an
/// acronym run ("rfAGCStatus" -> "rf_agc_status").
pub fn snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c == '-' || c == ' ' {
            out.push('_');
            continue;
        }
        if c.is_ascii_uppercase() {
            let prev = if i > 0 { Some(chars[i - 1]) } else { None };
            let next = chars.get(i + 1);
            let boundary = match prev {
                Some(p) if p.is_ascii_lowercase() || p.is_ascii_digit() => true,
                Some(p) if p.is_ascii_uppercase() => {
                    next.map_or(false, |n| n.is_ascii_lowercase())
                }
                _ => false,
            };
            if boundary {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Convert a dashed or underscored name to PascalCase: "MON-RXBUF" -> "MonRxbuf".
pub fn pascal_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for word in name.split(|c| c == '-' || c == '_' || c == ' ') {
        let mut it = word.chars();
        if let Some(first) = it.next() {
            out.push(first.to_ascii_uppercase());
            for c in it {
                out.push(c.to_ascii_lowercase());
            }
        }
    }
    out
}

/// Normalize an enum value name into a variant identifier: PascalCase the
/// words, strip anything non-alphanumeric, and re-letter a leading digit
/// with a `V` marker ("2D fix" -> "V2dFix").
pub fn enum_variant(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = true;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if upper_next {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c.to_ascii_lowercase());
            }
            upper_next = false;
        } else {
            upper_next = true;
        }
    }
    if out.chars().next().map_or(true, |c| c.is_ascii_digit()) {
        out.insert(0, 'V');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snake_case_camel() {
        assert_eq!(snake_case("numRfBlocks"), "num_rf_blocks");
        assert_eq!(snake_case("iTOW"), "i_tow");
        assert_eq!(snake_case("plPos1"), "pl_pos1");
    }

    #[test]
    fn snake_case_acronym_run() {
        assert_eq!(snake_case("rfAGCStatus"), "rf_agc_status");
    }

    #[test]
    fn snake_case_dashed() {
        assert_eq!(snake_case("MON-RXBUF"), "mon_rxbuf");
    }

    #[test]
    fn pascal_case_message_name() {
        assert_eq!(pascal_case("MON-RXBUF"), "MonRxbuf");
        assert_eq!(pascal_case("NAV-PL"), "NavPl");
        assert_eq!(pascal_case("already_snake"), "AlreadySnake");
    }

    #[test]
    fn enum_variant_strips_and_reletters() {
        assert_eq!(enum_variant("no fix"), "NoFix");
        assert_eq!(enum_variant("2D fix"), "V2dFix");
        assert_eq!(enum_variant("GPS+GLONASS"), "GpsGlonass");
        assert_eq!(enum_variant("3"), "V3");
    }

    #[test]
    fn enum_variant_empty_gets_marker() {
        assert_eq!(enum_variant(""), "V");
    }
}
