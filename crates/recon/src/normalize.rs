//! Name canonicalization.
//!
//! Every comparison in the engine happens between normalized keys, never
//! raw strings. An empty key (whitespace-only or punctuation-only input)
//! matches nothing.

/// Derive the comparison key for a raw name.
///
/// Steps, in order: reorder "Family, Given" to "Given Family" at the first
/// comma; strip periods, commas, and apostrophes (hyphens stay); uppercase;
/// collapse whitespace runs to single spaces.
///
/// Idempotent: the output never contains a comma or uncollapsed whitespace,
/// so a second pass is a no-op.
pub fn normalize(raw: &str) -> String {
    let reordered = match raw.find(',') {
        Some(pos) => {
            let (family, given) = raw.split_at(pos);
            format!("{} {}", &given[1..], family)
        }
        None => raw.to_string(),
    };
    let stripped: String = reordered
        .chars()
        .filter(|c| !matches!(c, '.' | ',' | '\''))
        .collect();
    stripped
        .to_uppercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uppercases_and_collapses_whitespace() {
        assert_eq!(normalize("john   smith"), "JOHN SMITH");
        assert_eq!(normalize("  jane\tdoe  "), "JANE DOE");
    }

    #[test]
    fn strips_punctuation_keeps_hyphen() {
        assert_eq!(normalize("J. R. O'Brien"), "J R OBRIEN");
        assert_eq!(normalize("Mary-Anne Clark"), "MARY-ANNE CLARK");
    }

    #[test]
    fn reorders_family_comma_given() {
        assert_eq!(normalize("Smith, John"), "JOHN SMITH");
        assert_eq!(normalize("smith,john"), "JOHN SMITH");
        assert_eq!(normalize("John Smith"), "JOHN SMITH");
    }

    #[test]
    fn empty_and_whitespace_yield_empty_key() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   \t  "), "");
        assert_eq!(normalize(" . , ' "), "");
    }

    #[test]
    fn idempotent_on_varied_inputs() {
        for raw in [
            "Smith, John",
            "  o'neill,   mary-jane ",
            "PLAIN NAME",
            "x",
            "",
            "Dr. A. B. Chandrasekhar, Jr",
        ] {
            let once = normalize(raw);
            assert_eq!(normalize(&once), once, "not idempotent for {raw:?}");
        }
    }
}
