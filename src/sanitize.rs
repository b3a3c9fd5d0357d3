//! Identifier sanitization.
//!
//! Directory identifiers and display names flow into metric names and
//! label values. Prometheus restricts metric names to `[a-zA-Z_:][a-zA-Z0-9_:]*`,
//! so the characters that show up in practice are rewritten before use.
//!
//! Rewrites are applied in a fixed order:
//!
//! 1. `-` becomes `_`
//! 2. spaces are removed
//! 3. `é`, `ê`, `è`, `ë` become `e`
//! 4. `(` and `)` are removed
//!
//! No rewrite produces a character another rewrite consumes, so the
//! transformation is idempotent.

/// Accented letters folded to a plain `e`.
const ACCENTED_E: [char; 4] = ['é', 'ê', 'è', 'ë'];

/// Sanitizes a raw directory identifier or display name.
///
/// Total and pure: every input, including the empty string, maps to
/// exactly one output.
///
/// # Example
///
/// ```
/// use credential_expiry_exporter::sanitize::sanitize;
///
/// assert_eq!(sanitize("Café (Prod)"), "CafeProd");
/// assert_eq!(sanitize("0f1e2d3c-aaaa-bbbb"), "0f1e2d3c_aaaa_bbbb");
/// ```
pub fn sanitize(raw: &str) -> String {
    raw.replace('-', "_")
        .replace(' ', "")
        .replace(ACCENTED_E, "e")
        .replace(['(', ')'], "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_display_name_scenario() {
        assert_eq!(sanitize("Café (Prod)"), "CafeProd");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(sanitize(""), "");
    }

    #[test]
    fn test_app_id_hyphens() {
        assert_eq!(
            sanitize("4a5b6c7d-0000-1111-2222-333344445555"),
            "4a5b6c7d_0000_1111_2222_333344445555"
        );
    }

    #[test]
    fn test_all_accents_folded() {
        assert_eq!(sanitize("éêèë"), "eeee");
    }

    #[test]
    fn test_hyphen_next_to_space() {
        assert_eq!(sanitize("Billing - API"), "Billing_API");
    }

    proptest! {
        #[test]
        fn prop_idempotent(raw in ".*") {
            let once = sanitize(&raw);
            prop_assert_eq!(sanitize(&once), once);
        }

        #[test]
        fn prop_removes_disallowed(raw in "[a-zA-Z0-9 ()éêèë_-]{0,40}") {
            let out = sanitize(&raw);
            for c in ['-', ' ', '(', ')', 'é', 'ê', 'è', 'ë'] {
                prop_assert!(!out.contains(c), "{:?} still contains {:?}", out, c);
            }
        }
    }
}
