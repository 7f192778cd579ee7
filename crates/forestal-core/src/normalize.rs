//! Diacritic folding for search comparison.
//!
//! Applied at build time to [`SearchEntry::name_lower`](crate::search::SearchEntry)
//! and keywords, and at query time to the raw query, so every comparison is
//! case- and accent-insensitive.

use unicode_normalization::UnicodeNormalization;

/// Lowercase `s`, decompose it canonically (NFD), and drop combining
/// diacritical marks (U+0300–U+036F).
///
/// ```rust
/// use forestal_core::normalize::normalize;
///
/// assert_eq!(normalize("Jalapeño"), "jalapeno");
/// assert_eq!(normalize("Café"), normalize("CAFE"));
/// ```
pub fn normalize(s: &str) -> String {
    strip_diacritics(&s.to_lowercase())
}

/// The NFD and mark-stripping half of [`normalize`], for text that is
/// already lowercase.
pub(crate) fn strip_diacritics(lowered: &str) -> String {
    lowered
        .nfd()
        .filter(|c| !is_combining_diacritic(*c))
        .collect()
}

fn is_combining_diacritic(c: char) -> bool {
    ('\u{0300}'..='\u{036f}').contains(&c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases() {
        assert_eq!(normalize("Batana"), "batana");
    }

    #[test]
    fn strips_diacritics() {
        assert_eq!(normalize("Bataná"), "batana");
        assert_eq!(normalize("Café Élève"), "cafe eleve");
    }

    #[test]
    fn strips_tilde() {
        assert_eq!(normalize("Jalapeño"), "jalapeno");
    }

    #[test]
    fn empty_string() {
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn case_and_accent_insensitive() {
        assert_eq!(normalize("Café"), "cafe");
        assert_eq!(normalize("CAFE"), "cafe");
    }

    #[test]
    fn decomposed_input_matches_precomposed() {
        assert_eq!(normalize("Cafe\u{0301}"), normalize("Caf\u{00e9}"));
    }

    #[test]
    fn idempotent() {
        for s in ["Café Élève", "JALAPEÑO", "Ǆemal", "İstanbul", "naïve résumé", ""] {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "not idempotent for {s:?}");
        }
    }
}
