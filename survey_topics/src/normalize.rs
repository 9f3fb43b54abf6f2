//! Accent-insensitive text comparison.

use unicode_normalization::char::canonical_combining_class;
use unicode_normalization::UnicodeNormalization;

fn strip_marks(s: &str) -> String {
    s.nfkd()
        .filter(|c| canonical_combining_class(*c) == 0)
        .collect()
}

/// Folds a string to lowercase and removes the diacritics.
///
/// The string is lowercased, put in compatibility decomposition form (NFKD) and
/// every combining character is dropped, so that "Período" and "Periodo" compare
/// equal. Compatibility characters such as "ℌ" decompose to capital letters, so
/// the result is lowercased and stripped once more.
pub fn normalize(s: &str) -> String {
    let folded = strip_marks(&s.to_lowercase());
    strip_marks(&folded.to_lowercase())
}
