//! Header canonicalization.
//!
//! Both dictionary lookup and fuzzy comparison operate on normalized keys so
//! spacing, punctuation, and accent differences never block an exact match.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Reduces a header string to its comparison key: NFKD decomposition with
/// combining marks stripped, folded to lowercase, and every character that is
/// not a lowercase ASCII letter or digit removed.
///
/// Total and deterministic; normalizing an already-normalized key returns it
/// unchanged.
pub fn normalize_key(header: &str) -> String {
    header
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .filter(char::is_ascii_alphanumeric)
        .collect()
}
