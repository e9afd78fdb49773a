//! Fuzzy rename resolution: maps incoming column labels to canonical fields.
//!
//! Exact normalized matches always win. Only when no exact match exists does
//! the resolver fall back to a difflib-style similarity ratio over every
//! dictionary key, accepting the best candidate at or above the threshold.

use log::debug;
use similar::TextDiff;

use crate::canonical::CanonicalField;
use crate::dictionary::HeaderDictionary;
use crate::normalize::normalize_key;

/// Unvalidated heuristic inherited from the source exports; tunable via the
/// CLI, not guaranteed-correct domain knowledge.
pub const DEFAULT_FUZZY_THRESHOLD: f64 = 0.80;

/// Per-table mapping from incoming labels to canonical fields, in incoming
/// label order. Labels with no acceptable match are absent.
#[derive(Debug, Clone, Default)]
pub struct RenameMap {
    entries: Vec<(String, CanonicalField)>,
}

impl RenameMap {
    pub fn get(&self, label: &str) -> Option<CanonicalField> {
        self.entries
            .iter()
            .find(|(candidate, _)| candidate == label)
            .map(|(_, field)| *field)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, CanonicalField)> {
        self.entries
            .iter()
            .map(|(label, field)| (label.as_str(), *field))
    }
}

/// Normalized edit-alignment similarity in [0, 1]; symmetric, and 1.0 only
/// for identical strings.
pub fn similarity_ratio(left: &str, right: &str) -> f64 {
    if left.is_empty() && right.is_empty() {
        return 1.0;
    }
    TextDiff::from_chars(left, right).ratio() as f64
}

/// Builds the rename map for a table's column labels.
///
/// Per label: normalize, try an exact dictionary hit, otherwise score every
/// dictionary key and accept the maximum if it reaches `threshold`. Ties keep
/// the first key in dictionary definition order, which makes resolution
/// deterministic across runs. Duplicate incoming labels resolve independently.
pub fn build_rename_map(
    labels: &[String],
    dictionary: &HeaderDictionary,
    threshold: f64,
) -> RenameMap {
    let mut entries = Vec::new();
    for label in labels {
        let key = normalize_key(label);
        if let Some(field) = dictionary.exact(&key) {
            entries.push((label.clone(), field));
            continue;
        }
        let mut best: Option<(f64, CanonicalField, &str)> = None;
        for (candidate, field) in dictionary.keys() {
            let ratio = similarity_ratio(&key, candidate);
            // Strictly-greater keeps the earliest candidate on ties.
            if best.map_or(true, |(best_ratio, _, _)| ratio > best_ratio) {
                best = Some((ratio, field, candidate));
            }
        }
        match best {
            Some((ratio, field, candidate)) if ratio >= threshold => {
                debug!(
                    "Fuzzy-mapped column '{label}' to {field} via key '{candidate}' (ratio {ratio:.3})"
                );
                entries.push((label.clone(), field));
            }
            Some((ratio, _, candidate)) => {
                debug!(
                    "Column '{label}' left unmapped; best candidate '{candidate}' scored {ratio:.3} (< {threshold:.2})"
                );
            }
            None => {
                debug!("Column '{label}' left unmapped; dictionary is empty");
            }
        }
    }
    RenameMap { entries }
}
