//! The header dictionary: known source-header variants mapped to canonical
//! fields.
//!
//! Entries live in a `Vec` rather than a hash map so iteration follows
//! definition order; the fuzzy resolver's tie-break depends on that order
//! being stable across runs. Extra variants can be merged from a YAML file,
//! which keeps "recognize a new header" a data change rather than a code
//! change.

use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::canonical::CanonicalField;
use crate::normalize::normalize_key;

/// Built-in variants, exactly as they appear in the Latvian source exports.
/// Several variants map onto the same canonical field; keys must be unique
/// only after normalization.
const BUILTIN_VARIANTS: &[(&str, CanonicalField)] = &[
    ("pp gads", CanonicalField::ReportYear),
    ("gads", CanonicalField::ReportYear),
    ("pp mēnesis", CanonicalField::ReportMonth),
    ("mēnesis", CanonicalField::ReportMonth),
    ("pilsēta, novads", CanonicalField::CityMunicipality),
    ("pilsēta, novads, pagasts", CanonicalField::CityMunicipality),
    ("atvk kods", CanonicalField::AdministrativeCodeAtvk),
    ("oblig. kopā, skaits", CanonicalField::TotalInsuredPersons),
    ("oblig. kopā, alga", CanonicalField::AverageInsurableSalaryTotal),
    ("oblig. siev., skaits", CanonicalField::InsuredWomenCount),
    ("oblig. siev., alga", CanonicalField::InsuredWomenAverageSalary),
    ("oblig. vīr., skaits", CanonicalField::InsuredMenCount),
    ("oblig. vīr., alga", CanonicalField::InsuredMenAverageSalary),
    ("darba ņēm. kopā, skaits", CanonicalField::EmployeesCount),
    ("darba ņēm. kopā, alga", CanonicalField::EmployeesAverageSalary),
    ("darba ņēm. siev., skaits", CanonicalField::FemaleEmployeesCount),
    (
        "darba ņēm. siev., alga",
        CanonicalField::FemaleEmployeesAverageSalary,
    ),
    ("darba ņēm. vīr., skaits", CanonicalField::MaleEmployeesCount),
    (
        "darba ņēm. vīr., alga",
        CanonicalField::MaleEmployeesAverageSalary,
    ),
    ("pašnodarb. kopā, skaits", CanonicalField::SelfEmployedCount),
    ("pašnodarb. kopā, alga", CanonicalField::SelfEmployedAverageSalary),
    (
        "pašnodarb. siev., skaits",
        CanonicalField::FemaleSelfEmployedCount,
    ),
    (
        "pašnodarb. siev., alga",
        CanonicalField::FemaleSelfEmployedAverageSalary,
    ),
    (
        "pašnodarb. vīr., skaits",
        CanonicalField::MaleSelfEmployedCount,
    ),
    (
        "pašnodarb. vīr., alga",
        CanonicalField::MaleSelfEmployedAverageSalary,
    ),
    ("algu līmenis", CanonicalField::RegionSalaryLevel),
];

/// One variant entry as it appears in a dictionary YAML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantEntry {
    /// Source header variant, in its original spelling.
    pub header: String,
    /// Canonical field the variant maps to.
    pub field: CanonicalField,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct DictionaryFile {
    variants: Vec<VariantEntry>,
}

#[derive(Debug, Clone)]
struct DictionaryEntry {
    variant: String,
    key: String,
    field: CanonicalField,
}

/// Read-only mapping from normalized header keys to canonical fields.
/// Constructed once, then shared by reference; lookups never mutate.
#[derive(Debug, Clone)]
pub struct HeaderDictionary {
    entries: Vec<DictionaryEntry>,
}

impl HeaderDictionary {
    /// The hand-curated dictionary covering the known Latvian export headers.
    pub fn builtin() -> Self {
        let variants = BUILTIN_VARIANTS
            .iter()
            .map(|(variant, field)| VariantEntry {
                header: (*variant).to_string(),
                field: *field,
            })
            .collect::<Vec<_>>();
        Self::from_variants(variants).expect("built-in dictionary keys are unique")
    }

    /// Builds a dictionary from explicit entries, rejecting variants whose
    /// normalized keys collide.
    pub fn from_variants(variants: Vec<VariantEntry>) -> Result<Self> {
        let mut entries = Vec::with_capacity(variants.len());
        let mut seen = HashSet::new();
        for entry in variants {
            let key = normalize_key(&entry.header);
            if key.is_empty() {
                bail!(
                    "Dictionary variant '{}' normalizes to an empty key",
                    entry.header
                );
            }
            if !seen.insert(key.clone()) {
                bail!(
                    "Dictionary variant '{}' collides with an earlier entry (normalized key '{}')",
                    entry.header,
                    key
                );
            }
            entries.push(DictionaryEntry {
                variant: entry.header,
                key,
                field: entry.field,
            });
        }
        Ok(HeaderDictionary { entries })
    }

    /// Merges extension variants from a YAML file after the built-ins, so
    /// built-in entries keep tie-break priority.
    pub fn with_extensions(path: &Path) -> Result<Self> {
        let file =
            File::open(path).with_context(|| format!("Opening dictionary file {path:?}"))?;
        let reader = BufReader::new(file);
        let extension: DictionaryFile =
            serde_yaml::from_reader(reader).context("Parsing dictionary YAML")?;

        let mut variants = BUILTIN_VARIANTS
            .iter()
            .map(|(variant, field)| VariantEntry {
                header: (*variant).to_string(),
                field: *field,
            })
            .collect::<Vec<_>>();
        variants.extend(extension.variants);
        Self::from_variants(variants)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Exact lookup by normalized key.
    pub fn exact(&self, key: &str) -> Option<CanonicalField> {
        self.entries
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| entry.field)
    }

    /// Iterates (normalized key, field) pairs in definition order.
    pub fn keys(&self) -> impl Iterator<Item = (&str, CanonicalField)> {
        self.entries
            .iter()
            .map(|entry| (entry.key.as_str(), entry.field))
    }

    /// Iterates (original variant, normalized key, field) triples in
    /// definition order, for listing.
    pub fn describe(&self) -> impl Iterator<Item = (&str, &str, CanonicalField)> {
        self.entries
            .iter()
            .map(|entry| (entry.variant.as_str(), entry.key.as_str(), entry.field))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_dictionary_keys_are_unique_after_normalization() {
        let dict = HeaderDictionary::builtin();
        let keys: HashSet<String> = dict.keys().map(|(key, _)| key.to_string()).collect();
        assert_eq!(keys.len(), dict.len());
        assert_eq!(dict.len(), BUILTIN_VARIANTS.len());
    }

    #[test]
    fn exact_lookup_uses_normalized_keys() {
        let dict = HeaderDictionary::builtin();
        assert_eq!(dict.exact("gads"), Some(CanonicalField::ReportYear));
        assert_eq!(
            dict.exact("darbanemkopaalga"),
            Some(CanonicalField::EmployeesAverageSalary)
        );
        assert_eq!(dict.exact("pilsēta, novads"), None); // raw, not normalized
        assert_eq!(dict.exact(""), None);
    }

    #[test]
    fn multiple_variants_map_onto_one_field() {
        let dict = HeaderDictionary::builtin();
        assert_eq!(dict.exact("ppgads"), Some(CanonicalField::ReportYear));
        assert_eq!(dict.exact("gads"), Some(CanonicalField::ReportYear));
    }

    #[test]
    fn colliding_extension_variant_is_rejected() {
        let mut variants: Vec<VariantEntry> = vec![VariantEntry {
            header: "gads".to_string(),
            field: CanonicalField::ReportYear,
        }];
        variants.push(VariantEntry {
            header: "GADS!".to_string(),
            field: CanonicalField::ReportMonth,
        });
        let err = HeaderDictionary::from_variants(variants).unwrap_err();
        assert!(err.to_string().contains("collides"));
    }

    #[test]
    fn blank_variant_is_rejected() {
        let variants = vec![VariantEntry {
            header: "—".to_string(),
            field: CanonicalField::ReportYear,
        }];
        assert!(HeaderDictionary::from_variants(variants).is_err());
    }
}
