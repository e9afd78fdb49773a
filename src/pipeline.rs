//! The cleaning orchestrator: sequences header-row stripping, schema
//! renaming, type coercion, derived metrics, and de-duplication over one
//! input table.
//!
//! One invocation runs on the calling thread, touches no shared mutable
//! state, and either produces a cleaned table or stops at the first fatal
//! error. The dictionary is read-only and may be shared across invocations.

use std::fmt;
use std::str::FromStr;

use itertools::Itertools;
use log::{debug, info};

use crate::canonical::{CanonicalField, EXPECTED_COLUMNS};
use crate::coerce::coerce_columns;
use crate::dictionary::HeaderDictionary;
use crate::error::CleanError;
use crate::frame::{CleanedTable, Frame, RawTable};
use crate::metrics::{dedupe_rows, derive_employee_ratio, derive_salary_level, derive_wage_gap};
use crate::resolve::{build_rename_map, DEFAULT_FUZZY_THRESHOLD};
use crate::value::Cell;

/// Marker substrings that identify a first data row as a duplicated header
/// line (typically the same header repeated in another language).
const HEADER_ROW_MARKERS: &[&str] = &["pp gads", "gads", "pp mēnesis", "pilsēta"];

/// Pipeline stages, in execution order. FAILED is represented by the error
/// return rather than a variant; every stage can reach it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Loaded,
    HeaderRowCheck,
    Renamed,
    TypeCoerced,
    Derived,
    Deduped,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Loaded => "LOADED",
            Stage::HeaderRowCheck => "HEADER_ROW_CHECK",
            Stage::Renamed => "RENAMED",
            Stage::TypeCoerced => "TYPE_COERCED",
            Stage::Derived => "DERIVED",
            Stage::Deduped => "DEDUPED",
            Stage::Done => "DONE",
        };
        write!(f, "{name}")
    }
}

/// Cleaning configuration: the injected dictionary plus the tunable knobs.
#[derive(Debug, Clone)]
pub struct Cleaner<'d> {
    dictionary: &'d HeaderDictionary,
    threshold: f64,
    keep_extra: bool,
}

impl<'d> Cleaner<'d> {
    pub fn new(dictionary: &'d HeaderDictionary) -> Self {
        Cleaner {
            dictionary,
            threshold: DEFAULT_FUZZY_THRESHOLD,
            keep_extra: false,
        }
    }

    /// Overrides the fuzzy-match acceptance threshold.
    pub fn threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Keeps unmapped source columns as passthrough output columns instead of
    /// dropping them.
    pub fn keep_extra(mut self, keep: bool) -> Self {
        self.keep_extra = keep;
        self
    }

    /// Runs the full pipeline over one raw table.
    pub fn clean(&self, mut frame: RawTable) -> Result<CleanedTable, CleanError> {
        let mut stage = Stage::Loaded;
        debug!("stage {stage}: {} column(s), {} row(s)", frame.column_count(), frame.row_count());
        if frame.columns.is_empty() {
            return Err(CleanError::InitialCleaning(
                "input table has no columns".to_string(),
            ));
        }
        for label in &mut frame.columns {
            *label = label.trim().to_string();
        }

        stage = Stage::HeaderRowCheck;
        if strip_duplicated_header_row(&mut frame) {
            debug!("stage {stage}: dropped duplicated header row");
        }

        stage = Stage::Renamed;
        let rename_map = build_rename_map(&frame.columns, self.dictionary, self.threshold);
        let mut frame = apply_rename(frame, &rename_map, self.keep_extra)?;
        debug!(
            "stage {stage}: {} canonical column(s), {} column(s) total",
            rename_map.len(),
            frame.column_count()
        );

        stage = Stage::TypeCoerced;
        let fields = column_fields(&frame);
        coerce_columns(&mut frame, &fields)?;
        debug!("stage {stage} complete");

        stage = Stage::Derived;
        derive_salary_level(&mut frame)?;
        derive_wage_gap(&mut frame);
        derive_employee_ratio(&mut frame);
        order_columns(&mut frame);
        debug!("stage {stage} complete");

        stage = Stage::Deduped;
        let removed = dedupe_rows(&mut frame);
        if removed > 0 {
            debug!("stage {stage}: removed {removed} duplicate row(s)");
        }

        stage = Stage::Done;
        info!(
            "stage {stage}: cleaned table has {} column(s) and {} row(s)",
            frame.column_count(),
            frame.row_count()
        );
        Ok(frame)
    }
}

/// Inspects the first data row; when its concatenated lowercase text contains
/// any marker substring the row is a second header line and gets removed.
/// Returns whether a row was stripped.
fn strip_duplicated_header_row(frame: &mut Frame) -> bool {
    let Some(first) = frame.rows.first() else {
        return false;
    };
    let joined = first
        .iter()
        .map(Cell::as_display)
        .join(" ")
        .to_lowercase();
    if HEADER_ROW_MARKERS
        .iter()
        .any(|marker| joined.contains(marker))
    {
        frame.rows.remove(0);
        true
    } else {
        false
    }
}

/// Applies the rename map: mapped columns take their canonical names; when
/// two incoming labels map to the same field the later one overwrites the
/// earlier (last-write-wins). Unmapped columns are dropped unless passthrough
/// is requested. Report_Month is recognized only to be discarded.
fn apply_rename(
    frame: Frame,
    rename_map: &crate::resolve::RenameMap,
    keep_extra: bool,
) -> Result<Frame, CleanError> {
    let mut out_labels: Vec<String> = Vec::new();
    let mut out_sources: Vec<usize> = Vec::new();

    for (idx, label) in frame.columns.iter().enumerate() {
        match rename_map.get(label) {
            Some(CanonicalField::ReportMonth) => {}
            Some(field) => {
                let canonical = field.as_str().to_string();
                if let Some(existing) = out_labels.iter().position(|l| *l == canonical) {
                    out_sources[existing] = idx;
                } else {
                    out_labels.push(canonical);
                    out_sources.push(idx);
                }
            }
            None if keep_extra => {
                if out_labels.contains(label) {
                    return Err(CleanError::Rename(format!(
                        "passthrough column '{label}' collides with an existing output column"
                    )));
                }
                out_labels.push(label.clone());
                out_sources.push(idx);
            }
            None => {
                debug!("Dropping unmapped column '{label}'");
            }
        }
    }

    let rows = frame
        .rows
        .iter()
        .map(|row| {
            out_sources
                .iter()
                .map(|&idx| row.get(idx).cloned().unwrap_or(Cell::Missing))
                .collect()
        })
        .collect();

    Ok(Frame {
        columns: out_labels,
        rows,
    })
}

/// Resolves each output column back to its canonical field, if any.
fn column_fields(frame: &Frame) -> Vec<Option<CanonicalField>> {
    frame
        .columns
        .iter()
        .map(|label| CanonicalField::from_str(label).ok())
        .collect()
}

/// Fixes the output column order: canonical fields in their expected order
/// first, passthrough extras after in their current relative order.
fn order_columns(frame: &mut Frame) {
    let mut order: Vec<usize> = Vec::with_capacity(frame.columns.len());
    for field in EXPECTED_COLUMNS {
        if let Some(idx) = frame.column_index(field.as_str()) {
            order.push(idx);
        }
    }
    for (idx, label) in frame.columns.iter().enumerate() {
        if CanonicalField::from_str(label).is_err() {
            order.push(idx);
        }
    }
    if order.len() != frame.columns.len() {
        // Canonical columns outside EXPECTED_COLUMNS (Report_Month) were
        // dropped during renaming, so every column is accounted for.
        debug_assert_eq!(order.len(), frame.columns.len());
        return;
    }

    let columns = std::mem::take(&mut frame.columns);
    let rows = std::mem::take(&mut frame.rows);
    frame.columns = order.iter().map(|&i| columns[i].clone()).collect();
    frame.rows = rows
        .iter()
        .map(|row| {
            order
                .iter()
                .map(|&i| row.get(i).cloned().unwrap_or(Cell::Missing))
                .collect()
        })
        .collect();
}
