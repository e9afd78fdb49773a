//! Persistence boundary: appends a cleaned table to a master CSV file.
//!
//! Append semantics only — no upsert and no de-duplication against rows
//! already stored. The cleaned table must carry every expected canonical
//! column; anything less is fatal before a single row is written.

use std::path::Path;

use anyhow::{Context, Result};
use log::info;

use crate::canonical::EXPECTED_COLUMNS;
use crate::error::CleanError;
use crate::frame::CleanedTable;
use crate::io_utils;

/// Verifies the fixed canonical column set and returns the column indices in
/// the expected insert order.
pub fn expected_column_indices(table: &CleanedTable) -> Result<Vec<usize>, CleanError> {
    let mut indices = Vec::with_capacity(EXPECTED_COLUMNS.len());
    let mut missing = Vec::new();
    for field in EXPECTED_COLUMNS {
        match table.column_index(field.as_str()) {
            Some(idx) => indices.push(idx),
            None => missing.push(field.as_str().to_string()),
        }
    }
    if missing.is_empty() {
        Ok(indices)
    } else {
        Err(CleanError::MissingColumnsForInsert { missing })
    }
}

/// Appends the cleaned table's rows to `master`, writing the canonical header
/// first when the file is new or empty. Returns the number of rows appended.
pub fn append_to_master(table: &CleanedTable, master: &Path, delimiter: u8) -> Result<usize> {
    let indices = expected_column_indices(table)?;
    let (mut writer, needs_header) = io_utils::open_csv_appender(master, delimiter)?;

    if needs_header {
        writer
            .write_record(EXPECTED_COLUMNS.iter().map(|field| field.as_str()))
            .context("Writing master header")?;
    }
    for (row_idx, row) in table.rows.iter().enumerate() {
        let record = indices
            .iter()
            .map(|&idx| row.get(idx).map(|c| c.as_display()).unwrap_or_default())
            .collect::<Vec<_>>();
        writer
            .write_record(record.iter())
            .with_context(|| format!("Writing row {} to {master:?}", row_idx + 1))?;
    }
    writer.flush().context("Flushing master file")?;
    info!("Appended {} row(s) to {master:?}", table.row_count());
    Ok(table.row_count())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Frame;
    use crate::value::Cell;

    #[test]
    fn missing_columns_are_reported_by_name() {
        let table = Frame::new(vec!["Report_Year".to_string()]);
        let err = expected_column_indices(&table).unwrap_err();
        match err {
            CleanError::MissingColumnsForInsert { missing } => {
                assert!(missing.contains(&"City_Municipality".to_string()));
                assert!(missing.contains(&"Male_Female_Employee_Ratio".to_string()));
                assert!(!missing.contains(&"Report_Year".to_string()));
            }
            other => panic!("Expected MissingColumnsForInsert, got {other:?}"),
        }
    }

    #[test]
    fn full_column_set_resolves_in_expected_order() {
        let mut table = Frame::new(
            EXPECTED_COLUMNS
                .iter()
                .rev()
                .map(|field| field.as_str().to_string())
                .collect(),
        );
        table.rows.push(vec![Cell::Missing; EXPECTED_COLUMNS.len()]);
        let indices = expected_column_indices(&table).unwrap();
        // Reversed header resolves back to the canonical insert order.
        assert_eq!(indices[0], EXPECTED_COLUMNS.len() - 1);
        assert_eq!(indices[EXPECTED_COLUMNS.len() - 1], 0);
    }
}
