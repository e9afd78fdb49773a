//! Per-field type coercion over renamed canonical columns.

use crate::canonical::{CanonicalField, Coercion, ADMIN_CODE_WIDTH};
use crate::error::CleanError;
use crate::frame::Frame;
use crate::value::{parse_number, Cell};

/// Applies each canonical column's conversion rule in place. Columns that
/// carry no canonical field (extras kept for passthrough) are untouched.
///
/// Numeric parse failures are a per-value concern and become the missing
/// marker. A structurally broken column (a row missing the cell entirely)
/// is fatal and names the column.
pub fn coerce_columns(
    frame: &mut Frame,
    fields: &[Option<CanonicalField>],
) -> Result<(), CleanError> {
    debug_assert_eq!(fields.len(), frame.columns.len());
    for (idx, field) in fields.iter().enumerate() {
        let Some(field) = field else { continue };
        match field.coercion() {
            Coercion::Text => {}
            Coercion::AdminCode => coerce_admin_code(frame, idx, *field)?,
            Coercion::Numeric => coerce_numeric(frame, idx, *field)?,
        }
    }
    Ok(())
}

fn cell_mut<'a>(
    frame: &'a mut Frame,
    row: usize,
    column: usize,
    field: CanonicalField,
) -> Result<&'a mut Cell, CleanError> {
    let width = frame.rows[row].len();
    frame.rows[row]
        .get_mut(column)
        .ok_or_else(|| CleanError::ColumnConversion {
            column: field.to_string(),
            reason: format!("row {} has only {} cell(s)", row + 1, width),
        })
}

/// Administrative codes become text, lose the trailing ".0" artifact left by
/// numeric spreadsheet cells, and are zero-padded to a fixed 7-char width.
fn coerce_admin_code(
    frame: &mut Frame,
    column: usize,
    field: CanonicalField,
) -> Result<(), CleanError> {
    for row in 0..frame.rows.len() {
        let cell = cell_mut(frame, row, column, field)?;
        let text = match cell {
            Cell::Text(s) => s.trim().to_string(),
            Cell::Number(n) => crate::value::format_number(*n),
            Cell::Missing => continue,
        };
        let stripped = text.strip_suffix(".0").unwrap_or(&text);
        *cell = Cell::Text(format!("{:0>width$}", stripped, width = ADMIN_CODE_WIDTH));
    }
    Ok(())
}

fn coerce_numeric(
    frame: &mut Frame,
    column: usize,
    field: CanonicalField,
) -> Result<(), CleanError> {
    for row in 0..frame.rows.len() {
        let cell = cell_mut(frame, row, column, field)?;
        *cell = match parse_number(cell) {
            Some(n) => Cell::Number(n),
            None => Cell::Missing,
        };
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_with(label: &str, cells: Vec<Cell>) -> Frame {
        Frame {
            columns: vec![label.to_string()],
            rows: cells.into_iter().map(|c| vec![c]).collect(),
        }
    }

    #[test]
    fn admin_codes_are_stripped_and_zero_padded() {
        let mut frame = frame_with(
            "Administrative_Code_ATVK",
            vec![
                Cell::text("1234.0"),
                Cell::text("567"),
                Cell::Number(1000011.0),
                Cell::Missing,
            ],
        );
        coerce_columns(
            &mut frame,
            &[Some(CanonicalField::AdministrativeCodeAtvk)],
        )
        .unwrap();
        assert_eq!(frame.rows[0][0], Cell::text("0001234"));
        assert_eq!(frame.rows[1][0], Cell::text("0000567"));
        assert_eq!(frame.rows[2][0], Cell::text("1000011"));
        assert_eq!(frame.rows[3][0], Cell::Missing);
    }

    #[test]
    fn numeric_columns_turn_bad_values_into_missing() {
        let mut frame = frame_with(
            "Employees_Count",
            vec![Cell::text("500"), Cell::text("n/a"), Cell::Missing],
        );
        coerce_columns(&mut frame, &[Some(CanonicalField::EmployeesCount)]).unwrap();
        assert_eq!(frame.rows[0][0], Cell::Number(500.0));
        assert_eq!(frame.rows[1][0], Cell::Missing);
        assert_eq!(frame.rows[2][0], Cell::Missing);
    }

    #[test]
    fn text_columns_are_left_untouched() {
        let mut frame = frame_with("Report_Year", vec![Cell::text("2022")]);
        coerce_columns(&mut frame, &[Some(CanonicalField::ReportYear)]).unwrap();
        assert_eq!(frame.rows[0][0], Cell::text("2022"));
    }

    #[test]
    fn structurally_short_row_is_fatal_and_names_the_column() {
        let mut frame = Frame {
            columns: vec!["x".to_string(), "Employees_Count".to_string()],
            rows: vec![vec![Cell::text("only one cell")]],
        };
        let err = coerce_columns(
            &mut frame,
            &[None, Some(CanonicalField::EmployeesCount)],
        )
        .unwrap_err();
        assert!(err.to_string().contains("Employees_Count"));
    }
}
