//! Derived indicators computed after type coercion: salary-level
//! classification, the male/female wage gap, and the employee ratio.
//!
//! Classification boundaries are data, not scattered literals: an ordered
//! list of (upper bound, label) pairs with a final label for everything else.

use std::collections::HashSet;

use log::debug;

use crate::canonical::CanonicalField;
use crate::error::CleanError;
use crate::frame::Frame;
use crate::value::Cell;

/// Ordered upper-bound bands for the regional salary level. A value belongs
/// to the first band whose bound it is strictly below.
const SALARY_BANDS: &[(f64, &str)] = &[(1000.0, "Low"), (1400.0, "Medium")];
const SALARY_TOP_LABEL: &str = "High";
const SALARY_UNKNOWN_LABEL: &str = "Unknown";

/// Salary sources for the level derivation, in preference order.
const SALARY_SOURCES: [CanonicalField; 2] = [
    CanonicalField::EmployeesAverageSalary,
    CanonicalField::AverageInsurableSalaryTotal,
];

/// Classifies one average salary value into a level label.
pub fn classify_salary_level(avg_salary: Option<f64>) -> &'static str {
    let Some(value) = avg_salary else {
        return SALARY_UNKNOWN_LABEL;
    };
    for (bound, label) in SALARY_BANDS {
        if value < *bound {
            return label;
        }
    }
    SALARY_TOP_LABEL
}

/// Adds the salary-level column when the source export did not carry one.
///
/// Prefers the employee average salary, falls back to the total insurable
/// salary. When neither source exists the column is still emitted, filled
/// with "Unknown", but the invocation fails: the table has no real salary
/// signal and must not be treated as clean.
pub fn derive_salary_level(frame: &mut Frame) -> Result<(), CleanError> {
    if frame
        .column_index(CanonicalField::RegionSalaryLevel.as_str())
        .is_some()
    {
        return Ok(());
    }

    let source = SALARY_SOURCES
        .iter()
        .find_map(|field| frame.column_index(field.as_str()).map(|idx| (*field, idx)));

    match source {
        Some((field, idx)) => {
            debug!("Deriving Region_Salary_Level from {field}");
            let levels = frame
                .column_cells(idx)
                .iter()
                .map(|cell| Cell::text(classify_salary_level(cell.as_number())))
                .collect();
            frame.push_column(CanonicalField::RegionSalaryLevel.as_str(), levels);
            Ok(())
        }
        None => {
            let unknown = vec![Cell::text(SALARY_UNKNOWN_LABEL); frame.row_count()];
            frame.push_column(CanonicalField::RegionSalaryLevel.as_str(), unknown);
            Err(CleanError::MissingSalarySource)
        }
    }
}

/// Adds the wage-gap column: male minus female average employee salary,
/// missing-propagating. Without both sources the column is entirely missing.
pub fn derive_wage_gap(frame: &mut Frame) {
    let values = binary_metric(
        frame,
        CanonicalField::MaleEmployeesAverageSalary,
        CanonicalField::FemaleEmployeesAverageSalary,
        |male, female| Some(male - female),
    );
    frame.push_column(CanonicalField::WageGapMaleFemale.as_str(), values);
}

/// Adds the employee-ratio column: male count over female count, with a zero
/// female count treated as missing rather than a division error.
pub fn derive_employee_ratio(frame: &mut Frame) {
    let values = binary_metric(
        frame,
        CanonicalField::MaleEmployeesCount,
        CanonicalField::FemaleEmployeesCount,
        |male, female| {
            if female == 0.0 {
                None
            } else {
                Some(male / female)
            }
        },
    );
    frame.push_column(CanonicalField::MaleFemaleEmployeeRatio.as_str(), values);
}

fn binary_metric(
    frame: &Frame,
    left: CanonicalField,
    right: CanonicalField,
    op: impl Fn(f64, f64) -> Option<f64>,
) -> Vec<Cell> {
    let left_idx = frame.column_index(left.as_str());
    let right_idx = frame.column_index(right.as_str());
    let (Some(left_idx), Some(right_idx)) = (left_idx, right_idx) else {
        return vec![Cell::Missing; frame.row_count()];
    };
    frame
        .rows
        .iter()
        .map(|row| {
            let lhs = row.get(left_idx).and_then(Cell::as_number);
            let rhs = row.get(right_idx).and_then(Cell::as_number);
            match (lhs, rhs) {
                // Non-finite results (inf - inf is NaN) become missing, so
                // Number cells stay finite.
                (Some(l), Some(r)) => op(l, r)
                    .filter(|value| value.is_finite())
                    .map(Cell::Number)
                    .unwrap_or(Cell::Missing),
                _ => Cell::Missing,
            }
        })
        .collect()
}

/// Removes rows that are exact duplicates across every column, preserving the
/// first occurrence and the relative order of survivors.
pub fn dedupe_rows(frame: &mut Frame) -> usize {
    let mut seen: HashSet<Vec<Cell>> = HashSet::with_capacity(frame.rows.len());
    let before = frame.rows.len();
    frame.rows.retain(|row| seen.insert(row.clone()));
    before - frame.rows.len()
}
