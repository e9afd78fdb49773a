//! In-memory tabular structure shared by the loader, pipeline, and store.
//!
//! A [`Frame`] is an ordered list of column labels plus ordered rows of cells
//! aligned positionally with the labels. The pipeline consumes a raw frame
//! from the loader and emits a cleaned frame with the canonical column set.

use crate::value::Cell;

/// Tabular input and output of the cleaning pipeline. Raw frames come from
/// the loader collaborator; cleaned frames go to the persistence boundary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

pub type RawTable = Frame;
pub type CleanedTable = Frame;

impl Frame {
    pub fn new(columns: Vec<String>) -> Self {
        Frame {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn column_index(&self, label: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == label)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Cell at (row, column label), if both exist.
    pub fn cell(&self, row: usize, label: &str) -> Option<&Cell> {
        let idx = self.column_index(label)?;
        self.rows.get(row).and_then(|r| r.get(idx))
    }

    /// All cells of one column, top to bottom. Rows shorter than the column
    /// position yield the missing marker.
    pub fn column_cells(&self, index: usize) -> Vec<Cell> {
        self.rows
            .iter()
            .map(|row| row.get(index).cloned().unwrap_or(Cell::Missing))
            .collect()
    }

    /// Appends a column; every existing row gets the corresponding value.
    /// `values` must match the current row count.
    pub fn push_column(&mut self, label: impl Into<String>, values: Vec<Cell>) {
        debug_assert_eq!(values.len(), self.rows.len());
        self.columns.push(label.into());
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.push(value);
        }
    }

    /// Renders one row as display strings, for CSV output or table preview.
    pub fn render_row(&self, row: &[Cell]) -> Vec<String> {
        (0..self.columns.len())
            .map(|idx| row.get(idx).map(Cell::as_display).unwrap_or_default())
            .collect()
    }
}
