//! Cell values flowing through the cleaning pipeline.
//!
//! A [`Cell`] is either text, a number, or the explicit missing marker. The
//! missing marker is data, not an error: per-value numeric coercion failures
//! become [`Cell::Missing`] rather than aborting the column.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Missing,
}

// Number cells produced by the pipeline are always finite (NaN and infinite
// inputs become Missing), so reflexive equality holds and Cell can key a hash
// set for row de-duplication.
impl Eq for Cell {}

impl Hash for Cell {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Cell::Text(s) => {
                0u8.hash(state);
                s.hash(state);
            }
            Cell::Number(n) => {
                1u8.hash(state);
                // -0.0 == 0.0 under PartialEq, so both must hash alike.
                (n + 0.0).to_bits().hash(state);
            }
            Cell::Missing => 2u8.hash(state),
        }
    }
}

impl Cell {
    /// Wraps a raw loader field: empty or whitespace-only becomes missing,
    /// anything else is kept as trimmed text for the coercion stage.
    pub fn from_raw(field: &str) -> Self {
        let trimmed = field.trim();
        if trimmed.is_empty() {
            Cell::Missing
        } else {
            Cell::Text(trimmed.to_string())
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_display(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Number(n) => format_number(*n),
            Cell::Missing => String::new(),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_display())
    }
}

/// Whole numbers render without a fractional part so integer-looking source
/// values survive a round trip through f64 unchanged.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        (value as i64).to_string()
    } else {
        value.to_string()
    }
}

/// Parses a cell's numeric interpretation. `None` means the value cannot be
/// read as a number; the caller decides whether that is missing or fatal.
pub fn parse_number(cell: &Cell) -> Option<f64> {
    match cell {
        Cell::Number(n) => Some(*n),
        Cell::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        Cell::Missing => None,
    }
}
