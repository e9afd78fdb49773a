//! Error taxonomy for the cleaning pipeline.
//!
//! Every kind is fatal to the current invocation; nothing is retried. The only
//! silently-absorbed failure in the whole pipeline is a per-value numeric
//! parse, which becomes the missing marker instead of an error.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CleanError {
    /// Source bytes could not be read as tabular data.
    #[error("Failed to load file: {0}")]
    Load(String),

    /// Duplicated-header-row detection or strip failed.
    #[error("Failed during initial cleaning: {0}")]
    InitialCleaning(String),

    /// Fuzzy rename resolution failed structurally.
    #[error("Failed during column rename: {0}")]
    Rename(String),

    /// A canonical column's values could not be coerced.
    #[error("Failed converting column '{column}': {reason}")]
    ColumnConversion { column: String, reason: String },

    /// No usable salary field to derive the salary level from. The level
    /// column is still emitted as "Unknown", but the table is unusable and
    /// the caller must not treat the result as success.
    #[error(
        "Could not find a salary column to derive Region_Salary_Level. \
         Expected one of: Employees_Average_Salary or Average_Insurable_Salary_Total."
    )]
    MissingSalarySource,

    /// Required canonical columns absent at the persistence boundary.
    #[error("Missing columns for insert: {missing:?}")]
    MissingColumnsForInsert { missing: Vec<String> },
}
