use thiserror::Error;

use crate::cascade::Stage;

/// Failures the benchmarking core reports to its callers.
///
/// Schema problems are fatal for the whole pipeline. [`SpendError::NoData`] is
/// the recoverable terminal state of an over-narrow selection.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SpendError {
    #[error("Required column '{column}' for role {role} not found in input headers")]
    MissingColumn { role: &'static str, column: String },
    #[error("Column '{column}' appears more than once after trimming headers")]
    DuplicateColumn { column: String },
    #[error("Row {row} has {found} cell(s) but the header declares {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("No data available after {stage} selection")]
    NoData { stage: Stage },
}

pub type SpendResult<T> = Result<T, SpendError>;
