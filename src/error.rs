//! Error types for the projection engine

use thiserror::Error;

/// Everything that can stop a projection run
#[derive(Debug, Error)]
pub enum ModelError {
    /// A required driver is absent from the assumptions
    #[error("Missing assumption: {0}")]
    MissingAssumption(String),

    /// A required column is absent from the historical data
    #[error("Missing historical field: {0}")]
    MissingHistoricalField(String),

    /// Fewer historical rows than a computation reads
    #[error("Insufficient history for '{field}': need {required} rows, have {available}")]
    InsufficientHistory {
        field: String,
        required: usize,
        available: usize,
    },

    /// A value that should be numeric is not
    #[error("Type mismatch for '{field}': expected a number, got {value}")]
    TypeMismatch { field: String, value: String },

    /// A statement table does not carry a line item a downstream projector needs
    #[error("Missing line item: {0}")]
    MissingLineItem(String),

    /// A statement column whose length differs from the table's Year column
    #[error("Line item '{line_item}' has {found} values for {expected} years")]
    LineItemLength {
        line_item: String,
        expected: usize,
        found: usize,
    },

    /// Projected years would run past the range of `i32`
    #[error("Year out of range: {last_year} plus {count} projected years")]
    YearOutOfRange { last_year: i32, count: u32 },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ModelError>;
