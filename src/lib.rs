//! Financial Model - Three-statement projection engine
//!
//! This library provides:
//! - Assumption (driver) loading from JSON
//! - Historical statement loading from CSV
//! - Five-year income statement, balance sheet and cash flow projections
//! - Balance sheet reconciliation diagnostics
//! - Console and JSON reporting

pub mod error;
pub mod assumptions;
pub mod historical;
pub mod projection;
pub mod report;

// Re-export commonly used types
pub use error::{ModelError, Result};
pub use assumptions::Assumptions;
pub use historical::HistoricalData;
pub use projection::{
    FinancialModel, ProjectedStatements, ProjectionConfig, StatementTable, LineItemSeries,
};
