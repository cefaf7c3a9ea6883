//! Historical financial data and CSV loading

pub mod loader;

pub use loader::{load_historical, load_historical_from_reader, DEFAULT_HISTORICAL_PATH};

use crate::error::{ModelError, Result};
use std::collections::BTreeMap;

/// Column names as they appear in the historical data file
pub mod fields {
    pub const YEAR: &str = "Year";
    pub const REVENUE: &str = "Revenue";
    pub const COGS: &str = "Cost of Goods Sold (COGS)";
    pub const TOTAL_LIABILITIES: &str = "Total Liabilities";
    pub const CASH: &str = "Cash";
    pub const OTHER_INCOME_EXPENSE: &str = "Other Income / (Expense)";
    pub const GROSS_PPE: &str = "Gross PP&E";
    pub const ACCUMULATED_DEPRECIATION: &str = "Accumulated Depreciation";
    pub const GOODWILL: &str = "Goodwill";
    pub const RETAINED_EARNINGS: &str = "Retained Earnings";
    pub const DEPRECIATION_AMORTIZATION: &str = "Depreciation and Amortization";
    pub const ENDING_CASH_POSITION: &str = "Ending Cash Position";
}

/// Historical statement data, one row per year in file order
///
/// The last row is the anchor for all projections.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoricalData {
    years: Vec<i32>,
    columns: BTreeMap<String, Vec<f64>>,
}

impl HistoricalData {
    /// Create an empty table with the given years
    pub fn new(years: Vec<i32>) -> Self {
        Self {
            years,
            columns: BTreeMap::new(),
        }
    }

    /// Add (or replace) a column
    ///
    /// Short columns are rejected: every column must have one value per year.
    pub fn with_column(mut self, name: &str, values: Vec<f64>) -> Result<Self> {
        if values.len() != self.years.len() {
            return Err(ModelError::InsufficientHistory {
                field: name.to_string(),
                required: self.years.len(),
                available: values.len(),
            });
        }
        self.columns.insert(name.to_string(), values);
        Ok(self)
    }

    pub fn num_rows(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    pub fn years(&self) -> &[i32] {
        &self.years
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.columns.contains_key(field)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// Year of the trailing row
    pub fn last_year(&self) -> Result<i32> {
        self.years
            .last()
            .copied()
            .ok_or_else(|| Self::empty_history(fields::YEAR))
    }

    /// Whole column
    pub fn column(&self, field: &str) -> Result<&[f64]> {
        self.columns
            .get(field)
            .map(Vec::as_slice)
            .ok_or_else(|| ModelError::MissingHistoricalField(field.to_string()))
    }

    /// Trailing value of a column
    pub fn last(&self, field: &str) -> Result<f64> {
        let column = self.column(field)?;
        column
            .last()
            .copied()
            .ok_or_else(|| Self::empty_history(field))
    }

    /// Value at row position `index` (0 = oldest row)
    pub fn at(&self, field: &str, index: usize) -> Result<f64> {
        let column = self.column(field)?;
        column
            .get(index)
            .copied()
            .ok_or_else(|| ModelError::InsufficientHistory {
                field: field.to_string(),
                required: index + 1,
                available: column.len(),
            })
    }

    /// First `count` values of a column, by position
    pub fn leading(&self, field: &str, count: usize) -> Result<&[f64]> {
        let column = self.column(field)?;
        column
            .get(..count)
            .ok_or_else(|| ModelError::InsufficientHistory {
                field: field.to_string(),
                required: count,
                available: column.len(),
            })
    }

    fn empty_history(field: &str) -> ModelError {
        ModelError::InsufficientHistory {
            field: field.to_string(),
            required: 1,
            available: 0,
        }
    }
}
