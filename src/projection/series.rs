//! Output structures for projected statements

use crate::error::{ModelError, Result};
use serde::Serialize;
use std::io::Write;

/// Projected years following the last historical year
pub fn projected_years(last_historical_year: i32, count: u32) -> Result<Vec<i32>> {
    i32::try_from(count)
        .ok()
        .and_then(|offset| last_historical_year.checked_add(offset))
        .ok_or(ModelError::YearOutOfRange {
            last_year: last_historical_year,
            count,
        })?;
    Ok((1..=count as i32).map(|i| last_historical_year + i).collect())
}

/// One named line item projected over the horizon
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineItemSeries {
    pub name: String,
    pub years: Vec<i32>,
    pub values: Vec<f64>,
}

impl LineItemSeries {
    pub fn new(name: &str, years: Vec<i32>, values: Vec<f64>) -> Self {
        debug_assert_eq!(years.len(), values.len(), "year/value length mismatch for {}", name);
        Self {
            name: name.to_string(),
            years,
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value for a specific projected year
    pub fn for_year(&self, year: i32) -> Option<f64> {
        self.years
            .iter()
            .position(|&y| y == year)
            .map(|idx| self.values[idx])
    }

    /// (Year, Value) pairs in year order
    pub fn iter(&self) -> impl Iterator<Item = (i32, f64)> + '_ {
        self.years.iter().copied().zip(self.values.iter().copied())
    }
}

/// A single column of a statement table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub name: String,
    pub values: Vec<f64>,
}

/// A projected statement: a Year column plus one column per line item
///
/// Rows are in ascending year order; columns keep insertion order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatementTable {
    pub title: String,
    pub years: Vec<i32>,
    pub columns: Vec<Column>,
}

impl StatementTable {
    pub fn new(title: &str, years: Vec<i32>) -> Self {
        Self {
            title: title.to_string(),
            years,
            columns: Vec::new(),
        }
    }

    /// Assemble a table from line items sharing the same Year column
    pub fn from_series(title: &str, years: Vec<i32>, series: Vec<LineItemSeries>) -> Self {
        let mut table = Self::new(title, years);
        for item in series {
            debug_assert_eq!(item.years, table.years, "year mismatch for {}", item.name);
            table.columns.push(Column {
                name: item.name,
                values: item.values,
            });
        }
        table
    }

    pub fn num_rows(&self) -> usize {
        self.years.len()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Values of a line item, in year order
    pub fn column(&self, name: &str) -> Result<&[f64]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
            .ok_or_else(|| ModelError::MissingLineItem(name.to_string()))
    }

    /// A line item as a standalone series
    pub fn line_item(&self, name: &str) -> Result<LineItemSeries> {
        let values = self.column(name)?.to_vec();
        Ok(LineItemSeries::new(name, self.years.clone(), values))
    }

    /// Rows as (Year, values in column order)
    pub fn rows(&self) -> impl Iterator<Item = (i32, Vec<f64>)> + '_ {
        self.years.iter().enumerate().map(move |(row, &year)| {
            let values = self.columns.iter().map(|c| c.values[row]).collect();
            (year, values)
        })
    }

    /// Write as CSV with a `Year` column first
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        let mut header = vec!["Year".to_string()];
        header.extend(self.columns.iter().map(|c| c.name.clone()));
        csv_writer.write_record(&header)?;

        for (year, values) in self.rows() {
            let mut record = vec![year.to_string()];
            record.extend(values.iter().map(|v| format!("{:.2}", v)));
            csv_writer.write_record(&record)?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    pub fn to_csv_string(&self) -> Result<String> {
        let mut buf = Vec::new();
        self.write_csv(&mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}
