//! Load historical statement data from CSV
//!
//! Expects a header row with a `Year` column; every other column is numeric.

use super::{fields, HistoricalData};
use crate::error::{ModelError, Result};
use csv::Reader;
use std::io::Read;
use std::path::Path;

/// Default path to the historical data file
pub const DEFAULT_HISTORICAL_PATH: &str = "data/historical_data.csv";

/// Load historical data from a CSV file
pub fn load_historical<P: AsRef<Path>>(path: P) -> Result<HistoricalData> {
    let path = path.as_ref();
    log::info!("Loading historical data from {}", path.display());
    let reader = Reader::from_path(path)?;
    read_table(reader)
}

/// Load historical data from any reader (e.g., string buffer)
pub fn load_historical_from_reader<R: Read>(reader: R) -> Result<HistoricalData> {
    read_table(Reader::from_reader(reader))
}

fn read_table<R: Read>(mut reader: Reader<R>) -> Result<HistoricalData> {
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let year_idx = headers
        .iter()
        .position(|h| h == fields::YEAR)
        .ok_or_else(|| ModelError::MissingHistoricalField(fields::YEAR.to_string()))?;

    let mut years = Vec::new();
    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); headers.len()];

    for (row, result) in reader.records().enumerate() {
        let record = result?;

        for (idx, header) in headers.iter().enumerate() {
            let cell = record.get(idx).unwrap_or("");
            if idx == year_idx {
                years.push(parse_year(cell, row)?);
            } else {
                columns[idx].push(parse_amount(header, cell, row)?);
            }
        }
    }

    let mut data = HistoricalData::new(years);
    for (idx, (header, values)) in headers.iter().zip(columns).enumerate() {
        if idx != year_idx {
            data = data.with_column(header, values)?;
        }
    }

    log::debug!(
        "Loaded {} historical rows with {} fields",
        data.num_rows(),
        headers.len() - 1
    );
    Ok(data)
}

fn parse_year(cell: &str, row: usize) -> Result<i32> {
    let trimmed = cell.trim();
    if let Ok(year) = trimmed.parse::<i32>() {
        return Ok(year);
    }
    // "2023.0" from spreadsheet exports
    match trimmed.parse::<f64>() {
        Ok(y) if y.fract() == 0.0 && y.abs() < i32::MAX as f64 => Ok(y as i32),
        _ => Err(mismatch(fields::YEAR, cell, row)),
    }
}

fn parse_amount(header: &str, cell: &str, row: usize) -> Result<f64> {
    let cleaned: String = cell
        .trim()
        .chars()
        .filter(|c| *c != ',' && *c != '$')
        .collect();

    cleaned
        .parse::<f64>()
        .map_err(|_| mismatch(header, cell, row))
}

fn mismatch(field: &str, cell: &str, row: usize) -> ModelError {
    ModelError::TypeMismatch {
        field: format!("{} (row {})", field, row + 1),
        value: format!("{:?}", cell),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Year,Revenue,Cost of Goods Sold (COGS),Cash
2022,900,450,80
2023,\"1,000\",$500, 100
";

    #[test]
    fn test_load_from_reader() {
        let data = load_historical_from_reader(SAMPLE.as_bytes()).unwrap();

        assert_eq!(data.years(), &[2022, 2023]);
        assert_eq!(data.last(fields::REVENUE).unwrap(), 1000.0);
        assert_eq!(data.last(fields::COGS).unwrap(), 500.0);
        assert_eq!(data.at(fields::CASH, 0).unwrap(), 80.0);
        assert!(!data.has_field(fields::YEAR));
    }

    #[test]
    fn test_missing_year_column() {
        let csv = "Revenue,Cash\n1000,100\n";
        assert!(matches!(
            load_historical_from_reader(csv.as_bytes()),
            Err(ModelError::MissingHistoricalField(ref f)) if f == "Year"
        ));
    }

    #[test]
    fn test_non_numeric_cell() {
        let csv = "Year,Revenue\n2023,n/a\n";
        match load_historical_from_reader(csv.as_bytes()) {
            Err(ModelError::TypeMismatch { field, value }) => {
                assert_eq!(field, "Revenue (row 1)");
                assert_eq!(value, "\"n/a\"");
            }
            other => panic!("expected TypeMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_fractional_year_rejected() {
        let csv = "Year,Revenue\n2023.5,1000\n";
        assert!(matches!(
            load_historical_from_reader(csv.as_bytes()),
            Err(ModelError::TypeMismatch { .. })
        ));

        let csv = "Year,Revenue\n2023.0,1000\n";
        let data = load_historical_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(data.last_year().unwrap(), 2023);
    }

    #[test]
    fn test_header_only_file_is_empty() {
        let csv = "Year,Revenue\n";
        let data = load_historical_from_reader(csv.as_bytes()).unwrap();
        assert!(data.is_empty());
    }

    #[test]
    fn test_load_default_historical() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join(DEFAULT_HISTORICAL_PATH);
        let data = load_historical(&path).expect("Failed to load historical data");
        assert!(data.num_rows() >= 5);
        assert!(data.has_field(fields::RETAINED_EARNINGS));
    }
}
