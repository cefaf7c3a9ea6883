//! Console and JSON rendering of projected statements

use crate::assumptions::Assumptions;
use crate::projection::{BalanceCheck, ProjectedStatements, ProjectionConfig, StatementTable};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Write;

/// Render a statement with one line item per row and one year per column
pub fn render_table(table: &StatementTable) -> String {
    let label_width = table
        .column_names()
        .map(str::len)
        .max()
        .unwrap_or(0)
        .max("Year".len());

    let mut out = String::new();
    let _ = writeln!(out, "{}:", table.title);

    let _ = write!(out, "{:<width$}", "Year", width = label_width);
    for year in &table.years {
        let _ = write!(out, " {:>14}", year);
    }
    out.push('\n');
    out.push_str(&"-".repeat(label_width + 15 * table.years.len()));
    out.push('\n');

    for column in &table.columns {
        let _ = write!(out, "{:<width$}", column.name, width = label_width);
        for value in &column.values {
            let _ = write!(out, " {:>14.2}", value);
        }
        out.push('\n');
    }

    out
}

/// Everything from one run, for machine-readable output
#[derive(Debug, Serialize)]
pub struct ProjectionReport<'a> {
    pub generated_at: DateTime<Utc>,
    pub last_historical_year: i32,
    pub config: &'a ProjectionConfig,
    pub assumptions: &'a Assumptions,
    pub statements: &'a ProjectedStatements,
    pub balance_check: &'a BalanceCheck,
}

impl<'a> ProjectionReport<'a> {
    pub fn new(
        last_historical_year: i32,
        config: &'a ProjectionConfig,
        assumptions: &'a Assumptions,
        statements: &'a ProjectedStatements,
        balance_check: &'a BalanceCheck,
    ) -> Self {
        Self {
            generated_at: Utc::now(),
            last_historical_year,
            config,
            assumptions,
            statements,
            balance_check,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::LineItemSeries;

    fn table() -> StatementTable {
        let years = vec![2024, 2025];
        StatementTable::from_series(
            "Projected Cash Flow",
            years.clone(),
            vec![
                LineItemSeries::new("Net Cash Flow", years.clone(), vec![1234.5, -20.0]),
                LineItemSeries::new("Ending Cash Position", years, vec![1334.5, 80.0]),
            ],
        )
    }

    #[test]
    fn test_render_table_layout() {
        let rendered = render_table(&table());
        let lines: Vec<_> = rendered.lines().collect();

        assert_eq!(lines[0], "Projected Cash Flow:");
        assert!(lines[1].starts_with("Year"));
        assert!(lines[1].ends_with("2025"));
        assert!(lines[2].chars().all(|c| c == '-'));
        assert!(lines[3].starts_with("Net Cash Flow "));
        assert!(lines[3].ends_with("-20.00"));
        assert!(lines[4].contains("1334.50"));
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn test_report_json_shape() {
        let statements = ProjectedStatements {
            income_statement: table(),
            balance_sheet: table(),
            cash_flow: table(),
        };
        let check = BalanceCheck {
            years: vec![2024, 2025],
            differences: vec![0.0, 0.0],
            tolerance: 0.01,
        };
        let config = ProjectionConfig::default();
        let assumptions: Assumptions = [("Tax Rate", 0.21)].into_iter().collect();

        let json = ProjectionReport::new(2023, &config, &assumptions, &statements, &check)
            .to_json()
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["last_historical_year"], 2023);
        assert_eq!(value["config"]["projection_years"], 5);
        assert_eq!(value["assumptions"]["Tax Rate"], 0.21);
        assert_eq!(value["statements"]["cash_flow"]["years"][1], 2025);
        assert_eq!(
            value["statements"]["cash_flow"]["columns"][0]["name"],
            "Net Cash Flow"
        );
        assert!(value["generated_at"].is_string());
    }
}
