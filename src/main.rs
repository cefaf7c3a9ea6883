//! Financial Model CLI
//!
//! Projects the income statement, balance sheet and cash flow from an
//! assumptions file and a historical data file.

use anyhow::Context;
use clap::Parser;
use financial_model::{
    assumptions::{load_assumptions, DEFAULT_ASSUMPTIONS_PATH},
    historical::{load_historical, DEFAULT_HISTORICAL_PATH},
    projection::{DEFAULT_DAYS_PER_YEAR, DEFAULT_PROJECTION_YEARS},
    report::{render_table, ProjectionReport},
    FinancialModel, ProjectionConfig,
};
use std::path::PathBuf;

/// Tolerance for the assets vs liabilities-and-equity check
const BALANCE_TOLERANCE: f64 = 0.01;

#[derive(Debug, Parser)]
#[command(name = "financial_model", version, about = "Three-statement financial projection")]
struct Cli {
    /// Assumptions JSON file (driver name -> value)
    #[arg(long, default_value = DEFAULT_ASSUMPTIONS_PATH)]
    assumptions: PathBuf,

    /// Historical data CSV file (Year plus one column per field)
    #[arg(long, default_value = DEFAULT_HISTORICAL_PATH)]
    historical: PathBuf,

    /// Number of years to project
    #[arg(long, default_value_t = DEFAULT_PROJECTION_YEARS, value_parser = clap::value_parser!(u32).range(1..))]
    years: u32,

    /// Days per year for day-count ratios
    #[arg(long, default_value_t = DEFAULT_DAYS_PER_YEAR, value_parser = parse_days_per_year)]
    days_per_year: f64,

    /// Print a JSON report instead of tables
    #[arg(long)]
    json: bool,

    /// Also write the three statements as CSV files into this directory
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

fn parse_days_per_year(s: &str) -> Result<f64, String> {
    let days: f64 = s.parse().map_err(|e| format!("{}", e))?;
    if days.is_finite() && days > 0.0 {
        Ok(days)
    } else {
        Err(format!("must be a positive number of days, got {}", s))
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let assumptions = load_assumptions(&cli.assumptions)
        .with_context(|| format!("reading assumptions from {}", cli.assumptions.display()))?;
    let historical = load_historical(&cli.historical)
        .with_context(|| format!("reading historical data from {}", cli.historical.display()))?;

    let config = ProjectionConfig {
        projection_years: cli.years,
        days_per_year: cli.days_per_year,
    };

    let model = FinancialModel::new(assumptions, historical, config);
    let statements = model.run().context("projection failed")?;

    let check = statements.balance_check(BALANCE_TOLERANCE)?;
    if !check.balanced() {
        log::warn!(
            "Balance sheet does not balance in {:?} (max gap {:.2})",
            check.unbalanced_years(),
            check.max_abs_difference()
        );
    }

    if let Some(dir) = &cli.output_dir {
        statements
            .write_csv_dir(dir)
            .with_context(|| format!("writing CSV output to {}", dir.display()))?;
    }

    if cli.json {
        let report = ProjectionReport::new(
            model.historical().last_year()?,
            model.config(),
            model.assumptions(),
            &statements,
            &check,
        );
        println!("{}", report.to_json()?);
    } else {
        for (i, table) in statements.statements().into_iter().enumerate() {
            if i > 0 {
                println!();
            }
            print!("{}", render_table(table));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_days_per_year_flag() {
        let cli = Cli::try_parse_from(["financial_model", "--days-per-year", "360"]).unwrap();
        assert_eq!(cli.days_per_year, 360.0);

        let cli = Cli::try_parse_from(["financial_model"]).unwrap();
        assert_eq!(cli.days_per_year, DEFAULT_DAYS_PER_YEAR);

        for bad in ["0", "-365", "inf", "NaN", "days"] {
            assert!(
                Cli::try_parse_from(["financial_model", "--days-per-year", bad]).is_err(),
                "accepted {}",
                bad
            );
        }
    }

    #[test]
    fn test_zero_years_rejected() {
        assert!(Cli::try_parse_from(["financial_model", "--years", "0"]).is_err());
    }
}
