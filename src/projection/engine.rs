//! Runs the three statement projections in dependency order

use super::balance::{self, BalanceSheet};
use super::cashflow::CashFlow;
use super::income::IncomeStatement;
use super::series::StatementTable;
use crate::assumptions::{self, Assumptions};
use crate::error::{ModelError, Result};
use crate::historical::{self, HistoricalData};
use serde::Serialize;
use std::fs::File;
use std::path::Path;

/// Number of years projected past the last historical year
pub const DEFAULT_PROJECTION_YEARS: u32 = 5;

/// Divisor for day-count ratios
pub const DEFAULT_DAYS_PER_YEAR: f64 = 365.0;

/// Configuration for a projection run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionConfig {
    /// Number of years to project
    pub projection_years: u32,

    /// Days per year used by inventory, receivable and payable day-counts
    pub days_per_year: f64,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            projection_years: DEFAULT_PROJECTION_YEARS,
            days_per_year: DEFAULT_DAYS_PER_YEAR,
        }
    }
}

impl ProjectionConfig {
    /// Day-count divisor, which must be a positive finite number
    pub fn checked_days_per_year(&self) -> Result<f64> {
        if self.days_per_year.is_finite() && self.days_per_year > 0.0 {
            Ok(self.days_per_year)
        } else {
            Err(ModelError::InvalidConfig(format!(
                "days_per_year must be positive, got {}",
                self.days_per_year
            )))
        }
    }
}

/// The three projected statements from one run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectedStatements {
    pub income_statement: StatementTable,
    pub balance_sheet: StatementTable,
    pub cash_flow: StatementTable,
}

impl ProjectedStatements {
    /// Statements in reporting order
    pub fn statements(&self) -> [&StatementTable; 3] {
        [&self.income_statement, &self.balance_sheet, &self.cash_flow]
    }

    /// Compare Total Assets against Total Liabilities and Equity
    pub fn balance_check(&self, tolerance: f64) -> Result<BalanceCheck> {
        let assets = self.balance_sheet.column(balance::line_items::TOTAL_ASSETS)?;
        let claims = self
            .balance_sheet
            .column(balance::line_items::TOTAL_LIABILITIES_AND_EQUITY)?;

        Ok(BalanceCheck {
            years: self.balance_sheet.years.clone(),
            differences: assets.iter().zip(claims).map(|(a, c)| a - c).collect(),
            tolerance,
        })
    }

    /// Write income_statement.csv, balance_sheet.csv and cash_flow.csv into `dir`
    pub fn write_csv_dir(&self, dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dir)?;
        let outputs = [
            ("income_statement.csv", &self.income_statement),
            ("balance_sheet.csv", &self.balance_sheet),
            ("cash_flow.csv", &self.cash_flow),
        ];
        for (file_name, table) in outputs {
            let path = dir.join(file_name);
            table.write_csv(File::create(&path)?)?;
            log::info!("Wrote {}", path.display());
        }
        Ok(())
    }
}

/// Per-year gap between Total Assets and Total Liabilities and Equity
///
/// Diagnostic only: the projection formulas do not force the sheet to balance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceCheck {
    pub years: Vec<i32>,
    /// Total Assets minus Total Liabilities and Equity
    pub differences: Vec<f64>,
    pub tolerance: f64,
}

impl BalanceCheck {
    pub fn balanced(&self) -> bool {
        self.differences.iter().all(|d| d.abs() <= self.tolerance)
    }

    pub fn max_abs_difference(&self) -> f64 {
        self.differences.iter().fold(0.0, |acc: f64, d| acc.max(d.abs()))
    }

    /// Years whose gap exceeds the tolerance
    pub fn unbalanced_years(&self) -> Vec<i32> {
        self.years
            .iter()
            .zip(&self.differences)
            .filter(|(_, d)| d.abs() > self.tolerance)
            .map(|(&y, _)| y)
            .collect()
    }
}

/// Loaded inputs plus configuration; runs all three projections
#[derive(Debug, Clone)]
pub struct FinancialModel {
    assumptions: Assumptions,
    historical: HistoricalData,
    config: ProjectionConfig,
}

impl FinancialModel {
    pub fn new(assumptions: Assumptions, historical: HistoricalData, config: ProjectionConfig) -> Self {
        Self {
            assumptions,
            historical,
            config,
        }
    }

    /// Load inputs from the default data/ files
    pub fn from_default_files(config: ProjectionConfig) -> Result<Self> {
        Self::from_files(
            Path::new(assumptions::DEFAULT_ASSUMPTIONS_PATH),
            Path::new(historical::DEFAULT_HISTORICAL_PATH),
            config,
        )
    }

    /// Load inputs from an assumptions JSON file and a historical CSV file
    pub fn from_files(
        assumptions_path: &Path,
        historical_path: &Path,
        config: ProjectionConfig,
    ) -> Result<Self> {
        let assumptions = assumptions::load_assumptions(assumptions_path)?;
        let historical = historical::load_historical(historical_path)?;
        Ok(Self::new(assumptions, historical, config))
    }

    pub fn assumptions(&self) -> &Assumptions {
        &self.assumptions
    }

    pub fn historical(&self) -> &HistoricalData {
        &self.historical
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    pub fn income_statement(&self) -> IncomeStatement<'_> {
        IncomeStatement::new(&self.assumptions, &self.historical, &self.config)
    }

    pub fn balance_sheet(&self) -> BalanceSheet<'_> {
        BalanceSheet::new(&self.assumptions, &self.historical, &self.config)
    }

    pub fn cash_flow<'a>(&'a self, income_statement: &'a StatementTable) -> CashFlow<'a> {
        CashFlow::new(&self.assumptions, &self.historical, income_statement)
    }

    /// Project all three statements
    ///
    /// The income statement runs first since the cash flow consumes it. The
    /// first error aborts the run; no partial statements are returned.
    pub fn run(&self) -> Result<ProjectedStatements> {
        log::info!(
            "Projecting {} years from {}",
            self.config.projection_years,
            self.historical.last_year()?
        );

        let income_statement = self.income_statement().calculate_all_line_items()?;
        let balance_sheet = self.balance_sheet().calculate_all_line_items()?;
        let cash_flow = self.cash_flow(&income_statement).calculate_all_line_items()?;

        log::info!("Projection complete");

        Ok(ProjectedStatements {
            income_statement,
            balance_sheet,
            cash_flow,
        })
    }
}
