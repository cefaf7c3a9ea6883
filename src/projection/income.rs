//! Income statement projection
//!
//! Revenue compounds off the last historical year; COGS and SG&A are
//! percentages of revenue; interest is charged on historical net debt.

use super::engine::ProjectionConfig;
use super::formulas;
use super::series::{projected_years, LineItemSeries, StatementTable};
use crate::assumptions::{keys, Assumptions};
use crate::error::Result;
use crate::historical::{fields, HistoricalData};

/// Line item names on the projected income statement
pub mod line_items {
    pub const REVENUE: &str = "Revenue";
    pub const COGS: &str = "Cost of Goods Sold (COGS)";
    pub const GROSS_PROFIT: &str = "Gross Profit";
    pub const SGA_EXPENSES: &str = "SG&A Expenses";
    pub const OPERATING_INCOME: &str = "Operating Income";
    pub const INTEREST_EXPENSE: &str = "Interest Expense";
    pub const INCOME_TAXES: &str = "Income Taxes";
    pub const NET_INCOME: &str = "Net Income";
}

pub const TITLE: &str = "Projected Income Statement";

/// Projects the income statement from assumptions and the trailing historical year
pub struct IncomeStatement<'a> {
    assumptions: &'a Assumptions,
    historical: &'a HistoricalData,
    config: &'a ProjectionConfig,
}

impl<'a> IncomeStatement<'a> {
    pub fn new(
        assumptions: &'a Assumptions,
        historical: &'a HistoricalData,
        config: &'a ProjectionConfig,
    ) -> Self {
        Self {
            assumptions,
            historical,
            config,
        }
    }

    fn years(&self) -> Result<Vec<i32>> {
        projected_years(self.historical.last_year()?, self.config.projection_years)
    }

    /// Years are resolved before any value, so empty history is reported as
    /// insufficient rather than as whichever field is looked up first.
    fn series<F>(&self, name: &str, values: F) -> Result<LineItemSeries>
    where
        F: FnOnce() -> Result<Vec<f64>>,
    {
        let years = self.years()?;
        Ok(LineItemSeries::new(name, years, values()?))
    }

    pub fn calculate_revenue(&self) -> Result<LineItemSeries> {
        self.series(line_items::REVENUE, || self.revenue())
    }

    pub fn calculate_cogs(&self) -> Result<LineItemSeries> {
        self.series(line_items::COGS, || self.cogs(&self.revenue()?))
    }

    pub fn calculate_gross_profit(&self) -> Result<LineItemSeries> {
        self.series(line_items::GROSS_PROFIT, || {
            let revenue = self.revenue()?;
            let cogs = self.cogs(&revenue)?;
            Ok(formulas::difference(&revenue, &cogs))
        })
    }

    pub fn calculate_sga_expenses(&self) -> Result<LineItemSeries> {
        self.series(line_items::SGA_EXPENSES, || self.sga_expenses(&self.revenue()?))
    }

    pub fn calculate_operating_income(&self) -> Result<LineItemSeries> {
        self.series(line_items::OPERATING_INCOME, || {
            self.operating_income(&self.revenue()?)
        })
    }

    pub fn calculate_interest_expense(&self) -> Result<LineItemSeries> {
        self.series(line_items::INTEREST_EXPENSE, || self.interest_expense())
    }

    pub fn calculate_income_taxes(&self) -> Result<LineItemSeries> {
        self.series(line_items::INCOME_TAXES, || {
            let operating_income = self.operating_income(&self.revenue()?)?;
            let pre_tax = self.pre_tax_income(&operating_income, &self.interest_expense()?)?;
            self.income_taxes(&pre_tax)
        })
    }

    pub fn calculate_net_income(&self) -> Result<LineItemSeries> {
        self.series(line_items::NET_INCOME, || {
            let operating_income = self.operating_income(&self.revenue()?)?;
            self.net_income(&operating_income, &self.interest_expense()?)
        })
    }

    /// Full projected income statement
    ///
    /// Each intermediate series is computed once and reused; the first
    /// missing driver or field aborts the whole statement.
    pub fn calculate_all_line_items(&self) -> Result<StatementTable> {
        let years = self.years()?;

        let revenue = self.revenue()?;
        let cogs = self.cogs(&revenue)?;
        let gross_profit = formulas::difference(&revenue, &cogs);
        let sga = self.sga_expenses(&revenue)?;
        let operating_income = formulas::difference(&gross_profit, &sga);
        let interest = self.interest_expense()?;
        let net_income = self.net_income(&operating_income, &interest)?;

        log::debug!(
            "Income statement: revenue {:.2} -> {:.2}",
            revenue.first().copied().unwrap_or_default(),
            revenue.last().copied().unwrap_or_default()
        );

        let columns = [
            (line_items::REVENUE, revenue),
            (line_items::COGS, cogs),
            (line_items::GROSS_PROFIT, gross_profit),
            (line_items::SGA_EXPENSES, sga),
            (line_items::OPERATING_INCOME, operating_income),
            (line_items::INTEREST_EXPENSE, interest),
            (line_items::NET_INCOME, net_income),
        ];

        let series = columns
            .into_iter()
            .map(|(name, values)| LineItemSeries::new(name, years.clone(), values))
            .collect();

        Ok(StatementTable::from_series(TITLE, years, series))
    }

    // Value-level computations shared by the per-line-item methods

    fn revenue(&self) -> Result<Vec<f64>> {
        let growth = self.assumptions.get(keys::REVENUE_GROWTH_RATE)?;
        let last_revenue = self.historical.last(fields::REVENUE)?;
        Ok(formulas::compound(
            last_revenue,
            growth,
            self.config.projection_years as usize,
        ))
    }

    fn cogs(&self, revenue: &[f64]) -> Result<Vec<f64>> {
        let pct = self.assumptions.get(keys::COGS_PCT_OF_REVENUE)?;
        Ok(formulas::scale(revenue, pct))
    }

    fn sga_expenses(&self, revenue: &[f64]) -> Result<Vec<f64>> {
        let pct = self.assumptions.get(keys::SGA_PCT_OF_SALES)?;
        Ok(formulas::scale(revenue, pct))
    }

    fn operating_income(&self, revenue: &[f64]) -> Result<Vec<f64>> {
        let gross_profit = formulas::difference(revenue, &self.cogs(revenue)?);
        Ok(formulas::difference(&gross_profit, &self.sga_expenses(revenue)?))
    }

    /// Historical net debt times LIBOR, flat across the horizon
    fn interest_expense(&self) -> Result<Vec<f64>> {
        let libor = self.assumptions.get(keys::LIBOR)?;
        let total_liabilities = self.historical.last(fields::TOTAL_LIABILITIES)?;
        let cash = self.historical.last(fields::CASH)?;
        Ok(formulas::constant(
            (total_liabilities - cash) * libor,
            self.config.projection_years as usize,
        ))
    }

    fn pre_tax_income(&self, operating_income: &[f64], interest: &[f64]) -> Result<Vec<f64>> {
        let other = self.historical.last(fields::OTHER_INCOME_EXPENSE)?;
        Ok(formulas::difference(operating_income, interest)
            .into_iter()
            .map(|v| v + other)
            .collect())
    }

    fn income_taxes(&self, pre_tax: &[f64]) -> Result<Vec<f64>> {
        let tax_rate = self.assumptions.get(keys::TAX_RATE)?;
        Ok(formulas::scale(pre_tax, tax_rate))
    }

    fn net_income(&self, operating_income: &[f64], interest: &[f64]) -> Result<Vec<f64>> {
        let pre_tax = self.pre_tax_income(operating_income, interest)?;
        let taxes = self.income_taxes(&pre_tax)?;
        Ok(formulas::difference(&pre_tax, &taxes))
    }
}
