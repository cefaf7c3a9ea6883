//! Cash flow projection
//!
//! Driven off the projected income statement, which is passed in explicitly
//! rather than recomputed here.

use super::formulas;
use super::income;
use super::series::{LineItemSeries, StatementTable};
use crate::assumptions::{keys, Assumptions};
use crate::error::{ModelError, Result};
use crate::historical::{fields, HistoricalData};

/// Line item names on the projected cash flow statement
pub mod line_items {
    pub const CASH_FLOW_FROM_OPERATIONS: &str = "Cash Flow from Operations";
    pub const CAPITAL_EXPENDITURES: &str = "Capital Expenditures";
    pub const ASSET_DISPOSITION: &str = "Asset Disposition";
    pub const CASH_FLOW_FROM_INVESTING: &str = "Cash Flow from Investing";
    pub const CHANGE_IN_UNSECURED_DEBT: &str = "Change in Unsecured Debt";
    pub const CASH_FLOW_FROM_FINANCING: &str = "Cash Flow from Financing";
    pub const NET_CASH_FLOW: &str = "Net Cash Flow";
    pub const ENDING_CASH_POSITION: &str = "Ending Cash Position";
}

pub const TITLE: &str = "Projected Cash Flow";

/// Projects cash flows from the income statement, assumptions and history
pub struct CashFlow<'a> {
    assumptions: &'a Assumptions,
    historical: &'a HistoricalData,
    income_statement: &'a StatementTable,
}

impl<'a> CashFlow<'a> {
    pub fn new(
        assumptions: &'a Assumptions,
        historical: &'a HistoricalData,
        income_statement: &'a StatementTable,
    ) -> Self {
        Self {
            assumptions,
            historical,
            income_statement,
        }
    }

    /// Years follow the income statement
    fn years(&self) -> Result<Vec<i32>> {
        if self.income_statement.years.is_empty() {
            return Err(ModelError::MissingLineItem(fields::YEAR.to_string()));
        }
        Ok(self.income_statement.years.clone())
    }

    fn periods(&self) -> usize {
        self.income_statement.num_rows()
    }

    fn series<F>(&self, name: &str, values: F) -> Result<LineItemSeries>
    where
        F: FnOnce() -> Result<Vec<f64>>,
    {
        let years = self.years()?;
        Ok(LineItemSeries::new(name, years, values()?))
    }

    /// Income statement line item with exactly one value per year
    fn income_column(&self, name: &str) -> Result<&'a [f64]> {
        let values = self.income_statement.column(name)?;
        let expected = self.periods();
        if values.len() != expected {
            return Err(ModelError::LineItemLength {
                line_item: name.to_string(),
                expected,
                found: values.len(),
            });
        }
        Ok(values)
    }

    pub fn calculate_cash_flow_from_operations(&self) -> Result<LineItemSeries> {
        self.series(line_items::CASH_FLOW_FROM_OPERATIONS, || {
            self.cash_flow_from_operations()
        })
    }

    pub fn calculate_capital_expenditures(&self) -> Result<LineItemSeries> {
        self.series(line_items::CAPITAL_EXPENDITURES, || self.capital_expenditures())
    }

    pub fn calculate_asset_disposition(&self) -> Result<LineItemSeries> {
        self.series(line_items::ASSET_DISPOSITION, || self.asset_disposition())
    }

    pub fn calculate_cash_flow_from_investing(&self) -> Result<LineItemSeries> {
        self.series(line_items::CASH_FLOW_FROM_INVESTING, || {
            self.cash_flow_from_investing()
        })
    }

    pub fn calculate_change_in_unsecured_debt(&self) -> Result<LineItemSeries> {
        self.series(line_items::CHANGE_IN_UNSECURED_DEBT, || {
            self.change_in_unsecured_debt()
        })
    }

    pub fn calculate_cash_flow_from_financing(&self) -> Result<LineItemSeries> {
        self.series(line_items::CASH_FLOW_FROM_FINANCING, || {
            self.cash_flow_from_financing(&self.cash_flow_from_investing()?)
        })
    }

    pub fn calculate_net_cash_flow(&self) -> Result<LineItemSeries> {
        self.series(line_items::NET_CASH_FLOW, || self.net_cash_flow())
    }

    pub fn calculate_ending_cash_position(&self) -> Result<LineItemSeries> {
        self.series(line_items::ENDING_CASH_POSITION, || {
            self.ending_cash_position(&self.net_cash_flow()?)
        })
    }

    /// Full projected cash flow statement, 8 line items keyed by year
    pub fn calculate_all_line_items(&self) -> Result<StatementTable> {
        let years = self.years()?;

        let operations = self.cash_flow_from_operations()?;
        let capex = self.capital_expenditures()?;
        let disposition = self.asset_disposition()?;
        let investing = formulas::difference(&capex, &disposition);
        let debt_change = self.change_in_unsecured_debt()?;
        let financing = formulas::sum(&[&investing, &debt_change]);
        let net = formulas::sum(&[&operations, &investing, &financing]);
        let ending_cash = self.ending_cash_position(&net)?;

        log::debug!(
            "Cash flow: ending cash {:.2} in {}",
            ending_cash.last().copied().unwrap_or_default(),
            years.last().copied().unwrap_or_default()
        );

        let columns = [
            (line_items::CASH_FLOW_FROM_OPERATIONS, operations),
            (line_items::CAPITAL_EXPENDITURES, capex),
            (line_items::ASSET_DISPOSITION, disposition),
            (line_items::CASH_FLOW_FROM_INVESTING, investing),
            (line_items::CHANGE_IN_UNSECURED_DEBT, debt_change),
            (line_items::CASH_FLOW_FROM_FINANCING, financing),
            (line_items::NET_CASH_FLOW, net),
            (line_items::ENDING_CASH_POSITION, ending_cash),
        ];

        let series = columns
            .into_iter()
            .map(|(name, values)| LineItemSeries::new(name, years.clone(), values))
            .collect();

        Ok(StatementTable::from_series(TITLE, years, series))
    }

    // Value-level computations

    fn cash_flow_from_operations(&self) -> Result<Vec<f64>> {
        let net_income = self.income_column(income::line_items::NET_INCOME)?;
        let depreciation = self.historical.last(fields::DEPRECIATION_AMORTIZATION)?;
        Ok(net_income.iter().map(|ni| ni + depreciation).collect())
    }

    fn capital_expenditures(&self) -> Result<Vec<f64>> {
        let pct = self.assumptions.get(keys::CAPEX_PCT_OF_SALES)?;
        let revenue = self.income_column(income::line_items::REVENUE)?;
        Ok(formulas::scale(revenue, pct))
    }

    fn asset_disposition(&self) -> Result<Vec<f64>> {
        let disposition = self.assumptions.get(keys::ASSET_DISPOSITION)?;
        Ok(formulas::constant(disposition, self.periods()))
    }

    fn cash_flow_from_investing(&self) -> Result<Vec<f64>> {
        let capex = self.capital_expenditures()?;
        let disposition = self.asset_disposition()?;
        Ok(formulas::difference(&capex, &disposition))
    }

    fn change_in_unsecured_debt(&self) -> Result<Vec<f64>> {
        let amortization = self.assumptions.get(keys::UNSECURED_DEBT_AMORTIZATION)?;
        Ok(formulas::constant(-amortization, self.periods()))
    }

    /// Built on investing cash flow plus the debt change, as the model has
    /// always reported it; there is no separate financing base.
    fn cash_flow_from_financing(&self, investing: &[f64]) -> Result<Vec<f64>> {
        let debt_change = self.change_in_unsecured_debt()?;
        Ok(formulas::sum(&[investing, &debt_change]))
    }

    fn net_cash_flow(&self) -> Result<Vec<f64>> {
        let operations = self.cash_flow_from_operations()?;
        let investing = self.cash_flow_from_investing()?;
        let financing = self.cash_flow_from_financing(&investing)?;
        Ok(formulas::sum(&[&operations, &investing, &financing]))
    }

    /// Last historical ending cash plus each year's own net flow (not rolled forward)
    fn ending_cash_position(&self, net_cash_flow: &[f64]) -> Result<Vec<f64>> {
        let opening = self.historical.last(fields::ENDING_CASH_POSITION)?;
        Ok(net_cash_flow.iter().map(|flow| opening + flow).collect())
    }
}
