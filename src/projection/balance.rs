//! Balance sheet projection
//!
//! Working-capital lines are day-count or COGS ratios over the historical
//! rows by position: historical row `i` drives projected year `i + 1`, so the
//! history must carry at least one row per projected year. Goodwill is held
//! at its last historical value; the remaining fixed lines come straight
//! from assumptions.

use super::engine::ProjectionConfig;
use super::formulas;
use super::series::{projected_years, LineItemSeries, StatementTable};
use crate::assumptions::{keys, Assumptions};
use crate::error::Result;
use crate::historical::{fields, HistoricalData};

/// Line item names on the projected balance sheet
pub mod line_items {
    pub const INVENTORY: &str = "Inventory";
    pub const ACCOUNTS_RECEIVABLE: &str = "Accounts Receivable";
    pub const OTHER_CURRENT_ASSETS: &str = "Other Current Assets";
    pub const TOTAL_CURRENT_ASSETS: &str = "Total Current Assets";
    pub const NET_PPE: &str = "Net PP&E";
    pub const GOODWILL: &str = "Goodwill";
    pub const OTHER_ASSETS: &str = "Other Assets";
    pub const TOTAL_ASSETS: &str = "Total Assets";
    pub const ACCOUNTS_PAYABLE: &str = "Accounts Payable";
    pub const ACCRUED_LIABILITIES: &str = "Accrued Liabilities";
    pub const OTHER_CURRENT_LIABILITIES: &str = "Other Current Liabilities";
    pub const TOTAL_CURRENT_LIABILITIES: &str = "Total Current Liabilities";
    pub const TOTAL_LIABILITIES: &str = "Total Liabilities";
    pub const COMMON_STOCK: &str = "Common Stock";
    pub const TOTAL_SHAREHOLDERS_EQUITY: &str = "Total Shareholders Equity";
    pub const TOTAL_LIABILITIES_AND_EQUITY: &str = "Total Liabilities and Equity";
}

pub const TITLE: &str = "Projected Balance Sheet";

/// Projects the balance sheet from assumptions and historical rows
pub struct BalanceSheet<'a> {
    assumptions: &'a Assumptions,
    historical: &'a HistoricalData,
    config: &'a ProjectionConfig,
}

impl<'a> BalanceSheet<'a> {
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

    fn periods(&self) -> usize {
        self.config.projection_years as usize
    }

    fn years(&self) -> Result<Vec<i32>> {
        projected_years(self.historical.last_year()?, self.config.projection_years)
    }

    fn series<F>(&self, name: &str, values: F) -> Result<LineItemSeries>
    where
        F: FnOnce() -> Result<Vec<f64>>,
    {
        let years = self.years()?;
        Ok(LineItemSeries::new(name, years, values()?))
    }

    /// Historical values by position, one per projected year
    fn history(&self, field: &str) -> Result<&'a [f64]> {
        self.historical.leading(field, self.periods())
    }

    /// Driver held flat across the horizon
    fn flat_assumption(&self, key: &str) -> Result<Vec<f64>> {
        Ok(formulas::constant(self.assumptions.get(key)?, self.periods()))
    }

    // Assets

    pub fn calculate_inventory(&self) -> Result<LineItemSeries> {
        self.series(line_items::INVENTORY, || self.inventory())
    }

    pub fn calculate_accounts_receivable(&self) -> Result<LineItemSeries> {
        self.series(line_items::ACCOUNTS_RECEIVABLE, || self.accounts_receivable())
    }

    pub fn calculate_other_current_assets(&self) -> Result<LineItemSeries> {
        self.series(line_items::OTHER_CURRENT_ASSETS, || {
            self.flat_assumption(keys::OTHER_CURRENT_ASSETS)
        })
    }

    pub fn calculate_total_current_assets(&self) -> Result<LineItemSeries> {
        self.series(line_items::TOTAL_CURRENT_ASSETS, || self.total_current_assets())
    }

    pub fn calculate_net_ppe(&self) -> Result<LineItemSeries> {
        self.series(line_items::NET_PPE, || self.net_ppe())
    }

    pub fn calculate_goodwill(&self) -> Result<LineItemSeries> {
        self.series(line_items::GOODWILL, || self.goodwill())
    }

    pub fn calculate_other_assets(&self) -> Result<LineItemSeries> {
        self.series(line_items::OTHER_ASSETS, || self.flat_assumption(keys::OTHER_ASSETS))
    }

    pub fn calculate_total_assets(&self) -> Result<LineItemSeries> {
        self.series(line_items::TOTAL_ASSETS, || {
            let total_current_assets = self.total_current_assets()?;
            let net_ppe = self.net_ppe()?;
            let goodwill = self.goodwill()?;
            let other_assets = self.flat_assumption(keys::OTHER_ASSETS)?;
            Ok(formulas::sum(&[&total_current_assets, &net_ppe, &goodwill, &other_assets]))
        })
    }

    // Liabilities and equity

    pub fn calculate_accounts_payable(&self) -> Result<LineItemSeries> {
        self.series(line_items::ACCOUNTS_PAYABLE, || self.accounts_payable())
    }

    pub fn calculate_accrued_liabilities(&self) -> Result<LineItemSeries> {
        self.series(line_items::ACCRUED_LIABILITIES, || self.accrued_liabilities())
    }

    pub fn calculate_other_current_liabilities(&self) -> Result<LineItemSeries> {
        self.series(line_items::OTHER_CURRENT_LIABILITIES, || self.other_current_liabilities())
    }

    pub fn calculate_total_current_liabilities(&self) -> Result<LineItemSeries> {
        self.series(line_items::TOTAL_CURRENT_LIABILITIES, || self.total_current_liabilities())
    }

    pub fn calculate_total_liabilities(&self) -> Result<LineItemSeries> {
        self.series(line_items::TOTAL_LIABILITIES, || self.total_liabilities())
    }

    pub fn calculate_common_stock(&self) -> Result<LineItemSeries> {
        self.series(line_items::COMMON_STOCK, || self.flat_assumption(keys::COMMON_STOCK))
    }

    pub fn calculate_total_shareholders_equity(&self) -> Result<LineItemSeries> {
        self.series(line_items::TOTAL_SHAREHOLDERS_EQUITY, || self.total_shareholders_equity())
    }

    pub fn calculate_total_liabilities_and_equity(&self) -> Result<LineItemSeries> {
        self.series(line_items::TOTAL_LIABILITIES_AND_EQUITY, || {
            let total_liabilities = self.total_liabilities()?;
            let equity = self.total_shareholders_equity()?;
            Ok(formulas::sum(&[&total_liabilities, &equity]))
        })
    }

    /// Full projected balance sheet, 16 line items keyed by year
    pub fn calculate_all_line_items(&self) -> Result<StatementTable> {
        let years = self.years()?;

        let inventory = self.inventory()?;
        let accounts_receivable = self.accounts_receivable()?;
        let other_current_assets = self.flat_assumption(keys::OTHER_CURRENT_ASSETS)?;
        let total_current_assets =
            formulas::sum(&[&inventory, &accounts_receivable, &other_current_assets]);
        let net_ppe = self.net_ppe()?;
        let goodwill = self.goodwill()?;
        let other_assets = self.flat_assumption(keys::OTHER_ASSETS)?;
        let total_assets =
            formulas::sum(&[&total_current_assets, &net_ppe, &goodwill, &other_assets]);

        let accounts_payable = self.accounts_payable()?;
        let accrued_liabilities = self.accrued_liabilities()?;
        let other_current_liabilities = self.other_current_liabilities()?;
        let total_current_liabilities = formulas::sum(&[
            &accounts_payable,
            &accrued_liabilities,
            &other_current_liabilities,
        ]);
        let other_liabilities = self.assumptions.get(keys::OTHER_LIABILITIES)?;
        let total_liabilities: Vec<f64> = total_current_liabilities
            .iter()
            .map(|v| v + other_liabilities)
            .collect();
        let common_stock = self.flat_assumption(keys::COMMON_STOCK)?;
        let retained_earnings = self.history(fields::RETAINED_EARNINGS)?;
        let equity = formulas::sum(&[&common_stock, retained_earnings]);
        let total_liabilities_and_equity = formulas::sum(&[&total_liabilities, &equity]);

        log::debug!(
            "Balance sheet: total assets {:.2}, liabilities and equity {:.2} (first year)",
            total_assets.first().copied().unwrap_or_default(),
            total_liabilities_and_equity.first().copied().unwrap_or_default()
        );

        let columns = [
            (line_items::INVENTORY, inventory),
            (line_items::ACCOUNTS_RECEIVABLE, accounts_receivable),
            (line_items::OTHER_CURRENT_ASSETS, other_current_assets),
            (line_items::TOTAL_CURRENT_ASSETS, total_current_assets),
            (line_items::NET_PPE, net_ppe),
            (line_items::GOODWILL, goodwill),
            (line_items::OTHER_ASSETS, other_assets),
            (line_items::TOTAL_ASSETS, total_assets),
            (line_items::ACCOUNTS_PAYABLE, accounts_payable),
            (line_items::ACCRUED_LIABILITIES, accrued_liabilities),
            (line_items::OTHER_CURRENT_LIABILITIES, other_current_liabilities),
            (line_items::TOTAL_CURRENT_LIABILITIES, total_current_liabilities),
            (line_items::TOTAL_LIABILITIES, total_liabilities),
            (line_items::COMMON_STOCK, common_stock),
            (line_items::TOTAL_SHAREHOLDERS_EQUITY, equity),
            (line_items::TOTAL_LIABILITIES_AND_EQUITY, total_liabilities_and_equity),
        ];

        let series = columns
            .into_iter()
            .map(|(name, values)| LineItemSeries::new(name, years.clone(), values))
            .collect();

        Ok(StatementTable::from_series(TITLE, years, series))
    }

    // Value-level computations

    fn days_per_year(&self) -> Result<f64> {
        self.config.checked_days_per_year()
    }

    fn inventory(&self) -> Result<Vec<f64>> {
        let days = self.assumptions.get(keys::DAYS_INVENTORY)?;
        let cogs = self.history(fields::COGS)?;
        Ok(formulas::day_count(cogs, days, self.days_per_year()?))
    }

    fn accounts_receivable(&self) -> Result<Vec<f64>> {
        let days = self.assumptions.get(keys::DAYS_ACCOUNTS_RECEIVABLE)?;
        let revenue = self.history(fields::REVENUE)?;
        Ok(formulas::day_count(revenue, days, self.days_per_year()?))
    }

    fn total_current_assets(&self) -> Result<Vec<f64>> {
        let inventory = self.inventory()?;
        let accounts_receivable = self.accounts_receivable()?;
        let other = self.flat_assumption(keys::OTHER_CURRENT_ASSETS)?;
        Ok(formulas::sum(&[&inventory, &accounts_receivable, &other]))
    }

    fn net_ppe(&self) -> Result<Vec<f64>> {
        let gross = self.history(fields::GROSS_PPE)?;
        let depreciation = self.history(fields::ACCUMULATED_DEPRECIATION)?;
        Ok(formulas::difference(gross, depreciation))
    }

    fn goodwill(&self) -> Result<Vec<f64>> {
        let goodwill = self.historical.last(fields::GOODWILL)?;
        Ok(formulas::constant(goodwill, self.periods()))
    }

    fn accounts_payable(&self) -> Result<Vec<f64>> {
        let days = self.assumptions.get(keys::DAYS_PAYABLE)?;
        let cogs = self.history(fields::COGS)?;
        Ok(formulas::day_count(cogs, days, self.days_per_year()?))
    }

    fn accrued_liabilities(&self) -> Result<Vec<f64>> {
        let pct = self.assumptions.get(keys::ACCRUED_LIABILITIES_PCT_OF_COGS)?;
        Ok(formulas::scale(self.history(fields::COGS)?, pct))
    }

    fn other_current_liabilities(&self) -> Result<Vec<f64>> {
        let pct = self
            .assumptions
            .get(keys::OTHER_CURRENT_LIABILITIES_PCT_OF_COGS)?;
        Ok(formulas::scale(self.history(fields::COGS)?, pct))
    }

    fn total_current_liabilities(&self) -> Result<Vec<f64>> {
        let accounts_payable = self.accounts_payable()?;
        let accrued = self.accrued_liabilities()?;
        let other = self.other_current_liabilities()?;
        Ok(formulas::sum(&[&accounts_payable, &accrued, &other]))
    }

    fn total_liabilities(&self) -> Result<Vec<f64>> {
        let current = self.total_current_liabilities()?;
        let other = self.flat_assumption(keys::OTHER_LIABILITIES)?;
        Ok(formulas::sum(&[&current, &other]))
    }

    fn total_shareholders_equity(&self) -> Result<Vec<f64>> {
        let common_stock = self.flat_assumption(keys::COMMON_STOCK)?;
        let retained_earnings = self.history(fields::RETAINED_EARNINGS)?;
        Ok(formulas::sum(&[&common_stock, retained_earnings]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelError;
    use approx::assert_relative_eq;

    fn assumptions() -> Assumptions {
        [
            (keys::DAYS_INVENTORY, 73.0),
            (keys::DAYS_ACCOUNTS_RECEIVABLE, 36.5),
            (keys::OTHER_CURRENT_ASSETS, 20.0),
            (keys::OTHER_ASSETS, 15.0),
            (keys::DAYS_PAYABLE, 36.5),
            (keys::ACCRUED_LIABILITIES_PCT_OF_COGS, 0.05),
            (keys::OTHER_CURRENT_LIABILITIES_PCT_OF_COGS, 0.02),
            (keys::OTHER_LIABILITIES, 40.0),
            (keys::COMMON_STOCK, 100.0),
        ]
        .into_iter()
        .collect()
    }

    fn historical(rows: usize) -> HistoricalData {
        let years: Vec<i32> = (0..rows as i32).map(|i| 2019 + i).collect();
        let scaled = |base: f64| -> Vec<f64> { (0..rows).map(|i| base + 100.0 * i as f64).collect() };

        HistoricalData::new(years)
            .with_column(fields::COGS, scaled(365.0))
            .and_then(|h| h.with_column(fields::REVENUE, scaled(730.0)))
            .and_then(|h| h.with_column(fields::GROSS_PPE, scaled(500.0)))
            .and_then(|h| h.with_column(fields::ACCUMULATED_DEPRECIATION, scaled(200.0)))
            .and_then(|h| h.with_column(fields::GOODWILL, scaled(50.0)))
            .and_then(|h| h.with_column(fields::RETAINED_EARNINGS, scaled(300.0)))
            .unwrap()
    }

    fn balance_sheet() -> StatementTable {
        let assumptions = assumptions();
        let historical = historical(5);
        let config = ProjectionConfig::default();
        BalanceSheet::new(&assumptions, &historical, &config)
            .calculate_all_line_items()
            .unwrap()
    }

    #[test]
    fn test_first_year_values() {
        let table = balance_sheet();

        assert_eq!(table.years, vec![2024, 2025, 2026, 2027, 2028]);
        assert_eq!(table.columns.len(), 16);

        // COGS 365 / 365 * 73 days
        assert_relative_eq!(table.column(line_items::INVENTORY).unwrap()[0], 73.0, epsilon = 1e-9);
        // Revenue 730 / 365 * 36.5 days
        assert_relative_eq!(table.column(line_items::ACCOUNTS_RECEIVABLE).unwrap()[0], 73.0, epsilon = 1e-9);
        assert_relative_eq!(table.column(line_items::TOTAL_CURRENT_ASSETS).unwrap()[0], 166.0, epsilon = 1e-9);
        assert_relative_eq!(table.column(line_items::NET_PPE).unwrap()[0], 300.0, epsilon = 1e-9);
        assert_relative_eq!(table.column(line_items::TOTAL_ASSETS).unwrap()[0], 166.0 + 300.0 + 450.0 + 15.0, epsilon = 1e-9);

        assert_relative_eq!(table.column(line_items::ACCOUNTS_PAYABLE).unwrap()[0], 36.5, epsilon = 1e-9);
        assert_relative_eq!(table.column(line_items::ACCRUED_LIABILITIES).unwrap()[0], 18.25, epsilon = 1e-9);
        assert_relative_eq!(table.column(line_items::OTHER_CURRENT_LIABILITIES).unwrap()[0], 7.3, epsilon = 1e-9);
        assert_relative_eq!(table.column(line_items::TOTAL_LIABILITIES).unwrap()[0], 36.5 + 18.25 + 7.3 + 40.0, epsilon = 1e-9);
        assert_relative_eq!(table.column(line_items::TOTAL_SHAREHOLDERS_EQUITY).unwrap()[0], 400.0, epsilon = 1e-9);
    }

    #[test]
    fn test_positional_history_drives_each_year() {
        let table = balance_sheet();
        let inventory = table.column(line_items::INVENTORY).unwrap();
        let retained = table.column(line_items::TOTAL_SHAREHOLDERS_EQUITY).unwrap();

        // Row i of history feeds projected year i + 1
        assert_relative_eq!(inventory[4], (365.0 + 400.0) / 365.0 * 73.0, epsilon = 1e-9);
        assert_relative_eq!(retained[4], 100.0 + 700.0, epsilon = 1e-9);
    }

    #[test]
    fn test_flat_lines_use_last_goodwill_and_assumptions() {
        let table = balance_sheet();
        for &goodwill in table.column(line_items::GOODWILL).unwrap() {
            assert_relative_eq!(goodwill, 450.0);
        }
        for &stock in table.column(line_items::COMMON_STOCK).unwrap() {
            assert_relative_eq!(stock, 100.0);
        }
        for &other in table.column(line_items::OTHER_CURRENT_ASSETS).unwrap() {
            assert_relative_eq!(other, 20.0);
        }
    }

    #[test]
    fn test_subtotal_identities() {
        let table = balance_sheet();
        let col = |name: &str| table.column(name).unwrap();

        for i in 0..table.num_rows() {
            assert_relative_eq!(
                col(line_items::TOTAL_ASSETS)[i],
                col(line_items::TOTAL_CURRENT_ASSETS)[i]
                    + col(line_items::NET_PPE)[i]
                    + col(line_items::GOODWILL)[i]
                    + col(line_items::OTHER_ASSETS)[i],
                epsilon = 1e-9
            );
            assert_relative_eq!(
                col(line_items::TOTAL_LIABILITIES_AND_EQUITY)[i],
                col(line_items::TOTAL_LIABILITIES)[i] + col(line_items::TOTAL_SHAREHOLDERS_EQUITY)[i],
                epsilon = 1e-9
            );
        }
    }

    #[test]
    fn test_per_line_item_methods_match_statement() {
        let assumptions = assumptions();
        let historical = historical(6);
        let config = ProjectionConfig::default();
        let projector = BalanceSheet::new(&assumptions, &historical, &config);
        let table = projector.calculate_all_line_items().unwrap();

        assert_eq!(table.years[0], 2025);
        assert_eq!(
            projector.calculate_total_assets().unwrap().values,
            table.column(line_items::TOTAL_ASSETS).unwrap()
        );
        assert_eq!(
            projector.calculate_total_liabilities_and_equity().unwrap().values,
            table.column(line_items::TOTAL_LIABILITIES_AND_EQUITY).unwrap()
        );
        assert_eq!(
            projector.calculate_other_current_liabilities().unwrap().values,
            table.column(line_items::OTHER_CURRENT_LIABILITIES).unwrap()
        );
    }

    #[test]
    fn test_short_history_is_rejected() {
        let assumptions = assumptions();
        let historical = historical(3);
        let config = ProjectionConfig::default();

        match BalanceSheet::new(&assumptions, &historical, &config).calculate_all_line_items() {
            Err(ModelError::InsufficientHistory { field, required, available }) => {
                assert_eq!(field, "Cost of Goods Sold (COGS)");
                assert_eq!(required, 5);
                assert_eq!(available, 3);
            }
            other => panic!("expected InsufficientHistory, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_driver() {
        let assumptions: Assumptions = assumptions()
            .iter()
            .filter(|(k, _)| *k != keys::COMMON_STOCK)
            .collect();
        let historical = historical(5);
        let config = ProjectionConfig::default();
        let projector = BalanceSheet::new(&assumptions, &historical, &config);

        assert!(matches!(
            projector.calculate_all_line_items(),
            Err(ModelError::MissingAssumption(ref k)) if k == "Common Stock"
        ));
        assert!(projector.calculate_total_assets().is_ok());
    }

    #[test]
    fn test_zero_days_per_year_is_rejected() {
        let assumptions = assumptions();
        let historical = historical(5);
        let config = ProjectionConfig {
            days_per_year: 0.0,
            ..ProjectionConfig::default()
        };
        let projector = BalanceSheet::new(&assumptions, &historical, &config);

        assert!(matches!(
            projector.calculate_inventory(),
            Err(ModelError::InvalidConfig(_))
        ));
        assert!(matches!(
            projector.calculate_all_line_items(),
            Err(ModelError::InvalidConfig(_))
        ));
        // Lines without a day-count are unaffected
        assert!(projector.calculate_net_ppe().is_ok());
    }

    #[test]
    fn test_empty_history() {
        let assumptions = assumptions();
        let historical = HistoricalData::default();
        let config = ProjectionConfig::default();

        assert!(matches!(
            BalanceSheet::new(&assumptions, &historical, &config).calculate_goodwill(),
            Err(ModelError::InsufficientHistory { available: 0, .. })
        ));
    }
}
