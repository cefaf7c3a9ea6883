//! Three-statement projection: income statement, balance sheet, cash flow

mod formulas;
mod series;
mod engine;
pub mod income;
pub mod balance;
pub mod cashflow;

pub use series::{projected_years, Column, LineItemSeries, StatementTable};
pub use engine::{
    BalanceCheck, FinancialModel, ProjectedStatements, ProjectionConfig,
    DEFAULT_DAYS_PER_YEAR, DEFAULT_PROJECTION_YEARS,
};
pub use income::IncomeStatement;
pub use balance::BalanceSheet;
pub use cashflow::CashFlow;
