//! Projection drivers (growth rates, ratios, day-counts)

pub mod loader;

pub use loader::{load_assumptions, load_assumptions_from_reader, DEFAULT_ASSUMPTIONS_PATH};

use crate::error::{ModelError, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Driver names as they appear in the assumptions file
pub mod keys {
    // Income statement
    pub const REVENUE_GROWTH_RATE: &str = "Revenue Growth Rate";
    pub const COGS_PCT_OF_REVENUE: &str = "COGS as % of Revenue";
    pub const SGA_PCT_OF_SALES: &str = "SG&A as % of Sales";
    pub const LIBOR: &str = "LIBOR";
    pub const TAX_RATE: &str = "Tax Rate";

    // Balance sheet
    pub const DAYS_INVENTORY: &str = "Days Inventory";
    pub const DAYS_ACCOUNTS_RECEIVABLE: &str = "Days Accounts Receivable";
    pub const OTHER_CURRENT_ASSETS: &str = "Other Current Assets";
    pub const OTHER_ASSETS: &str = "Other Assets";
    pub const DAYS_PAYABLE: &str = "Days Payable";
    pub const ACCRUED_LIABILITIES_PCT_OF_COGS: &str = "Accrued Liabilities as % of COGS";
    pub const OTHER_CURRENT_LIABILITIES_PCT_OF_COGS: &str = "Other Current Liabilities as % of COGS";
    pub const OTHER_LIABILITIES: &str = "Other Liabilities";
    pub const COMMON_STOCK: &str = "Common Stock";

    // Cash flow
    pub const CAPEX_PCT_OF_SALES: &str = "Capex as % of Sales";
    pub const ASSET_DISPOSITION: &str = "Asset Disposition";
    pub const UNSECURED_DEBT_AMORTIZATION: &str = "Unsecured Debt Amortization";
}

/// Named driver values for a projection run
///
/// Immutable once loaded. Lookups of absent drivers fail with
/// [`ModelError::MissingAssumption`]; no defaults are substituted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Assumptions {
    drivers: BTreeMap<String, f64>,
}

impl Assumptions {
    pub fn new(drivers: BTreeMap<String, f64>) -> Self {
        Self { drivers }
    }

    /// Load assumptions from the default JSON file (data/assumptions.json)
    pub fn from_json() -> Result<Self> {
        load_assumptions(DEFAULT_ASSUMPTIONS_PATH)
    }

    /// Load assumptions from a specific JSON file
    pub fn from_json_path(path: &Path) -> Result<Self> {
        load_assumptions(path)
    }

    /// Value of a driver
    pub fn get(&self, key: &str) -> Result<f64> {
        self.drivers
            .get(key)
            .copied()
            .ok_or_else(|| ModelError::MissingAssumption(key.to_string()))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.drivers.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.drivers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drivers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.drivers.iter().map(|(k, &v)| (k.as_str(), v))
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for Assumptions {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self {
            drivers: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_present_driver() {
        let assumptions: Assumptions = [(keys::TAX_RATE, 0.21)].into_iter().collect();
        assert_eq!(assumptions.get(keys::TAX_RATE).unwrap(), 0.21);
        assert!(assumptions.contains(keys::TAX_RATE));
        assert_eq!(assumptions.len(), 1);
    }

    #[test]
    fn test_get_missing_driver() {
        let assumptions = Assumptions::default();
        match assumptions.get(keys::LIBOR) {
            Err(ModelError::MissingAssumption(key)) => assert_eq!(key, "LIBOR"),
            other => panic!("expected MissingAssumption, got {:?}", other),
        }
    }
}
