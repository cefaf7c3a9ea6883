//! JSON-based assumption loader
//!
//! The file is a flat object of driver name to value, e.g.
//! `{"Revenue Growth Rate": 0.1, "Tax Rate": 0.21}`.

use super::Assumptions;
use crate::error::{ModelError, Result};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Default path to the assumptions file
pub const DEFAULT_ASSUMPTIONS_PATH: &str = "data/assumptions.json";

/// Load assumptions from a JSON file
pub fn load_assumptions<P: AsRef<Path>>(path: P) -> Result<Assumptions> {
    let path = path.as_ref();
    log::info!("Loading assumptions from {}", path.display());
    let file = File::open(path)?;
    load_assumptions_from_reader(BufReader::new(file))
}

/// Load assumptions from any reader (e.g., string buffer)
pub fn load_assumptions_from_reader<R: Read>(reader: R) -> Result<Assumptions> {
    let raw: Value = serde_json::from_reader(reader)?;

    let object = match raw {
        Value::Object(map) => map,
        other => {
            return Err(ModelError::TypeMismatch {
                field: "assumptions".to_string(),
                value: other.to_string(),
            })
        }
    };

    let mut drivers = BTreeMap::new();
    for (name, value) in object {
        let number = to_number(&name, &value)?;
        drivers.insert(name, number);
    }

    log::debug!("Loaded {} assumption drivers", drivers.len());
    Ok(Assumptions::new(drivers))
}

fn to_number(name: &str, value: &Value) -> Result<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        // Spreadsheet exports sometimes quote numbers
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    parsed.ok_or_else(|| ModelError::TypeMismatch {
        field: name.to_string(),
        value: value.to_string(),
    })
}
