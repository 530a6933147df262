//! Header resolution for uploaded files
//!
//! Logical fields are matched against the file's header case-insensitively
//! after trimming whitespace, so ` Date `, `PRODUCT` and `quantity` all
//! resolve. `date`, `product` and `quantity` are required; `price` and
//! `revenue` are optional and decide how revenue is derived for the batch.

use csv::StringRecord;
use shoppulse_common::{Error, Result};

/// Where revenue comes from, decided once per batch.
///
/// A `price` column wins over an explicit `revenue` column even when both are
/// present; without either, revenue is 0 for every row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevenueSource {
    /// `revenue = quantity * price`, missing price cells treated as 0
    Price(usize),
    /// Revenue column used directly, missing cells treated as 0
    Revenue(usize),
    /// Neither column present; revenue is 0 for every row
    Zero,
}

/// Resolved positions of the logical fields within one file's header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub date: usize,
    pub product: usize,
    pub quantity: usize,
    pub revenue_source: RevenueSource,
}

/// Match the required and optional logical fields against `headers`.
///
/// Fails with `Error::MissingColumns` naming every unmatched required field;
/// the failure is fatal for the whole batch.
pub fn resolve_columns(headers: &StringRecord) -> Result<ColumnMap> {
    let find = |logical: &str| {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(logical))
    };

    let date = find("date");
    let product = find("product");
    let quantity = find("quantity");

    let mut missing = Vec::new();
    if date.is_none() {
        missing.push("date".to_string());
    }
    if product.is_none() {
        missing.push("product".to_string());
    }
    if quantity.is_none() {
        missing.push("quantity".to_string());
    }
    if !missing.is_empty() {
        return Err(Error::MissingColumns(missing));
    }

    let revenue_source = if let Some(idx) = find("price") {
        RevenueSource::Price(idx)
    } else if let Some(idx) = find("revenue") {
        RevenueSource::Revenue(idx)
    } else {
        RevenueSource::Zero
    };

    Ok(ColumnMap {
        date: date.unwrap(),
        product: product.unwrap(),
        quantity: quantity.unwrap(),
        revenue_source,
    })
}
