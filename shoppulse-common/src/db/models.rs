//! Database models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One row of the sales ledger.
///
/// The `(date, product_name)` pair is the natural merge key: ingestion deletes
/// superseded rows with a matching key before inserting replacements, so a
/// ledger never holds two rows for the same day and product from one batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    /// Surrogate key assigned by the store, immutable
    pub id: i64,
    /// Calendar day (no time-of-day component)
    pub date: NaiveDate,
    /// Free-text identifier, case-preserved, grouped case-sensitively
    pub product_name: String,
    /// Units sold that day, never negative
    pub quantity: i64,
    /// Derived or supplied revenue, 0.0 when absent from the source file
    pub revenue: f64,
}

/// One normalized row of an ingest batch, before the store assigns an id.
/// Transient; lives only for the duration of one ingestion call.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSalesRecord {
    pub date: NaiveDate,
    pub product_name: String,
    pub quantity: i64,
    pub revenue: f64,
}

impl NewSalesRecord {
    /// Merge key for dedup-on-append
    pub fn merge_key(&self) -> (NaiveDate, String) {
        (self.date, self.product_name.clone())
    }
}
