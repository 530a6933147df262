//! Ingestion pipeline: one uploaded tabular file in, merged ledger out
//!
//! A file becomes an in-memory batch of normalized rows (column resolution,
//! date normalization, revenue derivation), then the whole batch merges into
//! the ledger in a single transaction. Validation is batch-fatal: a missing
//! column or an unparsable date/quantity rejects the entire file and nothing
//! is written. Partial row-skipping would make the dedup semantics ambiguous.

mod batch;
mod columns;

pub use batch::build_batch;
pub use columns::{resolve_columns, ColumnMap, RevenueSource};

use crate::ledger::Ledger;
use shoppulse_common::Result;
use tracing::info;

/// How an incoming batch reconciles with existing ledger content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestMode {
    /// Delete existing rows matching each incoming `(date, product_name)`
    /// key, then insert. Re-ingesting the same file is idempotent.
    Append,
    /// Delete every existing row, then insert the batch.
    Replace,
}

/// Outcome of a successful ingestion
#[derive(Debug, Clone, serde::Serialize)]
pub struct IngestReport {
    /// Rows inserted into the ledger
    pub inserted: u64,
    /// Human-readable summary for the caller to display
    pub message: String,
}

/// Parse `data` (CSV with a header row) and merge it into `ledger`.
///
/// On any validation or store failure nothing is inserted; the error carries
/// enough context for the caller to report it and continue.
pub async fn ingest(ledger: &Ledger, data: &[u8], mode: IngestMode) -> Result<IngestReport> {
    let rows = build_batch(data)?;
    info!(rows = rows.len(), ?mode, "Ingest batch normalized");

    let inserted = ledger
        .merge_batch(&rows, mode == IngestMode::Replace)
        .await?;

    Ok(IngestReport {
        inserted,
        message: format!("Successfully loaded {} records", inserted),
    })
}
