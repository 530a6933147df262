//! shoppulse - sales-data workspace core
//!
//! Users upload spreadsheet exports, the rows are deduplicated and merged into
//! a per-project sales ledger, and a trend model forecasts short-term demand
//! per product. This crate owns the ledger store, the ingestion pipeline, the
//! forecast engine, and the workspace router; page rendering and session
//! handling belong to the caller.

pub mod forecast;
pub mod ingest;
pub mod ledger;
pub mod uploads;
pub mod workspace;

pub use forecast::{forecast, ForecastResult, Recommendation};
pub use ingest::{ingest, IngestMode, IngestReport};
pub use ledger::{Ledger, PurgeScope};
pub use workspace::{ProjectRef, Workspace};

pub use shoppulse_common::{Error, Result};
