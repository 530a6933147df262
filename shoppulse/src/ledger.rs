//! Ledger store: durable persistence of sales records for one project
//!
//! Wraps a single SQLite database file. Mutations that must be atomic as a
//! unit (dedup-delete plus insert, or clear-all plus insert) run inside one
//! transaction, so a crash mid-merge leaves either the pre- or post-state,
//! never a partially merged ledger. Database-level failures surface as
//! `Error::Store` carrying the backing path; the store never retries.

use chrono::NaiveDate;
use shoppulse_common::db::{create_sales_table, init_database, NewSalesRecord, SalesRecord};
use shoppulse_common::{Error, Result};
use sqlx::{Row, SqlitePool};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// What a purge removes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurgeScope {
    /// Empty the sales table but keep the database file
    AllRecords,
    /// Delete the backing database file entirely (hard reset, irreversible)
    EntireStore,
}

/// Handle to one project's sales ledger
pub struct Ledger {
    pool: SqlitePool,
    db_path: PathBuf,
}

impl Ledger {
    /// Open (creating if necessary) the ledger at `db_path`
    pub async fn open(db_path: &Path) -> Result<Self> {
        let pool = init_database(db_path).await?;
        Ok(Self {
            pool,
            db_path: db_path.to_path_buf(),
        })
    }

    /// Path of the backing database file
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Attach the store path to a database-level failure and log it before
    /// propagating. Aborts only the in-flight transaction; committed data is
    /// untouched.
    fn store_error(&self, err: sqlx::Error) -> Error {
        warn!(
            ledger = %self.db_path.display(),
            error = %err,
            "Ledger operation failed"
        );
        Error::Store {
            path: self.db_path.display().to_string(),
            source: err,
        }
    }

    /// Create the sales table if absent. Idempotent; `open` already runs
    /// this, but callers may invoke it again before any read/write.
    pub async fn ensure_initialized(&self) -> Result<()> {
        create_sales_table(&self.pool).await
    }

    /// Every record in the ledger, in no guaranteed order.
    /// A store that has never been written to yields an empty vec.
    pub async fn query_all(&self) -> Result<Vec<SalesRecord>> {
        let rows = sqlx::query(
            "SELECT id, date, product_name, quantity, revenue FROM sales",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| self.store_error(e))?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            let date_str: String = row.get("date");
            let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").map_err(|_| {
                Error::InvalidInput(format!(
                    "Ledger {} holds a malformed date: {:?}",
                    self.db_path.display(),
                    date_str
                ))
            })?;
            let revenue: Option<f64> = row.get("revenue");
            records.push(SalesRecord {
                id: row.get("id"),
                date,
                product_name: row.get("product_name"),
                quantity: row.get("quantity"),
                revenue: revenue.unwrap_or(0.0),
            });
        }

        Ok(records)
    }

    /// Total number of records
    pub async fn count(&self) -> Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| self.store_error(e))
    }

    /// Remove all rows whose `(date, product_name)` is in `keys`.
    /// Returns the number of rows deleted.
    pub async fn delete_matching(&self, keys: &BTreeSet<(NaiveDate, String)>) -> Result<u64> {
        let outcome: std::result::Result<u64, sqlx::Error> = async {
            let mut tx = self.pool.begin().await?;
            let deleted = delete_keys(&mut tx, keys).await?;
            tx.commit().await?;
            Ok(deleted)
        }
        .await;
        outcome.map_err(|e| self.store_error(e))
    }

    /// Append rows, assigning ids. All-or-nothing: on any failure the whole
    /// batch rolls back and the store is unchanged.
    pub async fn insert_many(&self, rows: &[NewSalesRecord]) -> Result<u64> {
        let outcome: std::result::Result<u64, sqlx::Error> = async {
            let mut tx = self.pool.begin().await?;
            let inserted = insert_rows(&mut tx, rows).await?;
            tx.commit().await?;
            Ok(inserted)
        }
        .await;
        outcome.map_err(|e| self.store_error(e))
    }

    /// Merge one ingest batch in a single transaction.
    ///
    /// With `wipe_existing` the whole table is emptied first (Replace mode);
    /// otherwise rows matching the batch's distinct merge keys are deleted
    /// first (Append mode), which makes re-ingesting the same file
    /// non-duplicating. On any failure the transaction rolls back, restoring
    /// the rows the dedup-delete removed. Returns the number of rows inserted.
    pub async fn merge_batch(&self, rows: &[NewSalesRecord], wipe_existing: bool) -> Result<u64> {
        let outcome: std::result::Result<u64, sqlx::Error> = async {
            let mut tx = self.pool.begin().await?;

            if wipe_existing {
                let wiped = sqlx::query("DELETE FROM sales")
                    .execute(&mut *tx)
                    .await?
                    .rows_affected();
                debug!(wiped, "Replace mode: cleared existing ledger rows");
            } else {
                let keys: BTreeSet<(NaiveDate, String)> =
                    rows.iter().map(NewSalesRecord::merge_key).collect();
                let superseded = delete_keys(&mut tx, &keys).await?;
                if superseded > 0 {
                    debug!(superseded, "Append mode: removed rows superseded by batch keys");
                }
            }

            let inserted = insert_rows(&mut tx, rows).await?;
            tx.commit().await?;
            Ok(inserted)
        }
        .await;
        let inserted = outcome.map_err(|e| self.store_error(e))?;

        info!(
            inserted,
            ledger = %self.db_path.display(),
            "Merged ingest batch"
        );
        Ok(inserted)
    }

    /// Empty the sales table. Returns the number of rows removed.
    pub async fn clear_all(&self) -> Result<u64> {
        let removed = sqlx::query("DELETE FROM sales")
            .execute(&self.pool)
            .await
            .map_err(|e| self.store_error(e))?
            .rows_affected();
        info!(removed, ledger = %self.db_path.display(), "Cleared ledger");
        Ok(removed)
    }

    /// Delete the backing database file entirely. Consumes the handle;
    /// irreversible.
    pub async fn drop_store(self) -> Result<()> {
        self.pool.close().await;
        remove_if_exists(&self.db_path)?;
        // WAL mode leaves sidecar files next to the database
        remove_if_exists(&sidecar(&self.db_path, "-wal"))?;
        remove_if_exists(&sidecar(&self.db_path, "-shm"))?;
        info!(ledger = %self.db_path.display(), "Dropped ledger store");
        Ok(())
    }

    /// Apply a purge of the requested scope
    pub async fn purge(self, scope: PurgeScope) -> Result<()> {
        match scope {
            PurgeScope::AllRecords => {
                self.clear_all().await?;
                Ok(())
            }
            PurgeScope::EntireStore => self.drop_store().await,
        }
    }
}

async fn delete_keys(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    keys: &BTreeSet<(NaiveDate, String)>,
) -> std::result::Result<u64, sqlx::Error> {
    let mut deleted = 0;
    for (date, product_name) in keys {
        deleted += sqlx::query("DELETE FROM sales WHERE date = ? AND product_name = ?")
            .bind(date.format("%Y-%m-%d").to_string())
            .bind(product_name)
            .execute(&mut **tx)
            .await?
            .rows_affected();
    }
    Ok(deleted)
}

async fn insert_rows(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    rows: &[NewSalesRecord],
) -> std::result::Result<u64, sqlx::Error> {
    for row in rows {
        sqlx::query(
            "INSERT INTO sales (date, product_name, quantity, revenue) VALUES (?, ?, ?, ?)",
        )
        .bind(row.date.format("%Y-%m-%d").to_string())
        .bind(&row.product_name)
        .bind(row.quantity)
        .bind(row.revenue)
        .execute(&mut **tx)
        .await?;
    }
    Ok(rows.len() as u64)
}

fn sidecar(db_path: &Path, suffix: &str) -> PathBuf {
    let mut name = db_path.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

fn remove_if_exists(path: &Path) -> std::io::Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}
