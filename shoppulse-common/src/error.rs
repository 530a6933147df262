//! Common error types for ShopPulse

use thiserror::Error;

/// Common result type for ShopPulse operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the ShopPulse workspace
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Persistence failure scoped to one ledger store, carrying the store
    /// path so the caller can report which project was affected
    #[error("Store error in {path}: {source}")]
    Store {
        path: String,
        #[source]
        source: sqlx::Error,
    },

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Required logical columns absent from an uploaded file; fatal for the
    /// whole batch, nothing is written to the store.
    #[error("File missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// A cell value could not be interpreted; fatal for the whole batch.
    #[error("Row {row}: could not parse {column} value {value:?}")]
    Parse {
        row: usize,
        column: String,
        value: String,
    },

    /// Forecast requested with too little history for the product.
    /// Recoverable; the caller renders it as guidance, not failure.
    #[error("Not enough data for {product:?}: {days} day(s) of history, need at least {min_days}")]
    InsufficientData {
        product: String,
        days: usize,
        min_days: usize,
    },

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Domain failures a caller is expected to handle by showing a message and
    /// continuing, as opposed to store/configuration faults.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::MissingColumns(_)
                | Error::Parse { .. }
                | Error::InsufficientData { .. }
                | Error::NotFound(_)
                | Error::InvalidInput(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_columns_lists_every_unmatched_field() {
        let err = Error::MissingColumns(vec!["date".into(), "quantity".into()]);
        let msg = err.to_string();
        assert!(msg.contains("date"));
        assert!(msg.contains("quantity"));
    }

    #[test]
    fn insufficient_data_is_recoverable() {
        let err = Error::InsufficientData {
            product: "Milk".into(),
            days: 3,
            min_days: 5,
        };
        assert!(err.is_recoverable());
    }

    #[test]
    fn database_errors_are_not_recoverable() {
        let err = Error::Database(sqlx::Error::PoolClosed);
        assert!(!err.is_recoverable());
    }

    #[test]
    fn store_errors_name_the_backing_path() {
        let err = Error::Store {
            path: "/data/users/alice/data.db".to_string(),
            source: sqlx::Error::PoolClosed,
        };
        assert!(err.to_string().contains("/data/users/alice/data.db"));
        assert!(!err.is_recoverable());
    }
}
