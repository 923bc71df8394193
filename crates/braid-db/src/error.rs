//! Error types for braid-db

use thiserror::Error;

/// Database operation errors
#[derive(Error, Debug)]
pub enum DbError {
    /// Failed to open or create a target database (D001)
    #[error("[D001] Database connection failed: {0}")]
    ConnectionError(String),

    /// SQL execution error (D002)
    #[error("[D002] SQL execution failed: {0}")]
    ExecutionError(String),

    /// Transaction management error (D003)
    #[error("[D003] Transaction failed: {0}")]
    TransactionError(String),

    /// Requested target is not part of the pool (D004)
    #[error("[D004] Unknown target '{name}'. Available targets: {available}")]
    UnknownTarget { name: String, available: String },

    /// Ledger read or write failed (D005)
    #[error("[D005] Version ledger '{table}' failed: {message}")]
    LedgerError { table: String, message: String },

    /// DuckDB driver error with preserved source chain (D006)
    #[error("[D006] DuckDB error")]
    DuckDb(#[source] duckdb::Error),
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;

impl From<duckdb::Error> for DbError {
    fn from(err: duckdb::Error) -> Self {
        DbError::DuckDb(err)
    }
}
