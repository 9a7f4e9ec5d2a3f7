//! Error types for the migration runner.

use thiserror::Error;

/// Migration runner errors.
#[derive(Error, Debug)]
pub enum MigrateError {
    /// Ledger existence check or version read failed (MG001).
    #[error("[MG001] Ledger probe failed")]
    StoreProbe(#[source] duckdb::Error),

    /// A migration's up body failed (MG002).
    #[error("[MG002] Migration v{version:03} ({name}) failed to apply")]
    Apply {
        version: i64,
        name: String,
        #[source]
        source: Box<MigrateError>,
    },

    /// Writing or deleting the ledger row failed (MG003).
    #[error("[MG003] Ledger write for v{version:03} failed: {message}")]
    LedgerWrite { version: i64, message: String },

    /// BEGIN or COMMIT failed (MG004).
    #[error("[MG004] Migration transaction failed: {0}")]
    Transaction(String),

    /// Two migrations share a version (MG005).
    #[error("[MG005] Duplicate migration version v{version:03}")]
    DuplicateVersion { version: i64 },

    /// A migration's version or name is unusable (MG006).
    #[error("[MG006] Invalid migration v{version:03}: {reason}")]
    InvalidMigration { version: i64, reason: String },

    /// The configured ledger table is not a plain identifier (MG007).
    #[error("[MG007] Invalid ledger table name '{0}'")]
    InvalidLedgerTable(String),

    /// A migration has no down body (MG008).
    #[error("[MG008] Migration v{version:03} ({name}) cannot be reverted")]
    Irreversible { version: i64, name: String },

    /// The ledger holds a version no known migration carries (MG009).
    #[error("[MG009] Ledger entry v{version:03} has no matching migration")]
    UnknownMigration { version: i64 },

    /// A migration's down body failed (MG010).
    #[error("[MG010] Migration v{version:03} ({name}) failed to revert")]
    Revert {
        version: i64,
        name: String,
        #[source]
        source: Box<MigrateError>,
    },

    /// DuckDB driver error with preserved source chain (MG011).
    #[error("[MG011] DuckDB error")]
    DuckDb(#[source] duckdb::Error),

    /// Failure raised by a hand-written migration body (MG012).
    #[error("[MG012] {0}")]
    Failed(String),

    /// The ledger row and the migration at its version disagree on name (MG013).
    #[error("[MG013] Ledger entry v{version:03} was applied as '{recorded}' but the migration is now '{found}'")]
    NameMismatch {
        version: i64,
        recorded: String,
        found: String,
    },
}

/// Result type alias for [`MigrateError`].
pub type MigrateResult<T> = Result<T, MigrateError>;

impl From<duckdb::Error> for MigrateError {
    fn from(err: duckdb::Error) -> Self {
        MigrateError::DuckDb(err)
    }
}
