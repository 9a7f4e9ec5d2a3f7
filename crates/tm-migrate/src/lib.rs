//! Migration runner for Tidemark.
//!
//! Applies versioned [`Migration`]s to a DuckDB database exactly once each,
//! recording every applied version in a ledger table inside the same
//! transaction as the migration itself.

pub mod error;
pub mod ledger;
pub mod migration;
pub mod runner;
pub mod sql;

pub use error::{MigrateError, MigrateResult};
pub use ledger::{Ledger, LedgerEntry, DEFAULT_LEDGER_TABLE};
pub use migration::Migration;
pub use runner::{MigrateReport, MigrationStatus, Migrator};
pub use sql::{load_sql_migrations, SqlMigration};
