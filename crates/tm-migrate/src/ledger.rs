//! Ledger table recording which migrations have been applied.
//!
//! The ledger holds one `(name, version)` row per committed migration. Rows
//! are only ever written inside the transaction that applied the migration,
//! so the table is always a gap-free prefix of the migration set.

use crate::error::{MigrateError, MigrateResult};
use duckdb::{Connection, Transaction};
use serde::Serialize;
use std::fmt;

/// Ledger table used when none is configured.
pub const DEFAULT_LEDGER_TABLE: &str = "schema_migrations";

/// Schema DuckDB resolves unqualified names against.
const DEFAULT_SCHEMA: &str = "main";

/// One applied migration as stored in the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerEntry {
    pub name: String,
    pub version: i64,
}

/// Handle on the ledger table of one database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ledger {
    schema: Option<String>,
    table: String,
}

impl Default for Ledger {
    fn default() -> Self {
        Self {
            schema: None,
            table: DEFAULT_LEDGER_TABLE.to_string(),
        }
    }
}

impl fmt::Display for Ledger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.schema {
            Some(schema) => write!(f, "{schema}.{}", self.table),
            None => write!(f, "{}", self.table),
        }
    }
}

/// Whether `part` is a bare SQL identifier safe to splice into statements.
fn is_identifier(part: &str) -> bool {
    let mut chars = part.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl Ledger {
    /// Parse `table` or `schema.table`.
    pub fn new(name: &str) -> MigrateResult<Self> {
        let parts: Vec<&str> = name.split('.').collect();
        if !parts.iter().all(|part| is_identifier(part)) {
            return Err(MigrateError::InvalidLedgerTable(name.to_string()));
        }
        match parts.as_slice() {
            [table] => Ok(Self {
                schema: None,
                table: (*table).to_string(),
            }),
            [schema, table] => Ok(Self {
                schema: Some((*schema).to_string()),
                table: (*table).to_string(),
            }),
            _ => Err(MigrateError::InvalidLedgerTable(name.to_string())),
        }
    }

    /// Check the catalog for the ledger table.
    pub fn exists(&self, conn: &Connection) -> MigrateResult<bool> {
        let schema = self.schema.as_deref().unwrap_or(DEFAULT_SCHEMA);
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM information_schema.tables \
                 WHERE table_schema = ? AND table_name = ?",
                duckdb::params![schema, self.table],
                |row| row.get(0),
            )
            .map_err(MigrateError::StoreProbe)?;
        Ok(count > 0)
    }

    /// Create the ledger table unless the catalog already lists it.
    pub fn ensure_exists(&self, conn: &Connection) -> MigrateResult<()> {
        if self.exists(conn)? {
            return Ok(());
        }
        if let Some(schema) = &self.schema {
            conn.execute_batch(&format!("CREATE SCHEMA IF NOT EXISTS {schema}"))
                .map_err(MigrateError::StoreProbe)?;
        }
        conn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {self} (
                 name    VARCHAR(255) NOT NULL,
                 version BIGINT UNIQUE NOT NULL
             )"
        ))
        .map_err(MigrateError::StoreProbe)?;
        log::debug!("Created ledger table {self}");
        Ok(())
    }

    /// Return the highest recorded version, or 0 if the ledger is empty.
    pub fn current_version(&self, conn: &Connection) -> MigrateResult<i64> {
        conn.query_row(
            &format!("SELECT COALESCE(MAX(version), 0) FROM {self}"),
            [],
            |row| row.get(0),
        )
        .map_err(MigrateError::StoreProbe)
    }

    /// All recorded migrations, oldest first.
    pub fn entries(&self, conn: &Connection) -> MigrateResult<Vec<LedgerEntry>> {
        let mut stmt = conn
            .prepare(&format!("SELECT name, version FROM {self} ORDER BY version"))
            .map_err(MigrateError::StoreProbe)?;
        let rows = stmt
            .query_map([], |row| {
                Ok(LedgerEntry {
                    name: row.get(0)?,
                    version: row.get(1)?,
                })
            })
            .map_err(MigrateError::StoreProbe)?;
        rows.collect::<Result<Vec<_>, _>>()
            .map_err(MigrateError::StoreProbe)
    }

    /// Insert the row for `version` inside the applying transaction.
    pub fn record(&self, tx: &Transaction<'_>, name: &str, version: i64) -> MigrateResult<()> {
        let affected = tx
            .execute(
                &format!("INSERT INTO {self} (name, version) VALUES (?, ?)"),
                duckdb::params![name, version],
            )
            .map_err(|e| MigrateError::LedgerWrite {
                version,
                message: e.to_string(),
            })?;
        expect_one_row(version, "inserting", affected)
    }

    /// Delete the row for `version` inside the reverting transaction.
    pub fn remove(&self, tx: &Transaction<'_>, version: i64) -> MigrateResult<()> {
        let affected = tx
            .execute(
                &format!("DELETE FROM {self} WHERE version = ?"),
                duckdb::params![version],
            )
            .map_err(|e| MigrateError::LedgerWrite {
                version,
                message: e.to_string(),
            })?;
        expect_one_row(version, "deleting", affected)
    }
}

fn expect_one_row(version: i64, action: &str, affected: usize) -> MigrateResult<()> {
    if affected != 1 {
        return Err(MigrateError::LedgerWrite {
            version,
            message: format!(
                "invalid rows affected when {action} migration: expected 1, got {affected}"
            ),
        });
    }
    Ok(())
}

#[cfg(test)]
#[path = "ledger_test.rs"]
mod tests;
