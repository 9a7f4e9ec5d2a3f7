//! Migration runner.
//!
//! [`Migrator`] reads the ledger watermark and applies every migration above
//! it in ascending version order. Each migration and its ledger row share one
//! transaction, so a failure leaves neither behind. Runs stop at the first
//! failure; everything committed before it stays committed.

use crate::error::{MigrateError, MigrateResult};
use crate::ledger::{Ledger, LedgerEntry};
use crate::migration::{validate_set, Migration};
use duckdb::Connection;
use serde::Serialize;

/// Versions applied or reverted by one runner call, in execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrateReport {
    pub versions: Vec<i64>,
}

impl MigrateReport {
    /// True when the call had nothing to do.
    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }
}

/// Applied state of one migration or orphaned ledger row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationStatus {
    pub version: i64,
    pub name: String,
    pub applied: bool,
    /// False for ledger rows with no matching migration in the set.
    pub known: bool,
}

/// Applies a set of migrations to one DuckDB connection.
pub struct Migrator<'c> {
    conn: &'c Connection,
    ledger: Ledger,
    migrations: Vec<Box<dyn Migration>>,
}

impl<'c> Migrator<'c> {
    /// Create a runner over the default `schema_migrations` ledger.
    ///
    /// Migrations are sorted by version; construction order does not matter.
    pub fn new(conn: &'c Connection, migrations: Vec<Box<dyn Migration>>) -> Self {
        Self::with_ledger(conn, Ledger::default(), migrations)
    }

    /// Create a runner that records into `ledger`.
    pub fn with_ledger(
        conn: &'c Connection,
        ledger: Ledger,
        mut migrations: Vec<Box<dyn Migration>>,
    ) -> Self {
        migrations.sort_by_key(|m| m.version());
        Self {
            conn,
            ledger,
            migrations,
        }
    }

    /// The ledger this runner records into.
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Create the ledger table if it is missing.
    pub fn setup(&self) -> MigrateResult<()> {
        self.ledger.ensure_exists(self.conn)
    }

    /// Highest applied version, or 0.
    pub fn current_version(&self) -> MigrateResult<i64> {
        self.ledger.current_version(self.conn)
    }

    /// Migrations above the current watermark, in apply order.
    ///
    /// Rejects the same sets [`Migrator::migrate`] rejects. A missing ledger
    /// counts as nothing applied and is not created.
    pub fn pending(&self) -> MigrateResult<Vec<&dyn Migration>> {
        validate_set(&self.migrations)?;
        let current = if self.ledger.exists(self.conn)? {
            self.current_version()?
        } else {
            0
        };
        Ok(self
            .migrations
            .iter()
            .filter(|m| m.version() > current)
            .map(|m| m.as_ref())
            .collect())
    }

    /// Apply every pending migration.
    ///
    /// Requires [`Migrator::setup`] to have run. Returns the first failure;
    /// migrations after the failing one are never attempted.
    pub fn migrate(&self) -> MigrateResult<MigrateReport> {
        validate_set(&self.migrations)?;
        let current = self.current_version()?;

        let mut report = MigrateReport::default();
        for migration in &self.migrations {
            if migration.version() <= current {
                continue;
            }
            self.apply_one(migration.as_ref())?;
            report.versions.push(migration.version());
        }

        if report.is_empty() {
            log::info!("Database is up to date at v{current:03}");
        } else {
            log::info!("Applied {} migration(s)", report.versions.len());
        }
        Ok(report)
    }

    /// Run `up` and record the ledger row in one transaction.
    fn apply_one(&self, migration: &dyn Migration) -> MigrateResult<()> {
        let version = migration.version();
        let name = migration.name();
        log::debug!("Applying migration v{version:03} ({name})");

        // Dropping `tx` without commit rolls back.
        let tx = self
            .conn
            .unchecked_transaction()
            .map_err(|e| MigrateError::Transaction(format!("BEGIN failed: {e}")))?;

        migration.up(&tx).map_err(|e| MigrateError::Apply {
            version,
            name: name.to_string(),
            source: Box::new(e),
        })?;
        self.ledger.record(&tx, name, version)?;

        tx.commit()
            .map_err(|e| MigrateError::Transaction(format!("COMMIT failed: {e}")))
    }

    /// Revert applied migrations above `target`, newest first.
    ///
    /// Each migration's `down` and the removal of its ledger row share one
    /// transaction. Stops at the first failure.
    pub fn rollback(&self, target: i64) -> MigrateResult<MigrateReport> {
        validate_set(&self.migrations)?;
        let entries = self.ledger.entries(self.conn)?;

        let mut report = MigrateReport::default();
        for entry in entries.iter().rev().filter(|e| e.version > target) {
            let migration = self
                .find(entry.version)
                .ok_or(MigrateError::UnknownMigration {
                    version: entry.version,
                })?;
            if migration.name() != entry.name {
                return Err(MigrateError::NameMismatch {
                    version: entry.version,
                    recorded: entry.name.clone(),
                    found: migration.name().to_string(),
                });
            }
            self.revert_one(migration)?;
            report.versions.push(entry.version);
        }
        Ok(report)
    }

    fn revert_one(&self, migration: &dyn Migration) -> MigrateResult<()> {
        let version = migration.version();
        let name = migration.name();
        log::debug!("Reverting migration v{version:03} ({name})");

        let tx = self
            .conn
            .unchecked_transaction()
            .map_err(|e| MigrateError::Transaction(format!("BEGIN failed: {e}")))?;

        migration.down(&tx).map_err(|e| match e {
            MigrateError::Irreversible { .. } => e,
            other => MigrateError::Revert {
                version,
                name: name.to_string(),
                source: Box::new(other),
            },
        })?;
        self.ledger.remove(&tx, version)?;

        tx.commit()
            .map_err(|e| MigrateError::Transaction(format!("COMMIT failed: {e}")))
    }

    fn find(&self, version: i64) -> Option<&dyn Migration> {
        self.migrations
            .binary_search_by_key(&version, |m| m.version())
            .ok()
            .map(|idx| self.migrations[idx].as_ref())
    }

    /// Applied state of every known migration plus any orphaned ledger rows,
    /// ordered by version. A missing ledger counts as nothing applied.
    pub fn status(&self) -> MigrateResult<Vec<MigrationStatus>> {
        validate_set(&self.migrations)?;
        let entries = if self.ledger.exists(self.conn)? {
            self.ledger.entries(self.conn)?
        } else {
            Vec::new()
        };
        let applied = |version: i64| entries.iter().any(|e| e.version == version);

        let mut statuses: Vec<MigrationStatus> = self
            .migrations
            .iter()
            .map(|m| MigrationStatus {
                version: m.version(),
                name: m.name().to_string(),
                applied: applied(m.version()),
                known: true,
            })
            .collect();

        let orphans = entries
            .iter()
            .filter(|e| self.find(e.version).is_none())
            .map(|LedgerEntry { name, version }| MigrationStatus {
                version: *version,
                name: name.clone(),
                applied: true,
                known: false,
            });
        statuses.extend(orphans);
        statuses.sort_by_key(|s| s.version);
        Ok(statuses)
    }
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod tests;
