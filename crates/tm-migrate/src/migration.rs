//! The unit of schema change consumed by [`crate::Migrator`].

use crate::error::{MigrateError, MigrateResult};
use duckdb::Transaction;

/// Longest migration name the ledger accepts.
pub const MAX_NAME_LEN: usize = 255;

/// A versioned schema change.
///
/// Versions must be unique across a migration set and at least 1; a higher
/// version is applied later. The runner hands both bodies a live transaction
/// that also carries the ledger write, so a body must not commit or roll it
/// back itself.
pub trait Migration {
    /// Human-readable label recorded in the ledger.
    fn name(&self) -> &str;

    /// Ordering key and ledger identity.
    fn version(&self) -> i64;

    /// Apply the change inside `tx`.
    fn up(&self, tx: &Transaction<'_>) -> MigrateResult<()>;

    /// Revert the change inside `tx`.
    ///
    /// Only invoked by [`crate::Migrator::rollback`]. The default refuses.
    fn down(&self, _tx: &Transaction<'_>) -> MigrateResult<()> {
        Err(MigrateError::Irreversible {
            version: self.version(),
            name: self.name().to_string(),
        })
    }
}

/// Check the invariants the runner relies on before any database work.
///
/// `migrations` must already be sorted by version.
pub(crate) fn validate_set(migrations: &[Box<dyn Migration>]) -> MigrateResult<()> {
    let mut previous: Option<i64> = None;
    for migration in migrations {
        let version = migration.version();
        if version < 1 {
            return Err(MigrateError::InvalidMigration {
                version,
                reason: "version must be at least 1".to_string(),
            });
        }
        let name = migration.name();
        if name.trim().is_empty() {
            return Err(MigrateError::InvalidMigration {
                version,
                reason: "name cannot be empty".to_string(),
            });
        }
        if name.chars().count() > MAX_NAME_LEN {
            return Err(MigrateError::InvalidMigration {
                version,
                reason: format!("name exceeds {MAX_NAME_LEN} characters"),
            });
        }
        if previous == Some(version) {
            return Err(MigrateError::DuplicateVersion { version });
        }
        previous = Some(version);
    }
    Ok(())
}
