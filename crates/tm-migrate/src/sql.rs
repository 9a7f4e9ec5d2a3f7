//! Migrations whose bodies are plain SQL scripts.

use crate::error::{MigrateError, MigrateResult};
use crate::migration::Migration;
use duckdb::Transaction;
use std::path::Path;
use tm_core::discovery::{discover_migrations, MigrationFile};
use tm_core::CoreResult;

/// A migration backed by an up script and an optional down script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlMigration {
    pub version: i64,
    pub name: String,
    pub up_sql: String,
    pub down_sql: Option<String>,
}

impl SqlMigration {
    /// Build a migration with no down script.
    pub fn new(version: i64, name: impl Into<String>, up_sql: impl Into<String>) -> Self {
        Self {
            version,
            name: name.into(),
            up_sql: up_sql.into(),
            down_sql: None,
        }
    }

    /// Attach a down script.
    pub fn with_down(mut self, down_sql: impl Into<String>) -> Self {
        self.down_sql = Some(down_sql.into());
        self
    }
}

impl From<MigrationFile> for SqlMigration {
    fn from(file: MigrationFile) -> Self {
        Self {
            version: file.version,
            name: file.name,
            up_sql: file.up_sql,
            down_sql: file.down_sql,
        }
    }
}

impl Migration for SqlMigration {
    fn name(&self) -> &str {
        &self.name
    }

    fn version(&self) -> i64 {
        self.version
    }

    fn up(&self, tx: &Transaction<'_>) -> MigrateResult<()> {
        tx.execute_batch(&self.up_sql)?;
        Ok(())
    }

    fn down(&self, tx: &Transaction<'_>) -> MigrateResult<()> {
        let Some(down_sql) = &self.down_sql else {
            return Err(MigrateError::Irreversible {
                version: self.version,
                name: self.name.clone(),
            });
        };
        tx.execute_batch(down_sql)?;
        Ok(())
    }
}

/// Discover the `.sql` migrations in `dir` and box them for the runner.
pub fn load_sql_migrations(dir: &Path) -> CoreResult<Vec<Box<dyn Migration>>> {
    let files = discover_migrations(dir)?;
    Ok(files
        .into_iter()
        .map(|file| Box::new(SqlMigration::from(file)) as Box<dyn Migration>)
        .collect())
}
