//! Runtime context for CLI commands

use anyhow::{Context, Result};
use duckdb::Connection;
use std::path::PathBuf;
use tm_core::Config;
use tm_migrate::{load_sql_migrations, Ledger, Migrator};

use crate::cli::GlobalArgs;

/// Loaded project configuration plus the target selected on the command line
pub(crate) struct RuntimeContext {
    /// Project root directory
    pub root: PathBuf,

    /// Parsed tidemark.yml
    pub config: Config,

    /// Target override, if any
    pub target: Option<String>,
}

impl RuntimeContext {
    /// Load tidemark.yml from the project directory
    pub fn load(global: &GlobalArgs) -> Result<Self> {
        let config = Config::load_from_dir(&global.project_dir)
            .context("Failed to load project configuration")?;
        Ok(Self {
            root: global.project_dir.clone(),
            config,
            target: global.target.clone(),
        })
    }

    /// Absolute path of the migrations directory
    pub fn migrations_dir(&self) -> PathBuf {
        self.config.migrations_path_absolute(&self.root)
    }

    /// Open the DuckDB database for the selected target, creating parent
    /// directories for file-backed databases.
    pub fn open_database(&self) -> Result<Connection> {
        let db_config = self.config.database_config(self.target.as_deref())?;
        let Some(path) = db_config.path_absolute(&self.root) else {
            log::warn!("Using an in-memory database; applied migrations will not persist");
            return Connection::open_in_memory().context("Failed to open in-memory database");
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        Connection::open(&path)
            .with_context(|| format!("Failed to open database: {}", path.display()))
    }

    /// Open the selected database for reading without creating anything.
    ///
    /// A file that does not exist yet stands in as an empty in-memory
    /// database, so nothing reads as applied.
    pub fn open_existing_database(&self) -> Result<Connection> {
        let db_config = self.config.database_config(self.target.as_deref())?;
        match db_config.path_absolute(&self.root) {
            Some(path) if path.exists() => Connection::open(&path)
                .with_context(|| format!("Failed to open database: {}", path.display())),
            Some(path) => {
                log::debug!("Database {} does not exist yet", path.display());
                Connection::open_in_memory().context("Failed to open in-memory database")
            }
            None => Connection::open_in_memory().context("Failed to open in-memory database"),
        }
    }

    /// Build a runner over every migration in the migrations directory
    pub fn migrator<'c>(&self, conn: &'c Connection) -> Result<Migrator<'c>> {
        let ledger_table = self.config.ledger_table(self.target.as_deref())?;
        let ledger = Ledger::new(ledger_table)?;
        let migrations =
            load_sql_migrations(&self.migrations_dir()).context("Failed to load migrations")?;
        Ok(Migrator::with_ledger(conn, ledger, migrations))
    }
}
