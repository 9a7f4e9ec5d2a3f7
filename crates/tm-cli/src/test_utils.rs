//! Shared test utilities for tm-cli

use crate::cli::GlobalArgs;
use duckdb::Connection;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Config for a project backed by `app.duckdb` in the project root
pub(crate) const FILE_CONFIG: &str = r#"
name: test_project
database:
  path: "app.duckdb"
targets:
  prod:
    database:
      path: "prod/app.duckdb"
    ledger_table: ops.applied
"#;

/// Create a temp project with `FILE_CONFIG` and an empty migrations directory.
pub(crate) fn make_project() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("tidemark.yml"), FILE_CONFIG).unwrap();
    fs::create_dir(dir.path().join("migrations")).unwrap();
    dir
}

/// Global args pointing at `root` with no target.
pub(crate) fn global(root: &Path) -> GlobalArgs {
    GlobalArgs {
        verbose: false,
        project_dir: root.to_path_buf(),
        target: None,
    }
}

/// Write a migration script into the project's migrations directory.
pub(crate) fn write_migration(root: &Path, file_name: &str, sql: &str) {
    fs::write(root.join("migrations").join(file_name), sql).unwrap();
}

/// Write the standard users/email pair with down scripts.
pub(crate) fn write_users_migrations(root: &Path) {
    write_migration(root, "001_create_users.up.sql", "CREATE TABLE users (id INTEGER);");
    write_migration(root, "001_create_users.down.sql", "DROP TABLE users;");
    write_migration(
        root,
        "002_add_email_column.up.sql",
        "ALTER TABLE users ADD COLUMN email VARCHAR;",
    );
    write_migration(
        root,
        "002_add_email_column.down.sql",
        "ALTER TABLE users DROP COLUMN email;",
    );
}

/// Versions recorded in `table` of the database at `db_path`, ascending.
pub(crate) fn ledger_versions(db_path: &Path, table: &str) -> Vec<i64> {
    let conn = Connection::open(db_path).unwrap();
    let mut stmt = conn
        .prepare(&format!("SELECT version FROM {table} ORDER BY version"))
        .unwrap();
    let rows = stmt.query_map([], |row| row.get::<_, i64>(0)).unwrap();
    rows.collect::<Result<Vec<_>, _>>().unwrap()
}
