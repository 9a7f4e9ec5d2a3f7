//! Status command implementation

use anyhow::{Context, Result};
use tm_migrate::MigrationStatus;

use crate::cli::{GlobalArgs, StatusArgs};
use crate::commands::common::print_table;
use crate::context::RuntimeContext;

/// Execute the status command
pub(crate) async fn execute(args: &StatusArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::load(global)?;
    let conn = ctx.open_existing_database()?;
    let statuses = ctx.migrator(&conn)?.status()?;

    if args.json {
        let output =
            serde_json::to_string_pretty(&statuses).context("Failed to serialize status")?;
        println!("{output}");
        return Ok(());
    }

    if statuses.is_empty() {
        println!("No migrations found in {}", ctx.migrations_dir().display());
        return Ok(());
    }
    print_table(&["VERSION", "NAME", "STATE"], &status_rows(&statuses));
    println!();
    println!("Current version: {}", current_version(&statuses));
    Ok(())
}

/// Table rows for `statuses`, one per migration.
pub(crate) fn status_rows(statuses: &[MigrationStatus]) -> Vec<Vec<String>> {
    statuses
        .iter()
        .map(|s| {
            let state = match (s.applied, s.known) {
                (true, true) => "applied",
                (true, false) => "applied (missing file)",
                (false, _) => "pending",
            };
            vec![format!("{:03}", s.version), s.name.clone(), state.to_string()]
        })
        .collect()
}

/// Highest applied version, or 0.
pub(crate) fn current_version(statuses: &[MigrationStatus]) -> i64 {
    statuses
        .iter()
        .filter(|s| s.applied)
        .map(|s| s.version)
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
#[path = "status_test.rs"]
mod tests;
