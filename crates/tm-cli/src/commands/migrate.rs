//! Migrate command implementation

use anyhow::{Context, Result};
use tm_migrate::Migrator;

use crate::cli::{GlobalArgs, MigrateArgs};
use crate::context::RuntimeContext;

/// Execute the migrate command
pub(crate) async fn execute(args: &MigrateArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::load(global)?;

    if args.dry_run {
        let conn = ctx.open_existing_database()?;
        return print_pending(&ctx.migrator(&conn)?);
    }

    let conn = ctx.open_database()?;
    let migrator = ctx.migrator(&conn)?;
    migrator.setup().context("Failed to create ledger table")?;

    let before = migrator.current_version()?;
    let report = migrator.migrate().context("Migration failed")?;

    if report.is_empty() {
        println!("Already up to date at version {before}");
        return Ok(());
    }
    for version in &report.versions {
        println!("  Applied {version:03}");
    }
    println!();
    println!(
        "Applied {} migration{}, now at version {}",
        report.versions.len(),
        if report.versions.len() == 1 { "" } else { "s" },
        migrator.current_version()?
    );
    Ok(())
}

fn print_pending(migrator: &Migrator<'_>) -> Result<()> {
    let pending = migrator.pending()?;
    if pending.is_empty() {
        println!("Dry run - nothing to apply");
        return Ok(());
    }
    println!("Dry run - would apply the following migrations:");
    for migration in pending {
        println!("  {:03} {}", migration.version(), migration.name());
    }
    Ok(())
}

#[cfg(test)]
#[path = "migrate_test.rs"]
mod tests;
