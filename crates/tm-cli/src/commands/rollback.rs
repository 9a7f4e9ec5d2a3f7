//! Rollback command implementation

use anyhow::{Context, Result};

use crate::cli::{GlobalArgs, RollbackArgs};
use crate::context::RuntimeContext;

/// Execute the rollback command
pub(crate) async fn execute(args: &RollbackArgs, global: &GlobalArgs) -> Result<()> {
    if args.to_version < 0 {
        anyhow::bail!("Rollback target must be 0 or greater, got {}", args.to_version);
    }

    let ctx = RuntimeContext::load(global)?;
    let conn = ctx.open_database()?;
    let migrator = ctx.migrator(&conn)?;
    migrator.setup().context("Failed to create ledger table")?;

    let report = migrator
        .rollback(args.to_version)
        .with_context(|| format!("Rollback to version {} failed", args.to_version))?;

    if report.is_empty() {
        println!("Nothing to roll back above version {}", args.to_version);
        return Ok(());
    }
    for version in &report.versions {
        println!("  Reverted {version:03}");
    }
    println!();
    println!("Rolled back to version {}", migrator.current_version()?);
    Ok(())
}

#[cfg(test)]
#[path = "rollback_test.rs"]
mod tests;
