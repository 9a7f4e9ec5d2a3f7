//! Setup command implementation

use anyhow::{Context, Result};

use crate::cli::GlobalArgs;
use crate::context::RuntimeContext;

/// Execute the setup command
pub(crate) async fn execute(global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::load(global)?;
    let conn = ctx.open_database()?;
    let migrator = ctx.migrator(&conn)?;

    migrator
        .setup()
        .with_context(|| format!("Failed to create ledger table {}", migrator.ledger()))?;

    println!("Ledger table {} is ready", migrator.ledger());
    Ok(())
}
