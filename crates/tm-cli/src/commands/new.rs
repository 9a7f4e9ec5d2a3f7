//! New command implementation - creates the next migration script pair

use anyhow::{Context, Result};
use std::fs;
use tm_core::discovery::{discover_migrations, next_version, script_paths};

use crate::cli::{GlobalArgs, NewArgs};
use crate::context::RuntimeContext;

/// Execute the new command
pub(crate) async fn execute(args: &NewArgs, global: &GlobalArgs) -> Result<()> {
    let name = args.name.trim();
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        anyhow::bail!(
            "Invalid migration name '{}': use letters, digits, and underscores only",
            args.name
        );
    }

    let ctx = RuntimeContext::load(global)?;
    let dir = ctx.migrations_dir();
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    let existing = discover_migrations(&dir).context("Failed to read migrations")?;
    let version = next_version(&existing);
    let (up_path, down_path) = script_paths(&dir, version, name);

    fs::write(&up_path, format!("-- {name}: apply\n"))
        .with_context(|| format!("Failed to write {}", up_path.display()))?;
    fs::write(&down_path, format!("-- {name}: revert\n"))
        .with_context(|| format!("Failed to write {}", down_path.display()))?;

    println!("  Created {}", up_path.display());
    println!("  Created {}", down_path.display());
    Ok(())
}

#[cfg(test)]
#[path = "new_test.rs"]
mod tests;
