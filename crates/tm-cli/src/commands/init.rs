//! Init command implementation - scaffolds a Tidemark project in place

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tm_core::config::CONFIG_FILE_NAMES;

use crate::cli::{GlobalArgs, InitArgs};

/// DuckDB file a fresh project migrates
const DEFAULT_DATABASE_PATH: &str = "dev.duckdb";

/// Execute the init command
pub(crate) async fn execute(args: &InitArgs, global: &GlobalArgs) -> Result<()> {
    let project_dir = &global.project_dir;

    if let Some(existing) = CONFIG_FILE_NAMES
        .iter()
        .map(|name| project_dir.join(name))
        .find(|path| path.exists())
    {
        anyhow::bail!(
            "'{}' already exists. Refusing to overwrite it.",
            existing.display()
        );
    }

    fs::create_dir_all(project_dir)
        .with_context(|| format!("Failed to create directory: {}", project_dir.display()))?;

    let name = match &args.name {
        Some(name) => name.clone(),
        None => default_name(project_dir)?,
    };
    if name.trim().is_empty() {
        anyhow::bail!("Project name must not be empty");
    }

    println!("Initializing Tidemark project: {name}\n");

    let migrations_dir = project_dir.join("migrations");
    fs::create_dir_all(&migrations_dir)
        .with_context(|| format!("Failed to create directory: {}", migrations_dir.display()))?;

    // Escape YAML special characters in interpolated values
    let safe_name = name.replace('\\', "\\\\").replace('"', "\\\"");
    let config_content = format!(
        r#"name: "{safe_name}"

migrations_path: migrations
ledger_table: schema_migrations

database:
  path: "{DEFAULT_DATABASE_PATH}"

# targets:
#   prod:
#     database:
#       path: "/srv/data/prod.duckdb"
"#
    );
    fs::write(project_dir.join(CONFIG_FILE_NAMES[0]), config_content)
        .context("Failed to write tidemark.yml")?;
    println!("  Created tidemark.yml");
    println!("  Created migrations/");

    let gitignore = project_dir.join(".gitignore");
    if !gitignore.exists() {
        fs::write(&gitignore, "*.duckdb\n*.duckdb.wal\n")
            .context("Failed to write .gitignore")?;
        println!("  Created .gitignore");
    }

    println!();
    println!("Next steps:");
    println!("  tm new create_users   # Add the first migration");
    println!("  tm migrate            # Apply pending migrations");

    Ok(())
}

/// Name of the project directory, resolving `.` and relative paths.
fn default_name(project_dir: &Path) -> Result<String> {
    let resolved = fs::canonicalize(project_dir)
        .with_context(|| format!("Failed to resolve {}", project_dir.display()))?;
    Ok(resolved
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "tidemark".to_string()))
}

#[cfg(test)]
#[path = "init_test.rs"]
mod tests;
