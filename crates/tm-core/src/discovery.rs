//! Discovery of SQL migration files.
//!
//! A migrations directory holds one `<version>_<name>.up.sql` file per
//! migration and an optional `<version>_<name>.down.sql` beside it. Versions
//! are decimal and may be zero-padded (`001_create_users.up.sql`).

use crate::error::{CoreError, CoreResult};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

const UP_SUFFIX: &str = ".up.sql";
const DOWN_SUFFIX: &str = ".down.sql";

/// One migration assembled from its up and down scripts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationFile {
    pub version: i64,
    pub name: String,
    pub up_path: PathBuf,
    pub up_sql: String,
    pub down_sql: Option<String>,
}

/// Which half of a migration a file holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Up,
    Down,
}

/// Parsed pieces of a migration file name.
#[derive(Debug, PartialEq, Eq)]
struct FileName<'a> {
    version: i64,
    name: &'a str,
    direction: Direction,
}

/// Scripts collected for one version before pairing.
#[derive(Default)]
struct Pending {
    name: String,
    up: Option<(PathBuf, String)>,
    down: Option<String>,
    down_path: Option<PathBuf>,
}

/// Split `file_name` into version, name, and direction.
///
/// Returns `Ok(None)` for files that are not `.sql` at all.
fn parse_file_name(file_name: &str) -> Result<Option<FileName<'_>>, String> {
    let (stem, direction) = if let Some(stem) = file_name.strip_suffix(UP_SUFFIX) {
        (stem, Direction::Up)
    } else if let Some(stem) = file_name.strip_suffix(DOWN_SUFFIX) {
        (stem, Direction::Down)
    } else if file_name.ends_with(".sql") {
        return Err("expected a .up.sql or .down.sql suffix".to_string());
    } else {
        return Ok(None);
    };

    let Some((digits, name)) = stem.split_once('_') else {
        return Err("expected <version>_<name>".to_string());
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("version '{digits}' is not a number"));
    }
    if name.is_empty() {
        return Err("migration name is empty".to_string());
    }
    let version: i64 = digits
        .parse()
        .map_err(|_| format!("version '{digits}' is out of range"))?;
    if version < 1 {
        return Err("version must be at least 1".to_string());
    }

    Ok(Some(FileName {
        version,
        name,
        direction,
    }))
}

fn read_script(path: &Path) -> CoreResult<String> {
    std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
        path: path.display().to_string(),
        source: e,
    })
}

/// Load every migration in `dir`, sorted by version.
///
/// Subdirectories and non-`.sql` files are skipped.
pub fn discover_migrations(dir: &Path) -> CoreResult<Vec<MigrationFile>> {
    if !dir.is_dir() {
        return Err(CoreError::MigrationsDirNotFound {
            path: dir.display().to_string(),
        });
    }

    let mut by_version: BTreeMap<i64, Pending> = BTreeMap::new();
    for entry in std::fs::read_dir(dir).map_err(|e| CoreError::IoWithPath {
        path: dir.display().to_string(),
        source: e,
    })? {
        let entry = entry.map_err(|e| CoreError::IoWithPath {
            path: dir.display().to_string(),
            source: e,
        })?;
        let path = entry.path();
        if path.is_dir() {
            log::debug!("Skipping directory {}", path.display());
            continue;
        }
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            log::debug!("Skipping non-UTF-8 file name {}", path.display());
            continue;
        };
        let parsed = parse_file_name(file_name).map_err(|reason| {
            CoreError::InvalidMigrationFile {
                path: path.display().to_string(),
                reason,
            }
        })?;
        let Some(parsed) = parsed else {
            log::debug!("Skipping non-SQL file {}", path.display());
            continue;
        };

        let FileName {
            version,
            name,
            direction,
        } = parsed;
        let slot = by_version.entry(version).or_insert_with(|| Pending {
            name: name.to_string(),
            ..Pending::default()
        });
        let taken = match direction {
            Direction::Up => slot.up.is_some(),
            Direction::Down => slot.down.is_some(),
        };
        if slot.name != name || taken {
            return Err(CoreError::DuplicateVersion {
                version,
                path: path.display().to_string(),
            });
        }

        let sql = read_script(&path)?;
        match direction {
            Direction::Up => slot.up = Some((path, sql)),
            Direction::Down => {
                slot.down = Some(sql);
                slot.down_path = Some(path);
            }
        }
    }

    by_version
        .into_iter()
        .map(|(version, pending)| {
            let Some((up_path, up_sql)) = pending.up else {
                return Err(CoreError::MissingUpScript {
                    version,
                    path: pending
                        .down_path
                        .map(|p| p.display().to_string())
                        .unwrap_or_default(),
                });
            };
            Ok(MigrationFile {
                version,
                name: pending.name,
                up_path,
                up_sql,
                down_sql: pending.down,
            })
        })
        .collect()
}

/// Version to use for a newly created migration.
pub fn next_version(files: &[MigrationFile]) -> i64 {
    files.iter().map(|f| f.version).max().unwrap_or(0) + 1
}

/// File stem shared by a migration's up and down scripts.
pub fn file_stem(version: i64, name: &str) -> String {
    format!("{version:03}_{name}")
}

/// Paths of the up and down scripts for a new migration in `dir`.
pub fn script_paths(dir: &Path, version: i64, name: &str) -> (PathBuf, PathBuf) {
    let stem = file_stem(version, name);
    (
        dir.join(format!("{stem}{UP_SUFFIX}")),
        dir.join(format!("{stem}{DOWN_SUFFIX}")),
    )
}

#[cfg(test)]
#[path = "discovery_test.rs"]
mod tests;
