//! Error types for tm-core

use thiserror::Error;

/// Core error type for Tidemark
#[derive(Error, Debug)]
pub enum CoreError {
    /// C001: Configuration file not found
    #[error("[C001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// C002: Failed to parse configuration file
    #[error("[C002] Failed to parse config: {0}")]
    ConfigParseError(#[from] serde_yaml::Error),

    /// C003: Invalid configuration value
    #[error("[C003] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// C004: Migrations directory missing
    #[error("[C004] Migrations directory not found: {path}")]
    MigrationsDirNotFound { path: String },

    /// C005: SQL file whose name does not follow `<version>_<name>.(up|down).sql`
    #[error("[C005] Invalid migration file name {path}: {reason}")]
    InvalidMigrationFile { path: String, reason: String },

    /// C006: Two files claim the same migration version
    #[error("[C006] Duplicate migration version {version}: {path}")]
    DuplicateVersion { version: i64, path: String },

    /// C007: Down script without a matching up script
    #[error("[C007] Migration {version} has a down script but no up script: {path}")]
    MissingUpScript { version: i64, path: String },

    /// C008: IO error with file path context
    #[error("[C008] IO error at {path}: {source}")]
    IoWithPath {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
