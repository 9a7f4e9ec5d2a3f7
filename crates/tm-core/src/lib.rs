//! tm-core - Core library for Tidemark
//!
//! This crate provides project configuration parsing (`tidemark.yml`) and
//! discovery of SQL migration files on disk.

pub mod config;
pub mod discovery;
pub mod error;

pub use config::{Config, DatabaseConfig, TargetConfig};
pub use discovery::{discover_migrations, MigrationFile};
pub use error::{CoreError, CoreResult};
