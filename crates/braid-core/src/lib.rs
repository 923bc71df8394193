//! braid-core - Core library for braid
//!
//! This crate provides configuration parsing, migration discovery, script
//! parsing, and the pure sequencing logic that merges schema and data
//! migrations into one ordered plan. It has no database dependency.

pub mod config;
pub mod error;
pub mod migration;
pub mod project;
pub mod resolver;
pub mod script;
pub mod sequencer;
pub mod source;
pub mod target_name;

pub use config::{Config, DatabaseConfig, LedgerConfig, SnapshotConfig, SnapshotFormat, TargetConfig};
pub use error::{CoreError, CoreResult};
pub use migration::{Direction, KindScope, MigrationKind, MigrationRecord, Version};
pub use project::{Project, TargetSpec};
pub use resolver::{MigrationStatus, UnifiedEntry};
pub use script::MigrationScript;
pub use sequencer::{PlannedStep, SortOrder, TargetSet};
pub use source::MigrationSource;
pub use target_name::TargetName;
