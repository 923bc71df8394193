//! braid-engine - Runs interleaved schema and data migrations
//!
//! [`Migrator`] implements the operator-level operations (migrate, rollback,
//! forward, up/down, redo, status, abort-if-pending) by planning with
//! `braid-core`'s sequencer, executing each step through [`MigrationRunner`],
//! and refreshing snapshots through the [`Dumper`]s afterwards.

pub mod catalog;
pub mod error;
pub mod executor;
pub mod migrator;
pub mod report;
pub mod runner;
pub mod snapshot;

pub use catalog::TargetCatalog;
pub use error::{EngineError, EngineResult};
pub use executor::{BodyExecutor, SqlScriptExecutor};
pub use migrator::Migrator;
pub use report::{CurrentVersion, ExecutedStep, RunReport, StatusReport, TargetStatus};
pub use runner::MigrationRunner;
pub use snapshot::{DataDumper, Dumper, SchemaDumper, SchemaLoader, Snapshot};
