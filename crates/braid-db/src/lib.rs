//! braid-db - DuckDB access layer for braid
//!
//! This crate owns the database side of braid: opening one connection per
//! configured target, the transactional helper migrations run inside, the two
//! version ledgers, and relation introspection used by snapshot dumps.

pub mod connection;
pub mod error;
pub mod introspect;
pub mod ledger;

pub use connection::{TargetDb, TargetPool};
pub use error::{DbError, DbResult};
pub use introspect::{list_relations, RelationDdl, RelationKind};
pub use ledger::{Ledgers, VersionLedger};
