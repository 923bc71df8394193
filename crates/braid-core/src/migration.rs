//! Migration identity types: versions, kinds, directions, and records.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Timestamp-derived migration version (e.g. `20230101120000`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Version(i64);

impl Version {
    /// Wrap a raw version number.
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Return the raw version number.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for Version {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Version {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(Self)
    }
}

/// The two migration streams braid interleaves.
///
/// Variant order is the tie-break: at equal versions a schema migration sorts
/// before a data migration when ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MigrationKind {
    /// Structural change (tables, columns, indexes)
    Schema,
    /// Row content transformation
    Data,
}

impl MigrationKind {
    /// Both kinds in tie-break order.
    pub const ALL: [MigrationKind; 2] = [MigrationKind::Schema, MigrationKind::Data];
}

impl fmt::Display for MigrationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MigrationKind::Schema => write!(f, "schema"),
            MigrationKind::Data => write!(f, "data"),
        }
    }
}

/// Direction in which a migration body is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Apply the migration
    Up,
    /// Revert the migration
    Down,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
        }
    }
}

/// A migration discovered on disk. Identity is `(kind, version)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationRecord {
    /// Version parsed from the filename prefix
    pub version: Version,
    /// Descriptive name parsed from the filename
    pub name: String,
    /// Which stream this migration belongs to
    pub kind: MigrationKind,
    /// Path of the script file
    pub path: PathBuf,
}

impl MigrationRecord {
    /// Sort key shared by every ordered sequence in braid.
    pub fn order_key(&self) -> (Version, MigrationKind) {
        (self.version, self.kind)
    }
}

/// Which migration kinds an operation walks.
///
/// The unified sequence is always computed the same way; a narrower scope
/// only filters it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KindScope {
    /// Schema and data migrations interleaved (default)
    #[default]
    Both,
    /// Schema migrations only
    Schema,
    /// Data migrations only
    Data,
}

impl KindScope {
    /// Returns true if migrations of `kind` fall within this scope.
    pub fn includes(self, kind: MigrationKind) -> bool {
        match self {
            KindScope::Both => true,
            KindScope::Schema => kind == MigrationKind::Schema,
            KindScope::Data => kind == MigrationKind::Data,
        }
    }
}

impl fmt::Display for KindScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KindScope::Both => write!(f, "both"),
            KindScope::Schema => write!(f, "schema"),
            KindScope::Data => write!(f, "data"),
        }
    }
}
