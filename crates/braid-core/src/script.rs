//! Parsing of migration script files.
//!
//! ```sql
//! -- braid:no-transaction
//! -- migrate:up
//! CREATE TABLE users (id INTEGER);
//! -- migrate:down
//! DROP TABLE users;
//! ```
//!
//! Markers must stand alone on their line. The no-transaction directive is
//! only honoured before the first marker.
//!
//! A file without an up marker is treated as a single up body. A missing
//! down marker makes the migration irreversible; an empty down section is a
//! valid no-op.

use crate::error::{CoreError, CoreResult};
use crate::migration::{Direction, MigrationRecord};
use std::path::Path;

const UP_MARKER: &str = "-- migrate:up";
const DOWN_MARKER: &str = "-- migrate:down";
const NO_TRANSACTION_DIRECTIVE: &str = "-- braid:no-transaction";

/// The parsed up/down bodies of one migration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationScript {
    /// SQL applied when migrating up
    pub up: String,
    /// SQL applied when migrating down; `None` when irreversible
    pub down: Option<String>,
    /// Whether the body may share a transaction with the ledger write
    pub transactional: bool,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Section {
    Preamble,
    Up,
    Down,
}

impl MigrationScript {
    /// Read and parse a script file.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        Ok(Self::parse(&content))
    }

    /// Parse script text.
    pub fn parse(content: &str) -> Self {
        let mut preamble = String::new();
        let mut up = String::new();
        let mut down = String::new();
        let mut saw_up = false;
        let mut saw_down = false;
        let mut transactional = true;
        let mut section = Section::Preamble;

        for line in content.lines() {
            let trimmed = line.trim();
            if trimmed == UP_MARKER {
                section = Section::Up;
                saw_up = true;
                continue;
            }
            if trimmed == DOWN_MARKER {
                section = Section::Down;
                saw_down = true;
                continue;
            }
            if section == Section::Preamble && trimmed == NO_TRANSACTION_DIRECTIVE {
                transactional = false;
                continue;
            }

            let buf = match section {
                Section::Preamble => &mut preamble,
                Section::Up => &mut up,
                Section::Down => &mut down,
            };
            buf.push_str(line);
            buf.push('\n');
        }

        let up = if saw_up { up } else { preamble };
        Self {
            up: up.trim().to_string(),
            down: saw_down.then(|| down.trim().to_string()),
            transactional,
        }
    }

    /// SQL to run for `direction`, or `Irreversible` when there is no down body.
    pub fn body_for(&self, record: &MigrationRecord, direction: Direction) -> CoreResult<&str> {
        match direction {
            Direction::Up => Ok(&self.up),
            Direction::Down => self.down.as_deref().ok_or_else(|| CoreError::Irreversible {
                kind: record.kind,
                version: record.version,
                path: record.path.display().to_string(),
            }),
        }
    }
}

#[cfg(test)]
#[path = "script_test.rs"]
mod tests;
