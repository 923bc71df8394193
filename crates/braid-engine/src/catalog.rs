//! Migrations discovered for one target.

use braid_core::{
    CoreResult, MigrationKind, MigrationRecord, Project, TargetName, TargetSpec, Version,
};

/// Every migration file a target can run, by kind.
///
/// Data migrations are only loaded for the primary target. Catalogs are
/// rebuilt for every operation; nothing is cached between invocations.
#[derive(Debug, Clone)]
pub struct TargetCatalog {
    pub target: TargetName,
    pub primary: bool,
    pub schema: Vec<MigrationRecord>,
    pub data: Vec<MigrationRecord>,
}

impl TargetCatalog {
    /// Discover the schema (and, on the primary, data) migrations of `spec`.
    pub fn discover(project: &Project, spec: &TargetSpec) -> CoreResult<Self> {
        let schema = project.schema_source(spec).discover()?;
        let data = if spec.primary {
            project.data_source().discover()?
        } else {
            Vec::new()
        };
        log::debug!(
            "Target '{}': {} schema, {} data migrations discovered",
            spec.name,
            schema.len(),
            data.len()
        );
        Ok(Self {
            target: spec.name.clone(),
            primary: spec.primary,
            schema,
            data,
        })
    }

    /// Discovered migrations of `kind`, ascending.
    pub fn records(&self, kind: MigrationKind) -> &[MigrationRecord] {
        match kind {
            MigrationKind::Schema => &self.schema,
            MigrationKind::Data => &self.data,
        }
    }

    /// Look up one migration.
    pub fn find(&self, kind: MigrationKind, version: Version) -> Option<&MigrationRecord> {
        self.records(kind).iter().find(|r| r.version == version)
    }

    /// Kinds that have a file at `version`.
    pub fn kinds_at(&self, version: Version) -> Vec<MigrationKind> {
        MigrationKind::ALL
            .into_iter()
            .filter(|&kind| self.find(kind, version).is_some())
            .collect()
    }
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
