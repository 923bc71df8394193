use super::*;
use braid_core::Config;
use std::fs;
use tempfile::tempdir;

fn write(path: &std::path::Path, body: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, body).unwrap();
}

#[test]
fn test_data_migrations_only_on_primary() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(&root.join("db/migrate/1_users.sql"), "SELECT 1;");
    write(&root.join("db/data/2_backfill.sql"), "SELECT 1;");
    write(&root.join("db/analytics_migrate/3_events.sql"), "SELECT 1;");

    let config = Config::parse(
        "name: shop\ntargets:\n  analytics:\n    database:\n      path: \":memory:\"\n",
    )
    .unwrap();
    let project = Project::from_config(root, config);
    let targets = project.targets();

    let primary = TargetCatalog::discover(&project, &targets[0]).unwrap();
    assert!(primary.primary);
    assert_eq!(primary.schema.len(), 1);
    assert_eq!(primary.data.len(), 1);

    let analytics = TargetCatalog::discover(&project, &targets[1]).unwrap();
    assert!(!analytics.primary);
    assert_eq!(analytics.schema[0].name, "events");
    assert!(analytics.data.is_empty());
    assert!(analytics.find(MigrationKind::Data, Version::new(2)).is_none());
}

#[test]
fn test_kinds_at_shared_version() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(&root.join("db/migrate/5_a.sql"), "SELECT 1;");
    write(&root.join("db/data/5_b.sql"), "SELECT 1;");
    let project = Project::from_config(root, Config::parse("name: shop").unwrap());
    let catalog = TargetCatalog::discover(&project, &project.targets()[0]).unwrap();

    assert_eq!(
        catalog.kinds_at(Version::new(5)),
        vec![MigrationKind::Schema, MigrationKind::Data]
    );
    assert!(catalog.kinds_at(Version::new(6)).is_empty());
}
