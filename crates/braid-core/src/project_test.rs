use super::*;
use tempfile::tempdir;

const MULTI_TARGET: &str = r#"
name: shop
database:
  path: shop.duckdb
targets:
  analytics:
    database:
      path: ":memory:"
  audit:
    database:
      path: audit.duckdb
    schema_paths: ["db/audit"]
"#;

#[test]
fn test_load_from_project_dir() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("braid.yml"), "name: shop").unwrap();
    let project = Project::load(dir.path(), None).unwrap();
    assert_eq!(project.config.name, "shop");
    assert_eq!(project.root, dir.path());
}

#[test]
fn test_load_with_explicit_config() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("custom.yml");
    std::fs::write(&config_path, "name: custom").unwrap();
    let project = Project::load(dir.path(), Some(&config_path)).unwrap();
    assert_eq!(project.config.name, "custom");
}

#[test]
fn test_load_missing_root() {
    let dir = tempdir().unwrap();
    let err = Project::load(&dir.path().join("nope"), None).unwrap_err();
    assert!(matches!(err, CoreError::ConfigNotFound { .. }));
}

#[test]
fn test_targets_primary_first_with_resolved_paths() {
    let root = Path::new("/srv/shop");
    let project = Project::from_config(root, Config::parse(MULTI_TARGET).unwrap());
    let targets = project.targets();

    let names: Vec<&str> = targets.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["primary", "analytics", "audit"]);

    assert!(targets[0].primary);
    assert_eq!(
        targets[0].database_path,
        root.join("shop.duckdb").display().to_string()
    );
    assert_eq!(targets[0].schema_paths, vec![root.join("db/migrate")]);

    assert!(!targets[1].primary);
    assert_eq!(targets[1].database_path, ":memory:");
    assert_eq!(
        targets[1].schema_paths,
        vec![root.join("db").join("analytics_migrate")]
    );
    assert_eq!(targets[2].schema_paths, vec![root.join("db/audit")]);
}

#[test]
fn test_unset_database_paths_default_to_files() {
    let root = Path::new("/srv/shop");
    let yaml = "name: shop\ntargets:\n  analytics: {}\n";
    let project = Project::from_config(root, Config::parse(yaml).unwrap());
    let targets = project.targets();

    assert_eq!(
        targets[0].database_path,
        root.join("db/shop.duckdb").display().to_string()
    );
    assert_eq!(
        targets[1].database_path,
        root.join("db/analytics.duckdb").display().to_string()
    );
}

#[test]
fn test_select_targets() {
    let project = Project::from_config(Path::new("/srv"), Config::parse(MULTI_TARGET).unwrap());
    let only = project.select_targets(Some("audit")).unwrap();
    assert_eq!(only.len(), 1);
    assert_eq!(only[0].name, "audit");

    let err = project.select_targets(Some("missing")).unwrap_err();
    assert!(err.to_string().contains("Available targets: primary, analytics, audit"));
}

#[test]
fn test_sources_use_configured_paths() {
    let root = Path::new("/srv");
    let project = Project::from_config(root, Config::parse("name: shop").unwrap());
    let primary = &project.targets()[0];
    assert_eq!(project.schema_source(primary).kind(), MigrationKind::Schema);
    assert_eq!(project.data_source().kind(), MigrationKind::Data);
    assert_eq!(project.data_source().paths(), &[root.join("db/data")]);
    assert_eq!(project.snapshot_dir(), root.join("db"));
}
