use std::fs;

use ecsframe::{
    config::ConfigLoader,
    ecs::{CascadePolicy, ComponentSchemaPolicy, EntityIdPolicy},
};

#[test]
fn loads_shipped_config() {
    let loader = ConfigLoader::new(env!("CARGO_MANIFEST_DIR"));
    let config = loader
        .load("configs/tower_defense.yaml")
        .expect("config parses");

    assert_eq!(config.world.component_schema, ComponentSchemaPolicy::Strict);
    assert_eq!(config.world.event_cascade, CascadePolicy::SamePass);
    assert_eq!(config.demo.path.len(), 4);
    assert_eq!(config.demo.starting_money, 50.0);
    assert_eq!(config.demo.towers.len(), 3);
    assert_eq!(config.demo.towers[2].cooldown, 3.0);
}

#[test]
fn partial_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("partial.yaml"),
        "world:\n  entity_ids: monotonic\ndemo:\n  seed: 99\n",
    )
    .unwrap();

    let config = ConfigLoader::new(dir.path()).load("partial.yaml").unwrap();

    assert_eq!(config.world.entity_ids, EntityIdPolicy::Monotonic);
    assert_eq!(config.world.event_cascade, CascadePolicy::SamePass);
    assert_eq!(config.demo.seed, 99);
    assert_eq!(config.demo.fps, 60.0);
    assert_eq!(config.logging.level, "info");
}

#[test]
fn missing_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let err = ConfigLoader::new(dir.path())
        .load("absent.yaml")
        .unwrap_err();

    assert!(format!("{err:#}").contains("absent.yaml"));
}
