use dendra_lib::app::{check, App, SNAPSHOT_FILE};
use dendra_lib::model::config::AppConfig;
use dendra_lib::model::export::{read_json_file, RunManifest, MANIFEST_FILE};
use dendra_lib::model::state::Arbor;
use std::path::PathBuf;
use uuid::Uuid;

fn scratch_dir(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!("dendra-{tag}-{}", Uuid::new_v4()))
}

#[test]
fn test_export_writes_files_and_manifest() {
    let mut config = AppConfig::default();
    config.world.seed = 42;
    let mut app = App::new(config).unwrap();
    app.run(80);

    let dir = scratch_dir("export");
    let manifest = app.export(&dir).unwrap();
    assert_eq!(manifest.files.len(), 4);
    assert_eq!(manifest.files[0], "cell0_seed42.swc");
    assert_eq!(manifest.steps, 80);
    assert_eq!(manifest.segment_count, app.simulation.arbor.len());
    assert!(manifest.snapshot.is_none());

    let on_disk = RunManifest::read(&dir.join(MANIFEST_FILE)).unwrap();
    assert_eq!(on_disk, manifest);
    assert_eq!(check(&dir).unwrap(), 4);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_snapshot_round_trip() {
    let mut config = AppConfig::default();
    config.cells.count = 1;
    config.export.snapshot = true;
    let mut app = App::new(config).unwrap();
    app.run(30);

    let dir = scratch_dir("snapshot");
    let manifest = app.export(&dir).unwrap();
    assert_eq!(manifest.snapshot.as_deref(), Some(SNAPSHOT_FILE));

    let arbor: Arbor = read_json_file(dir.join(SNAPSHOT_FILE)).unwrap();
    assert_eq!(arbor, app.simulation.arbor);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_check_rejects_broken_file() {
    let dir = scratch_dir("broken");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("cell0_seed1.swc");
    std::fs::write(&path, "1 1 0 0 0 5 -1\n2 6 0 0 1 0.5 7\n").unwrap();

    assert!(check(&path).is_err());
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_sample_config_matches_defaults() {
    let text = std::fs::read_to_string(concat!(env!("CARGO_MANIFEST_DIR"), "/config.toml")).unwrap();
    let config = AppConfig::from_toml(&text).unwrap();
    assert_eq!(config, AppConfig::default());
}
