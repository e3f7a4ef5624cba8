use starforge_core::black_hole::BlackHoleConfig;
use starforge_core::{GenerationError, GeneratorConfig, PlanetConfig, PlanetType};
use starforge_storage::models::{PRESET_VERSION, PresetDoc};
use starforge_storage::{PresetStore, StorageError, export_json, import_json};

#[test]
fn json_export_then_import_keeps_config() {
    let preset = PresetDoc::new(
        "volcanic-1",
        GeneratorConfig::Planet(PlanetConfig::preset(PlanetType::Volcanic, 99)),
    );
    let text = export_json(&preset).unwrap();
    assert!(text.contains("\"kind\": \"planet\""));
    assert!(!text.contains("_id"));

    let back = import_json(&text).unwrap();
    assert_eq!(back, preset);
}

#[test]
fn missing_version_defaults_to_current() {
    let text = r#"{
        "name": "hole",
        "config": { "kind": "black_hole", "mass": 2.0, "disk_inner": 12.0, "disk_outer": 30.0 }
    }"#;
    let preset = import_json(text).unwrap();
    assert_eq!(preset.version, PRESET_VERSION);
    match preset.config {
        GeneratorConfig::BlackHole(c) => {
            assert_eq!(c.mass, 2.0);
            assert_eq!(c.particle_count, BlackHoleConfig::default().particle_count);
        }
        other => panic!("unexpected kind {}", other.kind()),
    }
}

#[test]
fn future_version_rejected() {
    let mut preset = PresetDoc::new("next", GeneratorConfig::Planet(PlanetConfig::default()));
    preset.version = PRESET_VERSION + 1;
    let text = serde_json::to_string(&preset).unwrap();
    assert!(matches!(
        import_json(&text),
        Err(StorageError::UnsupportedVersion { found, .. }) if found == PRESET_VERSION + 1
    ));
}

#[test]
fn invalid_config_rejected_on_import() {
    let text = r#"{ "name": "flat", "version": 1, "config": { "kind": "planet", "biomes": [] } }"#;
    assert!(matches!(import_json(text), Err(StorageError::InvalidPreset(_))));
}

#[test]
fn oversized_grid_rejected_on_import() {
    let text = r#"{ "name": "huge", "config": { "kind": "planet", "width": 65536, "height": 65536 } }"#;
    assert!(matches!(
        import_json(text),
        Err(StorageError::InvalidPreset(GenerationError::InvalidDimensions { .. }))
    ));
}

#[test]
fn garbage_is_a_json_error() {
    assert!(matches!(import_json("{ not json"), Err(StorageError::Json(_))));
}

#[test]
#[ignore = "needs a MongoDB server on localhost:27017"]
fn mongo_roundtrip() {
    use tokio::runtime::Builder;

    let rt = Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to build Tokio runtime");

    rt.block_on(async {
        let store = PresetStore::init("mongodb://localhost:27017", "starforge_test", "presets")
            .await
            .expect("storage init failed");

        let preset = PresetDoc::new(
            "roundtrip",
            GeneratorConfig::Planet(PlanetConfig::preset(PlanetType::Ice, 5)),
        );
        store.save(&preset).await.expect("save failed");
        // Saving twice replaces instead of duplicating
        store.save(&preset).await.expect("second save failed");

        let found = store
            .read_by_name("roundtrip")
            .await
            .expect("read failed")
            .expect("preset not found");
        assert_eq!(found.config, preset.config);
        assert!(store.list_names().await.unwrap().contains(&"roundtrip".to_string()));

        store.delete_by_name("roundtrip").await.expect("delete failed");
        assert!(matches!(
            store.delete_by_name("roundtrip").await,
            Err(StorageError::NotFound(_))
        ));
    });
}
