//! Integration tests for rtverb-config.
//!
//! These tests go from files on disk to a running engine.

use rtverb_config::{
    ConfigError, EngineFile, PresetFile, ValidationError, build_engine, factory_presets,
    load_preset, paths,
};
use rtverb_engine::{PredelayMode, ReverbParameters};
use tempfile::TempDir;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

fn process(engine: &mut rtverb_engine::ReverbEngine, input: &[f32]) -> Vec<f32> {
    let mut out_l = vec![0.0; input.len()];
    let mut out_r = vec![0.0; input.len()];
    engine.process(input, input, &mut out_l, &mut out_r, input.len(), 1);
    out_l
}

/// Every factory preset drives the engine to finite output.
#[test]
fn test_factory_presets_process() {
    let mut impulse = vec![0.0f32; 8192];
    impulse[0] = 1.0;

    for (index, preset) in factory_presets().iter().enumerate() {
        let mut engine = build_engine(&EngineFile::default()).unwrap();
        assert!(engine.load_preset_by_index(index));
        assert_eq!(engine.parameters(), &preset.parameters, "{}", preset.name);

        let out = process(&mut engine, &impulse);
        assert!(
            out.iter().all(|s| s.is_finite()),
            "factory preset '{}' produced non-finite output",
            preset.name
        );
    }
}

/// A preset saved to disk, reloaded and queued reaches the engine intact.
#[test]
fn test_preset_file_to_engine() {
    init_tracing();
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("dark_plate.toml");

    let params = ReverbParameters {
        room_size: 0.75,
        damp: 0.9,
        width: 0.5,
        predelay: 0.01,
        cutoff: 3000.0,
        ..ReverbParameters::DEFAULT
    };
    PresetFile::new("Dark Plate", params)
        .with_description("Plate with the top end rolled off")
        .save(&path)
        .unwrap();

    let preset = load_preset(&path).unwrap();
    assert_eq!(preset.name, "Dark Plate");

    let file = EngineFile::from_toml("predelay = \"simple\"").unwrap();
    let mut engine = build_engine(&file).unwrap();
    engine.queue_preset(&preset);
    process(&mut engine, &[0.0; 64]);

    assert_eq!(engine.parameters(), &params);
    assert_eq!(engine.latency_samples(), 480);
}

/// An engine file naming a preset on disk loads it.
#[test]
fn test_engine_file_with_preset_path() {
    init_tracing();
    let temp_dir = TempDir::new().unwrap();
    let preset_path = temp_dir.path().join("wide.toml");
    PresetFile::new(
        "Wide",
        ReverbParameters {
            width: 1.0,
            room_size: 0.2,
            ..ReverbParameters::DEFAULT
        },
    )
    .save(&preset_path)
    .unwrap();

    let engine_path = temp_dir.path().join("rtverb.toml");
    EngineFile {
        sample_rate: 44100.0,
        predelay: rtverb_config::PredelaySetting::Crossfade,
        preset: Some(preset_path.to_string_lossy().into_owned()),
        ..EngineFile::default()
    }
    .save(&engine_path)
    .unwrap();

    let engine = build_engine(&EngineFile::load(&engine_path).unwrap()).unwrap();
    assert_eq!(engine.sample_rate(), 44100.0);
    assert_eq!(engine.predelay_mode(), PredelayMode::Crossfade);
    assert_eq!(engine.room_size(), 0.2);
}

/// Out-of-range values in a file are reported, all at once.
#[test]
fn test_invalid_preset_file_reports_every_field() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("broken.toml");
    std::fs::write(
        &path,
        r#"
name = "Broken"
[parameters]
room_size = 8.0
wet = -1.0
"#,
    )
    .unwrap();

    match load_preset(&path) {
        Err(ConfigError::Validation(ValidationError::Multiple(errors))) => {
            assert_eq!(errors.len(), 2);
        }
        other => panic!("expected two validation errors, got {other:?}"),
    }
}

/// Presets saved in a directory are found by name and listed.
#[test]
fn test_find_and_list_presets() {
    let temp_dir = TempDir::new().unwrap();
    for name in ["cave", "booth"] {
        PresetFile::new(name, ReverbParameters::DEFAULT)
            .save(temp_dir.path().join(format!("{name}.toml")))
            .unwrap();
    }

    let dirs = [temp_dir.path().to_path_buf()];
    let found = paths::find_preset_in("cave", &dirs).unwrap();
    assert_eq!(PresetFile::load(found).unwrap().name, "cave");

    let listed: Vec<_> = paths::list_presets_in(temp_dir.path())
        .iter()
        .filter_map(|p| paths::preset_name_from_path(p))
        .collect();
    assert_eq!(listed, ["booth", "cave"]);
}

/// Saving a factory preset and reading it back gives the same preset.
#[test]
fn test_factory_presets_survive_files() {
    let temp_dir = TempDir::new().unwrap();
    for preset in factory_presets() {
        let path = temp_dir.path().join(format!("{}.toml", preset.name));
        PresetFile::from_preset(&preset).save(&path).unwrap();
        assert_eq!(load_preset(&path).unwrap(), preset);
    }
}
