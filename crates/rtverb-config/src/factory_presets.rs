//! Factory presets bundled with rtverb.
//!
//! The presets are embedded as TOML at compile time, in the same format as a
//! user preset file, so they are always available and double as examples of
//! the file format.

use std::sync::Arc;

use rtverb_engine::Preset;

use crate::preset_file::PresetFile;

/// Identifiers of the factory presets, in catalog order.
pub static FACTORY_PRESET_NAMES: &[&str] = &[
    "default",
    "small_room",
    "medium_hall",
    "large_cathedral",
    "plate",
    "spring",
    "ambient_wash",
    "freeze",
];

static FACTORY_PRESETS_TOML: &[(&str, &str)] = &[
    ("default", DEFAULT_PRESET),
    ("small_room", SMALL_ROOM_PRESET),
    ("medium_hall", MEDIUM_HALL_PRESET),
    ("large_cathedral", LARGE_CATHEDRAL_PRESET),
    ("plate", PLATE_PRESET),
    ("spring", SPRING_PRESET),
    ("ambient_wash", AMBIENT_WASH_PRESET),
    ("freeze", FREEZE_PRESET),
];

const DEFAULT_PRESET: &str = r#"
name = "Default"
description = "Medium room, fully wet"

[parameters]
room_size = 0.5
damp = 0.5
wet = 1.0
dry = 0.0
width = 1.0
mode = 0.0
predelay = 0.0
cutoff = 8000.0
resonance = 0.5
"#;

const SMALL_ROOM_PRESET: &str = r#"
name = "Small Room"
description = "Short, absorbent room"

[parameters]
room_size = 0.3
damp = 0.7
wet = 1.0
dry = 0.0
width = 0.8
mode = 0.0
predelay = 0.005
cutoff = 6000.0
resonance = 0.3
"#;

const MEDIUM_HALL_PRESET: &str = r#"
name = "Medium Hall"
description = "Concert hall with a short gap before the tail"

[parameters]
room_size = 0.6
damp = 0.4
wet = 1.0
dry = 0.0
width = 1.0
mode = 0.0
predelay = 0.015
cutoff = 8000.0
resonance = 0.4
"#;

const LARGE_CATHEDRAL_PRESET: &str = r#"
name = "Large Cathedral"
description = "Long, bright decay"

[parameters]
room_size = 0.85
damp = 0.2
wet = 1.0
dry = 0.0
width = 1.0
mode = 0.0
predelay = 0.035
cutoff = 10000.0
resonance = 0.3
"#;

const PLATE_PRESET: &str = r#"
name = "Plate"
description = "Dense, bright plate"

[parameters]
room_size = 0.7
damp = 0.6
wet = 1.0
dry = 0.0
width = 0.9
mode = 0.0
predelay = 0.002
cutoff = 12000.0
resonance = 0.6
"#;

const SPRING_PRESET: &str = r#"
name = "Spring"
description = "Dark, narrow spring tank"

[parameters]
room_size = 0.4
damp = 0.8
wet = 1.0
dry = 0.0
width = 0.7
mode = 0.0
predelay = 0.001
cutoff = 5000.0
resonance = 0.8
"#;

const AMBIENT_WASH_PRESET: &str = r#"
name = "Ambient Wash"
description = "Very long, barely damped tail"

[parameters]
room_size = 0.9
damp = 0.1
wet = 1.0
dry = 0.0
width = 1.0
mode = 0.0
predelay = 0.025
cutoff = 9000.0
resonance = 0.2
"#;

const FREEZE_PRESET: &str = r#"
name = "Freeze"
description = "Holds the current tail indefinitely"

[parameters]
room_size = 1.0
damp = 0.0
wet = 1.0
dry = 0.0
width = 1.0
mode = 1.0
predelay = 0.0
cutoff = 8000.0
resonance = 0.3
"#;

fn parse(toml: &str) -> Option<Preset> {
    PresetFile::from_toml(toml)
        .and_then(|file| file.to_preset())
        .ok()
}

/// All factory presets, in catalog order.
///
/// # Example
///
/// ```rust
/// use rtverb_config::factory_presets;
///
/// for preset in factory_presets() {
///     println!("{}: room {}", preset.name, preset.parameters.room_size);
/// }
/// ```
pub fn factory_presets() -> Vec<Preset> {
    FACTORY_PRESETS_TOML
        .iter()
        .filter_map(|(_, toml)| parse(toml))
        .collect()
}

/// Factory presets as a shared catalog for
/// [`ReverbEngine::set_catalog`](rtverb_engine::ReverbEngine::set_catalog).
pub fn factory_catalog() -> Arc<[Preset]> {
    factory_presets().into()
}

/// Get a factory preset by identifier or display name, case-insensitively.
///
/// ```rust
/// use rtverb_config::factory_preset;
///
/// assert!(factory_preset("medium_hall").is_some());
/// assert!(factory_preset("Medium Hall").is_some());
/// assert!(factory_preset("hangar").is_none());
/// ```
pub fn factory_preset(name: &str) -> Option<Preset> {
    FACTORY_PRESETS_TOML
        .iter()
        .filter_map(|(id, toml)| Some((*id, parse(toml)?)))
        .find(|(id, preset)| id.eq_ignore_ascii_case(name) || preset.name.eq_ignore_ascii_case(name))
        .map(|(_, preset)| preset)
}

/// Check if a name refers to a factory preset.
pub fn is_factory_preset(name: &str) -> bool {
    factory_preset(name).is_some()
}
