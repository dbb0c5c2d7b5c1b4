//! Where preset files live on disk.
//!
//! User presets go in the platform configuration directory:
//!
//! - Linux: `~/.config/rtverb/presets/`
//! - macOS: `~/Library/Application Support/rtverb/presets/`
//! - Windows: `%APPDATA%\rtverb\presets\`
//!
//! # Example
//!
//! ```rust,no_run
//! use rtverb_config::paths;
//!
//! for path in paths::list_presets_in(&paths::user_presets_dir()) {
//!     println!("{:?}", paths::preset_name_from_path(&path));
//! }
//! ```

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

const APP_NAME: &str = "rtverb";
const PRESETS_SUBDIR: &str = "presets";
const PRESET_EXTENSION: &str = "toml";

/// Per-user presets directory; falls back to `./rtverb/presets` when the
/// platform has no configuration directory.
pub fn user_presets_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
        .join(PRESETS_SUBDIR)
}

/// Create the user presets directory if needed and return it.
pub fn ensure_user_presets_dir() -> Result<PathBuf, ConfigError> {
    let dir = user_presets_dir();
    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::create_dir(&dir, e))?;
    Ok(dir)
}

/// Find a preset file by path or by name.
///
/// `name` is first taken as a path. Otherwise `<name>.toml` (the extension
/// is added if missing) is looked up in each of `dirs` in order.
pub fn find_preset_in(name: &str, dirs: &[PathBuf]) -> Option<PathBuf> {
    let direct = Path::new(name);
    if direct.is_file() {
        return Some(direct.to_path_buf());
    }

    let file_name = if direct.extension().is_some_and(|ext| ext == PRESET_EXTENSION) {
        name.to_string()
    } else {
        format!("{name}.{PRESET_EXTENSION}")
    };

    dirs.iter()
        .map(|dir| dir.join(&file_name))
        .find(|candidate| candidate.is_file())
}

/// Find a preset file by path or by name in the user presets directory.
pub fn find_preset(name: &str) -> Option<PathBuf> {
    find_preset_in(name, &[user_presets_dir()])
}

/// Preset files (`*.toml`) directly inside `dir`, sorted by path.
///
/// A missing or unreadable directory yields an empty list.
pub fn list_presets_in(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut presets: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file() && path.extension().is_some_and(|ext| ext == PRESET_EXTENSION)
        })
        .collect();
    presets.sort();
    presets
}

/// File stem of a preset path.
///
/// ```rust
/// use rtverb_config::paths::preset_name_from_path;
/// use std::path::Path;
///
/// assert_eq!(
///     preset_name_from_path(Path::new("/presets/dark_plate.toml")),
///     Some("dark_plate".to_string())
/// );
/// ```
pub fn preset_name_from_path(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
}
