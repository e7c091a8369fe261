pub mod config;
pub mod layout;
pub mod log;
pub mod util;

pub use config::docking::DockingConfig;
pub use config::state::{GeometryStore, RegionState, State};
pub use layout::{DockPosition, Region, WindowSpec};

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

pub const SAVED_STATE_PATH: &str = "saved-state.json";
pub const PERSPECTIVE_DIR: &str = "perspectives";

const SETTINGS_DIR_ENV: &str = "DOCKYARD_SETTINGS_DIR";

#[derive(thiserror::Error, Debug)]
pub enum InternalError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("Settings error: {0}")]
    Settings(String),
}

/// Root of everything the editor persists, or a named entry below it.
///
/// `DOCKYARD_SETTINGS_DIR` overrides the platform config directory.
pub fn settings_path(path_name: Option<&str>) -> PathBuf {
    let root = if let Ok(path) = std::env::var(SETTINGS_DIR_ENV) {
        PathBuf::from(path)
    } else {
        dirs_next::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("dockyard")
    };

    match path_name {
        Some(name) => root.join(name),
        None => root,
    }
}

/// Reads the persisted state from `root`.
///
/// A corrupt file is moved aside to `<file>.bak` so the next save starts clean.
pub fn read_from_file(root: &Path, file_name: &str) -> Result<State, InternalError> {
    let path = root.join(file_name);

    let mut file = File::open(&path)?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;

    match serde_json::from_str(&contents) {
        Ok(state) => Ok(state),
        Err(e) => {
            let backup = path.with_extension("json.bak");
            if let Err(rename_err) = fs::rename(&path, &backup) {
                ::log::warn!(
                    "Failed to back up corrupt state {}: {}",
                    path.display(),
                    rename_err
                );
            } else {
                ::log::warn!("Corrupt state moved to {}", backup.display());
            }
            Err(InternalError::Settings(e.to_string()))
        }
    }
}

pub fn write_json_to_file(root: &Path, json: &str, file_name: &str) -> Result<(), InternalError> {
    if !root.exists() {
        fs::create_dir_all(root)?;
    }

    let mut file = File::create(root.join(file_name))?;
    file.write_all(json.as_bytes())?;
    Ok(())
}

pub fn save_state(root: &Path, state: &State) -> Result<(), InternalError> {
    let json = serde_json::to_string_pretty(state)
        .map_err(|e| InternalError::Settings(e.to_string()))?;
    write_json_to_file(root, &json, SAVED_STATE_PATH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_survives_disk() {
        let dir = tempfile::tempdir().unwrap();

        let mut state = State::default();
        state.geometry.insert(
            "console",
            WindowSpec {
                width: 400,
                height: 250,
                pos_x: 12,
                pos_y: 40,
            },
        );
        state.regions[Region::Left].dimension = 320.into();
        state.last_perspective = Some("writing".to_string());

        save_state(dir.path(), &state).unwrap();
        let restored = read_from_file(dir.path(), SAVED_STATE_PATH).unwrap();

        assert_eq!(restored.geometry.get("console"), state.geometry.get("console"));
        assert_eq!(restored.regions[Region::Left].dimension, 320);
        assert_eq!(restored.last_perspective.as_deref(), Some("writing"));
    }

    #[test]
    fn corrupt_state_is_moved_aside() {
        let dir = tempfile::tempdir().unwrap();
        write_json_to_file(dir.path(), "{ not json", SAVED_STATE_PATH).unwrap();

        let err = read_from_file(dir.path(), SAVED_STATE_PATH);

        assert!(matches!(err, Err(InternalError::Settings(_))));
        assert!(!dir.path().join(SAVED_STATE_PATH).exists());
        assert!(dir.path().join("saved-state.json.bak").exists());
    }

    #[test]
    fn missing_state_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_from_file(dir.path(), SAVED_STATE_PATH);
        assert!(matches!(err, Err(InternalError::Io(_))));
    }
}
