//! Save/load and autosave

use std::path::{Path, PathBuf};

use shared::SceneFile;

use super::SceneState;
use crate::error::SceneResult;

impl SceneState {
    /// Default autosave location in the platform data directory
    pub fn default_autosave_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "doodle", "doodle")
            .map(|dirs| dirs.data_dir().join("autosave.json"))
    }

    /// Write the scene to `path` after every mutation (or stop, with `None`)
    pub fn set_autosave(&mut self, path: Option<PathBuf>) {
        self.autosave_path = path;
    }

    pub fn autosave_path(&self) -> Option<&Path> {
        self.autosave_path.as_deref()
    }

    /// Serialize the scene file (objects + settings)
    pub fn to_json(&self) -> SceneResult<String> {
        Ok(serde_json::to_string_pretty(&self.scene)?)
    }

    /// Parse and validate a scene file
    pub fn from_json(json: &str) -> SceneResult<Self> {
        let file: SceneFile = serde_json::from_str(json)?;
        Self::from_scene_file(file)
    }

    pub fn save_to_path(&self, path: &Path) -> SceneResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn load_from_path(path: &Path) -> SceneResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Restore an autosaved scene, or start empty if there is none or it
    /// cannot be loaded. Autosave stays enabled at `path` either way.
    pub fn restore_autosave(path: PathBuf) -> Self {
        let mut state = if path.exists() {
            Self::load_from_path(&path).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), "Ignoring unreadable autosave: {}", e);
                Self::new()
            })
        } else {
            Self::new()
        };
        tracing::info!(path = %path.display(), objects = state.len(), "Scene restored");
        state.autosave_path = Some(path);
        state
    }

    /// Save scene to the autosave file, if enabled
    pub(crate) fn autosave(&self) {
        if let Some(path) = &self.autosave_path {
            if let Err(e) = self.save_to_path(path) {
                tracing::warn!(path = %path.display(), "Autosave failed: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SceneError;
    use crate::fixtures;

    #[test]
    fn test_json_round_trip_is_byte_exact() {
        let state = SceneState::from_scene_file(fixtures::full_scene_file()).unwrap();
        let json = state.to_json().unwrap();
        let reloaded = SceneState::from_json(&json).unwrap();
        assert_eq!(reloaded.scene(), state.scene());
        assert_eq!(reloaded.to_json().unwrap(), json);
    }

    #[test]
    fn test_json_shape() {
        let state = SceneState::from_scene_file(fixtures::full_scene_file()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&state.to_json().unwrap()).unwrap();
        assert_eq!(value["settings"]["cameraMode"], "orthographic");
        assert_eq!(value["settings"]["backgroundColor"], "#ffffff");
        assert_eq!(value["objects"][10]["kind"]["type"], "bond");
        assert_eq!(value["objects"][10]["kind"]["startAtomId"], "atom-a");
    }

    #[test]
    fn test_from_json_rejects_dangling_bond() {
        let mut file = fixtures::full_scene_file();
        file.objects.retain(|o| o.id != "atom-a");
        let json = serde_json::to_string(&file).unwrap();
        assert!(matches!(
            SceneState::from_json(&json),
            Err(SceneError::DanglingReference { .. })
        ));
        assert!(matches!(
            SceneState::from_json("{ nope"),
            Err(SceneError::Serialization(_))
        ));
    }

    #[test]
    fn test_save_and_load_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scenes").join("scene.json");
        let state = SceneState::from_scene_file(fixtures::full_scene_file()).unwrap();
        state.save_to_path(&path).unwrap();
        let loaded = SceneState::load_from_path(&path).unwrap();
        assert_eq!(loaded.scene(), state.scene());
        assert!(matches!(
            SceneState::load_from_path(&dir.path().join("missing.json")),
            Err(SceneError::Io(_))
        ));
    }

    #[test]
    fn test_autosave_after_mutations() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("autosave.json");

        let mut state = SceneState::restore_autosave(path.clone());
        assert!(state.is_empty());
        state.add_object(fixtures::cube_object("c")).unwrap();
        assert!(path.exists());

        let restored = SceneState::restore_autosave(path.clone());
        assert_eq!(restored.object_ids(), ["c"]);
        assert_eq!(restored.autosave_path(), Some(path.as_path()));
    }

    #[test]
    fn test_corrupt_autosave_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("autosave.json");
        std::fs::write(&path, "garbage").unwrap();
        assert!(SceneState::restore_autosave(path).is_empty());
    }
}
