//! Object CRUD operations

use std::collections::HashSet;

use shared::{Object3D, ObjectId, ObjectPatch, SceneFile, SceneSettings};

use super::checks::{validate_batch, validate_object, validate_settings};
use super::SceneState;
use crate::error::{SceneError, SceneResult};

impl SceneState {
    /// Build a scene from a file after validating every object.
    pub fn from_scene_file(file: SceneFile) -> SceneResult<Self> {
        validate_batch(&[], &file.objects)?;
        validate_settings(&file.settings)?;
        Ok(Self {
            scene: file,
            ..Self::default()
        })
    }

    /// Insert one object.
    pub fn add_object(&mut self, obj: Object3D) -> SceneResult<ObjectId> {
        let id = obj.id.clone();
        self.add_objects(vec![obj])?;
        Ok(id)
    }

    /// Insert a batch atomically: either every object goes in or none does.
    ///
    /// Bonds may reference atoms from the same batch.
    pub fn add_objects(&mut self, batch: Vec<Object3D>) -> SceneResult<Vec<ObjectId>> {
        if batch.is_empty() {
            return Ok(Vec::new());
        }
        if let Err(e) = validate_batch(&self.scene.objects, &batch) {
            tracing::warn!("Rejected {} object(s): {}", batch.len(), e);
            return Err(e);
        }

        self.save_undo();
        let ids: Vec<ObjectId> = batch.iter().map(|o| o.id.clone()).collect();
        self.scene.objects.extend(batch);
        self.commit();

        tracing::info!(count = ids.len(), total = self.len(), "Added objects");
        Ok(ids)
    }

    /// Apply a partial update and return the updated object.
    pub fn update_object(&mut self, id: &str, patch: ObjectPatch) -> SceneResult<Object3D> {
        let index = self
            .scene
            .objects
            .iter()
            .position(|o| o.id == id)
            .ok_or_else(|| SceneError::NotFound(id.to_string()))?;

        let mut updated = self.scene.objects[index].clone();
        if let Some(position) = patch.position {
            updated.position = position;
        }
        if let Some(rotation) = patch.rotation {
            updated.rotation = rotation;
        }
        if let Some(scale) = patch.scale {
            updated.scale = scale;
        }
        if let Some(material) = patch.material {
            updated.material = material;
        }
        validate_object(&updated)?;

        self.save_undo();
        self.scene.objects[index] = updated.clone();
        self.commit();

        tracing::info!(id, "Updated object");
        Ok(updated)
    }

    /// Remove an object; removing an atom also removes the bonds that
    /// reference it. Returns every removed id, the requested one first.
    pub fn remove_object(&mut self, id: &str) -> SceneResult<Vec<ObjectId>> {
        if !self.contains(id) {
            return Err(SceneError::NotFound(id.to_string()));
        }

        let mut removed = vec![id.to_string()];
        removed.extend(
            self.scene
                .objects
                .iter()
                .filter(|o| {
                    o.kind
                        .references()
                        .is_some_and(|(start, end)| start == id || end == id)
                })
                .map(|o| o.id.clone()),
        );

        self.save_undo();
        let doomed: HashSet<&str> = removed.iter().map(String::as_str).collect();
        self.scene.objects.retain(|o| !doomed.contains(o.id.as_str()));
        self.commit();

        tracing::info!(id, cascaded = removed.len() - 1, "Removed object");
        Ok(removed)
    }

    /// Remove every object. Returns the removed ids.
    pub fn clear(&mut self) -> Vec<ObjectId> {
        if self.is_empty() {
            return Vec::new();
        }
        self.save_undo();
        let removed = self.object_ids();
        self.scene.objects.clear();
        self.commit();

        tracing::info!(count = removed.len(), "Cleared scene");
        removed
    }

    /// Replace the whole scene (objects and settings).
    pub fn replace_scene(&mut self, file: SceneFile) -> SceneResult<()> {
        validate_batch(&[], &file.objects)?;
        validate_settings(&file.settings)?;
        self.save_undo();
        self.scene = file;
        self.commit();

        tracing::info!(objects = self.len(), "Replaced scene");
        Ok(())
    }

    /// Replace the display settings as one undoable edit.
    pub fn set_settings(&mut self, settings: SceneSettings) -> SceneResult<()> {
        validate_settings(&settings)?;
        self.save_undo();
        self.scene.settings = settings;
        self.commit();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use shared::Material;

    fn molecule_scene() -> SceneState {
        let mut state = SceneState::new();
        state
            .add_objects(vec![
                fixtures::atom_object("o", [0.0; 3]),
                fixtures::atom_object("h1", [1.0, 0.0, 0.0]),
                fixtures::atom_object("h2", [-1.0, 0.0, 0.0]),
                fixtures::bond_object("b1", "o", "h1"),
                fixtures::bond_object("b2", "o", "h2"),
            ])
            .unwrap();
        state
    }

    #[test]
    fn test_add_and_lookup() {
        let mut state = SceneState::new();
        let id = state.add_object(fixtures::cube_object("c1")).unwrap();
        assert_eq!(id, "c1");
        assert_eq!(state.len(), 1);
        assert_eq!(state.version(), 1);
        assert!(state.contains("c1"));
        assert_eq!(state.last_object().unwrap().id, "c1");
        assert_eq!(state.objects_of_kind("cube").count(), 1);
        assert_eq!(state.objects_of_kind("sphere").count(), 0);
    }

    #[test]
    fn test_batch_is_atomic() {
        let mut state = SceneState::new();
        let err = state
            .add_objects(vec![
                fixtures::cube_object("ok"),
                fixtures::bond_object("b", "nope", "nada"),
            ])
            .unwrap_err();
        assert!(matches!(err, SceneError::DanglingReference { .. }));
        assert!(state.is_empty());
        assert_eq!(state.version(), 0);
        assert!(!state.can_undo());
    }

    #[test]
    fn test_bond_against_existing_atoms() {
        let mut state = SceneState::new();
        state.add_object(fixtures::atom_object("a", [0.0; 3])).unwrap();
        state.add_object(fixtures::atom_object("b", [1.0, 0.0, 0.0])).unwrap();
        assert!(state.add_object(fixtures::bond_object("ab", "a", "b")).is_ok());
    }

    #[test]
    fn test_update_object() {
        let mut state = SceneState::new();
        state.add_object(fixtures::cube_object("c")).unwrap();

        let patch = ObjectPatch {
            position: Some([1.0, 2.0, 3.0]),
            material: Some(Material::with_color("#FF0000")),
            ..Default::default()
        };
        let updated = state.update_object("c", patch).unwrap();
        assert_eq!(updated.position, [1.0, 2.0, 3.0]);
        assert_eq!(state.get_object("c").unwrap().material.color, "#FF0000");
        assert_eq!(state.get_object("c").unwrap().rotation, [0.0; 3]);
    }

    #[test]
    fn test_update_rejects_invalid_scale() {
        let mut state = SceneState::new();
        state.add_object(fixtures::cube_object("c")).unwrap();
        let patch = ObjectPatch {
            scale: Some([-1.0, 1.0, 1.0]),
            ..Default::default()
        };
        assert!(matches!(
            state.update_object("c", patch),
            Err(SceneError::InvalidScale { .. })
        ));
        assert_eq!(state.get_object("c").unwrap().scale, [1.0; 3]);
        assert!(matches!(
            state.update_object("missing", ObjectPatch::default()),
            Err(SceneError::NotFound(_))
        ));
    }

    #[test]
    fn test_remove_atom_cascades_to_bonds() {
        let mut state = molecule_scene();
        let removed = state.remove_object("h1").unwrap();
        assert_eq!(removed, ["h1", "b1"]);
        assert_eq!(state.object_ids(), ["o", "h2", "b2"]);

        let removed = state.remove_object("o").unwrap();
        assert_eq!(removed, ["o", "b2"]);
        assert_eq!(state.object_ids(), ["h2"]);
    }

    #[test]
    fn test_remove_bond_keeps_atoms() {
        let mut state = molecule_scene();
        assert_eq!(state.remove_object("b1").unwrap(), ["b1"]);
        assert_eq!(state.len(), 4);
        assert!(matches!(state.remove_object("b1"), Err(SceneError::NotFound(_))));
    }

    #[test]
    fn test_clear() {
        let mut state = molecule_scene();
        let removed = state.clear();
        assert_eq!(removed.len(), 5);
        assert!(state.is_empty());
        assert!(state.clear().is_empty());
    }

    #[test]
    fn test_set_settings_is_undoable() {
        let mut state = SceneState::new();
        let settings = SceneSettings {
            background_color: "#000000".into(),
            show_grid: false,
            ..SceneSettings::default()
        };
        state.set_settings(settings.clone()).unwrap();
        assert_eq!(state.scene().settings, settings);
        assert_eq!(state.version(), 1);

        let bad = SceneSettings {
            background_color: "#12".into(),
            ..SceneSettings::default()
        };
        assert!(matches!(state.set_settings(bad), Err(SceneError::InvalidSettings(_))));
        assert_eq!(state.version(), 1);

        assert!(state.undo());
        assert_eq!(state.scene().settings, SceneSettings::default());
    }

    #[test]
    fn test_from_scene_file_validates() {
        assert!(SceneState::from_scene_file(fixtures::full_scene_file()).is_ok());

        let mut file = fixtures::full_scene_file();
        file.objects.retain(|o| o.id != "atom-b");
        assert!(matches!(
            SceneState::from_scene_file(file),
            Err(SceneError::DanglingReference { .. })
        ));
    }
}
