//! Scene state management
//!
//! Ordered object collection with settings, undo/redo history and
//! insertion-time validation. A single owner mutates it; callers that need
//! concurrent access route edits through one task.

mod checks;
mod history;
mod object_ops;
mod persistence;

pub use checks::{is_hex_color, validate_object};

use std::path::PathBuf;

use shared::{Object3D, ObjectId, SceneFile, SceneSettings};

/// Maximum number of undo snapshots kept.
pub const MAX_UNDO_DEPTH: usize = 100;

/// Scene objects and settings with undo/redo history
#[derive(Debug, Default)]
pub struct SceneState {
    /// Current scene
    pub(crate) scene: SceneFile,
    /// Undo stack - previous states
    pub(crate) undo_stack: Vec<SceneFile>,
    /// Redo stack - undone states
    pub(crate) redo_stack: Vec<SceneFile>,
    /// Monotonically increasing version counter
    pub(crate) version: u64,
    /// Written after every mutation when set
    pub(crate) autosave_path: Option<PathBuf>,
}

impl SceneState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current scene version (increments on every mutation)
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn scene(&self) -> &SceneFile {
        &self.scene
    }

    pub fn objects(&self) -> &[Object3D] {
        &self.scene.objects
    }

    pub fn settings(&self) -> &SceneSettings {
        &self.scene.settings
    }

    pub fn len(&self) -> usize {
        self.scene.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scene.objects.is_empty()
    }

    pub fn get_object(&self, id: &str) -> Option<&Object3D> {
        self.scene.objects.iter().find(|o| o.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get_object(id).is_some()
    }

    /// Objects whose kind name (e.g. `"sphere"`) matches, in insertion order
    pub fn objects_of_kind<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a Object3D> + 'a {
        self.scene.objects.iter().filter(move |o| o.kind_name() == kind)
    }

    /// Most recently added object
    pub fn last_object(&self) -> Option<&Object3D> {
        self.scene.objects.last()
    }

    /// Most recently added object of `kind`
    pub fn last_object_of_kind(&self, kind: &str) -> Option<&Object3D> {
        self.scene.objects.iter().rev().find(|o| o.kind_name() == kind)
    }

    pub fn object_ids(&self) -> Vec<ObjectId> {
        self.scene.objects.iter().map(|o| o.id.clone()).collect()
    }

    /// Save current state to undo stack and drop the redo branch
    pub(crate) fn save_undo(&mut self) {
        self.undo_stack.push(self.scene.clone());
        if self.undo_stack.len() > MAX_UNDO_DEPTH {
            self.undo_stack.remove(0);
        }
        self.redo_stack.clear();
    }

    /// Bump version and autosave after a mutation
    pub(crate) fn commit(&mut self) {
        self.version += 1;
        self.autosave();
    }
}
