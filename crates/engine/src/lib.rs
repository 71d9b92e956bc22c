// Library crate: the geometry classification and object generation pipeline.
// Rendering, input capture and network collaborators live outside this crate.

pub mod command;
pub mod dispatch;
pub mod drawing;
pub mod error;
pub mod extrude;
pub mod factory;
pub mod fixtures;
pub mod geometry;
pub mod mesh;
pub mod molecule;
pub mod recognize;
pub mod scene;
pub mod validation;

/// Generate a fresh object id.
pub fn new_object_id() -> shared::ObjectId {
    uuid::Uuid::new_v4().to_string()
}
