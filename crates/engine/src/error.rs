//! Error types for scene editing and catalog lookups.

use shared::ObjectId;
use thiserror::Error;

/// Result type for scene operations
pub type SceneResult<T> = std::result::Result<T, SceneError>;

/// Errors raised when a scene edit would break the scene invariants.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("Object '{0}' already exists")]
    DuplicateId(ObjectId),

    #[error("Object '{0}' not found")]
    NotFound(ObjectId),

    #[error("Bond '{bond}' references missing atom '{atom}'")]
    DanglingReference { bond: ObjectId, atom: ObjectId },

    #[error("Object '{id}' has non-positive scale {scale:?}")]
    InvalidScale { id: ObjectId, scale: [f64; 3] },

    #[error("Object '{id}' has non-finite {field} {value:?}")]
    NonFiniteTransform {
        id: ObjectId,
        field: &'static str,
        value: [f64; 3],
    },

    #[error("Object '{id}' has non-finite {kind} dimensions")]
    NonFiniteGeometry { id: ObjectId, kind: &'static str },

    #[error("Object '{id}' has invalid material: {reason}")]
    InvalidMaterial { id: ObjectId, reason: String },

    #[error("Invalid scene settings: {0}")]
    InvalidSettings(String),

    #[error("Scene serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Scene file error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from the molecule catalog.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MoleculeError {
    #[error("Molecule not found: {0}")]
    NotFound(String),
}
