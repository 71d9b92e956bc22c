//! Integrity checks for generated meshes.

use glam::Vec3;
use thiserror::Error;

use crate::mesh::{MeshData, VERTEX_STRIDE};

/// Tolerance on normal length used by [`MeshValidator::issues`].
pub const NORMAL_TOLERANCE: f32 = 0.1;

/// Something wrong with a mesh buffer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeshIssue {
    #[error("vertex buffer length {0} is not a multiple of {}", VERTEX_STRIDE)]
    VertexStride(usize),

    #[error("index buffer length {0} is not a multiple of 3")]
    IndexStride(usize),

    #[error("index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },

    #[error("normal of vertex {vertex} has length {length}")]
    NormalLength { vertex: usize, length: f32 },
}

/// Read-only checks over a [`MeshData`].
pub struct MeshValidator<'a> {
    mesh: &'a MeshData,
}

impl<'a> MeshValidator<'a> {
    pub fn new(mesh: &'a MeshData) -> Self {
        Self { mesh }
    }

    pub fn vertex_count(&self) -> usize {
        self.mesh.vertex_count()
    }

    pub fn triangle_count(&self) -> usize {
        self.mesh.triangle_count()
    }

    /// Triangles whose index triple satisfies `predicate`.
    pub fn count_triangles(&self, predicate: impl Fn(&[u32; 3]) -> bool) -> usize {
        self.mesh.triangles().filter(|t| predicate(t)).count()
    }

    /// Every problem found; empty for a well-formed mesh.
    ///
    /// A bad vertex stride stops the scan since positions and normals can't
    /// be located. Only the first out-of-range index and the first bad normal
    /// are reported.
    pub fn issues(&self) -> Vec<MeshIssue> {
        let vertices = self.mesh.vertices.len();
        if vertices % VERTEX_STRIDE != 0 {
            return vec![MeshIssue::VertexStride(vertices)];
        }

        let mut issues = Vec::new();
        let indices = self.mesh.indices.len();
        if indices % 3 != 0 {
            issues.push(MeshIssue::IndexStride(indices));
        }

        let vertex_count = self.vertex_count();
        if let Some(&index) = self.mesh.indices.iter().find(|&&i| i as usize >= vertex_count) {
            issues.push(MeshIssue::IndexOutOfRange {
                index,
                vertex_count,
            });
        }

        let bad_normal = (0..vertex_count)
            .map(|vertex| (vertex, self.mesh.normal(vertex).length()))
            .find(|(_, length)| (length - 1.0).abs() > NORMAL_TOLERANCE);
        if let Some((vertex, length)) = bad_normal {
            issues.push(MeshIssue::NormalLength { vertex, length });
        }

        issues
    }

    pub fn is_valid(&self) -> bool {
        self.issues().is_empty()
    }

    /// Min and max corner of the vertex positions; `None` without vertices.
    pub fn extent(&self) -> Option<(Vec3, Vec3)> {
        (0..self.vertex_count())
            .map(|i| self.mesh.position(i))
            .fold(None, |acc, p| match acc {
                None => Some((p, p)),
                Some((min, max)) => Some((min.min(p), max.max(p))),
            })
    }

    /// Width, height and depth of [`extent`](Self::extent).
    pub fn size(&self) -> Vec3 {
        self.extent().map_or(Vec3::ZERO, |(min, max)| max - min)
    }

    pub fn size_close_to(&self, expected: [f32; 3], tolerance: f32) -> bool {
        (self.size() - Vec3::from_array(expected))
            .abs()
            .max_element()
            < tolerance
    }
}
