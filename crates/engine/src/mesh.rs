use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Floats per vertex in [`MeshData::vertices`].
pub const VERTEX_STRIDE: usize = 9;

/// Fallback vertex color when a hex color can't be parsed.
pub const DEFAULT_MESH_COLOR: [f32; 3] = [0.23, 0.51, 0.96];

/// CPU-side mesh data: interleaved [pos.x, pos.y, pos.z, norm.x, norm.y, norm.z, r, g, b]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MeshData {
    /// 9 floats per vertex: position(3) + normal(3) + color(3)
    pub vertices: Vec<f32>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / VERTEX_STRIDE
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Append a vertex and return its index.
    pub fn push_vertex(&mut self, pos: [f32; 3], normal: [f32; 3], color: [f32; 3]) -> u32 {
        let index = self.vertex_count() as u32;
        self.vertices.extend_from_slice(&pos);
        self.vertices.extend_from_slice(&normal);
        self.vertices.extend_from_slice(&color);
        index
    }

    pub fn position(&self, index: usize) -> Vec3 {
        let base = index * VERTEX_STRIDE;
        Vec3::new(
            self.vertices[base],
            self.vertices[base + 1],
            self.vertices[base + 2],
        )
    }

    pub fn normal(&self, index: usize) -> Vec3 {
        let base = index * VERTEX_STRIDE + 3;
        Vec3::new(
            self.vertices[base],
            self.vertices[base + 1],
            self.vertices[base + 2],
        )
    }

    /// Triangles as index triples.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Recompute smooth vertex normals from the index buffer.
    ///
    /// Face normals are accumulated unnormalized, so larger faces weigh more.
    /// Vertices touched only by degenerate faces end up with a zero normal.
    pub fn compute_vertex_normals(&mut self) {
        let count = self.vertex_count();
        let mut accum = vec![Vec3::ZERO; count];

        for [a, b, c] in self.triangles() {
            let (a, b, c) = (a as usize, b as usize, c as usize);
            if a >= count || b >= count || c >= count {
                continue;
            }
            let pa = self.position(a);
            let face = (self.position(b) - pa).cross(self.position(c) - pa);
            accum[a] += face;
            accum[b] += face;
            accum[c] += face;
        }

        for (i, n) in accum.into_iter().enumerate() {
            let n = n.normalize_or_zero();
            let base = i * VERTEX_STRIDE + 3;
            self.vertices[base] = n.x;
            self.vertices[base + 1] = n.y;
            self.vertices[base + 2] = n.z;
        }
    }
}

/// Parse `#RRGGBB` into linear 0..1 RGB.
pub fn hex_to_rgb(hex: &str) -> Option<[f32; 3]> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let channel = |i: usize| {
        u8::from_str_radix(&digits[i..i + 2], 16)
            .ok()
            .map(|v| v as f32 / 255.0)
    };
    Some([channel(0)?, channel(2)?, channel(4)?])
}
