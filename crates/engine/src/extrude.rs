use shared::Point2D;

use crate::geometry::bounding_box;
use crate::mesh::{hex_to_rgb, MeshData, DEFAULT_MESH_COLOR};

/// Thickness of an extruded drawing in world units.
pub const DRAWING_DEPTH: f64 = 0.3;

/// Half extent of the normalized drawing square.
const HALF_EXTENT: f64 = 0.4;

// ── Extrude ─────────────────────────────────────────────────

/// Extrude a drawn path into a slab mesh with the default color.
pub fn extrude_drawing(points: &[Point2D]) -> Option<MeshData> {
    extrude_drawing_with_color(points, DEFAULT_MESH_COLOR)
}

/// Extrude using a `#RRGGBB` material color.
pub fn extrude_drawing_hex(points: &[Point2D], color: &str) -> Option<MeshData> {
    extrude_drawing_with_color(points, hex_to_rgb(color).unwrap_or(DEFAULT_MESH_COLOR))
}

/// Extrude a drawn path into a slab of [`DRAWING_DEPTH`].
///
/// Returns `None` for fewer than 3 points. Vertices `0..n` form the front
/// face at `z = +depth/2` and `n..2n` the back face at `z = -depth/2`.
/// Side walls join consecutive points only: the edge from the last point
/// back to the first is left open.
pub fn extrude_drawing_with_color(points: &[Point2D], color: [f32; 3]) -> Option<MeshData> {
    let n = points.len();
    if n < 3 {
        return None;
    }

    let outline = normalize_outline(points);
    let half_depth = (DRAWING_DEPTH / 2.0) as f32;

    let mut mesh = MeshData {
        vertices: Vec::with_capacity(2 * n * 9),
        indices: Vec::with_capacity((4 * n - 6) * 3),
    };

    for &[x, y] in &outline {
        mesh.push_vertex([x, y, half_depth], [0.0; 3], color);
    }
    for &[x, y] in &outline {
        mesh.push_vertex([x, y, -half_depth], [0.0; 3], color);
    }

    let n = n as u32;

    // Side walls
    for i in 0..n - 1 {
        let front = i;
        let back = n + i;
        mesh.indices.extend_from_slice(&[front, back, front + 1]);
        mesh.indices.extend_from_slice(&[front + 1, back, back + 1]);
    }

    // Front cap (fan triangulation)
    for i in 1..n - 1 {
        mesh.indices.extend_from_slice(&[0, i, i + 1]);
    }

    // Back cap (reversed fan)
    for i in 1..n - 1 {
        mesh.indices.extend_from_slice(&[n, n + i + 1, n + i]);
    }

    mesh.compute_vertex_normals();
    Some(mesh)
}

/// Map points into `[-0.4, 0.4]²` centered on the bounding box, flipping y
/// from screen-down to world-up.
fn normalize_outline(points: &[Point2D]) -> Vec<[f32; 2]> {
    let bbox = bounding_box(points);
    let width = if bbox.width == 0.0 { 1.0 } else { bbox.width };
    let height = if bbox.height == 0.0 { 1.0 } else { bbox.height };
    let cx = bbox.x + bbox.width / 2.0;
    let cy = bbox.y + bbox.height / 2.0;

    points
        .iter()
        .map(|p| {
            let x = (p.x - cx) / width * 2.0 * HALF_EXTENT;
            let y = -(p.y - cy) / height * 2.0 * HALF_EXTENT;
            [x as f32, y as f32]
        })
        .collect()
}
