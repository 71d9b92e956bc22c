//! Factory functions for creating test data.
//!
//! Canned strokes in pixel space and small scenes, shared by unit tests,
//! integration tests and the wasm smoke checks.

use std::f64::consts::TAU;

use shared::*;

// ── Stroke factories ────────────────────────────────────────────

/// Polygon approximation of a circle centered at (200, 200). The path is
/// not explicitly closed; for `segments >= 32` the endpoints are close
/// enough to count as closed.
pub fn circle_path(radius: f64, segments: usize) -> Vec<Point2D> {
    (0..segments)
        .map(|i| {
            let a = i as f64 / segments as f64 * TAU;
            Point2D::new(200.0 + radius * a.cos(), 200.0 + radius * a.sin())
        })
        .collect()
}

/// Regular polygon vertices joined by straight segments, with the first
/// vertex repeated at the end to close the stroke.
pub fn regular_polygon(radius: f64, sides: usize) -> Vec<Point2D> {
    let mut points: Vec<Point2D> = (0..sides)
        .map(|i| {
            let a = i as f64 / sides as f64 * TAU;
            Point2D::new(200.0 + radius * a.cos(), 200.0 + radius * a.sin())
        })
        .collect();
    points.push(points[0]);
    points
}

/// Closed rectangular outline sampled every 10px, starting at the top-left
/// corner and stopping 10px short of it.
pub fn rectangle_path(width: f64, height: f64) -> Vec<Point2D> {
    let mut points = Vec::new();
    let step = 10.0;
    let mut walk = |from: (f64, f64), to: (f64, f64)| {
        let len = ((to.0 - from.0).powi(2) + (to.1 - from.1).powi(2)).sqrt();
        let steps = (len / step).round().max(1.0) as usize;
        for s in 0..steps {
            let t = s as f64 / steps as f64;
            points.push(Point2D::new(
                from.0 + (to.0 - from.0) * t,
                from.1 + (to.1 - from.1) * t,
            ));
        }
    };
    walk((0.0, 0.0), (width, 0.0));
    walk((width, 0.0), (width, height));
    walk((width, height), (0.0, height));
    walk((0.0, height), (0.0, step));
    points.push(Point2D::new(0.0, step));
    points
}

/// Nearly horizontal stroke 190px long with 1px jitter.
pub fn line_path() -> Vec<Point2D> {
    (0..20)
        .map(|i| Point2D::new(i as f64 * 10.0, (i % 2) as f64))
        .collect()
}

/// Shaft drawn left to right, then both barbs of the head.
pub fn arrow_path() -> Vec<Point2D> {
    let mut points: Vec<Point2D> = (0..=10).map(|i| Point2D::new(i as f64 * 10.0, 0.0)).collect();
    points.extend([
        Point2D::new(85.0, -15.0),
        Point2D::new(100.0, 0.0),
        Point2D::new(85.0, 15.0),
    ]);
    points
}

/// Closed zig-zag with three hairpin turns.
pub fn hairpin_triangle() -> Vec<Point2D> {
    vec![
        Point2D::new(0.0, 0.0),
        Point2D::new(200.0, 10.0),
        Point2D::new(0.0, 20.0),
        Point2D::new(200.0, 30.0),
        Point2D::new(0.0, 15.0),
    ]
}

/// Closed star-like outline centered at (200, 200): `tips` vertices at
/// `outer` radius alternating with notches at `inner` radius, x scaled by
/// `stretch_x`. The first vertex is repeated at the end.
pub fn spiky_outline(tips: usize, outer: f64, inner: f64, stretch_x: f64) -> Vec<Point2D> {
    let vertices = tips * 2;
    let mut points: Vec<Point2D> = (0..vertices)
        .map(|i| {
            let r = if i % 2 == 0 { outer } else { inner };
            let a = i as f64 / vertices as f64 * TAU;
            Point2D::new(200.0 + stretch_x * r * a.cos(), 200.0 + r * a.sin())
        })
        .collect();
    points.push(points[0]);
    points
}

/// Ellipse sampled at 48 points, centered at (200, 200). Not explicitly closed.
pub fn ellipse_path(radius_x: f64, radius_y: f64) -> Vec<Point2D> {
    (0..48)
        .map(|i| {
            let a = i as f64 / 48.0 * TAU;
            Point2D::new(200.0 + radius_x * a.cos(), 200.0 + radius_y * a.sin())
        })
        .collect()
}

/// Closed zig-zag 200px wide with `turns` hairpins, rising 3px per stroke.
/// Only odd `turns` end back on the left edge close to the start.
pub fn zigzag_outline(turns: usize) -> Vec<Point2D> {
    (0..turns + 2)
        .map(|i| Point2D::new(if i % 2 == 1 { 200.0 } else { 0.0 }, i as f64 * 3.0))
        .collect()
}

/// Triangle outline with three vertices.
pub fn triangle_outline() -> Vec<Point2D> {
    vec![
        Point2D::new(0.0, 0.0),
        Point2D::new(100.0, 0.0),
        Point2D::new(50.0, 80.0),
    ]
}

// ── Object factories ────────────────────────────────────────────

/// Unit cube with the default material.
pub fn cube_object(id: &str) -> Object3D {
    Object3D::new(
        id,
        "Cube",
        ObjectKind::Cube {
            width: 1.0,
            height: 1.0,
            depth: 1.0,
        },
    )
}

/// Carbon atom at a position.
pub fn atom_object(id: &str, position: [f64; 3]) -> Object3D {
    let mut atom = Object3D::new(
        id,
        "C",
        ObjectKind::Atom {
            element: "C".to_string(),
            radius: 0.4,
        },
    );
    atom.position = position;
    atom
}

/// Single bond between two atom ids.
pub fn bond_object(id: &str, start: &str, end: &str) -> Object3D {
    Object3D::new(
        id,
        "Bond",
        ObjectKind::Bond {
            bond_order: BondOrder::Single,
            start_atom_id: start.to_string(),
            end_atom_id: end.to_string(),
            radius: 0.1,
        },
    )
}

/// One object of every kind; bonds reference atoms in the same list.
pub fn one_of_each_kind() -> Vec<Object3D> {
    let mut objects = vec![
        cube_object("cube"),
        Object3D::new("sphere", "Sphere", ObjectKind::Sphere { radius: 0.5, segments: 32 }),
        Object3D::new(
            "cylinder",
            "Cylinder",
            ObjectKind::Cylinder { radius: 0.5, height: 1.0, segments: 32 },
        ),
        Object3D::new(
            "cone",
            "Cone",
            ObjectKind::Cone { radius: 0.5, height: 1.0, segments: 32 },
        ),
        Object3D::new(
            "torus",
            "Torus",
            ObjectKind::Torus { radius: 0.5, tube: 0.2, segments: 32 },
        ),
        Object3D::new("pyramid", "Pyramid", ObjectKind::Pyramid { radius: 0.5, height: 1.0 }),
        Object3D::new("plane", "Plane", ObjectKind::Plane { width: 2.0, height: 2.0 }),
        Object3D::new(
            "text",
            "Text",
            ObjectKind::Text3d {
                text: "Hello \"3D\" ünïcode".to_string(),
                font_size: 0.5,
                font_depth: 0.2,
            },
        ),
        atom_object("atom-a", [0.0, 0.0, 0.0]),
        atom_object("atom-b", [2.0, 0.0, 0.0]),
        bond_object("bond", "atom-a", "atom-b"),
        Object3D::new(
            "drawing",
            "Drawing",
            ObjectKind::CustomDrawing {
                drawing_points: triangle_outline(),
                depth: 0.3,
            },
        ),
    ];
    for (i, obj) in objects.iter_mut().enumerate() {
        obj.position = [i as f64 * 1.25, 0.1 * i as f64, -0.7];
        obj.rotation = [0.0, 0.3 * i as f64, 0.0];
    }
    objects
}

/// Scene file containing [`one_of_each_kind`].
pub fn full_scene_file() -> SceneFile {
    SceneFile {
        objects: one_of_each_kind(),
        settings: SceneSettings {
            background_color: "#ffffff".to_string(),
            show_grid: false,
            show_axes: true,
            camera_mode: CameraMode::Orthographic,
        },
    }
}
