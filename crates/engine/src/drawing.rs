//! From a finished stroke to a scene object.

use shared::{DrawMode, ObjectId, ObjectKind, Object3D, Point2D, RecognizedShape};

use crate::extrude::{extrude_drawing_hex, DRAWING_DEPTH};
use crate::factory::{create_primitive, shape_to_primitive, PrimitiveParams};
use crate::geometry::bounding_box;
use crate::mesh::MeshData;
use crate::recognize::{estimate_size, recognize_shape};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawingOptions {
    pub mode: DrawMode,
    pub color: Option<String>,
    pub position: [f64; 3],
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawingResult {
    pub shape: RecognizedShape,
    pub size: f64,
    pub object: Object3D,
}

/// Classify a stroke and build the object that stands in for it.
pub fn process_drawing(points: &[Point2D], options: &DrawingOptions, id: ObjectId) -> DrawingResult {
    let shape = recognize_shape(points);
    let size = estimate_size(points);

    let freeform = match options.mode {
        DrawMode::Freeform => points.len() >= 3,
        DrawMode::Shape => shape == RecognizedShape::Unknown && points.len() >= 3,
    };

    let object = if freeform {
        custom_drawing(id, points, size, options)
    } else {
        primitive_for_shape(id, shape, points, size, options)
    };

    tracing::debug!(
        shape = shape.as_str(),
        size,
        kind = object.kind_name(),
        "Processed drawing"
    );
    DrawingResult {
        shape,
        size,
        object,
    }
}

fn primitive_for_shape(
    id: ObjectId,
    shape: RecognizedShape,
    points: &[Point2D],
    size: f64,
    options: &DrawingOptions,
) -> Object3D {
    let params = PrimitiveParams {
        size,
        color: options.color.clone(),
        position: options.position,
        aspect_ratio: (shape == RecognizedShape::Rectangle)
            .then(|| bounding_box(points).aspect_ratio()),
        ..PrimitiveParams::default()
    };
    let mut obj = create_primitive(id, shape_to_primitive(shape), &params);

    // Pentagons and hexagons become prisms with matching side counts.
    let sides = match shape {
        RecognizedShape::Pentagon => Some(5),
        RecognizedShape::Hexagon => Some(6),
        _ => None,
    };
    if let (Some(sides), ObjectKind::Cylinder { segments, .. }) = (sides, &mut obj.kind) {
        *segments = sides;
    }
    obj
}

fn custom_drawing(id: ObjectId, points: &[Point2D], size: f64, options: &DrawingOptions) -> Object3D {
    let mut obj = Object3D::new(
        id,
        "Drawing",
        ObjectKind::CustomDrawing {
            drawing_points: points.to_vec(),
            depth: DRAWING_DEPTH,
        },
    );
    obj.position = options.position;
    obj.scale = [size, size, size];
    if let Some(color) = &options.color {
        obj.material.color = color.clone();
    }
    obj
}

/// Extruded mesh for a custom drawing object; `None` for any other kind.
pub fn drawing_mesh(obj: &Object3D) -> Option<MeshData> {
    match &obj.kind {
        ObjectKind::CustomDrawing { drawing_points, .. } => {
            extrude_drawing_hex(drawing_points, &obj.material.color)
        }
        _ => None,
    }
}
