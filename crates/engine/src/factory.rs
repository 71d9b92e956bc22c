//! Parameterized primitive construction.

use shared::{CommandTarget, Material, ObjectId, ObjectKind, Object3D, RecognizedShape};

use crate::molecule::{element_color, element_radius};

const DEFAULT_SEGMENTS: u32 = 32;
const DEFAULT_TEXT: &str = "Text";
const DEFAULT_ELEMENT: &str = "C";

/// Drawn-rectangle aspect ratios are clamped to this range.
const MIN_ASPECT: f64 = 0.25;
const MAX_ASPECT: f64 = 4.0;

/// Primitive kinds the factory can build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Cube,
    Sphere,
    Cylinder,
    Cone,
    Torus,
    Pyramid,
    Plane,
    Text3d,
    Atom,
}

impl PrimitiveKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            PrimitiveKind::Cube => "Cube",
            PrimitiveKind::Sphere => "Sphere",
            PrimitiveKind::Cylinder => "Cylinder",
            PrimitiveKind::Cone => "Cone",
            PrimitiveKind::Torus => "Torus",
            PrimitiveKind::Pyramid => "Pyramid",
            PrimitiveKind::Plane => "Plane",
            PrimitiveKind::Text3d => "Text",
            PrimitiveKind::Atom => "Atom",
        }
    }

    /// Primitive for a command target; molecules are not primitives.
    pub fn from_target(target: CommandTarget) -> Option<Self> {
        match target {
            CommandTarget::Cube => Some(PrimitiveKind::Cube),
            CommandTarget::Sphere => Some(PrimitiveKind::Sphere),
            CommandTarget::Cylinder => Some(PrimitiveKind::Cylinder),
            CommandTarget::Cone => Some(PrimitiveKind::Cone),
            CommandTarget::Torus => Some(PrimitiveKind::Torus),
            CommandTarget::Pyramid => Some(PrimitiveKind::Pyramid),
            CommandTarget::Plane => Some(PrimitiveKind::Plane),
            CommandTarget::Text3d => Some(PrimitiveKind::Text3d),
            CommandTarget::Molecule => None,
        }
    }

    /// Parse a kind name such as `"sphere"` or `"text3d"`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "cube" => Some(PrimitiveKind::Cube),
            "sphere" => Some(PrimitiveKind::Sphere),
            "cylinder" => Some(PrimitiveKind::Cylinder),
            "cone" => Some(PrimitiveKind::Cone),
            "torus" => Some(PrimitiveKind::Torus),
            "pyramid" => Some(PrimitiveKind::Pyramid),
            "plane" => Some(PrimitiveKind::Plane),
            "text3d" | "text" => Some(PrimitiveKind::Text3d),
            "atom" => Some(PrimitiveKind::Atom),
            _ => None,
        }
    }
}

/// Which primitive stands in for a recognized drawing.
pub fn shape_to_primitive(shape: RecognizedShape) -> PrimitiveKind {
    match shape {
        RecognizedShape::Circle => PrimitiveKind::Sphere,
        RecognizedShape::Square | RecognizedShape::Rectangle => PrimitiveKind::Cube,
        RecognizedShape::Triangle => PrimitiveKind::Cone,
        RecognizedShape::Line => PrimitiveKind::Cylinder,
        RecognizedShape::Star => PrimitiveKind::Torus,
        RecognizedShape::Pentagon | RecognizedShape::Hexagon => PrimitiveKind::Cylinder,
        RecognizedShape::Arrow => PrimitiveKind::Cone,
        RecognizedShape::Unknown => PrimitiveKind::Cube,
    }
}

/// Inputs for [`create_primitive`].
#[derive(Debug, Clone, PartialEq)]
pub struct PrimitiveParams {
    pub size: f64,
    /// Overrides the default material color.
    pub color: Option<String>,
    pub position: [f64; 3],
    /// Text for `Text3d`.
    pub text: Option<String>,
    /// Element symbol for `Atom`.
    pub element: Option<String>,
    /// Width/height of the source drawing; stretches cubes.
    pub aspect_ratio: Option<f64>,
}

impl Default for PrimitiveParams {
    fn default() -> Self {
        Self {
            size: 1.0,
            color: None,
            position: [0.0, 0.0, 0.0],
            text: None,
            element: None,
            aspect_ratio: None,
        }
    }
}

impl PrimitiveParams {
    pub fn sized(size: f64) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }
}

/// Build a fully parameterized object for `kind`.
pub fn create_primitive(id: ObjectId, kind: PrimitiveKind, params: &PrimitiveParams) -> Object3D {
    let size = params.size;

    let object_kind = match kind {
        PrimitiveKind::Cube => {
            let stretch = params
                .aspect_ratio
                .filter(|r| r.is_finite() && *r > 0.0)
                .map(|r| r.clamp(MIN_ASPECT, MAX_ASPECT))
                .unwrap_or(1.0);
            ObjectKind::Cube {
                width: size * stretch,
                height: size,
                depth: size,
            }
        }
        PrimitiveKind::Sphere => ObjectKind::Sphere {
            radius: size * 0.5,
            segments: DEFAULT_SEGMENTS,
        },
        PrimitiveKind::Cylinder => ObjectKind::Cylinder {
            radius: size * 0.5,
            height: size,
            segments: DEFAULT_SEGMENTS,
        },
        PrimitiveKind::Cone => ObjectKind::Cone {
            radius: size * 0.5,
            height: size,
            segments: DEFAULT_SEGMENTS,
        },
        PrimitiveKind::Torus => ObjectKind::Torus {
            radius: size * 0.5,
            tube: size * 0.2,
            segments: DEFAULT_SEGMENTS,
        },
        PrimitiveKind::Pyramid => ObjectKind::Pyramid {
            radius: size * 0.5,
            height: size,
        },
        PrimitiveKind::Plane => ObjectKind::Plane {
            width: size * 2.0,
            height: size * 2.0,
        },
        PrimitiveKind::Text3d => ObjectKind::Text3d {
            text: params.text.clone().unwrap_or_else(|| DEFAULT_TEXT.to_string()),
            font_size: size * 0.5,
            font_depth: size * 0.2,
        },
        PrimitiveKind::Atom => {
            let element = params.element.as_deref().unwrap_or(DEFAULT_ELEMENT);
            ObjectKind::Atom {
                element: element.to_string(),
                radius: element_radius(element) * size,
            }
        }
    };

    let color = match (&params.color, &object_kind) {
        (Some(color), _) => color.clone(),
        (None, ObjectKind::Atom { element, .. }) => element_color(element).to_string(),
        (None, _) => shared::DEFAULT_COLOR.to_string(),
    };

    let name = match &object_kind {
        ObjectKind::Atom { element, .. } => element.clone(),
        _ => kind.display_name().to_string(),
    };

    let mut obj = Object3D::new(id, name, object_kind);
    obj.position = params.position;
    obj.material = Material::with_color(color);
    obj
}
