//! Insertion-time validation of scene objects.

use std::collections::{HashMap, HashSet};

use shared::{Material, Object3D, ObjectKind, SceneSettings};

use crate::error::{SceneError, SceneResult};

/// `#RRGGBB`, either case.
pub fn is_hex_color(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit())
}

fn check_material(id: &str, material: &Material) -> SceneResult<()> {
    let invalid = |reason: String| SceneError::InvalidMaterial {
        id: id.to_string(),
        reason,
    };

    for (name, value) in [
        ("opacity", material.opacity),
        ("metalness", material.metalness),
        ("roughness", material.roughness),
    ] {
        if !(0.0..=1.0).contains(&value) {
            return Err(invalid(format!("{name} {value} is outside [0, 1]")));
        }
    }
    if !(material.emissive_intensity.is_finite() && material.emissive_intensity >= 0.0) {
        return Err(invalid(format!(
            "emissive intensity {} is negative",
            material.emissive_intensity
        )));
    }
    if !is_hex_color(&material.color) {
        return Err(invalid(format!("color '{}' is not #RRGGBB", material.color)));
    }
    if !is_hex_color(&material.emissive) {
        return Err(invalid(format!("emissive '{}' is not #RRGGBB", material.emissive)));
    }
    Ok(())
}

fn all_finite(values: &[f64]) -> bool {
    values.iter().all(|v| v.is_finite())
}

fn finite_geometry(kind: &ObjectKind) -> bool {
    match kind {
        ObjectKind::Cube {
            width,
            height,
            depth,
        } => all_finite(&[*width, *height, *depth]),
        ObjectKind::Sphere { radius, .. }
        | ObjectKind::Atom { radius, .. }
        | ObjectKind::Bond { radius, .. } => radius.is_finite(),
        ObjectKind::Cylinder { radius, height, .. }
        | ObjectKind::Cone { radius, height, .. }
        | ObjectKind::Pyramid { radius, height } => all_finite(&[*radius, *height]),
        ObjectKind::Torus { radius, tube, .. } => all_finite(&[*radius, *tube]),
        ObjectKind::Plane { width, height } => all_finite(&[*width, *height]),
        ObjectKind::Text3d {
            font_size,
            font_depth,
            ..
        } => all_finite(&[*font_size, *font_depth]),
        ObjectKind::CustomDrawing {
            drawing_points,
            depth,
        } => depth.is_finite() && drawing_points.iter().all(|p| all_finite(&[p.x, p.y])),
    }
}

/// Check one object's transform, geometry and material.
///
/// Infinite or NaN coordinates would serialize as `null` and make the saved
/// scene unreadable.
pub fn validate_object(obj: &Object3D) -> SceneResult<()> {
    for (field, value) in [("position", obj.position), ("rotation", obj.rotation)] {
        if value.iter().any(|v| !v.is_finite()) {
            return Err(SceneError::NonFiniteTransform {
                id: obj.id.clone(),
                field,
                value,
            });
        }
    }
    if !finite_geometry(&obj.kind) {
        return Err(SceneError::NonFiniteGeometry {
            id: obj.id.clone(),
            kind: obj.kind_name(),
        });
    }
    if obj.scale.iter().any(|s| !(s.is_finite() && *s > 0.0)) {
        return Err(SceneError::InvalidScale {
            id: obj.id.clone(),
            scale: obj.scale,
        });
    }
    check_material(&obj.id, &obj.material)
}

pub fn validate_settings(settings: &SceneSettings) -> SceneResult<()> {
    if !is_hex_color(&settings.background_color) {
        return Err(SceneError::InvalidSettings(format!(
            "background color '{}' is not #RRGGBB",
            settings.background_color
        )));
    }
    Ok(())
}

/// Validate `batch` for insertion next to `existing`.
///
/// Ids must be unique across both, and every bond must name atoms present
/// in either.
pub(crate) fn validate_batch(existing: &[Object3D], batch: &[Object3D]) -> SceneResult<()> {
    let mut kinds: HashMap<&str, &ObjectKind> =
        existing.iter().map(|o| (o.id.as_str(), &o.kind)).collect();
    let mut seen = HashSet::new();

    for obj in batch {
        if kinds.contains_key(obj.id.as_str()) || !seen.insert(obj.id.as_str()) {
            return Err(SceneError::DuplicateId(obj.id.clone()));
        }
        validate_object(obj)?;
    }
    kinds.extend(batch.iter().map(|o| (o.id.as_str(), &o.kind)));

    for obj in batch {
        if let Some((start, end)) = obj.kind.references() {
            for atom in [start, end] {
                if !matches!(kinds.get(atom.as_str()), Some(ObjectKind::Atom { .. })) {
                    return Err(SceneError::DanglingReference {
                        bond: obj.id.clone(),
                        atom: atom.clone(),
                    });
                }
            }
        }
    }
    Ok(())
}
