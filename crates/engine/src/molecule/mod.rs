//! Expansion of molecule templates into atom and bond objects.
//!
//! Molecules are never stored as their own kind: each instantiation
//! produces independent atom objects plus bond objects that point at the
//! freshly created atom ids.

mod catalog;
mod elements;

pub use catalog::{find_molecule, molecule_catalog, molecule_keywords};
pub use elements::{
    element_color, element_radius, DEFAULT_ATOM_COLOR, DEFAULT_ATOM_RADIUS, ELEMENTS,
};

use std::f64::consts::FRAC_PI_2;

use glam::DVec3;
use shared::{BondOrder, Material, MoleculeTemplate, ObjectId, ObjectKind, Object3D, NEUTRAL_GRAY};

/// Cylinder radius used to draw a bond of the given order.
pub fn bond_radius(order: BondOrder) -> f64 {
    match order {
        BondOrder::Single => 0.1,
        BondOrder::Double => 0.08,
        BondOrder::Triple => 0.06,
    }
}

/// Placement of a unit-height cylinder spanning two atom centers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BondGeometry {
    pub midpoint: [f64; 3],
    pub length: f64,
    /// Euler rotation `(0, rotY, rotZ)`.
    pub rotation: [f64; 3],
}

/// Orient a Y-aligned cylinder from `a` to `b`.
pub fn bond_geometry(a: [f64; 3], b: [f64; 3]) -> BondGeometry {
    let a = DVec3::from_array(a);
    let b = DVec3::from_array(b);
    let d = b - a;

    let rot_y = d.x.atan2(d.z);
    let rot_z = (d.x * d.x + d.z * d.z).sqrt().atan2(d.y) - FRAC_PI_2;

    BondGeometry {
        midpoint: ((a + b) / 2.0).to_array(),
        length: d.length(),
        rotation: [0.0, rot_y, rot_z],
    }
}

/// Atoms and bonds created from one template instantiation.
#[derive(Debug, Clone, PartialEq)]
pub struct MoleculeInstance {
    pub name: String,
    pub atoms: Vec<Object3D>,
    pub bonds: Vec<Object3D>,
}

impl MoleculeInstance {
    /// Atoms first, then bonds, so bond references resolve in insertion order.
    pub fn into_objects(self) -> Vec<Object3D> {
        let mut objects = self.atoms;
        objects.extend(self.bonds);
        objects
    }
}

/// Expand `template` at `base_position`, drawing ids from `next_id`.
///
/// Bonds reference atoms by the ids created in this call; bond indices
/// outside the atom list are skipped.
pub fn instantiate_molecule(
    template: &MoleculeTemplate,
    base_position: [f64; 3],
    mut next_id: impl FnMut() -> ObjectId,
) -> MoleculeInstance {
    let base = DVec3::from_array(base_position);

    let atoms: Vec<Object3D> = template
        .atoms
        .iter()
        .map(|atom| {
            let mut obj = Object3D::new(
                next_id(),
                atom.element.clone(),
                ObjectKind::Atom {
                    element: atom.element.clone(),
                    radius: element_radius(&atom.element),
                },
            );
            obj.position = (base + DVec3::from_array(atom.position)).to_array();
            obj.material = Material::with_color(element_color(&atom.element));
            obj
        })
        .collect();

    let mut bonds = Vec::with_capacity(template.bonds.len());
    for bond in &template.bonds {
        let (Some(start), Some(end)) = (atoms.get(bond.atom_index_a), atoms.get(bond.atom_index_b))
        else {
            tracing::warn!(
                molecule = %template.name,
                a = bond.atom_index_a,
                b = bond.atom_index_b,
                "Skipping bond with out-of-range atom index"
            );
            continue;
        };

        let pos_a = template.atoms[bond.atom_index_a].position;
        let pos_b = template.atoms[bond.atom_index_b].position;
        let geometry = bond_geometry(pos_a, pos_b);

        let radius = bond_radius(bond.order);
        let mut obj = Object3D::new(
            next_id(),
            format!("{}-{} bond", start.name, end.name),
            ObjectKind::Bond {
                bond_order: bond.order,
                start_atom_id: start.id.clone(),
                end_atom_id: end.id.clone(),
                radius,
            },
        );
        obj.position = (base + DVec3::from_array(geometry.midpoint)).to_array();
        obj.rotation = geometry.rotation;
        obj.scale = [1.0, geometry.length, 1.0];
        obj.material = Material::with_color(NEUTRAL_GRAY);
        bonds.push(obj);
    }

    tracing::debug!(
        molecule = %template.name,
        atoms = atoms.len(),
        bonds = bonds.len(),
        "Instantiated molecule"
    );

    MoleculeInstance {
        name: template.name.clone(),
        atoms,
        bonds,
    }
}
