//! Built-in molecule templates.
//!
//! Coordinates are in scene units relative to the molecule's origin.

use std::sync::OnceLock;

use shared::{BondOrder, MoleculeTemplate, TemplateAtom, TemplateBond};

use crate::error::MoleculeError;

static CATALOG: OnceLock<Vec<MoleculeTemplate>> = OnceLock::new();

/// Formula aliases accepted in addition to names and formulas.
const ALIASES: [(&str, &str); 4] = [
    ("h2o", "Water"),
    ("ch4", "Methane"),
    ("c2h5oh", "Ethanol"),
    ("c6h6", "Benzene"),
];

fn atom(element: &str, x: f64, y: f64, z: f64) -> TemplateAtom {
    TemplateAtom {
        element: element.to_string(),
        position: [x, y, z],
    }
}

fn bond(a: usize, b: usize, order: BondOrder) -> TemplateBond {
    TemplateBond {
        atom_index_a: a,
        atom_index_b: b,
        order,
    }
}

fn build_catalog() -> Vec<MoleculeTemplate> {
    use BondOrder::{Double, Single};

    let water = MoleculeTemplate {
        name: "Water".to_string(),
        formula: "H2O".to_string(),
        atoms: vec![
            atom("O", 0.0, 0.0, 0.0),
            atom("H", 0.76, 0.59, 0.0),
            atom("H", -0.76, 0.59, 0.0),
        ],
        bonds: vec![bond(0, 1, Single), bond(0, 2, Single)],
    };

    let methane = MoleculeTemplate {
        name: "Methane".to_string(),
        formula: "CH4".to_string(),
        atoms: vec![
            atom("C", 0.0, 0.0, 0.0),
            atom("H", 0.63, 0.63, 0.63),
            atom("H", -0.63, -0.63, 0.63),
            atom("H", -0.63, 0.63, -0.63),
            atom("H", 0.63, -0.63, -0.63),
        ],
        bonds: (1..=4).map(|h| bond(0, h, Single)).collect(),
    };

    let ethanol = MoleculeTemplate {
        name: "Ethanol".to_string(),
        formula: "C2H5OH".to_string(),
        atoms: vec![
            atom("C", 0.0, 0.0, 0.0),
            atom("C", 1.52, 0.0, 0.0),
            atom("O", 2.0, 1.35, 0.0),
            atom("H", 2.96, 1.3, 0.0),
            atom("H", -0.38, 1.03, 0.0),
            atom("H", -0.38, -0.51, 0.89),
            atom("H", -0.38, -0.51, -0.89),
            atom("H", 1.9, -0.51, 0.89),
            atom("H", 1.9, -0.51, -0.89),
        ],
        bonds: vec![
            bond(0, 1, Single),
            bond(1, 2, Single),
            bond(2, 3, Single),
            bond(0, 4, Single),
            bond(0, 5, Single),
            bond(0, 6, Single),
            bond(1, 7, Single),
            bond(1, 8, Single),
        ],
    };

    let benzene = MoleculeTemplate {
        name: "Benzene".to_string(),
        formula: "C6H6".to_string(),
        atoms: vec![
            atom("C", 1.4, 0.0, 0.0),
            atom("C", 0.7, 1.2124, 0.0),
            atom("C", -0.7, 1.2124, 0.0),
            atom("C", -1.4, 0.0, 0.0),
            atom("C", -0.7, -1.2124, 0.0),
            atom("C", 0.7, -1.2124, 0.0),
            atom("H", 2.48, 0.0, 0.0),
            atom("H", 1.24, 2.1477, 0.0),
            atom("H", -1.24, 2.1477, 0.0),
            atom("H", -2.48, 0.0, 0.0),
            atom("H", -1.24, -2.1477, 0.0),
            atom("H", 1.24, -2.1477, 0.0),
        ],
        bonds: vec![
            bond(0, 1, Double),
            bond(1, 2, Single),
            bond(2, 3, Double),
            bond(3, 4, Single),
            bond(4, 5, Double),
            bond(5, 0, Single),
            bond(0, 6, Single),
            bond(1, 7, Single),
            bond(2, 8, Single),
            bond(3, 9, Single),
            bond(4, 10, Single),
            bond(5, 11, Single),
        ],
    };

    vec![water, methane, ethanol, benzene]
}

/// All built-in templates.
pub fn molecule_catalog() -> &'static [MoleculeTemplate] {
    CATALOG.get_or_init(build_catalog)
}

/// Find a template by name, formula or alias (case-insensitive).
pub fn find_molecule(query: &str) -> Result<&'static MoleculeTemplate, MoleculeError> {
    let key = query.trim().to_lowercase();
    let name = ALIASES
        .iter()
        .find(|(alias, _)| *alias == key)
        .map(|(_, name)| name.to_lowercase())
        .unwrap_or(key);

    molecule_catalog()
        .iter()
        .find(|m| m.name.to_lowercase() == name || m.formula.to_lowercase() == name)
        .ok_or_else(|| MoleculeError::NotFound(query.trim().to_string()))
}

/// Lowercase keywords that identify a catalog molecule in free text.
pub fn molecule_keywords() -> Vec<(String, &'static str)> {
    let mut keywords: Vec<(String, &'static str)> = molecule_catalog()
        .iter()
        .map(|m| (m.name.to_lowercase(), m.name.as_str()))
        .collect();
    for (alias, name) in ALIASES {
        keywords.push((alias.to_string(), name));
    }
    keywords
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_contents() {
        let names: Vec<&str> = molecule_catalog().iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["Water", "Methane", "Ethanol", "Benzene"]);
    }

    #[test]
    fn test_templates_are_consistent() {
        for m in molecule_catalog() {
            assert!(m.is_consistent(), "{} has a bond index out of range", m.name);
        }
    }

    #[test]
    fn test_atom_and_bond_counts() {
        let counts: Vec<(usize, usize)> = molecule_catalog()
            .iter()
            .map(|m| (m.atoms.len(), m.bonds.len()))
            .collect();
        assert_eq!(counts, [(3, 2), (5, 4), (9, 8), (12, 12)]);
    }

    #[test]
    fn test_find_by_name_formula_alias() {
        assert_eq!(find_molecule("water").unwrap().formula, "H2O");
        assert_eq!(find_molecule("BENZENE").unwrap().name, "Benzene");
        assert_eq!(find_molecule("CH4").unwrap().name, "Methane");
        assert_eq!(find_molecule(" c2h5oh ").unwrap().name, "Ethanol");
    }

    #[test]
    fn test_find_missing() {
        let err = find_molecule("caffeine").unwrap_err();
        assert_eq!(err, MoleculeError::NotFound("caffeine".to_string()));
        assert_eq!(err.to_string(), "Molecule not found: caffeine");
    }
}
