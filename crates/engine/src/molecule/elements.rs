//! Display colors and radii for the supported elements.

/// Radius used for elements missing from the table.
pub const DEFAULT_ATOM_RADIUS: f64 = 0.4;

/// Color used for elements missing from the table.
pub const DEFAULT_ATOM_COLOR: &str = shared::NEUTRAL_GRAY;

/// `(symbol, color, radius)` for every element with a known appearance.
pub const ELEMENTS: [(&str, &str, f64); 18] = [
    ("H", "#FFFFFF", 0.25),
    ("C", "#909090", 0.4),
    ("N", "#3050F8", 0.38),
    ("O", "#FF0D0D", 0.36),
    ("F", "#90E050", 0.34),
    ("Cl", "#1FF01F", 0.5),
    ("Br", "#A62929", 0.55),
    ("I", "#940094", 0.6),
    ("P", "#FF8000", 0.5),
    ("S", "#FFFF30", 0.5),
    ("B", "#FFB5B5", 0.42),
    ("Li", "#CC80FF", 0.6),
    ("Na", "#AB5CF2", 0.7),
    ("K", "#8F40D4", 0.8),
    ("Mg", "#8AFF00", 0.65),
    ("Ca", "#3DFF00", 0.75),
    ("Fe", "#E06633", 0.55),
    ("Zn", "#7D80B0", 0.55),
];

fn lookup(symbol: &str) -> Option<&'static (&'static str, &'static str, f64)> {
    ELEMENTS.iter().find(|(s, _, _)| *s == symbol)
}

/// Hex color for an element symbol (case-sensitive, e.g. `Cl`).
pub fn element_color(symbol: &str) -> &'static str {
    lookup(symbol).map(|e| e.1).unwrap_or(DEFAULT_ATOM_COLOR)
}

/// Display radius for an element symbol.
pub fn element_radius(symbol: &str) -> f64 {
    lookup(symbol).map(|e| e.2).unwrap_or(DEFAULT_ATOM_RADIUS)
}
