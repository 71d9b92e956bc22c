//! Keyword tables for the command parser.

use shared::{Arrangement, CommandTarget};

/// Color names and their hex values.
pub const COLORS: [(&str, &str); 16] = [
    ("red", "#FF0000"),
    ("green", "#00FF00"),
    ("blue", "#0000FF"),
    ("yellow", "#FFFF00"),
    ("orange", "#FFA500"),
    ("purple", "#800080"),
    ("pink", "#FFC0CB"),
    ("white", "#FFFFFF"),
    ("black", "#000000"),
    ("gray", "#808080"),
    ("grey", "#808080"),
    ("cyan", "#00FFFF"),
    ("magenta", "#FF00FF"),
    ("brown", "#A52A2A"),
    ("gold", "#FFD700"),
    ("silver", "#C0C0C0"),
];

/// Size adjectives and the scale they stand for.
pub const SIZES: [(&str, f64); 7] = [
    ("tiny", 0.3),
    ("small", 0.5),
    ("medium", 1.0),
    ("normal", 1.0),
    ("large", 2.0),
    ("big", 2.0),
    ("huge", 3.0),
];

/// Primitive names matched directly (plurals accepted).
pub const SHAPES: [(&str, CommandTarget); 7] = [
    ("cube", CommandTarget::Cube),
    ("sphere", CommandTarget::Sphere),
    ("cylinder", CommandTarget::Cylinder),
    ("cone", CommandTarget::Cone),
    ("torus", CommandTarget::Torus),
    ("pyramid", CommandTarget::Pyramid),
    ("plane", CommandTarget::Plane),
];

/// Everyday words for primitives, tried when no direct name matches.
pub const SHAPE_SYNONYMS: [(&str, CommandTarget); 14] = [
    ("box", CommandTarget::Cube),
    ("boxes", CommandTarget::Cube),
    ("ball", CommandTarget::Sphere),
    ("balls", CommandTarget::Sphere),
    ("circle", CommandTarget::Sphere),
    ("tube", CommandTarget::Cylinder),
    ("pipe", CommandTarget::Cylinder),
    ("ring", CommandTarget::Torus),
    ("donut", CommandTarget::Torus),
    ("doughnut", CommandTarget::Torus),
    ("triangle", CommandTarget::Pyramid),
    ("text", CommandTarget::Text3d),
    ("word", CommandTarget::Text3d),
    ("words", CommandTarget::Text3d),
];

/// Named positions in scene units.
pub const POSITIONS: [(&str, [f64; 3]); 10] = [
    ("left", [-3.0, 0.0, 0.0]),
    ("right", [3.0, 0.0, 0.0]),
    ("above", [0.0, 3.0, 0.0]),
    ("up", [0.0, 3.0, 0.0]),
    ("below", [0.0, -3.0, 0.0]),
    ("down", [0.0, -3.0, 0.0]),
    ("front", [0.0, 0.0, 3.0]),
    ("back", [0.0, 0.0, -3.0]),
    ("center", [0.0, 0.0, 0.0]),
    ("centre", [0.0, 0.0, 0.0]),
];

pub const ARRANGEMENTS: [(&str, Arrangement); 4] = [
    ("row", Arrangement::Line),
    ("line", Arrangement::Line),
    ("circle", Arrangement::Circle),
    ("grid", Arrangement::Grid),
];

/// Verbs that start a create command.
pub const CREATE_VERBS: [&str; 5] = ["create", "make", "add", "build", "generate"];

/// Verbs that start a delete command (unless followed by "all").
pub const DELETE_VERBS: [&str; 2] = ["delete", "remove"];

/// Verbs that start a modify command.
pub const MODIFY_VERBS: [&str; 8] = [
    "change", "set", "modify", "paint", "color", "colour", "move", "resize",
];

pub const METALLIC_WORDS: [&str; 4] = ["metal", "metallic", "chrome", "steel"];
pub const TRANSPARENT_WORDS: [&str; 4] = ["transparent", "glass", "translucent", "see-through"];
pub const GLOWING_WORDS: [&str; 4] = ["glow", "glowing", "emissive", "neon"];
pub const WIREFRAME_WORDS: [&str; 2] = ["wireframe", "wire frame"];

pub fn color_hex(name: &str) -> Option<&'static str> {
    COLORS.iter().find(|(n, _)| *n == name).map(|(_, hex)| *hex)
}

pub fn size_value(name: &str) -> Option<f64> {
    SIZES.iter().find(|(n, _)| *n == name).map(|(_, v)| *v)
}

pub fn named_position(name: &str) -> Option<[f64; 3]> {
    POSITIONS.iter().find(|(n, _)| *n == name).map(|(_, p)| *p)
}

pub fn shape_target(word: &str) -> Option<CommandTarget> {
    SHAPES
        .iter()
        .find(|(n, _)| *n == word)
        .or_else(|| SHAPE_SYNONYMS.iter().find(|(n, _)| *n == word))
        .map(|(_, t)| *t)
}

pub fn arrangement(word: &str) -> Option<Arrangement> {
    ARRANGEMENTS.iter().find(|(n, _)| *n == word).map(|(_, a)| *a)
}

/// Regex alternation of `words`, longest first so overlapping names
/// prefer the longer match at the same position.
pub fn alternation<'a>(words: impl IntoIterator<Item = &'a str>) -> String {
    let mut words: Vec<&str> = words.into_iter().collect();
    words.sort_by_key(|w| std::cmp::Reverse(w.len()));
    words
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookups() {
        assert_eq!(color_hex("red"), Some("#FF0000"));
        assert_eq!(color_hex("grey"), color_hex("gray"));
        assert_eq!(size_value("huge"), Some(3.0));
        assert_eq!(named_position("left"), Some([-3.0, 0.0, 0.0]));
        assert_eq!(shape_target("donut"), Some(CommandTarget::Torus));
        assert_eq!(shape_target("cube"), Some(CommandTarget::Cube));
        assert_eq!(shape_target("blob"), None);
        assert_eq!(arrangement("row"), Some(Arrangement::Line));
    }

    #[test]
    fn test_alternation_longest_first() {
        assert_eq!(alternation(["up", "upper", "a"]), "upper|up|a");
        assert_eq!(alternation(["see-through"]), "see\\-through");
    }
}
