//! Shape recognition and size estimation for finished strokes.
//!
//! The thresholds are empirically tuned for pointer input in pixel space.

use std::f64::consts::PI;

use shared::{Point2D, RecognizedShape};

use crate::geometry::{
    area, bounding_box, detect_corners, distance, mean_chord_deviation, perimeter,
    ARROWHEAD_ANGLE, CORNER_ANGLE, STAR_ANGLE,
};

/// A stroke whose endpoints are closer than this (px) is a closed outline.
pub const CLOSED_PATH_DISTANCE: f64 = 20.0;

/// Maximum mean deviation from the chord, relative to chord length, for a line.
pub const LINE_DEVIATION_RATIO: f64 = 0.15;

/// Shortest chord (px) that can be a line.
pub const MIN_LINE_LENGTH: f64 = 10.0;

/// Number of trailing points inspected for an arrowhead.
const ARROWHEAD_TAIL: usize = 5;

const CIRCLE_CIRCULARITY: f64 = 0.75;
const LOOSE_CIRCLE_CIRCULARITY: f64 = 0.6;

/// Classify a completed stroke. Never fails: degenerate input is `Unknown`.
pub fn recognize_shape(points: &[Point2D]) -> RecognizedShape {
    if points.len() < 3 {
        return RecognizedShape::Unknown;
    }

    let bbox = bounding_box(points);
    let aspect_ratio = bbox.aspect_ratio();
    let first = &points[0];
    let last = &points[points.len() - 1];
    let closed = distance(first, last) < CLOSED_PATH_DISTANCE;

    let shape = if closed {
        classify_closed(points, aspect_ratio)
    } else {
        classify_open(points, aspect_ratio)
    };

    tracing::debug!(
        points = points.len(),
        closed,
        aspect_ratio,
        shape = shape.as_str(),
        "Recognized stroke"
    );
    shape
}

fn classify_open(points: &[Point2D], aspect_ratio: f64) -> RecognizedShape {
    if is_straight_line(points, aspect_ratio) {
        RecognizedShape::Line
    } else if has_arrowhead(points) {
        RecognizedShape::Arrow
    } else {
        RecognizedShape::Unknown
    }
}

fn classify_closed(points: &[Point2D], aspect_ratio: f64) -> RecognizedShape {
    let circularity = circularity(points);

    if circularity > CIRCLE_CIRCULARITY && (0.7..=1.3).contains(&aspect_ratio) {
        return RecognizedShape::Circle;
    }
    if is_star_shape(points) {
        return RecognizedShape::Star;
    }

    match detect_corners(points, CORNER_ANGLE) {
        3 => RecognizedShape::Triangle,
        4 if (0.8..=1.2).contains(&aspect_ratio) => RecognizedShape::Square,
        4 => RecognizedShape::Rectangle,
        5 => RecognizedShape::Pentagon,
        6 => RecognizedShape::Hexagon,
        _ if circularity > LOOSE_CIRCLE_CIRCULARITY => RecognizedShape::Circle,
        _ => RecognizedShape::Unknown,
    }
}

/// `4π·area / perimeter²`: 1.0 for a circle, about 0.785 for a square.
pub fn circularity(points: &[Point2D]) -> f64 {
    let p = perimeter(points);
    if p == 0.0 {
        return 0.0;
    }
    4.0 * PI * area(points) / (p * p)
}

fn is_straight_line(points: &[Point2D], aspect_ratio: f64) -> bool {
    if !(aspect_ratio > 5.0 || aspect_ratio < 0.2) {
        return false;
    }

    let first = &points[0];
    let last = &points[points.len() - 1];
    let chord = distance(first, last);
    if chord < MIN_LINE_LENGTH {
        return false;
    }

    mean_chord_deviation(points, first, last) < chord * LINE_DEVIATION_RATIO
}

fn has_arrowhead(points: &[Point2D]) -> bool {
    let tail = &points[points.len().saturating_sub(ARROWHEAD_TAIL)..];
    detect_corners(tail, ARROWHEAD_ANGLE) >= 2
}

fn is_star_shape(points: &[Point2D]) -> bool {
    (8..=12).contains(&detect_corners(points, STAR_ANGLE))
}

/// Map a stroke's bounding box to a discrete scale multiplier.
///
/// Only ever returns one of `0.5`, `1.0`, `1.5`, `2.0`.
pub fn estimate_size(points: &[Point2D]) -> f64 {
    let bbox = bounding_box(points);
    size_bucket((bbox.width + bbox.height) / 2.0)
}

/// Bucket an average bounding-box dimension (px).
pub fn size_bucket(avg_dimension: f64) -> f64 {
    if avg_dimension < 50.0 {
        0.5
    } else if avg_dimension < 150.0 {
        1.0
    } else if avg_dimension < 250.0 {
        1.5
    } else {
        2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn test_fewer_than_three_points_is_unknown() {
        assert_eq!(recognize_shape(&[]), RecognizedShape::Unknown);
        let two = [Point2D::new(0.0, 0.0), Point2D::new(100.0, 0.0)];
        assert_eq!(recognize_shape(&two), RecognizedShape::Unknown);
    }

    #[test]
    fn test_circle_polygon() {
        let circle = fixtures::circle_path(100.0, 32);
        assert!(circularity(&circle) > 0.99);
        assert_eq!(recognize_shape(&circle), RecognizedShape::Circle);
    }

    #[test]
    fn test_horizontal_line() {
        assert_eq!(recognize_shape(&fixtures::line_path()), RecognizedShape::Line);
    }

    #[test]
    fn test_vertical_line() {
        let vertical: Vec<Point2D> = fixtures::line_path()
            .into_iter()
            .map(|p| Point2D::new(p.y, p.x))
            .collect();
        assert_eq!(recognize_shape(&vertical), RecognizedShape::Line);
    }

    #[test]
    fn test_tiny_stroke_is_unknown() {
        let short = [Point2D::new(0.0, 0.0), Point2D::new(4.0, 0.1), Point2D::new(8.0, 0.0)];
        assert_eq!(recognize_shape(&short), RecognizedShape::Unknown);
    }

    #[test]
    fn test_arrow() {
        assert_eq!(recognize_shape(&fixtures::arrow_path()), RecognizedShape::Arrow);
    }

    #[test]
    fn test_open_curve_is_unknown() {
        // Quarter arc: open, not straight, no arrowhead
        let arc: Vec<Point2D> = (0..=20)
            .map(|i| {
                let t = i as f64 / 20.0 * PI / 2.0;
                Point2D::new(200.0 * t.cos(), 200.0 * t.sin())
            })
            .collect();
        assert_eq!(recognize_shape(&arc), RecognizedShape::Unknown);
    }

    #[test]
    fn test_regular_polygons_are_round_enough_for_circle() {
        // Regular hexagon circularity is ~0.907, so the circle rule wins
        let hexagon = fixtures::regular_polygon(100.0, 6);
        assert!(circularity(&hexagon) > CIRCLE_CIRCULARITY);
        assert_eq!(recognize_shape(&hexagon), RecognizedShape::Circle);
    }

    #[test]
    fn test_hairpin_triangle() {
        assert_eq!(recognize_shape(&fixtures::hairpin_triangle()), RecognizedShape::Triangle);
    }

    #[test]
    fn test_spiky_outlines_by_corner_count() {
        // Notch turns stay under CORNER_ANGLE, so only the tips count
        let cases = [
            (4, RecognizedShape::Triangle),
            (5, RecognizedShape::Square),
            (7, RecognizedShape::Hexagon),
        ];
        for (tips, expected) in cases {
            let outline = fixtures::spiky_outline(tips, 150.0, 12.0, 1.0);
            assert!(circularity(&outline) < LOOSE_CIRCLE_CIRCULARITY);
            assert_eq!(recognize_shape(&outline), expected, "{tips} tips");
        }
    }

    #[test]
    fn test_star_checked_before_corner_count() {
        // Five polygon corners, but eleven turns above STAR_ANGLE
        let outline = fixtures::spiky_outline(6, 150.0, 12.0, 1.0);
        assert_eq!(detect_corners(&outline, CORNER_ANGLE), 5);
        assert!(is_star_shape(&outline));
        assert_eq!(recognize_shape(&outline), RecognizedShape::Star);
    }

    #[test]
    fn test_four_corners_split_on_aspect_ratio() {
        let square = fixtures::spiky_outline(5, 150.0, 12.0, 1.0);
        let wide = fixtures::spiky_outline(5, 150.0, 12.0, 1.5);
        assert_eq!(detect_corners(&wide, CORNER_ANGLE), 4);
        assert!(bounding_box(&wide).aspect_ratio() > 1.2);
        assert_eq!(recognize_shape(&square), RecognizedShape::Square);
        assert_eq!(recognize_shape(&wide), RecognizedShape::Rectangle);
    }

    #[test]
    fn test_five_hairpins_is_pentagon() {
        let zigzag = fixtures::zigzag_outline(5);
        assert_eq!(detect_corners(&zigzag, STAR_ANGLE), 5);
        assert_eq!(recognize_shape(&zigzag), RecognizedShape::Pentagon);
        assert_eq!(recognize_shape(&fixtures::zigzag_outline(3)), RecognizedShape::Triangle);
    }

    #[test]
    fn test_elongated_ellipse_falls_back_to_circle() {
        // Too wide for the strict rule, no corners, still fairly round
        let ellipse = fixtures::ellipse_path(300.0, 100.0);
        let c = circularity(&ellipse);
        assert!(c > LOOSE_CIRCLE_CIRCULARITY && c <= CIRCLE_CIRCULARITY);
        assert!(bounding_box(&ellipse).aspect_ratio() > 1.3);
        assert_eq!(detect_corners(&ellipse, CORNER_ANGLE), 0);
        assert_eq!(recognize_shape(&ellipse), RecognizedShape::Circle);
    }

    #[test]
    fn test_flat_closed_outline_is_unknown() {
        // Long thin closed rectangle: low circularity, no sharp corners
        let sliver = fixtures::rectangle_path(400.0, 20.0);
        assert!(circularity(&sliver) < LOOSE_CIRCLE_CIRCULARITY);
        assert_eq!(recognize_shape(&sliver), RecognizedShape::Unknown);
    }

    #[test]
    fn test_size_buckets() {
        assert_eq!(size_bucket(0.0), 0.5);
        assert_eq!(size_bucket(49.9), 0.5);
        assert_eq!(size_bucket(50.0), 1.0);
        assert_eq!(size_bucket(149.9), 1.0);
        assert_eq!(size_bucket(150.0), 1.5);
        assert_eq!(size_bucket(250.0), 2.0);
        assert_eq!(size_bucket(10_000.0), 2.0);
    }

    #[test]
    fn test_size_is_monotonic_and_discrete() {
        let mut previous = 0.0;
        for step in 0..400 {
            let size = size_bucket(step as f64);
            assert!(size >= previous);
            assert!([0.5, 1.0, 1.5, 2.0].contains(&size));
            previous = size;
        }
    }

    #[test]
    fn test_estimate_size_from_points() {
        assert_eq!(estimate_size(&fixtures::circle_path(100.0, 32)), 1.5);
        assert_eq!(estimate_size(&[]), 0.5);
    }
}
