//! Numeric primitives over 2D point paths.
//!
//! All functions are total: empty or short inputs produce zero-valued
//! results instead of errors.

mod corners;

pub use corners::{detect_corners, ARROWHEAD_ANGLE, CORNER_ANGLE, MIN_POINT_DISTANCE, STAR_ANGLE};

use shared::{BoundingBox, Point2D};

/// Euclidean distance between two points.
pub fn distance(a: &Point2D, b: &Point2D) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    (dx * dx + dy * dy).sqrt()
}

/// Axis-aligned bounding box of the points. Empty input gives an all-zero box.
pub fn bounding_box(points: &[Point2D]) -> BoundingBox {
    let Some(first) = points.first() else {
        return BoundingBox::default();
    };

    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
    for p in &points[1..] {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }

    BoundingBox {
        x: min_x,
        y: min_y,
        width: max_x - min_x,
        height: max_y - min_y,
    }
}

/// Path length including the closing segment from the last point back to
/// the first. Open paths are measured the same way.
pub fn perimeter(points: &[Point2D]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }

    let open: f64 = points.windows(2).map(|w| distance(&w[0], &w[1])).sum();
    open + distance(&points[points.len() - 1], &points[0])
}

/// Enclosed area by the shoelace formula, wrapping last to first.
pub fn area(points: &[Point2D]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }

    let n = points.len();
    let twice: f64 = (0..n)
        .map(|i| {
            let a = &points[i];
            let b = &points[(i + 1) % n];
            a.x * b.y - b.x * a.y
        })
        .sum();
    twice.abs() / 2.0
}

/// Greedy decimation: keep a point only if it is at least `min_distance`
/// away from the last kept point.
pub fn simplify(points: &[Point2D], min_distance: f64) -> Vec<Point2D> {
    if points.len() <= 2 {
        return points.to_vec();
    }

    let mut kept = vec![points[0]];
    for p in &points[1..] {
        if let Some(last) = kept.last() {
            if distance(last, p) >= min_distance {
                kept.push(*p);
            }
        }
    }
    kept
}

/// Average perpendicular distance of the points from the chord `a`-`b`.
pub fn mean_chord_deviation(points: &[Point2D], a: &Point2D, b: &Point2D) -> f64 {
    let chord = distance(a, b);
    if points.is_empty() || chord == 0.0 {
        return 0.0;
    }

    let total: f64 = points
        .iter()
        .map(|p| ((b.x - a.x) * (a.y - p.y) - (a.x - p.x) * (b.y - a.y)).abs() / chord)
        .sum();
    total / points.len() as f64
}
