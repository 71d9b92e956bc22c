//! Turn-angle corner counting.

use std::f64::consts::PI;

use shared::Point2D;

use super::simplify;

/// Points closer than this (px) to the previous kept point are dropped
/// before measuring turn angles.
pub const MIN_POINT_DISTANCE: f64 = 5.0;

/// Turn angle (rad) above which a point counts as a polygon corner.
pub const CORNER_ANGLE: f64 = 2.5;

/// Turn angle (rad) used on the tail of an open stroke to find an arrowhead.
pub const ARROWHEAD_ANGLE: f64 = 1.5;

/// Turn angle (rad) used when counting star spikes.
pub const STAR_ANGLE: f64 = 1.8;

/// Count interior points where the path direction turns by more than
/// `angle_threshold` radians. The delta is folded into `[0, PI]`.
pub fn detect_corners(points: &[Point2D], angle_threshold: f64) -> usize {
    if points.len() < 3 {
        return 0;
    }

    let simplified = simplify(points, MIN_POINT_DISTANCE);
    if simplified.len() < 3 {
        return 0;
    }

    simplified
        .windows(3)
        .filter(|w| turn_angle(&w[0], &w[1], &w[2]) > angle_threshold)
        .count()
}

fn turn_angle(prev: &Point2D, curr: &Point2D, next: &Point2D) -> f64 {
    let incoming = (curr.y - prev.y).atan2(curr.x - prev.x);
    let outgoing = (next.y - curr.y).atan2(next.x - curr.x);

    let mut delta = (outgoing - incoming).abs();
    if delta > PI {
        delta = 2.0 * PI - delta;
    }
    delta
}
