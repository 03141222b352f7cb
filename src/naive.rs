use geo::{Coordinate, Line};
use itertools::Itertools;

/// Counts crossings by testing every pair of segments.
///
/// This is the O(n^2) reference for validating the sweep. It uses the
/// counter-clockwise orientation test, which needs no division and is
/// robust against the parametric solve's rounding.
pub fn count_intersections_naive(lines: &[Line<f64>]) -> usize {
    lines
        .iter()
        .tuple_combinations()
        .filter(|(s1, s2)| !share_end_point(s1, s2) && properly_cross(s1, s2))
        .count()
}

/// `true` if the turn `u -> v -> w` is counter-clockwise.
///
/// The comparison is proportional to the signed area of the triangle
/// `(u, v, w)`.
fn ccw(u: Coordinate<f64>, v: Coordinate<f64>, w: Coordinate<f64>) -> bool {
    (w.y - u.y) * (v.x - u.x) > (v.y - u.y) * (w.x - u.x)
}

/// Segments sharing a vertex merely touch there; that is never a
/// proper crossing.
fn share_end_point(s1: &Line<f64>, s2: &Line<f64>) -> bool {
    s1.start == s2.start || s1.start == s2.end || s1.end == s2.start || s1.end == s2.end
}

/// Proper crossing test: the end points of each segment must lie on
/// opposite sides of the line through the other.
fn properly_cross(s1: &Line<f64>, s2: &Line<f64>) -> bool {
    ccw(s1.start, s2.start, s2.end) != ccw(s1.end, s2.start, s2.end)
        && ccw(s1.start, s1.end, s2.start) != ccw(s1.start, s1.end, s2.end)
}
