//! Planar primitives shared by the hull, defect and classification stages.

use crate::types::Point;

/// Euclidean distance between two points
pub fn distance(a: Point, b: Point) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}

/// z component of `(a - o) x (b - o)`. Positive when `o -> a -> b` turns
/// counter-clockwise in a y-up frame.
pub fn cross(o: Point, a: Point, b: Point) -> f64 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

/// Perpendicular distance from `p` to the infinite line through `a` and `b`.
/// Falls back to the point distance when `a == b`.
pub fn distance_to_line(p: Point, a: Point, b: Point) -> f64 {
    let len = distance(a, b);
    if len == 0.0 {
        return distance(p, a);
    }
    cross(a, b, p).abs() / len
}

/// Angle at `far` of the triangle (start, end, far), in degrees.
///
/// Uses `atan2(|u x v|, u . v)`, which equals the law-of-cosines angle but is
/// defined for every input: the result is always in `[0, 180]` and never NaN.
/// Degenerate triangles where `far` coincides with a corner give 0.
pub fn angle_at(start: Point, end: Point, far: Point) -> f64 {
    let (ux, uy) = (start.x - far.x, start.y - far.y);
    let (vx, vy) = (end.x - far.x, end.y - far.y);
    let cross = ux * vy - uy * vx;
    let dot = ux * vx + uy * vy;
    cross.abs().atan2(dot).to_degrees()
}

/// Law-of-cosines form of [`angle_at`] with the cosine clamped to `[-1, 1]`.
/// A zero-length side has no defined angle and reports 180 (a flat corner).
pub fn law_of_cosines_angle(start: Point, end: Point, far: Point) -> f64 {
    let a = distance(start, far);
    let b = distance(end, far);
    let c = distance(start, end);
    if a == 0.0 || b == 0.0 {
        return 180.0;
    }
    let cos = ((a * a + b * b - c * c) / (2.0 * a * b)).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}
