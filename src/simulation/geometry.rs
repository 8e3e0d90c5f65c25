//! Segment and polygon intersection math
//!
//! Degenerate input (zero-length or parallel segments, polygons with fewer
//! than two points) never fails: it simply reports no intersection.

use super::types::{Intersection, Point, Segment, PARALLEL_EPSILON};

/// Linear interpolation between `a` and `b`
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Intersect two segments.
///
/// Returns the crossing point and its parametric offset along `a`, or `None`
/// when the lines are parallel or the crossing lies outside either segment.
pub fn intersect(a: &Segment, b: &Segment) -> Option<Intersection> {
    let (p1, p2) = (a.start, a.end);
    let (q1, q2) = (b.start, b.end);

    let t_top = (q2.x - q1.x) * (p1.y - q1.y) - (q2.y - q1.y) * (p1.x - q1.x);
    let u_top = (q1.y - p1.y) * (p1.x - p2.x) - (q1.x - p1.x) * (p1.y - p2.y);
    let bottom = (q2.y - q1.y) * (p2.x - p1.x) - (q2.x - q1.x) * (p2.y - p1.y);

    if bottom.abs() <= PARALLEL_EPSILON {
        return None;
    }

    let t = t_top / bottom;
    let u = u_top / bottom;
    if !(0.0..=1.0).contains(&t) || !(0.0..=1.0).contains(&u) {
        return None;
    }

    Some(Intersection {
        point: Point::new(lerp(p1.x, p2.x, t), lerp(p1.y, p2.y, t)),
        offset: t,
    })
}

/// Iterate the edges of a closed polygon, including the closing edge.
///
/// A two-point polygon yields the segment in both directions; fewer points
/// yield nothing.
pub fn edges(points: &[Point]) -> impl Iterator<Item = Segment> + '_ {
    let n = if points.len() < 2 { 0 } else { points.len() };
    (0..n).map(move |i| Segment::new(points[i], points[(i + 1) % n]))
}

/// True iff any edge of `a` crosses any edge of `b`
pub fn polygons_intersect(a: &[Point], b: &[Point]) -> bool {
    edges(a).any(|edge_a| edges(b).any(|edge_b| intersect(&edge_a, &edge_b).is_some()))
}
