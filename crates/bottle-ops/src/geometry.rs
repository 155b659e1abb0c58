//! 2D checks on the sketch plane: collinearity, arc sampling, segment
//! intersection and enclosed area.

use std::f64::consts::TAU;

use bottle_types::{ProfileOutline, ProfilePoint, ProfileSegment};

/// Points per arc when an outline is flattened to a polyline.
pub const ARC_SAMPLES: usize = 32;

/// Z component of `(a - o) x (b - o)`. Positive when `o → a → b` turns left.
pub fn cross(o: ProfilePoint, a: ProfilePoint, b: ProfilePoint) -> f64 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

/// Whether three points fail to define a circle within `tol`.
pub fn is_collinear(a: ProfilePoint, b: ProfilePoint, c: ProfilePoint, tol: f64) -> bool {
    ProfilePoint::circumcenter(a, b, c, tol).is_none()
}

/// Unit normal of the chord `a → c`, rotated counter-clockwise.
/// `None` for a zero-length chord.
pub fn chord_normal(a: ProfilePoint, c: ProfilePoint) -> Option<(f64, f64)> {
    let len = a.distance_to(c);
    if !(len > f64::EPSILON) {
        return None;
    }
    Some((-(c.y - a.y) / len, (c.x - a.x) / len))
}

/// Flatten the arc through `start`, `interior`, `end` into `samples` chords.
///
/// The sweep direction is the one that passes through `interior`.
/// Returns `None` when the points are collinear.
pub fn sample_arc(
    start: ProfilePoint,
    interior: ProfilePoint,
    end: ProfilePoint,
    samples: usize,
    tol: f64,
) -> Option<Vec<ProfilePoint>> {
    let center = ProfilePoint::circumcenter(start, interior, end, tol)?;
    let radius = center.distance_to(start);
    let angle = |p: ProfilePoint| (p.y - center.y).atan2(p.x - center.x);
    let ccw = |from: f64, to: f64| (to - from).rem_euclid(TAU);

    let a0 = angle(start);
    let to_end = ccw(a0, angle(end));
    let to_mid = ccw(a0, angle(interior));
    let sweep = if to_mid < to_end { to_end } else { to_end - TAU };

    let samples = samples.max(2);
    let mut points = Vec::with_capacity(samples + 1);
    points.push(start);
    for i in 1..samples {
        let t = a0 + sweep * (i as f64) / (samples as f64);
        points.push(ProfilePoint::new(
            center.x + radius * t.cos(),
            center.y + radius * t.sin(),
        ));
    }
    points.push(end);
    Some(points)
}

/// Points of one segment, both endpoints included.
pub fn segment_points(
    segment: &ProfileSegment,
    samples: usize,
    tol: f64,
) -> Option<Vec<ProfilePoint>> {
    match *segment {
        ProfileSegment::Line { start, end, .. } => Some(vec![start, end]),
        ProfileSegment::Arc {
            start,
            interior,
            end,
            ..
        } => sample_arc(start, interior, end, samples, tol),
    }
}

/// The outline as a closed ring of points. The closing point is not repeated.
pub fn outline_ring(outline: &ProfileOutline, samples: usize, tol: f64) -> Option<Vec<ProfilePoint>> {
    let mut ring = Vec::new();
    for segment in &outline.segments {
        let points = segment_points(segment, samples, tol)?;
        // Each segment's start is the previous segment's end.
        ring.extend_from_slice(&points[..points.len() - 1]);
    }
    Some(ring)
}

fn sign(v: f64, tol: f64) -> i8 {
    if v > tol {
        1
    } else if v < -tol {
        -1
    } else {
        0
    }
}

fn within_bounds(a: ProfilePoint, b: ProfilePoint, p: ProfilePoint, tol: f64) -> bool {
    p.x >= a.x.min(b.x) - tol
        && p.x <= a.x.max(b.x) + tol
        && p.y >= a.y.min(b.y) - tol
        && p.y <= a.y.max(b.y) + tol
}

/// Whether segments `p1p2` and `q1q2` cross or touch.
pub fn segments_intersect(
    p1: ProfilePoint,
    p2: ProfilePoint,
    q1: ProfilePoint,
    q2: ProfilePoint,
    tol: f64,
) -> bool {
    let d1 = sign(cross(q1, q2, p1), tol);
    let d2 = sign(cross(q1, q2, p2), tol);
    let d3 = sign(cross(p1, p2, q1), tol);
    let d4 = sign(cross(p1, p2, q2), tol);

    if d1 * d2 < 0 && d3 * d4 < 0 {
        return true;
    }

    (d1 == 0 && within_bounds(q1, q2, p1, tol))
        || (d2 == 0 && within_bounds(q1, q2, p2, tol))
        || (d3 == 0 && within_bounds(p1, p2, q1, tol))
        || (d4 == 0 && within_bounds(p1, p2, q2, tol))
}

/// First pair of non-adjacent ring edges that intersect, by edge index.
/// Edge `i` runs from `ring[i]` to `ring[i + 1]`, wrapping at the end.
pub fn first_self_intersection(ring: &[ProfilePoint], tol: f64) -> Option<(usize, usize)> {
    let n = ring.len();
    if n < 4 {
        return None;
    }
    for i in 0..n {
        for j in (i + 2)..n {
            if i == 0 && j == n - 1 {
                continue;
            }
            if segments_intersect(ring[i], ring[(i + 1) % n], ring[j], ring[(j + 1) % n], tol) {
                return Some((i, j));
            }
        }
    }
    None
}

/// Signed area of a closed ring (shoelace). Positive for counter-clockwise rings.
pub fn shoelace_area(ring: &[ProfilePoint]) -> f64 {
    let n = ring.len();
    let twice: f64 = (0..n)
        .map(|i| {
            let a = ring[i];
            let b = ring[(i + 1) % n];
            a.x * b.y - b.x * a.y
        })
        .sum();
    twice / 2.0
}
