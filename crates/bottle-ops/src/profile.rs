use bottle_types::{
    BuildMode, DimensionSet, DirectArcOffsets, ProfileOutline, ProfilePoint, ProfileSegment,
    SegmentKind, NEAR_ZERO,
};
use tracing::{debug, instrument};

use crate::geometry::{self, ARC_SAMPLES};
use crate::types::OpError;

/// Sagitta of the seed arcs in Parametric mode. The host's radial dimensions
/// then pull the arcs to their real radii.
pub const DEFAULT_ARC_BIAS: f64 = 0.1;

/// Side of its chord a seed arc bends toward, seen along the walk direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bend {
    /// Toward the axis: the shoulder curves in.
    Right,
    /// Away from the axis: the belly curves out.
    Left,
}

/// Computes the closed half cross-section of the bottle.
///
/// The outline is walked from the base origin up the revolve axis, across
/// the neck, down the body arcs and back along the base:
///
/// ```text
///   (0,h) ── top ── (tw,h)
///     │               │ neck
///     │            (tw,h-th) ── (tw+b,h-th)   shoulder
///     │                              ╲  upper arc
///     │                               )
///     │                              ╱  lower arc
///   (0,0) ────── bottom ───────── (bw,0)
/// ```
#[derive(Debug, Clone)]
pub struct ProfileBuilder {
    dims: DimensionSet,
    offsets: DirectArcOffsets,
    arc_bias: f64,
    tolerance: f64,
}

impl ProfileBuilder {
    pub fn new(dims: &DimensionSet) -> Self {
        Self {
            dims: *dims,
            offsets: DirectArcOffsets::default(),
            arc_bias: DEFAULT_ARC_BIAS,
            tolerance: NEAR_ZERO,
        }
    }

    pub fn with_direct_offsets(mut self, offsets: DirectArcOffsets) -> Self {
        self.offsets = offsets;
        self
    }

    pub fn with_arc_bias(mut self, bias: f64) -> Self {
        self.arc_bias = bias;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Build and validate the outline for `mode`.
    #[instrument(skip(self), fields(height = self.dims.height))]
    pub fn build(&self, mode: BuildMode) -> Result<ProfileOutline, OpError> {
        let d = &self.dims;
        let tol = self.tolerance;

        let origin = ProfilePoint::ORIGIN;
        let top = ProfilePoint::new(0.0, d.height);
        let top_outer = ProfilePoint::new(d.top_width, d.height);
        let neck_base = top_outer.offset(0.0, -d.top_height);
        let shoulder = neck_base.offset(d.body_top_width, 0.0);
        let base_outer = ProfilePoint::new(d.bottom_width, 0.0);

        let (upper_mid, upper_end, lower_mid) = match mode {
            BuildMode::Direct => {
                let o = &self.offsets;
                (
                    shoulder.offset(o.upper_arc_mid.0, o.upper_arc_mid.1),
                    shoulder.offset(o.upper_arc_end.0, o.upper_arc_end.1),
                    ProfilePoint::new(o.lower_arc_mid.0, o.lower_arc_mid.1),
                )
            }
            BuildMode::Parametric => {
                let end = ProfilePoint::new(d.top_width + 2.0 * d.body_top_width, d.height / 2.0);
                let upper_mid = self.seed_interior(shoulder, end, Bend::Right)?;
                let lower_mid = self.seed_interior(end, base_outer, Bend::Left)?;
                (upper_mid, end, lower_mid)
            }
        };

        let outline = ProfileOutline {
            segments: vec![
                line_segment(SegmentKind::HeightLine, origin, top, tol)?,
                line_segment(SegmentKind::TopLine, top, top_outer, tol)?,
                line_segment(SegmentKind::TopHeightLine, top_outer, neck_base, tol)?,
                line_segment(SegmentKind::TopBodyLine, neck_base, shoulder, tol)?,
                arc_segment(SegmentKind::UpperArc, shoulder, upper_mid, upper_end, tol)?,
                arc_segment(SegmentKind::LowerArc, upper_end, lower_mid, base_outer, tol)?,
                line_segment(SegmentKind::BottomLine, base_outer, origin, tol)?,
            ],
        };
        validate_outline(&outline, tol)?;

        debug!(?mode, upper_end = ?(upper_end.x, upper_end.y), "profile built");
        Ok(outline)
    }

    /// Interior point of a shallow seed arc: the chord midpoint pushed
    /// `arc_bias` off the chord on the `bend` side.
    fn seed_interior(
        &self,
        start: ProfilePoint,
        end: ProfilePoint,
        bend: Bend,
    ) -> Result<ProfilePoint, OpError> {
        let (nx, ny) = geometry::chord_normal(start, end)
            .ok_or_else(|| OpError::degenerate("arc chord has zero length"))?;
        let sagitta = match bend {
            Bend::Left => self.arc_bias,
            Bend::Right => -self.arc_bias,
        };
        let interior = start.midpoint(end).offset(nx * sagitta, ny * sagitta);
        if geometry::is_collinear(start, interior, end, self.tolerance) {
            return Err(OpError::degenerate(format!(
                "arc bias {} does not bend the chord ({}, {}) -> ({}, {})",
                self.arc_bias, start.x, start.y, end.x, end.y
            )));
        }
        debug!(?bend, interior = ?(interior.x, interior.y), "arc interior seeded");
        Ok(interior)
    }
}

/// A line segment, rejecting zero length.
pub fn line_segment(
    kind: SegmentKind,
    start: ProfilePoint,
    end: ProfilePoint,
    tol: f64,
) -> Result<ProfileSegment, OpError> {
    let length = start.distance_to(end);
    if !(length >= tol) {
        return Err(OpError::degenerate(format!(
            "{:?} has zero length at ({}, {})",
            kind, start.x, start.y
        )));
    }
    Ok(ProfileSegment::Line { kind, start, end })
}

/// A three-point arc, rejecting collinear points.
pub fn arc_segment(
    kind: SegmentKind,
    start: ProfilePoint,
    interior: ProfilePoint,
    end: ProfilePoint,
    tol: f64,
) -> Result<ProfileSegment, OpError> {
    if geometry::is_collinear(start, interior, end, tol) {
        return Err(OpError::degenerate(format!(
            "{:?} points ({}, {}), ({}, {}), ({}, {}) are collinear",
            kind, start.x, start.y, interior.x, interior.y, end.x, end.y
        )));
    }
    Ok(ProfileSegment::Arc {
        kind,
        start,
        interior,
        end,
    })
}

/// Check that an outline is a usable revolve profile: chained, closed,
/// anchored at the origin, free of degenerate segments, non-self-intersecting
/// and enclosing a non-zero area.
pub fn validate_outline(outline: &ProfileOutline, tol: f64) -> Result<(), OpError> {
    let segments = &outline.segments;
    let (first, last) = match (segments.first(), segments.last()) {
        (Some(f), Some(l)) => (f, l),
        _ => return Err(OpError::degenerate("outline has no segments")),
    };

    if first.start().distance_to(ProfilePoint::ORIGIN) >= tol {
        return Err(OpError::degenerate("outline does not start at the origin"));
    }

    for pair in segments.windows(2) {
        if pair[0].end().distance_to(pair[1].start()) >= tol {
            return Err(OpError::degenerate(format!(
                "gap between {:?} and {:?}",
                pair[0].kind(),
                pair[1].kind()
            )));
        }
    }
    if last.end().distance_to(first.start()) >= tol {
        return Err(OpError::degenerate("outline is not closed"));
    }

    for segment in segments {
        match *segment {
            ProfileSegment::Line { kind, start, end } => {
                line_segment(kind, start, end, tol)?;
            }
            ProfileSegment::Arc {
                kind,
                start,
                interior,
                end,
            } => {
                arc_segment(kind, start, interior, end, tol)?;
            }
        }
    }

    let ring = geometry::outline_ring(outline, ARC_SAMPLES, tol)
        .ok_or_else(|| OpError::degenerate("outline arc could not be sampled"))?;
    if let Some((i, j)) = geometry::first_self_intersection(&ring, tol) {
        return Err(OpError::degenerate(format!(
            "outline intersects itself (pieces {} and {})",
            i, j
        )));
    }
    let area = geometry::shoelace_area(&ring).abs();
    if area < tol {
        return Err(OpError::degenerate("outline encloses no area"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn parametric_default() -> ProfileOutline {
        ProfileBuilder::new(&DimensionSet::default())
            .build(BuildMode::Parametric)
            .unwrap()
    }

    #[test]
    fn test_walk_order() {
        let outline = parametric_default();
        let kinds: Vec<SegmentKind> = outline.segments.iter().map(|s| s.kind()).collect();
        assert_eq!(kinds, SegmentKind::ORDER.to_vec());
    }

    #[test]
    fn test_parametric_upper_arc_end() {
        let outline = parametric_default();
        let upper = outline.segment(SegmentKind::UpperArc).unwrap();
        let lower = outline.segment(SegmentKind::LowerArc).unwrap();
        assert_abs_diff_eq!(upper.end().x, 3.6, epsilon = 1e-9);
        assert_abs_diff_eq!(upper.end().y, 10.5, epsilon = 1e-9);
        assert_eq!(upper.end(), lower.start());
    }

    #[test]
    fn test_parametric_interior_points_sag_by_bias() {
        let outline = parametric_default();
        let upper = outline.segment(SegmentKind::UpperArc).unwrap();
        let lower = outline.segment(SegmentKind::LowerArc).unwrap();

        let um = upper.chord_midpoint();
        let ui = upper.interior().unwrap();
        assert_abs_diff_eq!(ui.distance_to(um), 0.1, epsilon = 1e-9);
        assert!(ui.x < um.x, "shoulder should curve toward the axis");

        let lm = lower.chord_midpoint();
        let li = lower.interior().unwrap();
        assert_abs_diff_eq!(li.distance_to(lm), 0.1, epsilon = 1e-9);
        assert!(li.x > lm.x, "belly should curve away from the axis");
    }

    #[test]
    fn test_seed_interior_is_perpendicular_to_chord() {
        let builder = ProfileBuilder::new(&DimensionSet::default()).with_arc_bias(0.25);
        let start = ProfilePoint::new(0.0, 2.0);
        let end = ProfilePoint::new(2.0, 0.0);
        let left = builder.seed_interior(start, end, Bend::Left).unwrap();
        let right = builder.seed_interior(start, end, Bend::Right).unwrap();
        assert_abs_diff_eq!(left.distance_to(start), left.distance_to(end), epsilon = 1e-12);
        assert_abs_diff_eq!(left.distance_to(right), 0.5, epsilon = 1e-12);
        // Walking down-right, left of the chord is up-right.
        assert!(left.x > 1.0 && left.y > 1.0);
    }

    #[test]
    fn test_slender_neck_stays_clear_of_axis() {
        let dims = DimensionSet {
            height: 8.0,
            top_width: 0.5,
            top_height: 0.72,
            body_top_width: 0.1,
            bottom_width: 3.2,
            ..DimensionSet::default()
        };
        for bottom_width in [1.0, 3.2, 5.0, 8.0] {
            let dims = DimensionSet { bottom_width, ..dims };
            let result = ProfileBuilder::new(&dims).build(BuildMode::Parametric);
            assert!(result.is_ok(), "bottom_width {}: {:?}", bottom_width, result.err());
        }
    }

    #[test]
    fn test_shoulder_and_neck_points() {
        let outline = parametric_default();
        let body = outline.segment(SegmentKind::TopBodyLine).unwrap();
        assert_abs_diff_eq!(body.start().x, 2.8, epsilon = 1e-12);
        assert_abs_diff_eq!(body.end().x, 3.2, epsilon = 1e-12);
        assert_abs_diff_eq!(body.end().y, 19.1, epsilon = 1e-12);
        assert_eq!(outline.top_center(), Some(ProfilePoint::new(0.0, 21.0)));
    }

    #[test]
    fn test_direct_uses_fixed_offsets() {
        let outline = ProfileBuilder::new(&DimensionSet::default())
            .build(BuildMode::Direct)
            .unwrap();
        let upper = outline.segment(SegmentKind::UpperArc).unwrap();
        let lower = outline.segment(SegmentKind::LowerArc).unwrap();
        assert_abs_diff_eq!(upper.interior().unwrap().x, 3.02, epsilon = 1e-9);
        assert_abs_diff_eq!(upper.interior().unwrap().y, 15.0, epsilon = 1e-9);
        assert_abs_diff_eq!(upper.end().x, 3.66, epsilon = 1e-9);
        assert_abs_diff_eq!(upper.end().y, 11.9, epsilon = 1e-9);
        assert_eq!(lower.interior(), Some(ProfilePoint::new(4.66, 5.9)));
    }

    #[test]
    fn test_direct_collinear_offsets_are_degenerate() {
        let offsets = DirectArcOffsets {
            upper_arc_mid: (0.23, -3.6),
            upper_arc_end: (0.46, -7.2),
            ..DirectArcOffsets::default()
        };
        let result = ProfileBuilder::new(&DimensionSet::default())
            .with_direct_offsets(offsets)
            .build(BuildMode::Direct);
        assert!(matches!(result, Err(OpError::DegenerateGeometry { .. })));
    }

    #[test]
    fn test_zero_bias_is_degenerate() {
        let result = ProfileBuilder::new(&DimensionSet::default())
            .with_arc_bias(0.0)
            .build(BuildMode::Parametric);
        assert!(matches!(result, Err(OpError::DegenerateGeometry { .. })));
    }

    #[test]
    fn test_zero_top_height_is_degenerate() {
        let dims = DimensionSet {
            top_height: 0.0,
            ..DimensionSet::default()
        };
        let result = ProfileBuilder::new(&dims).build(BuildMode::Parametric);
        assert!(matches!(result, Err(OpError::DegenerateGeometry { .. })));
    }

    #[test]
    fn test_validate_rejects_open_outline() {
        let mut outline = parametric_default();
        outline.segments.pop();
        assert!(matches!(
            validate_outline(&outline, NEAR_ZERO),
            Err(OpError::DegenerateGeometry { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_crossing_outline() {
        let p = ProfilePoint::new;
        let outline = ProfileOutline {
            segments: vec![
                ProfileSegment::Line {
                    kind: SegmentKind::HeightLine,
                    start: p(0.0, 0.0),
                    end: p(0.0, 4.0),
                },
                ProfileSegment::Line {
                    kind: SegmentKind::TopLine,
                    start: p(0.0, 4.0),
                    end: p(3.0, 0.0),
                },
                ProfileSegment::Line {
                    kind: SegmentKind::TopHeightLine,
                    start: p(3.0, 0.0),
                    end: p(3.0, 4.0),
                },
                ProfileSegment::Line {
                    kind: SegmentKind::BottomLine,
                    start: p(3.0, 4.0),
                    end: p(0.0, 0.0),
                },
            ],
        };
        assert!(matches!(
            validate_outline(&outline, NEAR_ZERO),
            Err(OpError::DegenerateGeometry { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_empty_outline() {
        let outline = ProfileOutline { segments: vec![] };
        assert!(validate_outline(&outline, NEAR_ZERO).is_err());
    }
}
