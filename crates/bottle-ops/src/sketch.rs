use bottle_types::{BuildMode, DimensionSet, ProfileOutline, ProfileSegment, SegmentKind};
use cad_host::{ComponentHandle, DimensionOrientation, HostId, PointRef, SketchConstraint, SketchHandle};
use tracing::{info, instrument};

use crate::host_ext::HostBundle;
use crate::types::{OpError, PlacedProfile};

/// Aligned length dimensions: segment and label shift from its midpoint.
const LENGTH_DIMENSIONS: [(SegmentKind, f64, f64); 5] = [
    (SegmentKind::HeightLine, -1.0, 0.0),
    (SegmentKind::TopLine, 0.0, 1.0),
    (SegmentKind::TopHeightLine, 1.0, 0.0),
    (SegmentKind::TopBodyLine, 0.0, 1.0),
    (SegmentKind::BottomLine, 0.0, -1.0),
];

/// Create a sketch on `component` and place the outline, its constraints and
/// its dimensions.
#[instrument(skip(kb, outline, dims), fields(segments = outline.segments.len()))]
pub fn execute_sketch(
    kb: &mut dyn HostBundle,
    component: &ComponentHandle,
    outline: &ProfileOutline,
    mode: BuildMode,
    dims: &DimensionSet,
    arc_bias: f64,
) -> Result<PlacedProfile, OpError> {
    let sketch = kb.create_sketch(component)?;
    let curves = place_segments(kb, &sketch, outline)?;
    let mut placed = PlacedProfile {
        sketch,
        curves,
        constraints: Vec::new(),
        dimensions: Vec::new(),
    };
    placed.constraints = add_profile_constraints(kb, &placed)?;
    placed.dimensions = add_profile_dimensions(kb, &placed, outline, mode, dims, arc_bias)?;

    info!(
        curves = placed.curves.len(),
        constraints = placed.constraints.len(),
        dimensions = placed.dimensions.len(),
        "profile sketched"
    );
    Ok(placed)
}

/// Add one sketch curve per outline segment, in walk order.
pub fn place_segments(
    kb: &mut dyn HostBundle,
    sketch: &SketchHandle,
    outline: &ProfileOutline,
) -> Result<Vec<(SegmentKind, HostId)>, OpError> {
    let mut curves = Vec::with_capacity(outline.segments.len());
    for segment in &outline.segments {
        let id = match *segment {
            ProfileSegment::Line { start, end, .. } => kb.add_line(sketch, start, end)?,
            ProfileSegment::Arc {
                start,
                interior,
                end,
                ..
            } => kb.add_arc_through_points(sketch, start, interior, end)?,
        };
        curves.push((segment.kind(), id));
    }
    Ok(curves)
}

/// Pin the base origin and square up the axis, neck and ledge.
pub fn add_profile_constraints(
    kb: &mut dyn HostBundle,
    placed: &PlacedProfile,
) -> Result<Vec<HostId>, OpError> {
    let height = placed.require(SegmentKind::HeightLine)?;
    let top = placed.require(SegmentKind::TopLine)?;
    let neck = placed.require(SegmentKind::TopHeightLine)?;
    let ledge = placed.require(SegmentKind::TopBodyLine)?;
    let bottom = placed.require(SegmentKind::BottomLine)?;

    let constraints = [
        SketchConstraint::Fixed {
            point: PointRef::Start(height),
        },
        SketchConstraint::Horizontal { line: bottom },
        SketchConstraint::Perpendicular { a: bottom, b: height },
        SketchConstraint::Perpendicular { a: height, b: top },
        SketchConstraint::Perpendicular { a: top, b: neck },
        SketchConstraint::Perpendicular { a: neck, b: ledge },
    ];
    constraints
        .into_iter()
        .map(|c| kb.add_constraint(&placed.sketch, c).map_err(OpError::from))
        .collect()
}

/// Annotate line lengths and the arc placement. In Parametric mode the arc
/// dimensions are driven to their configured values.
pub fn add_profile_dimensions(
    kb: &mut dyn HostBundle,
    placed: &PlacedProfile,
    outline: &ProfileOutline,
    mode: BuildMode,
    dims: &DimensionSet,
    arc_bias: f64,
) -> Result<Vec<HostId>, OpError> {
    let sketch = &placed.sketch;
    let mut ids = Vec::new();

    for (kind, dx, dy) in LENGTH_DIMENSIONS {
        let line = placed.require(kind)?;
        let segment = outline.segment(kind).ok_or(OpError::NoMatchingTopology {
            what: format!("{:?} segment in outline", kind),
        })?;
        let label = segment.chord_midpoint().offset(dx, dy);
        ids.push(kb.add_distance_dimension(
            sketch,
            PointRef::Start(line),
            PointRef::End(line),
            DimensionOrientation::Aligned,
            label,
            None,
        )?);
    }

    let top = placed.require(SegmentKind::TopLine)?;
    let upper = placed.require(SegmentKind::UpperArc)?;
    let lower = placed.require(SegmentKind::LowerArc)?;
    let top_end = outline
        .segment(SegmentKind::TopLine)
        .map(|s| s.end())
        .ok_or(OpError::NoMatchingTopology {
            what: "TopLine segment in outline".to_string(),
        })?;
    let upper_center = kb.arc_center(sketch, upper)?;
    let driven = mode.drives_dimensions();

    ids.push(kb.add_distance_dimension(
        sketch,
        PointRef::End(top),
        PointRef::Center(upper),
        DimensionOrientation::Vertical,
        top_end.midpoint(upper_center),
        driven.then_some(dims.upper_arc_center_to_top),
    )?);

    if driven {
        for (arc, radius) in [
            (upper, dims.upper_arc_radius),
            (lower, dims.lower_arc_radius),
        ] {
            let center = kb.arc_center(sketch, arc)?;
            ids.push(kb.add_radial_dimension(sketch, arc, center.offset(arc_bias, 0.0), radius)?);
        }
    }

    Ok(ids)
}
