//! MockHost: deterministic test double implementing CadHost + HostIntrospect.
//!
//! Records every mutating call, synthesizes a body of revolution from the
//! placed sketch curves, and models fillet/shell/thread/scale topology changes
//! with predictable ids. Used by bottle-ops and bottle-engine for testing and
//! by the dry-run binary.

use std::collections::{HashMap, HashSet};
use std::fmt;

use bottle_types::{
    BuildMode, EdgeGeometry, ProfilePoint, SurfaceGeometry, ThreadCandidate, ThreadCatalog,
    ThreadSpec,
};
use tracing::trace;

use crate::traits::{CadHost, HostIntrospect};
use crate::types::*;

/// Thread family the mock reports as its metric default.
pub const DEFAULT_THREAD_FAMILY: &str = "ISO Metric profile";

/// Coordinate tolerance inside the mock. Tighter than `NEAR_ZERO` so every arc
/// the profile builder accepts is also accepted here, like a real host would.
const TOL: f64 = 1e-9;

/// Pitches the mock catalog offers for every nominal diameter, default first.
const MOCK_PITCHES: [f64; 4] = [0.75, 0.5, 0.45, 0.35];

/// Which host capability a call used. Also the key for failure injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostCallKind {
    DesignMode,
    CreateComponent,
    CreateSketch,
    AddLine,
    AddArc,
    AddConstraint,
    AddDistanceDimension,
    AddRadialDimension,
    Revolve,
    Fillet,
    Shell,
    DefaultThreadFamily,
    QueryThreadCatalog,
    ApplyThread,
    Scale,
    SetMaterial,
    SetAppearance,
    RefreshViewport,
}

/// One recorded mutating call.
#[derive(Debug, Clone, PartialEq)]
pub struct HostCall {
    pub kind: HostCallKind,
    pub detail: String,
}

impl fmt::Display for HostCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", self.kind, self.detail)
    }
}

/// A dimension placed on a mock sketch.
#[derive(Debug, Clone, PartialEq)]
pub enum MockDimension {
    Distance {
        id: HostId,
        orientation: DimensionOrientation,
        value: Option<f64>,
    },
    Radial {
        id: HostId,
        arc: HostId,
        value: f64,
    },
}

/// A sketch line or three-point arc.
#[derive(Debug, Clone)]
struct MockCurve {
    id: HostId,
    start: ProfilePoint,
    end: ProfilePoint,
    /// Arc center; `None` for lines.
    center: Option<ProfilePoint>,
}

#[derive(Debug, Clone, Default)]
struct MockSketch {
    curves: Vec<MockCurve>,
    constraints: Vec<SketchConstraint>,
    dimensions: Vec<MockDimension>,
}

#[derive(Debug, Clone)]
struct MockEdge {
    id: HostId,
    geometry: EdgeGeometry,
}

#[derive(Debug, Clone)]
struct MockFace {
    id: HostId,
    geometry: SurfaceGeometry,
    edges: Vec<HostId>,
}

/// A synthetic body with deterministic topology.
#[derive(Debug, Clone, Default)]
struct MockBody {
    edges: Vec<MockEdge>,
    faces: Vec<MockFace>,
    material: Option<String>,
    appearance: Option<String>,
    threads: Vec<ThreadSpec>,
}

impl MockBody {
    fn edge(&self, id: HostId) -> Option<&MockEdge> {
        self.edges.iter().find(|e| e.id == id)
    }

    fn face(&self, id: HostId) -> Option<&MockFace> {
        self.faces.iter().find(|f| f.id == id)
    }
}

/// Deterministic test double for the host CAD service.
/// Implements both CadHost and HostIntrospect.
pub struct MockHost {
    next_id: u64,
    next_handle: u64,
    design_mode: Option<BuildMode>,
    sketches: HashMap<u64, MockSketch>,
    bodies: HashMap<u64, MockBody>,
    thread_catalog: Option<ThreadCatalog>,
    libraries: HashMap<String, HashSet<String>>,
    fail_on: HashSet<HostCallKind>,
    calls: Vec<HostCall>,
    failure_reports: Vec<String>,
    viewport_refreshes: usize,
}

impl MockHost {
    /// A parametric design with the standard material and appearance libraries.
    pub fn new() -> Self {
        let mut host = Self {
            next_id: 1,
            next_handle: 1,
            design_mode: Some(BuildMode::Parametric),
            sketches: HashMap::new(),
            bodies: HashMap::new(),
            thread_catalog: None,
            libraries: HashMap::new(),
            fail_on: HashSet::new(),
            calls: Vec::new(),
            failure_reports: Vec::new(),
            viewport_refreshes: 0,
        };
        host.add_library(
            "C1EEA57C-3F56-45FC-B8CB-A9EC46A9994C",
            &["PrismMaterial-006", "PrismMaterial-018"],
        );
        host.add_library("BA5EE55E-9982-449B-9D66-9F036540E140", &["Prism-154"]);
        host
    }

    pub fn with_design_mode(mut self, mode: BuildMode) -> Self {
        self.design_mode = Some(mode);
        self
    }

    /// Simulate a host with no design document open.
    pub fn without_active_design(mut self) -> Self {
        self.design_mode = None;
        self
    }

    /// Answer every catalog query with `catalog` instead of the built-in table.
    pub fn with_thread_catalog(mut self, catalog: ThreadCatalog) -> Self {
        self.thread_catalog = Some(catalog);
        self
    }

    /// Make every call of `kind` fail.
    pub fn fail_on(mut self, kind: HostCallKind) -> Self {
        self.fail_on.insert(kind);
        self
    }

    pub fn add_library(&mut self, library_id: &str, items: &[&str]) {
        self.libraries
            .entry(library_id.to_string())
            .or_default()
            .extend(items.iter().map(|s| s.to_string()));
    }

    // ── Inspection ──────────────────────────────────────────────────────

    /// Every mutating call in order, including the one that failed.
    pub fn calls(&self) -> &[HostCall] {
        &self.calls
    }

    pub fn call_kinds(&self) -> Vec<HostCallKind> {
        self.calls.iter().map(|c| c.kind).collect()
    }

    pub fn count_calls(&self, kind: HostCallKind) -> usize {
        self.calls.iter().filter(|c| c.kind == kind).count()
    }

    /// Messages passed to `report_failure`.
    pub fn failure_reports(&self) -> &[String] {
        &self.failure_reports
    }

    pub fn viewport_refreshes(&self) -> usize {
        self.viewport_refreshes
    }

    pub fn sketch_curve_count(&self, sketch: &SketchHandle) -> usize {
        self.sketches.get(&sketch.0).map_or(0, |s| s.curves.len())
    }

    pub fn sketch_constraints(&self, sketch: &SketchHandle) -> &[SketchConstraint] {
        self.sketches
            .get(&sketch.0)
            .map_or(&[], |s| s.constraints.as_slice())
    }

    pub fn sketch_dimensions(&self, sketch: &SketchHandle) -> &[MockDimension] {
        self.sketches
            .get(&sketch.0)
            .map_or(&[], |s| s.dimensions.as_slice())
    }

    pub fn material_of(&self, body: &BodyHandle) -> Option<&str> {
        self.bodies.get(&body.0).and_then(|b| b.material.as_deref())
    }

    pub fn appearance_of(&self, body: &BodyHandle) -> Option<&str> {
        self.bodies.get(&body.0).and_then(|b| b.appearance.as_deref())
    }

    pub fn threads_on(&self, body: &BodyHandle) -> &[ThreadSpec] {
        self.bodies
            .get(&body.0)
            .map_or(&[], |b| b.threads.as_slice())
    }

    /// Insert a body with explicit topology. `faces` reference `edges` by index.
    pub fn insert_body(
        &mut self,
        edges: Vec<EdgeGeometry>,
        faces: Vec<(SurfaceGeometry, Vec<usize>)>,
    ) -> BodyHandle {
        let edges: Vec<MockEdge> = edges
            .into_iter()
            .map(|geometry| MockEdge {
                id: self.alloc_id(),
                geometry,
            })
            .collect();
        let faces: Vec<MockFace> = faces
            .into_iter()
            .map(|(geometry, idx)| MockFace {
                id: self.alloc_id(),
                geometry,
                edges: idx.iter().filter_map(|&i| edges.get(i).map(|e| e.id)).collect(),
            })
            .collect();
        let handle = self.alloc_handle();
        self.bodies.insert(
            handle,
            MockBody {
                edges,
                faces,
                ..MockBody::default()
            },
        );
        BodyHandle(handle)
    }

    // ── Internals ───────────────────────────────────────────────────────

    fn alloc_id(&mut self) -> HostId {
        let id = HostId(self.next_id);
        self.next_id += 1;
        id
    }

    fn alloc_handle(&mut self) -> u64 {
        let h = self.next_handle;
        self.next_handle += 1;
        h
    }

    fn check(&self, kind: HostCallKind) -> Result<(), HostError> {
        if self.fail_on.contains(&kind) {
            return Err(HostError::Other {
                message: format!("injected failure in {:?}", kind),
            });
        }
        Ok(())
    }

    /// Record a mutating call, then apply failure injection.
    fn begin(&mut self, kind: HostCallKind, detail: String) -> Result<(), HostError> {
        trace!(?kind, %detail, "host call");
        self.calls.push(HostCall { kind, detail });
        self.check(kind)
    }

    fn sketch_mut(&mut self, sketch: &SketchHandle) -> Result<&mut MockSketch, HostError> {
        self.sketches
            .get_mut(&sketch.0)
            .ok_or(HostError::SketchFailed {
                reason: format!("sketch {} does not exist", sketch.0),
            })
    }

    fn body(&self, body: &BodyHandle) -> Result<&MockBody, HostError> {
        self.bodies
            .get(&body.0)
            .ok_or(HostError::EntityNotFound { id: HostId(body.0) })
    }

    fn find_curve(&self, sketch: &SketchHandle, id: HostId) -> Result<&MockCurve, HostError> {
        self.sketches
            .get(&sketch.0)
            .and_then(|s| s.curves.iter().find(|c| c.id == id))
            .ok_or(HostError::EntityNotFound { id })
    }

    fn check_point_ref(&self, sketch: &SketchHandle, point: PointRef) -> Result<(), HostError> {
        match point {
            PointRef::Start(id) | PointRef::End(id) => self.find_curve(sketch, id).map(|_| ()),
            PointRef::Center(id) => match self.find_curve(sketch, id)?.center {
                Some(_) => Ok(()),
                None => Err(HostError::SketchFailed {
                    reason: format!("curve {:?} has no center point", id),
                }),
            },
        }
    }

    fn find_face(&self, face: HostId) -> Option<&MockFace> {
        self.bodies.values().find_map(|b| b.face(face))
    }

    fn find_edge(&self, edge: HostId) -> Option<&MockEdge> {
        self.bodies.values().find_map(|b| b.edge(edge))
    }

    /// Copy a body with fresh ids for every edge and face.
    /// Returns the copy and the old-to-new id map.
    fn reissue(&mut self, source: &MockBody) -> (MockBody, HashMap<HostId, HostId>) {
        let mut id_map = HashMap::new();
        let mut edges = Vec::with_capacity(source.edges.len());
        for e in &source.edges {
            let id = self.alloc_id();
            id_map.insert(e.id, id);
            edges.push(MockEdge {
                id,
                geometry: e.geometry,
            });
        }
        let mut faces = Vec::with_capacity(source.faces.len());
        for f in &source.faces {
            let id = self.alloc_id();
            id_map.insert(f.id, id);
            faces.push(MockFace {
                id,
                geometry: f.geometry,
                edges: f.edges.iter().filter_map(|e| id_map.get(e).copied()).collect(),
            });
        }
        let body = MockBody {
            edges,
            faces,
            material: source.material.clone(),
            appearance: source.appearance.clone(),
            threads: source.threads.clone(),
        };
        (body, id_map)
    }

    fn store_body(&mut self, body: MockBody) -> BodyHandle {
        let handle = self.alloc_handle();
        self.bodies.insert(handle, body);
        BodyHandle(handle)
    }

    /// Built-in catalog: a handful of pitches for any diameter of the metric family.
    fn builtin_catalog(nominal_diameter: f64, family: &str) -> ThreadCatalog {
        if family != DEFAULT_THREAD_FAMILY {
            return ThreadCatalog {
                default_designation: None,
                thread_class: String::new(),
                candidates: Vec::new(),
            };
        }
        let candidates: Vec<ThreadCandidate> = MOCK_PITCHES
            .iter()
            .map(|&p| ThreadCandidate::new(format!("M{}x{}", nominal_diameter, p), p))
            .collect();
        ThreadCatalog {
            default_designation: candidates.first().map(|c| c.designation.clone()),
            thread_class: "6g".to_string(),
            candidates,
        }
    }
}

impl Default for MockHost {
    fn default() -> Self {
        Self::new()
    }
}

fn near(a: f64, b: f64) -> bool {
    (a - b).abs() < TOL
}

fn same_point(a: ProfilePoint, b: ProfilePoint) -> bool {
    near(a.x, b.x) && near(a.y, b.y)
}

/// Circle traced by revolving a sketch point about the Y axis.
fn revolved_circle(p: ProfilePoint) -> EdgeGeometry {
    EdgeGeometry::Circle {
        center: [0.0, p.y, 0.0],
        normal: [0.0, 1.0, 0.0],
        radius: p.x,
    }
}

/// Surface swept by revolving a sketch curve about the Y axis.
fn revolved_surface(curve: &MockCurve) -> SurfaceGeometry {
    const AXIS: [f64; 3] = [0.0, 1.0, 0.0];
    if let Some(c) = curve.center {
        return SurfaceGeometry::Torus {
            origin: [0.0, c.y, 0.0],
            axis: AXIS,
            major_radius: c.x,
            minor_radius: c.distance_to(curve.start),
        };
    }
    let dx = curve.end.x - curve.start.x;
    let dy = curve.end.y - curve.start.y;
    if near(dy, 0.0) {
        // Outward normal of a clockwise walk is the left normal of the direction.
        SurfaceGeometry::Plane {
            origin: [0.0, curve.start.y, 0.0],
            normal: [0.0, dx.signum(), 0.0],
        }
    } else if near(dx, 0.0) {
        SurfaceGeometry::Cylinder {
            origin: [0.0, 0.0, 0.0],
            axis: AXIS,
            radius: curve.start.x,
        }
    } else {
        SurfaceGeometry::Cone {
            origin: [0.0, curve.start.y, 0.0],
            axis: AXIS,
            radius: curve.start.x,
            half_angle: (dx / dy).atan(),
        }
    }
}

fn scale_point(p: [f64; 3], origin: [f64; 3], factor: f64) -> [f64; 3] {
    [
        origin[0] + (p[0] - origin[0]) * factor,
        origin[1] + (p[1] - origin[1]) * factor,
        origin[2] + (p[2] - origin[2]) * factor,
    ]
}

fn scale_edge(g: EdgeGeometry, origin: [f64; 3], factor: f64) -> EdgeGeometry {
    match g {
        EdgeGeometry::Circle {
            center,
            normal,
            radius,
        } => EdgeGeometry::Circle {
            center: scale_point(center, origin, factor),
            normal,
            radius: radius * factor,
        },
        EdgeGeometry::Line { start, end } => EdgeGeometry::Line {
            start: scale_point(start, origin, factor),
            end: scale_point(end, origin, factor),
        },
        EdgeGeometry::Other => EdgeGeometry::Other,
    }
}

fn scale_surface(g: SurfaceGeometry, origin: [f64; 3], factor: f64) -> SurfaceGeometry {
    match g {
        SurfaceGeometry::Plane { origin: o, normal } => SurfaceGeometry::Plane {
            origin: scale_point(o, origin, factor),
            normal,
        },
        SurfaceGeometry::Cylinder {
            origin: o,
            axis,
            radius,
        } => SurfaceGeometry::Cylinder {
            origin: scale_point(o, origin, factor),
            axis,
            radius: radius * factor,
        },
        SurfaceGeometry::Cone {
            origin: o,
            axis,
            radius,
            half_angle,
        } => SurfaceGeometry::Cone {
            origin: scale_point(o, origin, factor),
            axis,
            radius: radius * factor,
            half_angle,
        },
        SurfaceGeometry::Torus {
            origin: o,
            axis,
            major_radius,
            minor_radius,
        } => SurfaceGeometry::Torus {
            origin: scale_point(o, origin, factor),
            axis,
            major_radius: major_radius * factor,
            minor_radius: minor_radius * factor,
        },
        SurfaceGeometry::Other => SurfaceGeometry::Other,
    }
}

/// Surface offset inward by `t` for the inner wall of a shell.
fn offset_surface(g: SurfaceGeometry, t: f64) -> SurfaceGeometry {
    match g {
        SurfaceGeometry::Plane { origin, normal } => SurfaceGeometry::Plane {
            origin: [
                origin[0] - normal[0] * t,
                origin[1] - normal[1] * t,
                origin[2] - normal[2] * t,
            ],
            normal: [-normal[0], -normal[1], -normal[2]],
        },
        SurfaceGeometry::Cylinder {
            origin,
            axis,
            radius,
        } => SurfaceGeometry::Cylinder {
            origin,
            axis,
            radius: radius - t,
        },
        SurfaceGeometry::Cone {
            origin,
            axis,
            radius,
            half_angle,
        } => SurfaceGeometry::Cone {
            origin,
            axis,
            radius: radius - t,
            half_angle,
        },
        SurfaceGeometry::Torus {
            origin,
            axis,
            major_radius,
            minor_radius,
        } => SurfaceGeometry::Torus {
            origin,
            axis,
            major_radius,
            minor_radius: (minor_radius - t).abs(),
        },
        SurfaceGeometry::Other => SurfaceGeometry::Other,
    }
}

impl CadHost for MockHost {
    fn create_component(&mut self) -> Result<ComponentHandle, HostError> {
        self.begin(HostCallKind::CreateComponent, String::new())?;
        if self.design_mode.is_none() {
            return Err(HostError::NoActiveDesign);
        }
        Ok(ComponentHandle(self.alloc_handle()))
    }

    fn create_sketch(&mut self, component: &ComponentHandle) -> Result<SketchHandle, HostError> {
        self.begin(HostCallKind::CreateSketch, format!("component={}", component.0))?;
        let handle = self.alloc_handle();
        self.sketches.insert(handle, MockSketch::default());
        Ok(SketchHandle(handle))
    }

    fn add_line(
        &mut self,
        sketch: &SketchHandle,
        from: ProfilePoint,
        to: ProfilePoint,
    ) -> Result<HostId, HostError> {
        self.begin(
            HostCallKind::AddLine,
            format!("({}, {}) -> ({}, {})", from.x, from.y, to.x, to.y),
        )?;
        if same_point(from, to) {
            return Err(HostError::SketchFailed {
                reason: "line has zero length".to_string(),
            });
        }
        let id = self.alloc_id();
        self.sketch_mut(sketch)?.curves.push(MockCurve {
            id,
            start: from,
            end: to,
            center: None,
        });
        Ok(id)
    }

    fn add_arc_through_points(
        &mut self,
        sketch: &SketchHandle,
        start: ProfilePoint,
        interior: ProfilePoint,
        end: ProfilePoint,
    ) -> Result<HostId, HostError> {
        self.begin(
            HostCallKind::AddArc,
            format!(
                "({}, {}) via ({}, {}) -> ({}, {})",
                start.x, start.y, interior.x, interior.y, end.x, end.y
            ),
        )?;
        let center = ProfilePoint::circumcenter(start, interior, end, TOL).ok_or(
            HostError::SketchFailed {
                reason: "arc points are collinear".to_string(),
            },
        )?;
        let id = self.alloc_id();
        self.sketch_mut(sketch)?.curves.push(MockCurve {
            id,
            start,
            end,
            center: Some(center),
        });
        Ok(id)
    }

    fn add_constraint(
        &mut self,
        sketch: &SketchHandle,
        constraint: SketchConstraint,
    ) -> Result<HostId, HostError> {
        self.begin(HostCallKind::AddConstraint, format!("{:?}", constraint))?;
        match constraint {
            SketchConstraint::Fixed { point } => self.check_point_ref(sketch, point)?,
            SketchConstraint::Horizontal { line } => {
                self.find_curve(sketch, line)?;
            }
            SketchConstraint::Perpendicular { a, b } => {
                self.find_curve(sketch, a)?;
                self.find_curve(sketch, b)?;
            }
        }
        let id = self.alloc_id();
        self.sketch_mut(sketch)?.constraints.push(constraint);
        Ok(id)
    }

    fn add_distance_dimension(
        &mut self,
        sketch: &SketchHandle,
        a: PointRef,
        b: PointRef,
        orientation: DimensionOrientation,
        label: ProfilePoint,
        value: Option<f64>,
    ) -> Result<HostId, HostError> {
        self.begin(
            HostCallKind::AddDistanceDimension,
            format!(
                "{:?} {:?} -> {:?} label=({}, {}) value={:?}",
                orientation, a, b, label.x, label.y, value
            ),
        )?;
        self.check_point_ref(sketch, a)?;
        self.check_point_ref(sketch, b)?;
        if let Some(v) = value {
            if v <= 0.0 {
                return Err(HostError::SketchFailed {
                    reason: format!("dimension value {} must be positive", v),
                });
            }
        }
        let id = self.alloc_id();
        self.sketch_mut(sketch)?.dimensions.push(MockDimension::Distance {
            id,
            orientation,
            value,
        });
        Ok(id)
    }

    fn add_radial_dimension(
        &mut self,
        sketch: &SketchHandle,
        arc: HostId,
        label: ProfilePoint,
        value: f64,
    ) -> Result<HostId, HostError> {
        self.begin(
            HostCallKind::AddRadialDimension,
            format!("{:?} label=({}, {}) value={}", arc, label.x, label.y, value),
        )?;
        self.check_point_ref(sketch, PointRef::Center(arc))?;
        if value <= 0.0 {
            return Err(HostError::SketchFailed {
                reason: format!("radius {} must be positive", value),
            });
        }
        let id = self.alloc_id();
        self.sketch_mut(sketch)?
            .dimensions
            .push(MockDimension::Radial { id, arc, value });
        Ok(id)
    }

    fn revolve(
        &mut self,
        sketch: &SketchHandle,
        profile_index: usize,
        axis: HostId,
        full_turn: bool,
    ) -> Result<BodyHandle, HostError> {
        self.begin(
            HostCallKind::Revolve,
            format!(
                "sketch={} profile={} axis={:?} full_turn={}",
                sketch.0, profile_index, axis, full_turn
            ),
        )?;
        if !full_turn {
            return Err(HostError::feature("revolve", "only full turns are modeled"));
        }
        let curves = self
            .sketches
            .get(&sketch.0)
            .map(|s| s.curves.clone())
            .unwrap_or_default();
        if profile_index != 0 || curves.is_empty() {
            return Err(HostError::SketchFailed {
                reason: format!("sketch has no profile {}", profile_index),
            });
        }
        let axis_curve = self.find_curve(sketch, axis)?;
        if axis_curve.center.is_some() || !near(axis_curve.start.x, 0.0) || !near(axis_curve.end.x, 0.0)
        {
            return Err(HostError::feature(
                "revolve",
                "axis must be a line on the sketch Y axis",
            ));
        }
        let n = curves.len();
        for i in 0..n {
            if !same_point(curves[i].end, curves[(i + 1) % n].start) {
                return Err(HostError::SketchFailed {
                    reason: "profile is not closed".to_string(),
                });
            }
        }

        // One circular edge per profile vertex off the axis.
        let mut vertex_edges: Vec<Option<MockEdge>> = Vec::with_capacity(n);
        for curve in &curves {
            if curve.start.x > TOL {
                let id = self.alloc_id();
                vertex_edges.push(Some(MockEdge {
                    id,
                    geometry: revolved_circle(curve.start),
                }));
            } else {
                vertex_edges.push(None);
            }
        }

        // One face per profile curve, except the axis itself.
        let mut faces = Vec::new();
        for (i, curve) in curves.iter().enumerate() {
            if curve.id == axis {
                continue;
            }
            let edges = [&vertex_edges[i], &vertex_edges[(i + 1) % n]]
                .into_iter()
                .filter_map(|e| e.as_ref().map(|e| e.id))
                .collect();
            faces.push(MockFace {
                id: self.alloc_id(),
                geometry: revolved_surface(curve),
                edges,
            });
        }

        let body = MockBody {
            edges: vertex_edges.into_iter().flatten().collect(),
            faces,
            ..MockBody::default()
        };
        Ok(self.store_body(body))
    }

    fn fillet(
        &mut self,
        body: &BodyHandle,
        edges: &[HostId],
        radius: f64,
    ) -> Result<BodyHandle, HostError> {
        self.begin(
            HostCallKind::Fillet,
            format!("body={} edges={:?} radius={}", body.0, edges, radius),
        )?;
        if radius <= 0.0 {
            return Err(HostError::feature("fillet", "radius must be positive"));
        }
        if edges.is_empty() {
            return Err(HostError::feature("fillet", "no edges selected"));
        }
        let source = self.body(body)?.clone();
        for eid in edges {
            if source.edge(*eid).is_none() {
                return Err(HostError::feature(
                    "fillet",
                    format!("edge {:?} not found in body", eid),
                ));
            }
        }

        let filleted: HashSet<HostId> = edges.iter().copied().collect();
        let (mut result, id_map) = self.reissue(&source);
        let removed: HashSet<HostId> = filleted.iter().filter_map(|e| id_map.get(e)).copied().collect();
        result.edges.retain(|e| !removed.contains(&e.id));

        for orig in edges {
            let geometry = source.edge(*orig).map(|e| e.geometry).unwrap_or(EdgeGeometry::Other);
            let (center, r) = match geometry {
                EdgeGeometry::Circle { center, radius, .. } => (center, radius),
                _ => {
                    return Err(HostError::feature(
                        "fillet",
                        format!("edge {:?} is not circular", orig),
                    ))
                }
            };
            // Tangent circles: one pulled in on the adjacent face, one lifted along the axis.
            let inner = MockEdge {
                id: self.alloc_id(),
                geometry: EdgeGeometry::Circle {
                    center,
                    normal: [0.0, 1.0, 0.0],
                    radius: r - radius,
                },
            };
            let lifted = MockEdge {
                id: self.alloc_id(),
                geometry: EdgeGeometry::Circle {
                    center: [center[0], center[1] + radius, center[2]],
                    normal: [0.0, 1.0, 0.0],
                    radius: r,
                },
            };

            // Faces that used the filleted edge now end at one of the tangent circles.
            let Some(&old_id) = id_map.get(orig) else {
                continue;
            };
            let mut replacement = [inner.id, lifted.id].into_iter().cycle();
            for face in result.faces.iter_mut() {
                for e in face.edges.iter_mut() {
                    if *e == old_id {
                        *e = replacement.next().unwrap_or(inner.id);
                    }
                }
            }

            let face = MockFace {
                id: self.alloc_id(),
                geometry: SurfaceGeometry::Torus {
                    origin: [center[0], center[1] + radius, center[2]],
                    axis: [0.0, 1.0, 0.0],
                    major_radius: r - radius,
                    minor_radius: radius,
                },
                edges: vec![inner.id, lifted.id],
            };
            result.edges.push(inner);
            result.edges.push(lifted);
            result.faces.push(face);
        }

        Ok(self.store_body(result))
    }

    fn shell(
        &mut self,
        body: &BodyHandle,
        faces_to_remove: &[HostId],
        inside_thickness: f64,
    ) -> Result<BodyHandle, HostError> {
        self.begin(
            HostCallKind::Shell,
            format!(
                "body={} remove={:?} thickness={}",
                body.0, faces_to_remove, inside_thickness
            ),
        )?;
        if inside_thickness <= 0.0 {
            return Err(HostError::feature("shell", "thickness must be positive"));
        }
        let source = self.body(body)?.clone();
        for fid in faces_to_remove {
            if source.face(*fid).is_none() {
                return Err(HostError::feature(
                    "shell",
                    format!("face {:?} not found in body", fid),
                ));
            }
        }

        let remove: HashSet<HostId> = faces_to_remove.iter().copied().collect();
        let kept: Vec<MockFace> = source
            .faces
            .iter()
            .filter(|f| !remove.contains(&f.id))
            .cloned()
            .collect();
        let (mut result, _) = self.reissue(&MockBody {
            faces: kept.clone(),
            ..source.clone()
        });

        // Inner offset wall for each kept face.
        for f in &kept {
            let mut inner_edges = Vec::with_capacity(f.edges.len());
            for eid in &f.edges {
                let geometry = match source.edge(*eid).map(|e| e.geometry) {
                    Some(EdgeGeometry::Circle {
                        center,
                        normal,
                        radius,
                    }) => EdgeGeometry::Circle {
                        center,
                        normal,
                        radius: radius - inside_thickness,
                    },
                    Some(other) => other,
                    None => EdgeGeometry::Other,
                };
                let edge = MockEdge {
                    id: self.alloc_id(),
                    geometry,
                };
                inner_edges.push(edge.id);
                result.edges.push(edge);
            }
            result.faces.push(MockFace {
                id: self.alloc_id(),
                geometry: offset_surface(f.geometry, inside_thickness),
                edges: inner_edges,
            });
        }

        Ok(self.store_body(result))
    }

    fn apply_thread(
        &mut self,
        body: &BodyHandle,
        face: HostId,
        thread: &ThreadSpec,
        modeled: bool,
    ) -> Result<BodyHandle, HostError> {
        self.begin(
            HostCallKind::ApplyThread,
            format!(
                "body={} face={:?} designation={} class={} modeled={}",
                body.0, face, thread.designation, thread.thread_class, modeled
            ),
        )?;
        if thread.designation.is_empty() || thread.pitch <= 0.0 {
            return Err(HostError::feature("thread", "invalid thread data"));
        }
        let source = self.body(body)?.clone();
        let target = source
            .face(face)
            .ok_or(HostError::feature("thread", format!("face {:?} not found in body", face)))?;
        if target.geometry.cylinder_radius().is_none() {
            return Err(HostError::feature("thread", "face is not cylindrical"));
        }

        let (mut result, _) = self.reissue(&source);
        if modeled {
            let helix = MockEdge {
                id: self.alloc_id(),
                geometry: EdgeGeometry::Other,
            };
            let groove = MockFace {
                id: self.alloc_id(),
                geometry: SurfaceGeometry::Other,
                edges: vec![helix.id],
            };
            result.edges.push(helix);
            result.faces.push(groove);
        }
        result.threads.push(thread.clone());
        Ok(self.store_body(result))
    }

    fn scale(
        &mut self,
        body: &BodyHandle,
        origin: [f64; 3],
        factor: f64,
    ) -> Result<BodyHandle, HostError> {
        self.begin(
            HostCallKind::Scale,
            format!("body={} origin={:?} factor={}", body.0, origin, factor),
        )?;
        if !(factor.is_finite() && factor > 0.0) {
            return Err(HostError::feature("scale", "factor must be positive"));
        }
        let source = self.body(body)?.clone();
        let (mut result, _) = self.reissue(&source);
        for e in result.edges.iter_mut() {
            e.geometry = scale_edge(e.geometry, origin, factor);
        }
        for f in result.faces.iter_mut() {
            f.geometry = scale_surface(f.geometry, origin, factor);
        }
        Ok(self.store_body(result))
    }

    fn set_material(
        &mut self,
        body: &BodyHandle,
        library_id: &str,
        material_id: &str,
    ) -> Result<(), HostError> {
        self.begin(
            HostCallKind::SetMaterial,
            format!("body={} {}/{}", body.0, library_id, material_id),
        )?;
        if !self
            .libraries
            .get(library_id)
            .is_some_and(|items| items.contains(material_id))
        {
            return Err(HostError::LibraryItemNotFound {
                library: library_id.to_string(),
                item: material_id.to_string(),
            });
        }
        let target = self
            .bodies
            .get_mut(&body.0)
            .ok_or(HostError::EntityNotFound { id: HostId(body.0) })?;
        target.material = Some(material_id.to_string());
        Ok(())
    }

    fn set_appearance(
        &mut self,
        body: &BodyHandle,
        library_id: &str,
        appearance_id: &str,
    ) -> Result<(), HostError> {
        self.begin(
            HostCallKind::SetAppearance,
            format!("body={} {}/{}", body.0, library_id, appearance_id),
        )?;
        if !self
            .libraries
            .get(library_id)
            .is_some_and(|items| items.contains(appearance_id))
        {
            return Err(HostError::LibraryItemNotFound {
                library: library_id.to_string(),
                item: appearance_id.to_string(),
            });
        }
        let target = self
            .bodies
            .get_mut(&body.0)
            .ok_or(HostError::EntityNotFound { id: HostId(body.0) })?;
        target.appearance = Some(appearance_id.to_string());
        Ok(())
    }

    fn refresh_viewport(&mut self) -> Result<(), HostError> {
        self.begin(HostCallKind::RefreshViewport, String::new())?;
        self.viewport_refreshes += 1;
        Ok(())
    }

    fn report_failure(&mut self, message: &str) {
        self.failure_reports.push(message.to_string());
    }
}

impl HostIntrospect for MockHost {
    fn design_mode(&self) -> Result<BuildMode, HostError> {
        self.check(HostCallKind::DesignMode)?;
        self.design_mode.ok_or(HostError::NoActiveDesign)
    }

    fn arc_center(&self, sketch: &SketchHandle, arc: HostId) -> Result<ProfilePoint, HostError> {
        self.find_curve(sketch, arc)?
            .center
            .ok_or(HostError::SketchFailed {
                reason: format!("curve {:?} is not an arc", arc),
            })
    }

    fn list_edges(&self, body: &BodyHandle) -> Vec<HostId> {
        self.bodies
            .get(&body.0)
            .map(|b| b.edges.iter().map(|e| e.id).collect())
            .unwrap_or_default()
    }

    fn list_faces(&self, body: &BodyHandle) -> Vec<HostId> {
        self.bodies
            .get(&body.0)
            .map(|b| b.faces.iter().map(|f| f.id).collect())
            .unwrap_or_default()
    }

    fn face_edges(&self, face: HostId) -> Vec<HostId> {
        self.find_face(face).map(|f| f.edges.clone()).unwrap_or_default()
    }

    fn edge_geometry(&self, edge: HostId) -> Result<EdgeGeometry, HostError> {
        self.find_edge(edge)
            .map(|e| e.geometry)
            .ok_or(HostError::EntityNotFound { id: edge })
    }

    fn face_geometry(&self, face: HostId) -> Result<SurfaceGeometry, HostError> {
        self.find_face(face)
            .map(|f| f.geometry)
            .ok_or(HostError::EntityNotFound { id: face })
    }

    fn default_thread_family(&self) -> Result<String, HostError> {
        self.check(HostCallKind::DefaultThreadFamily)?;
        Ok(DEFAULT_THREAD_FAMILY.to_string())
    }

    fn query_thread_catalog(
        &self,
        nominal_diameter: f64,
        family: &str,
    ) -> Result<ThreadCatalog, HostError> {
        self.check(HostCallKind::QueryThreadCatalog)?;
        Ok(match &self.thread_catalog {
            Some(catalog) => catalog.clone(),
            None => Self::builtin_catalog(nominal_diameter, family),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A 1 x 2 rectangle against the axis: revolves into a plain cylinder.
    fn rectangle(host: &mut MockHost) -> (SketchHandle, HostId) {
        let comp = host.create_component().unwrap();
        let sketch = host.create_sketch(&comp).unwrap();
        let p = ProfilePoint::new;
        let axis = host.add_line(&sketch, p(0.0, 0.0), p(0.0, 2.0)).unwrap();
        host.add_line(&sketch, p(0.0, 2.0), p(1.0, 2.0)).unwrap();
        host.add_line(&sketch, p(1.0, 2.0), p(1.0, 0.0)).unwrap();
        host.add_line(&sketch, p(1.0, 0.0), p(0.0, 0.0)).unwrap();
        (sketch, axis)
    }

    fn revolved_cylinder(host: &mut MockHost) -> BodyHandle {
        let (sketch, axis) = rectangle(host);
        host.revolve(&sketch, 0, axis, true).unwrap()
    }

    #[test]
    fn test_revolve_rectangle_produces_cylinder_topology() {
        let mut host = MockHost::new();
        let body = revolved_cylinder(&mut host);

        // Two rims, top disk + side + bottom disk
        assert_eq!(host.list_edges(&body).len(), 2);
        let faces = host.list_faces(&body);
        assert_eq!(faces.len(), 3);

        let kinds: Vec<SurfaceGeometry> = faces
            .iter()
            .map(|f| host.face_geometry(*f).unwrap())
            .collect();
        assert!(kinds[0].is_planar());
        assert_eq!(kinds[1].cylinder_radius(), Some(1.0));
        assert!(kinds[2].is_planar());
    }

    #[test]
    fn test_revolve_top_face_first_edge_is_centered_on_axis() {
        let mut host = MockHost::new();
        let body = revolved_cylinder(&mut host);
        let top = host.list_faces(&body)[0];
        let first = host.face_edges(top)[0];
        assert_eq!(host.edge_geometry(first).unwrap().center(), Some([0.0, 2.0, 0.0]));
    }

    #[test]
    fn test_revolve_rejects_open_profile() {
        let mut host = MockHost::new();
        let comp = host.create_component().unwrap();
        let sketch = host.create_sketch(&comp).unwrap();
        let p = ProfilePoint::new;
        let axis = host.add_line(&sketch, p(0.0, 0.0), p(0.0, 2.0)).unwrap();
        host.add_line(&sketch, p(0.0, 2.0), p(1.0, 2.0)).unwrap();
        let result = host.revolve(&sketch, 0, axis, true);
        assert!(matches!(result, Err(HostError::SketchFailed { .. })));
    }

    #[test]
    fn test_revolve_rejects_off_axis_line() {
        let mut host = MockHost::new();
        let (sketch, _) = rectangle(&mut host);
        // The side line at x = 1 is not on the axis
        let side = HostId(host.next_id - 2);
        let result = host.revolve(&sketch, 0, side, true);
        assert!(matches!(result, Err(HostError::FeatureFailed { .. })));
    }

    #[test]
    fn test_collinear_arc_rejected() {
        let mut host = MockHost::new();
        let comp = host.create_component().unwrap();
        let sketch = host.create_sketch(&comp).unwrap();
        let p = ProfilePoint::new;
        let result = host.add_arc_through_points(&sketch, p(0.0, 0.0), p(1.0, 1.0), p(2.0, 2.0));
        assert!(matches!(result, Err(HostError::SketchFailed { .. })));
    }

    #[test]
    fn test_arc_center_is_reported() {
        let mut host = MockHost::new();
        let comp = host.create_component().unwrap();
        let sketch = host.create_sketch(&comp).unwrap();
        let p = ProfilePoint::new;
        let arc = host
            .add_arc_through_points(&sketch, p(1.0, 0.0), p(0.0, 1.0), p(-1.0, 0.0))
            .unwrap();
        let c = host.arc_center(&sketch, arc).unwrap();
        assert!(c.x.abs() < 1e-12 && c.y.abs() < 1e-12);
    }

    #[test]
    fn test_fillet_replaces_edge_with_torus_face() {
        let mut host = MockHost::new();
        let body = revolved_cylinder(&mut host);
        let edge = host.list_edges(&body)[0];
        let result = host.fillet(&body, &[edge], 0.2).unwrap();

        // 2 rims - 1 filleted + 2 tangent circles; 3 faces + 1 blend
        assert_eq!(host.list_edges(&result).len(), 3);
        let faces = host.list_faces(&result);
        assert_eq!(faces.len(), 4);
        assert!(matches!(
            host.face_geometry(faces[3]).unwrap(),
            SurfaceGeometry::Torus { .. }
        ));
    }

    #[test]
    fn test_fillet_invalid_radius() {
        let mut host = MockHost::new();
        let body = revolved_cylinder(&mut host);
        let edge = host.list_edges(&body)[0];
        let result = host.fillet(&body, &[edge], -0.1);
        assert!(matches!(result, Err(HostError::FeatureFailed { .. })));
    }

    #[test]
    fn test_fillet_stale_edge_rejected() {
        let mut host = MockHost::new();
        let body = revolved_cylinder(&mut host);
        let edge = host.list_edges(&body)[0];
        let filleted = host.fillet(&body, &[edge], 0.1).unwrap();
        // Ids from the previous body are not part of the new one
        let result = host.fillet(&filleted, &[edge], 0.1);
        assert!(matches!(result, Err(HostError::FeatureFailed { .. })));
    }

    #[test]
    fn test_shell_removes_face_and_adds_inner() {
        let mut host = MockHost::new();
        let body = revolved_cylinder(&mut host);
        let top = host.list_faces(&body)[0];
        let result = host.shell(&body, &[top], 0.1).unwrap();

        // 3 faces - 1 removed = 2 outer + 2 inner
        let faces = host.list_faces(&result);
        assert_eq!(faces.len(), 4);
        assert_eq!(host.face_geometry(faces[3]).unwrap(), {
            SurfaceGeometry::Plane {
                origin: [0.0, 0.1, 0.0],
                normal: [0.0, 1.0, 0.0],
            }
        });
    }

    #[test]
    fn test_shell_invalid_thickness() {
        let mut host = MockHost::new();
        let body = revolved_cylinder(&mut host);
        let result = host.shell(&body, &[], 0.0);
        assert!(matches!(result, Err(HostError::FeatureFailed { .. })));
    }

    #[test]
    fn test_thread_requires_cylinder() {
        let mut host = MockHost::new();
        let body = revolved_cylinder(&mut host);
        let faces = host.list_faces(&body);
        let spec = ThreadSpec {
            family: DEFAULT_THREAD_FAMILY.to_string(),
            designation: "M2x0.4".to_string(),
            thread_class: "6g".to_string(),
            pitch: 0.4,
            external: true,
        };

        let planar = host.apply_thread(&body, faces[0], &spec, true);
        assert!(matches!(planar, Err(HostError::FeatureFailed { .. })));

        let threaded = host.apply_thread(&body, faces[1], &spec, true).unwrap();
        assert_eq!(host.threads_on(&threaded), &[spec]);
        assert_eq!(host.list_faces(&threaded).len(), 4);
    }

    #[test]
    fn test_scale_scales_radii_about_origin() {
        let mut host = MockHost::new();
        let body = revolved_cylinder(&mut host);
        let scaled = host.scale(&body, [0.0, 0.0, 0.0], 2.0).unwrap();
        let side = host.list_faces(&scaled)[1];
        assert_eq!(host.face_geometry(side).unwrap().cylinder_radius(), Some(2.0));
        let top_edge = host.list_edges(&scaled)[0];
        assert_eq!(host.edge_geometry(top_edge).unwrap().center(), Some([0.0, 4.0, 0.0]));
    }

    #[test]
    fn test_material_lookup() {
        let mut host = MockHost::new();
        let body = revolved_cylinder(&mut host);
        host.set_material(&body, "C1EEA57C-3F56-45FC-B8CB-A9EC46A9994C", "PrismMaterial-006")
            .unwrap();
        assert_eq!(host.material_of(&body), Some("PrismMaterial-006"));

        let missing = host.set_appearance(&body, "BA5EE55E-9982-449B-9D66-9F036540E140", "nope");
        assert!(matches!(missing, Err(HostError::LibraryItemNotFound { .. })));
    }

    #[test]
    fn test_failure_injection_records_call() {
        let mut host = MockHost::new().fail_on(HostCallKind::CreateSketch);
        let comp = host.create_component().unwrap();
        assert!(host.create_sketch(&comp).is_err());
        assert_eq!(
            host.call_kinds(),
            vec![HostCallKind::CreateComponent, HostCallKind::CreateSketch]
        );
    }

    #[test]
    fn test_no_active_design() {
        let mut host = MockHost::new().without_active_design();
        assert!(matches!(host.design_mode(), Err(HostError::NoActiveDesign)));
        assert!(matches!(host.create_component(), Err(HostError::NoActiveDesign)));
    }

    #[test]
    fn test_builtin_catalog() {
        let host = MockHost::new();
        let catalog = host.query_thread_catalog(5.6, DEFAULT_THREAD_FAMILY).unwrap();
        assert_eq!(catalog.default_designation.as_deref(), Some("M5.6x0.75"));
        assert_eq!(catalog.candidates.len(), 4);

        let unknown = host.query_thread_catalog(5.6, "ACME").unwrap();
        assert!(unknown.candidates.is_empty());
    }

    #[test]
    fn test_deterministic_ids() {
        let mut h1 = MockHost::new();
        let mut h2 = MockHost::new();
        let b1 = revolved_cylinder(&mut h1);
        let b2 = revolved_cylinder(&mut h2);
        assert_eq!(b1, b2);
        assert_eq!(h1.list_edges(&b1), h2.list_edges(&b2));
        assert_eq!(h1.list_faces(&b1), h2.list_faces(&b2));
    }

    #[test]
    fn test_insert_body() {
        let mut host = MockHost::new();
        let body = host.insert_body(
            vec![
                EdgeGeometry::Circle {
                    center: [0.0; 3],
                    normal: [0.0, 1.0, 0.0],
                    radius: 1.0,
                },
                EdgeGeometry::Other,
            ],
            vec![(SurfaceGeometry::Other, vec![0, 1, 7])],
        );
        assert_eq!(host.list_edges(&body).len(), 2);
        let face = host.list_faces(&body)[0];
        assert_eq!(host.face_edges(face).len(), 2);
    }
}
