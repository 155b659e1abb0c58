use bottle_types::{BuildMode, ProfilePoint, ThreadCatalog, ThreadSpec};

use crate::types::*;

/// Mutating capabilities of the host CAD modeling service.
/// Implemented by the host adapter and by MockHost (deterministic test double).
///
/// Every call is synchronous and either completes or reports a [`HostError`];
/// callers never retry.
pub trait CadHost {
    /// Add a new empty component to the active design.
    fn create_component(&mut self) -> Result<ComponentHandle, HostError>;

    /// Create a sketch on the component's XY construction plane.
    fn create_sketch(&mut self, component: &ComponentHandle) -> Result<SketchHandle, HostError>;

    /// Add a line between two sketch points.
    fn add_line(
        &mut self,
        sketch: &SketchHandle,
        from: ProfilePoint,
        to: ProfilePoint,
    ) -> Result<HostId, HostError>;

    /// Add an arc passing through three points, in order.
    fn add_arc_through_points(
        &mut self,
        sketch: &SketchHandle,
        start: ProfilePoint,
        interior: ProfilePoint,
        end: ProfilePoint,
    ) -> Result<HostId, HostError>;

    /// Add a geometric constraint.
    fn add_constraint(
        &mut self,
        sketch: &SketchHandle,
        constraint: SketchConstraint,
    ) -> Result<HostId, HostError>;

    /// Add a distance dimension between two sketch points.
    /// With `value` the dimension drives the geometry; without it the host
    /// measures the current distance.
    fn add_distance_dimension(
        &mut self,
        sketch: &SketchHandle,
        a: PointRef,
        b: PointRef,
        orientation: DimensionOrientation,
        label: ProfilePoint,
        value: Option<f64>,
    ) -> Result<HostId, HostError>;

    /// Add a radial dimension on an arc, driven to `value`.
    fn add_radial_dimension(
        &mut self,
        sketch: &SketchHandle,
        arc: HostId,
        label: ProfilePoint,
        value: f64,
    ) -> Result<HostId, HostError>;

    /// Revolve a closed sketch profile around a sketch line.
    fn revolve(
        &mut self,
        sketch: &SketchHandle,
        profile_index: usize,
        axis: HostId,
        full_turn: bool,
    ) -> Result<BodyHandle, HostError>;

    /// Fillet (round) the specified edges with a constant radius.
    fn fillet(
        &mut self,
        body: &BodyHandle,
        edges: &[HostId],
        radius: f64,
    ) -> Result<BodyHandle, HostError>;

    /// Hollow the body, removing the given faces and keeping walls of
    /// `inside_thickness` measured inward.
    fn shell(
        &mut self,
        body: &BodyHandle,
        faces_to_remove: &[HostId],
        inside_thickness: f64,
    ) -> Result<BodyHandle, HostError>;

    /// Cut a thread on a cylindrical face. `modeled` produces real geometry
    /// rather than a cosmetic thread.
    fn apply_thread(
        &mut self,
        body: &BodyHandle,
        face: HostId,
        thread: &ThreadSpec,
        modeled: bool,
    ) -> Result<BodyHandle, HostError>;

    /// Uniformly scale a body about a point.
    fn scale(
        &mut self,
        body: &BodyHandle,
        origin: [f64; 3],
        factor: f64,
    ) -> Result<BodyHandle, HostError>;

    fn set_material(
        &mut self,
        body: &BodyHandle,
        library_id: &str,
        material_id: &str,
    ) -> Result<(), HostError>;

    fn set_appearance(
        &mut self,
        body: &BodyHandle,
        library_id: &str,
        appearance_id: &str,
    ) -> Result<(), HostError>;

    fn refresh_viewport(&mut self) -> Result<(), HostError>;

    /// Show a failure diagnostic to the user (the host's message box).
    fn report_failure(&mut self, message: &str);
}

/// Read-only queries on host state.
pub trait HostIntrospect {
    /// Modeling mode of the active design.
    fn design_mode(&self) -> Result<BuildMode, HostError>;

    /// Center of a sketch arc, in sketch coordinates.
    fn arc_center(&self, sketch: &SketchHandle, arc: HostId) -> Result<ProfilePoint, HostError>;

    /// List all edges of a body.
    fn list_edges(&self, body: &BodyHandle) -> Vec<HostId>;

    /// List all faces of a body.
    fn list_faces(&self, body: &BodyHandle) -> Vec<HostId>;

    /// Get the edges bounding a face, in host order.
    fn face_edges(&self, face: HostId) -> Vec<HostId>;

    fn edge_geometry(&self, edge: HostId) -> Result<EdgeGeometry, HostError>;

    fn face_geometry(&self, face: HostId) -> Result<SurfaceGeometry, HostError>;

    /// Name of the host's default metric thread family.
    fn default_thread_family(&self) -> Result<String, HostError>;

    /// Catalog entries for a nominal diameter within a thread family.
    fn query_thread_catalog(
        &self,
        nominal_diameter: f64,
        family: &str,
    ) -> Result<ThreadCatalog, HostError>;
}
