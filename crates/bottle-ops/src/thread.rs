use bottle_types::{DimensionSet, ThreadSpec};
use cad_host::BodyHandle;
use tracing::{info, instrument};

use crate::host_ext::HostBundle;
use crate::selection;
use crate::thread_pitch::select_thread_pitch;
use crate::types::{OpError, ThreadResult};

/// What to thread and how.
#[derive(Debug, Clone, PartialEq)]
pub struct ThreadRequest {
    pub target_pitch: f64,
    pub nominal_diameter: f64,
    /// Radius of the cylindrical face to thread.
    pub face_radius: f64,
    /// Thread family; the host's default metric family when `None`.
    pub family: Option<String>,
    pub modeled: bool,
    pub tol: f64,
}

impl ThreadRequest {
    /// A modeled external thread on the neck.
    pub fn for_neck(dims: &DimensionSet, tol: f64) -> Self {
        Self {
            target_pitch: dims.thread_pitch,
            nominal_diameter: dims.nominal_thread_diameter(),
            face_radius: dims.top_width,
            family: None,
            modeled: true,
            tol,
        }
    }

    pub fn with_family(mut self, family: Option<String>) -> Self {
        self.family = family;
        self
    }
}

/// Thread the cylindrical face of `request.face_radius` with the catalog
/// designation closest to the target pitch.
#[instrument(skip(kb))]
pub fn execute_thread(
    kb: &mut dyn HostBundle,
    body: &BodyHandle,
    request: &ThreadRequest,
) -> Result<ThreadResult, OpError> {
    let face = selection::select_cylinder_face(
        kb.as_introspect(),
        body,
        request.face_radius,
        request.tol,
    )?
    .ok_or(OpError::NoMatchingTopology {
        what: format!("cylindrical face with radius {}", request.face_radius),
    })?;

    let family = match &request.family {
        Some(family) => family.clone(),
        None => kb.default_thread_family()?,
    };
    let catalog = kb.query_thread_catalog(request.nominal_diameter, &family)?;
    let choice = select_thread_pitch(request.target_pitch, request.nominal_diameter, &catalog)?;

    let spec = ThreadSpec {
        family,
        designation: choice.designation,
        thread_class: catalog.thread_class,
        pitch: choice.pitch,
        external: true,
    };
    let threaded = kb.apply_thread(body, face, &spec, request.modeled)?;
    info!(
        designation = %spec.designation,
        class = %spec.thread_class,
        body = threaded.0,
        "thread applied"
    );

    Ok(ThreadResult {
        body: threaded,
        face,
        spec,
    })
}
