use cad_host::BodyHandle;
use tracing::{info, instrument};

use crate::host_ext::HostBundle;
use crate::selection;
use crate::types::{OpError, OpResult};

/// Hollow the body, opening the planar face whose first edge is centered at
/// `top_center` (the top of the revolve axis).
#[instrument(skip(kb))]
pub fn execute_shell(
    kb: &mut dyn HostBundle,
    body: &BodyHandle,
    top_center: [f64; 3],
    thickness: f64,
    tol: f64,
) -> Result<OpResult, OpError> {
    if !(thickness.is_finite() && thickness > 0.0) {
        return Err(OpError::invalid("shell thickness must be positive"));
    }

    let face = selection::select_top_face(kb.as_introspect(), body, top_center, tol)?.ok_or(
        OpError::NoMatchingTopology {
            what: format!("planar face bounded by a circle centered at {:?}", top_center),
        },
    )?;

    let shelled = kb.shell(body, &[face], thickness)?;
    info!(?face, thickness, body = shelled.0, "body shelled");
    Ok(OpResult::new(shelled, vec![face]))
}
