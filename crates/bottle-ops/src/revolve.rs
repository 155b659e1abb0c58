use bottle_types::SegmentKind;
use tracing::{info, instrument};

use crate::host_ext::HostBundle;
use crate::types::{OpError, OpResult, PlacedProfile};

/// Revolve the sketch's first profile a full turn about the height line.
#[instrument(skip(kb, placed), fields(sketch = placed.sketch.0))]
pub fn execute_revolve(kb: &mut dyn HostBundle, placed: &PlacedProfile) -> Result<OpResult, OpError> {
    let axis = placed.require(SegmentKind::HeightLine)?;
    let body = kb.revolve(&placed.sketch, 0, axis, true)?;

    let faces = kb.list_faces(&body);
    info!(body = body.0, faces = faces.len(), "profile revolved");
    Ok(OpResult::new(body, faces))
}
