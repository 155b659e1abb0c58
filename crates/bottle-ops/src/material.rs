use cad_host::BodyHandle;
use tracing::{info, instrument};

use crate::host_ext::HostBundle;
use crate::types::OpError;

/// Assign a physical material looked up by library and item id.
#[instrument(skip(kb))]
pub fn execute_material(
    kb: &mut dyn HostBundle,
    body: &BodyHandle,
    library_id: &str,
    material_id: &str,
) -> Result<(), OpError> {
    kb.set_material(body, library_id, material_id)?;
    info!(material_id, "material assigned");
    Ok(())
}

/// Assign a render appearance looked up by library and item id.
#[instrument(skip(kb))]
pub fn execute_appearance(
    kb: &mut dyn HostBundle,
    body: &BodyHandle,
    library_id: &str,
    appearance_id: &str,
) -> Result<(), OpError> {
    kb.set_appearance(body, library_id, appearance_id)?;
    info!(appearance_id, "appearance assigned");
    Ok(())
}
