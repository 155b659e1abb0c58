use cad_host::BodyHandle;
use tracing::{info, instrument};

use crate::host_ext::HostBundle;
use crate::types::{OpError, OpResult};

/// Uniformly scale the body about `origin`.
#[instrument(skip(kb))]
pub fn execute_scale(
    kb: &mut dyn HostBundle,
    body: &BodyHandle,
    origin: [f64; 3],
    factor: f64,
) -> Result<OpResult, OpError> {
    if !(factor.is_finite() && factor > 0.0) {
        return Err(OpError::invalid(format!("scale factor must be positive, got {}", factor)));
    }
    let scaled = kb.scale(body, origin, factor)?;
    info!(factor, body = scaled.0, "body scaled");
    Ok(OpResult::new(scaled, Vec::new()))
}
