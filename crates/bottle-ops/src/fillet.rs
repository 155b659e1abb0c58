use bottle_types::approx_eq;
use cad_host::BodyHandle;
use tracing::{info, instrument, warn};

use crate::host_ext::HostBundle;
use crate::selection;
use crate::types::{OpError, OpResult};

/// Round every circular edge whose radius matches one of `target_radii`.
///
/// Fails with `NoMatchingTopology` when no edge matches. A target that
/// matches nothing while others do is reported as a warning.
#[instrument(skip(kb))]
pub fn execute_fillet(
    kb: &mut dyn HostBundle,
    body: &BodyHandle,
    target_radii: &[f64],
    radius: f64,
    tol: f64,
) -> Result<OpResult, OpError> {
    if !(radius.is_finite() && radius > 0.0) {
        return Err(OpError::invalid("fillet radius must be positive"));
    }

    let edges = selection::body_edges(kb.as_introspect(), body)?;
    let selected = selection::edges_matching_radii(&edges, target_radii, tol);
    if selected.is_empty() {
        return Err(OpError::NoMatchingTopology {
            what: format!("edges with radius {:?}", target_radii),
        });
    }

    let mut warnings = Vec::new();
    for (i, target) in target_radii.iter().enumerate() {
        // Equal targets are reported once.
        if target_radii[..i].iter().any(|t| approx_eq(*t, *target, tol)) {
            continue;
        }
        if selection::edges_matching_radii(&edges, &[*target], tol).is_empty() {
            warn!(target, "no edge matches fillet radius target");
            warnings.push(format!("no edge with radius {} to fillet", target));
        }
    }

    let filleted = kb.fillet(body, &selected, radius)?;
    info!(edges = selected.len(), radius, body = filleted.0, "edges filleted");

    let mut result = OpResult::new(filleted, selected);
    result.diagnostics.warnings = warnings;
    Ok(result)
}
