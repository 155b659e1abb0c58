use bottle_types::{ThreadCandidate, ThreadCatalog};
use tracing::debug;

use crate::types::OpError;

/// Pick the catalog entry whose pitch is closest to `target_pitch`.
///
/// The scan starts from the host's recommended designation (the first
/// candidate when the host has none) and only replaces the current best on a
/// strictly smaller deviation, so ties keep the earlier choice.
pub fn select_thread_pitch(
    target_pitch: f64,
    nominal_diameter: f64,
    catalog: &ThreadCatalog,
) -> Result<ThreadCandidate, OpError> {
    if !(target_pitch.is_finite() && target_pitch > 0.0) {
        return Err(OpError::invalid(format!(
            "thread pitch must be positive, got {}",
            target_pitch
        )));
    }
    if !(nominal_diameter.is_finite() && nominal_diameter > 0.0) {
        return Err(OpError::invalid(format!(
            "nominal diameter must be positive, got {}",
            nominal_diameter
        )));
    }

    let first = catalog
        .candidates
        .first()
        .ok_or(OpError::NoThreadDataAvailable { nominal_diameter })?;
    let default = catalog
        .default_designation
        .as_deref()
        .and_then(|d| catalog.candidates.iter().find(|c| c.designation == d))
        .unwrap_or(first);

    let mut best = default;
    let mut min_gap = (best.pitch - target_pitch).abs();
    for candidate in &catalog.candidates {
        let gap = (candidate.pitch - target_pitch).abs();
        if gap < min_gap {
            best = candidate;
            min_gap = gap;
        }
    }

    debug!(
        designation = %best.designation,
        pitch = best.pitch,
        gap = min_gap,
        "closest thread pitch"
    );
    Ok(best.clone())
}
