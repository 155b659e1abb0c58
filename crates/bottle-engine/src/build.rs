use bottle_ops::{
    execute_appearance, execute_fillet, execute_material, execute_revolve, execute_scale,
    execute_shell, execute_sketch, execute_thread, HostBundle, OpError, ProfileBuilder,
    ThreadRequest,
};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::config::{BuildConfig, ThreadPolicy};
use crate::types::{at, BuildReport, BuildStep, EngineError};

/// Build the bottle in the host's active design.
///
/// Runs the whole pipeline once, in order, stopping at the first failure.
/// Nothing is rolled back: whatever the host created before the failure
/// stays in the design.
pub fn build_bottle(
    kb: &mut dyn HostBundle,
    config: &BuildConfig,
) -> Result<BuildReport, EngineError> {
    build_bottle_with_id(kb, config, Uuid::new_v4())
}

/// [`build_bottle`] with a caller-chosen build id.
#[instrument(skip(kb, config))]
pub fn build_bottle_with_id(
    kb: &mut dyn HostBundle,
    config: &BuildConfig,
    build_id: Uuid,
) -> Result<BuildReport, EngineError> {
    config.validate()?;
    let dims = config.dimensions;
    let tol = config.near_zero;
    let mut steps = Vec::new();
    let mut warnings = Vec::new();

    let mode = kb.design_mode().map_err(at(BuildStep::ReadDesignMode))?;
    steps.push(BuildStep::ReadDesignMode);
    info!(?mode, "design mode read");

    let component = kb.create_component().map_err(at(BuildStep::CreateComponent))?;
    steps.push(BuildStep::CreateComponent);

    let outline = ProfileBuilder::new(&dims)
        .with_direct_offsets(config.direct_offsets)
        .with_arc_bias(config.arc_bias)
        .with_tolerance(tol)
        .build(mode)
        .map_err(at(BuildStep::BuildProfile))?;
    steps.push(BuildStep::BuildProfile);

    let placed = execute_sketch(kb, &component, &outline, mode, &dims, config.arc_bias)
        .map_err(at(BuildStep::Sketch))?;
    steps.push(BuildStep::Sketch);

    let revolved = execute_revolve(kb, &placed).map_err(at(BuildStep::Revolve))?;
    steps.push(BuildStep::Revolve);

    let filleted = execute_fillet(
        kb,
        &revolved.body,
        &[dims.bottom_width, dims.shoulder_radius()],
        dims.fillet_radius,
        tol,
    )
    .map_err(at(BuildStep::Fillet))?;
    warnings.extend(filleted.diagnostics.warnings.iter().cloned());
    steps.push(BuildStep::Fillet);

    let top_center = outline
        .top_center()
        .ok_or_else(|| EngineError::DegenerateGeometry {
            reason: "profile has no height line".to_string(),
        })?
        .to_3d();
    let shelled = execute_shell(kb, &filleted.body, top_center, dims.shell_thickness, tol)
        .map_err(at(BuildStep::Shell))?;
    warnings.extend(shelled.diagnostics.warnings.iter().cloned());
    steps.push(BuildStep::Shell);

    let request =
        ThreadRequest::for_neck(&dims, tol).with_family(config.thread_family.clone());
    let (body, thread) = match execute_thread(kb, &shelled.body, &request) {
        Ok(result) => {
            steps.push(BuildStep::Thread);
            (result.body, Some(result.spec))
        }
        Err(
            err @ (OpError::NoThreadDataAvailable { .. } | OpError::NoMatchingTopology { .. }),
        ) if config.thread_policy == ThreadPolicy::Skip => {
            warn!(%err, "thread skipped");
            warnings.push(format!("thread skipped: {}", err));
            (shelled.body, None)
        }
        Err(err) => return Err(EngineError::from_op(BuildStep::Thread, err)),
    };

    let scaled = execute_scale(kb, &body, [0.0; 3], dims.scale_factor)
        .map_err(at(BuildStep::Scale))?;
    steps.push(BuildStep::Scale);
    let body = scaled.body;

    let materials = &config.materials;
    execute_material(
        kb,
        &body,
        &materials.material_library_id,
        &materials.material_id,
    )
    .map_err(at(BuildStep::Material))?;
    steps.push(BuildStep::Material);

    execute_appearance(
        kb,
        &body,
        &materials.appearance_library_id,
        &materials.appearance_id,
    )
    .map_err(at(BuildStep::Appearance))?;
    steps.push(BuildStep::Appearance);

    kb.refresh_viewport().map_err(at(BuildStep::RefreshViewport))?;
    steps.push(BuildStep::RefreshViewport);

    debug!(steps = steps.len(), warnings = warnings.len(), "pipeline finished");
    info!(body = body.0, threaded = thread.is_some(), "build complete");

    Ok(BuildReport {
        build_id,
        mode,
        profile: outline,
        body,
        filleted_edges: filleted.affected,
        removed_faces: shelled.affected,
        thread,
        steps,
        warnings,
    })
}
