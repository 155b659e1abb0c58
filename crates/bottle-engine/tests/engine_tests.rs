use approx::assert_relative_eq;
use bottle_engine::{
    build_bottle, build_bottle_with_id, run_script, BuildConfig, BuildStep, ConfigError,
    EngineError, ThreadPolicy,
};
use bottle_types::{BuildMode, SegmentKind, ThreadCatalog, NEAR_ZERO};
use cad_host::{HostCallKind, HostError, HostIntrospect, MockHost};
use uuid::Uuid;

/// Feature-level calls, leaving out individual sketch entities.
fn feature_calls(host: &MockHost) -> Vec<HostCallKind> {
    host.call_kinds()
        .into_iter()
        .filter(|k| {
            !matches!(
                k,
                HostCallKind::AddLine
                    | HostCallKind::AddArc
                    | HostCallKind::AddConstraint
                    | HostCallKind::AddDistanceDimension
                    | HostCallKind::AddRadialDimension
            )
        })
        .collect()
}

fn skip_thread() -> BuildConfig {
    BuildConfig {
        thread_policy: ThreadPolicy::Skip,
        ..BuildConfig::default()
    }
}

// ── Happy path ─────────────────────────────────────────────────────────────

#[test]
fn default_build_runs_every_step_in_order() {
    let mut host = MockHost::new();
    let report = build_bottle(&mut host, &BuildConfig::default()).unwrap();

    assert_eq!(
        feature_calls(&host),
        vec![
            HostCallKind::CreateComponent,
            HostCallKind::CreateSketch,
            HostCallKind::Revolve,
            HostCallKind::Fillet,
            HostCallKind::Shell,
            HostCallKind::ApplyThread,
            HostCallKind::Scale,
            HostCallKind::SetMaterial,
            HostCallKind::SetAppearance,
            HostCallKind::RefreshViewport,
        ]
    );
    assert_eq!(
        report.steps,
        vec![
            BuildStep::ReadDesignMode,
            BuildStep::CreateComponent,
            BuildStep::BuildProfile,
            BuildStep::Sketch,
            BuildStep::Revolve,
            BuildStep::Fillet,
            BuildStep::Shell,
            BuildStep::Thread,
            BuildStep::Scale,
            BuildStep::Material,
            BuildStep::Appearance,
            BuildStep::RefreshViewport,
        ]
    );
    assert!(report.warnings.is_empty());
    assert_eq!(report.mode, BuildMode::Parametric);
    assert_eq!(host.viewport_refreshes(), 1);
    assert!(host.failure_reports().is_empty());
}

#[test]
fn default_build_threads_neck_with_closest_pitch() {
    let mut host = MockHost::new();
    let report = build_bottle(&mut host, &BuildConfig::default()).unwrap();

    let thread = report.thread.expect("thread applied");
    assert_eq!(thread.designation, "M5.6x0.45");
    assert_eq!(thread.thread_class, "6g");
    assert_eq!(thread.family, cad_host::DEFAULT_THREAD_FAMILY);
    assert!(thread.external);
    assert_eq!(host.threads_on(&report.body), &[thread]);
}

#[test]
fn default_build_profile_matches_dimensions() {
    let mut host = MockHost::new();
    let report = build_bottle(&mut host, &BuildConfig::default()).unwrap();

    let upper = report.profile.segment(SegmentKind::UpperArc).unwrap();
    let lower = report.profile.segment(SegmentKind::LowerArc).unwrap();
    assert_relative_eq!(upper.end().x, 3.6, epsilon = 1e-9);
    assert_eq!(upper.end(), lower.start());
    assert_eq!(report.profile.segments.len(), 7);
}

#[test]
fn finished_body_is_scaled_and_dressed() {
    let mut host = MockHost::new();
    let report = build_bottle(&mut host, &BuildConfig::default()).unwrap();

    assert_eq!(host.material_of(&report.body), Some("PrismMaterial-006"));
    assert_eq!(host.appearance_of(&report.body), Some("Prism-154"));

    let neck = host
        .list_faces(&report.body)
        .into_iter()
        .filter_map(|f| host.face_geometry(f).unwrap().cylinder_radius())
        .any(|r| (r - 5.6).abs() < NEAR_ZERO);
    assert!(neck, "neck radius should be doubled");
}

#[test]
fn report_lists_selected_edges_and_faces() {
    let mut host = MockHost::new();
    let report = build_bottle(&mut host, &BuildConfig::default()).unwrap();

    // Base and shoulder share a radius of 3.2, one circle each.
    assert_eq!(report.filleted_edges.len(), 2);
    assert_eq!(report.removed_faces.len(), 1);
}

#[test]
fn direct_mode_build_completes() {
    let mut host = MockHost::new().with_design_mode(BuildMode::Direct);
    let report = build_bottle(&mut host, &BuildConfig::default()).unwrap();

    assert_eq!(report.mode, BuildMode::Direct);
    assert_eq!(host.count_calls(HostCallKind::AddRadialDimension), 0);
    assert!(report.thread.is_some());
}

#[test]
fn build_id_is_kept_in_report() {
    let id = Uuid::new_v4();
    let mut host = MockHost::new();
    let report = build_bottle_with_id(&mut host, &BuildConfig::default(), id).unwrap();
    assert_eq!(report.build_id, id);
}

#[test]
fn report_serializes_to_json() {
    let mut host = MockHost::new();
    let report = build_bottle(&mut host, &BuildConfig::default()).unwrap();

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["thread"]["designation"], "M5.6x0.45");
    assert_eq!(json["steps"].as_array().unwrap().len(), 12);
}

// ── Failures abort ─────────────────────────────────────────────────────────

#[test]
fn failure_stops_later_steps() {
    let mut host = MockHost::new().fail_on(HostCallKind::Shell);
    let err = build_bottle(&mut host, &BuildConfig::default()).unwrap_err();

    assert!(matches!(
        err,
        EngineError::HostOperationFailed {
            step: BuildStep::Shell,
            ..
        }
    ));
    let kinds = host.call_kinds();
    assert_eq!(kinds.last(), Some(&HostCallKind::Shell));
    assert_eq!(host.count_calls(HostCallKind::ApplyThread), 0);
    assert_eq!(host.count_calls(HostCallKind::SetMaterial), 0);
    assert_eq!(host.viewport_refreshes(), 0);
}

#[test]
fn missing_design_aborts_before_any_call() {
    let mut host = MockHost::new().without_active_design();
    let err = build_bottle(&mut host, &BuildConfig::default()).unwrap_err();

    assert!(matches!(
        err,
        EngineError::HostOperationFailed {
            step: BuildStep::ReadDesignMode,
            ..
        }
    ));
    assert_eq!(err.step(), Some(BuildStep::ReadDesignMode));
    assert!(host.calls().is_empty());
    assert!(err.to_string().contains(&HostError::NoActiveDesign.to_string()));
}

#[test]
fn degenerate_profile_is_reported_before_sketching() {
    let mut config = BuildConfig::default();
    // Neck reaches below the base and crosses the bottom line.
    config.dimensions.top_height = 30.0;
    let mut host = MockHost::new();

    let err = build_bottle(&mut host, &config).unwrap_err();
    assert!(matches!(err, EngineError::DegenerateGeometry { .. }));
    assert_eq!(host.count_calls(HostCallKind::CreateSketch), 0);
}

#[test]
fn invalid_config_is_rejected_up_front() {
    let mut config = BuildConfig::default();
    config.dimensions.scale_factor = 0.0;
    let mut host = MockHost::new();

    let err = build_bottle(&mut host, &config).unwrap_err();
    assert!(matches!(
        err,
        EngineError::InvalidConfig(ConfigError::InvalidValue { .. })
    ));
    assert!(host.calls().is_empty());
}

#[test]
fn unknown_material_fails_at_material_step() {
    let mut config = BuildConfig::default();
    config.materials.material_id = "PrismMaterial-999".to_string();
    let mut host = MockHost::new();

    let err = build_bottle(&mut host, &config).unwrap_err();
    assert_eq!(err.step(), Some(BuildStep::Material));
    assert_eq!(host.count_calls(HostCallKind::SetAppearance), 0);
}

// ── Thread policy ──────────────────────────────────────────────────────────

#[test]
fn missing_thread_data_aborts_by_default() {
    let config = BuildConfig {
        thread_family: Some("Whitworth".to_string()),
        ..BuildConfig::default()
    };
    let mut host = MockHost::new();

    let err = build_bottle(&mut host, &config).unwrap_err();
    assert!(matches!(err, EngineError::NoThreadDataAvailable { .. }));
    assert_eq!(host.count_calls(HostCallKind::ApplyThread), 0);
    assert_eq!(host.count_calls(HostCallKind::Scale), 0);
}

#[test]
fn skip_policy_finishes_without_thread() {
    let mut host = MockHost::new().with_thread_catalog(ThreadCatalog {
        default_designation: None,
        thread_class: String::new(),
        candidates: Vec::new(),
    });
    let report = build_bottle(&mut host, &skip_thread()).unwrap();

    assert!(report.thread.is_none());
    assert!(!report.steps.contains(&BuildStep::Thread));
    assert_eq!(report.warnings.len(), 1);
    assert!(report.warnings[0].starts_with("thread skipped"));
    assert_eq!(host.count_calls(HostCallKind::ApplyThread), 0);
    assert_eq!(host.count_calls(HostCallKind::Scale), 1);
    assert_eq!(host.material_of(&report.body), Some("PrismMaterial-006"));
}

#[test]
fn skip_policy_still_aborts_on_host_failure() {
    let mut host = MockHost::new().fail_on(HostCallKind::ApplyThread);
    let err = build_bottle(&mut host, &skip_thread()).unwrap_err();

    assert_eq!(err.step(), Some(BuildStep::Thread));
    assert_eq!(host.count_calls(HostCallKind::Scale), 0);
}

// ── Script entry ───────────────────────────────────────────────────────────

#[test]
fn run_script_reports_failure_to_host() {
    let mut host = MockHost::new().fail_on(HostCallKind::Revolve);
    let message = run_script(&mut host, &BuildConfig::default()).unwrap_err();

    assert!(message.starts_with("Failed:\n"));
    assert!(message.contains("revolve"));
    assert_eq!(host.failure_reports(), &[message]);
}

#[test]
fn run_script_success_reports_nothing() {
    let mut host = MockHost::new();
    let report = run_script(&mut host, &BuildConfig::default()).unwrap();

    assert!(report.thread.is_some());
    assert!(host.failure_reports().is_empty());
}

#[test]
fn config_from_json_drives_build() {
    let json = r#"{
        "format": "bottle-build",
        "version": 1,
        "dimensions": { "thread_pitch": 0.7 },
        "materials": { "material_id": "PrismMaterial-018" }
    }"#;
    let config = BuildConfig::from_json(json).unwrap();
    let mut host = MockHost::new();
    let report = build_bottle(&mut host, &config).unwrap();

    assert_eq!(report.thread.unwrap().designation, "M5.6x0.75");
    assert_eq!(host.material_of(&report.body), Some("PrismMaterial-018"));
}
