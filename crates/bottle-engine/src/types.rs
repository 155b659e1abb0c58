use std::fmt;

use bottle_ops::OpError;
use bottle_types::{BuildMode, ProfileOutline, ThreadSpec};
use cad_host::{BodyHandle, HostId};
use serde::Serialize;
use uuid::Uuid;

use crate::config::ConfigError;

/// Steps of a bottle build, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BuildStep {
    ReadDesignMode,
    CreateComponent,
    BuildProfile,
    Sketch,
    Revolve,
    Fillet,
    Shell,
    Thread,
    Scale,
    Material,
    Appearance,
    RefreshViewport,
}

impl fmt::Display for BuildStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BuildStep::ReadDesignMode => "read design mode",
            BuildStep::CreateComponent => "create component",
            BuildStep::BuildProfile => "build profile",
            BuildStep::Sketch => "sketch",
            BuildStep::Revolve => "revolve",
            BuildStep::Fillet => "fillet",
            BuildStep::Shell => "shell",
            BuildStep::Thread => "thread",
            BuildStep::Scale => "scale",
            BuildStep::Material => "material",
            BuildStep::Appearance => "appearance",
            BuildStep::RefreshViewport => "refresh viewport",
        };
        f.write_str(name)
    }
}

/// Outcome of a successful build.
#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
    pub build_id: Uuid,
    pub mode: BuildMode,
    pub profile: ProfileOutline,
    /// The finished, scaled body.
    pub body: BodyHandle,
    /// Edges rounded by the fillet, as ids on the revolved body.
    pub filleted_edges: Vec<HostId>,
    /// Faces opened by the shell, as ids on the filleted body.
    pub removed_faces: Vec<HostId>,
    /// `None` when the thread was skipped.
    pub thread: Option<ThreadSpec>,
    pub steps: Vec<BuildStep>,
    pub warnings: Vec<String>,
}

/// Errors that abort a build.
#[derive(Debug, Clone, thiserror::Error)]
pub enum EngineError {
    #[error("degenerate geometry: {reason}")]
    DegenerateGeometry { reason: String },

    #[error("no thread data available for nominal diameter {nominal_diameter}")]
    NoThreadDataAvailable { nominal_diameter: f64 },

    #[error("host operation failed at {step}: {reason}")]
    HostOperationFailed { step: BuildStep, reason: String },

    #[error("invalid parameter at {step}: {reason}")]
    InvalidParameter { step: BuildStep, reason: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}

impl EngineError {
    /// Classify an op failure that happened during `step`.
    pub fn from_op(step: BuildStep, err: OpError) -> Self {
        match err {
            OpError::DegenerateGeometry { reason } => EngineError::DegenerateGeometry { reason },
            OpError::NoThreadDataAvailable { nominal_diameter } => {
                EngineError::NoThreadDataAvailable { nominal_diameter }
            }
            OpError::HostOperationFailed(host) => EngineError::HostOperationFailed {
                step,
                reason: host.to_string(),
            },
            OpError::NoMatchingTopology { what } => EngineError::HostOperationFailed {
                step,
                reason: format!("no matching {}", what),
            },
            OpError::InvalidParameter { reason } => EngineError::InvalidParameter { step, reason },
        }
    }

    /// Step the failure happened at, when known.
    pub fn step(&self) -> Option<BuildStep> {
        match self {
            EngineError::HostOperationFailed { step, .. }
            | EngineError::InvalidParameter { step, .. } => Some(*step),
            EngineError::DegenerateGeometry { .. } => Some(BuildStep::BuildProfile),
            EngineError::NoThreadDataAvailable { .. } => Some(BuildStep::Thread),
            EngineError::InvalidConfig(_) => None,
        }
    }
}

/// Adapter for `map_err`: tags any op-level or host-level error with its step.
pub(crate) fn at<E: Into<OpError>>(step: BuildStep) -> impl FnOnce(E) -> EngineError {
    move |err| EngineError::from_op(step, err.into())
}
