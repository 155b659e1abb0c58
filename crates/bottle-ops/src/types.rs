use bottle_types::{SegmentKind, ThreadSpec};
use cad_host::{BodyHandle, HostError, HostId, SketchHandle};

/// Result of a host modeling step that produces a new body.
#[derive(Debug, Clone)]
pub struct OpResult {
    /// Handle to the body after the step. Ids from earlier handles are stale.
    pub body: BodyHandle,
    /// Entities the step selected on the input body (edges filleted, faces removed).
    pub affected: Vec<HostId>,
    pub diagnostics: Diagnostics,
}

impl OpResult {
    pub fn new(body: BodyHandle, affected: Vec<HostId>) -> Self {
        Self {
            body,
            affected,
            diagnostics: Diagnostics::default(),
        }
    }
}

/// Non-fatal diagnostics from an operation.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    pub warnings: Vec<String>,
}

/// The profile as placed in a host sketch.
#[derive(Debug, Clone)]
pub struct PlacedProfile {
    pub sketch: SketchHandle,
    /// Sketch curve for each segment, in walk order.
    pub curves: Vec<(SegmentKind, HostId)>,
    pub constraints: Vec<HostId>,
    pub dimensions: Vec<HostId>,
}

impl PlacedProfile {
    pub fn curve(&self, kind: SegmentKind) -> Option<HostId> {
        self.curves
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, id)| *id)
    }

    /// Like [`curve`](Self::curve), but a missing segment is an error.
    pub fn require(&self, kind: SegmentKind) -> Result<HostId, OpError> {
        self.curve(kind).ok_or(OpError::NoMatchingTopology {
            what: format!("{:?} curve in sketch", kind),
        })
    }
}

/// Result of threading the neck.
#[derive(Debug, Clone)]
pub struct ThreadResult {
    pub body: BodyHandle,
    pub face: HostId,
    pub spec: ThreadSpec,
}

/// Errors from profile construction and modeling operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum OpError {
    #[error("degenerate geometry: {reason}")]
    DegenerateGeometry { reason: String },

    #[error("no thread data available for nominal diameter {nominal_diameter}")]
    NoThreadDataAvailable { nominal_diameter: f64 },

    #[error("host operation failed: {0}")]
    HostOperationFailed(#[from] HostError),

    #[error("no matching topology: {what}")]
    NoMatchingTopology { what: String },

    #[error("invalid parameter: {reason}")]
    InvalidParameter { reason: String },
}

impl OpError {
    pub(crate) fn degenerate(reason: impl Into<String>) -> Self {
        OpError::DegenerateGeometry {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        OpError::InvalidParameter {
            reason: reason.into(),
        }
    }
}
