use serde::{Deserialize, Serialize};

// Re-export shared types from bottle-types
pub use bottle_types::{EdgeGeometry, SurfaceGeometry};

/// Transient host-side entity identifier (sketch curve, constraint,
/// dimension, edge or face). Valid only for the current host session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HostId(pub u64);

/// Opaque handle to a body in the host document.
/// Every modeling step returns a fresh handle; ids from earlier handles are stale.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BodyHandle(pub u64);

/// Opaque handle to a sketch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SketchHandle(pub u64);

/// Opaque handle to the component that owns the bottle's sketch and features.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComponentHandle(pub u64);

/// A point owned by a sketch curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointRef {
    Start(HostId),
    End(HostId),
    /// Center of an arc.
    Center(HostId),
}

/// Geometric sketch constraints the bottle profile uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SketchConstraint {
    /// Pin a point in place.
    Fixed { point: PointRef },
    Horizontal { line: HostId },
    Perpendicular { a: HostId, b: HostId },
}

/// How a distance dimension is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DimensionOrientation {
    Aligned,
    Vertical,
}

/// Errors reported by the host.
#[derive(Debug, Clone, thiserror::Error)]
pub enum HostError {
    #[error("no active design document")]
    NoActiveDesign,

    #[error("entity not found: {id:?}")]
    EntityNotFound { id: HostId },

    #[error("sketch operation failed: {reason}")]
    SketchFailed { reason: String },

    #[error("{feature} failed: {reason}")]
    FeatureFailed { feature: String, reason: String },

    #[error("library item not found: {item} in {library}")]
    LibraryItemNotFound { library: String, item: String },

    #[error("host error: {message}")]
    Other { message: String },
}

impl HostError {
    pub(crate) fn feature(feature: &str, reason: impl Into<String>) -> Self {
        HostError::FeatureFailed {
            feature: feature.to_string(),
            reason: reason.into(),
        }
    }
}

// Custom Serialize/Deserialize for HostId so reports can carry ids as plain numbers
impl Serialize for HostId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for HostId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u64::deserialize(deserializer).map(HostId)
    }
}
