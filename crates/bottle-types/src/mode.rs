use serde::{Deserialize, Serialize};

/// Modeling mode of the host design, read once at the start of a build.
///
/// Selects which upper/lower arc formulas the profile uses and whether the
/// arc dimensions are driven to their configured values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BuildMode {
    /// No history; arcs reproduce fixed direct-edit geometry.
    Direct,
    /// History-based; arcs are derived from dimensions and then driven by
    /// radial dimensions.
    Parametric,
}

impl BuildMode {
    /// Whether sketch dimensions are driven to configured values.
    pub fn drives_dimensions(self) -> bool {
        matches!(self, BuildMode::Parametric)
    }
}
