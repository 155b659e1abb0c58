use serde::{Deserialize, Serialize};

/// One entry of the host's thread-standard catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadCandidate {
    /// Standard designation, e.g. `M5.6x0.45`.
    pub designation: String,
    pub pitch: f64,
}

impl ThreadCandidate {
    pub fn new(designation: impl Into<String>, pitch: f64) -> Self {
        Self {
            designation: designation.into(),
            pitch,
        }
    }
}

/// Catalog answer for one nominal diameter and thread family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadCatalog {
    /// The host's recommended designation, if it has one for this size.
    pub default_designation: Option<String>,
    /// Tolerance class, e.g. `6g`.
    pub thread_class: String,
    /// All designations for the same nominal size, in catalog order.
    pub candidates: Vec<ThreadCandidate>,
}

/// The thread that will be applied to the neck face.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadSpec {
    pub family: String,
    pub designation: String,
    pub thread_class: String,
    pub pitch: f64,
    /// External (male) thread.
    pub external: bool,
}
