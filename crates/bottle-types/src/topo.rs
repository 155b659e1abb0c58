use serde::{Deserialize, Serialize};

/// Underlying curve of a body edge, as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EdgeGeometry {
    /// Full or partial circle. Edges of a revolved body are circles about the axis.
    Circle {
        center: [f64; 3],
        normal: [f64; 3],
        radius: f64,
    },
    Line {
        start: [f64; 3],
        end: [f64; 3],
    },
    /// Helix, spline, or anything the selection logic does not inspect.
    Other,
}

impl EdgeGeometry {
    /// Radius for circular edges.
    pub fn radius(&self) -> Option<f64> {
        match self {
            EdgeGeometry::Circle { radius, .. } => Some(*radius),
            _ => None,
        }
    }

    /// Center for circular edges.
    pub fn center(&self) -> Option<[f64; 3]> {
        match self {
            EdgeGeometry::Circle { center, .. } => Some(*center),
            _ => None,
        }
    }
}

/// Underlying surface of a body face, as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SurfaceGeometry {
    Plane {
        origin: [f64; 3],
        normal: [f64; 3],
    },
    Cylinder {
        origin: [f64; 3],
        axis: [f64; 3],
        radius: f64,
    },
    Cone {
        origin: [f64; 3],
        axis: [f64; 3],
        radius: f64,
        half_angle: f64,
    },
    Torus {
        origin: [f64; 3],
        axis: [f64; 3],
        major_radius: f64,
        minor_radius: f64,
    },
    Other,
}

impl SurfaceGeometry {
    pub fn is_planar(&self) -> bool {
        matches!(self, SurfaceGeometry::Plane { .. })
    }

    /// Radius for cylindrical faces.
    pub fn cylinder_radius(&self) -> Option<f64> {
        match self {
            SurfaceGeometry::Cylinder { radius, .. } => Some(*radius),
            _ => None,
        }
    }
}

/// Whether two 3D points coincide within `tol` on every axis.
pub fn points_coincide(a: [f64; 3], b: [f64; 3], tol: f64) -> bool {
    (0..3).all(|i| (a[i] - b[i]).abs() < tol)
}
