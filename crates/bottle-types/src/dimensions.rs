use serde::{Deserialize, Serialize};

/// Named lengths that fully describe one bottle. Unit: cm.
///
/// Read-only for the duration of a build. Every field must be strictly
/// positive and finite; see [`DimensionSet::first_invalid`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DimensionSet {
    /// Total height along the revolve axis.
    pub height: f64,
    /// Radius of the neck (the threaded part).
    pub top_width: f64,
    /// Length of the neck.
    pub top_height: f64,
    /// Width of the ledge between neck and shoulder.
    pub body_top_width: f64,
    /// Radius of the base.
    pub bottom_width: f64,
    /// Vertical distance from the top of the neck to the upper arc center.
    pub upper_arc_center_to_top: f64,
    pub upper_arc_radius: f64,
    pub lower_arc_radius: f64,
    pub fillet_radius: f64,
    /// Wall thickness left by the shell.
    pub shell_thickness: f64,
    /// Desired thread pitch; the closest catalog entry is used.
    pub thread_pitch: f64,
    /// Uniform scale applied to the finished body.
    pub scale_factor: f64,
}

impl Default for DimensionSet {
    fn default() -> Self {
        Self {
            height: 21.0,
            top_width: 2.8,
            top_height: 1.9,
            body_top_width: 0.4,
            bottom_width: 3.2,
            upper_arc_center_to_top: 4.5,
            upper_arc_radius: 16.0,
            lower_arc_radius: 15.0,
            fillet_radius: 0.5,
            shell_thickness: 0.3,
            thread_pitch: 0.4,
            scale_factor: 2.0,
        }
    }
}

impl DimensionSet {
    /// All fields paired with their names, in declaration order.
    pub fn named_values(&self) -> [(&'static str, f64); 12] {
        [
            ("height", self.height),
            ("top_width", self.top_width),
            ("top_height", self.top_height),
            ("body_top_width", self.body_top_width),
            ("bottom_width", self.bottom_width),
            ("upper_arc_center_to_top", self.upper_arc_center_to_top),
            ("upper_arc_radius", self.upper_arc_radius),
            ("lower_arc_radius", self.lower_arc_radius),
            ("fillet_radius", self.fillet_radius),
            ("shell_thickness", self.shell_thickness),
            ("thread_pitch", self.thread_pitch),
            ("scale_factor", self.scale_factor),
        ]
    }

    /// The first field that is not a strictly positive finite number.
    pub fn first_invalid(&self) -> Option<(&'static str, f64)> {
        self.named_values()
            .into_iter()
            .find(|(_, v)| !(v.is_finite() && *v > 0.0))
    }

    /// Radius of the shoulder circle (end of the top body line).
    pub fn shoulder_radius(&self) -> f64 {
        self.top_width + self.body_top_width
    }

    /// Nominal thread diameter looked up in the host's thread catalog.
    pub fn nominal_thread_diameter(&self) -> f64 {
        self.top_width * 2.0
    }
}

/// Fixed arc offsets used in Direct mode. They reproduce the geometry of an
/// existing direct-edit model rather than deriving it from dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectArcOffsets {
    /// Upper arc interior point, relative to the shoulder point.
    pub upper_arc_mid: (f64, f64),
    /// Upper arc end point, relative to the shoulder point.
    pub upper_arc_end: (f64, f64),
    /// Lower arc interior point, absolute (relative to the origin).
    pub lower_arc_mid: (f64, f64),
}

impl Default for DirectArcOffsets {
    fn default() -> Self {
        Self {
            upper_arc_mid: (-0.18, -4.1),
            upper_arc_end: (0.46, -7.2),
            lower_arc_mid: (4.66, 5.9),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(DimensionSet::default().first_invalid(), None);
    }

    #[test]
    fn test_first_invalid_reports_field() {
        let dims = DimensionSet {
            top_height: 0.0,
            shell_thickness: -1.0,
            ..DimensionSet::default()
        };
        assert_eq!(dims.first_invalid(), Some(("top_height", 0.0)));
    }

    #[test]
    fn test_nan_is_invalid() {
        let dims = DimensionSet {
            scale_factor: f64::NAN,
            ..DimensionSet::default()
        };
        assert_eq!(dims.first_invalid().map(|(n, _)| n), Some("scale_factor"));
    }

    #[test]
    fn test_derived_radii() {
        let dims = DimensionSet::default();
        assert!((dims.shoulder_radius() - 3.2).abs() < 1e-12);
        assert!((dims.nominal_thread_diameter() - 5.6).abs() < 1e-12);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let dims: DimensionSet = serde_json::from_str(r#"{"height": 30.0}"#).unwrap();
        assert_eq!(dims.height, 30.0);
        assert_eq!(dims.top_width, 2.8);
    }
}
