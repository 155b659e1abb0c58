use bottle_ops::DEFAULT_ARC_BIAS;
use bottle_types::{DimensionSet, DirectArcOffsets, NEAR_ZERO};
use serde::{Deserialize, Serialize};

/// Format identifier of a build configuration file.
pub const CONFIG_FORMAT: &str = "bottle-build";

/// Current configuration file version.
pub const CONFIG_VERSION: u32 = 1;

/// What to do when the neck cannot be threaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ThreadPolicy {
    /// Fail the build.
    #[default]
    Abort,
    /// Log a warning and finish the bottle without a thread.
    Skip,
}

/// Library and item ids for the finished body's material and appearance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialConfig {
    pub material_library_id: String,
    pub material_id: String,
    pub appearance_library_id: String,
    pub appearance_id: String,
}

impl Default for MaterialConfig {
    fn default() -> Self {
        Self {
            material_library_id: "C1EEA57C-3F56-45FC-B8CB-A9EC46A9994C".to_string(),
            material_id: "PrismMaterial-006".to_string(),
            appearance_library_id: "BA5EE55E-9982-449B-9D66-9F036540E140".to_string(),
            appearance_id: "Prism-154".to_string(),
        }
    }
}

/// Everything a build reads. Immutable once the build starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    pub dimensions: DimensionSet,
    pub direct_offsets: DirectArcOffsets,
    /// Seed offset for parametric arc interior points and radial dimension labels.
    pub arc_bias: f64,
    /// Tolerance for matching host radii and points.
    pub near_zero: f64,
    /// Thread family to query; the host's default metric family when unset.
    pub thread_family: Option<String>,
    pub thread_policy: ThreadPolicy,
    pub materials: MaterialConfig,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            dimensions: DimensionSet::default(),
            direct_offsets: DirectArcOffsets::default(),
            arc_bias: DEFAULT_ARC_BIAS,
            near_zero: NEAR_ZERO,
            thread_family: None,
            thread_policy: ThreadPolicy::default(),
            materials: MaterialConfig::default(),
        }
    }
}

/// On-disk shape: format header plus the flattened config.
#[derive(Debug, Deserialize)]
struct BuildConfigFile {
    format: String,
    version: u32,
    #[serde(flatten)]
    config: BuildConfig,
}

#[derive(Serialize)]
struct BuildConfigFileRef<'a> {
    format: &'a str,
    version: u32,
    #[serde(flatten)]
    config: &'a BuildConfig,
}

/// Errors while loading or validating a build configuration.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    ParseError(String),

    #[error("unknown config format: {0}")]
    UnknownFormat(String),

    #[error("config version {file_version} is newer than supported version {supported_version}")]
    FutureVersion {
        file_version: u32,
        supported_version: u32,
    },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    SerializeError(String),
}

impl BuildConfig {
    /// Parse and validate a configuration document.
    ///
    /// Every field except `format` and `version` may be omitted.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let file: BuildConfigFile =
            serde_json::from_str(json).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        if file.format != CONFIG_FORMAT {
            return Err(ConfigError::UnknownFormat(file.format));
        }
        if file.version > CONFIG_VERSION {
            return Err(ConfigError::FutureVersion {
                file_version: file.version,
                supported_version: CONFIG_VERSION,
            });
        }

        file.config.validate()?;
        Ok(file.config)
    }

    /// Serialize to a pretty-printed configuration document.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        let file = BuildConfigFileRef {
            format: CONFIG_FORMAT,
            version: CONFIG_VERSION,
            config: self,
        };
        serde_json::to_string_pretty(&file).map_err(|e| ConfigError::SerializeError(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some((field, value)) = self.dimensions.first_invalid() {
            return Err(invalid(
                &format!("dimensions.{}", field),
                format!("must be a positive number, got {}", value),
            ));
        }
        if !self.arc_bias.is_finite() {
            return Err(invalid("arc_bias", "must be finite"));
        }
        if !(self.near_zero.is_finite() && self.near_zero > 0.0) {
            return Err(invalid(
                "near_zero",
                format!("must be a positive number, got {}", self.near_zero),
            ));
        }
        if self.thread_family.as_deref().is_some_and(|f| f.trim().is_empty()) {
            return Err(invalid("thread_family", "must not be empty"));
        }
        let m = &self.materials;
        for (field, value) in [
            ("materials.material_library_id", &m.material_library_id),
            ("materials.material_id", &m.material_id),
            ("materials.appearance_library_id", &m.appearance_library_id),
            ("materials.appearance_id", &m.appearance_id),
        ] {
            if value.is_empty() {
                return Err(invalid(field, "must not be empty"));
            }
        }
        Ok(())
    }
}

fn invalid(field: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_script_constants() {
        let config = BuildConfig::default();
        assert_eq!(config.dimensions.height, 21.0);
        assert_eq!(config.arc_bias, 0.1);
        assert_eq!(config.near_zero, 1e-6);
        assert_eq!(config.thread_policy, ThreadPolicy::Abort);
        assert_eq!(config.materials.material_id, "PrismMaterial-006");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_minimal_document_uses_defaults() {
        let config = BuildConfig::from_json(r#"{"format":"bottle-build","version":1}"#).unwrap();
        assert_eq!(config, BuildConfig::default());
    }

    #[test]
    fn test_partial_document_overrides() {
        let json = r#"{
            "format": "bottle-build",
            "version": 1,
            "dimensions": { "height": 30.0, "thread_pitch": 0.5 },
            "thread_family": "ISO Metric profile",
            "thread_policy": { "type": "Skip" }
        }"#;
        let config = BuildConfig::from_json(json).unwrap();
        assert_eq!(config.dimensions.height, 30.0);
        assert_eq!(config.dimensions.thread_pitch, 0.5);
        assert_eq!(config.dimensions.top_width, 2.8);
        assert_eq!(config.thread_family.as_deref(), Some("ISO Metric profile"));
        assert_eq!(config.thread_policy, ThreadPolicy::Skip);
    }

    #[test]
    fn test_to_json_loads_back() {
        let mut config = BuildConfig::default();
        config.dimensions.scale_factor = 3.0;
        config.thread_policy = ThreadPolicy::Skip;
        let json = config.to_json().unwrap();
        assert!(json.contains("\"format\": \"bottle-build\""));
        assert_eq!(BuildConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_unknown_format() {
        let result = BuildConfig::from_json(r#"{"format":"teapot","version":1}"#);
        assert!(matches!(result, Err(ConfigError::UnknownFormat(f)) if f == "teapot"));
    }

    #[test]
    fn test_future_version() {
        let result = BuildConfig::from_json(r#"{"format":"bottle-build","version":7}"#);
        assert!(matches!(
            result,
            Err(ConfigError::FutureVersion {
                file_version: 7,
                supported_version: 1
            })
        ));
    }

    #[test]
    fn test_parse_error() {
        let result = BuildConfig::from_json("{ not json");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_invalid_dimension_reported_by_name() {
        let json = r#"{"format":"bottle-build","version":1,"dimensions":{"shell_thickness":-0.3}}"#;
        let result = BuildConfig::from_json(json);
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "dimensions.shell_thickness"
        ));
    }

    #[test]
    fn test_empty_thread_family_rejected() {
        let config = BuildConfig {
            thread_family: Some("  ".to_string()),
            ..BuildConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidValue { .. })));
    }
}
