//! Run configuration.
//!
//! A [`RunConfig`] is resolved once at startup (defaults, then an optional
//! JSON file, then command-line overrides) and passed by reference into every
//! pipeline entry point.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ValidationError};
use crate::filter::ThreeBandParams;
use crate::validation::validate_run_config;
use crate::voice::{AnalysisMode, VoiceParams};

/// Immutable options for one processing run.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// Filter branch parameters.
    pub filters: ThreeBandParams,
    /// Voice transform parameters.
    pub voice: VoiceParams,
    /// F0 estimation mode for the built-in analyzer.
    pub analysis_mode: AnalysisMode,
    /// Whether the presentation layer should offer the action prompt.
    pub interactive: bool,
    /// Whether the three filter branches run on separate threads.
    pub parallel: bool,
}

impl RunConfig {
    /// Parses a configuration from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON configuration file.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Checks every signal-independent constraint.
    ///
    /// Warnings are dropped; use [`validate_run_config`] to see them.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        validate_run_config(self).into_result().map(|_| ())
    }

    /// Serializes the configuration as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voice::NormalizationStrategy;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_empty_object_is_default() {
        let config = RunConfig::from_json_str("{}").unwrap();
        assert_eq!(config, RunConfig::default());
    }

    #[test]
    fn test_round_trip_preserves_values() {
        let mut config = RunConfig::default();
        config.analysis_mode = AnalysisMode::Harvest;
        config.voice.normalization = NormalizationStrategy::MinMax;
        config.interactive = true;

        let json = config.to_json_pretty().unwrap();
        assert_eq!(RunConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = RunConfig::from_json_str(r#"{"debug": true}"#).unwrap_err();
        assert!(matches!(err, ConfigError::JsonParse(_)));
    }

    #[test]
    fn test_validate_reports_every_error_with_path() {
        let config = RunConfig::from_json_str(
            r#"{"voice": {"pitch_factor": -1.0, "frame_period_ms": 0.0}}"#,
        )
        .unwrap();
        let errors = config.validate().unwrap_err();
        let paths: Vec<_> = errors
            .iter()
            .map(|e| (e.code.code(), e.path.as_deref()))
            .collect();
        assert_eq!(
            paths,
            vec![
                ("C010", Some("voice.pitch_factor")),
                ("C013", Some("voice.frame_period_ms")),
            ]
        );
        assert!(RunConfig::default().validate().is_ok());
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"analysis_mode": "harvest", "parallel": true}}"#).unwrap();

        let config = RunConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.analysis_mode, AnalysisMode::Harvest);
        assert!(config.parallel);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = RunConfig::from_json_file(Path::new("/nonexistent/sincvox.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
