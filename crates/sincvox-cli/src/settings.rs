//! Run configuration resolution.
//!
//! A run starts from [`RunConfig::default`], replaces it with a JSON file when
//! one is given, and finally applies command-line overrides. The resolved
//! configuration is immutable for the rest of the run.

use std::path::Path;

use anyhow::{Context, Result};
use sincvox_spec::{AnalysisMode, NormalizationStrategy, RunConfig};

/// Normalization choice as spelled on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizeChoice {
    /// `min-max`
    MinMax,
    /// `fixed`
    Fixed,
}

impl NormalizeChoice {
    /// Parses a command-line value.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "min-max" => Some(NormalizeChoice::MinMax),
            "fixed" => Some(NormalizeChoice::Fixed),
            _ => None,
        }
    }
}

/// Parses an `--analysis` value.
pub fn parse_analysis_mode(value: &str) -> Option<AnalysisMode> {
    match value {
        "dio" => Some(AnalysisMode::DioStonemask),
        "harvest" => Some(AnalysisMode::Harvest),
        _ => None,
    }
}

/// Values given on the command line that replace loaded configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ConfigOverrides {
    /// `--pitch`
    pub pitch_factor: Option<f64>,
    /// `--normalize`
    pub normalize: Option<NormalizeChoice>,
    /// `--divisor`
    pub divisor: Option<f64>,
    /// `--analysis`
    pub analysis_mode: Option<AnalysisMode>,
    /// `--parallel` (only ever switches parallel filtering on)
    pub parallel: bool,
    /// `--interactive` (only ever switches the prompt on)
    pub interactive: bool,
}

impl ConfigOverrides {
    /// Applies the overrides to a loaded configuration.
    ///
    /// A divisor without `--normalize` implies fixed-scale normalization.
    /// `--normalize fixed` without a divisor keeps the loaded divisor, or
    /// the default one when the loaded strategy was min-max.
    pub fn apply(&self, mut config: RunConfig) -> RunConfig {
        if let Some(pitch) = self.pitch_factor {
            config.voice.pitch_factor = pitch;
        }

        let loaded_divisor = match config.voice.normalization {
            NormalizationStrategy::FixedScale { divisor } => Some(divisor),
            NormalizationStrategy::MinMax => None,
        };
        match (self.normalize, self.divisor) {
            (Some(NormalizeChoice::MinMax), _) => {
                config.voice.normalization = NormalizationStrategy::MinMax;
            }
            (Some(NormalizeChoice::Fixed), divisor) | (None, divisor @ Some(_)) => {
                let divisor = divisor.or(loaded_divisor).unwrap_or(1.0);
                config.voice.normalization = NormalizationStrategy::FixedScale { divisor };
            }
            (None, None) => {}
        }

        if let Some(mode) = self.analysis_mode {
            config.analysis_mode = mode;
        }
        config.parallel |= self.parallel;
        config.interactive |= self.interactive;
        config
    }
}

/// Loads the configuration file (if any) and applies `overrides`.
pub fn resolve_run_config(
    config_path: Option<&Path>,
    overrides: &ConfigOverrides,
) -> Result<RunConfig> {
    let base = match config_path {
        Some(path) => RunConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => RunConfig::default(),
    };
    Ok(overrides.apply(base))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_no_overrides_keeps_defaults() {
        let config = resolve_run_config(None, &ConfigOverrides::default()).unwrap();
        assert_eq!(config, RunConfig::default());
    }

    #[test]
    fn test_overrides_replace_file_values() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("run.json");
        std::fs::write(
            &path,
            r#"{ "voice": { "pitch_factor": 1.5 }, "analysis_mode": "harvest" }"#,
        )
        .unwrap();

        let from_file = resolve_run_config(Some(&path), &ConfigOverrides::default()).unwrap();
        assert_eq!(from_file.voice.pitch_factor, 1.5);
        assert_eq!(from_file.analysis_mode, AnalysisMode::Harvest);

        let overrides = ConfigOverrides {
            pitch_factor: Some(0.5),
            analysis_mode: Some(AnalysisMode::DioStonemask),
            parallel: true,
            ..Default::default()
        };
        let config = resolve_run_config(Some(&path), &overrides).unwrap();
        assert_eq!(config.voice.pitch_factor, 0.5);
        assert_eq!(config.analysis_mode, AnalysisMode::DioStonemask);
        assert!(config.parallel);
        assert!(!config.interactive);
    }

    #[test]
    fn test_missing_config_file_has_context() {
        let err = resolve_run_config(
            Some(Path::new("/nonexistent/sincvox.json")),
            &ConfigOverrides::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("Failed to load config"));
    }

    #[test]
    fn test_divisor_implies_fixed_scale() {
        let overrides = ConfigOverrides {
            divisor: Some(32768.0),
            ..Default::default()
        };
        let config = overrides.apply(RunConfig::default());
        assert_eq!(
            config.voice.normalization,
            NormalizationStrategy::FixedScale { divisor: 32768.0 }
        );
    }

    #[test]
    fn test_fixed_keeps_loaded_divisor() {
        let mut base = RunConfig::default();
        base.voice.normalization = NormalizationStrategy::FixedScale { divisor: 8000.0 };
        let overrides = ConfigOverrides {
            normalize: Some(NormalizeChoice::Fixed),
            ..Default::default()
        };
        assert_eq!(
            overrides.apply(base).voice.normalization,
            NormalizationStrategy::FixedScale { divisor: 8000.0 }
        );

        base.voice.normalization = NormalizationStrategy::MinMax;
        assert_eq!(
            overrides.apply(base).voice.normalization,
            NormalizationStrategy::FixedScale { divisor: 1.0 }
        );
    }

    #[test]
    fn test_min_max_override() {
        let overrides = ConfigOverrides {
            normalize: Some(NormalizeChoice::MinMax),
            ..Default::default()
        };
        let config = overrides.apply(RunConfig::default());
        assert_eq!(config.voice.normalization, NormalizationStrategy::MinMax);
    }

    #[test]
    fn test_parse_choices() {
        assert_eq!(NormalizeChoice::parse("min-max"), Some(NormalizeChoice::MinMax));
        assert_eq!(NormalizeChoice::parse("fixed"), Some(NormalizeChoice::Fixed));
        assert_eq!(NormalizeChoice::parse("loud"), None);
        assert_eq!(parse_analysis_mode("dio"), Some(AnalysisMode::DioStonemask));
        assert_eq!(parse_analysis_mode("harvest"), Some(AnalysisMode::Harvest));
        assert_eq!(parse_analysis_mode("yin"), None);
    }
}
