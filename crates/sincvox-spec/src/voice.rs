//! Voice transform parameter types.

use serde::{Deserialize, Serialize};

/// Amplitude normalization applied before analysis and inverted after
/// resynthesis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", deny_unknown_fields)]
pub enum NormalizationStrategy {
    /// Map the observed `[min, max]` of the signal onto `[-1, 1]`.
    MinMax,
    /// Divide by a fixed divisor; the inverse multiplies by it.
    FixedScale {
        /// Divisor applied to every sample.
        divisor: f64,
    },
}

impl Default for NormalizationStrategy {
    fn default() -> Self {
        NormalizationStrategy::FixedScale { divisor: 1.0 }
    }
}

/// F0 estimation mode used by the built-in analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMode {
    /// Coarse autocorrelation estimate refined by parabolic interpolation.
    #[default]
    DioStonemask,
    /// Normalized square difference estimate with temporal smoothing.
    Harvest,
}

impl AnalysisMode {
    /// Returns the mode name as written in configuration files.
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisMode::DioStonemask => "dio_stonemask",
            AnalysisMode::Harvest => "harvest",
        }
    }
}

impl std::fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters of the pitch-shifting voice transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VoiceParams {
    /// Multiplier applied to every F0 value (>1 raises pitch).
    pub pitch_factor: f64,
    /// Normalization strategy around the analysis/synthesis calls.
    pub normalization: NormalizationStrategy,
    /// Extra gain applied after the inverse normalization.
    pub output_gain: f64,
    /// Analysis frame period in milliseconds.
    pub frame_period_ms: f64,
    /// Lowest F0 searched, in Hz.
    pub f0_floor_hz: f64,
    /// Highest F0 searched, in Hz.
    pub f0_ceil_hz: f64,
    /// Seed for the synthesis noise source.
    pub seed: u32,
}

impl Default for VoiceParams {
    fn default() -> Self {
        Self {
            pitch_factor: 2.0,
            normalization: NormalizationStrategy::default(),
            output_gain: 1.0,
            frame_period_ms: 5.0,
            f0_floor_hz: 71.0,
            f0_ceil_hz: 800.0,
            seed: 0,
        }
    }
}
