//! Pitch-shifting voice transform.

use sincvox_spec::{NormalizationStrategy, VoiceParams};

use super::normalize::Normalization;
use crate::error::{DspError, DspResult};
use crate::signal::Signal;
use crate::vocoder::{Analyzer, F0Summary, Synthesizer};

/// Settings for [`transform`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoiceTransformConfig {
    /// Multiplier applied to every F0 value; must be finite and positive.
    pub pitch_factor: f64,
    /// Normalization around the capability calls.
    pub normalization: NormalizationStrategy,
    /// Gain applied after the inverse normalization.
    pub output_gain: f64,
}

impl Default for VoiceTransformConfig {
    fn default() -> Self {
        Self::from(&VoiceParams::default())
    }
}

impl From<&VoiceParams> for VoiceTransformConfig {
    fn from(params: &VoiceParams) -> Self {
        Self {
            pitch_factor: params.pitch_factor,
            normalization: params.normalization,
            output_gain: params.output_gain,
        }
    }
}

/// Result of [`transform`].
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceTransformOutput {
    /// Resynthesized mono signal at the input's sample rate.
    pub signal: Signal,
    /// F0 track as analyzed.
    pub original_f0: Vec<f64>,
    /// F0 track handed to the synthesizer.
    pub modified_f0: Vec<f64>,
    /// Normalization fitted to the input.
    pub normalization: Normalization,
}

impl VoiceTransformOutput {
    /// Voicing statistics of the analyzed track.
    pub fn original_summary(&self) -> F0Summary {
        F0Summary::from_track(&self.original_f0)
    }

    /// Voicing statistics of the shifted track.
    pub fn modified_summary(&self) -> F0Summary {
        F0Summary::from_track(&self.modified_f0)
    }
}

/// Shifts the pitch of `signal` by `config.pitch_factor`.
///
/// The signal is downmixed to mono and normalized, decomposed by `analyzer`,
/// its F0 track scaled, rebuilt by `synthesizer`, and finally mapped back to
/// the input's amplitude range and multiplied by `config.output_gain`.
///
/// # Errors
/// - [`DspError::InvalidParameter`] for a pitch factor or gain that is not
///   usable, or a bad normalization divisor. Neither capability is called.
/// - [`DspError::EmptyInput`] when the signal has no samples.
/// - [`DspError::Capability`] carrying whatever the analyzer or synthesizer
///   returned.
pub fn transform(
    signal: &Signal,
    config: &VoiceTransformConfig,
    analyzer: &dyn Analyzer,
    synthesizer: &dyn Synthesizer,
) -> DspResult<VoiceTransformOutput> {
    if !(config.pitch_factor.is_finite() && config.pitch_factor > 0.0) {
        return Err(DspError::invalid_param(
            "pitch_factor",
            format!("must be finite and positive, got {}", config.pitch_factor),
        ));
    }
    if !config.output_gain.is_finite() {
        return Err(DspError::invalid_param(
            "output_gain",
            format!("must be finite, got {}", config.output_gain),
        ));
    }
    if signal.is_empty() {
        return Err(DspError::EmptyInput);
    }

    let mono = signal.downmix();
    let normalization = Normalization::fit(&config.normalization, &mono)?;
    let normalized = normalization.apply(&mono);

    let features = analyzer.analyze(&normalized, signal.sample_rate())?;
    features.validate()?;
    let modified = features.with_scaled_f0(config.pitch_factor);

    let synthesized = synthesizer.synthesize(&modified, signal.sample_rate())?;
    let samples = normalization
        .invert(&synthesized)
        .into_iter()
        .map(|s| s * config.output_gain)
        .collect();

    Ok(VoiceTransformOutput {
        signal: Signal::mono(samples, signal.sample_rate()),
        original_f0: features.f0,
        modified_f0: modified.f0,
        normalization,
    })
}
