//! Analysis/resynthesis capability.
//!
//! The voice pipeline talks to a vocoder only through [`Analyzer`] and
//! [`Synthesizer`]. [`SpectralVocoder`] is the built-in implementation of
//! both: a compact source-filter model that tracks F0 on a fixed frame grid,
//! estimates a smoothed power spectral envelope and a per-bin aperiodicity,
//! and resynthesizes from a mixed pulse/noise excitation.
//!
//! Any other decomposition can be plugged into the pipeline by implementing
//! the two traits.

mod aperiodicity;
mod envelope;
mod f0;
mod features;
mod synth;

#[cfg(test)]
mod tests;

use sincvox_spec::{AnalysisMode, VoiceParams};

use crate::error::CapabilityError;

pub use envelope::envelope_fft_size;
pub use features::{F0Summary, VocoderFeatures};

/// Decomposes samples into vocoder features.
pub trait Analyzer {
    /// Analyzes mono `samples` recorded at `sample_rate` Hz.
    fn analyze(&self, samples: &[f64], sample_rate: u32)
        -> Result<VocoderFeatures, CapabilityError>;
}

/// Rebuilds samples from vocoder features.
pub trait Synthesizer {
    /// Synthesizes mono samples at `sample_rate` Hz.
    fn synthesize(
        &self,
        features: &VocoderFeatures,
        sample_rate: u32,
    ) -> Result<Vec<f64>, CapabilityError>;
}

/// Frame grid, search range and noise seed for [`SpectralVocoder`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VocoderParams {
    /// Spacing between frame centers in milliseconds.
    pub frame_period_ms: f64,
    /// Lowest F0 searched for, in Hz.
    pub f0_floor_hz: f64,
    /// Highest F0 searched for, in Hz.
    pub f0_ceil_hz: f64,
    /// Seed for the aperiodic excitation.
    pub seed: u32,
}

impl Default for VocoderParams {
    fn default() -> Self {
        Self::from(&VoiceParams::default())
    }
}

impl From<&VoiceParams> for VocoderParams {
    fn from(params: &VoiceParams) -> Self {
        Self {
            frame_period_ms: params.frame_period_ms,
            f0_floor_hz: params.f0_floor_hz,
            f0_ceil_hz: params.f0_ceil_hz,
            seed: params.seed,
        }
    }
}

impl VocoderParams {
    /// Frame spacing in (fractional) samples.
    pub fn hop_samples(&self, sample_rate: u32) -> f64 {
        self.frame_period_ms * sample_rate as f64 / 1000.0
    }

    /// Number of analysis frames for a signal of `len` samples.
    pub fn frame_count(&self, len: usize, sample_rate: u32) -> usize {
        (len as f64 / self.hop_samples(sample_rate)).floor() as usize + 1
    }

    fn check(&self, sample_rate: u32) -> Result<(), String> {
        if sample_rate == 0 {
            return Err("sample rate must be positive".to_string());
        }
        if !(self.frame_period_ms.is_finite() && self.hop_samples(sample_rate) >= 1.0) {
            return Err(format!(
                "frame period {} ms is shorter than one sample",
                self.frame_period_ms
            ));
        }
        let nyquist = sample_rate as f64 / 2.0;
        if !(self.f0_floor_hz > 0.0
            && self.f0_floor_hz < self.f0_ceil_hz
            && self.f0_ceil_hz < nyquist)
        {
            return Err(format!(
                "F0 range {}..{} Hz must satisfy 0 < floor < ceil < {} Hz",
                self.f0_floor_hz, self.f0_ceil_hz, nyquist
            ));
        }
        Ok(())
    }
}

/// Built-in source-filter vocoder.
///
/// Analysis is deterministic. Synthesis draws its noise from a PCG32 stream
/// derived from [`VocoderParams::seed`], so repeated calls with the same
/// features produce identical samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectralVocoder {
    params: VocoderParams,
    mode: AnalysisMode,
}

impl SpectralVocoder {
    /// Creates a vocoder with the given parameters and F0 estimator.
    pub fn new(params: VocoderParams, mode: AnalysisMode) -> Self {
        Self { params, mode }
    }

    /// Creates a vocoder from voice-transform settings.
    pub fn from_voice_params(params: &VoiceParams, mode: AnalysisMode) -> Self {
        Self::new(VocoderParams::from(params), mode)
    }

    /// Parameters in use.
    pub fn params(&self) -> &VocoderParams {
        &self.params
    }

    /// F0 estimator in use.
    pub fn mode(&self) -> AnalysisMode {
        self.mode
    }
}

impl Default for SpectralVocoder {
    fn default() -> Self {
        Self::new(VocoderParams::default(), AnalysisMode::default())
    }
}

impl Analyzer for SpectralVocoder {
    fn analyze(
        &self,
        samples: &[f64],
        sample_rate: u32,
    ) -> Result<VocoderFeatures, CapabilityError> {
        if samples.is_empty() {
            return Err(CapabilityError::Analysis("no samples to analyze".to_string()));
        }
        self.params
            .check(sample_rate)
            .map_err(CapabilityError::Analysis)?;

        let pitch = f0::estimate(samples, sample_rate, &self.params, self.mode);
        let f0: Vec<f64> = pitch.iter().map(|frame| frame.f0).collect();

        let fft_size = envelope_fft_size(sample_rate, self.params.f0_floor_hz);
        let spectral_envelope = envelope::estimate(
            samples,
            sample_rate,
            self.params.hop_samples(sample_rate),
            &f0,
            fft_size,
        );
        let aperiodicity = aperiodicity::estimate(&pitch, fft_size / 2 + 1);

        Ok(VocoderFeatures {
            f0,
            spectral_envelope,
            aperiodicity,
            frame_period_ms: self.params.frame_period_ms,
        })
    }
}

impl Synthesizer for SpectralVocoder {
    fn synthesize(
        &self,
        features: &VocoderFeatures,
        sample_rate: u32,
    ) -> Result<Vec<f64>, CapabilityError> {
        features.validate()?;
        synth::synthesize(features, sample_rate, self.params.seed)
    }
}
