//! Frame-aligned analysis features.

use crate::error::CapabilityError;

/// Decomposition of a signal into source and filter parameters.
///
/// All three tracks share one frame grid: frame `t` is centered at
/// `t * frame_period_ms` milliseconds.
#[derive(Debug, Clone, PartialEq)]
pub struct VocoderFeatures {
    /// Fundamental frequency per frame in Hz; 0 marks an unvoiced frame.
    pub f0: Vec<f64>,
    /// Power spectral envelope, one row of `K` bins per frame.
    pub spectral_envelope: Vec<Vec<f64>>,
    /// Aperiodicity in `[0, 1]`, one row of `K` bins per frame.
    pub aperiodicity: Vec<Vec<f64>>,
    /// Spacing between frame centers in milliseconds.
    pub frame_period_ms: f64,
}

impl VocoderFeatures {
    /// Number of frames.
    pub fn frames(&self) -> usize {
        self.f0.len()
    }

    /// Number of frequency bins per frame (0 when there are no frames).
    pub fn bins(&self) -> usize {
        self.spectral_envelope.first().map_or(0, Vec::len)
    }

    /// FFT size implied by the bin count.
    pub fn fft_size(&self) -> usize {
        self.bins().saturating_sub(1) * 2
    }

    /// Returns a copy with every F0 value multiplied by `factor`.
    ///
    /// Unvoiced frames stay at 0.
    pub fn with_scaled_f0(&self, factor: f64) -> Self {
        Self {
            f0: self.f0.iter().map(|&f| f * factor).collect(),
            ..self.clone()
        }
    }

    /// Number of voiced frames.
    pub fn voiced_frames(&self) -> usize {
        self.f0.iter().filter(|&&f| f > 0.0).count()
    }

    /// Checks that the tracks are frame-aligned and well-formed.
    ///
    /// # Errors
    /// Returns [`CapabilityError::MalformedFeatures`] describing the first
    /// inconsistency found.
    pub fn validate(&self) -> Result<(), CapabilityError> {
        let malformed = |msg: String| Err(CapabilityError::MalformedFeatures(msg));

        if !(self.frame_period_ms.is_finite() && self.frame_period_ms > 0.0) {
            return malformed(format!(
                "frame period must be positive, got {}",
                self.frame_period_ms
            ));
        }
        let frames = self.frames();
        if frames == 0 {
            return malformed("no frames".to_string());
        }
        if self.spectral_envelope.len() != frames || self.aperiodicity.len() != frames {
            return malformed(format!(
                "frame counts differ: f0 {}, envelope {}, aperiodicity {}",
                frames,
                self.spectral_envelope.len(),
                self.aperiodicity.len()
            ));
        }

        let bins = self.bins();
        if bins < 2 {
            return malformed(format!("need at least 2 bins per frame, got {}", bins));
        }
        for (t, (env, ap)) in self
            .spectral_envelope
            .iter()
            .zip(&self.aperiodicity)
            .enumerate()
        {
            if env.len() != bins || ap.len() != bins {
                return malformed(format!(
                    "frame {} has {} envelope and {} aperiodicity bins, expected {}",
                    t,
                    env.len(),
                    ap.len(),
                    bins
                ));
            }
        }

        if let Some((t, f)) = self
            .f0
            .iter()
            .enumerate()
            .find(|(_, f)| !(f.is_finite() && **f >= 0.0))
        {
            return malformed(format!("frame {} has invalid F0 {}", t, f));
        }
        Ok(())
    }
}

/// Voicing statistics of an F0 track, for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct F0Summary {
    /// Total frames.
    pub frames: usize,
    /// Frames with F0 above zero.
    pub voiced: usize,
    /// Lowest voiced F0 in Hz (0 when nothing is voiced).
    pub min_hz: f64,
    /// Highest voiced F0 in Hz.
    pub max_hz: f64,
    /// Mean voiced F0 in Hz.
    pub mean_hz: f64,
}

impl F0Summary {
    /// Summarizes the voiced frames of `f0`.
    pub fn from_track(f0: &[f64]) -> Self {
        let voiced: Vec<f64> = f0.iter().copied().filter(|&f| f > 0.0).collect();
        if voiced.is_empty() {
            return Self {
                frames: f0.len(),
                ..Self::default()
            };
        }
        Self {
            frames: f0.len(),
            voiced: voiced.len(),
            min_hz: voiced.iter().copied().fold(f64::INFINITY, f64::min),
            max_hz: voiced.iter().copied().fold(0.0, f64::max),
            mean_hz: voiced.iter().sum::<f64>() / voiced.len() as f64,
        }
    }

    /// Fraction of frames that are voiced.
    pub fn voiced_ratio(&self) -> f64 {
        if self.frames == 0 {
            0.0
        } else {
            self.voiced as f64 / self.frames as f64
        }
    }
}
