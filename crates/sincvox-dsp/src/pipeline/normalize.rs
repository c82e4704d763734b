//! Reversible amplitude normalization.

use sincvox_spec::NormalizationStrategy;

use crate::error::{DspError, DspResult};

/// Affine map fitted to a signal: `normalized = (x - offset) / scale`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalization {
    offset: f64,
    scale: f64,
}

impl Normalization {
    /// Fits the map for `strategy` to `samples`.
    ///
    /// `MinMax` sends the observed minimum to -1 and maximum to 1; a constant
    /// signal is only shifted to 0. `FixedScale` divides by its divisor.
    ///
    /// # Errors
    /// Returns [`DspError::EmptyInput`] for `MinMax` over no samples and
    /// [`DspError::InvalidParameter`] for a divisor that is not finite and
    /// positive.
    pub fn fit(strategy: &NormalizationStrategy, samples: &[f64]) -> DspResult<Self> {
        match *strategy {
            NormalizationStrategy::MinMax => {
                let (min, max) = samples
                    .iter()
                    .fold(None, |acc: Option<(f64, f64)>, &s| match acc {
                        None => Some((s, s)),
                        Some((lo, hi)) => Some((lo.min(s), hi.max(s))),
                    })
                    .ok_or(DspError::EmptyInput)?;
                let half_range = (max - min) / 2.0;
                Ok(Self {
                    offset: (max + min) / 2.0,
                    scale: if half_range > 0.0 { half_range } else { 1.0 },
                })
            }
            NormalizationStrategy::FixedScale { divisor } => {
                if !(divisor.is_finite() && divisor > 0.0) {
                    return Err(DspError::invalid_param(
                        "divisor",
                        format!("must be finite and positive, got {}", divisor),
                    ));
                }
                Ok(Self {
                    offset: 0.0,
                    scale: divisor,
                })
            }
        }
    }

    /// Maps samples into the normalized range.
    pub fn apply(&self, samples: &[f64]) -> Vec<f64> {
        samples.iter().map(|&s| (s - self.offset) / self.scale).collect()
    }

    /// Maps normalized samples back to the original range.
    pub fn invert(&self, samples: &[f64]) -> Vec<f64> {
        samples.iter().map(|&s| s * self.scale + self.offset).collect()
    }

    /// Value subtracted before scaling.
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Divisor applied after the offset.
    pub fn scale(&self) -> f64 {
        self.scale
    }
}
