//! Sample buffer with fixed sample rate and channel layout.

use crate::error::{DspError, DspResult};

/// An interleaved PCM signal held in `f64` for arithmetic headroom.
///
/// Sample values use the 16-bit integer scale (`[-32768, 32767]`) after
/// decoding; nothing in this type enforces that range, so intermediate
/// results may exceed it until [`Signal::to_pcm16`] clamps them.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    samples: Vec<f64>,
    sample_rate: u32,
    channels: u16,
}

impl Signal {
    /// Creates a signal from interleaved samples.
    ///
    /// # Errors
    /// Returns [`DspError::InvalidParameter`] when `channels` is zero or the
    /// sample count is not a whole number of frames.
    pub fn new(samples: Vec<f64>, sample_rate: u32, channels: u16) -> DspResult<Self> {
        if channels == 0 {
            return Err(DspError::invalid_param(
                "channels",
                "must be at least 1",
            ));
        }
        if samples.len() % channels as usize != 0 {
            return Err(DspError::invalid_param(
                "samples",
                format!(
                    "{} samples is not a whole number of {}-channel frames",
                    samples.len(),
                    channels
                ),
            ));
        }
        Ok(Self {
            samples,
            sample_rate,
            channels,
        })
    }

    /// Creates a single-channel signal.
    pub fn mono(samples: Vec<f64>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
            channels: 1,
        }
    }

    /// Builds an interleaved signal from per-channel buffers.
    ///
    /// # Errors
    /// Returns [`DspError::InvalidParameter`] when no channels are given or
    /// the channel buffers differ in length.
    pub fn from_channels(channels: &[Vec<f64>], sample_rate: u32) -> DspResult<Self> {
        let first = channels
            .first()
            .ok_or_else(|| DspError::invalid_param("channels", "must be at least 1"))?;
        let frames = first.len();
        if channels.iter().any(|c| c.len() != frames) {
            return Err(DspError::invalid_param(
                "channels",
                "all channel buffers must have the same length",
            ));
        }
        let count = u16::try_from(channels.len())
            .map_err(|_| DspError::invalid_param("channels", "too many channels"))?;

        let mut samples = Vec::with_capacity(frames * channels.len());
        for frame in 0..frames {
            for channel in channels {
                samples.push(channel[frame]);
            }
        }

        Ok(Self {
            samples,
            sample_rate,
            channels: count,
        })
    }

    /// Returns a signal with the same sample rate and channel count but new
    /// interleaved samples.
    pub(crate) fn with_samples(&self, samples: Vec<f64>) -> Self {
        Self {
            samples,
            sample_rate: self.sample_rate,
            channels: self.channels,
        }
    }

    /// Interleaved samples.
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Consumes the signal and returns the interleaved samples.
    pub fn into_samples(self) -> Vec<f64> {
        self.samples
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of interleaved channels.
    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Total number of samples across all channels.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the signal has no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Number of sample frames (samples per channel).
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    /// Duration in seconds.
    pub fn duration_seconds(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames() as f64 / self.sample_rate as f64
    }

    /// Splits the interleaved samples into one buffer per channel.
    pub fn deinterleave(&self) -> Vec<Vec<f64>> {
        let channels = self.channels as usize;
        let mut out = vec![Vec::with_capacity(self.frames()); channels];
        for frame in self.samples.chunks_exact(channels) {
            for (buffer, &sample) in out.iter_mut().zip(frame) {
                buffer.push(sample);
            }
        }
        out
    }

    /// Averages all channels into a single buffer.
    pub fn downmix(&self) -> Vec<f64> {
        let channels = self.channels as usize;
        if channels == 1 {
            return self.samples.clone();
        }
        self.samples
            .chunks_exact(channels)
            .map(|frame| frame.iter().sum::<f64>() / channels as f64)
            .collect()
    }

    /// Peak absolute sample value.
    pub fn peak(&self) -> f64 {
        self.samples.iter().fold(0.0_f64, |a, &s| a.max(s.abs()))
    }

    /// Converts to 16-bit PCM, rounding and clamping to the `i16` range.
    ///
    /// NaN samples become 0.
    pub fn to_pcm16(&self) -> Vec<i16> {
        samples_to_i16(&self.samples)
    }
}

/// Rounds and clamps `f64` samples in the 16-bit scale to `i16`.
pub fn samples_to_i16(samples: &[f64]) -> Vec<i16> {
    samples
        .iter()
        .map(|&s| {
            if s.is_nan() {
                0
            } else {
                s.round().clamp(i16::MIN as f64, i16::MAX as f64) as i16
            }
        })
        .collect()
}
