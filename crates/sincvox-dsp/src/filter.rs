//! Windowed-sinc FIR filter design.
//!
//! Lowpass, highpass, and bandpass kernels are built from the ideal sinc
//! response truncated to an odd number of taps and shaped by a Hann window.
//! The tap count follows from the transition bandwidth: narrower transitions
//! need longer kernels.

mod window;


use std::f64::consts::PI;

use sincvox_spec::BandParams;

use crate::error::{DspError, DspResult};
use crate::sinc::sinc;

pub use window::hann_window;

/// Window-method constant relating normalized transition bandwidth to taps.
pub const TAP_FACTOR: f64 = 3.1;

/// Largest kernel the designer will produce (odd, so bumping never exceeds it).
pub const MAX_TAPS: usize = (1 << 20) + 1;

/// Response type and cutoff frequencies (Hz) of a filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterKind {
    /// Passes frequencies below `cutoff`.
    Lowpass {
        /// Cutoff frequency in Hz.
        cutoff: f64,
    },
    /// Passes frequencies above `cutoff`.
    Highpass {
        /// Cutoff frequency in Hz.
        cutoff: f64,
    },
    /// Passes frequencies between `low` and `high`.
    Bandpass {
        /// Lower cutoff frequency in Hz.
        low: f64,
        /// Upper cutoff frequency in Hz.
        high: f64,
    },
}

impl FilterKind {
    /// Returns the short name of the response type.
    pub fn name(&self) -> &'static str {
        match self {
            FilterKind::Lowpass { .. } => "lowpass",
            FilterKind::Highpass { .. } => "highpass",
            FilterKind::Bandpass { .. } => "bandpass",
        }
    }
}

/// Complete description of a filter to design.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterSpec {
    /// Response type and cutoff(s).
    pub kind: FilterKind,
    /// Transition bandwidth in Hz.
    pub transition_bandwidth: f64,
    /// Sample rate in Hz.
    pub sample_rate: u32,
}

impl FilterSpec {
    /// Creates a lowpass spec.
    pub fn lowpass(cutoff: f64, transition_bandwidth: f64, sample_rate: u32) -> Self {
        Self {
            kind: FilterKind::Lowpass { cutoff },
            transition_bandwidth,
            sample_rate,
        }
    }

    /// Creates a highpass spec.
    pub fn highpass(cutoff: f64, transition_bandwidth: f64, sample_rate: u32) -> Self {
        Self {
            kind: FilterKind::Highpass { cutoff },
            transition_bandwidth,
            sample_rate,
        }
    }

    /// Creates a bandpass spec.
    pub fn bandpass(low: f64, high: f64, transition_bandwidth: f64, sample_rate: u32) -> Self {
        Self {
            kind: FilterKind::Bandpass { low, high },
            transition_bandwidth,
            sample_rate,
        }
    }

    /// Builds a spec from configuration parameters and a signal's sample rate.
    pub fn from_band_params(params: &BandParams, sample_rate: u32) -> Self {
        match *params {
            BandParams::Lowpass {
                cutoff_hz,
                transition_hz,
            } => Self::lowpass(cutoff_hz, transition_hz, sample_rate),
            BandParams::Highpass {
                cutoff_hz,
                transition_hz,
            } => Self::highpass(cutoff_hz, transition_hz, sample_rate),
            BandParams::Bandpass {
                low_hz,
                high_hz,
                transition_hz,
            } => Self::bandpass(low_hz, high_hz, transition_hz, sample_rate),
        }
    }
}

/// Odd-length, center-symmetric FIR coefficients.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterKernel {
    coefficients: Vec<f64>,
}

impl FilterKernel {
    /// Wraps existing coefficients.
    ///
    /// # Errors
    /// Returns [`DspError::InvalidFilterSpec`] for an empty or even-length
    /// sequence, since same-length convolution needs a center tap.
    pub fn from_coefficients(coefficients: Vec<f64>) -> DspResult<Self> {
        if coefficients.len() % 2 == 0 {
            return Err(DspError::invalid_filter(format!(
                "kernel length must be odd, got {}",
                coefficients.len()
            )));
        }
        Ok(Self { coefficients })
    }

    /// The coefficients, index 0 first.
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Number of taps.
    pub fn len(&self) -> usize {
        self.coefficients.len()
    }

    /// Always false: kernels have at least one tap.
    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }

    /// Index of the center tap.
    pub fn center_index(&self) -> usize {
        (self.coefficients.len() - 1) / 2
    }

    /// Value of the center tap.
    pub fn center(&self) -> f64 {
        self.coefficients[self.center_index()]
    }

    /// Sum of all coefficients (the DC gain).
    pub fn dc_gain(&self) -> f64 {
        self.coefficients.iter().sum()
    }

    /// Whether `k[i] == k[len - 1 - i]` within `tolerance` for every tap.
    pub fn is_symmetric(&self, tolerance: f64) -> bool {
        let n = self.coefficients.len();
        (0..n / 2).all(|i| (self.coefficients[i] - self.coefficients[n - 1 - i]).abs() <= tolerance)
    }

    /// Consumes the kernel and returns the coefficients.
    pub fn into_coefficients(self) -> Vec<f64> {
        self.coefficients
    }
}

/// Derives the odd tap count for a transition bandwidth.
///
/// `J = round(3.1 / (transition / sample_rate)) - 1`, bumped by one when
/// `J + 1` is even. Returns `J + 1`.
///
/// # Errors
/// Returns [`DspError::InvalidFilterSpec`] when the sample rate is zero, the
/// normalized transition bandwidth is not inside `(0, 0.5)`, or the kernel
/// would exceed [`MAX_TAPS`].
pub fn tap_count(sample_rate: u32, transition_bandwidth: f64) -> DspResult<usize> {
    if sample_rate == 0 {
        return Err(DspError::invalid_filter("sample rate must be positive"));
    }
    let delta = transition_bandwidth / sample_rate as f64;
    if !(delta.is_finite() && delta > 0.0 && delta < 0.5) {
        return Err(DspError::invalid_filter(format!(
            "transition bandwidth {} Hz must be between 0 and Nyquist ({} Hz)",
            transition_bandwidth,
            sample_rate as f64 / 2.0
        )));
    }

    let j = (TAP_FACTOR / delta).round() - 1.0;
    if j + 1.0 > MAX_TAPS as f64 {
        return Err(DspError::invalid_filter(format!(
            "transition bandwidth {} Hz is too narrow: kernel would exceed {} taps",
            transition_bandwidth, MAX_TAPS
        )));
    }

    let mut j = j as usize;
    if (j + 1) % 2 == 0 {
        j += 1;
    }
    Ok(j + 1)
}

/// Normalizes a cutoff and checks it lies strictly inside `(0, 0.5)`.
fn normalized_cutoff(name: &str, cutoff: f64, sample_rate: u32) -> DspResult<f64> {
    let fc = cutoff / sample_rate as f64;
    if !(fc.is_finite() && fc > 0.0 && fc < 0.5) {
        return Err(DspError::invalid_filter(format!(
            "{} {} Hz must be between 0 and Nyquist ({} Hz)",
            name,
            cutoff,
            sample_rate as f64 / 2.0
        )));
    }
    Ok(fc)
}

/// Ideal lowpass impulse response at tap offset `m` for normalized cutoff `fc`.
#[inline]
fn ideal_lowpass(fc: f64, m: f64) -> f64 {
    2.0 * fc * sinc(2.0 * PI * fc * m)
}

/// Designs a Hann-windowed sinc kernel.
///
/// # Errors
/// Returns [`DspError::InvalidFilterSpec`] when any cutoff or the transition
/// bandwidth falls outside `(0, Nyquist)`, when bandpass cutoffs are not
/// ordered `low < high`, or when the kernel would be too long.
///
/// # Example
/// ```
/// use sincvox_dsp::filter::{design, FilterSpec};
///
/// let kernel = design(&FilterSpec::lowpass(500.0, 100.0, 16000)).unwrap();
/// assert_eq!(kernel.len(), 497);
/// assert!(kernel.is_symmetric(1e-12));
/// ```
pub fn design(spec: &FilterSpec) -> DspResult<FilterKernel> {
    if spec.sample_rate == 0 {
        return Err(DspError::invalid_filter("sample rate must be positive"));
    }

    // Cutoffs are checked before the tap count.
    let response: Box<dyn Fn(f64) -> f64> = match spec.kind {
        FilterKind::Lowpass { cutoff } => {
            let fc = normalized_cutoff("cutoff", cutoff, spec.sample_rate)?;
            Box::new(move |m| ideal_lowpass(fc, m))
        }
        FilterKind::Highpass { cutoff } => {
            let fc = normalized_cutoff("cutoff", cutoff, spec.sample_rate)?;
            Box::new(move |m| sinc(PI * m) - ideal_lowpass(fc, m))
        }
        FilterKind::Bandpass { low, high } => {
            let fc1 = normalized_cutoff("low cutoff", low, spec.sample_rate)?;
            let fc2 = normalized_cutoff("high cutoff", high, spec.sample_rate)?;
            if fc1 >= fc2 {
                return Err(DspError::invalid_filter(format!(
                    "bandpass low cutoff {} Hz must be below high cutoff {} Hz",
                    low, high
                )));
            }
            Box::new(move |m| ideal_lowpass(fc2, m) - ideal_lowpass(fc1, m))
        }
    };

    let taps = tap_count(spec.sample_rate, spec.transition_bandwidth)?;
    let half = ((taps - 1) / 2) as i64;
    let window = hann_window(taps);

    let coefficients = (-half..=half)
        .zip(window)
        .map(|(m, w)| response(m as f64) * w)
        .collect();

    Ok(FilterKernel { coefficients })
}
