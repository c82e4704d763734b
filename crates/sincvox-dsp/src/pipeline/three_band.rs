//! Lowpass, highpass and bandpass variants of one signal.

use std::thread;

use sincvox_spec::{BandParams, ThreeBandParams};

use crate::convolve::{convolve_same_with, ConvolutionMethod};
use crate::error::{DspError, DspResult};
use crate::filter::{design, FilterSpec};
use crate::signal::Signal;

/// One filtered variant of the input.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredBand {
    /// Filtered samples, same length and layout as the input.
    pub signal: Signal,
    /// Number of taps in the kernel that produced it.
    pub taps: usize,
}

/// Per-branch results; a failed branch never hides the others.
#[derive(Debug)]
pub struct ThreeBandOutput {
    /// Result of the lowpass branch.
    pub lowpass: DspResult<FilteredBand>,
    /// Result of the highpass branch.
    pub highpass: DspResult<FilteredBand>,
    /// Result of the bandpass branch.
    pub bandpass: DspResult<FilteredBand>,
}

impl ThreeBandOutput {
    /// Branch results labeled by slot, in lowpass/highpass/bandpass order.
    pub fn branches(&self) -> [(&'static str, &DspResult<FilteredBand>); 3] {
        [
            ("lowpass", &self.lowpass),
            ("highpass", &self.highpass),
            ("bandpass", &self.bandpass),
        ]
    }

    /// Consumes the output into labeled branch results.
    pub fn into_branches(self) -> [(&'static str, DspResult<FilteredBand>); 3] {
        [
            ("lowpass", self.lowpass),
            ("highpass", self.highpass),
            ("bandpass", self.bandpass),
        ]
    }

    /// Number of branches that failed.
    pub fn failures(&self) -> usize {
        self.branches().iter().filter(|(_, r)| r.is_err()).count()
    }
}

/// Execution options for [`apply_three_band_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterOptions {
    /// Run the three branches on scoped threads.
    pub parallel: bool,
    /// Convolution strategy for every branch.
    pub method: ConvolutionMethod,
}

/// Designs one kernel from `params` at the signal's rate and applies it.
pub fn apply_band(
    signal: &Signal,
    params: &BandParams,
    method: ConvolutionMethod,
) -> DspResult<FilteredBand> {
    let kernel = design(&FilterSpec::from_band_params(params, signal.sample_rate()))?;
    let filtered = convolve_same_with(signal, &kernel, method)?;
    Ok(FilteredBand {
        signal: filtered,
        taps: kernel.len(),
    })
}

/// Produces all three variants sequentially.
///
/// # Errors
/// Returns [`DspError::EmptyInput`] if the signal has no samples. Any other
/// failure is reported inside the branch it belongs to.
pub fn apply_three_band(signal: &Signal, params: &ThreeBandParams) -> DspResult<ThreeBandOutput> {
    apply_three_band_with(signal, params, FilterOptions::default())
}

/// Produces all three variants with explicit execution options.
pub fn apply_three_band_with(
    signal: &Signal,
    params: &ThreeBandParams,
    options: FilterOptions,
) -> DspResult<ThreeBandOutput> {
    if signal.is_empty() {
        return Err(DspError::EmptyInput);
    }

    let method = options.method;
    let [low, high, band] = params.branches().map(|(_, band_params)| band_params);

    if !options.parallel {
        return Ok(ThreeBandOutput {
            lowpass: apply_band(signal, low, method),
            highpass: apply_band(signal, high, method),
            bandpass: apply_band(signal, band, method),
        });
    }

    Ok(thread::scope(|scope| {
        let low = scope.spawn(|| apply_band(signal, low, method));
        let high = scope.spawn(|| apply_band(signal, high, method));
        let band = scope.spawn(|| apply_band(signal, band, method));
        ThreeBandOutput {
            lowpass: join_branch(low),
            highpass: join_branch(high),
            bandpass: join_branch(band),
        }
    }))
}

fn join_branch(
    handle: thread::ScopedJoinHandle<'_, DspResult<FilteredBand>>,
) -> DspResult<FilteredBand> {
    handle
        .join()
        .unwrap_or_else(|payload| std::panic::resume_unwind(payload))
}
