//! Same-length linear convolution.
//!
//! The output of every routine here has exactly as many samples as its input
//! and is aligned so that the kernel's center tap lines up with the input
//! sample it produces (the `'same'` convention: output sample `i` is sample
//! `i + (len(kernel) - 1) / 2` of the full convolution). Samples outside the
//! input are treated as zeros.

use rustfft::{num_complex::Complex, FftPlanner};

use crate::error::{DspError, DspResult};
use crate::filter::FilterKernel;
use crate::signal::Signal;

/// Kernels longer than this use the FFT path under [`ConvolutionMethod::Auto`].
pub const FFT_THRESHOLD: usize = 64;

/// Evaluation strategy for a convolution.
///
/// Both strategies agree to within floating-point rounding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConvolutionMethod {
    /// Pick by kernel length.
    #[default]
    Auto,
    /// Time-domain multiply-accumulate.
    Direct,
    /// Overlap-add with `rustfft`.
    Fft,
}

impl ConvolutionMethod {
    fn resolve(self, kernel_len: usize) -> Self {
        match self {
            ConvolutionMethod::Auto if kernel_len > FFT_THRESHOLD => ConvolutionMethod::Fft,
            ConvolutionMethod::Auto => ConvolutionMethod::Direct,
            other => other,
        }
    }
}

/// Filters every channel of `signal` with `kernel`.
///
/// # Errors
/// Returns [`DspError::EmptyInput`] for a signal with no samples.
///
/// # Example
/// ```
/// use sincvox_dsp::convolve::convolve_same;
/// use sincvox_dsp::filter::FilterKernel;
/// use sincvox_dsp::signal::Signal;
///
/// let signal = Signal::mono(vec![1.0, 2.0, 3.0, 4.0, 5.0], 8000);
/// let kernel = FilterKernel::from_coefficients(vec![1.0, 0.0, -1.0]).unwrap();
/// let out = convolve_same(&signal, &kernel).unwrap();
/// assert_eq!(out.samples(), &[2.0, 2.0, 2.0, 2.0, -4.0]);
/// ```
pub fn convolve_same(signal: &Signal, kernel: &FilterKernel) -> DspResult<Signal> {
    convolve_same_with(signal, kernel, ConvolutionMethod::Auto)
}

/// [`convolve_same`] with an explicit evaluation strategy.
pub fn convolve_same_with(
    signal: &Signal,
    kernel: &FilterKernel,
    method: ConvolutionMethod,
) -> DspResult<Signal> {
    if signal.is_empty() {
        return Err(DspError::EmptyInput);
    }

    if signal.channels() == 1 {
        let out = convolve_same_slice(signal.samples(), kernel.coefficients(), method)?;
        return Ok(signal.with_samples(out));
    }

    let filtered = signal
        .deinterleave()
        .iter()
        .map(|channel| convolve_same_slice(channel, kernel.coefficients(), method))
        .collect::<DspResult<Vec<_>>>()?;
    Signal::from_channels(&filtered, signal.sample_rate())
}

/// Convolves one channel of samples with `kernel`.
///
/// The kernel may be longer than the input; the output still has the
/// input's length.
///
/// # Errors
/// Returns [`DspError::EmptyInput`] for empty `input` and
/// [`DspError::InvalidFilterSpec`] for an empty kernel.
pub fn convolve_same_slice(
    input: &[f64],
    kernel: &[f64],
    method: ConvolutionMethod,
) -> DspResult<Vec<f64>> {
    if input.is_empty() {
        return Err(DspError::EmptyInput);
    }
    if kernel.is_empty() {
        return Err(DspError::invalid_filter("kernel has no taps"));
    }

    let offset = (kernel.len() - 1) / 2;
    let out = match method.resolve(kernel.len()) {
        ConvolutionMethod::Fft => {
            let full = full_convolution_fft(input, kernel);
            full[offset..offset + input.len()].to_vec()
        }
        _ => direct_same(input, kernel, offset),
    };
    Ok(out)
}

/// Time-domain evaluation of only the samples the output keeps.
fn direct_same(input: &[f64], kernel: &[f64], offset: usize) -> Vec<f64> {
    let n = input.len();
    let m = kernel.len();

    (0..n)
        .map(|i| {
            let k = i + offset;
            let lo = (k + 1).saturating_sub(m);
            let hi = k.min(n - 1);
            (lo..=hi).map(|j| input[j] * kernel[k - j]).sum()
        })
        .collect()
}

/// Full linear convolution (`n + m - 1` samples) by FFT overlap-add.
fn full_convolution_fft(input: &[f64], kernel: &[f64]) -> Vec<f64> {
    let n = input.len();
    let m = kernel.len();
    let full_len = n + m - 1;

    let fft_size = (4 * m)
        .next_power_of_two()
        .min(full_len.next_power_of_two());
    let block = fft_size - m + 1;

    let mut planner = FftPlanner::<f64>::new();
    let forward = planner.plan_fft_forward(fft_size);
    let inverse = planner.plan_fft_inverse(fft_size);

    let mut spectrum: Vec<Complex<f64>> = kernel.iter().map(|&h| Complex::new(h, 0.0)).collect();
    spectrum.resize(fft_size, Complex::new(0.0, 0.0));
    forward.process(&mut spectrum);

    let scale = 1.0 / fft_size as f64;
    let mut full = vec![0.0; full_len];
    let mut buffer = vec![Complex::new(0.0, 0.0); fft_size];

    for (chunk_index, chunk) in input.chunks(block).enumerate() {
        buffer.fill(Complex::new(0.0, 0.0));
        for (slot, &x) in buffer.iter_mut().zip(chunk) {
            slot.re = x;
        }

        forward.process(&mut buffer);
        for (bin, h) in buffer.iter_mut().zip(&spectrum) {
            *bin *= h;
        }
        inverse.process(&mut buffer);

        let start = chunk_index * block;
        let end = (start + chunk.len() + m - 1).min(full_len);
        for (acc, value) in full[start..end].iter_mut().zip(&buffer) {
            *acc += value.re * scale;
        }
    }

    full
}
