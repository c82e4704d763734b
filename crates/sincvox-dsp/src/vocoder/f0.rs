//! Frame-wise F0 tracking.

use rustfft::{num_complex::Complex, FftPlanner};
use sincvox_spec::AnalysisMode;

use super::VocoderParams;

/// Frames quieter than this fraction of the signal's RMS are unvoiced.
const SILENCE_RATIO: f64 = 0.01;

/// Minimum correlation peak for a frame to count as voiced.
const VOICING_THRESHOLD: f64 = 0.5;

/// Peaks within this fraction of the best autocorrelation peak are
/// preferred at the shortest lag, which suppresses octave-down errors.
const AUTOCORR_PEAK_RATIO: f64 = 0.95;

/// Key-maximum ratio for NSDF peak picking.
const NSDF_KEY_MAX_RATIO: f64 = 0.9;

/// Pitch estimate for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PitchFrame {
    /// F0 in Hz, 0 when unvoiced.
    pub f0: f64,
    /// Height of the chosen correlation peak in `[0, 1]`.
    pub periodicity: f64,
}

impl PitchFrame {
    const UNVOICED: Self = Self {
        f0: 0.0,
        periodicity: 0.0,
    };
}

/// Lag search range shared by both estimators.
#[derive(Debug, Clone, Copy)]
struct LagRange {
    min: usize,
    max: usize,
}

impl LagRange {
    fn new(sample_rate: u32, params: &VocoderParams) -> Self {
        let fs = sample_rate as f64;
        let min = ((fs / params.f0_ceil_hz).floor() as usize).max(2);
        let max = ((fs / params.f0_floor_hz).ceil() as usize).max(min + 1);
        Self { min, max }
    }

    /// Analysis segment length: long enough for one full period at the
    /// longest lag plus a neighbor for interpolation.
    fn window(&self) -> usize {
        2 * self.max + 2
    }
}

/// Estimates F0 for every frame on the grid.
pub(crate) fn estimate(
    samples: &[f64],
    sample_rate: u32,
    params: &VocoderParams,
    mode: AnalysisMode,
) -> Vec<PitchFrame> {
    let hop = params.hop_samples(sample_rate);
    let frames = params.frame_count(samples.len(), sample_rate);
    let lags = LagRange::new(sample_rate, params);
    let window = lags.window();

    let global_rms = rms(samples);
    let silence = global_rms * SILENCE_RATIO;

    let mut estimator: Box<dyn FnMut(&[f64]) -> Option<(f64, f64)>> = match mode {
        AnalysisMode::DioStonemask => {
            Box::new(move |segment: &[f64]| autocorrelation_peak(segment, lags))
        }
        AnalysisMode::Harvest => {
            let mut nsdf = NsdfEstimator::new(window, lags);
            Box::new(move |segment: &[f64]| nsdf.peak(segment))
        }
    };

    let mut segment = vec![0.0; window];
    let mut track: Vec<PitchFrame> = (0..frames)
        .map(|t| {
            let center = (t as f64 * hop).round() as i64;
            extract_segment(samples, center - (window / 2) as i64, &mut segment);

            let level = rms(&segment);
            if level <= 0.0 || level < silence {
                return PitchFrame::UNVOICED;
            }

            match estimator(&segment) {
                Some((period, periodicity)) if periodicity >= VOICING_THRESHOLD => {
                    let f0 = sample_rate as f64 / period;
                    if f0 >= params.f0_floor_hz && f0 <= params.f0_ceil_hz {
                        PitchFrame { f0, periodicity }
                    } else {
                        PitchFrame::UNVOICED
                    }
                }
                _ => PitchFrame::UNVOICED,
            }
        })
        .collect();

    if mode == AnalysisMode::Harvest {
        median_smooth(&mut track);
    }
    track
}

/// Copies `out.len()` samples starting at `start`, zero-filling outside
/// the signal.
fn extract_segment(samples: &[f64], start: i64, out: &mut [f64]) {
    for (i, slot) in out.iter_mut().enumerate() {
        let idx = start + i as i64;
        *slot = if idx >= 0 && (idx as usize) < samples.len() {
            samples[idx as usize]
        } else {
            0.0
        };
    }
}

fn rms(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    (samples.iter().map(|s| s * s).sum::<f64>() / samples.len() as f64).sqrt()
}

/// Normalized autocorrelation over `[min - 1, max + 1]`, then peak pick.
fn autocorrelation_peak(segment: &[f64], lags: LagRange) -> Option<(f64, f64)> {
    let first = lags.min - 1;
    let last = lags.max + 1;
    let n = segment.len();

    let values: Vec<f64> = (first..=last)
        .map(|lag| {
            let head = &segment[..n - lag];
            let tail = &segment[lag..];
            let cross: f64 = head.iter().zip(tail).map(|(a, b)| a * b).sum();
            let energy_head: f64 = head.iter().map(|a| a * a).sum();
            let energy_tail: f64 = tail.iter().map(|b| b * b).sum();
            let denom = (energy_head * energy_tail).sqrt();
            if denom > 0.0 {
                cross / denom
            } else {
                0.0
            }
        })
        .collect();

    pick_peak(&values, first, AUTOCORR_PEAK_RATIO)
}

/// Normalized square difference function evaluated through one FFT.
struct NsdfEstimator {
    fft_size: usize,
    forward: std::sync::Arc<dyn rustfft::Fft<f64>>,
    inverse: std::sync::Arc<dyn rustfft::Fft<f64>>,
    buffer: Vec<Complex<f64>>,
    lags: LagRange,
}

impl NsdfEstimator {
    fn new(window: usize, lags: LagRange) -> Self {
        let fft_size = (2 * window).next_power_of_two();
        let mut planner = FftPlanner::<f64>::new();
        Self {
            fft_size,
            forward: planner.plan_fft_forward(fft_size),
            inverse: planner.plan_fft_inverse(fft_size),
            buffer: vec![Complex::new(0.0, 0.0); fft_size],
            lags,
        }
    }

    fn peak(&mut self, segment: &[f64]) -> Option<(f64, f64)> {
        let n = segment.len();
        self.buffer.fill(Complex::new(0.0, 0.0));
        for (slot, &x) in self.buffer.iter_mut().zip(segment) {
            slot.re = x;
        }
        self.forward.process(&mut self.buffer);
        for bin in self.buffer.iter_mut() {
            *bin = Complex::new(bin.norm_sqr(), 0.0);
        }
        self.inverse.process(&mut self.buffer);
        let scale = 1.0 / self.fft_size as f64;

        // m(tau) = sum over the overlap of x[j]^2 + x[j + tau]^2
        let first = self.lags.min - 1;
        let last = self.lags.max + 1;
        let mut m: f64 = 2.0 * segment.iter().map(|x| x * x).sum::<f64>();
        let mut values = Vec::with_capacity(last - first + 1);
        for tau in 1..=last {
            m -= segment[tau - 1] * segment[tau - 1] + segment[n - tau] * segment[n - tau];
            if tau < first {
                continue;
            }
            let r = self.buffer[tau].re * scale;
            values.push(if m > 1e-12 { 2.0 * r / m } else { 0.0 });
        }

        pick_peak(&values, first, NSDF_KEY_MAX_RATIO)
    }
}

/// Picks the shortest-lag local maximum whose height is at least `ratio`
/// times the highest one, then refines it by parabolic interpolation.
///
/// `values[i]` holds the correlation at lag `first + i`. The first and last
/// entries are only used as interpolation neighbors. Returns the refined
/// period in samples and the interpolated peak height.
fn pick_peak(values: &[f64], first: usize, ratio: f64) -> Option<(f64, f64)> {
    if values.len() < 3 {
        return None;
    }
    let peaks: Vec<usize> = (1..values.len() - 1)
        .filter(|&i| values[i] > values[i - 1] && values[i] >= values[i + 1] && values[i] > 0.0)
        .collect();

    let best = peaks.iter().map(|&i| values[i]).fold(f64::MIN, f64::max);
    let chosen = peaks.into_iter().find(|&i| values[i] >= ratio * best)?;

    let (a, b, c) = (values[chosen - 1], values[chosen], values[chosen + 1]);
    let denom = a - 2.0 * b + c;
    let delta = if denom.abs() > 1e-12 {
        (0.5 * (a - c) / denom).clamp(-0.5, 0.5)
    } else {
        0.0
    };
    let height = (b - 0.25 * (a - c) * delta).clamp(0.0, 1.0);

    Some(((first + chosen) as f64 + delta, height))
}

/// Replaces each voiced F0 with the median of itself and its two voiced
/// neighbors.
fn median_smooth(track: &mut [PitchFrame]) {
    if track.len() < 3 {
        return;
    }
    let original: Vec<f64> = track.iter().map(|frame| frame.f0).collect();
    for t in 1..track.len() - 1 {
        let mut window = [original[t - 1], original[t], original[t + 1]];
        if window.iter().any(|&f| f <= 0.0) {
            continue;
        }
        window.sort_by(|a, b| a.total_cmp(b));
        track[t].f0 = window[1];
    }
}
