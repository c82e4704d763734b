//! Pitch-adaptive spectral envelope.

use rustfft::{num_complex::Complex, FftPlanner};

use crate::filter::hann_window;

/// F0 assumed for unvoiced frames when sizing the analysis window.
const UNVOICED_F0: f64 = 500.0;

/// FFT size used for envelopes: `2^(1 + floor(log2(3 fs / f0_floor)))`.
///
/// Always larger than three periods of the lowest F0, so a pitch-adaptive
/// window never needs truncating.
///
/// ```
/// use sincvox_dsp::vocoder::envelope_fft_size;
///
/// assert_eq!(envelope_fft_size(16000, 71.0), 1024);
/// assert_eq!(envelope_fft_size(44100, 71.0), 2048);
/// ```
pub fn envelope_fft_size(sample_rate: u32, f0_floor_hz: f64) -> usize {
    let periods = 3.0 * sample_rate as f64 / f0_floor_hz;
    1usize << (1 + periods.log2().floor().max(0.0) as u32)
}

/// Estimates one power spectral density row per frame.
///
/// Each frame is windowed with a Hann window three periods long, so the
/// harmonics of voiced frames are only partially resolved, and the power
/// spectrum is then averaged across one F0 of bandwidth to remove the
/// remaining ripple.
pub(crate) fn estimate(
    samples: &[f64],
    sample_rate: u32,
    hop: f64,
    f0: &[f64],
    fft_size: usize,
) -> Vec<Vec<f64>> {
    let fs = sample_rate as f64;
    let bins = fft_size / 2 + 1;
    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(fft_size);
    let mut buffer = vec![Complex::new(0.0, 0.0); fft_size];

    f0.iter()
        .enumerate()
        .map(|(t, &frame_f0)| {
            let f0_eff = if frame_f0 > 0.0 { frame_f0 } else { UNVOICED_F0 };
            let len = ((3.0 * fs / f0_eff).round() as usize).clamp(3, fft_size);
            let window = hann_window(len);
            let energy: f64 = window.iter().map(|w| w * w).sum();

            let center = (t as f64 * hop).round() as i64;
            let start = center - (len / 2) as i64;

            buffer.fill(Complex::new(0.0, 0.0));
            for (i, (slot, w)) in buffer.iter_mut().zip(&window).enumerate() {
                let idx = start + i as i64;
                if idx >= 0 && (idx as usize) < samples.len() {
                    slot.re = samples[idx as usize] * w;
                }
            }
            fft.process(&mut buffer);

            let power: Vec<f64> = buffer[..bins]
                .iter()
                .map(|c| c.norm_sqr() / energy)
                .collect();

            let width_bins = f0_eff * fft_size as f64 / fs;
            smooth(&power, (width_bins / 2.0).round() as usize)
        })
        .collect()
}

/// Centered moving average over `2 * half + 1` bins with mirrored edges.
fn smooth(power: &[f64], half: usize) -> Vec<f64> {
    let n = power.len();
    if half == 0 || n < 2 {
        return power.to_vec();
    }

    let mirrored = |i: i64| -> f64 {
        let period = 2 * (n as i64 - 1);
        let mut k = i.rem_euclid(period);
        if k >= n as i64 {
            k = period - k;
        }
        power[k as usize]
    };

    // prefix[i] = sum of extended[0..i], extended index 0 = bin -half
    let h = half as i64;
    let mut prefix = Vec::with_capacity(n + 2 * half + 1);
    prefix.push(0.0);
    let mut acc = 0.0;
    for i in -h..(n as i64 + h) {
        acc += mirrored(i);
        prefix.push(acc);
    }

    let width = (2 * half + 1) as f64;
    (0..n)
        .map(|k| (prefix[k + 2 * half + 1] - prefix[k]) / width)
        .collect()
}
