//! Deterministic test signals in the 16-bit sample scale.

use rand::Rng;
use sincvox_dsp::rng::create_rng;
use std::f64::consts::PI;

/// Number of samples in `seconds` at `sample_rate`.
fn sample_count(sample_rate: u32, seconds: f64) -> usize {
    (seconds * sample_rate as f64).round() as usize
}

/// Sum of sines, each `(frequency, amplitude)`.
pub fn sines(components: &[(f64, f64)], sample_rate: u32, seconds: f64) -> Vec<i16> {
    (0..sample_count(sample_rate, seconds))
        .map(|i| {
            let t = i as f64 / sample_rate as f64;
            let value: f64 = components
                .iter()
                .map(|&(freq, amp)| amp * (2.0 * PI * freq * t).sin())
                .sum();
            value.round().clamp(i16::MIN as f64, i16::MAX as f64) as i16
        })
        .collect()
}

/// Voice-like tone: ten harmonics of `f0` with 1/h amplitudes.
pub fn harmonic_tone(f0: f64, sample_rate: u32, seconds: f64, amplitude: f64) -> Vec<i16> {
    let components: Vec<(f64, f64)> = (1..=10)
        .map(|h| (f0 * h as f64, amplitude / h as f64))
        .filter(|&(freq, _)| freq < sample_rate as f64 / 2.0)
        .collect();
    sines(&components, sample_rate, seconds)
}

/// Uniform white noise from a seeded PCG stream.
pub fn white_noise(seed: u32, len: usize, amplitude: f64) -> Vec<i16> {
    let mut rng = create_rng(seed);
    (0..len)
        .map(|_| (rng.gen_range(-1.0..=1.0) * amplitude).round() as i16)
        .collect()
}

/// Interleaves equal-length channel buffers.
pub fn interleave(channels: &[Vec<i16>]) -> Vec<i16> {
    let frames = channels.first().map_or(0, Vec::len);
    (0..frames)
        .flat_map(|i| channels.iter().map(move |c| c[i]))
        .collect()
}

/// Amplitude of the `frequency` component of `samples` (Goertzel).
///
/// A full-scale sine of amplitude `A` gives roughly `A` when the analyzed
/// span holds many periods.
pub fn tone_amplitude(samples: &[f64], frequency: f64, sample_rate: u32) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let omega = 2.0 * PI * frequency / sample_rate as f64;
    let coeff = 2.0 * omega.cos();
    let (mut s1, mut s2) = (0.0, 0.0);
    for &x in samples {
        let s0 = x + coeff * s1 - s2;
        s2 = s1;
        s1 = s0;
    }
    let power = s1 * s1 + s2 * s2 - coeff * s1 * s2;
    2.0 * power.max(0.0).sqrt() / samples.len() as f64
}
