//! Mixed-excitation resynthesis.

use rand::Rng;
use rustfft::{num_complex::Complex, FftPlanner};

use super::VocoderFeatures;
use crate::error::CapabilityError;
use crate::rng::stream_rng;

/// Half-width of a uniform distribution with unit variance.
const UNIT_UNIFORM: f64 = 1.732_050_807_568_877_2;

/// Renders features back to samples.
///
/// A unit-power pulse train at the frame F0 and unit-variance white noise
/// are cut into periodic-Hann frames at 50% overlap. Each frame mixes the two
/// per bin by aperiodicity, is shaped by the square root of the envelope,
/// and is overlap-added back into place.
pub(crate) fn synthesize(
    features: &VocoderFeatures,
    sample_rate: u32,
    seed: u32,
) -> Result<Vec<f64>, CapabilityError> {
    if sample_rate == 0 {
        return Err(CapabilityError::Synthesis(
            "sample rate must be positive".to_string(),
        ));
    }
    let fs = sample_rate as f64;
    let hop = features.frame_period_ms * fs / 1000.0;
    let hop_len = hop.round() as usize;
    let fft_size = features.fft_size();
    if hop_len == 0 || 2 * hop_len > fft_size {
        return Err(CapabilityError::Synthesis(format!(
            "frame hop of {} samples does not fit an FFT of {}",
            hop_len, fft_size
        )));
    }

    let frames = features.frames();
    let out_len = ((frames - 1) as f64 * hop).round() as usize + 1;

    let pulses = pulse_train(&features.f0, hop, fs, out_len);
    let mut rng = stream_rng(seed, "aperiodic_noise");
    let noise: Vec<f64> = (0..out_len)
        .map(|_| rng.gen_range(-UNIT_UNIFORM..UNIT_UNIFORM))
        .collect();

    let seg_len = 2 * hop_len;
    let window: Vec<f64> = (0..seg_len)
        .map(|n| 0.5 - 0.5 * (2.0 * std::f64::consts::PI * n as f64 / seg_len as f64).cos())
        .collect();

    let mut planner = FftPlanner::<f64>::new();
    let forward = planner.plan_fft_forward(fft_size);
    let inverse = planner.plan_fft_inverse(fft_size);
    let mut periodic = vec![Complex::new(0.0, 0.0); fft_size];
    let mut aperiodic = vec![Complex::new(0.0, 0.0); fft_size];

    let half_fft = fft_size / 2;
    let mut padded = vec![0.0; out_len + fft_size];
    let scale = 1.0 / fft_size as f64;

    for t in 0..frames {
        let center = (t as f64 * hop).round() as i64;
        let seg_start = center - hop_len as i64;

        periodic.fill(Complex::new(0.0, 0.0));
        aperiodic.fill(Complex::new(0.0, 0.0));
        for (n, w) in window.iter().enumerate() {
            let idx = seg_start + n as i64;
            if idx < 0 || idx as usize >= out_len {
                continue;
            }
            let slot = half_fft - hop_len + n;
            periodic[slot].re = pulses[idx as usize] * w;
            aperiodic[slot].re = noise[idx as usize] * w;
        }

        forward.process(&mut periodic);
        forward.process(&mut aperiodic);

        let envelope = &features.spectral_envelope[t];
        let ap = &features.aperiodicity[t];
        for k in 0..fft_size {
            let bin = if k <= half_fft { k } else { fft_size - k };
            let amplitude = envelope[bin].max(0.0).sqrt();
            let a = ap[bin].clamp(0.0, 1.0);
            periodic[k] = (periodic[k] * (1.0 - a).sqrt() + aperiodic[k] * a.sqrt()) * amplitude;
        }
        inverse.process(&mut periodic);

        // Buffer index j holds output sample center - half_fft + j.
        let base = center as usize;
        for (acc, value) in padded[base..base + fft_size].iter_mut().zip(&periodic) {
            *acc += value.re * scale;
        }
    }

    Ok(padded[half_fft..half_fft + out_len].to_vec())
}

/// Pulse train with one impulse of height `sqrt(T0)` per period, so its mean
/// power is 1. F0 is held per frame; unvoiced stretches emit nothing.
fn pulse_train(f0: &[f64], hop: f64, fs: f64, len: usize) -> Vec<f64> {
    let mut out = vec![0.0; len];
    let mut phase = 0.0;
    for (n, slot) in out.iter_mut().enumerate() {
        let frame = ((n as f64 / hop).round() as usize).min(f0.len() - 1);
        let freq = f0[frame];
        if freq <= 0.0 {
            continue;
        }
        phase += freq / fs;
        if phase >= 1.0 {
            phase -= phase.floor();
            *slot = (fs / freq).sqrt();
        }
    }
    out
}
