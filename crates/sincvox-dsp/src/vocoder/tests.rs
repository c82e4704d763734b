//! Tests for the built-in vocoder.

use super::*;
use pretty_assertions::assert_eq;
use std::f64::consts::PI;

const FS: u32 = 16000;

fn harmonic_tone(f0: f64, seconds: f64) -> Vec<f64> {
    let n = (seconds * FS as f64) as usize;
    (0..n)
        .map(|i| {
            let t = i as f64 / FS as f64;
            (1..=10)
                .map(|h| (2.0 * PI * f0 * h as f64 * t).sin() / h as f64)
                .sum::<f64>()
                * 0.5
        })
        .collect()
}

fn median_voiced(f0: &[f64]) -> f64 {
    let mut voiced: Vec<f64> = f0.iter().copied().filter(|&f| f > 0.0).collect();
    assert!(!voiced.is_empty(), "no voiced frames");
    voiced.sort_by(|a, b| a.total_cmp(b));
    voiced[voiced.len() / 2]
}

fn rms(samples: &[f64]) -> f64 {
    (samples.iter().map(|s| s * s).sum::<f64>() / samples.len() as f64).sqrt()
}

// =========================================================================
// Analysis
// =========================================================================

#[test]
fn test_analysis_dimensions() {
    let samples = harmonic_tone(150.0, 0.5);
    let vocoder = SpectralVocoder::default();
    let features = vocoder.analyze(&samples, FS).unwrap();

    assert_eq!(features.frames(), 8000 / 80 + 1);
    assert_eq!(features.bins(), 513);
    assert_eq!(features.frame_period_ms, 5.0);
    assert!(features.validate().is_ok());
}

#[test]
fn test_analysis_tracks_harmonic_tone() {
    let samples = harmonic_tone(150.0, 0.5);
    for mode in [AnalysisMode::DioStonemask, AnalysisMode::Harvest] {
        let vocoder = SpectralVocoder::new(VocoderParams::default(), mode);
        let features = vocoder.analyze(&samples, FS).unwrap();
        let f0 = median_voiced(&features.f0);
        assert!((f0 - 150.0).abs() < 3.0, "{}: median F0 {}", mode, f0);
        assert!(features.voiced_frames() > features.frames() * 3 / 4);
    }
}

#[test]
fn test_silence_analyzes_as_unvoiced_noise() {
    let vocoder = SpectralVocoder::default();
    let features = vocoder.analyze(&[0.0; 1600], FS).unwrap();

    assert_eq!(features.voiced_frames(), 0);
    assert!(features.aperiodicity.iter().flatten().all(|&a| a == 1.0));
    assert!(features.spectral_envelope.iter().flatten().all(|&p| p == 0.0));
}

#[test]
fn test_analysis_rejects_bad_input() {
    let vocoder = SpectralVocoder::default();
    assert!(matches!(
        vocoder.analyze(&[], FS),
        Err(CapabilityError::Analysis(_))
    ));
    assert!(vocoder.analyze(&[0.1; 100], 0).is_err());
    // Default F0 ceiling of 800 Hz is above Nyquist at 1 kHz.
    assert!(vocoder.analyze(&[0.1; 100], 1000).is_err());
}

#[test]
fn test_analysis_is_deterministic() {
    let samples = harmonic_tone(220.0, 0.25);
    let vocoder = SpectralVocoder::new(VocoderParams::default(), AnalysisMode::Harvest);
    assert_eq!(
        vocoder.analyze(&samples, FS).unwrap(),
        vocoder.analyze(&samples, FS).unwrap()
    );
}

// =========================================================================
// Synthesis
// =========================================================================

#[test]
fn test_synthesis_length_follows_frame_grid() {
    let samples = harmonic_tone(150.0, 0.5);
    let vocoder = SpectralVocoder::default();
    let features = vocoder.analyze(&samples, FS).unwrap();
    let out = vocoder.synthesize(&features, FS).unwrap();
    assert_eq!(out.len(), (features.frames() - 1) * 80 + 1);
}

#[test]
fn test_synthesis_is_deterministic_per_seed() {
    let samples = harmonic_tone(150.0, 0.3);
    let vocoder = SpectralVocoder::default();
    let features = vocoder.analyze(&samples, FS).unwrap();

    let a = vocoder.synthesize(&features, FS).unwrap();
    let b = vocoder.synthesize(&features, FS).unwrap();
    assert_eq!(a, b);

    let other_seed = SpectralVocoder::new(
        VocoderParams {
            seed: 7,
            ..VocoderParams::default()
        },
        AnalysisMode::DioStonemask,
    );
    let c = other_seed.synthesize(&features, FS).unwrap();
    assert_ne!(a, c);
}

#[test]
fn test_resynthesis_preserves_level_roughly() {
    let samples = harmonic_tone(150.0, 0.5);
    let vocoder = SpectralVocoder::default();
    let features = vocoder.analyze(&samples, FS).unwrap();
    let out = vocoder.synthesize(&features, FS).unwrap();

    let ratio = rms(&out[800..7200]) / rms(&samples[800..7200]);
    assert!(ratio > 0.25 && ratio < 4.0, "level ratio {}", ratio);
}

#[test]
fn test_doubled_f0_resynthesizes_an_octave_up() {
    let samples = harmonic_tone(150.0, 0.5);
    let vocoder = SpectralVocoder::default();
    let features = vocoder.analyze(&samples, FS).unwrap();
    let out = vocoder
        .synthesize(&features.with_scaled_f0(2.0), FS)
        .unwrap();

    let reanalyzed = vocoder.analyze(&out, FS).unwrap();
    let f0 = median_voiced(&reanalyzed.f0);
    assert!((f0 - 300.0).abs() < 15.0, "median F0 {}", f0);
}

#[test]
fn test_silent_features_synthesize_silence() {
    let vocoder = SpectralVocoder::default();
    let features = vocoder.analyze(&[0.0; 1600], FS).unwrap();
    let out = vocoder.synthesize(&features, FS).unwrap();
    assert!(out.iter().all(|&s| s == 0.0));
}

#[test]
fn test_synthesis_rejects_malformed_features() {
    let features = VocoderFeatures {
        f0: vec![100.0; 3],
        spectral_envelope: vec![vec![1.0; 513]; 2],
        aperiodicity: vec![vec![0.5; 513]; 3],
        frame_period_ms: 5.0,
    };
    assert!(matches!(
        SpectralVocoder::default().synthesize(&features, FS),
        Err(CapabilityError::MalformedFeatures(_))
    ));
}

#[test]
fn test_synthesis_rejects_hop_longer_than_fft() {
    let features = VocoderFeatures {
        f0: vec![100.0; 3],
        spectral_envelope: vec![vec![1.0; 9]; 3],
        aperiodicity: vec![vec![0.5; 9]; 3],
        frame_period_ms: 5.0,
    };
    assert!(matches!(
        SpectralVocoder::default().synthesize(&features, FS),
        Err(CapabilityError::Synthesis(_))
    ));
}

#[test]
fn test_params_from_voice_params() {
    let voice = sincvox_spec::VoiceParams {
        frame_period_ms: 10.0,
        seed: 42,
        ..Default::default()
    };
    let vocoder = SpectralVocoder::from_voice_params(&voice, AnalysisMode::Harvest);
    assert_eq!(vocoder.params().frame_period_ms, 10.0);
    assert_eq!(vocoder.params().seed, 42);
    assert_eq!(vocoder.params().hop_samples(FS), 160.0);
    assert_eq!(vocoder.params().frame_count(16000, FS), 101);
    assert_eq!(vocoder.mode(), AnalysisMode::Harvest);
}
