//! Voice transform integration tests with the built-in vocoder.

use sincvox_dsp::vocoder::F0Summary;
use sincvox_dsp::{
    transform, Analyzer, DspError, Signal, SpectralVocoder, VoiceTransformConfig,
};
use sincvox_spec::{AnalysisMode, NormalizationStrategy, VoiceParams};

const FS: u32 = 16000;

fn voiced(f0: f64, seconds: f64, amplitude: f64) -> Signal {
    let n = (seconds * FS as f64) as usize;
    let samples = (0..n)
        .map(|i| {
            let t = i as f64 / FS as f64;
            (1..=8)
                .map(|h| (2.0 * std::f64::consts::PI * f0 * h as f64 * t).sin() / h as f64)
                .sum::<f64>()
                * amplitude
        })
        .collect();
    Signal::mono(samples, FS)
}

fn config(pitch_factor: f64, normalization: NormalizationStrategy) -> VoiceTransformConfig {
    VoiceTransformConfig {
        pitch_factor,
        normalization,
        output_gain: 1.0,
    }
}

#[test]
fn test_pitch_shift_in_both_modes() {
    let signal = voiced(140.0, 0.6, 6000.0);
    for mode in [AnalysisMode::DioStonemask, AnalysisMode::Harvest] {
        let vocoder = SpectralVocoder::from_voice_params(&VoiceParams::default(), mode);
        let out = transform(
            &signal,
            &config(1.5, NormalizationStrategy::default()),
            &vocoder,
            &vocoder,
        )
        .unwrap();

        let original = out.original_summary();
        assert!(original.voiced > original.frames / 2, "{:?} {:?}", mode, original);

        let reanalyzed = vocoder.analyze(out.signal.samples(), FS).unwrap();
        let summary = F0Summary::from_track(&reanalyzed.f0);
        assert!(
            (summary.mean_hz - 210.0).abs() < 15.0,
            "{:?}: mean F0 {}",
            mode,
            summary.mean_hz
        );
    }
}

#[test]
fn test_normalization_strategies_agree_on_pitch() {
    let signal = voiced(160.0, 0.5, 9000.0);
    let vocoder = SpectralVocoder::default();

    for strategy in [
        NormalizationStrategy::MinMax,
        NormalizationStrategy::FixedScale { divisor: 32768.0 },
        NormalizationStrategy::FixedScale { divisor: 1.0 },
    ] {
        let out = transform(&signal, &config(2.0, strategy), &vocoder, &vocoder).unwrap();
        assert_eq!(out.signal.channels(), 1);
        let summary = out.modified_summary();
        assert!(
            (summary.mean_hz - 320.0).abs() < 16.0,
            "{:?}: mean F0 {}",
            strategy,
            summary.mean_hz
        );
    }
}

#[test]
fn test_output_gain_scales_result() {
    let signal = voiced(150.0, 0.3, 5000.0);
    let vocoder = SpectralVocoder::default();
    let unity = transform(
        &signal,
        &config(1.0, NormalizationStrategy::default()),
        &vocoder,
        &vocoder,
    )
    .unwrap();
    let halved = transform(
        &signal,
        &VoiceTransformConfig {
            output_gain: 0.5,
            ..config(1.0, NormalizationStrategy::default())
        },
        &vocoder,
        &vocoder,
    )
    .unwrap();

    for (a, b) in unity.signal.samples().iter().zip(halved.signal.samples()) {
        assert!((a * 0.5 - b).abs() < 1e-9);
    }
}

#[test]
fn test_rejected_inputs() {
    let vocoder = SpectralVocoder::default();
    let signal = voiced(150.0, 0.1, 5000.0);

    for factor in [0.0, -2.0, f64::NAN] {
        assert!(matches!(
            transform(
                &signal,
                &config(factor, NormalizationStrategy::default()),
                &vocoder,
                &vocoder
            ),
            Err(DspError::InvalidParameter { .. })
        ));
    }

    let empty = Signal::mono(Vec::new(), FS);
    assert!(matches!(
        transform(
            &empty,
            &config(2.0, NormalizationStrategy::default()),
            &vocoder,
            &vocoder
        ),
        Err(DspError::EmptyInput)
    ));
}
