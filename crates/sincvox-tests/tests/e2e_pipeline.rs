//! End-to-End Processing Tests for SincVox
//!
//! Tests verify:
//! - Every action writes a decodable 16-bit file of the expected layout
//! - Filter outputs keep the input's length, channel layout and alignment
//! - Each branch passes and rejects the frequencies it should
//! - The voice transform shifts pitch and writes a mono file
//! - Configuration files and overrides reach the pipelines
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p sincvox-tests --test e2e_pipeline
//! ```

use pretty_assertions::assert_eq;
use sincvox_cli::commands::actions::ACTIONS;
use sincvox_cli::commands::process::Pipelines;
use sincvox_cli::settings::ConfigOverrides;
use sincvox_dsp::{Analyzer, SpectralVocoder};
use sincvox_spec::{BandParams, RunConfig};
use sincvox_tests::fixtures::{harmonic_tone, interleave, sines, tone_amplitude};
use sincvox_tests::harness::read_pcm16;
use sincvox_tests::TestHarness;

const FS: u32 = 16000;

/// Middle of a one-second output, away from the kernel's edge effects.
const STEADY: std::ops::Range<usize> = 2000..14000;

fn median_voiced(f0: &[f64]) -> f64 {
    let mut voiced: Vec<f64> = f0.iter().copied().filter(|&f| f > 0.0).collect();
    assert!(!voiced.is_empty(), "no voiced frames");
    voiced.sort_by(|a, b| a.total_cmp(b));
    voiced[voiced.len() / 2]
}

// ============================================================================
// Layout
// ============================================================================

#[test]
fn test_default_run_writes_every_action() {
    let harness = TestHarness::new();
    let input = harness.write_input("in.wav", &harmonic_tone(150.0, FS, 1.0, 8000.0), 1, FS);
    let out_dir = harness.out_dir("out");

    let output = harness.process(&input, &out_dir, &RunConfig::default(), Pipelines::ALL);
    assert!(output.success, "{:?}", output.errors);
    assert_eq!(output.outputs.len(), 4);

    for action in &ACTIONS {
        let decoded = read_pcm16(&action.output_path(&out_dir));
        assert_eq!(decoded.spec.sample_rate, FS, "{}", action.name);
        assert_eq!(decoded.spec.channels, 1, "{}", action.name);
    }

    for name in ["lowpass.wav", "highpass.wav", "bandpass.wav"] {
        assert_eq!(read_pcm16(&out_dir.join(name)).frames(), 16000, "{}", name);
    }

    let voice = read_pcm16(&out_dir.join("VC1_test.wav"));
    assert!(
        (voice.frames() as i64 - 16000).abs() <= 80,
        "voice frames {}",
        voice.frames()
    );
}

#[test]
fn test_output_hashes_match_written_files() {
    let harness = TestHarness::new();
    let input = harness.write_input("in.wav", &harmonic_tone(120.0, FS, 0.5, 6000.0), 1, FS);
    let out_dir = harness.out_dir("out");

    let output = harness.process(&input, &out_dir, &RunConfig::default(), Pipelines::ALL);
    assert!(output.success, "{:?}", output.errors);

    for record in &output.outputs {
        let bytes = std::fs::read(&record.path).unwrap();
        assert_eq!(
            sincvox_dsp::wav::wav_pcm_hash(&bytes).as_deref(),
            Some(record.pcm_hash.as_str()),
            "{}",
            record.action
        );
    }
}

#[test]
fn test_stereo_channels_are_filtered_independently() {
    let harness = TestHarness::new();
    let left = sines(&[(200.0, 6000.0)], FS, 1.0);
    let right = sines(&[(3000.0, 6000.0)], FS, 1.0);
    let input = harness.write_input("stereo.wav", &interleave(&[left, right]), 2, FS);
    let out_dir = harness.out_dir("out");

    let output = harness.process(&input, &out_dir, &RunConfig::default(), Pipelines::ALL);
    assert!(output.success, "{:?}", output.errors);

    let low = read_pcm16(&out_dir.join("lowpass.wav"));
    assert_eq!(low.spec.channels, 2);
    assert_eq!(low.frames(), 16000);

    let low_left = low.channel(0);
    let low_right = low.channel(1);
    assert!(tone_amplitude(&low_left[STEADY], 200.0, FS) > 5800.0);
    assert!(tone_amplitude(&low_right[STEADY], 3000.0, FS) < 100.0);
    assert!(tone_amplitude(&low_right[STEADY], 200.0, FS) < 100.0);

    let voice = read_pcm16(&out_dir.join("VC1_test.wav"));
    assert_eq!(voice.spec.channels, 1);
}

#[test]
fn test_float_input_is_rescaled() {
    let harness = TestHarness::new();
    let samples: Vec<f32> = (0..FS as usize)
        .map(|i| 0.25 * (2.0 * std::f32::consts::PI * 200.0 * i as f32 / FS as f32).sin())
        .collect();
    let input = harness.write_float_input("float.wav", &samples, 1, FS);
    let out_dir = harness.out_dir("out");

    let output = harness.process(
        &input,
        &out_dir,
        &RunConfig::default(),
        Pipelines::FILTER_ONLY,
    );
    assert!(output.success, "{:?}", output.errors);

    let low = read_pcm16(&out_dir.join("lowpass.wav")).channel(0);
    let amplitude = tone_amplitude(&low[STEADY], 200.0, FS);
    assert!((amplitude - 8192.0).abs() < 100.0, "amplitude {}", amplitude);
}

// ============================================================================
// Frequency behavior
// ============================================================================

#[test]
fn test_branches_separate_frequencies() {
    let harness = TestHarness::new();
    let mix = sines(
        &[(200.0, 5000.0), (750.0, 5000.0), (3000.0, 5000.0)],
        FS,
        1.0,
    );
    let input = harness.write_input("mix.wav", &mix, 1, FS);
    let out_dir = harness.out_dir("out");

    let output = harness.process(
        &input,
        &out_dir,
        &RunConfig::default(),
        Pipelines::FILTER_ONLY,
    );
    assert!(output.success, "{:?}", output.errors);

    let measure = |name: &str, freq: f64| {
        let samples = read_pcm16(&out_dir.join(name)).channel(0);
        tone_amplitude(&samples[STEADY], freq, FS)
    };

    assert!(measure("lowpass.wav", 200.0) > 4800.0);
    assert!(measure("lowpass.wav", 750.0) < 100.0);
    assert!(measure("lowpass.wav", 3000.0) < 100.0);

    assert!(measure("highpass.wav", 200.0) < 100.0);
    assert!(measure("highpass.wav", 3000.0) > 4800.0);

    assert!(measure("bandpass.wav", 200.0) < 100.0);
    assert!(measure("bandpass.wav", 750.0) > 4800.0);
    assert!(measure("bandpass.wav", 3000.0) < 100.0);
}

#[test]
fn test_filtering_preserves_alignment() {
    let harness = TestHarness::new();
    let tone = sines(&[(200.0, 6000.0)], FS, 1.0);
    let input = harness.write_input("tone.wav", &tone, 1, FS);
    let out_dir = harness.out_dir("out");

    harness.process(
        &input,
        &out_dir,
        &RunConfig::default(),
        Pipelines::FILTER_ONLY,
    );

    let low = read_pcm16(&out_dir.join("lowpass.wav"));
    for i in STEADY.step_by(97) {
        let diff = (low.samples[i] as i32 - tone[i] as i32).abs();
        assert!(diff < 120, "sample {} differs by {}", i, diff);
    }
}

#[test]
fn test_lowpass_of_silence_is_silent() {
    let harness = TestHarness::new();
    let input = harness.write_input("silence.wav", &vec![0i16; FS as usize], 1, FS);
    let out_dir = harness.out_dir("out");

    let output = harness.process(&input, &out_dir, &RunConfig::default(), Pipelines::ALL);
    assert!(output.success, "{:?}", output.errors);
    assert_eq!(output.outputs[0].taps, Some(497));

    for action in &ACTIONS {
        let decoded = read_pcm16(&action.output_path(&out_dir));
        assert!(
            decoded.samples.iter().all(|&s| s == 0),
            "{} is not silent",
            action.name
        );
    }
}

// ============================================================================
// Voice transform
// ============================================================================

#[test]
fn test_voice_doubles_pitch() {
    let harness = TestHarness::new();
    let input = harness.write_input("voice.wav", &harmonic_tone(150.0, FS, 1.0, 8000.0), 1, FS);
    let out_dir = harness.out_dir("out");

    let output = harness.process(
        &input,
        &out_dir,
        &RunConfig::default(),
        Pipelines::VOICE_ONLY,
    );
    assert!(output.success, "{:?}", output.errors);

    let report = output.voice.unwrap();
    assert!((report.original_f0.mean_hz - 150.0).abs() < 10.0);
    assert!((report.modified_f0.mean_hz - 2.0 * report.original_f0.mean_hz).abs() < 1e-9);

    let decoded = read_pcm16(&out_dir.join("VC1_test.wav"));
    let features = SpectralVocoder::default()
        .analyze(&decoded.channel(0), FS)
        .unwrap();
    let f0 = median_voiced(&features.f0);
    assert!((f0 - 300.0).abs() < 15.0, "median F0 {}", f0);
}

#[test]
fn test_unit_pitch_keeps_f0_track() {
    let harness = TestHarness::new();
    let input = harness.write_input("voice.wav", &harmonic_tone(180.0, FS, 0.5, 8000.0), 1, FS);
    let out_dir = harness.out_dir("out");

    let overrides = ConfigOverrides {
        pitch_factor: Some(1.0),
        ..Default::default()
    };
    let output = harness.process_with(&input, &out_dir, None, overrides, Pipelines::VOICE_ONLY);
    assert!(output.success, "{:?}", output.errors);

    let report = output.voice.unwrap();
    assert_eq!(report.pitch_factor, 1.0);
    assert_eq!(report.original_f0, report.modified_f0);
}

#[test]
fn test_min_max_normalization_runs() {
    let harness = TestHarness::new();
    let input = harness.write_input("voice.wav", &harmonic_tone(150.0, FS, 0.5, 8000.0), 1, FS);
    let out_dir = harness.out_dir("out");

    let overrides = ConfigOverrides {
        normalize: Some(sincvox_cli::settings::NormalizeChoice::MinMax),
        ..Default::default()
    };
    let output = harness.process_with(&input, &out_dir, None, overrides, Pipelines::VOICE_ONLY);
    assert!(output.success, "{:?}", output.errors);

    let decoded = read_pcm16(&out_dir.join("VC1_test.wav"));
    assert!(decoded.samples.iter().any(|&s| s != 0));
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_config_file_reaches_filters() {
    let harness = TestHarness::new();
    let input = harness.write_input("in.wav", &harmonic_tone(150.0, FS, 0.5, 6000.0), 1, FS);
    let config = harness.write_config(
        "run.json",
        &serde_json::json!({
            "filters": {
                "lowpass": { "type": "lowpass", "cutoff_hz": 500.0, "transition_hz": 200.0 }
            },
            "parallel": true
        }),
    );
    let out_dir = harness.out_dir("out");

    let output = harness.process_with(
        &input,
        &out_dir,
        Some(&config),
        ConfigOverrides::default(),
        Pipelines::FILTER_ONLY,
    );
    assert!(output.success, "{:?}", output.errors);

    let taps: Vec<(String, Option<usize>)> = output
        .outputs
        .iter()
        .map(|o| (o.action.clone(), o.taps))
        .collect();
    assert_eq!(
        taps,
        vec![
            ("lowpass".to_string(), Some(249)),
            ("highpass".to_string(), Some(497)),
            ("bandpass".to_string(), Some(497)),
        ]
    );
}

#[test]
fn test_band_type_in_wrong_slot_is_rejected() {
    let harness = TestHarness::new();
    let input = harness.write_input("in.wav", &sines(&[(100.0, 8000.0)], FS, 0.5), 1, FS);
    let config = harness.write_config(
        "swapped.json",
        &serde_json::json!({
            "filters": {
                "lowpass": { "type": "highpass", "cutoff_hz": 500.0, "transition_hz": 100.0 }
            }
        }),
    );
    let out_dir = harness.out_dir("out");

    let output = harness.process_with(
        &input,
        &out_dir,
        Some(&config),
        ConfigOverrides::default(),
        Pipelines::FILTER_ONLY,
    );
    assert!(!output.success);
    let errors: Vec<(&str, Option<&str>)> = output
        .errors
        .iter()
        .map(|e| (e.code.as_str(), e.path.as_deref()))
        .collect();
    assert_eq!(errors, vec![("C006", Some("filters.lowpass.type"))]);
    assert!(output.outputs.is_empty());
    assert!(!out_dir.join("lowpass.wav").exists());
}

#[test]
fn test_cutoff_above_input_nyquist_writes_nothing() {
    let harness = TestHarness::new();
    let input = harness.write_input("in.wav", &harmonic_tone(150.0, 8000, 0.5, 6000.0), 1, 8000);
    let out_dir = harness.out_dir("out");

    let mut config = RunConfig::default();
    config.filters.bandpass = BandParams::Bandpass {
        low_hz: 500.0,
        high_hz: 5000.0,
        transition_hz: 100.0,
    };

    let output = harness.process(&input, &out_dir, &config, Pipelines::ALL);
    assert!(!output.success);
    assert_eq!(output.errors[0].code, "C004");
    assert_eq!(
        output.errors[0].path.as_deref(),
        Some("filters.bandpass.high_hz")
    );
    for action in &ACTIONS {
        assert!(!action.output_path(&out_dir).exists(), "{}", action.name);
    }
}

#[test]
fn test_empty_input_fails_without_outputs() {
    let harness = TestHarness::new();
    let input = harness.write_input("empty.wav", &[], 1, FS);
    let out_dir = harness.out_dir("out");

    let output = harness.process(&input, &out_dir, &RunConfig::default(), Pipelines::ALL);
    assert!(!output.success);
    assert!(output.outputs.is_empty());
    assert!(output.errors.iter().all(|e| e.code == "DSP_003"));
}
