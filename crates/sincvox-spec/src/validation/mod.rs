//! Run configuration validation logic.
//!
//! [`validate_run_config`] checks everything that can be checked without
//! knowing the input signal. [`validate_for_sample_rate`] adds the checks
//! that depend on the Nyquist frequency of a decoded signal.

pub mod common;


use crate::config::RunConfig;
use crate::error::{ErrorCode, ValidationError, ValidationResult, ValidationWarning, WarningCode};
use crate::filter::BandParams;
use crate::voice::{NormalizationStrategy, VoiceParams};

pub use common::{
    validate_finite, validate_open_interval, validate_positive, CommonValidationError,
};

/// Tap-count heuristic of the windowed-sinc designer (taps ≈ 3.1 / Δf).
const TAP_FACTOR: f64 = 3.1;

/// Kernels longer than this trigger a performance warning.
const LONG_KERNEL_WARNING_TAPS: f64 = 16_384.0;

/// Pitch factors outside `[1/4, 4]` trigger a warning.
const EXTREME_PITCH_FACTOR: f64 = 4.0;

/// Validates a run configuration without reference to any signal.
///
/// # Arguments
/// * `config` - The configuration to validate
///
/// # Returns
/// A [`ValidationResult`] holding every error and warning found.
pub fn validate_run_config(config: &RunConfig) -> ValidationResult {
    let mut result = ValidationResult::success();

    for (key, params) in config.filters.branches() {
        let base = format!("filters.{}", key);
        if params.kind_name() != key {
            result.add_error(ValidationError::with_path(
                ErrorCode::BandTypeMismatch,
                format!(
                    "{} slot expects a {} filter, got {}",
                    key,
                    key,
                    params.kind_name()
                ),
                format!("{}.type", base),
            ));
        }
        validate_band(&mut result, params, &base);
    }

    validate_voice(&mut result, &config.voice);

    result
}

/// Validates a run configuration against a concrete sample rate.
///
/// Includes every check of [`validate_run_config`], plus Nyquist bounds on
/// all cutoffs and the F0 ceiling, and a warning for very long kernels.
pub fn validate_for_sample_rate(config: &RunConfig, sample_rate: u32) -> ValidationResult {
    let mut result = validate_run_config(config);

    if sample_rate == 0 {
        result.add_error(ValidationError::new(
            ErrorCode::InvalidSampleRate,
            "sample rate must be positive",
        ));
        return result;
    }

    let nyquist = sample_rate as f64 / 2.0;

    for (key, params) in config.filters.branches() {
        let base = format!("filters.{}", key);
        let frequencies: Vec<(&str, f64)> = match *params {
            BandParams::Lowpass { cutoff_hz, transition_hz }
            | BandParams::Highpass { cutoff_hz, transition_hz } => {
                vec![("cutoff_hz", cutoff_hz), ("transition_hz", transition_hz)]
            }
            BandParams::Bandpass {
                low_hz,
                high_hz,
                transition_hz,
            } => vec![
                ("low_hz", low_hz),
                ("high_hz", high_hz),
                ("transition_hz", transition_hz),
            ],
        };

        for (field, value) in frequencies {
            if value.is_finite() && value >= nyquist {
                result.add_error(ValidationError::with_path(
                    ErrorCode::AboveNyquist,
                    format!(
                        "{} of {} Hz is not below Nyquist ({} Hz)",
                        field, value, nyquist
                    ),
                    format!("{}.{}", base, field),
                ));
            }
        }

        let transition = params.transition_hz();
        if transition.is_finite() && transition > 0.0 {
            let taps = TAP_FACTOR * sample_rate as f64 / transition;
            if taps > LONG_KERNEL_WARNING_TAPS {
                result.add_warning(ValidationWarning::with_path(
                    WarningCode::LongKernel,
                    format!(
                        "transition bandwidth of {} Hz needs about {} taps",
                        transition,
                        taps.round()
                    ),
                    format!("{}.transition_hz", base),
                ));
            }
        }
    }

    // Non-positive ceilings were already reported by validate_voice.
    let ceil = config.voice.f0_ceil_hz;
    if ceil.is_finite() && ceil > 0.0 {
        if let Err(e) = validate_open_interval("f0_ceil_hz", ceil, nyquist) {
            result.add_error(ValidationError::with_path(
                ErrorCode::InvalidF0Range,
                format!("{} (Nyquist)", e.message),
                "voice.f0_ceil_hz",
            ));
        }
    }

    result
}

fn validate_band(result: &mut ValidationResult, params: &BandParams, base: &str) {
    match *params {
        BandParams::Lowpass { cutoff_hz, .. } | BandParams::Highpass { cutoff_hz, .. } => {
            check_positive(
                result,
                ErrorCode::InvalidCutoff,
                "cutoff_hz",
                cutoff_hz,
                base,
            );
        }
        BandParams::Bandpass { low_hz, high_hz, .. } => {
            let low_ok = check_positive(result, ErrorCode::InvalidCutoff, "low_hz", low_hz, base);
            let high_ok =
                check_positive(result, ErrorCode::InvalidCutoff, "high_hz", high_hz, base);
            if low_ok && high_ok && low_hz >= high_hz {
                result.add_error(ValidationError::with_path(
                    ErrorCode::UnorderedBandpassCutoffs,
                    format!(
                        "low_hz ({}) must be below high_hz ({})",
                        low_hz, high_hz
                    ),
                    base.to_string(),
                ));
            }
        }
    }

    check_positive(
        result,
        ErrorCode::InvalidTransitionBandwidth,
        "transition_hz",
        params.transition_hz(),
        base,
    );
}

fn validate_voice(result: &mut ValidationResult, voice: &VoiceParams) {
    if check_positive(
        result,
        ErrorCode::InvalidPitchFactor,
        "pitch_factor",
        voice.pitch_factor,
        "voice",
    ) && !(1.0 / EXTREME_PITCH_FACTOR..=EXTREME_PITCH_FACTOR).contains(&voice.pitch_factor)
    {
        result.add_warning(ValidationWarning::with_path(
            WarningCode::ExtremePitchFactor,
            format!(
                "pitch factor {} is far outside the usual range",
                voice.pitch_factor
            ),
            "voice.pitch_factor",
        ));
    }

    if let NormalizationStrategy::FixedScale { divisor } = voice.normalization {
        check_positive(
            result,
            ErrorCode::InvalidDivisor,
            "divisor",
            divisor,
            "voice.normalization",
        );
    }

    if let Err(e) = validate_finite("output_gain", voice.output_gain) {
        result.add_error(ValidationError::with_path(
            ErrorCode::InvalidOutputGain,
            e.message,
            "voice.output_gain",
        ));
    }

    check_positive(
        result,
        ErrorCode::InvalidFramePeriod,
        "frame_period_ms",
        voice.frame_period_ms,
        "voice",
    );

    let floor_ok = check_positive(
        result,
        ErrorCode::InvalidF0Range,
        "f0_floor_hz",
        voice.f0_floor_hz,
        "voice",
    );
    let ceil_ok = check_positive(
        result,
        ErrorCode::InvalidF0Range,
        "f0_ceil_hz",
        voice.f0_ceil_hz,
        "voice",
    );
    if floor_ok && ceil_ok && voice.f0_floor_hz >= voice.f0_ceil_hz {
        result.add_error(ValidationError::with_path(
            ErrorCode::InvalidF0Range,
            format!(
                "f0_floor_hz ({}) must be below f0_ceil_hz ({})",
                voice.f0_floor_hz, voice.f0_ceil_hz
            ),
            "voice",
        ));
    }
}

/// Records an error when `value` is not positive; returns whether it passed.
fn check_positive(
    result: &mut ValidationResult,
    code: ErrorCode,
    field: &str,
    value: f64,
    base: &str,
) -> bool {
    match validate_positive(field, value) {
        Ok(()) => true,
        Err(e) => {
            result.add_error(ValidationError::with_path(
                code,
                e.message,
                format!("{}.{}", base, field),
            ));
            false
        }
    }
}
