//! Design command implementation
//!
//! Designs a single windowed-sinc kernel and prints its summary, or every
//! coefficient with `--json`.

use std::process::ExitCode;

use anyhow::Result;
use colored::Colorize;
use sincvox_dsp::{design, FilterKind, FilterSpec};

use super::json_output::{error_codes, DesignOutput, DesignResult, JsonError};
use super::reporting::{error_line, exit_code, print_json};

/// Arguments of the `design` command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DesignRequest<'a> {
    /// `lowpass`, `highpass` or `bandpass`.
    pub kind: &'a str,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Cutoff in Hz (the lower cutoff for bandpass).
    pub cutoff: f64,
    /// Upper cutoff in Hz, bandpass only.
    pub cutoff_high: Option<f64>,
    /// Transition bandwidth in Hz.
    pub transition: f64,
}

impl DesignRequest<'_> {
    /// Builds the filter spec, checking that the cutoffs fit the kind.
    pub fn filter_spec(&self) -> Result<FilterSpec, JsonError> {
        let spec = match (self.kind, self.cutoff_high) {
            ("lowpass", None) => FilterSpec::lowpass(self.cutoff, self.transition, self.sample_rate),
            ("highpass", None) => {
                FilterSpec::highpass(self.cutoff, self.transition, self.sample_rate)
            }
            ("bandpass", Some(high)) => {
                FilterSpec::bandpass(self.cutoff, high, self.transition, self.sample_rate)
            }
            ("bandpass", None) => {
                return Err(JsonError::new(
                    error_codes::INVALID_ARGUMENTS,
                    "--cutoff-high is required for a bandpass kernel",
                ))
            }
            ("lowpass" | "highpass", Some(_)) => {
                return Err(JsonError::new(
                    error_codes::INVALID_ARGUMENTS,
                    format!("--cutoff-high only applies to bandpass, not {}", self.kind),
                ))
            }
            (other, _) => {
                return Err(JsonError::new(
                    error_codes::INVALID_ARGUMENTS,
                    format!("unknown filter kind '{}'", other),
                ))
            }
        };
        Ok(spec)
    }
}

/// Designs the requested kernel.
pub fn execute(request: &DesignRequest<'_>) -> DesignOutput {
    let spec = match request.filter_spec() {
        Ok(spec) => spec,
        Err(error) => return DesignOutput::failure(vec![error]),
    };
    match design(&spec) {
        Ok(kernel) => DesignOutput::success(DesignResult {
            kind: spec.kind.name().to_string(),
            sample_rate: spec.sample_rate,
            transition_hz: spec.transition_bandwidth,
            taps: kernel.len(),
            center_index: kernel.center_index(),
            center_tap: kernel.center(),
            dc_gain: kernel.dc_gain(),
            coefficients: kernel.into_coefficients(),
        }),
        Err(e) => DesignOutput::failure(vec![JsonError::from_backend(&e)]),
    }
}

/// Run the design command
///
/// # Returns
/// Exit code: 0 on success, 1 when the kernel cannot be designed
pub fn run(request: &DesignRequest<'_>, json_output: bool) -> Result<ExitCode> {
    let output = execute(request);
    if json_output {
        print_json(&output)?;
        return Ok(exit_code(output.success));
    }

    match &output.result {
        Some(result) => {
            print_summary(request, result);
            Ok(ExitCode::SUCCESS)
        }
        None => {
            let message = output
                .errors
                .iter()
                .map(error_line)
                .collect::<Vec<_>>()
                .join("; ");
            anyhow::bail!("{}", message)
        }
    }
}

fn describe_band(request: &DesignRequest<'_>) -> String {
    match request.filter_spec().map(|spec| spec.kind) {
        Ok(FilterKind::Bandpass { low, high }) => format!("bandpass {}-{} Hz", low, high),
        Ok(kind) => format!("{} {} Hz", kind.name(), request.cutoff),
        Err(_) => request.kind.to_string(),
    }
}

fn print_summary(request: &DesignRequest<'_>, result: &DesignResult) {
    println!(
        "{} {} at {} Hz",
        "Designing:".cyan().bold(),
        describe_band(request),
        result.sample_rate
    );
    println!(
        "{} {} Hz",
        "Transition:".dimmed(),
        result.transition_hz
    );
    println!("{} {}", "Taps:".dimmed(), result.taps);
    println!(
        "{} {:.6} (index {})",
        "Center tap:".dimmed(),
        result.center_tap,
        result.center_index
    );
    println!("{} {:.6}", "DC gain:".dimmed(), result.dc_gain);
}
