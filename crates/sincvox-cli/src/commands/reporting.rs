use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::process::ExitCode;

use super::json_output::{F0Stats, JsonError, ProcessOutput};

/// Maps an overall outcome to the process exit code.
pub(crate) fn exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}

/// Prints a value as pretty JSON on stdout.
pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize JSON output")?;
    println!("{}", json);
    Ok(())
}

/// One-line description of an F0 track.
pub(crate) fn f0_line(stats: &F0Stats) -> String {
    if stats.voiced == 0 {
        return format!("0/{} frames voiced", stats.frames);
    }
    format!(
        "{}/{} frames voiced, {:.1}-{:.1} Hz (mean {:.1} Hz)",
        stats.voiced, stats.frames, stats.min_hz, stats.max_hz, stats.mean_hz
    )
}

/// Formats an error as `[CODE] path: message`.
pub(crate) fn error_line(error: &JsonError) -> String {
    match &error.path {
        Some(path) => format!("[{}] {}: {}", error.code, path, error.message),
        None => format!("[{}] {}", error.code, error.message),
    }
}

/// Prints a processing report: input details, written files, voice
/// statistics, then warnings and errors.
pub(crate) fn print_process_output(output: &ProcessOutput) {
    if let Some(input) = &output.input {
        println!("{} {}", "Hash:".dimmed(), &input.hash[..16]);
        println!(
            "{} {} Hz, {} channel(s), {} frames",
            "Format:".dimmed(),
            input.sample_rate,
            input.channels,
            input.frames
        );
    }

    for warning in &output.warnings {
        let location = warning
            .path
            .as_deref()
            .map(|p| format!(" {}:", p))
            .unwrap_or_default();
        println!(
            "  {} [{}]{} {}",
            "!".yellow(),
            warning.code,
            location,
            warning.message
        );
    }

    if !output.outputs.is_empty() {
        println!();
    }
    for record in &output.outputs {
        let taps = record
            .taps
            .map(|t| format!(" ({} taps)", t))
            .unwrap_or_default();
        println!(
            "  {} {:<9} {}{} {}",
            "+".green(),
            record.action,
            record.path,
            taps.dimmed(),
            record.pcm_hash[..16].dimmed()
        );
    }

    if let Some(voice) = &output.voice {
        println!(
            "\n{} {} x{}",
            "Voice:".cyan().bold(),
            voice.analysis_mode,
            voice.pitch_factor
        );
        println!("  {} {}", "original F0:".dimmed(), f0_line(&voice.original_f0));
        println!("  {} {}", "modified F0:".dimmed(), f0_line(&voice.modified_f0));
    }

    for error in &output.errors {
        eprintln!("  {} {}", "x".red(), error_line(error));
    }

    let summary = format!(
        "{} written, {} error(s)",
        output.outputs.len(),
        output.errors.len()
    );
    if output.success {
        println!("\n{} {}", "Done".green().bold(), summary.dimmed());
    } else {
        println!("\n{} {}", "FAILED".red().bold(), summary.dimmed());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_f0_line_unvoiced() {
        let stats = F0Stats {
            frames: 12,
            voiced: 0,
            min_hz: 0.0,
            max_hz: 0.0,
            mean_hz: 0.0,
        };
        assert_eq!(f0_line(&stats), "0/12 frames voiced");
    }

    #[test]
    fn test_f0_line_voiced() {
        let stats = F0Stats {
            frames: 101,
            voiced: 80,
            min_hz: 148.3,
            max_hz: 151.0,
            mean_hz: 150.04,
        };
        assert_eq!(
            f0_line(&stats),
            "80/101 frames voiced, 148.3-151.0 Hz (mean 150.0 Hz)"
        );
    }

    #[test]
    fn test_error_line() {
        let error = JsonError::new("DSP_001", "bad cutoff").with_path("lowpass");
        assert_eq!(error_line(&error), "[DSP_001] lowpass: bad cutoff");
        let error = JsonError::new("CLI_001", "missing");
        assert_eq!(error_line(&error), "[CLI_001] missing");
    }

    #[test]
    fn test_print_process_output_does_not_panic() {
        let mut output = ProcessOutput::new();
        output.push_error(JsonError::new("DSP_003", "empty input signal"));
        print_process_output(&output);
    }
}
