//! Processing command implementation
//!
//! Reads one WAV file, runs the three-band filter and/or the voice transform
//! over it, and writes one file per action. A failed branch is reported and
//! skipped; the remaining branches still run.

use std::fs;
use std::io::{self, Cursor};
use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;
use colored::Colorize;
use sincvox_dsp::wav::{read_wav_from, write_signal, WrittenWav};
use sincvox_dsp::{
    apply_three_band_with, transform, ConvolutionMethod, DspResult, FilterOptions, Signal,
    SpectralVocoder, VoiceTransformConfig,
};
use sincvox_spec::{validate_for_sample_rate, validate_run_config, RunConfig};

use super::actions::{self, Action};
use super::interactive;
use super::json_output::{
    error_codes, InputInfo, JsonError, JsonWarning, OutputRecord, ProcessOutput, VoiceReport,
};
use super::reporting::{exit_code, print_json, print_process_output};
use crate::settings::{resolve_run_config, ConfigOverrides};

/// Which pipelines a run executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pipelines {
    /// Three-band filtering.
    pub filter: bool,
    /// Voice transform.
    pub voice: bool,
}

impl Pipelines {
    /// Both pipelines (the default invocation).
    pub const ALL: Self = Self {
        filter: true,
        voice: true,
    };
    /// Three-band filtering only.
    pub const FILTER_ONLY: Self = Self {
        filter: true,
        voice: false,
    };
    /// Voice transform only.
    pub const VOICE_ONLY: Self = Self {
        filter: false,
        voice: true,
    };
}

/// Inputs of one processing run.
#[derive(Debug, Clone)]
pub struct ProcessRequest<'a> {
    /// WAV file to process.
    pub input: &'a Path,
    /// Directory receiving the action outputs.
    pub out_dir: &'a Path,
    /// Optional JSON configuration file.
    pub config_path: Option<&'a Path>,
    /// Command-line overrides applied on top of the configuration.
    pub overrides: ConfigOverrides,
    /// Pipelines to run.
    pub pipelines: Pipelines,
}

/// Run a processing command
///
/// # Arguments
/// * `request` - Input, output directory, configuration source and pipelines
/// * `json_output` - Whether to output machine-readable JSON
///
/// # Returns
/// Exit code: 0 when every requested output was written, 1 otherwise
pub fn run(request: &ProcessRequest<'_>, json_output: bool) -> Result<ExitCode> {
    let config = match resolve_run_config(request.config_path, &request.overrides) {
        Ok(config) => config,
        Err(e) if json_output => {
            let mut error = JsonError::new(error_codes::CONFIG_LOAD, format!("{:#}", e));
            if let Some(path) = request.config_path {
                error = error.with_file(path.display().to_string());
            }
            print_json(&ProcessOutput::failure(vec![error]))?;
            return Ok(ExitCode::from(1));
        }
        Err(e) => return Err(e),
    };

    if json_output {
        run_json(request, &config)
    } else {
        run_human(request, &config)
    }
}

/// Run with human-readable (colored) output
fn run_human(request: &ProcessRequest<'_>, config: &RunConfig) -> Result<ExitCode> {
    println!("{} {}", "Processing:".cyan().bold(), request.input.display());

    let output = execute(request, config);
    print_process_output(&output);

    if config.interactive && output.input.is_some() {
        let stdin = io::stdin();
        let stdout = io::stdout();
        interactive::run_session(stdin.lock(), &mut stdout.lock(), request.out_dir, config)?;
    }

    Ok(exit_code(output.success))
}

/// Run with machine-readable JSON output
///
/// The interactive prompt is never offered in JSON mode.
fn run_json(request: &ProcessRequest<'_>, config: &RunConfig) -> Result<ExitCode> {
    let output = execute(request, config);
    print_json(&output)?;
    Ok(exit_code(output.success))
}

/// Runs the requested pipelines and collects everything into a report.
///
/// Configuration errors stop the run before the input is read; sample-rate
/// dependent errors stop it before any output is written. After that, each
/// branch succeeds or fails on its own.
pub fn execute(request: &ProcessRequest<'_>, config: &RunConfig) -> ProcessOutput {
    let validation = validate_run_config(config);
    if !validation.is_ok() {
        return ProcessOutput::failure(
            validation
                .errors
                .iter()
                .map(JsonError::from_validation)
                .collect(),
        );
    }

    let input_display = request.input.display().to_string();
    let bytes = match fs::read(request.input) {
        Ok(bytes) => bytes,
        Err(e) => {
            return ProcessOutput::failure(vec![JsonError::new(
                error_codes::FILE_READ,
                format!("Failed to read input: {}", e),
            )
            .with_file(input_display)]);
        }
    };
    let signal = match read_wav_from(Cursor::new(&bytes)) {
        Ok(signal) => signal,
        Err(e) => {
            return ProcessOutput::failure(vec![
                JsonError::from_backend(&e).with_file(input_display)
            ]);
        }
    };

    let mut output = ProcessOutput::new();
    output.input = Some(InputInfo {
        path: input_display,
        hash: blake3::hash(&bytes).to_hex().to_string(),
        sample_rate: signal.sample_rate(),
        channels: signal.channels(),
        frames: signal.frames(),
    });

    let validation = validate_for_sample_rate(config, signal.sample_rate());
    output.warnings = validation
        .warnings
        .iter()
        .map(JsonWarning::from_validation)
        .collect();
    if !validation.is_ok() {
        for err in &validation.errors {
            output.push_error(JsonError::from_validation(err));
        }
        return output;
    }

    if let Err(e) = fs::create_dir_all(request.out_dir) {
        output.push_error(
            JsonError::new(
                error_codes::OUTPUT_DIR,
                format!("Failed to create output directory: {}", e),
            )
            .with_file(request.out_dir.display().to_string()),
        );
        return output;
    }

    if request.pipelines.filter {
        run_filters(&signal, config, request.out_dir, &mut output);
    }
    if request.pipelines.voice {
        run_voice(&signal, config, request.out_dir, &mut output);
    }

    output
}

fn run_filters(signal: &Signal, config: &RunConfig, out_dir: &Path, output: &mut ProcessOutput) {
    let options = FilterOptions {
        parallel: config.parallel,
        method: ConvolutionMethod::Auto,
    };
    let bands = match apply_three_band_with(signal, &config.filters, options) {
        Ok(bands) => bands,
        Err(e) => {
            output.push_error(JsonError::from_backend(&e).with_path("filters"));
            for action in &actions::ACTIONS {
                if action.pipeline.branch_key().is_some() {
                    remove_stale(output, action, out_dir);
                }
            }
            return;
        }
    };

    for (key, result) in bands.into_branches() {
        let Some(action) = actions::for_branch(key) else {
            continue;
        };
        match result {
            Ok(band) => {
                let written = write_signal(&action.output_path(out_dir), &band.signal);
                record_write(output, action, out_dir, Some(band.taps), written);
            }
            Err(e) => {
                output.push_error(JsonError::from_backend(&e).with_path(action.name));
                remove_stale(output, action, out_dir);
            }
        }
    }
}

fn run_voice(signal: &Signal, config: &RunConfig, out_dir: &Path, output: &mut ProcessOutput) {
    let action = actions::voice();
    let vocoder = SpectralVocoder::from_voice_params(&config.voice, config.analysis_mode);
    let transform_config = VoiceTransformConfig::from(&config.voice);

    match transform(signal, &transform_config, &vocoder, &vocoder) {
        Ok(result) => {
            output.voice = Some(VoiceReport {
                analysis_mode: config.analysis_mode.to_string(),
                pitch_factor: config.voice.pitch_factor,
                original_f0: result.original_summary().into(),
                modified_f0: result.modified_summary().into(),
            });
            let written = write_signal(&action.output_path(out_dir), &result.signal);
            record_write(output, action, out_dir, None, written);
        }
        Err(e) => {
            output.push_error(JsonError::from_backend(&e).with_path(action.name));
            remove_stale(output, action, out_dir);
        }
    }
}

fn record_write(
    output: &mut ProcessOutput,
    action: &Action,
    out_dir: &Path,
    taps: Option<usize>,
    written: DspResult<WrittenWav>,
) {
    match written {
        Ok(written) => output.outputs.push(OutputRecord {
            action: action.name.to_string(),
            path: written.path.display().to_string(),
            taps,
            frames: written.frames,
            channels: written.channels,
            pcm_hash: written.pcm_hash,
        }),
        Err(e) => {
            output.push_error(
                JsonError::from_backend(&e)
                    .with_path(action.name)
                    .with_file(action.file_name),
            );
            remove_stale(output, action, out_dir);
        }
    }
}

/// Deletes a file an earlier run left for `action`, so a failed branch ends
/// up with no output at all.
fn remove_stale(output: &mut ProcessOutput, action: &Action, out_dir: &Path) {
    let path = action.output_path(out_dir);
    match fs::remove_file(&path) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => output.push_error(
            JsonError::new(
                error_codes::STALE_OUTPUT,
                format!("Failed to remove stale output: {}", e),
            )
            .with_path(action.name)
            .with_file(path.display().to_string()),
        ),
    }
}
