//! Test harness utilities for running processing commands and reading back
//! their outputs.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use sincvox_cli::commands::json_output::ProcessOutput;
use sincvox_cli::commands::process::{execute, Pipelines, ProcessRequest};
use sincvox_cli::settings::{resolve_run_config, ConfigOverrides};
use sincvox_spec::RunConfig;

/// A decoded 16-bit WAV file.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedWav {
    /// Header fields.
    pub spec: hound::WavSpec,
    /// Interleaved samples.
    pub samples: Vec<i16>,
}

impl DecodedWav {
    /// Samples per channel.
    pub fn frames(&self) -> usize {
        self.samples.len() / self.spec.channels as usize
    }

    /// One channel as `f64`.
    pub fn channel(&self, index: usize) -> Vec<f64> {
        self.samples
            .iter()
            .skip(index)
            .step_by(self.spec.channels as usize)
            .map(|&s| f64::from(s))
            .collect()
    }
}

/// A test harness for running sincvox commands in a scratch directory.
pub struct TestHarness {
    /// Working directory for test inputs and outputs.
    pub work_dir: TempDir,
}

impl TestHarness {
    /// Create a new test harness.
    pub fn new() -> Self {
        Self {
            work_dir: TempDir::new().expect("Failed to create work dir"),
        }
    }

    /// Get the working directory path.
    pub fn path(&self) -> &Path {
        self.work_dir.path()
    }

    /// Writes a 16-bit PCM input file with `hound`.
    pub fn write_input(
        &self,
        name: &str,
        samples: &[i16],
        channels: u16,
        sample_rate: u32,
    ) -> PathBuf {
        let path = self.path().join(name);
        let spec = hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).expect("Failed to create WAV");
        for &sample in samples {
            writer.write_sample(sample).expect("Failed to write sample");
        }
        writer.finalize().expect("Failed to finalize WAV");
        path
    }

    /// Writes a 32-bit float input file with `hound`.
    pub fn write_float_input(
        &self,
        name: &str,
        samples: &[f32],
        channels: u16,
        sample_rate: u32,
    ) -> PathBuf {
        let path = self.path().join(name);
        let spec = hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };
        let mut writer = hound::WavWriter::create(&path, spec).expect("Failed to create WAV");
        for &sample in samples {
            writer.write_sample(sample).expect("Failed to write sample");
        }
        writer.finalize().expect("Failed to finalize WAV");
        path
    }

    /// Writes a JSON run configuration file.
    pub fn write_config(&self, name: &str, json: &serde_json::Value) -> PathBuf {
        let path = self.path().join(name);
        std::fs::write(&path, json.to_string()).expect("Failed to write config");
        path
    }

    /// Output directory under the work dir.
    pub fn out_dir(&self, name: &str) -> PathBuf {
        self.path().join(name)
    }

    /// Runs the requested pipelines with an already-resolved configuration.
    pub fn process(
        &self,
        input: &Path,
        out_dir: &Path,
        config: &RunConfig,
        pipelines: Pipelines,
    ) -> ProcessOutput {
        let request = ProcessRequest {
            input,
            out_dir,
            config_path: None,
            overrides: ConfigOverrides::default(),
            pipelines,
        };
        execute(&request, config)
    }

    /// Resolves configuration the way the binary does, then runs.
    pub fn process_with(
        &self,
        input: &Path,
        out_dir: &Path,
        config_path: Option<&Path>,
        overrides: ConfigOverrides,
        pipelines: Pipelines,
    ) -> ProcessOutput {
        let config =
            resolve_run_config(config_path, &overrides).expect("Failed to resolve config");
        let request = ProcessRequest {
            input,
            out_dir,
            config_path,
            overrides,
            pipelines,
        };
        execute(&request, &config)
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Decodes a 16-bit PCM WAV file.
pub fn read_pcm16(path: &Path) -> DecodedWav {
    let mut reader = hound::WavReader::open(path)
        .unwrap_or_else(|e| panic!("Failed to open {}: {}", path.display(), e));
    let spec = reader.spec();
    assert_eq!(spec.bits_per_sample, 16, "{} is not 16-bit", path.display());
    assert_eq!(spec.sample_format, hound::SampleFormat::Int);
    let samples = reader
        .samples::<i16>()
        .collect::<Result<Vec<_>, _>>()
        .expect("Failed to decode samples");
    DecodedWav { spec, samples }
}
