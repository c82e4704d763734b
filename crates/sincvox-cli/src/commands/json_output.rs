//! JSON output types for machine-readable CLI output.
//!
//! These types back the `--json` flag on the processing commands and
//! `design`. Every failure carries a stable code: `CLI_XXX` for errors raised
//! by the command-line layer, `C0XX` for configuration validation, and
//! `DSP_XXX` passed through from the DSP backend.

use serde::{Deserialize, Serialize};
use sincvox_dsp::vocoder::F0Summary;
use sincvox_spec::{BackendError, ValidationError, ValidationWarning};

/// Error codes for CLI operations.
///
/// These codes are stable and can be used for programmatic error handling.
pub mod error_codes {
    /// Input file could not be read
    pub const FILE_READ: &str = "CLI_001";
    /// Configuration file could not be loaded or parsed
    pub const CONFIG_LOAD: &str = "CLI_002";
    /// Output directory could not be created
    pub const OUTPUT_DIR: &str = "CLI_003";
    /// Invalid combination of command-line arguments
    pub const INVALID_ARGUMENTS: &str = "CLI_004";
    /// JSON serialization error
    pub const JSON_SERIALIZE: &str = "CLI_005";
    /// Output left by an earlier run could not be removed
    pub const STALE_OUTPUT: &str = "CLI_006";
}

/// A structured error in JSON output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonError {
    /// Stable error code (e.g., "CLI_001", "C004", "DSP_001")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Configuration path or action the error belongs to (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// File path (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl JsonError {
    /// Creates a new error with code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            path: None,
            file: None,
        }
    }

    /// Wraps a backend error, keeping its stable code.
    pub fn from_backend<E: BackendError>(err: &E) -> Self {
        Self::new(err.code(), err.message())
    }

    /// Converts a configuration validation error.
    pub fn from_validation(err: &ValidationError) -> Self {
        Self {
            code: err.code.code().to_string(),
            message: err.message.clone(),
            path: err.path.clone(),
            file: None,
        }
    }

    /// Sets the path for this error.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Sets the file path for this error.
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }
}

/// A structured warning in JSON output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonWarning {
    /// Stable warning code (e.g., "W001")
    pub code: String,
    /// Human-readable warning message
    pub message: String,
    /// Configuration path the warning belongs to (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl JsonWarning {
    /// Converts a configuration validation warning.
    pub fn from_validation(warning: &ValidationWarning) -> Self {
        Self {
            code: warning.code.code().to_string(),
            message: warning.message.clone(),
            path: warning.path.clone(),
        }
    }
}

/// Decoded input file details.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InputInfo {
    /// Path as given on the command line
    pub path: String,
    /// BLAKE3 hash of the file bytes
    pub hash: String,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Channel count
    pub channels: u16,
    /// Samples per channel
    pub frames: usize,
}

/// One written output file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutputRecord {
    /// Action name (lowpass, highpass, bandpass, voice)
    pub action: String,
    /// Path of the written WAV file
    pub path: String,
    /// Kernel length for filter outputs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taps: Option<usize>,
    /// Samples per channel
    pub frames: usize,
    /// Channel count
    pub channels: u16,
    /// BLAKE3 hash of the 16-bit PCM payload
    pub pcm_hash: String,
}

/// Voicing statistics of an F0 track.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct F0Stats {
    /// Total frames
    pub frames: usize,
    /// Voiced frames
    pub voiced: usize,
    /// Lowest voiced F0 in Hz
    pub min_hz: f64,
    /// Highest voiced F0 in Hz
    pub max_hz: f64,
    /// Mean voiced F0 in Hz
    pub mean_hz: f64,
}

impl From<F0Summary> for F0Stats {
    fn from(summary: F0Summary) -> Self {
        Self {
            frames: summary.frames,
            voiced: summary.voiced,
            min_hz: summary.min_hz,
            max_hz: summary.max_hz,
            mean_hz: summary.mean_hz,
        }
    }
}

/// Voice transform details.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VoiceReport {
    /// F0 estimation mode
    pub analysis_mode: String,
    /// Applied pitch factor
    pub pitch_factor: f64,
    /// F0 track as analyzed
    pub original_f0: F0Stats,
    /// F0 track handed to the synthesizer
    pub modified_f0: F0Stats,
}

/// JSON output for the processing commands (default, `filter`, `voice`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProcessOutput {
    /// Whether every requested output was written
    pub success: bool,
    /// Errors encountered, one per failed stage or branch
    pub errors: Vec<JsonError>,
    /// Configuration warnings
    pub warnings: Vec<JsonWarning>,
    /// Decoded input (absent when the input could not be read)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<InputInfo>,
    /// Files written
    pub outputs: Vec<OutputRecord>,
    /// Voice transform details (when the voice pipeline succeeded)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice: Option<VoiceReport>,
}

impl ProcessOutput {
    /// Creates an empty, successful output.
    pub fn new() -> Self {
        Self {
            success: true,
            errors: Vec::new(),
            warnings: Vec::new(),
            input: None,
            outputs: Vec::new(),
            voice: None,
        }
    }

    /// Creates a failed output with the given errors.
    pub fn failure(errors: Vec<JsonError>) -> Self {
        Self {
            success: false,
            errors,
            ..Self::new()
        }
    }

    /// Records an error and marks the run as failed.
    pub fn push_error(&mut self, error: JsonError) {
        self.errors.push(error);
        self.success = false;
    }
}

impl Default for ProcessOutput {
    fn default() -> Self {
        Self::new()
    }
}

/// Kernel details for the `design` command.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DesignResult {
    /// Response type
    pub kind: String,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Transition bandwidth in Hz
    pub transition_hz: f64,
    /// Number of taps
    pub taps: usize,
    /// Index of the center tap
    pub center_index: usize,
    /// Value of the center tap
    pub center_tap: f64,
    /// Sum of the coefficients
    pub dc_gain: f64,
    /// All coefficients, index 0 first
    pub coefficients: Vec<f64>,
}

/// JSON output for the `design` command.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DesignOutput {
    /// Whether the kernel was designed
    pub success: bool,
    /// Errors encountered
    pub errors: Vec<JsonError>,
    /// Kernel details (on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<DesignResult>,
}

impl DesignOutput {
    /// Creates a successful design output.
    pub fn success(result: DesignResult) -> Self {
        Self {
            success: true,
            errors: Vec::new(),
            result: Some(result),
        }
    }

    /// Creates a failed design output.
    pub fn failure(errors: Vec<JsonError>) -> Self {
        Self {
            success: false,
            errors,
            result: None,
        }
    }
}
