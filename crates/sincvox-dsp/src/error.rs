//! Error types for the DSP backend.

use sincvox_spec::BackendError;
use thiserror::Error;

/// Result type for DSP operations.
pub type DspResult<T> = Result<T, DspError>;

/// Error raised by an analysis or synthesis capability.
///
/// The pipeline never inspects or retries these; they are carried to the
/// caller verbatim inside [`DspError::Capability`].
#[derive(Debug, Error)]
pub enum CapabilityError {
    /// Analysis of the input signal failed.
    #[error("analysis failed: {0}")]
    Analysis(String),

    /// Resynthesis from features failed.
    #[error("synthesis failed: {0}")]
    Synthesis(String),

    /// Features were not frame-aligned or had inconsistent dimensions.
    #[error("malformed vocoder features: {0}")]
    MalformedFeatures(String),
}

/// Errors that can occur during filtering or voice transformation.
#[derive(Debug, Error)]
pub enum DspError {
    /// Filter parameters outside the designable range.
    #[error("invalid filter spec: {message}")]
    InvalidFilterSpec {
        /// Error message.
        message: String,
    },

    /// Invalid parameter value.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: String,
        /// Error message.
        message: String,
    },

    /// A zero-length signal was passed where samples are required.
    #[error("empty input signal")]
    EmptyInput,

    /// Failure surfaced by an analysis/synthesis capability.
    #[error(transparent)]
    Capability(#[from] CapabilityError),

    /// WAV container decoding/encoding error.
    #[error("WAV error: {message}")]
    Wav {
        /// Error message.
        message: String,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DspError {
    /// Creates an invalid filter spec error.
    pub fn invalid_filter(message: impl Into<String>) -> Self {
        Self::InvalidFilterSpec {
            message: message.into(),
        }
    }

    /// Creates an invalid parameter error.
    pub fn invalid_param(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Creates a WAV container error.
    pub fn wav(message: impl Into<String>) -> Self {
        Self::Wav {
            message: message.into(),
        }
    }
}

impl From<hound::Error> for DspError {
    fn from(err: hound::Error) -> Self {
        match err {
            hound::Error::IoError(e) => DspError::Io(e),
            other => DspError::wav(other.to_string()),
        }
    }
}

impl BackendError for DspError {
    fn code(&self) -> &'static str {
        match self {
            DspError::InvalidFilterSpec { .. } => "DSP_001",
            DspError::InvalidParameter { .. } => "DSP_002",
            DspError::EmptyInput => "DSP_003",
            DspError::Capability(_) => "DSP_004",
            DspError::Wav { .. } => "DSP_005",
            DspError::Io(_) => "DSP_006",
        }
    }

    fn category(&self) -> &'static str {
        "dsp"
    }
}
