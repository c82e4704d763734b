//! SincVox Parameter and Configuration Library
//!
//! This crate provides the serializable parameter types shared by the SincVox
//! DSP backend and command-line tool, plus validation and stable error codes.
//!
//! # Overview
//!
//! A processing run is described by a single immutable [`RunConfig`]:
//!
//! - **Filters**: cutoff and transition bandwidth for the lowpass, highpass,
//!   and bandpass branches ([`ThreeBandParams`])
//! - **Voice**: pitch factor, normalization strategy, and analysis framing
//!   ([`VoiceParams`])
//! - **Run options**: analysis mode, interactive mode, parallel filtering
//!
//! # Example
//!
//! ```
//! use sincvox_spec::{RunConfig, validate_run_config};
//!
//! let config = RunConfig::from_json_str(r#"{ "voice": { "pitch_factor": 1.5 } }"#).unwrap();
//! assert_eq!(config.voice.pitch_factor, 1.5);
//!
//! let result = validate_run_config(&config);
//! assert!(result.is_ok());
//! ```
//!
//! # Modules
//!
//! - [`error`]: Error codes, validation errors and warnings, backend error trait
//! - [`filter`]: Filter band parameter types
//! - [`voice`]: Voice transform parameter types
//! - [`config`]: Run configuration loading
//! - [`validation`]: Configuration validation

pub mod config;
pub mod error;
pub mod filter;
pub mod validation;
pub mod voice;

// Re-export commonly used types at the crate root
pub use config::RunConfig;
pub use error::{
    BackendError, ConfigError, ErrorCode, ValidationError, ValidationResult, ValidationWarning,
    WarningCode,
};
pub use filter::{BandParams, ThreeBandParams};
pub use validation::{validate_for_sample_rate, validate_run_config};
pub use voice::{AnalysisMode, NormalizationStrategy, VoiceParams};
