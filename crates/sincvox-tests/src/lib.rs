//! SincVox End-to-End Test Infrastructure
//!
//! This crate drives the command implementations the `sincvox` binary uses
//! against WAV files written to a temporary directory:
//!
//! - Processing: input WAV -> lowpass/highpass/bandpass/voice files
//! - Validation: written files decode with the expected layout and content
//! - **Determinism**: identical inputs and seeds give identical PCM hashes
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p sincvox-tests
//! ```

pub mod fixtures;
pub mod harness;

pub use harness::{DecodedWav, TestHarness};
