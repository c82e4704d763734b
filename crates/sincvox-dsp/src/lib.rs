//! SincVox DSP Backend
//!
//! This crate implements the signal processing behind `sincvox`:
//! - windowed-sinc FIR design and same-length convolution
//! - the three-band filter pipeline (lowpass, highpass, bandpass)
//! - the pitch-shifting voice transform and a built-in vocoder
//! - WAV container I/O
//!
//! # Overview
//!
//! A decoded [`Signal`] feeds two independent pipelines. The filter pipeline
//! designs a Hann-windowed sinc kernel per branch from a cutoff and a
//! transition bandwidth, then convolves every channel with it so the output
//! keeps the input's length and alignment. The voice pipeline normalizes a
//! mono downmix, decomposes it through an [`Analyzer`], multiplies the F0
//! track by a pitch factor, rebuilds it through a [`Synthesizer`] and maps the
//! result back to the input's amplitude range.
//!
//! # Determinism
//!
//! Filtering is pure arithmetic. The built-in vocoder's only randomness is
//! its aperiodic excitation, drawn from a PCG32 stream whose seed is derived
//! via BLAKE3, so a fixed seed gives byte-identical output files.
//!
//! # Example
//!
//! ```
//! use sincvox_dsp::{apply_three_band, Signal};
//! use sincvox_spec::ThreeBandParams;
//!
//! let signal = Signal::mono(vec![0.0; 16000], 16000);
//! let out = apply_three_band(&signal, &ThreeBandParams::default()).unwrap();
//! let low = out.lowpass.unwrap();
//! assert_eq!(low.taps, 497);
//! assert_eq!(low.signal.len(), 16000);
//! ```
//!
//! # Crate Structure
//!
//! - [`sinc`] - The unnormalized sinc function
//! - [`filter`] - Tap count derivation and kernel design
//! - [`convolve`] - Direct and FFT same-length convolution
//! - [`pipeline`] - Three-band filtering and the voice transform
//! - [`vocoder`] - Analysis/synthesis traits and the built-in vocoder
//! - [`wav`] - WAV reading and atomic 16-bit writing
//! - [`rng`] - Seeded noise streams

pub mod convolve;
pub mod error;
pub mod filter;
pub mod pipeline;
pub mod rng;
pub mod signal;
pub mod sinc;
pub mod vocoder;
pub mod wav;

pub use convolve::{convolve_same, convolve_same_slice, convolve_same_with, ConvolutionMethod};
pub use error::{CapabilityError, DspError, DspResult};
pub use filter::{design, tap_count, FilterKernel, FilterKind, FilterSpec};
pub use pipeline::{
    apply_three_band, apply_three_band_with, transform, FilterOptions, FilteredBand,
    ThreeBandOutput, VoiceTransformConfig, VoiceTransformOutput,
};
pub use signal::Signal;
pub use vocoder::{Analyzer, SpectralVocoder, Synthesizer, VocoderFeatures};
