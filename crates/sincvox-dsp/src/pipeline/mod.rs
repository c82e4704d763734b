//! End-to-end processing pipelines.
//!
//! [`apply_three_band`] produces the lowpass, highpass and bandpass variants
//! of a signal; [`transform`] runs the pitch-shifting voice transform through
//! an [`Analyzer`](crate::vocoder::Analyzer) and
//! [`Synthesizer`](crate::vocoder::Synthesizer). The two share nothing but
//! the input signal.

mod normalize;
mod three_band;
mod voice;

pub use normalize::Normalization;
pub use three_band::{
    apply_band, apply_three_band, apply_three_band_with, FilterOptions, FilteredBand,
    ThreeBandOutput,
};
pub use voice::{transform, VoiceTransformConfig, VoiceTransformOutput};
