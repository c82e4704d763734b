//! Decoding into the 16-bit sample scale.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::{DspError, DspResult};
use crate::signal::Signal;

/// Reads a WAV file into a [`Signal`].
///
/// Integer samples of any supported width are rescaled to the 16-bit range;
/// 32-bit float samples in `[-1, 1]` are multiplied by 32768.
///
/// # Errors
/// Returns [`DspError::Io`] if the file cannot be opened and
/// [`DspError::Wav`] for malformed or unsupported content.
pub fn read_wav(path: &Path) -> DspResult<Signal> {
    let file = File::open(path)?;
    read_wav_from(BufReader::new(file))
}

/// Reads a WAV stream into a [`Signal`].
pub fn read_wav_from<R: Read>(reader: R) -> DspResult<Signal> {
    let reader = hound::WavReader::new(reader)?;
    let spec = reader.spec();

    let samples: Vec<f64> = match spec.sample_format {
        hound::SampleFormat::Int => {
            let bits = spec.bits_per_sample;
            if !(1..=32).contains(&bits) {
                return Err(DspError::wav(format!("unsupported bit depth {}", bits)));
            }
            let scale = 2f64.powi(16 - bits as i32);
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f64 * scale))
                .collect::<Result<_, _>>()?
        }
        hound::SampleFormat::Float => {
            if spec.bits_per_sample != 32 {
                return Err(DspError::wav(format!(
                    "unsupported float bit depth {}",
                    spec.bits_per_sample
                )));
            }
            reader
                .into_samples::<f32>()
                .map(|s| s.map(|v| v as f64 * 32768.0))
                .collect::<Result<_, _>>()?
        }
    };

    Signal::new(samples, spec.sample_rate, spec.channels)
}
