//! Atomic 16-bit PCM writer.

use std::io::Write;
use std::path::{Path, PathBuf};

use super::format::{WavFormat, HEADER_LEN};
use super::pcm::{pcm16_bytes, pcm_hash};
use crate::error::{DspError, DspResult};
use crate::signal::Signal;

/// Summary of a file written by [`write_wav`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenWav {
    /// Final location of the file.
    pub path: PathBuf,
    /// BLAKE3 hash of the PCM payload.
    pub pcm_hash: String,
    /// Sample frames written.
    pub frames: usize,
    /// Interleaved channel count.
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
}

/// Builds a complete RIFF/WAVE byte image around a PCM payload.
pub fn encode_wav(format: &WavFormat, pcm: &[u8]) -> DspResult<Vec<u8>> {
    let data_size = u32::try_from(pcm.len())
        .ok()
        .filter(|size| size.checked_add(HEADER_LEN as u32 - 8).is_some())
        .ok_or_else(|| DspError::wav("PCM payload exceeds the 4 GiB RIFF limit"))?;

    let mut out = Vec::with_capacity(HEADER_LEN + pcm.len());
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(data_size + HEADER_LEN as u32 - 8).to_le_bytes());
    out.extend_from_slice(b"WAVE");

    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes()); // PCM
    out.extend_from_slice(&format.channels.to_le_bytes());
    out.extend_from_slice(&format.sample_rate.to_le_bytes());
    out.extend_from_slice(&format.byte_rate().to_le_bytes());
    out.extend_from_slice(&format.block_align().to_le_bytes());
    out.extend_from_slice(&format.bits_per_sample.to_le_bytes());

    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_size.to_le_bytes());
    out.extend_from_slice(pcm);
    Ok(out)
}

/// Writes interleaved 16-bit samples to `path`.
///
/// The file is assembled in a temporary file next to the destination and
/// renamed into place, so a failed write leaves no partial output.
///
/// # Errors
/// Returns [`DspError::InvalidParameter`] for a zero channel count or a
/// partial final frame, and [`DspError::Io`] for filesystem failures.
pub fn write_wav(
    path: &Path,
    samples: &[i16],
    channels: u16,
    sample_rate: u32,
) -> DspResult<WrittenWav> {
    if channels == 0 {
        return Err(DspError::invalid_param("channels", "must be at least 1"));
    }
    if samples.len() % channels as usize != 0 {
        return Err(DspError::invalid_param(
            "samples",
            format!(
                "{} samples is not a whole number of {}-channel frames",
                samples.len(),
                channels
            ),
        ));
    }

    let pcm = pcm16_bytes(samples);
    let bytes = encode_wav(&WavFormat::pcm16(channels, sample_rate), &pcm)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(&bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| DspError::Io(e.error))?;

    Ok(WrittenWav {
        path: path.to_path_buf(),
        pcm_hash: pcm_hash(&pcm),
        frames: samples.len() / channels as usize,
        channels,
        sample_rate,
    })
}

/// Rounds, clamps and writes a signal as 16-bit PCM.
pub fn write_signal(path: &Path, signal: &Signal) -> DspResult<WrittenWav> {
    write_wav(
        path,
        &signal.to_pcm16(),
        signal.channels(),
        signal.sample_rate(),
    )
}
