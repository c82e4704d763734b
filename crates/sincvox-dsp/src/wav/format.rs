//! Format block of a 16-bit PCM file.

/// Size of the canonical RIFF/WAVE header written by [`super::encode_wav`].
pub const HEADER_LEN: usize = 44;

/// Channel layout and rate of an encoded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavFormat {
    /// Interleaved channel count.
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bits per sample; the encoder only produces 16.
    pub bits_per_sample: u16,
}

impl WavFormat {
    /// 16-bit PCM with the given layout.
    pub fn pcm16(channels: u16, sample_rate: u32) -> Self {
        Self {
            channels,
            sample_rate,
            bits_per_sample: 16,
        }
    }

    pub(crate) fn block_align(&self) -> u16 {
        self.channels * (self.bits_per_sample / 8)
    }

    pub(crate) fn byte_rate(&self) -> u32 {
        self.sample_rate * self.block_align() as u32
    }
}
