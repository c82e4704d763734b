//! WAV container I/O.
//!
//! Decoding goes through `hound` and accepts the common integer and float
//! layouts. Encoding is always 16-bit PCM with a fixed 44-byte header and no
//! variable metadata, so identical samples produce identical files. The
//! BLAKE3 hash of the PCM payload identifies an output in reports.

mod format;
mod pcm;
mod reader;
mod writer;


pub use format::WavFormat;
pub use pcm::{data_chunk, pcm16_bytes, pcm_hash, wav_pcm_hash};
pub use reader::{read_wav, read_wav_from};
pub use writer::{encode_wav, write_signal, write_wav, WrittenWav};
