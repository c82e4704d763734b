//! PCM payload helpers.

/// Serializes samples as little-endian 16-bit PCM.
pub fn pcm16_bytes(samples: &[i16]) -> Vec<u8> {
    samples.iter().flat_map(|s| s.to_le_bytes()).collect()
}

/// BLAKE3 hex digest of a PCM payload.
pub fn pcm_hash(pcm: &[u8]) -> String {
    blake3::hash(pcm).to_hex().to_string()
}

/// Locates the `data` chunk payload of a RIFF/WAVE byte buffer.
///
/// Walks the chunk list, honoring odd-size padding, and returns `None` for
/// buffers that are not WAVE files or have a truncated `data` chunk.
pub fn data_chunk(wav: &[u8]) -> Option<&[u8]> {
    if wav.len() < 12 || &wav[0..4] != b"RIFF" || &wav[8..12] != b"WAVE" {
        return None;
    }

    let mut rest = &wav[12..];
    while rest.len() >= 8 {
        let (id, size_bytes) = (&rest[0..4], &rest[4..8]);
        let size = u32::from_le_bytes([size_bytes[0], size_bytes[1], size_bytes[2], size_bytes[3]])
            as usize;
        let body = &rest[8..];
        if id == b"data" {
            return body.get(..size);
        }
        let skip = size + (size & 1);
        rest = body.get(skip..)?;
    }
    None
}

/// Hash of the PCM payload of an encoded file, or `None` if it has no
/// readable `data` chunk.
pub fn wav_pcm_hash(wav: &[u8]) -> Option<String> {
    data_chunk(wav).map(pcm_hash)
}
