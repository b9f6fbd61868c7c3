use base64::{engine::general_purpose::STANDARD, Engine as _};
use mobivox_core::{AudioError, SampleBuffer};

/// Decode a standard-alphabet base64 string into raw bytes.
pub fn decode_base64(payload: &str) -> Result<Vec<u8>, AudioError> {
    STANDARD
        .decode(payload)
        .map_err(|e| AudioError::Decode(e.to_string()))
}

/// Convert interleaved little-endian PCM16 bytes into a de-interleaved,
/// normalized `SampleBuffer`. Each i16 is divided by 32768.0, so samples
/// land in [-1.0, ~0.99997]. The byte length must divide evenly by
/// `2 x channels`; a short or ragged payload is an error, never a truncation.
pub fn pcm16_to_samples(
    bytes: &[u8],
    sample_rate: u32,
    channels: u16,
) -> Result<SampleBuffer, AudioError> {
    let stride = 2 * channels as usize;
    if channels == 0 || bytes.len() % stride != 0 {
        return Err(AudioError::Format {
            len: bytes.len(),
            channels,
        });
    }

    let frame_count = bytes.len() / stride;
    let mut planes: Vec<Vec<f32>> = (0..channels)
        .map(|_| Vec::with_capacity(frame_count))
        .collect();

    // Interleaved sample i belongs to channel i % channels, frame i / channels.
    for (i, pair) in bytes.chunks_exact(2).enumerate() {
        let value = i16::from_le_bytes([pair[0], pair[1]]);
        planes[i % channels as usize].push(value as f32 / 32768.0);
    }

    Ok(SampleBuffer::new(planes, sample_rate))
}

/// Decode a base64 PCM16 payload straight into a playable `SampleBuffer`.
/// Pure: the result depends only on the payload and the declared parameters.
pub fn decode_payload(
    payload: &str,
    sample_rate: u32,
    channels: u16,
) -> Result<SampleBuffer, AudioError> {
    let bytes = decode_base64(payload)?;
    pcm16_to_samples(&bytes, sample_rate, channels)
}
