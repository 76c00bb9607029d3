/// A single captured video frame, already encoded by the capture widget
/// (the browser side encodes JPEG before delivery)
#[derive(Debug, Clone)]
pub struct VideoFrame {
    /// Encoded image bytes
    pub data: Vec<u8>,
    /// MIME type of the encoded image (e.g. "image/jpeg")
    pub mime_type: String,
    /// Timestamp in milliseconds since the capture stream started
    pub timestamp_ms: u64,
}

/// A single captured audio chunk (16-bit PCM, interleaved)
#[derive(Debug, Clone)]
pub struct AudioFrame {
    /// Raw audio samples (i16 PCM, interleaved)
    pub samples: Vec<i16>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of channels
    pub channels: u16,
    /// Timestamp in milliseconds since the capture stream started
    pub timestamp_ms: u64,
}

impl AudioFrame {
    /// Samples as little-endian PCM bytes, the layout the live gateway expects
    pub fn pcm_bytes(&self) -> Vec<u8> {
        self.samples.iter().flat_map(|s| s.to_le_bytes()).collect()
    }
}
