use serde::{Deserialize, Serialize};

/// Session announcement published when a live connection opens
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionStartMessage {
    pub session_id: String,
    /// Model identifier, e.g. "models/gemini-2.0-flash-exp"
    pub model: String,
    /// Requested response modalities, e.g. ["AUDIO"]
    pub response_modalities: Vec<String>,
    pub timestamp: String, // RFC3339 timestamp
}

/// Video frame message published to the model gateway
#[derive(Debug, Serialize, Deserialize)]
pub struct VideoFrameMessage {
    pub session_id: String,
    pub sequence: u32,
    /// Base64-encoded image bytes
    pub data: String,
    pub mime_type: String,
    pub timestamp: String,
}

/// Audio frame message published to the model gateway
#[derive(Debug, Serialize, Deserialize)]
pub struct AudioFrameMessage {
    pub session_id: String,
    pub sequence: u32,
    /// Base64-encoded PCM bytes
    pub pcm: String,
    pub sample_rate: u32,
    pub channels: u16,
    pub timestamp: String,
}

/// Response message received from the model gateway
#[derive(Debug, Serialize, Deserialize)]
pub struct ResponseMessage {
    pub session_id: String,
    /// "text", "audio", or "end_of_turn"
    pub kind: String,
    /// Text fragment, or base64-encoded audio for "audio" responses
    #[serde(default)]
    pub payload: String,
    pub timestamp: String,
}
