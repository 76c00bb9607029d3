use crate::media::{CaptureHealth, MediaMode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current status of the live session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// No model connection; the only state in which the mode may change
    Idle,
    /// Connection open, frames flowing to the model
    Active,
    /// Connection open but frame callbacks deregistered
    Paused,
}

/// Who said a transcript line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    User,
    Assistant,
}

/// A single line of the session transcript
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub speaker: Speaker,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// Diagnostic read model of the session, served to the hosting UI
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub status: SessionStatus,
    pub mode: MediaMode,

    /// When the session started, if one is live
    pub started_at: Option<DateTime<Utc>>,

    /// Seconds since start, if one is live
    pub duration_secs: Option<f64>,

    /// Number of transcript entries collected so far
    pub transcript_entries: usize,

    /// Frames forwarded to the model since start
    pub video_frames_forwarded: usize,
    pub audio_frames_forwarded: usize,

    /// Audio response chunks received from the model since start
    pub audio_responses_received: usize,

    /// Model turns completed since start
    pub turns_completed: usize,

    /// Capture widget health, purely informational
    pub capture: CaptureHealth,
}
