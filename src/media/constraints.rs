use serde::{Deserialize, Serialize};

/// Capture source selected by the hosting UI
///
/// The mode may only change while the session is idle; the controller
/// enforces that rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaMode {
    /// Webcam video plus microphone audio
    Camera,
    /// Screen capture video plus microphone audio
    ScreenShare,
    /// Microphone audio only
    AudioOnly,
}

impl Default for MediaMode {
    fn default() -> Self {
        MediaMode::Camera
    }
}

/// Where video frames come from when video is enabled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoSource {
    Camera,
    Screen,
}

/// Media constraints handed to the capture widget
///
/// Built only through `MediaMode::constraints`, so combinations the UI
/// cannot select (e.g. screen video without audio) are unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaConstraints {
    /// Video source, or `None` for audio-only capture
    pub video: Option<VideoSource>,
    /// Whether audio capture is requested
    pub audio: bool,
}

impl MediaMode {
    /// The closed mode-to-constraints mapping
    pub fn constraints(self) -> MediaConstraints {
        match self {
            MediaMode::Camera => MediaConstraints {
                video: Some(VideoSource::Camera),
                audio: true,
            },
            MediaMode::ScreenShare => MediaConstraints {
                video: Some(VideoSource::Screen),
                audio: true,
            },
            MediaMode::AudioOnly => MediaConstraints {
                video: None,
                audio: true,
            },
        }
    }

    /// Whether this mode captures video at all
    pub fn has_video(self) -> bool {
        self.constraints().video.is_some()
    }
}
