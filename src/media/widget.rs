use super::constraints::MediaConstraints;
use super::frame::{AudioFrame, VideoFrame};
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Handler invoked once per captured video frame
pub type VideoCallback = Arc<dyn Fn(VideoFrame) + Send + Sync>;

/// Handler invoked once per captured audio chunk
pub type AudioCallback = Arc<dyn Fn(AudioFrame) + Send + Sync>;

/// Health signal emitted by the capture widget
///
/// Read-only diagnostics for the hosting UI; the controller never acts on
/// it programmatically.
#[derive(Debug, Clone, Serialize)]
pub struct CaptureHealth {
    /// Whether the widget has delivered at least one frame since configure
    pub playing: bool,
    /// When the most recent frame was delivered
    pub last_frame_at: Option<DateTime<Utc>>,
}

/// Media capture widget boundary
///
/// The widget owns frame delivery on its own thread or task. Callback
/// registration is a pointer-style swap: a delivery in flight runs against
/// the callback that was registered when it started, or is skipped entirely
/// if none was. Setting a callback to `None` is the pause mechanism.
pub trait CaptureWidget: Send + Sync {
    /// Apply capture constraints (video source on/off, audio on/off)
    fn configure(&self, constraints: MediaConstraints) -> Result<()>;

    /// Register or clear the video frame handler
    fn set_video_callback(&self, callback: Option<VideoCallback>);

    /// Register or clear the audio frame handler
    fn set_audio_callback(&self, callback: Option<AudioCallback>);

    /// Current health signal
    fn health(&self) -> CaptureHealth;
}

struct WidgetShared {
    constraints: Mutex<MediaConstraints>,
    video_callback: Mutex<Option<VideoCallback>>,
    audio_callback: Mutex<Option<AudioCallback>>,
    playing: AtomicBool,
    last_frame_at: Mutex<Option<DateTime<Utc>>>,
}

/// In-process capture widget fed by an external frame producer
///
/// The producer side (HTTP media ingest, a local capture loop, or a test)
/// offers frames through the paired `FrameInjector`. The widget applies the
/// configured constraints, then invokes whichever callback is currently
/// registered. Frames arriving while no callback is registered are dropped;
/// there is no buffering.
pub struct ChannelCaptureWidget {
    shared: Arc<WidgetShared>,
}

impl ChannelCaptureWidget {
    /// Create a widget and the injector that feeds it
    pub fn new() -> (Self, FrameInjector) {
        let shared = Arc::new(WidgetShared {
            constraints: Mutex::new(MediaConstraints {
                video: None,
                audio: false,
            }),
            video_callback: Mutex::new(None),
            audio_callback: Mutex::new(None),
            playing: AtomicBool::new(false),
            last_frame_at: Mutex::new(None),
        });

        let widget = Self {
            shared: Arc::clone(&shared),
        };
        let injector = FrameInjector { shared };

        (widget, injector)
    }
}

impl CaptureWidget for ChannelCaptureWidget {
    fn configure(&self, constraints: MediaConstraints) -> Result<()> {
        debug!(?constraints, "Configuring capture widget");
        *self.shared.constraints.lock().unwrap() = constraints;
        self.shared.playing.store(false, Ordering::SeqCst);
        *self.shared.last_frame_at.lock().unwrap() = None;
        Ok(())
    }

    fn set_video_callback(&self, callback: Option<VideoCallback>) {
        *self.shared.video_callback.lock().unwrap() = callback;
    }

    fn set_audio_callback(&self, callback: Option<AudioCallback>) {
        *self.shared.audio_callback.lock().unwrap() = callback;
    }

    fn health(&self) -> CaptureHealth {
        CaptureHealth {
            playing: self.shared.playing.load(Ordering::SeqCst),
            last_frame_at: *self.shared.last_frame_at.lock().unwrap(),
        }
    }
}

/// Producer handle for offering captured frames to a `ChannelCaptureWidget`
#[derive(Clone)]
pub struct FrameInjector {
    shared: Arc<WidgetShared>,
}

impl FrameInjector {
    /// Offer a video frame; dropped unless video capture is enabled and a
    /// callback is registered
    pub fn offer_video(&self, frame: VideoFrame) {
        if self.shared.constraints.lock().unwrap().video.is_none() {
            return;
        }
        self.mark_frame();

        // Clone the handler out of the lock so the invocation itself runs
        // unlocked and a concurrent swap never observes a partial call.
        let callback = self.shared.video_callback.lock().unwrap().clone();
        if let Some(callback) = callback {
            callback(frame);
        }
    }

    /// Offer an audio frame; dropped unless audio capture is enabled and a
    /// callback is registered
    pub fn offer_audio(&self, frame: AudioFrame) {
        if !self.shared.constraints.lock().unwrap().audio {
            return;
        }
        self.mark_frame();

        let callback = self.shared.audio_callback.lock().unwrap().clone();
        if let Some(callback) = callback {
            callback(frame);
        }
    }

    fn mark_frame(&self) {
        self.shared.playing.store(true, Ordering::SeqCst);
        *self.shared.last_frame_at.lock().unwrap() = Some(Utc::now());
    }
}
