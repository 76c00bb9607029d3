pub mod ai;
pub mod config;
pub mod http;
pub mod media;
pub mod session;

pub use ai::{LiveClient, LiveConnection, NatsLiveClient, ResponseEvent};
pub use config::Config;
pub use http::{create_router, AppState};
pub use media::{
    AudioFrame, CaptureHealth, CaptureWidget, ChannelCaptureWidget, FrameInjector,
    MediaConstraints, MediaMode, VideoFrame, VideoSource,
};
pub use session::{
    SessionController, SessionError, SessionSnapshot, SessionStatus, Speaker, TranscriptEntry,
};
