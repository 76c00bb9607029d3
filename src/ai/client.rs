use crate::media::{AudioFrame, VideoFrame};
use anyhow::Result;
use std::sync::Arc;

/// One event produced by the remote model on its response stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseEvent {
    /// A text fragment of the model's turn
    Text(String),
    /// A chunk of synthesized audio
    Audio(Vec<u8>),
    /// The model finished its turn
    EndOfTurn,
}

/// Factory for live connections to the remote multimodal model
#[async_trait::async_trait]
pub trait LiveClient: Send + Sync {
    /// Open a duplex connection; fails if the remote endpoint is unreachable
    async fn connect(&self) -> Result<Arc<dyn LiveConnection>>;
}

/// An open duplex connection to the remote model
///
/// Pushes are synchronous and never block: the implementation buffers
/// internally and ships frames on its own task. After `close`, pushes are
/// silently dropped and `poll_responses` returns nothing; late responses
/// racing with teardown are discarded.
pub trait LiveConnection: Send + Sync {
    /// Queue a video frame for the model's video-input channel
    fn push_video_frame(&self, frame: VideoFrame);

    /// Queue an audio frame for the model's audio-input channel
    fn push_audio_frame(&self, frame: AudioFrame);

    /// Drain whatever response events are already buffered; never waits
    fn poll_responses(&self) -> Vec<ResponseEvent>;

    /// Tear the connection down; idempotent
    fn close(&self);
}
