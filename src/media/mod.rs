//! Capture widget boundary
//!
//! This module models the external media capture widget (browser WebRTC
//! component, local capture loop, or a test double) behind a narrow trait:
//! - Frame types for encoded video and raw PCM audio
//! - A closed mode-to-constraints mapping
//! - The `CaptureWidget` trait plus the in-process `ChannelCaptureWidget`
//!   that external producers feed through a `FrameInjector`

mod constraints;
mod frame;
mod widget;

pub use constraints::{MediaConstraints, MediaMode, VideoSource};
pub use frame::{AudioFrame, VideoFrame};
pub use widget::{
    AudioCallback, CaptureHealth, CaptureWidget, ChannelCaptureWidget, FrameInjector,
    VideoCallback,
};
