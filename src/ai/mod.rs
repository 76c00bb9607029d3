//! AI streaming client boundary
//!
//! The remote multimodal model lives behind `LiveClient`/`LiveConnection`;
//! this module owns the traits, the wire messages, and the production
//! implementation that reaches the model gateway over NATS.

mod client;
mod messages;
mod nats;

pub use client::{LiveClient, LiveConnection, ResponseEvent};
pub use messages::{AudioFrameMessage, ResponseMessage, SessionStartMessage, VideoFrameMessage};
pub use nats::NatsLiveClient;
