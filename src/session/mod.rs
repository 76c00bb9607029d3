//! Live session control
//!
//! This module provides the `SessionController` that governs which media
//! streams flow to the live model connection:
//! - The Idle / Active / Paused status machine and its transition rules
//! - Frame-forwarding callbacks wired into the capture widget
//! - Transcript collection from the model's response stream
//! - Read-only snapshots for the hosting UI

mod controller;
mod error;
mod state;

pub use controller::SessionController;
pub use error::SessionError;
pub use state::{SessionSnapshot, SessionStatus, Speaker, TranscriptEntry};
