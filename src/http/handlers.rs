use super::state::AppState;
use crate::media::{AudioFrame, MediaMode, VideoFrame};
use crate::session::{SessionError, SessionSnapshot, TranscriptEntry};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use base64::Engine;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SelectModeRequest {
    pub mode: MediaMode,
}

#[derive(Debug, Serialize)]
pub struct ControlResponse {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct UserTextRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct VideoFrameRequest {
    /// Base64-encoded image bytes
    pub data: String,
    pub mime_type: String,
    pub timestamp_ms: u64,
}

#[derive(Debug, Deserialize)]
pub struct AudioFrameRequest {
    /// Base64-encoded i16 PCM bytes, little endian, interleaved
    pub pcm: String,
    pub sample_rate: u32,
    pub channels: u16,
    pub timestamp_ms: u64,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn session_error_response(e: SessionError) -> axum::response::Response {
    let status = match &e {
        SessionError::InvalidState { .. } => StatusCode::CONFLICT,
        SessionError::Connection(_) => StatusCode::BAD_GATEWAY,
        SessionError::MediaUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
    };

    error!("Session operation failed: {}", e);
    (
        status,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
        .into_response()
}

fn control_ok(message: &str, snapshot: &SessionSnapshot) -> axum::response::Response {
    (
        StatusCode::OK,
        Json(ControlResponse {
            status: format!("{:?}", snapshot.status).to_lowercase(),
            message: message.to_string(),
        }),
    )
        .into_response()
}

// ============================================================================
// Session control
// ============================================================================

/// POST /session/mode
/// Select the capture source; only valid while idle
pub async fn select_mode(
    State(state): State<AppState>,
    Json(req): Json<SelectModeRequest>,
) -> impl IntoResponse {
    let mut controller = state.controller.lock().await;

    match controller.select_mode(req.mode) {
        Ok(()) => control_ok("Mode selected", &controller.snapshot()),
        Err(e) => session_error_response(e),
    }
}

/// POST /session/start
/// Open the live connection and begin forwarding frames
pub async fn start_session(State(state): State<AppState>) -> impl IntoResponse {
    let mut controller = state.controller.lock().await;

    match controller.start().await {
        Ok(()) => {
            info!("Session started via HTTP");
            control_ok("Session started", &controller.snapshot())
        }
        Err(e) => session_error_response(e),
    }
}

/// POST /session/pause
/// Stop forwarding frames, keep the connection open
pub async fn pause_session(State(state): State<AppState>) -> impl IntoResponse {
    let mut controller = state.controller.lock().await;

    match controller.pause() {
        Ok(()) => control_ok("Session paused", &controller.snapshot()),
        Err(e) => session_error_response(e),
    }
}

/// POST /session/resume
/// Re-register the frame callbacks and resume forwarding
pub async fn resume_session(State(state): State<AppState>) -> impl IntoResponse {
    let mut controller = state.controller.lock().await;

    match controller.resume() {
        Ok(()) => control_ok("Session resumed", &controller.snapshot()),
        Err(e) => session_error_response(e),
    }
}

/// POST /session/stop
/// Tear the session down; no-op if already idle
pub async fn stop_session(State(state): State<AppState>) -> impl IntoResponse {
    let mut controller = state.controller.lock().await;

    match controller.stop() {
        Ok(()) => {
            info!("Session stopped via HTTP");
            control_ok("Session stopped", &controller.snapshot())
        }
        Err(e) => session_error_response(e),
    }
}

// ============================================================================
// Session queries
// ============================================================================

/// GET /session/status
/// Drain pending model responses, then return the session snapshot
pub async fn get_status(State(state): State<AppState>) -> impl IntoResponse {
    let mut controller = state.controller.lock().await;
    controller.ingest_responses();

    (StatusCode::OK, Json(controller.snapshot())).into_response()
}

/// GET /session/transcript
/// The transcript collected so far
pub async fn get_transcript(State(state): State<AppState>) -> impl IntoResponse {
    let mut controller = state.controller.lock().await;
    controller.ingest_responses();

    let transcript: Vec<TranscriptEntry> = controller.transcript().to_vec();
    (StatusCode::OK, Json(transcript)).into_response()
}

/// POST /session/transcript/user
/// Record a user utterance reported by the hosting UI
pub async fn append_user_text(
    State(state): State<AppState>,
    Json(req): Json<UserTextRequest>,
) -> impl IntoResponse {
    let mut controller = state.controller.lock().await;

    match controller.append_user_text(req.text) {
        Ok(()) => control_ok("Entry recorded", &controller.snapshot()),
        Err(e) => session_error_response(e),
    }
}

// ============================================================================
// Media ingest
// ============================================================================

/// POST /media/video
/// Offer a captured video frame to the widget
pub async fn ingest_video_frame(
    State(state): State<AppState>,
    Json(req): Json<VideoFrameRequest>,
) -> impl IntoResponse {
    let data = match base64::engine::general_purpose::STANDARD.decode(&req.data) {
        Ok(data) => data,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("Invalid base64 video payload: {}", e),
                }),
            )
                .into_response();
        }
    };

    state.injector.offer_video(VideoFrame {
        data,
        mime_type: req.mime_type,
        timestamp_ms: req.timestamp_ms,
    });

    StatusCode::ACCEPTED.into_response()
}

/// POST /media/audio
/// Offer a captured audio chunk to the widget; frames that do not match
/// the configured audio format are rejected
pub async fn ingest_audio_frame(
    State(state): State<AppState>,
    Json(req): Json<AudioFrameRequest>,
) -> impl IntoResponse {
    if req.sample_rate != state.media.sample_rate || req.channels != state.media.channels {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!(
                    "Unexpected audio format: {} Hz / {} ch (expected {} Hz / {} ch)",
                    req.sample_rate, req.channels, state.media.sample_rate, state.media.channels
                ),
            }),
        )
            .into_response();
    }

    let pcm = match base64::engine::general_purpose::STANDARD.decode(&req.pcm) {
        Ok(pcm) => pcm,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("Invalid base64 audio payload: {}", e),
                }),
            )
                .into_response();
        }
    };

    let samples: Vec<i16> = pcm
        .chunks_exact(2)
        .map(|b| i16::from_le_bytes([b[0], b[1]]))
        .collect();

    state.injector.offer_audio(AudioFrame {
        samples,
        sample_rate: req.sample_rate,
        channels: req.channels,
        timestamp_ms: req.timestamp_ms,
    });

    StatusCode::ACCEPTED.into_response()
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
