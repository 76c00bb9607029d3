use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Session control
        .route("/session/mode", post(handlers::select_mode))
        .route("/session/start", post(handlers::start_session))
        .route("/session/pause", post(handlers::pause_session))
        .route("/session/resume", post(handlers::resume_session))
        .route("/session/stop", post(handlers::stop_session))
        // Session queries
        .route("/session/status", get(handlers::get_status))
        .route("/session/transcript", get(handlers::get_transcript))
        .route(
            "/session/transcript/user",
            post(handlers::append_user_text),
        )
        // Media ingest from the capture widget
        .route("/media/video", post(handlers::ingest_video_frame))
        .route("/media/audio", post(handlers::ingest_audio_frame))
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        // The hosting UI runs in a browser on another origin
        .layer(CorsLayer::permissive())
        .with_state(state)
}
