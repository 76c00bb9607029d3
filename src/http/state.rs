use crate::config::MediaConfig;
use crate::media::FrameInjector;
use crate::session::SessionController;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared application state for HTTP handlers
///
/// The controller sits behind a mutex so at most one control operation is
/// in flight at a time; frame delivery bypasses it entirely through the
/// injector.
#[derive(Clone)]
pub struct AppState {
    /// The single per-process session controller
    pub controller: Arc<Mutex<SessionController>>,

    /// Producer handle feeding the capture widget
    pub injector: FrameInjector,

    /// Audio format accepted on the ingest path
    pub media: MediaConfig,
}

impl AppState {
    pub fn new(
        controller: SessionController,
        injector: FrameInjector,
        media: MediaConfig,
    ) -> Self {
        Self {
            controller: Arc::new(Mutex::new(controller)),
            injector,
            media,
        }
    }
}
