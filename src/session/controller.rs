use super::error::SessionError;
use super::state::{SessionSnapshot, SessionStatus, Speaker, TranscriptEntry};
use crate::ai::{LiveClient, LiveConnection, ResponseEvent};
use crate::media::{AudioCallback, CaptureWidget, MediaMode, VideoCallback};
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

/// Governs which media streams flow to the live model connection
///
/// One controller instance exists per process, owned by the hosting UI and
/// mutated exclusively through the control operations below. The hosting
/// layer serializes control operations (at most one in flight); frame
/// callbacks run on the capture widget's own thread and are registered and
/// deregistered by pointer-style swap, so pausing needs no locking of the
/// frame path.
pub struct SessionController {
    widget: Arc<dyn CaptureWidget>,
    client: Arc<dyn LiveClient>,

    mode: MediaMode,
    status: SessionStatus,
    transcript: Vec<TranscriptEntry>,

    /// Open model connection while status != Idle
    connection: Option<Arc<dyn LiveConnection>>,

    /// Callbacks built at start, kept so resume re-registers the same ones
    video_callback: Option<VideoCallback>,
    audio_callback: Option<AudioCallback>,

    started_at: Option<DateTime<Utc>>,
    video_forwarded: Arc<AtomicUsize>,
    audio_forwarded: Arc<AtomicUsize>,
    audio_responses: usize,
    turns_completed: usize,
}

impl SessionController {
    pub fn new(widget: Arc<dyn CaptureWidget>, client: Arc<dyn LiveClient>) -> Self {
        Self {
            widget,
            client,
            mode: MediaMode::default(),
            status: SessionStatus::Idle,
            transcript: Vec::new(),
            connection: None,
            video_callback: None,
            audio_callback: None,
            started_at: None,
            video_forwarded: Arc::new(AtomicUsize::new(0)),
            audio_forwarded: Arc::new(AtomicUsize::new(0)),
            audio_responses: 0,
            turns_completed: 0,
        }
    }

    /// Select the capture source. Only allowed while idle, so the source
    /// never changes under a live connection.
    pub fn select_mode(&mut self, mode: MediaMode) -> Result<(), SessionError> {
        if self.status != SessionStatus::Idle {
            return Err(SessionError::InvalidState {
                operation: "select_mode",
                status: self.status,
            });
        }

        info!(?mode, "Media mode selected");
        self.mode = mode;
        Ok(())
    }

    /// Open the model connection, configure capture from the selected mode,
    /// and register the frame-forwarding callbacks.
    ///
    /// If the connection cannot be established the session stays idle; no
    /// partial state is retained.
    pub async fn start(&mut self) -> Result<(), SessionError> {
        if self.status != SessionStatus::Idle {
            return Err(SessionError::InvalidState {
                operation: "start",
                status: self.status,
            });
        }

        info!(mode = ?self.mode, "Starting live session");

        let connection = self
            .client
            .connect()
            .await
            .map_err(SessionError::Connection)?;

        let constraints = self.mode.constraints();
        if let Err(e) = self.widget.configure(constraints) {
            connection.close();
            return Err(SessionError::MediaUnavailable(e.to_string()));
        }

        // Forwarding callbacks bound to this connection; pause swaps them
        // out of the widget, resume swaps these same ones back in.
        let video_callback: VideoCallback = {
            let connection = Arc::clone(&connection);
            let forwarded = Arc::clone(&self.video_forwarded);
            Arc::new(move |frame| {
                forwarded.fetch_add(1, Ordering::SeqCst);
                connection.push_video_frame(frame);
            })
        };
        let audio_callback: AudioCallback = {
            let connection = Arc::clone(&connection);
            let forwarded = Arc::clone(&self.audio_forwarded);
            Arc::new(move |frame| {
                forwarded.fetch_add(1, Ordering::SeqCst);
                connection.push_audio_frame(frame);
            })
        };

        self.video_forwarded.store(0, Ordering::SeqCst);
        self.audio_forwarded.store(0, Ordering::SeqCst);
        self.audio_responses = 0;
        self.turns_completed = 0;

        if constraints.video.is_some() {
            self.widget.set_video_callback(Some(Arc::clone(&video_callback)));
        }
        self.widget.set_audio_callback(Some(Arc::clone(&audio_callback)));

        self.connection = Some(connection);
        self.video_callback = Some(video_callback);
        self.audio_callback = Some(audio_callback);
        self.started_at = Some(Utc::now());
        self.status = SessionStatus::Active;

        info!("Live session active");
        Ok(())
    }

    /// Stop forwarding frames while leaving the model connection open.
    pub fn pause(&mut self) -> Result<(), SessionError> {
        if self.status != SessionStatus::Active {
            return Err(SessionError::InvalidState {
                operation: "pause",
                status: self.status,
            });
        }

        self.widget.set_video_callback(None);
        self.widget.set_audio_callback(None);
        self.status = SessionStatus::Paused;

        info!("Live session paused");
        Ok(())
    }

    /// Re-register the callbacks built at start and resume forwarding.
    pub fn resume(&mut self) -> Result<(), SessionError> {
        if self.status != SessionStatus::Paused {
            return Err(SessionError::InvalidState {
                operation: "resume",
                status: self.status,
            });
        }

        if self.mode.has_video() {
            self.widget.set_video_callback(self.video_callback.clone());
        }
        self.widget.set_audio_callback(self.audio_callback.clone());
        self.status = SessionStatus::Active;

        info!("Live session resumed");
        Ok(())
    }

    /// Tear the session down: deregister callbacks, close the model
    /// connection, clear the transcript, return to idle.
    ///
    /// Stop while already idle is an idempotent no-op.
    pub fn stop(&mut self) -> Result<(), SessionError> {
        if self.status == SessionStatus::Idle {
            return Ok(());
        }

        info!("Stopping live session");

        self.widget.set_video_callback(None);
        self.widget.set_audio_callback(None);

        if let Some(connection) = self.connection.take() {
            connection.close();
        }

        self.video_callback = None;
        self.audio_callback = None;
        self.transcript.clear();
        self.started_at = None;
        self.status = SessionStatus::Idle;

        info!("Live session stopped");
        Ok(())
    }

    /// Drain whatever response events the model has already produced into
    /// the transcript. Non-blocking; called opportunistically on each UI
    /// refresh. Events racing with a completed stop are dropped.
    pub fn ingest_responses(&mut self) -> usize {
        if self.status == SessionStatus::Idle {
            return 0;
        }
        let Some(connection) = &self.connection else {
            return 0;
        };

        let events = connection.poll_responses();
        let mut ingested = 0;

        for event in events {
            match event {
                ResponseEvent::Text(text) => {
                    self.transcript.push(TranscriptEntry {
                        speaker: Speaker::Assistant,
                        text,
                        timestamp: Utc::now(),
                    });
                    ingested += 1;
                }
                ResponseEvent::Audio(bytes) => {
                    if bytes.is_empty() {
                        warn!("Empty audio response chunk");
                        continue;
                    }
                    self.audio_responses += 1;
                    ingested += 1;
                }
                ResponseEvent::EndOfTurn => {
                    self.turns_completed += 1;
                }
            }
        }

        ingested
    }

    /// Record something the user said, as reported by the hosting UI.
    pub fn append_user_text(&mut self, text: String) -> Result<(), SessionError> {
        if self.status == SessionStatus::Idle {
            return Err(SessionError::InvalidState {
                operation: "append_user_text",
                status: self.status,
            });
        }

        self.transcript.push(TranscriptEntry {
            speaker: Speaker::User,
            text,
            timestamp: Utc::now(),
        });
        Ok(())
    }

    pub fn mode(&self) -> MediaMode {
        self.mode
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn transcript(&self) -> &[TranscriptEntry] {
        &self.transcript
    }

    /// Diagnostic read model for the hosting UI
    pub fn snapshot(&self) -> SessionSnapshot {
        let duration_secs = self.started_at.map(|started_at| {
            Utc::now()
                .signed_duration_since(started_at)
                .num_milliseconds() as f64
                / 1000.0
        });

        SessionSnapshot {
            status: self.status,
            mode: self.mode,
            started_at: self.started_at,
            duration_secs,
            transcript_entries: self.transcript.len(),
            video_frames_forwarded: self.video_forwarded.load(Ordering::SeqCst),
            audio_frames_forwarded: self.audio_forwarded.load(Ordering::SeqCst),
            audio_responses_received: self.audio_responses,
            turns_completed: self.turns_completed,
            capture: self.widget.health(),
        }
    }
}
