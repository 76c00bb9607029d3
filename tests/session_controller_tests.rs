// Tests for the session controller state machine: transition rules,
// frame forwarding, pause gating, and transcript lifecycle.

use live_assistant::media::{
    AudioCallback, AudioFrame, CaptureHealth, CaptureWidget, MediaConstraints, MediaMode,
    VideoCallback, VideoFrame, VideoSource,
};
use live_assistant::{
    LiveClient, LiveConnection, ResponseEvent, SessionController, SessionError, SessionStatus,
    Speaker,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

// ============================================================================
// Mock collaborators
// ============================================================================

/// Capture widget double: records the configured constraints and lets tests
/// offer frames to whatever callback is currently registered.
#[derive(Default)]
struct MockWidget {
    configured: Mutex<Option<MediaConstraints>>,
    video_callback: Mutex<Option<VideoCallback>>,
    audio_callback: Mutex<Option<AudioCallback>>,
}

impl MockWidget {
    fn last_constraints(&self) -> Option<MediaConstraints> {
        *self.configured.lock().unwrap()
    }

    fn offer_video(&self, frame: VideoFrame) {
        let callback = self.video_callback.lock().unwrap().clone();
        if let Some(callback) = callback {
            callback(frame);
        }
    }

    fn offer_audio(&self, frame: AudioFrame) {
        let callback = self.audio_callback.lock().unwrap().clone();
        if let Some(callback) = callback {
            callback(frame);
        }
    }
}

impl CaptureWidget for MockWidget {
    fn configure(&self, constraints: MediaConstraints) -> anyhow::Result<()> {
        *self.configured.lock().unwrap() = Some(constraints);
        Ok(())
    }

    fn set_video_callback(&self, callback: Option<VideoCallback>) {
        *self.video_callback.lock().unwrap() = callback;
    }

    fn set_audio_callback(&self, callback: Option<AudioCallback>) {
        *self.audio_callback.lock().unwrap() = callback;
    }

    fn health(&self) -> CaptureHealth {
        CaptureHealth {
            playing: false,
            last_frame_at: None,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Forwarded {
    Video(Vec<u8>),
    Audio(Vec<i16>),
}

struct MockConnection {
    forwarded: Mutex<Vec<Forwarded>>,
    pending: Mutex<Vec<ResponseEvent>>,
    closed: AtomicBool,
}

impl MockConnection {
    fn new() -> Self {
        Self {
            forwarded: Mutex::new(Vec::new()),
            pending: Mutex::new(Vec::new()),
            closed: AtomicBool::new(false),
        }
    }

    fn queue_response(&self, event: ResponseEvent) {
        self.pending.lock().unwrap().push(event);
    }

    fn forwarded_count(&self) -> usize {
        self.forwarded.lock().unwrap().len()
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl LiveConnection for MockConnection {
    fn push_video_frame(&self, frame: VideoFrame) {
        self.forwarded
            .lock()
            .unwrap()
            .push(Forwarded::Video(frame.data));
    }

    fn push_audio_frame(&self, frame: AudioFrame) {
        self.forwarded
            .lock()
            .unwrap()
            .push(Forwarded::Audio(frame.samples));
    }

    fn poll_responses(&self) -> Vec<ResponseEvent> {
        if self.closed.load(Ordering::SeqCst) {
            return Vec::new();
        }
        std::mem::take(&mut *self.pending.lock().unwrap())
    }

    fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

struct MockClient {
    fail_connect: bool,
    last_connection: Mutex<Option<Arc<MockConnection>>>,
}

impl MockClient {
    fn new() -> Self {
        Self {
            fail_connect: false,
            last_connection: Mutex::new(None),
        }
    }

    fn failing() -> Self {
        Self {
            fail_connect: true,
            last_connection: Mutex::new(None),
        }
    }

    fn connection(&self) -> Arc<MockConnection> {
        self.last_connection
            .lock()
            .unwrap()
            .clone()
            .expect("no connection opened")
    }
}

#[async_trait::async_trait]
impl LiveClient for MockClient {
    async fn connect(&self) -> anyhow::Result<Arc<dyn LiveConnection>> {
        if self.fail_connect {
            anyhow::bail!("gateway unreachable");
        }
        let connection = Arc::new(MockConnection::new());
        *self.last_connection.lock().unwrap() = Some(Arc::clone(&connection));
        Ok(connection)
    }
}

fn video_frame(tag: u8) -> VideoFrame {
    VideoFrame {
        data: vec![tag],
        mime_type: "image/jpeg".to_string(),
        timestamp_ms: tag as u64,
    }
}

fn audio_frame(tag: i16) -> AudioFrame {
    AudioFrame {
        samples: vec![tag],
        sample_rate: 16000,
        channels: 1,
        timestamp_ms: tag as u64,
    }
}

fn controller() -> (SessionController, Arc<MockWidget>, Arc<MockClient>) {
    let widget = Arc::new(MockWidget::default());
    let client = Arc::new(MockClient::new());
    let controller = SessionController::new(
        Arc::clone(&widget) as Arc<dyn CaptureWidget>,
        Arc::clone(&client) as Arc<dyn LiveClient>,
    );
    (controller, widget, client)
}

// ============================================================================
// Transition rules
// ============================================================================

#[tokio::test]
async fn mode_changes_only_while_idle() {
    let (mut controller, _widget, _client) = controller();

    controller.select_mode(MediaMode::ScreenShare).unwrap();
    assert_eq!(controller.mode(), MediaMode::ScreenShare);

    controller.start().await.unwrap();
    let err = controller.select_mode(MediaMode::Camera).unwrap_err();
    assert!(matches!(err, SessionError::InvalidState { .. }));
    assert_eq!(controller.mode(), MediaMode::ScreenShare);

    controller.pause().unwrap();
    assert!(controller.select_mode(MediaMode::Camera).is_err());

    controller.stop().unwrap();
    controller.select_mode(MediaMode::Camera).unwrap();
    assert_eq!(controller.mode(), MediaMode::Camera);
}

#[tokio::test]
async fn full_lifecycle_returns_to_idle_for_every_mode() {
    for mode in [
        MediaMode::Camera,
        MediaMode::ScreenShare,
        MediaMode::AudioOnly,
    ] {
        let (mut controller, _widget, client) = controller();

        controller.select_mode(mode).unwrap();
        controller.start().await.unwrap();
        assert_eq!(controller.status(), SessionStatus::Active);

        controller.pause().unwrap();
        assert_eq!(controller.status(), SessionStatus::Paused);

        controller.resume().unwrap();
        assert_eq!(controller.status(), SessionStatus::Active);

        client.connection().queue_response(ResponseEvent::Text("hi".to_string()));
        controller.ingest_responses();
        assert_eq!(controller.transcript().len(), 1);

        controller.stop().unwrap();
        assert_eq!(controller.status(), SessionStatus::Idle);
        assert!(controller.transcript().is_empty());
        assert!(client.connection().is_closed());
    }
}

#[tokio::test]
async fn pause_outside_active_fails_and_leaves_state_unchanged() {
    let (mut controller, _widget, _client) = controller();

    let err = controller.pause().unwrap_err();
    assert!(matches!(err, SessionError::InvalidState { .. }));
    assert_eq!(controller.status(), SessionStatus::Idle);

    controller.start().await.unwrap();
    controller.pause().unwrap();

    // Pause while already paused is rejected too
    assert!(controller.pause().is_err());
    assert_eq!(controller.status(), SessionStatus::Paused);
}

#[tokio::test]
async fn resume_outside_paused_fails_and_leaves_state_unchanged() {
    let (mut controller, _widget, _client) = controller();

    assert!(controller.resume().is_err());
    assert_eq!(controller.status(), SessionStatus::Idle);

    controller.start().await.unwrap();
    assert!(controller.resume().is_err());
    assert_eq!(controller.status(), SessionStatus::Active);
}

#[tokio::test]
async fn stop_while_idle_is_a_noop() {
    let (mut controller, _widget, _client) = controller();

    controller.stop().unwrap();
    controller.stop().unwrap();
    assert_eq!(controller.status(), SessionStatus::Idle);
}

#[tokio::test]
async fn failed_start_leaves_session_idle() {
    let widget = Arc::new(MockWidget::default());
    let client = Arc::new(MockClient::failing());
    let mut controller = SessionController::new(
        Arc::clone(&widget) as Arc<dyn CaptureWidget>,
        client as Arc<dyn LiveClient>,
    );

    let err = controller.start().await.unwrap_err();
    assert!(matches!(err, SessionError::Connection(_)));
    assert_eq!(controller.status(), SessionStatus::Idle);
    assert!(controller.transcript().is_empty());

    // No callbacks were left registered on the widget
    assert!(widget.video_callback.lock().unwrap().is_none());
    assert!(widget.audio_callback.lock().unwrap().is_none());
}

// ============================================================================
// Frame forwarding
// ============================================================================

#[tokio::test]
async fn frames_forward_in_arrival_order_and_pause_gates_them() {
    let (mut controller, widget, client) = controller();

    controller.select_mode(MediaMode::Camera).unwrap();
    controller.start().await.unwrap();
    let connection = client.connection();

    widget.offer_video(video_frame(1));
    widget.offer_video(video_frame(2));
    widget.offer_audio(audio_frame(3));

    {
        let forwarded = connection.forwarded.lock().unwrap();
        assert_eq!(
            *forwarded,
            vec![
                Forwarded::Video(vec![1]),
                Forwarded::Video(vec![2]),
                Forwarded::Audio(vec![3]),
            ]
        );
    }

    controller.pause().unwrap();
    widget.offer_video(video_frame(4));
    assert_eq!(connection.forwarded_count(), 3);

    controller.resume().unwrap();
    widget.offer_video(video_frame(5));
    assert_eq!(connection.forwarded_count(), 4);
}

#[tokio::test]
async fn no_frames_reach_the_model_while_paused() {
    let (mut controller, widget, client) = controller();

    controller.start().await.unwrap();
    controller.pause().unwrap();

    for i in 0..50 {
        widget.offer_video(video_frame(i));
        widget.offer_audio(audio_frame(i as i16));
    }

    assert_eq!(client.connection().forwarded_count(), 0);
}

#[tokio::test]
async fn audio_only_mode_never_registers_a_video_callback() {
    let (mut controller, widget, client) = controller();

    controller.select_mode(MediaMode::AudioOnly).unwrap();
    controller.start().await.unwrap();

    assert_eq!(
        widget.last_constraints(),
        Some(MediaConstraints {
            video: None,
            audio: true,
        })
    );
    assert!(widget.video_callback.lock().unwrap().is_none());

    widget.offer_audio(audio_frame(1));
    assert_eq!(client.connection().forwarded_count(), 1);

    controller.stop().unwrap();
    assert!(controller.transcript().is_empty());

    // Mode is unlocked again after stop
    controller.select_mode(MediaMode::ScreenShare).unwrap();
    assert_eq!(controller.mode(), MediaMode::ScreenShare);
}

#[tokio::test]
async fn camera_and_screen_share_pass_their_video_source() {
    let (mut controller, widget, _client) = controller();

    controller.start().await.unwrap();
    assert_eq!(
        widget.last_constraints().unwrap().video,
        Some(VideoSource::Camera)
    );
    controller.stop().unwrap();

    controller.select_mode(MediaMode::ScreenShare).unwrap();
    controller.start().await.unwrap();
    assert_eq!(
        widget.last_constraints().unwrap().video,
        Some(VideoSource::Screen)
    );
}

// ============================================================================
// Response ingestion and transcript
// ============================================================================

#[tokio::test]
async fn responses_append_assistant_entries_while_not_idle() {
    let (mut controller, _widget, client) = controller();

    controller.start().await.unwrap();
    let connection = client.connection();

    connection.queue_response(ResponseEvent::Text("hello".to_string()));
    connection.queue_response(ResponseEvent::Audio(vec![1, 2, 3]));
    connection.queue_response(ResponseEvent::EndOfTurn);
    assert_eq!(controller.ingest_responses(), 2);

    let transcript = controller.transcript();
    assert_eq!(transcript.len(), 1);
    assert_eq!(transcript[0].speaker, Speaker::Assistant);
    assert_eq!(transcript[0].text, "hello");

    let snapshot = controller.snapshot();
    assert_eq!(snapshot.audio_responses_received, 1);
    assert_eq!(snapshot.turns_completed, 1);

    // Ingestion keeps working while paused
    controller.pause().unwrap();
    connection.queue_response(ResponseEvent::Text("still here".to_string()));
    assert_eq!(controller.ingest_responses(), 1);
    assert_eq!(controller.transcript().len(), 2);
}

#[tokio::test]
async fn responses_after_stop_are_discarded() {
    let (mut controller, _widget, client) = controller();

    controller.start().await.unwrap();
    let connection = client.connection();

    controller.stop().unwrap();

    // A late event racing with teardown never reaches the transcript
    connection.queue_response(ResponseEvent::Text("too late".to_string()));
    assert_eq!(controller.ingest_responses(), 0);
    assert!(controller.transcript().is_empty());
}

#[tokio::test]
async fn user_entries_are_recorded_only_during_a_session() {
    let (mut controller, _widget, _client) = controller();

    assert!(controller.append_user_text("hi".to_string()).is_err());

    controller.start().await.unwrap();
    controller.append_user_text("hi".to_string()).unwrap();

    let transcript = controller.transcript();
    assert_eq!(transcript.len(), 1);
    assert_eq!(transcript[0].speaker, Speaker::User);

    controller.stop().unwrap();
    assert!(controller.transcript().is_empty());
}

#[tokio::test]
async fn snapshot_reflects_forwarding_counters() {
    let (mut controller, widget, _client) = controller();

    controller.start().await.unwrap();
    widget.offer_video(video_frame(1));
    widget.offer_audio(audio_frame(2));
    widget.offer_audio(audio_frame(3));

    let snapshot = controller.snapshot();
    assert_eq!(snapshot.status, SessionStatus::Active);
    assert_eq!(snapshot.video_frames_forwarded, 1);
    assert_eq!(snapshot.audio_frames_forwarded, 2);
    assert!(snapshot.started_at.is_some());
}
