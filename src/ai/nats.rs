use super::client::{LiveClient, LiveConnection, ResponseEvent};
use super::messages::{AudioFrameMessage, ResponseMessage, SessionStartMessage, VideoFrameMessage};
use crate::media::{AudioFrame, VideoFrame};
use anyhow::{Context, Result};
use base64::Engine;
use futures::stream::StreamExt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Live client that reaches the model gateway over NATS
///
/// Frames go out on `live.video.frame.<session>` / `live.audio.frame.<session>`;
/// the gateway's responses come back on `live.response.<session>`.
pub struct NatsLiveClient {
    nats_url: String,
    model: String,
    response_modalities: Vec<String>,
}

impl NatsLiveClient {
    pub fn new(nats_url: String, model: String, response_modalities: Vec<String>) -> Self {
        Self {
            nats_url,
            model,
            response_modalities,
        }
    }
}

#[async_trait::async_trait]
impl LiveClient for NatsLiveClient {
    async fn connect(&self) -> Result<Arc<dyn LiveConnection>> {
        info!("Connecting to live gateway via NATS at {}", self.nats_url);

        let client = async_nats::connect(&self.nats_url)
            .await
            .context("Failed to connect to NATS")?;

        let session_id = format!("live-{}", uuid::Uuid::new_v4());

        // Announce the session so the gateway opens a model connection
        let start = SessionStartMessage {
            session_id: session_id.clone(),
            model: self.model.clone(),
            response_modalities: self.response_modalities.clone(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };
        client
            .publish(
                format!("live.session.start.{session_id}"),
                serde_json::to_vec(&start)?.into(),
            )
            .await
            .context("Failed to announce session start")?;

        let mut response_sub = client
            .subscribe(format!("live.response.{session_id}"))
            .await
            .context("Failed to subscribe to model responses")?;

        info!("Live session {} connected", session_id);

        let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<OutboundFrame>();
        let shared = Arc::new(LiveShared::new(outbound_tx));

        // Outbound publisher: drains queued frames onto the wire. Ends when
        // the sender side is dropped on teardown.
        let publisher_client = client.clone();
        let publisher_session = session_id.clone();
        tokio::spawn(async move {
            let mut video_seq: u32 = 0;
            let mut audio_seq: u32 = 0;

            while let Some(frame) = outbound_rx.recv().await {
                let result = match frame {
                    OutboundFrame::Video(frame) => {
                        let sequence = video_seq;
                        video_seq += 1;
                        let message = VideoFrameMessage {
                            session_id: publisher_session.clone(),
                            sequence,
                            data: base64::engine::general_purpose::STANDARD.encode(&frame.data),
                            mime_type: frame.mime_type,
                            timestamp: chrono::Utc::now().to_rfc3339(),
                        };
                        publish_json(
                            &publisher_client,
                            format!("live.video.frame.{publisher_session}"),
                            &message,
                        )
                        .await
                    }
                    OutboundFrame::Audio(frame) => {
                        let sequence = audio_seq;
                        audio_seq += 1;
                        let message = AudioFrameMessage {
                            session_id: publisher_session.clone(),
                            sequence,
                            pcm: base64::engine::general_purpose::STANDARD
                                .encode(frame.pcm_bytes()),
                            sample_rate: frame.sample_rate,
                            channels: frame.channels,
                            timestamp: chrono::Utc::now().to_rfc3339(),
                        };
                        publish_json(
                            &publisher_client,
                            format!("live.audio.frame.{publisher_session}"),
                            &message,
                        )
                        .await
                    }
                };

                if let Err(e) = result {
                    warn!("Failed to publish frame: {}", e);
                }
            }

            info!("Outbound publisher for {} stopped", publisher_session);
        });

        // Inbound reader: parses gateway responses into the event buffer
        // drained by poll_responses(). The stream ending means the NATS
        // connection is gone, so the whole live connection shuts down;
        // pushes are dropped from then on instead of queueing onto a dead
        // connection.
        let reader_shared = Arc::clone(&shared);
        let reader_session = session_id.clone();
        tokio::spawn(async move {
            while let Some(msg) = response_sub.next().await {
                if reader_shared.is_closed() {
                    break;
                }

                let response = match serde_json::from_slice::<ResponseMessage>(&msg.payload) {
                    Ok(response) => response,
                    Err(e) => {
                        warn!("Failed to parse response message: {}", e);
                        continue;
                    }
                };

                if response.session_id != reader_session {
                    continue;
                }

                let event = match response.kind.as_str() {
                    "text" => ResponseEvent::Text(response.payload),
                    "audio" => {
                        match base64::engine::general_purpose::STANDARD.decode(&response.payload) {
                            Ok(bytes) => ResponseEvent::Audio(bytes),
                            Err(e) => {
                                warn!("Failed to decode audio payload: {}", e);
                                continue;
                            }
                        }
                    }
                    "end_of_turn" => ResponseEvent::EndOfTurn,
                    other => {
                        warn!("Unknown response kind: {}", other);
                        continue;
                    }
                };

                reader_shared.push_event(event);
            }

            if reader_shared.shutdown() {
                warn!(
                    "Response stream for {} ended; live connection closed",
                    reader_session
                );
            } else {
                info!("Response reader for {} stopped", reader_session);
            }
        });

        Ok(Arc::new(NatsLiveConnection {
            client,
            session_id,
            shared,
        }))
    }
}

enum OutboundFrame {
    Video(VideoFrame),
    Audio(AudioFrame),
}

/// State shared between the connection handle and its background tasks
struct LiveShared {
    closed: AtomicBool,
    pending: Mutex<Vec<ResponseEvent>>,
    /// Taken on shutdown so the publisher task drains and exits
    outbound: Mutex<Option<mpsc::UnboundedSender<OutboundFrame>>>,
}

impl LiveShared {
    fn new(outbound_tx: mpsc::UnboundedSender<OutboundFrame>) -> Self {
        Self {
            closed: AtomicBool::new(false),
            pending: Mutex::new(Vec::new()),
            outbound: Mutex::new(Some(outbound_tx)),
        }
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn push_event(&self, event: ResponseEvent) {
        self.pending.lock().unwrap().push(event);
    }

    fn push_frame(&self, frame: OutboundFrame) {
        if self.is_closed() {
            return;
        }
        if let Some(tx) = self.outbound.lock().unwrap().as_ref() {
            let _ = tx.send(frame);
        }
    }

    fn poll(&self) -> Vec<ResponseEvent> {
        if self.is_closed() {
            return Vec::new();
        }
        std::mem::take(&mut *self.pending.lock().unwrap())
    }

    /// Flag the connection closed, drop the outbound sender, and discard
    /// buffered events. Returns false if already shut down.
    fn shutdown(&self) -> bool {
        if self.closed.swap(true, Ordering::SeqCst) {
            return false;
        }
        self.outbound.lock().unwrap().take();
        self.pending.lock().unwrap().clear();
        true
    }
}

struct NatsLiveConnection {
    client: async_nats::Client,
    session_id: String,
    shared: Arc<LiveShared>,
}

impl LiveConnection for NatsLiveConnection {
    fn push_video_frame(&self, frame: VideoFrame) {
        self.shared.push_frame(OutboundFrame::Video(frame));
    }

    fn push_audio_frame(&self, frame: AudioFrame) {
        self.shared.push_frame(OutboundFrame::Audio(frame));
    }

    fn poll_responses(&self) -> Vec<ResponseEvent> {
        self.shared.poll()
    }

    fn close(&self) {
        if !self.shared.shutdown() {
            return;
        }

        info!("Closing live session {}", self.session_id);

        let client = self.client.clone();
        let session_id = self.session_id.clone();
        tokio::spawn(async move {
            if let Err(e) = client
                .publish(format!("live.session.stop.{session_id}"), "".into())
                .await
            {
                warn!("Failed to announce session stop: {}", e);
            }
        });
    }
}

async fn publish_json<T: serde::Serialize>(
    client: &async_nats::Client,
    subject: String,
    message: &T,
) -> Result<()> {
    let payload = serde_json::to_vec(message)?;
    client
        .publish(subject, payload.into())
        .await
        .context("Failed to publish message")?;
    Ok(())
}
