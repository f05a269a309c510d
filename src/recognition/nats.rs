use super::engine::{EngineConfig, EngineEvent, EngineEvents, RecognitionEngine};
use crate::error::EngineError;
use crate::nats::{NatsClient, TranscriptMessage};
use futures::stream::StreamExt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Recognition engine fed by an external streaming STT service over NATS
pub struct NatsRecognitionEngine {
    client: Arc<NatsClient>,
    config: EngineConfig,
    running: Arc<AtomicBool>,
    events: Option<EngineEvents>,
    task: Option<JoinHandle<()>>,
}

impl NatsRecognitionEngine {
    pub fn new(client: NatsClient, config: EngineConfig) -> Self {
        Self {
            client: Arc::new(client),
            config,
            running: Arc::new(AtomicBool::new(false)),
            events: None,
            task: None,
        }
    }
}

#[async_trait::async_trait]
impl RecognitionEngine for NatsRecognitionEngine {
    async fn start(&mut self, events: EngineEvents) -> Result<(), EngineError> {
        if self.running.load(Ordering::SeqCst) {
            return Err(EngineError::StartRejected("already running".to_string()));
        }

        let mut subscriber = self
            .client
            .subscribe_transcripts()
            .await
            .map_err(|e| EngineError::StartRejected(format!("{:#}", e)))?;

        self.running.store(true, Ordering::SeqCst);
        info!(
            "Following STT transcripts, locale {} as configured on the STT service",
            self.config.language
        );

        let running = Arc::clone(&self.running);
        let feed = TranscriptFeed::new(self.client.session_id(), self.config.clone());
        let tx = events.clone();

        let task = tokio::spawn(async move {
            debug!("Transcript forwarding task started");

            while let Some(msg) = subscriber.next().await {
                let (event, end) = match feed.accept(&msg.payload) {
                    FeedAction::Skip => continue,
                    FeedAction::Emit(event) => (event, false),
                    FeedAction::EmitAndEnd(event) => (event, true),
                };

                if tx.send(event).await.is_err() {
                    break;
                }

                if end {
                    debug!("Final result in single-shot mode, ending");
                    break;
                }
            }

            info!("Transcript forwarding task stopped");
            running.store(false, Ordering::SeqCst);
            let _ = tx.send(EngineEvent::Ended).await;
        });

        self.events = Some(events);
        self.task = Some(task);

        Ok(())
    }

    async fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }

        if self.running.swap(false, Ordering::SeqCst) {
            if let Some(events) = self.events.take() {
                // Non-blocking: the controller loop is the one calling stop()
                let _ = events.try_send(EngineEvent::Ended);
            }
        }
    }

    fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    fn name(&self) -> &str {
        "NATS STT"
    }
}

/// What the forwarding task does with one transcript message
#[derive(Debug, Clone, PartialEq)]
pub enum FeedAction {
    /// Another session's message, or a partial while interim results are off
    Skip,
    Emit(EngineEvent),
    /// Emit, then end the run (single-shot mode after a final result)
    EmitAndEnd(EngineEvent),
}

/// Turns raw transcript payloads for one STT session into engine events.
///
/// Each message carries the whole utterance recognized so far. A final
/// result closes that utterance, so the next message starts a new one and
/// earlier speech is never carried into it.
#[derive(Debug, Clone)]
pub struct TranscriptFeed {
    session_id: String,
    config: EngineConfig,
}

impl TranscriptFeed {
    pub fn new(session_id: impl Into<String>, config: EngineConfig) -> Self {
        Self {
            session_id: session_id.into(),
            config,
        }
    }

    pub fn accept(&self, payload: &[u8]) -> FeedAction {
        let transcript = match serde_json::from_slice::<TranscriptMessage>(payload) {
            Ok(transcript) => transcript,
            Err(e) => {
                warn!("Failed to parse transcript message: {}", e);
                return FeedAction::Emit(EngineEvent::Error(format!(
                    "malformed transcript: {}",
                    e
                )));
            }
        };

        if transcript.session_id != self.session_id {
            return FeedAction::Skip;
        }

        let is_final = !transcript.partial;
        if !is_final && !self.config.interim_results {
            return FeedAction::Skip;
        }

        let event = EngineEvent::Result {
            segments: vec![transcript.text],
            is_final,
        };

        if is_final && !self.config.continuous {
            FeedAction::EmitAndEnd(event)
        } else {
            FeedAction::Emit(event)
        }
    }
}
