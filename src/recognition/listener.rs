use super::engine::{EngineEvent, RecognitionEngine, TranscriptEvent};
use crate::error::EngineError;
use crate::session::status::{self, STATUS_START_FAILED};
use crate::session::Session;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Presents a recognition engine as an always-on transcript stream.
///
/// Owns restart-on-drop: when the engine ends on its own while the session
/// is still listening, it is started again right away.
pub struct ListeningAdapter {
    /// None when speech recognition is not available at all
    engine: Option<Box<dyn RecognitionEngine>>,

    /// Kept so the receiver never closes between engine runs
    events_tx: mpsc::Sender<EngineEvent>,
    events_rx: mpsc::Receiver<EngineEvent>,

    /// Number of automatic restarts performed
    restarts: usize,
}

impl ListeningAdapter {
    pub fn new(engine: Box<dyn RecognitionEngine>) -> Self {
        info!("Listening adapter using engine: {}", engine.name());
        Self::with_engine(Some(engine))
    }

    /// Adapter for a runtime without speech recognition
    pub fn unavailable() -> Self {
        warn!("No speech recognition engine available");
        Self::with_engine(None)
    }

    fn with_engine(engine: Option<Box<dyn RecognitionEngine>>) -> Self {
        let (events_tx, events_rx) = mpsc::channel(100);
        Self {
            engine,
            events_tx,
            events_rx,
            restarts: 0,
        }
    }

    pub fn is_available(&self) -> bool {
        self.engine.is_some()
    }

    pub fn restarts(&self) -> usize {
        self.restarts
    }

    /// Request recognition to begin. Sets `listening` on success.
    pub async fn start(&mut self, session: &mut Session) -> Result<(), EngineError> {
        let engine = self.engine.as_mut().ok_or(EngineError::Unavailable)?;

        engine.start(self.events_tx.clone()).await?;
        session.set_listening(true);

        info!("Recognition started ({})", engine.name());
        Ok(())
    }

    /// Request recognition to end. Clears `listening`, which disables restarts.
    pub async fn stop(&mut self, session: &mut Session) {
        session.set_listening(false);

        if let Some(engine) = self.engine.as_mut() {
            engine.stop().await;
            info!("Recognition stopped ({})", engine.name());
        }
    }

    /// Wait for the next engine event
    pub async fn next_event(&mut self) -> Option<EngineEvent> {
        self.events_rx.recv().await
    }

    /// Interpret one engine event.
    ///
    /// Returns the transcript for recognition updates; errors and ends are
    /// handled here and yield nothing.
    pub async fn handle(
        &mut self,
        event: EngineEvent,
        session: &mut Session,
    ) -> Option<TranscriptEvent> {
        match event {
            EngineEvent::Result { segments, is_final } => {
                Some(TranscriptEvent::from_segments(&segments, is_final))
            }
            EngineEvent::Error(reason) => {
                error!("Speech recognition error: {}", reason);
                session.set_status(status::recognition_error(&reason));
                None
            }
            EngineEvent::Ended => {
                self.on_ended(session).await;
                None
            }
        }
    }

    async fn on_ended(&mut self, session: &mut Session) {
        // Read the live flag: an explicit stop has already cleared it
        if !session.is_listening() {
            debug!("Recognition ended after stop, not restarting");
            return;
        }

        let Some(engine) = self.engine.as_mut() else {
            return;
        };

        // An end left over from an earlier run while a newer one is active
        if engine.is_running() {
            debug!("Stale end event ignored, engine still running");
            return;
        }

        info!("Recognition ended on its own, restarting ({})", engine.name());

        match engine.start(self.events_tx.clone()).await {
            Ok(()) => {
                self.restarts += 1;
            }
            Err(e) => {
                error!("Failed to restart recognition: {}", e);
                session.set_listening(false);
                session.set_status(STATUS_START_FAILED);
            }
        }
    }
}
