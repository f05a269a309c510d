use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Raw event emitted by a recognition engine
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// Recognition update. `segments` holds every result segment the engine
    /// currently keeps for this utterance window, in arrival order.
    Result { segments: Vec<String>, is_final: bool },
    /// Runtime fault (no-speech, audio-capture, network, ...)
    Error(String),
    /// The engine stopped, either on request or on its own
    Ended,
}

/// One recognition update as seen by the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEvent {
    /// Full accumulated transcript for the current utterance
    pub text: String,
    /// Whether the engine considers the result final
    pub is_final: bool,
}

impl TranscriptEvent {
    pub fn from_segments(segments: &[String], is_final: bool) -> Self {
        Self {
            text: segments.concat(),
            is_final,
        }
    }
}

/// Configuration for a recognition engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Locale the engine recognizes. Engines fed by an external STT service
    /// cannot change it; for them it only documents the expected locale.
    pub language: String,
    /// Keep recognizing after a final result instead of ending
    pub continuous: bool,
    /// Emit partial (interim) results
    pub interim_results: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            language: "en-US".to_string(),
            continuous: true,
            interim_results: true,
        }
    }
}

/// Sender side handed to an engine on every start
pub type EngineEvents = mpsc::Sender<EngineEvent>;

/// Streaming speech-to-text capability
///
/// Implementations:
/// - NATS: transcripts published by an external STT service
/// - Test doubles driven by hand
#[async_trait::async_trait]
pub trait RecognitionEngine: Send {
    /// Begin recognizing, reporting to `events` until stopped or ended.
    ///
    /// Fails with `EngineError::StartRejected` if the engine is already
    /// running or refuses to start.
    async fn start(&mut self, events: EngineEvents) -> Result<(), EngineError>;

    /// Stop recognizing. An `Ended` event may still follow.
    async fn stop(&mut self);

    /// Whether the engine is currently recognizing
    fn is_running(&self) -> bool;

    /// Engine name for logging
    fn name(&self) -> &str;
}
