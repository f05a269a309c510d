// Test doubles for the voice session: a hand-driven recognition engine,
// a scripted command service and a recording synthesizer.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Semaphore;
use voice_session::recognition::EngineEvents;
use voice_session::{
    CommandRequest, CommandResponse, CommandService, DispatchError, EngineConfig, EngineError,
    EngineEvent, FeedAction, ListeningAdapter, RecognitionEngine, SpeechPlayback,
    SpeechSynthesizer, TranscriptFeed, TranscriptMessage, Utterance, VoiceController,
    VoiceSettings,
};

/// STT session the fake transcript feed follows
pub const STT_SESSION: &str = "voice-test";

// ============================================================================
// Recognition engine
// ============================================================================

/// Shared view into a `FakeEngine`, kept by the test
#[derive(Default)]
pub struct EngineState {
    starts: AtomicUsize,
    stops: AtomicUsize,
    running: AtomicBool,
    reject: AtomicBool,
    events: Mutex<Option<EngineEvents>>,
}

impl EngineState {
    pub fn starts(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    pub fn stops(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Make every following start() fail
    pub fn reject_starts(&self) {
        self.reject.store(true, Ordering::SeqCst);
    }

    pub async fn emit(&self, event: EngineEvent) {
        let events = self
            .events
            .lock()
            .unwrap()
            .clone()
            .expect("engine was never started");
        events.send(event).await.expect("adapter dropped");
    }

    pub async fn partial(&self, text: &str) {
        self.emit(EngineEvent::Result {
            segments: vec![text.to_string()],
            is_final: false,
        })
        .await;
    }

    pub async fn final_result(&self, text: &str) {
        self.emit(EngineEvent::Result {
            segments: vec![text.to_string()],
            is_final: true,
        })
        .await;
    }

    /// Result assembled from several engine segments
    pub async fn segments(&self, segments: &[&str], is_final: bool) {
        self.emit(EngineEvent::Result {
            segments: segments.iter().map(|s| s.to_string()).collect(),
            is_final,
        })
        .await;
    }

    /// Message from the STT service, passed through the same feed the NATS
    /// engine uses
    pub async fn stt(&self, text: &str, partial: bool) {
        let payload = serde_json::to_vec(&TranscriptMessage {
            session_id: STT_SESSION.to_string(),
            text: text.to_string(),
            partial,
            timestamp: "2025-10-27T14:30:05Z".to_string(),
            confidence: Some(0.9),
        })
        .unwrap();

        match TranscriptFeed::new(STT_SESSION, EngineConfig::default()).accept(&payload) {
            FeedAction::Emit(event) | FeedAction::EmitAndEnd(event) => self.emit(event).await,
            FeedAction::Skip => {}
        }
    }

    /// Engine stops by itself (silence timeout, network drop)
    pub async fn drop_out(&self) {
        self.running.store(false, Ordering::SeqCst);
        self.emit(EngineEvent::Ended).await;
    }
}

pub struct FakeEngine(pub Arc<EngineState>);

#[async_trait::async_trait]
impl RecognitionEngine for FakeEngine {
    async fn start(&mut self, events: EngineEvents) -> Result<(), EngineError> {
        if self.0.reject.load(Ordering::SeqCst) {
            return Err(EngineError::StartRejected("not-allowed".to_string()));
        }
        if self.0.running.swap(true, Ordering::SeqCst) {
            return Err(EngineError::StartRejected("already running".to_string()));
        }
        self.0.starts.fetch_add(1, Ordering::SeqCst);
        *self.0.events.lock().unwrap() = Some(events);
        Ok(())
    }

    async fn stop(&mut self) {
        self.0.stops.fetch_add(1, Ordering::SeqCst);
        self.0.running.store(false, Ordering::SeqCst);
    }

    fn is_running(&self) -> bool {
        self.0.running.load(Ordering::SeqCst)
    }

    fn name(&self) -> &str {
        "fake"
    }
}

// ============================================================================
// Command service
// ============================================================================

pub enum Reply {
    Respond(String),
    Fail(DispatchError),
}

pub struct FakeCommandService {
    reply: Reply,
    requests: Mutex<Vec<CommandRequest>>,
    /// When set, each request waits for a permit before replying
    gate: Option<Semaphore>,
}

impl FakeCommandService {
    pub fn responding(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Reply::Respond(text.to_string()),
            requests: Mutex::new(Vec::new()),
            gate: None,
        })
    }

    pub fn failing(error: DispatchError) -> Arc<Self> {
        Arc::new(Self {
            reply: Reply::Fail(error),
            requests: Mutex::new(Vec::new()),
            gate: None,
        })
    }

    /// Responds only after `release()`
    pub fn gated(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Reply::Respond(text.to_string()),
            requests: Mutex::new(Vec::new()),
            gate: Some(Semaphore::new(0)),
        })
    }

    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.add_permits(1);
        }
    }

    pub fn requests(&self) -> Vec<CommandRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl CommandService for FakeCommandService {
    async fn execute(&self, request: CommandRequest) -> Result<CommandResponse, DispatchError> {
        self.requests.lock().unwrap().push(request);

        if let Some(gate) = &self.gate {
            gate.acquire().await.expect("gate closed").forget();
        }

        match &self.reply {
            Reply::Respond(text) => Ok(CommandResponse {
                response: text.clone(),
                success: true,
            }),
            Reply::Fail(error) => Err(error.clone()),
        }
    }
}

// ============================================================================
// Speech synthesizer
// ============================================================================

pub struct FakeSynthesizer {
    spoken: Mutex<Vec<Utterance>>,
    gate: Option<Semaphore>,
}

impl FakeSynthesizer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            spoken: Mutex::new(Vec::new()),
            gate: None,
        })
    }

    /// Finishes speaking only after `release()`
    pub fn gated() -> Arc<Self> {
        Arc::new(Self {
            spoken: Mutex::new(Vec::new()),
            gate: Some(Semaphore::new(0)),
        })
    }

    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.add_permits(1);
        }
    }

    pub fn spoken(&self) -> Vec<String> {
        self.spoken
            .lock()
            .unwrap()
            .iter()
            .map(|u| u.text.clone())
            .collect()
    }
}

#[async_trait::async_trait]
impl SpeechSynthesizer for FakeSynthesizer {
    async fn speak(&self, utterance: Utterance) -> anyhow::Result<()> {
        self.spoken.lock().unwrap().push(utterance);

        if let Some(gate) = &self.gate {
            gate.acquire().await?.forget();
        }

        Ok(())
    }

    fn name(&self) -> &str {
        "fake"
    }
}

// ============================================================================
// Harness
// ============================================================================

pub struct Harness {
    pub controller: VoiceController,
    pub engine: Arc<EngineState>,
    pub commands: Arc<FakeCommandService>,
    pub synth: Arc<FakeSynthesizer>,
}

impl Harness {
    pub fn new(commands: Arc<FakeCommandService>, synth: Arc<FakeSynthesizer>) -> Self {
        let engine = Arc::new(EngineState::default());
        let listener = ListeningAdapter::new(Box::new(FakeEngine(engine.clone())));
        let playback = SpeechPlayback::new(synth.clone(), VoiceSettings::default());
        let controller = VoiceController::new(listener, commands.clone(), playback);

        Self {
            controller,
            engine,
            commands,
            synth,
        }
    }

    /// Harness already listening
    pub async fn listening(commands: Arc<FakeCommandService>, synth: Arc<FakeSynthesizer>) -> Self {
        let mut harness = Self::new(commands, synth);
        harness.controller.toggle_listening().await;
        assert!(harness.controller.session().is_listening());
        harness
    }

    /// Process one pending event, failing the test if none arrives
    pub async fn step(&mut self) {
        tokio::time::timeout(Duration::from_secs(2), self.controller.step())
            .await
            .expect("no event for the session loop");
    }

    /// Assert that nothing is pending for the loop
    pub async fn assert_idle(&mut self) {
        let pending = tokio::time::timeout(Duration::from_millis(50), self.controller.step()).await;
        assert!(pending.is_err(), "unexpected event for the session loop");
    }
}
