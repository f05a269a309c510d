//! Wake & dispatch controller
//!
//! Turns transcripts into at most one command dispatch per wake trigger and
//! drives the speak-then-resume cycle. All session mutations happen on the
//! single loop in [`VoiceController::run`]: engine events, dispatch results,
//! playback completions and control commands are handled one at a time.

use crate::dispatch::{CommandRequest, CommandResponse, CommandService};
use crate::error::{DispatchError, SessionError};
use crate::recognition::{EngineEvent, ListeningAdapter, TranscriptEvent};
use crate::session::status::{
    STATUS_BACKEND_ERROR, STATUS_ENGINE_UNAVAILABLE, STATUS_LISTENING, STATUS_PROCESSING,
    STATUS_RESPONSE_RECEIVED, STATUS_START_FAILED, STATUS_STOPPED,
};
use crate::session::{Session, SessionPublisher, SessionSnapshot};
use crate::speech::SpeechPlayback;
use crate::wake::WakePhrases;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

/// Requests from the control surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    /// Start listening if idle, stop if listening
    Toggle,
    /// Stop listening and leave the loop
    Shutdown,
}

/// Sending side of the control channel, held by control surfaces
#[derive(Debug, Clone)]
pub struct ControlHandle {
    tx: mpsc::Sender<ControlCommand>,
}

impl ControlHandle {
    pub async fn toggle(&self) -> Result<(), SessionError> {
        self.send(ControlCommand::Toggle).await
    }

    pub async fn shutdown(&self) -> Result<(), SessionError> {
        self.send(ControlCommand::Shutdown).await
    }

    async fn send(&self, command: ControlCommand) -> Result<(), SessionError> {
        self.tx
            .send(command)
            .await
            .map_err(|_| SessionError::LoopClosed)
    }
}

/// Control channel for [`VoiceController::run`]
pub fn control_channel() -> (ControlHandle, mpsc::Receiver<ControlCommand>) {
    let (tx, rx) = mpsc::channel(8);
    (ControlHandle { tx }, rx)
}

/// Completions reported back to the loop by spawned work
#[derive(Debug)]
enum LoopEvent {
    DispatchCompleted(Result<CommandResponse, DispatchError>),
    PlaybackFinished,
}

pub struct VoiceController {
    session: Session,
    publisher: SessionPublisher,
    listener: ListeningAdapter,
    command_service: Arc<dyn CommandService>,
    playback: SpeechPlayback,
    wake: WakePhrases,

    /// Upper bound on one dispatch; None waits indefinitely
    dispatch_timeout: Option<Duration>,

    /// Set when the current utterance already produced a dispatch
    utterance_consumed: bool,

    /// Number of dispatches started
    dispatches: usize,

    loop_tx: mpsc::Sender<LoopEvent>,
    loop_rx: mpsc::Receiver<LoopEvent>,
}

impl VoiceController {
    pub fn new(
        listener: ListeningAdapter,
        command_service: Arc<dyn CommandService>,
        playback: SpeechPlayback,
    ) -> Self {
        let mut session = Session::new();

        if !listener.is_available() {
            session.disable_control();
            session.set_status(STATUS_ENGINE_UNAVAILABLE);
        }

        let publisher = SessionPublisher::new(&session);
        let (loop_tx, loop_rx) = mpsc::channel(16);

        Self {
            session,
            publisher,
            listener,
            command_service,
            playback,
            wake: WakePhrases::default(),
            dispatch_timeout: None,
            utterance_consumed: false,
            dispatches: 0,
            loop_tx,
            loop_rx,
        }
    }

    pub fn with_wake_phrases(mut self, wake: WakePhrases) -> Self {
        self.wake = wake;
        self
    }

    pub fn with_dispatch_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.dispatch_timeout = timeout;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.publisher.subscribe()
    }

    pub fn dispatch_count(&self) -> usize {
        self.dispatches
    }

    pub fn restart_count(&self) -> usize {
        self.listener.restarts()
    }

    /// Run the session loop until `Shutdown` or the control channel closes
    pub async fn run(mut self, mut commands: mpsc::Receiver<ControlCommand>) {
        info!("Voice session loop started");

        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(ControlCommand::Toggle) => self.toggle_listening().await,
                    Some(ControlCommand::Shutdown) | None => break,
                },
                Some(event) = self.listener.next_event() => self.on_engine_event(event).await,
                Some(event) = self.loop_rx.recv() => self.on_loop_event(event),
            }
            self.publish();
        }

        if self.session.is_listening() {
            self.listener.stop(&mut self.session).await;
            self.session.set_status(STATUS_STOPPED);
            self.publish();
        }

        info!("Voice session loop stopped");
    }

    /// Handle exactly one pending engine event or completion.
    ///
    /// Lets callers drive the loop by hand instead of through [`run`](Self::run).
    pub async fn step(&mut self) {
        tokio::select! {
            Some(event) = self.listener.next_event() => self.on_engine_event(event).await,
            Some(event) = self.loop_rx.recv() => self.on_loop_event(event),
        }
        self.publish();
    }

    /// Start listening if idle, stop if listening
    pub async fn toggle_listening(&mut self) {
        if !self.listener.is_available() {
            self.session.set_status(STATUS_ENGINE_UNAVAILABLE);
            self.publish();
            return;
        }

        if self.session.is_listening() {
            self.listener.stop(&mut self.session).await;
            self.session.set_status(STATUS_STOPPED);
            info!("Listening stopped");
        } else {
            match self.listener.start(&mut self.session).await {
                Ok(()) => {
                    self.utterance_consumed = false;
                    self.session.set_status(STATUS_LISTENING);
                    info!("Listening for wake phrase");
                }
                Err(e) => {
                    error!("Failed to start recognition: {}", e);
                    self.session.set_status(STATUS_START_FAILED);
                }
            }
        }

        self.publish();
    }

    /// Interpret one transcript update
    pub fn handle_transcript(&mut self, event: TranscriptEvent) {
        self.session.record_transcript(&event.text);

        let triggered = self.wake.find(&event.text).map(str::to_string);

        match triggered {
            Some(phrase) if self.session.is_processing() => {
                debug!("Wake phrase '{}' ignored, command in flight", phrase);
            }
            Some(phrase) if self.utterance_consumed => {
                debug!("Wake phrase '{}' ignored, utterance already dispatched", phrase);
            }
            Some(phrase) => {
                info!("Wake phrase '{}' detected", phrase);
                self.utterance_consumed = true;
                self.dispatch(event.text);
            }
            None => {}
        }

        // A final result closes the utterance window
        if event.is_final {
            self.utterance_consumed = false;
        }

        self.publish();
    }

    async fn on_engine_event(&mut self, event: EngineEvent) {
        let ended = matches!(event, EngineEvent::Ended);

        if let Some(transcript) = self.listener.handle(event, &mut self.session).await {
            self.handle_transcript(transcript);
        }

        if ended {
            self.utterance_consumed = false;
        }
    }

    fn on_loop_event(&mut self, event: LoopEvent) {
        match event {
            LoopEvent::DispatchCompleted(result) => self.on_dispatch_completed(result),
            LoopEvent::PlaybackFinished => self.playback.complete(&mut self.session),
        }
    }

    fn dispatch(&mut self, command: String) {
        if !self.session.begin_processing() {
            return;
        }

        self.session.set_status(STATUS_PROCESSING);
        self.dispatches += 1;

        let service = Arc::clone(&self.command_service);
        let tx = self.loop_tx.clone();
        let timeout = self.dispatch_timeout;

        tokio::spawn(async move {
            info!("Dispatching command: {}", command);
            let request = CommandRequest { command };

            let result = match timeout {
                Some(limit) => tokio::time::timeout(limit, service.execute(request))
                    .await
                    .unwrap_or(Err(DispatchError::Timeout)),
                None => service.execute(request).await,
            };

            if tx.send(LoopEvent::DispatchCompleted(result)).await.is_err() {
                warn!("Session loop gone, dropping command result");
            }
        });
    }

    fn on_dispatch_completed(&mut self, result: Result<CommandResponse, DispatchError>) {
        match result {
            Ok(response) => {
                info!("Response received: {}", response.response);
                self.session.record_response(&response.response);
                self.session.set_status(STATUS_RESPONSE_RECEIVED);

                // processing stays set until speech has ended
                let playback = self.playback.speak(&response.response);
                let tx = self.loop_tx.clone();
                tokio::spawn(async move {
                    playback.finished().await;
                    let _ = tx.send(LoopEvent::PlaybackFinished).await;
                });
            }
            Err(e) => {
                error!("Error processing command: {}", e);
                self.session.set_status(STATUS_BACKEND_ERROR);
                self.session.finish_processing();
            }
        }
    }

    fn publish(&self) {
        self.publisher.publish(&self.session);
    }
}
