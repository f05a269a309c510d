use super::snapshot::{SessionSnapshot, StatusView};
use super::state::Session;
use tokio::sync::watch;

/// Publishes session snapshots to display surfaces
pub struct SessionPublisher {
    tx: watch::Sender<SessionSnapshot>,
}

impl SessionPublisher {
    pub fn new(session: &Session) -> Self {
        let (tx, _rx) = watch::channel(session.snapshot());
        Self { tx }
    }

    pub fn publish(&self, session: &Session) {
        // send_replace never fails, even with no subscribers
        self.tx.send_replace(session.snapshot());
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.tx.subscribe()
    }
}

/// Write side of the voice activity flag, owned by the audio-reactive indicator
#[derive(Clone)]
pub struct VoiceActivity {
    tx: watch::Sender<bool>,
}

impl VoiceActivity {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    pub fn set(&self, detected: bool) {
        self.tx.send_replace(detected);
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

impl Default for VoiceActivity {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only view for display surfaces
#[derive(Clone)]
pub struct StatusSurface {
    session: watch::Receiver<SessionSnapshot>,
    voice: watch::Receiver<bool>,
}

impl StatusSurface {
    pub fn new(session: watch::Receiver<SessionSnapshot>, voice: watch::Receiver<bool>) -> Self {
        Self { session, voice }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.session.borrow().clone()
    }

    pub fn view(&self) -> StatusView {
        let session = self.snapshot();
        let voice_detected = session.listening && *self.voice.borrow();
        StatusView {
            session,
            voice_detected,
        }
    }

    /// Wait until the session changes. Returns false once the controller is gone.
    pub async fn changed(&mut self) -> bool {
        self.session.changed().await.is_ok()
    }
}
