use super::snapshot::SessionSnapshot;
use super::status::STATUS_IDLE;
use chrono::{DateTime, Utc};
use tracing::debug;

/// Observable state of the one voice session in this process.
///
/// Only the controller (and the adapters it drives) mutate it; everyone
/// else gets a [`SessionSnapshot`].
#[derive(Debug, Clone)]
pub struct Session {
    listening: bool,
    processing: bool,
    status_message: String,
    last_transcript: String,
    last_response: String,
    control_enabled: bool,
    updated_at: DateTime<Utc>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            listening: false,
            processing: false,
            status_message: STATUS_IDLE.to_string(),
            last_transcript: String::new(),
            last_response: String::new(),
            control_enabled: true,
            updated_at: Utc::now(),
        }
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    pub fn is_processing(&self) -> bool {
        self.processing
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    pub fn last_transcript(&self) -> &str {
        &self.last_transcript
    }

    pub fn last_response(&self) -> &str {
        &self.last_response
    }

    pub fn control_enabled(&self) -> bool {
        self.control_enabled
    }

    pub(crate) fn set_listening(&mut self, listening: bool) {
        if self.listening != listening {
            debug!("Session listening: {} -> {}", self.listening, listening);
        }
        self.listening = listening;
        self.touch();
    }

    pub(crate) fn set_status(&mut self, status: impl Into<String>) {
        self.status_message = status.into();
        self.touch();
    }

    pub(crate) fn record_transcript(&mut self, text: &str) {
        self.last_transcript.clear();
        self.last_transcript.push_str(text);
        self.touch();
    }

    pub(crate) fn record_response(&mut self, text: &str) {
        self.last_response.clear();
        self.last_response.push_str(text);
        self.touch();
    }

    pub(crate) fn disable_control(&mut self) {
        self.control_enabled = false;
        self.touch();
    }

    /// Enter the processing phase.
    ///
    /// Returns false (and changes nothing) if a command is already in flight.
    pub(crate) fn begin_processing(&mut self) -> bool {
        if self.processing {
            return false;
        }
        self.processing = true;
        self.touch();
        true
    }

    /// Leave the processing phase. Returns whether it was active.
    pub(crate) fn finish_processing(&mut self) -> bool {
        let was_processing = self.processing;
        self.processing = false;
        self.touch();
        was_processing
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            listening: self.listening,
            processing: self.processing,
            status_message: self.status_message.clone(),
            last_transcript: self.last_transcript.clone(),
            last_response: self.last_response.clone(),
            control_enabled: self.control_enabled,
            updated_at: self.updated_at,
        }
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
