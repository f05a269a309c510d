use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Read-only copy of the session handed to display surfaces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Whether the listening engine is supposed to be running
    pub listening: bool,

    /// Whether a command is in flight (dispatch through spoken response)
    pub processing: bool,

    /// Human-readable status line
    pub status_message: String,

    /// Latest accumulated transcript, partial or final
    pub last_transcript: String,

    /// Latest response from the command service
    pub last_response: String,

    /// False once speech recognition turned out to be unavailable
    pub control_enabled: bool,

    /// When the session last changed
    pub updated_at: DateTime<Utc>,
}

/// What a display surface renders: the session plus presentation-only flags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusView {
    #[serde(flatten)]
    pub session: SessionSnapshot,

    /// Voice activity reported by the audio-reactive indicator.
    /// Only reported while listening.
    pub voice_detected: bool,
}
