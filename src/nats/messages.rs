use serde::{Deserialize, Serialize};

/// Transcript message received from STT service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptMessage {
    pub session_id: String,
    pub text: String,
    pub partial: bool,
    pub timestamp: String,  // RFC3339 timestamp
    #[serde(default)]
    pub confidence: Option<f32>,
}
