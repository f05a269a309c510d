use super::state::AppState;
use crate::session::StatusView;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct VoiceActivityRequest {
    pub detected: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ToggleResponse {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /session/status
/// Current session snapshot for display surfaces
pub async fn get_status(State(state): State<AppState>) -> Json<StatusView> {
    Json(state.surface.view())
}

/// POST /session/toggle
/// Start listening if idle, stop if listening
pub async fn toggle_listening(State(state): State<AppState>) -> impl IntoResponse {
    if !state.surface.snapshot().control_enabled {
        return (
            StatusCode::CONFLICT,
            Json(ErrorResponse {
                error: "Speech recognition not available".to_string(),
            }),
        )
            .into_response();
    }

    info!("Toggle listening requested");

    match state.control.toggle().await {
        Ok(()) => (
            StatusCode::ACCEPTED,
            Json(ToggleResponse {
                status: "accepted".to_string(),
                message: "Toggle queued".to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to reach session loop: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorResponse {
                    error: "Voice session is not running".to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// POST /session/voice-activity
/// Voice activity reported by the audio-reactive indicator
pub async fn set_voice_activity(
    State(state): State<AppState>,
    Json(req): Json<VoiceActivityRequest>,
) -> StatusCode {
    debug!("Voice activity: {}", req.detected);
    state.voice.set(req.detected);
    StatusCode::NO_CONTENT
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
