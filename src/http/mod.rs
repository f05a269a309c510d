//! HTTP surface for displays and the listening control
//!
//! - GET /health - Health check
//! - GET /session/status - Session snapshot plus voice activity
//! - POST /session/toggle - Start or stop listening
//! - POST /session/voice-activity - Report voice activity from the indicator

mod handlers;
mod routes;
mod state;

pub use handlers::{ToggleResponse, VoiceActivityRequest};
pub use routes::create_router;
pub use state::AppState;
