use crate::controller::ControlHandle;
use crate::session::{StatusSurface, VoiceActivity};

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Read-only view of the session
    pub surface: StatusSurface,

    /// Voice activity flag fed by the audio-reactive indicator
    pub voice: VoiceActivity,

    /// Control channel into the session loop
    pub control: ControlHandle,
}

impl AppState {
    pub fn new(
        surface: StatusSurface,
        voice: VoiceActivity,
        control: ControlHandle,
    ) -> Self {
        Self {
            surface,
            voice,
            control,
        }
    }
}
