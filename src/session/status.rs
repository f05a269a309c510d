//! Status texts shown on the display surface

/// Shown before listening has ever been started
pub const STATUS_IDLE: &str = "Click Start to activate JARVIS";

/// Shown while waiting for a wake phrase
pub const STATUS_LISTENING: &str = "Listening for \"Hey Assistant\" or \"Jarvis\"...";

pub const STATUS_STOPPED: &str = "JARVIS stopped";

pub const STATUS_START_FAILED: &str = "Failed to start listening";

/// Terminal: the toggle control is disabled once this is shown
pub const STATUS_ENGINE_UNAVAILABLE: &str = "Speech recognition not available";

pub const STATUS_PROCESSING: &str = "Processing your command...";

pub const STATUS_RESPONSE_RECEIVED: &str = "Response received!";

pub const STATUS_BACKEND_ERROR: &str = "Error: Backend not connected";

/// Status for a runtime recognition fault
pub fn recognition_error(reason: &str) -> String {
    format!("Error: {}", reason)
}
