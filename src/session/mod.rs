//! Session status model
//!
//! This module provides the single observable state of the voice session:
//! - `Session`: listening/processing flags, status line, last transcript and response
//! - `SessionPublisher` / `StatusSurface`: snapshot fan-out to display surfaces
//! - `VoiceActivity`: presentation-only voice activity flag
//! - Status texts shown for every transition

mod snapshot;
mod state;
pub mod status;
mod surface;

pub use snapshot::{SessionSnapshot, StatusView};
pub use state::Session;
pub use surface::{SessionPublisher, StatusSurface, VoiceActivity};
