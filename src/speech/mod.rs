//! Speech playback adapter
//!
//! Speaks command responses and reports when speech has finished so the
//! session can leave the processing phase.

mod playback;
mod process;

use anyhow::Result;
use serde::{Deserialize, Serialize};

pub use playback::{PlaybackHandle, SpeechPlayback};
pub use process::ProcessSynthesizer;

/// Delivery parameters, all relative to the synthesizer's normal voice
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceSettings {
    /// Speaking rate (1.0 = normal)
    pub rate: f32,
    /// Pitch (1.0 = normal)
    pub pitch: f32,
    /// Volume (0.0 to 1.0)
    pub volume: f32,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            rate: 1.1,
            pitch: 1.0,
            volume: 1.0,
        }
    }
}

impl VoiceSettings {
    /// Clamp every parameter into the range synthesizers accept
    pub fn normalized(self) -> Self {
        Self {
            rate: self.rate.clamp(0.1, 10.0),
            pitch: self.pitch.clamp(0.0, 2.0),
            volume: self.volume.clamp(0.0, 1.0),
        }
    }
}

/// Text plus delivery parameters for one spoken response
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub voice: VoiceSettings,
}

/// Text-to-speech capability
#[async_trait::async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Speak the utterance, returning once speech has ended
    async fn speak(&self, utterance: Utterance) -> Result<()>;

    /// Synthesizer name for logging
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voice_settings_default() {
        let voice = VoiceSettings::default();

        assert_eq!(voice.rate, 1.1);
        assert_eq!(voice.pitch, 1.0);
        assert_eq!(voice.volume, 1.0);
    }

    #[test]
    fn test_voice_settings_normalized() {
        let voice = VoiceSettings {
            rate: 40.0,
            pitch: -1.0,
            volume: 3.0,
        }
        .normalized();

        assert_eq!(voice.rate, 10.0);
        assert_eq!(voice.pitch, 0.0);
        assert_eq!(voice.volume, 1.0);
    }
}
