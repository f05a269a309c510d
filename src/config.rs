use crate::recognition::EngineConfig;
use crate::speech::VoiceSettings;
use anyhow::Result;
use serde::Deserialize;
use std::time::Duration;

/// Default location of the optional configuration file (extension resolved by `config`)
pub const DEFAULT_CONFIG_PATH: &str = "config/voice-session";

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub recognition: RecognitionConfig,
    pub speech: SpeechConfig,
    pub timeouts: TimeoutConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct RecognitionConfig {
    pub nats_url: String,
    /// STT session to follow; generated when absent
    pub session_id: Option<String>,
    pub language: String,
    pub continuous: bool,
    pub interim_results: bool,
}

#[derive(Debug, Deserialize)]
pub struct SpeechConfig {
    pub enabled: bool,
    /// TTS program; platform default when absent
    pub program: Option<String>,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

#[derive(Debug, Deserialize)]
pub struct TimeoutConfig {
    /// Seconds to wait for the command service, 0 = no limit
    pub dispatch_secs: u64,
    /// Seconds to wait for speech to end, 0 = no limit
    pub playback_secs: u64,
}

impl Config {
    /// Load defaults, then the file at `path` if present, then
    /// `VOICE_SESSION__SECTION__KEY` environment overrides
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .set_default("service.name", "voice-session")?
            .set_default("service.http.bind", "127.0.0.1")?
            .set_default("service.http.port", 8088_i64)?
            .set_default("recognition.nats_url", "nats://localhost:4222")?
            .set_default("recognition.language", "en-US")?
            .set_default("recognition.continuous", true)?
            .set_default("recognition.interim_results", true)?
            .set_default("speech.enabled", true)?
            .set_default("speech.rate", 1.1_f64)?
            .set_default("speech.pitch", 1.0_f64)?
            .set_default("speech.volume", 1.0_f64)?
            .set_default("timeouts.dispatch_secs", 30_i64)?
            .set_default("timeouts.playback_secs", 120_i64)?
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("VOICE_SESSION").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

impl RecognitionConfig {
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            language: self.language.clone(),
            continuous: self.continuous,
            interim_results: self.interim_results,
        }
    }

    pub fn session_id(&self) -> String {
        self.session_id
            .clone()
            .unwrap_or_else(|| format!("voice-{}", uuid::Uuid::new_v4()))
    }
}

impl SpeechConfig {
    pub fn voice_settings(&self) -> VoiceSettings {
        VoiceSettings {
            rate: self.rate,
            pitch: self.pitch,
            volume: self.volume,
        }
    }
}

impl TimeoutConfig {
    pub fn dispatch(&self) -> Option<Duration> {
        bounded(self.dispatch_secs)
    }

    pub fn playback(&self) -> Option<Duration> {
        bounded(self.playback_secs)
    }
}

fn bounded(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_without_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing");

        let cfg = Config::load(path.to_str().unwrap()).unwrap();

        assert_eq!(cfg.service.name, "voice-session");
        assert_eq!(cfg.service.http.port, 8088);
        assert_eq!(cfg.recognition.engine_config(), EngineConfig::default());
        assert_eq!(cfg.speech.voice_settings(), VoiceSettings::default());
        assert_eq!(cfg.timeouts.dispatch(), Some(Duration::from_secs(30)));
        assert_eq!(cfg.timeouts.playback(), Some(Duration::from_secs(120)));
        assert!(cfg.recognition.session_id.is_none());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("voice.toml");
        fs::write(
            &path,
            r#"
[service.http]
port = 9100

[recognition]
session_id = "kitchen"
interim_results = false

[speech]
enabled = false
program = "espeak-ng"

[timeouts]
dispatch_secs = 0
"#,
        )
        .unwrap();

        let cfg = Config::load(path.to_str().unwrap()).unwrap();

        assert_eq!(cfg.service.http.port, 9100);
        assert_eq!(cfg.service.http.bind, "127.0.0.1");
        assert_eq!(cfg.recognition.session_id(), "kitchen");
        assert!(!cfg.recognition.engine_config().interim_results);
        assert!(!cfg.speech.enabled);
        assert_eq!(cfg.speech.program.as_deref(), Some("espeak-ng"));
        assert_eq!(cfg.timeouts.dispatch(), None, "0 disables the bound");
    }

    #[test]
    fn test_generated_session_id() {
        let dir = TempDir::new().unwrap();
        let cfg = Config::load(dir.path().join("none").to_str().unwrap()).unwrap();

        assert!(cfg.recognition.session_id().starts_with("voice-"));
    }
}
