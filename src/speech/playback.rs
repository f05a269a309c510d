use super::{SpeechSynthesizer, Utterance, VoiceSettings};
use crate::session::status::STATUS_LISTENING;
use crate::session::Session;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::{info, warn};

/// Completion signal for one spoken response
pub struct PlaybackHandle {
    done: oneshot::Receiver<()>,
}

impl PlaybackHandle {
    fn completed() -> Self {
        let (tx, done) = oneshot::channel();
        let _ = tx.send(());
        Self { done }
    }

    /// Wait until speech has ended. Also returns if the playback task died.
    pub async fn finished(self) {
        let _ = self.done.await;
    }
}

/// Speaks responses and hands control back when done
pub struct SpeechPlayback {
    /// None when no synthesizer is available; speaking then completes at once
    synthesizer: Option<Arc<dyn SpeechSynthesizer>>,
    voice: VoiceSettings,
    /// Upper bound on one playback; None waits for the synthesizer indefinitely
    timeout: Option<Duration>,
}

impl SpeechPlayback {
    pub fn new(synthesizer: Arc<dyn SpeechSynthesizer>, voice: VoiceSettings) -> Self {
        info!("Speech playback using {}", synthesizer.name());
        Self {
            synthesizer: Some(synthesizer),
            voice: voice.normalized(),
            timeout: None,
        }
    }

    /// Playback without audio output
    pub fn unavailable() -> Self {
        Self {
            synthesizer: None,
            voice: VoiceSettings::default(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn is_available(&self) -> bool {
        self.synthesizer.is_some()
    }

    /// Begin speaking `text`. Failures and timeouts count as completion.
    pub fn speak(&self, text: &str) -> PlaybackHandle {
        let Some(synthesizer) = self.synthesizer.clone() else {
            info!("Speech synthesis unavailable, skipping playback");
            return PlaybackHandle::completed();
        };

        let utterance = Utterance {
            text: text.to_string(),
            voice: self.voice,
        };
        let timeout = self.timeout;
        let (tx, done) = oneshot::channel();

        tokio::spawn(async move {
            info!("Speaking response ({} chars)", utterance.text.len());

            let speaking = synthesizer.speak(utterance);
            let result = match timeout {
                Some(limit) => match tokio::time::timeout(limit, speaking).await {
                    Ok(result) => result,
                    Err(_) => {
                        warn!("Speech playback exceeded {:?}, treating as finished", limit);
                        Ok(())
                    }
                },
                None => speaking.await,
            };

            if let Err(e) = result {
                warn!("Speech playback failed: {:#}", e);
            }

            let _ = tx.send(());
        });

        PlaybackHandle { done }
    }

    /// End-of-speech handler: the only place the success path leaves processing
    pub fn complete(&self, session: &mut Session) {
        session.finish_processing();
        session.set_status(STATUS_LISTENING);
        info!("Playback finished, listening for wake phrase");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Recorder {
        spoken: Mutex<Vec<Utterance>>,
        delay: Duration,
    }

    #[async_trait::async_trait]
    impl SpeechSynthesizer for Recorder {
        async fn speak(&self, utterance: Utterance) -> anyhow::Result<()> {
            self.spoken.lock().unwrap().push(utterance);
            tokio::time::sleep(self.delay).await;
            Ok(())
        }

        fn name(&self) -> &str {
            "recorder"
        }
    }

    struct Broken;

    #[async_trait::async_trait]
    impl SpeechSynthesizer for Broken {
        async fn speak(&self, _utterance: Utterance) -> anyhow::Result<()> {
            anyhow::bail!("audio device gone")
        }

        fn name(&self) -> &str {
            "broken"
        }
    }

    #[tokio::test]
    async fn test_unavailable_completes_immediately() {
        let playback = SpeechPlayback::unavailable();
        assert!(!playback.is_available());

        tokio::time::timeout(Duration::from_millis(100), playback.speak("hello").finished())
            .await
            .expect("unavailable playback should complete at once");
    }

    #[tokio::test]
    async fn test_speak_uses_voice_settings() {
        let recorder = Arc::new(Recorder {
            spoken: Mutex::new(Vec::new()),
            delay: Duration::ZERO,
        });
        let playback = SpeechPlayback::new(recorder.clone(), VoiceSettings::default());

        playback.speak("Lights are on.").finished().await;

        let spoken = recorder.spoken.lock().unwrap();
        assert_eq!(spoken.len(), 1);
        assert_eq!(spoken[0].text, "Lights are on.");
        assert_eq!(spoken[0].voice.rate, 1.1);
    }

    #[tokio::test]
    async fn test_failure_still_completes() {
        let playback = SpeechPlayback::new(Arc::new(Broken), VoiceSettings::default());
        playback.speak("anything").finished().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_bounds_playback() {
        let recorder = Arc::new(Recorder {
            spoken: Mutex::new(Vec::new()),
            delay: Duration::from_secs(3600),
        });
        let playback = SpeechPlayback::new(recorder, VoiceSettings::default())
            .with_timeout(Some(Duration::from_secs(5)));

        playback.speak("a very long story").finished().await;
    }

    #[test]
    fn test_complete_restores_listening_prompt() {
        let playback = SpeechPlayback::unavailable();
        let mut session = Session::new();
        assert!(session.begin_processing());

        playback.complete(&mut session);

        assert!(!session.is_processing());
        assert_eq!(session.status_message(), STATUS_LISTENING);
    }
}
