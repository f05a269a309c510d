use super::{SpeechSynthesizer, Utterance};
use anyhow::{bail, Context, Result};
use tokio::process::Command;
use tracing::debug;

/// Words per minute both `say` and `espeak` use at rate 1.0
const BASE_WORDS_PER_MINUTE: f32 = 175.0;

/// Speaks through a platform TTS program (`say` on macOS, `espeak` elsewhere)
pub struct ProcessSynthesizer {
    program: String,
}

impl ProcessSynthesizer {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Default TTS program for this platform
    pub fn default_program() -> &'static str {
        if cfg!(target_os = "macos") {
            "say"
        } else {
            "espeak"
        }
    }

    /// Find a usable synthesizer, if the program is installed
    pub fn detect(program: Option<&str>) -> Option<Self> {
        let program = program.unwrap_or_else(|| Self::default_program());

        let found = std::process::Command::new("which")
            .arg(program)
            .output()
            .map(|out| out.status.success())
            .unwrap_or(false);

        found.then(|| Self::new(program))
    }

    fn args(&self, utterance: &Utterance) -> Vec<String> {
        let voice = utterance.voice;
        let wpm = (BASE_WORDS_PER_MINUTE * voice.rate).round() as u32;

        let mut args = match self.program_name() {
            "say" => vec!["-r".to_string(), wpm.to_string()],
            "espeak" | "espeak-ng" => vec![
                "-s".to_string(),
                wpm.to_string(),
                // espeak pitch is 0-99 with 50 as normal
                "-p".to_string(),
                ((50.0 * voice.pitch).round() as u32).min(99).to_string(),
                // espeak amplitude is 0-200 with 100 as normal
                "-a".to_string(),
                ((100.0 * voice.volume).round() as u32).to_string(),
            ],
            _ => Vec::new(),
        };

        args.push(utterance.text.clone());
        args
    }

    fn program_name(&self) -> &str {
        std::path::Path::new(&self.program)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(&self.program)
    }
}

#[async_trait::async_trait]
impl SpeechSynthesizer for ProcessSynthesizer {
    async fn speak(&self, utterance: Utterance) -> Result<()> {
        let args = self.args(&utterance);
        debug!("Running {} {:?}", self.program, args);

        let output = Command::new(&self.program)
            .args(&args)
            .kill_on_drop(true)
            .output()
            .await
            .with_context(|| format!("Failed to run {}", self.program))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("{} failed: {}", self.program, stderr.trim());
        }

        Ok(())
    }

    fn name(&self) -> &str {
        &self.program
    }
}
