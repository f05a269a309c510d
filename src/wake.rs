//! Wake phrase matching on accumulated transcripts

use tracing::debug;

/// Phrases that arm a command dispatch
pub const WAKE_PHRASES: [&str; 2] = ["hey assistant", "jarvis"];

/// Case-insensitive wake phrase matcher.
///
/// Matching is plain substring containment on the whole transcript, so a
/// phrase anywhere in the utterance (even inside a longer word) triggers.
#[derive(Debug, Clone)]
pub struct WakePhrases {
    phrases: Vec<String>,
}

impl WakePhrases {
    pub fn new<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let phrases = phrases
            .into_iter()
            .map(|p| p.as_ref().trim().to_lowercase())
            .filter(|p| !p.is_empty())
            .collect();

        Self { phrases }
    }

    /// Return the first phrase contained in `transcript`, if any
    pub fn find(&self, transcript: &str) -> Option<&str> {
        let lower = transcript.to_lowercase();
        let found = self
            .phrases
            .iter()
            .find(|phrase| lower.contains(phrase.as_str()))
            .map(String::as_str);

        if let Some(phrase) = found {
            debug!("Wake phrase '{}' found in '{}'", phrase, transcript);
        }

        found
    }

    pub fn matches(&self, transcript: &str) -> bool {
        self.find(transcript).is_some()
    }

    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }
}

impl Default for WakePhrases {
    fn default() -> Self {
        Self::new(WAKE_PHRASES)
    }
}
