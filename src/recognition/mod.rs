//! Listening engine adapter
//!
//! Wraps a continuous speech-to-text capability as a stream of transcript
//! events and keeps it running while the session is listening.

mod engine;
mod listener;
mod nats;

pub use engine::{EngineConfig, EngineEvent, EngineEvents, RecognitionEngine, TranscriptEvent};
pub use listener::ListeningAdapter;
pub use nats::{FeedAction, NatsRecognitionEngine, TranscriptFeed};
