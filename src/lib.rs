pub mod config;
pub mod controller;
pub mod dispatch;
pub mod error;
pub mod http;
pub mod nats;
pub mod recognition;
pub mod session;
pub mod speech;
pub mod wake;

pub use config::Config;
pub use controller::{control_channel, ControlCommand, ControlHandle, VoiceController};
pub use dispatch::{CommandRequest, CommandResponse, CommandService, HttpCommandClient};
pub use error::{DispatchError, EngineError, SessionError};
pub use http::{create_router, AppState};
pub use nats::{NatsClient, TranscriptMessage};
pub use recognition::{
    EngineConfig, EngineEvent, FeedAction, ListeningAdapter, NatsRecognitionEngine,
    RecognitionEngine, TranscriptEvent, TranscriptFeed,
};
pub use session::{Session, SessionSnapshot, StatusSurface, StatusView, VoiceActivity};
pub use speech::{ProcessSynthesizer, SpeechPlayback, SpeechSynthesizer, Utterance, VoiceSettings};
pub use wake::WakePhrases;
