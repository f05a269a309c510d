pub mod client;
pub mod messages;

pub use client::{NatsClient, TRANSCRIPT_SUBJECT};
pub use messages::TranscriptMessage;
