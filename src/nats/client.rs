use anyhow::{Context, Result};
use async_nats::Client;
use tracing::info;

/// Subject the STT service publishes on (`stt.text.partial` / `stt.text.final`)
pub const TRANSCRIPT_SUBJECT: &str = "stt.text.>";

pub struct NatsClient {
    client: Client,
    session_id: String,
}

impl NatsClient {
    /// Connect to NATS server
    pub async fn connect(url: &str, session_id: String) -> Result<Self> {
        info!("Connecting to NATS at {}", url);

        let client = async_nats::connect(url)
            .await
            .context("Failed to connect to NATS")?;

        info!("Connected to NATS successfully");

        Ok(Self { client, session_id })
    }

    /// Recognition session this client reads transcripts for
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Subscribe to transcript messages
    pub async fn subscribe_transcripts(&self) -> Result<async_nats::Subscriber> {
        // Partial and final results arrive on separate subjects; messages for
        // other sessions are filtered by session_id in the payload
        info!("Subscribing to transcripts on {}", TRANSCRIPT_SUBJECT);

        let subscriber = self
            .client
            .subscribe(TRANSCRIPT_SUBJECT)
            .await
            .context("Failed to subscribe to transcripts")?;

        Ok(subscriber)
    }
}
