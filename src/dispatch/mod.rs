//! Command dispatch to the external command-processing service

mod client;

use crate::error::DispatchError;
use serde::{Deserialize, Serialize};

pub use client::{HttpCommandClient, COMMAND_ENDPOINT};

/// Body sent for one dispatch: the full transcript that carried the wake phrase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandRequest {
    pub command: String,
}

/// Body returned by the command service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandResponse {
    pub response: String,

    /// Whether the service handled the command; the response text is spoken either way
    #[serde(default = "default_success")]
    pub success: bool,
}

fn default_success() -> bool {
    true
}

/// Request/response endpoint that turns a transcript into a spoken reply
#[async_trait::async_trait]
pub trait CommandService: Send + Sync {
    async fn execute(&self, request: CommandRequest) -> Result<CommandResponse, DispatchError>;
}
