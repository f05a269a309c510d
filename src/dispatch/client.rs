use super::{CommandRequest, CommandResponse, CommandService};
use crate::error::DispatchError;
use tracing::{debug, info, warn};

/// Local command-processing service
pub const COMMAND_ENDPOINT: &str = "http://localhost:8000/api/command";

/// Posts commands as JSON to the command service
pub struct HttpCommandClient {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpCommandClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Default for HttpCommandClient {
    fn default() -> Self {
        Self::new(COMMAND_ENDPOINT)
    }
}

#[async_trait::async_trait]
impl CommandService for HttpCommandClient {
    async fn execute(&self, request: CommandRequest) -> Result<CommandResponse, DispatchError> {
        debug!("POST {} {:?}", self.endpoint, request.command);

        // .json() also sets Content-Type: application/json
        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| DispatchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Command service error {}: {}", status, body);
            return Err(DispatchError::Status(status.as_u16()));
        }

        let body: CommandResponse = response
            .json()
            .await
            .map_err(|e| DispatchError::Decode(e.to_string()))?;

        if !body.success {
            warn!("Command service reported failure: {}", body.response);
        }

        info!("Command service responded ({} chars)", body.response.len());

        Ok(body)
    }
}
