//! HTTP client for a remote `evplan serve` endpoint.

use std::time::Duration;

use reqwest::Client;
use serde_json::json;
use thiserror::Error;
use tracing::debug;

use crate::envelope::ApiResponse;
use crate::plan::EventPlan;

/// Path of the generate endpoint relative to the server URL.
pub const GENERATE_PATH: &str = "/api/generate";

/// Message used when an error envelope carries no message of its own.
const GENERIC_API_ERROR: &str = "API Error";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("could not reach plan server: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{0}")]
    Api(String),

    #[error("unexpected response from plan server: {0}")]
    Decode(String),
}

/// Calls `POST <server>/api/generate` and unwraps the envelope.
#[derive(Debug, Clone)]
pub struct PlanClient {
    http: Client,
    server_url: String,
}

impl PlanClient {
    pub fn new(server_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            server_url: server_url.into(),
        })
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    fn endpoint(&self) -> String {
        format!("{}{GENERATE_PATH}", self.server_url.trim_end_matches('/'))
    }

    /// Request a plan. `budget` is sent only when present.
    pub async fn generate(
        &self,
        event_type: &str,
        budget: Option<f64>,
    ) -> Result<EventPlan, ClientError> {
        let mut body = json!({ "eventType": event_type });
        if let Some(b) = budget {
            body["budget"] = json!(b);
        }

        let url = self.endpoint();
        debug!(%url, "requesting plan");
        let resp = self.http.post(&url).json(&body).send().await?;
        let status = resp.status();
        let text = resp.text().await?;

        let envelope: ApiResponse<EventPlan> = match serde_json::from_str(&text) {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => {
                return Err(ClientError::Api(GENERIC_API_ERROR.to_string()));
            }
            Err(e) => return Err(ClientError::Decode(e.to_string())),
        };

        if !status.is_success() || !envelope.ok {
            return Err(ClientError::Api(
                envelope
                    .error
                    .unwrap_or_else(|| GENERIC_API_ERROR.to_string()),
            ));
        }

        envelope
            .data
            .ok_or_else(|| ClientError::Decode("success envelope without data".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_without_double_slash() {
        let client = PlanClient::new("http://localhost:5000/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:5000/api/generate");
        assert_eq!(client.server_url(), "http://localhost:5000/");
    }

    #[tokio::test]
    async fn unreachable_server_is_transport_error() {
        let client = PlanClient::new("http://127.0.0.1:1", Duration::from_secs(2)).unwrap();
        let err = client.generate("Farewell", None).await.unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));
    }
}
