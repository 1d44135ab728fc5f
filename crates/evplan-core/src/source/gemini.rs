//! Gemini plan source.
//!
//! Sends a single non-streaming `generateContent` request with a JSON
//! response schema mirroring [`EventPlan`], then parses the returned text
//! through [`parse_plan_json`]. The provider enforces the schema; this module
//! still treats the text as untrusted.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use tracing::debug;

use super::trait_def::PlanSource;
use super::types::{PlanRequest, SourceError};
use crate::plan::{EventPlan, build_prompt, parse_plan_json};

/// Connection settings for the Gemini REST API.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key sent as `x-goog-api-key`. `None` makes every call fail fast.
    pub api_key: Option<String>,
    /// Model name, with or without the `models/` prefix.
    pub model: String,
    /// API origin, e.g. `https://generativelanguage.googleapis.com`.
    pub base_url: String,
    /// Whole-request timeout.
    pub timeout: Duration,
}

impl GeminiConfig {
    pub const DEFAULT_MODEL: &str = "gemini-flash-latest";
    pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
    pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

    /// Endpoint for a non-streaming generation call.
    pub fn endpoint(&self) -> String {
        let model = self.model.trim_start_matches("models/");
        format!(
            "{}/v1beta/models/{model}:generateContent",
            self.base_url.trim_end_matches('/')
        )
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: Self::DEFAULT_MODEL.to_string(),
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Plan source that asks Gemini for a schema-constrained JSON plan.
#[derive(Debug, Clone)]
pub struct GeminiSource {
    client: Client,
    config: GeminiConfig,
}

impl GeminiSource {
    pub fn new(config: GeminiConfig) -> Result<Self, SourceError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }
}

#[async_trait]
impl PlanSource for GeminiSource {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, request: &PlanRequest) -> Result<EventPlan, SourceError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(SourceError::MissingCredential)?;

        let prompt = build_prompt(&request.event_type, request.budget);
        let payload = build_payload(&prompt);
        let url = self.config.endpoint();
        debug!("Gemini request -> {url} payload={payload}");

        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&payload)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SourceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = resp.json().await?;
        let text = extract_text(&body).ok_or(SourceError::EmptyResponse)?;
        debug!("Gemini response text: {text}");

        Ok(parse_plan_json(&text)?)
    }
}

/// Build the `generateContent` request body for `prompt`.
pub fn build_payload(prompt: &str) -> Value {
    json!({
        "contents": [
            { "role": "user", "parts": [ { "text": prompt } ] }
        ],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": response_schema(),
        },
    })
}

/// OpenAPI-subset schema for [`EventPlan`] in Gemini's dialect.
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "eventType": { "type": "STRING" },
            "description": { "type": "STRING" },
            "steps": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
            },
            "todoList": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "id": { "type": "STRING" },
                        "task": { "type": "STRING" },
                        "estimatedCost": { "type": "NUMBER" },
                        "status": { "type": "STRING", "enum": ["pending", "completed"] },
                    },
                    "required": ["id", "task", "estimatedCost", "status"],
                },
            },
            "totalBudget": { "type": "NUMBER" },
            "expandedDetails": { "type": "STRING", "nullable": true },
        },
        "required": ["eventType", "description", "steps", "todoList", "totalBudget"],
    })
}

/// Concatenate `candidates[0].content.parts[*].text`.
fn extract_text(root: &Value) -> Option<String> {
    let parts = root
        .get("candidates")?
        .as_array()?
        .first()?
        .get("content")?
        .get("parts")?
        .as_array()?;

    let text: String = parts
        .iter()
        .filter_map(|p| p.get("text").and_then(Value::as_str))
        .collect();

    if text.trim().is_empty() { None } else { Some(text) }
}
