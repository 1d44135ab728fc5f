//! Request and error types shared by every plan source.

use thiserror::Error;

use crate::plan::PlanParseError;

/// A validated planning request.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanRequest {
    /// Non-empty event type.
    pub event_type: String,
    /// Target budget in INR. Always positive when present.
    pub budget: Option<f64>,
}

impl PlanRequest {
    pub fn new(event_type: impl Into<String>, budget: Option<f64>) -> Self {
        Self {
            event_type: event_type.into(),
            budget,
        }
    }
}

/// Why a single source could not produce a plan.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("no API key configured for the model provider")]
    MissingCredential,

    #[error("request to model provider failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("model provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("model response contained no text")]
    EmptyResponse,

    #[error("model returned an unusable plan: {0}")]
    Parse(#[from] PlanParseError),

    /// Catch-all for sources without a dedicated variant, such as sources
    /// defined outside this crate and scripted test doubles.
    #[error("{0}")]
    Unavailable(String),
}
