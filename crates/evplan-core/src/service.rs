//! Plan request handling, independent of any transport.
//!
//! [`PlanService::handle`] takes the raw JSON body of a generate request,
//! validates it, runs the fallback chain in a spawned task and returns the
//! plan or a [`RequestError`] that maps onto an HTTP status.

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tracing::{Instrument, debug, info, info_span};
use uuid::Uuid;

use crate::plan::EventPlan;
use crate::source::{FallbackChain, GeneratedPlan, PlanRequest};

/// Message returned when the request has no usable `eventType`.
pub const MISSING_EVENT_TYPE: &str = "Missing required field: eventType";

/// Why a request did not produce a plan.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// The caller sent something unusable. Generation never ran.
    #[error("{0}")]
    BadRequest(String),

    /// Generation itself failed.
    #[error("{0}")]
    Internal(String),
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Coerce a raw `budget` value to a positive amount.
///
/// Numbers and numeric strings count; zero, negatives, non-finite values and
/// every other JSON type are treated as "no budget".
pub fn normalize_budget(value: &Value) -> Option<f64> {
    let amount = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    (amount.is_finite() && amount > 0.0).then_some(amount)
}

/// Turn a request body into a [`PlanRequest`].
pub fn validate(body: &Value) -> Result<PlanRequest, RequestError> {
    let event_type = body
        .get("eventType")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| RequestError::BadRequest(MISSING_EVENT_TYPE.to_string()))?;

    let budget = body.get("budget").and_then(normalize_budget);
    Ok(PlanRequest::new(event_type, budget))
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Shared, immutable handler state.
#[derive(Debug, Clone)]
pub struct PlanService {
    chain: Arc<FallbackChain>,
}

impl PlanService {
    pub fn new(chain: FallbackChain) -> Self {
        Self {
            chain: Arc::new(chain),
        }
    }

    pub fn chain(&self) -> &FallbackChain {
        &self.chain
    }

    /// Validate `body` and generate a plan for it.
    pub async fn handle(&self, body: &Value) -> Result<EventPlan, RequestError> {
        let request = validate(body)?;
        let span = info_span!(
            "generate",
            request_id = %Uuid::new_v4(),
            event_type = %request.event_type,
        );
        async move {
            let generated = self.generate(request).await?;
            info!(source = %generated.source, "plan generated");
            Ok(generated.plan)
        }
        .instrument(span)
        .await
    }

    /// Run the chain for an already validated request.
    ///
    /// The chain runs on its own task so that a panicking source surfaces as
    /// [`RequestError::Internal`] instead of tearing down the caller. The
    /// returned plan's `total_budget` always equals its checklist sum.
    pub async fn generate(&self, request: PlanRequest) -> Result<GeneratedPlan, RequestError> {
        let chain = Arc::clone(&self.chain);
        let task = tokio::spawn(
            async move { chain.generate(&request).await }.instrument(tracing::Span::current()),
        );

        let mut generated = task
            .await
            .map_err(|e| RequestError::Internal(format!("plan generation task failed: {e}")))?
            .map_err(|e| RequestError::Internal(e.to_string()))?;

        if let Some(previous) = generated.plan.reconcile_total() {
            debug!(
                reported = previous,
                computed = generated.plan.total_budget,
                "replaced totalBudget with checklist sum"
            );
        }
        Ok(generated)
    }
}
