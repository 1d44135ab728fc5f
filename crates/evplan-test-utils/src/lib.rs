//! Shared test utilities for evplan integration tests.
//!
//! Provides scripted plan sources (so tests can force the fallback chain
//! down a particular path), a sample model-generated plan, and helpers for
//! building canned Gemini response bodies.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::{Value, json};

use evplan_core::plan::{EventPlan, TodoItem};
use evplan_core::source::{PlanRequest, PlanSource, SourceError};

// ---------------------------------------------------------------------------
// Scripted sources
// ---------------------------------------------------------------------------

/// A plan source with a fixed outcome that records every request it sees.
pub struct ScriptedSource {
    name: String,
    outcome: Result<EventPlan, String>,
    requests: Arc<std::sync::Mutex<Vec<PlanRequest>>>,
    calls: Arc<AtomicUsize>,
}

/// Handle for inspecting a [`ScriptedSource`] after it has been moved into
/// a chain.
#[derive(Clone)]
pub struct SourceProbe {
    requests: Arc<std::sync::Mutex<Vec<PlanRequest>>>,
    calls: Arc<AtomicUsize>,
}

impl SourceProbe {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every request received so far, oldest first.
    pub fn requests(&self) -> Vec<PlanRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

impl ScriptedSource {
    /// Source that always returns `plan`.
    pub fn succeeding(name: &str, plan: EventPlan) -> (Self, SourceProbe) {
        Self::build(name, Ok(plan))
    }

    /// Source that always fails with [`SourceError::Unavailable`].
    pub fn failing(name: &str, message: &str) -> (Self, SourceProbe) {
        Self::build(name, Err(message.to_string()))
    }

    fn build(name: &str, outcome: Result<EventPlan, String>) -> (Self, SourceProbe) {
        let probe = SourceProbe {
            requests: Arc::default(),
            calls: Arc::default(),
        };
        let source = Self {
            name: name.to_string(),
            outcome,
            requests: Arc::clone(&probe.requests),
            calls: Arc::clone(&probe.calls),
        };
        (source, probe)
    }
}

#[async_trait]
impl PlanSource for ScriptedSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(&self, request: &PlanRequest) -> Result<EventPlan, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }
        self.outcome.clone().map_err(SourceError::Unavailable)
    }
}

/// A source that panics when asked for a plan.
pub struct PanickingSource;

#[async_trait]
impl PlanSource for PanickingSource {
    fn name(&self) -> &str {
        "panicking"
    }

    async fn generate(&self, _request: &PlanRequest) -> Result<EventPlan, SourceError> {
        panic!("plan source exploded");
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A plausible model-generated plan whose `total_budget` (9000) is stale
/// relative to its checklist (8500).
pub fn sample_plan() -> EventPlan {
    EventPlan {
        event_type: "Wedding Anniversary".to_string(),
        description: "An intimate dinner celebration for close family.".to_string(),
        steps: vec![
            "Fix the date and guest list.".to_string(),
            "Book a restaurant with a private room.".to_string(),
            "Order a cake and flowers.".to_string(),
            "Arrange a photographer.".to_string(),
            "Confirm everything two days before.".to_string(),
        ],
        todo_list: vec![
            TodoItem::pending("1", "Reserve private dining room", 4000.0),
            TodoItem::pending("2", "Order anniversary cake", 1200.0),
            TodoItem::pending("3", "Flower arrangement", 800.0),
            TodoItem::pending("4", "Hire photographer", 2500.0),
        ],
        total_budget: 9000.0,
        expanded_details: Some("Tips: Ask the restaurant about set menus.".to_string()),
    }
}

/// [`sample_plan`] serialized as the model would return it.
pub fn sample_plan_json() -> String {
    serde_json::to_string(&sample_plan()).unwrap_or_default()
}

/// A `generateContent` response body whose single candidate carries `text`.
pub fn gemini_body(text: &str) -> Value {
    json!({
        "candidates": [
            {
                "content": {
                    "role": "model",
                    "parts": [ { "text": text } ]
                },
                "finishReason": "STOP"
            }
        ]
    })
}
