//! Plan JSON parser with shape checks.
//!
//! Parses model output into an [`EventPlan`] and verifies:
//! - The body is not blank (markdown code fences are stripped first).
//! - The JSON matches the plan shape, including the status enum.
//! - Every amount is finite and no item cost is negative.

use thiserror::Error;

use super::model::EventPlan;

/// Errors that can occur while parsing model output.
#[derive(Debug, Error)]
pub enum PlanParseError {
    #[error("response body is empty")]
    Empty,

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("totalBudget is not a finite number")]
    NonFiniteTotal,

    #[error("item {id:?} has invalid estimatedCost {cost}")]
    InvalidCost { id: String, cost: f64 },
}

/// Parse and shape-check a plan JSON string.
pub fn parse_plan_json(content: &str) -> Result<EventPlan, PlanParseError> {
    let body = strip_code_fence(content.trim());
    if body.is_empty() {
        return Err(PlanParseError::Empty);
    }

    let plan: EventPlan = serde_json::from_str(body)?;
    validate(&plan)?;
    Ok(plan)
}

fn validate(plan: &EventPlan) -> Result<(), PlanParseError> {
    if !plan.total_budget.is_finite() {
        return Err(PlanParseError::NonFiniteTotal);
    }
    for item in &plan.todo_list {
        if !item.estimated_cost.is_finite() || item.estimated_cost < 0.0 {
            return Err(PlanParseError::InvalidCost {
                id: item.id.clone(),
                cost: item.estimated_cost,
            });
        }
    }
    Ok(())
}

/// Remove a surrounding ```` ```json ```` fence if present.
fn strip_code_fence(body: &str) -> &str {
    let Some(rest) = body.strip_prefix("```") else {
        return body;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
