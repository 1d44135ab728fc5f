//! Wire types for an event plan.
//!
//! These types map directly to the JSON exchanged between the model, the
//! HTTP endpoint and the client. Field names are camelCase on the wire.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Completion status of a checklist item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TodoStatus {
    #[default]
    Pending,
    Completed,
}

impl TodoStatus {
    /// Return the opposite status.
    pub fn toggled(self) -> Self {
        match self {
            Self::Pending => Self::Completed,
            Self::Completed => Self::Pending,
        }
    }
}

impl fmt::Display for TodoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
        };
        f.write_str(s)
    }
}

impl FromStr for TodoStatus {
    type Err = TodoStatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            other => Err(TodoStatusParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`TodoStatus`] string.
#[derive(Debug, Clone)]
pub struct TodoStatusParseError(pub String);

impl fmt::Display for TodoStatusParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid todo status: {:?}", self.0)
    }
}

impl std::error::Error for TodoStatusParseError {}

// ---------------------------------------------------------------------------
// Plan
// ---------------------------------------------------------------------------

/// A generated plan for one event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EventPlan {
    /// Event type as given by the caller or restated by the model.
    pub event_type: String,
    /// One-paragraph summary.
    pub description: String,
    /// Chronological guidance.
    pub steps: Vec<String>,
    /// Costed checklist.
    pub todo_list: Vec<TodoItem>,
    /// Budget total in INR. Recomputed from `todo_list` by the server.
    pub total_budget: f64,
    /// Free-text tips, theme ideas or logistics advice.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expanded_details: Option<String>,
}

/// A single costed checklist entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TodoItem {
    /// Unique within a plan.
    pub id: String,
    pub task: String,
    /// Cost in INR, never negative.
    pub estimated_cost: f64,
    pub status: TodoStatus,
}

impl TodoItem {
    /// Build a pending item.
    pub fn pending(id: impl Into<String>, task: impl Into<String>, estimated_cost: f64) -> Self {
        Self {
            id: id.into(),
            task: task.into(),
            estimated_cost,
            status: TodoStatus::Pending,
        }
    }
}

impl EventPlan {
    /// Sum of every checklist item's estimated cost.
    pub fn checklist_total(&self) -> f64 {
        self.todo_list.iter().map(|t| t.estimated_cost).sum()
    }

    /// Overwrite `total_budget` with the checklist sum.
    ///
    /// Returns the previous value when it differed.
    pub fn reconcile_total(&mut self) -> Option<f64> {
        let sum = self.checklist_total();
        if (self.total_budget - sum).abs() > f64::EPSILON {
            let previous = self.total_budget;
            self.total_budget = sum;
            Some(previous)
        } else {
            None
        }
    }

    /// Look up a checklist item by id.
    pub fn item(&self, id: &str) -> Option<&TodoItem> {
        self.todo_list.iter().find(|t| t.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> EventPlan {
        EventPlan {
            event_type: "Picnic".to_string(),
            description: "A picnic".to_string(),
            steps: vec!["Pick a park".to_string()],
            todo_list: vec![
                TodoItem::pending("1", "Blanket", 400.0),
                TodoItem::pending("2", "Food", 1600.0),
            ],
            total_budget: 1500.0,
            expanded_details: None,
        }
    }

    #[test]
    fn status_display_and_parse() {
        assert_eq!(TodoStatus::Pending.to_string(), "pending");
        assert_eq!(TodoStatus::Completed.to_string(), "completed");
        assert_eq!("completed".parse::<TodoStatus>().unwrap(), TodoStatus::Completed);
        let err = "done".parse::<TodoStatus>().unwrap_err();
        assert!(err.to_string().contains("done"));
    }

    #[test]
    fn status_toggles_both_ways() {
        assert_eq!(TodoStatus::Pending.toggled(), TodoStatus::Completed);
        assert_eq!(TodoStatus::Completed.toggled(), TodoStatus::Pending);
    }

    #[test]
    fn serializes_camel_case_and_skips_absent_details() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["eventType"], "Picnic");
        assert_eq!(json["todoList"][0]["estimatedCost"], 400.0);
        assert_eq!(json["todoList"][0]["status"], "pending");
        assert_eq!(json["totalBudget"], 1500.0);
        assert!(json.get("expandedDetails").is_none());
    }

    #[test]
    fn deserializes_without_expanded_details() {
        let plan: EventPlan = serde_json::from_str(
            r#"{"eventType":"x","description":"d","steps":[],"todoList":[],"totalBudget":0}"#,
        )
        .unwrap();
        assert!(plan.expanded_details.is_none());
        assert!(plan.todo_list.is_empty());
    }

    #[test]
    fn reconcile_total_replaces_stale_figure() {
        let mut plan = sample();
        assert_eq!(plan.checklist_total(), 2000.0);
        assert_eq!(plan.reconcile_total(), Some(1500.0));
        assert_eq!(plan.total_budget, 2000.0);
        assert_eq!(plan.reconcile_total(), None);
    }

    #[test]
    fn item_lookup() {
        let plan = sample();
        assert_eq!(plan.item("2").map(|t| t.task.as_str()), Some("Food"));
        assert!(plan.item("9").is_none());
    }
}
