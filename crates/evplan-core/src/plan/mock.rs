//! Canned plan used when no model is reachable.
//!
//! [`mock_plan`] is a pure function of the event type and never fails; it is
//! the last link of every production fallback chain.

use super::model::{EventPlan, TodoItem};

const BASE_STEPS: [&str; 5] = [
    "Define the guest list and send invitations.",
    "Select a venue and date.",
    "Plan the menu and order food/drinks.",
    "Arrange entertainment and decorations.",
    "Finalize the schedule and confirm vendors.",
];

const BASE_ITEMS: [(&str, &str, f64); 5] = [
    ("1", "Book Venue", 5000.0),
    ("2", "Order Cake", 1500.0),
    ("3", "Buy Decorations", 2000.0),
    ("4", "Arrange Music/DJ", 3000.0),
    ("5", "Send Invites", 500.0),
];

const BASE_TOTAL: f64 = 12000.0;

const TIPS: &str =
    "Tips: Check for vendor discounts and book early to avoid last-minute issues.";

/// Extra step and checklist item for a recognised event flavour.
struct Variant {
    keyword: &'static str,
    first_step: &'static str,
    task: &'static str,
    cost: f64,
}

/// Checked in order; the first keyword contained in the event type wins.
const VARIANTS: [Variant; 2] = [
    Variant {
        keyword: "birthday",
        first_step: "Choose a birthday theme.",
        task: "Buy Return Gifts",
        cost: 2000.0,
    },
    Variant {
        keyword: "school",
        first_step: "Get permission from school principal.",
        task: "Print ID badges",
        cost: 1000.0,
    },
];

/// Build the static plan for `event_type`.
pub fn mock_plan(event_type: &str) -> EventPlan {
    let mut plan = EventPlan {
        event_type: event_type.to_string(),
        description: format!("A complete guide to organizing a successful {event_type}."),
        steps: BASE_STEPS.iter().map(|s| s.to_string()).collect(),
        todo_list: BASE_ITEMS
            .iter()
            .map(|(id, task, cost)| TodoItem::pending(*id, *task, *cost))
            .collect(),
        total_budget: BASE_TOTAL,
        expanded_details: Some(TIPS.to_string()),
    };

    let lowered = event_type.to_lowercase();
    if let Some(variant) = VARIANTS.iter().find(|v| lowered.contains(v.keyword)) {
        plan.steps.insert(0, variant.first_step.to_string());
        let id = (plan.todo_list.len() + 1).to_string();
        plan.todo_list
            .push(TodoItem::pending(id, variant.task, variant.cost));
        plan.total_budget += variant.cost;
    }

    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::model::TodoStatus;

    #[test]
    fn generic_event_gets_base_plan() {
        let plan = mock_plan("Music Festival");
        assert_eq!(plan.event_type, "Music Festival");
        assert_eq!(
            plan.description,
            "A complete guide to organizing a successful Music Festival."
        );
        assert_eq!(plan.steps.len(), 5);
        assert_eq!(plan.todo_list.len(), 5);
        assert_eq!(plan.total_budget, 12000.0);
        assert_eq!(plan.checklist_total(), 12000.0);
        assert_eq!(plan.expanded_details.as_deref(), Some(TIPS));
        assert!(plan.todo_list.iter().all(|t| t.status == TodoStatus::Pending));
    }

    #[test]
    fn birthday_variant_adds_return_gifts() {
        let plan = mock_plan("Birthday Party");
        assert_eq!(plan.steps[0], "Choose a birthday theme.");
        assert_eq!(plan.steps.len(), 6);
        assert_eq!(plan.todo_list.len(), 6);
        let last = plan.todo_list.last().unwrap();
        assert_eq!(last.id, "6");
        assert_eq!(last.task, "Buy Return Gifts");
        assert_eq!(last.estimated_cost, 2000.0);
        assert_eq!(plan.total_budget, 14000.0);
    }

    #[test]
    fn school_variant_is_case_insensitive() {
        let plan = mock_plan("HIGH SCHOOL reunion");
        assert_eq!(plan.steps[0], "Get permission from school principal.");
        assert_eq!(plan.todo_list.last().unwrap().task, "Print ID badges");
        assert_eq!(plan.total_budget, 13000.0);
    }

    #[test]
    fn birthday_wins_over_school() {
        let plan = mock_plan("School birthday bash");
        assert_eq!(plan.todo_list.last().unwrap().task, "Buy Return Gifts");
        assert_eq!(plan.total_budget, 14000.0);
    }

    #[test]
    fn identical_input_gives_identical_output() {
        assert_eq!(mock_plan("Farewell"), mock_plan("Farewell"));
        assert_eq!(mock_plan("birthday"), mock_plan("birthday"));
    }

    #[test]
    fn ids_are_unique() {
        let plan = mock_plan("birthday");
        let mut ids: Vec<&str> = plan.todo_list.iter().map(|t| t.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), plan.todo_list.len());
    }
}
