//! Client-side plan store.
//!
//! The store is a pure reducer: [`reduce`] takes the current [`StoreState`]
//! and an [`Action`] and returns the next state. Totals are derived from the
//! checklist on every read and never cached, so they cannot drift from the
//! items on screen.

use chrono::Utc;

use crate::plan::{EventPlan, TodoItem, TodoStatus, parse_amount_lenient};

/// Prefix of ids assigned to items added on the client.
pub const CUSTOM_ID_PREFIX: &str = "custom-";

/// Everything the result view can be showing.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum StoreState {
    #[default]
    Idle,
    Loading {
        event_type: String,
        budget: Option<f64>,
    },
    Failed(String),
    Ready {
        plan: EventPlan,
        extra_budget: f64,
    },
}

/// Store transitions.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Requested {
        event_type: String,
        budget: Option<f64>,
    },
    Loaded(EventPlan),
    LoadFailed(String),
    Cleared,
    /// `cost` is raw user input, parsed leniently.
    AddItem {
        task: String,
        cost: String,
    },
    DeleteItem(String),
    ToggleStatus(String),
    /// Raw user input, parsed leniently.
    SetExtraBudget(String),
}

impl StoreState {
    pub fn plan(&self) -> Option<&EventPlan> {
        match self {
            Self::Ready { plan, .. } => Some(plan),
            _ => None,
        }
    }

    pub fn extra_budget(&self) -> f64 {
        match self {
            Self::Ready { extra_budget, .. } => *extra_budget,
            _ => 0.0,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    /// Live sum of the checklist costs. Zero when no plan is loaded.
    pub fn base_estimate(&self) -> f64 {
        self.plan().map(EventPlan::checklist_total).unwrap_or(0.0)
    }

    /// Base estimate plus the user's extra budget.
    pub fn grand_total(&self) -> f64 {
        self.base_estimate() + self.extra_budget()
    }

    pub fn item_count(&self) -> usize {
        self.plan().map(|p| p.todo_list.len()).unwrap_or(0)
    }

    pub fn completed_count(&self) -> usize {
        self.plan()
            .map(|p| {
                p.todo_list
                    .iter()
                    .filter(|t| t.status == TodoStatus::Completed)
                    .count()
            })
            .unwrap_or(0)
    }
}

/// Apply `action` to `state`, stamping new item ids with the current time.
pub fn reduce(state: &StoreState, action: Action) -> StoreState {
    reduce_at(state, action, Utc::now().timestamp_millis())
}

/// [`reduce`] with an explicit clock, in unix milliseconds.
pub fn reduce_at(state: &StoreState, action: Action, now_millis: i64) -> StoreState {
    match action {
        Action::Requested { event_type, budget } => StoreState::Loading { event_type, budget },
        Action::Loaded(plan) => StoreState::Ready {
            plan,
            extra_budget: 0.0,
        },
        Action::LoadFailed(message) => StoreState::Failed(message),
        Action::Cleared => StoreState::Idle,
        Action::SetExtraBudget(text) => match state {
            StoreState::Ready { plan, .. } => StoreState::Ready {
                plan: plan.clone(),
                extra_budget: parse_amount_lenient(&text).unwrap_or(0.0),
            },
            other => other.clone(),
        },
        item_action => {
            let StoreState::Ready { plan, extra_budget } = state else {
                return state.clone();
            };
            let mut plan = plan.clone();
            apply_item_action(&mut plan, item_action, now_millis);
            StoreState::Ready {
                plan,
                extra_budget: *extra_budget,
            }
        }
    }
}

fn apply_item_action(plan: &mut EventPlan, action: Action, now_millis: i64) {
    match action {
        Action::AddItem { task, cost } => {
            let task = task.trim();
            if task.is_empty() {
                return;
            }
            let cost = parse_amount_lenient(&cost).unwrap_or(0.0).max(0.0);
            let id = fresh_id(plan, now_millis);
            plan.todo_list.push(TodoItem::pending(id, task, cost));
        }
        Action::DeleteItem(id) => plan.todo_list.retain(|t| t.id != id),
        Action::ToggleStatus(id) => {
            if let Some(item) = plan.todo_list.iter_mut().find(|t| t.id == id) {
                item.status = item.status.toggled();
            }
        }
        _ => {}
    }
}

/// `custom-<millis>`, with `-<n>` appended until it is unique in `plan`.
fn fresh_id(plan: &EventPlan, now_millis: i64) -> String {
    let base = format!("{CUSTOM_ID_PREFIX}{now_millis}");
    if plan.item(&base).is_none() {
        return base;
    }
    (1u32..)
        .map(|n| format!("{base}-{n}"))
        .find(|candidate| plan.item(candidate).is_none())
        .unwrap_or(base)
}
