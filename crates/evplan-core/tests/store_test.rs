//! Store invariants across longer edit sequences.

use evplan_core::plan::{TodoStatus, mock_plan};
use evplan_core::store::{Action, StoreState, reduce, reduce_at};

fn loaded(event_type: &str) -> StoreState {
    reduce(&StoreState::Idle, Action::Loaded(mock_plan(event_type)))
}

fn live_sum(state: &StoreState) -> f64 {
    state
        .plan()
        .map(|p| p.todo_list.iter().map(|t| t.estimated_cost).sum())
        .unwrap_or(0.0)
}

#[test]
fn rent_chairs_scenario() {
    let state = reduce(
        &loaded("Farewell"),
        Action::AddItem {
            task: "Rent Chairs".to_string(),
            cost: "300".to_string(),
        },
    );
    assert_eq!(state.base_estimate(), 12300.0);
}

#[test]
fn base_estimate_tracks_every_mutation() {
    let mut state = loaded("Birthday Party");
    let actions = vec![
        Action::AddItem {
            task: "Balloons".to_string(),
            cost: "450.5".to_string(),
        },
        Action::ToggleStatus("2".to_string()),
        Action::DeleteItem("4".to_string()),
        Action::AddItem {
            task: "Photo booth".to_string(),
            cost: "3,000".to_string(),
        },
        Action::DeleteItem("custom-1".to_string()),
        Action::ToggleStatus("6".to_string()),
        Action::SetExtraBudget("2000".to_string()),
        Action::DeleteItem("missing".to_string()),
        Action::AddItem {
            task: "Snacks".to_string(),
            cost: "".to_string(),
        },
    ];

    for (tick, action) in actions.into_iter().enumerate() {
        state = reduce_at(&state, action, tick as i64 + 1);
        assert_eq!(state.base_estimate(), live_sum(&state));
        assert_eq!(state.grand_total(), live_sum(&state) + state.extra_budget());
    }

    let plan = state.plan().unwrap();
    // 14000 + 450.5 - 3000 + 3 ("3,000" stops at the comma) - 450.5 (custom-1 was Balloons) + 0
    assert_eq!(state.base_estimate(), 11003.0);
    assert_eq!(state.grand_total(), 13003.0);
    assert_eq!(plan.item("2").unwrap().status, TodoStatus::Completed);
    assert_eq!(plan.item("6").unwrap().status, TodoStatus::Completed);
    assert_eq!(state.completed_count(), 2);
}
