//! `evplan generate`: one-shot plan generation through the request handler.

use std::fmt::Write as _;

use anyhow::{Result, bail};
use serde_json::json;

use evplan_core::envelope::ApiResponse;
use evplan_core::plan::{EventPlan, TodoStatus, format_inr};
use evplan_core::service::PlanService;

/// Generate a plan for `event_type` and print it.
pub async fn run_generate(
    service: &PlanService,
    event_type: &str,
    budget: Option<f64>,
    as_json: bool,
) -> Result<()> {
    let mut body = json!({ "eventType": event_type });
    if let Some(b) = budget {
        body["budget"] = json!(b);
    }

    match service.handle(&body).await {
        Ok(plan) if as_json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&ApiResponse::success(plan))?
            );
            Ok(())
        }
        Ok(plan) => {
            print!("{}", render_plan(&plan));
            Ok(())
        }
        Err(err) if as_json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&ApiResponse::<EventPlan>::failure(err.to_string()))?
            );
            bail!("{err}")
        }
        Err(err) => bail!("{err}"),
    }
}

/// Human-readable rendition of a plan.
pub fn render_plan(plan: &EventPlan) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", plan.event_type);
    let _ = writeln!(out, "{}", plan.description);
    let _ = writeln!(out);

    let _ = writeln!(out, "Steps:");
    for (i, step) in plan.steps.iter().enumerate() {
        let _ = writeln!(out, "  {}. {step}", i + 1);
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "Checklist:");
    let width = plan
        .todo_list
        .iter()
        .map(|t| t.task.chars().count())
        .max()
        .unwrap_or(0);
    for item in &plan.todo_list {
        let mark = match item.status {
            TodoStatus::Pending => ' ',
            TodoStatus::Completed => 'x',
        };
        let _ = writeln!(
            out,
            "  [{mark}] {:<width$}  {}",
            item.task,
            format_inr(item.estimated_cost)
        );
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Estimated total: {}", format_inr(plan.checklist_total()));

    if let Some(details) = plan.expanded_details.as_deref().filter(|d| !d.is_empty()) {
        let _ = writeln!(out);
        let _ = writeln!(out, "{details}");
    }
    out
}
