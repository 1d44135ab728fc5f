//! Prompt construction for plan generation.
//!
//! Pure string assembly; the model call itself lives in
//! [`crate::source::gemini`].

use super::money::CURRENCY_SYMBOL;

/// Checklist rules the model must follow.
const REQUIREMENTS: &str = "Requirements:
- Generate 5-7 specific, chronological steps.
- Create a checklist of 5-8 items with realistic costs.
- Ensure 'totalBudget' is the sum of checklist items.
- 'status' must be 'pending'.
- 'expandedDetails': Provide a paragraph of extra tips, theme ideas, or logistic advice.
";

/// Build the generation prompt for `event_type`.
///
/// A budget, when given, is stated as the target; otherwise the model is
/// asked to estimate one in INR.
pub fn build_prompt(event_type: &str, budget: Option<f64>) -> String {
    let mut prompt = String::with_capacity(512);

    prompt.push_str(&format!(
        "You are an expert event planner. Create a detailed event plan for a \"{event_type}\".\n"
    ));

    match budget {
        Some(b) => prompt.push_str(&format!(
            "The user has a budget of {CURRENCY_SYMBOL}{b}.\n"
        )),
        None => prompt.push_str("Estimate a reasonable budget in INR.\n"),
    }

    prompt.push('\n');
    prompt.push_str(REQUIREMENTS);
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_quotes_event_type() {
        let prompt = build_prompt("Baby Shower", None);
        assert!(prompt.contains("event plan for a \"Baby Shower\""));
    }

    #[test]
    fn prompt_states_budget_target() {
        let prompt = build_prompt("Farewell", Some(5000.0));
        assert!(prompt.contains("The user has a budget of ₹5000."));
        assert!(!prompt.contains("Estimate a reasonable budget"));
    }

    #[test]
    fn prompt_keeps_fractional_budget() {
        let prompt = build_prompt("Farewell", Some(2500.5));
        assert!(prompt.contains("₹2500.5."));
    }

    #[test]
    fn prompt_asks_for_estimate_without_budget() {
        let prompt = build_prompt("Farewell", None);
        assert!(prompt.contains("Estimate a reasonable budget in INR."));
        assert!(!prompt.contains("The user has a budget"));
    }

    #[test]
    fn prompt_lists_requirements() {
        let prompt = build_prompt("New Year", None);
        assert!(prompt.contains("5-7 specific, chronological steps"));
        assert!(prompt.contains("5-8 items with realistic costs"));
        assert!(prompt.contains("'totalBudget' is the sum of checklist items"));
        assert!(prompt.contains("'status' must be 'pending'"));
        assert!(prompt.contains("'expandedDetails'"));
    }
}
