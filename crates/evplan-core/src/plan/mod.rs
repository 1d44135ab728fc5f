//! Event plan schema, canned fallback plan, prompt construction, parsing.

pub mod mock;
pub mod model;
pub mod money;
pub mod parser;
pub mod prompt;

pub use mock::mock_plan;
pub use model::{EventPlan, TodoItem, TodoStatus, TodoStatusParseError};
pub use money::{CURRENCY_CODE, CURRENCY_SYMBOL, format_inr, parse_amount_lenient};
pub use parser::{PlanParseError, parse_plan_json};
pub use prompt::build_prompt;
