//! Plan sources and the fallback chain that tries them in order.
//!
//! # Architecture
//!
//! ```text
//! PlanService
//!     |
//!     v
//! FallbackChain --generate(request)--> [gemini, mock]
//!     |                                   |
//!     |   first Ok(plan) wins ------------+
//!     |   each Err(SourceError) is logged and skipped
//!     v
//! GeneratedPlan { plan, source }
//! ```

pub mod chain;
pub mod gemini;
pub mod mock;
pub mod trait_def;
pub mod types;

pub use chain::{ChainError, FallbackChain, GeneratedPlan};
pub use gemini::{GeminiConfig, GeminiSource};
pub use mock::MockSource;
pub use trait_def::PlanSource;
pub use types::{PlanRequest, SourceError};
