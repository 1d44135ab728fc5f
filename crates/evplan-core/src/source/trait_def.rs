//! The `PlanSource` trait -- anything that can turn a request into a plan.
//!
//! Each concrete source (Gemini, the canned mock) implements this trait.
//! The trait is object-safe so sources can be stored as
//! `Box<dyn PlanSource>` in a [`super::FallbackChain`].

use async_trait::async_trait;

use super::types::{PlanRequest, SourceError};
use crate::plan::EventPlan;

/// Producer of event plans.
///
/// Implementors must not retry internally; the chain decides what happens
/// after a failure.
#[async_trait]
pub trait PlanSource: Send + Sync {
    /// Short name used in logs (e.g. "gemini").
    fn name(&self) -> &str;

    /// Produce a plan for `request`.
    async fn generate(&self, request: &PlanRequest) -> Result<EventPlan, SourceError>;
}

// Compile-time assertion: PlanSource must be object-safe.
const _: () = {
    fn _assert_object_safe(_: &dyn PlanSource) {}
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::mock_plan;

    struct EchoSource;

    #[async_trait]
    impl PlanSource for EchoSource {
        fn name(&self) -> &str {
            "echo"
        }

        async fn generate(&self, request: &PlanRequest) -> Result<EventPlan, SourceError> {
            Ok(mock_plan(&request.event_type))
        }
    }

    #[test]
    fn plan_source_is_object_safe() {
        let source: Box<dyn PlanSource> = Box::new(EchoSource);
        assert_eq!(source.name(), "echo");
    }

    #[tokio::test]
    async fn boxed_source_generates() {
        let source: Box<dyn PlanSource> = Box::new(EchoSource);
        let plan = source
            .generate(&PlanRequest::new("Farewell", None))
            .await
            .unwrap();
        assert_eq!(plan.event_type, "Farewell");
    }
}
