//! Plan source backed by the canned mock plan.

use std::time::Duration;

use async_trait::async_trait;

use super::trait_def::PlanSource;
use super::types::{PlanRequest, SourceError};
use crate::plan::{EventPlan, mock_plan};

/// Always succeeds with [`mock_plan`], optionally after a fixed delay.
#[derive(Debug, Clone, Default)]
pub struct MockSource {
    delay: Duration,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait `delay` before answering, to mimic a slow model.
    pub fn with_delay(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl PlanSource for MockSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, request: &PlanRequest) -> Result<EventPlan, SourceError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(mock_plan(&request.event_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_source_ignores_budget() {
        let source = MockSource::new();
        let with = source
            .generate(&PlanRequest::new("Birthday Party", Some(900.0)))
            .await
            .unwrap();
        let without = source
            .generate(&PlanRequest::new("Birthday Party", None))
            .await
            .unwrap();
        assert_eq!(with, without);
        assert_eq!(with.total_budget, 14000.0);
    }

    #[tokio::test(start_paused = true)]
    async fn mock_source_honours_delay() {
        let source = MockSource::with_delay(Duration::from_millis(1500));
        let start = tokio::time::Instant::now();
        source
            .generate(&PlanRequest::new("New Year", None))
            .await
            .unwrap();
        assert!(start.elapsed() >= Duration::from_millis(1500));
    }
}
