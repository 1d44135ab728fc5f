//! Fallback chain -- an ordered list of plan sources, first success wins.
//!
//! The production chain is `[gemini, mock]`. Because the mock never fails,
//! callers of that chain always get a plan; a model outage only shows up as
//! a less personalised result.

use std::time::Duration;

use thiserror::Error;
use tracing::{info, warn};

use super::gemini::{GeminiConfig, GeminiSource};
use super::mock::MockSource;
use super::trait_def::PlanSource;
use super::types::{PlanRequest, SourceError};
use crate::plan::EventPlan;

/// A plan together with the name of the source that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedPlan {
    pub plan: EventPlan,
    pub source: String,
}

/// Every source in the chain failed (or the chain was empty).
#[derive(Debug, Error)]
pub enum ChainError {
    #[error("no plan sources configured")]
    NoSources,

    #[error("all plan sources failed: {}", summarize(.0))]
    Exhausted(Vec<(String, SourceError)>),
}

fn summarize(failures: &[(String, SourceError)]) -> String {
    failures
        .iter()
        .map(|(name, err)| format!("{name}: {err}"))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Ordered collection of [`PlanSource`]s.
///
/// # Example
///
/// ```ignore
/// let chain = FallbackChain::new()
///     .with(GeminiSource::new(config)?)
///     .with(MockSource::new());
/// let generated = chain.generate(&request).await?;
/// ```
#[derive(Default)]
pub struct FallbackChain {
    sources: Vec<Box<dyn PlanSource>>,
}

impl FallbackChain {
    /// Create an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// The `[gemini, mock]` chain used by the server and the CLI.
    pub fn production(gemini: GeminiConfig, mock_delay: Duration) -> Result<Self, SourceError> {
        Ok(Self::new()
            .with(GeminiSource::new(gemini)?)
            .with(MockSource::with_delay(mock_delay)))
    }

    /// Chain containing only the mock source, for offline use.
    pub fn offline(mock_delay: Duration) -> Self {
        Self::new().with(MockSource::with_delay(mock_delay))
    }

    /// Append a source; it is tried after every source already present.
    pub fn push(&mut self, source: impl PlanSource + 'static) {
        self.sources.push(Box::new(source));
    }

    /// Builder form of [`FallbackChain::push`].
    pub fn with(mut self, source: impl PlanSource + 'static) -> Self {
        self.push(source);
        self
    }

    /// Source names in the order they are tried.
    pub fn names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Try each source in order and return the first plan produced.
    pub async fn generate(&self, request: &PlanRequest) -> Result<GeneratedPlan, ChainError> {
        if self.sources.is_empty() {
            return Err(ChainError::NoSources);
        }

        let mut failures = Vec::new();
        for source in &self.sources {
            match source.generate(request).await {
                Ok(plan) => {
                    if !failures.is_empty() {
                        info!(
                            source = source.name(),
                            failed = failures.len(),
                            "plan produced by fallback source"
                        );
                    }
                    return Ok(GeneratedPlan {
                        plan,
                        source: source.name().to_string(),
                    });
                }
                Err(err) => {
                    warn!(
                        source = source.name(),
                        error = %err,
                        "plan source failed, trying next"
                    );
                    failures.push((source.name().to_string(), err));
                }
            }
        }

        Err(ChainError::Exhausted(failures))
    }
}

impl std::fmt::Debug for FallbackChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FallbackChain")
            .field("sources", &self.names())
            .finish()
    }
}
