//! Ordered best-effort fallback steps.

use std::fmt;
use std::future::Future;

use futures::future::BoxFuture;
use futures::FutureExt;
use serde::Serialize;

/// Where a counter value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Remote,
    LocalCache,
    Default,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Source::Remote => "remote",
            Source::LocalCache => "local_cache",
            Source::Default => "default",
        };
        f.write_str(name)
    }
}

/// Tagged outcome of one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepResult<T> {
    Success(T),
    Failure(String),
}

impl<T, E: fmt::Display> From<Result<T, E>> for StepResult<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => StepResult::Success(value),
            Err(e) => StepResult::Failure(e.to_string()),
        }
    }
}

/// A value and the step that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved<T> {
    pub value: T,
    pub source: Source,
}

/// Every step failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackExhausted {
    pub failures: Vec<(Source, String)>,
}

impl fmt::Display for FallbackExhausted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .failures
            .iter()
            .map(|(source, reason)| format!("{}: {}", source, reason))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for FallbackExhausted {}

/// Runs steps in order and returns the first success.
///
/// Steps are lazy: a step's future is only polled after every earlier step
/// reported [`StepResult::Failure`].
pub struct FallbackChain<'a, T> {
    steps: Vec<(Source, BoxFuture<'a, StepResult<T>>)>,
}

impl<'a, T: Send + 'a> FallbackChain<'a, T> {
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Appends a step.
    pub fn then<F>(mut self, source: Source, step: F) -> Self
    where
        F: Future<Output = StepResult<T>> + Send + 'a,
    {
        self.steps.push((source, step.boxed()));
        self
    }

    pub async fn run(self) -> Result<Resolved<T>, FallbackExhausted> {
        let mut failures = Vec::new();
        for (source, step) in self.steps {
            match step.await {
                StepResult::Success(value) => {
                    if !failures.is_empty() {
                        tracing::info!(source = %source, failed_steps = failures.len(), "Fell back");
                    }
                    return Ok(Resolved { value, source });
                }
                StepResult::Failure(reason) => {
                    tracing::warn!(source = %source, reason = %reason, "Fallback step failed");
                    failures.push((source, reason));
                }
            }
        }
        Err(FallbackExhausted { failures })
    }
}

impl<'a, T: Send + 'a> Default for FallbackChain<'a, T> {
    fn default() -> Self {
        Self::new()
    }
}
