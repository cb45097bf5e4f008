//! Mutate flow: canonicalize the caller's icon, then bounded retry.

use serde::Serialize;
use tracing::{info, warn};

use super::attempt::Attempt;
use super::request::MutateRequest;
use super::retry::{RetryOutcome, RetryPolicy};
use super::{Pipeline, PipelineError};
use crate::planner::PlanRequest;
use crate::svg::{self, DEFAULT_GRID};
use crate::trace::{PlannerTrace, RendererTrace};

#[derive(Debug, Serialize)]
pub struct MutateResponse {
    pub svg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<MutateDebug>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MutateDebug {
    pub provider: String,
    pub model: String,
    pub planner: PlannerTrace,
    pub generator: RendererTrace,
    pub normalized_svg: String,
    /// Every attempt made, failed ones first.
    pub attempts: Vec<Attempt>,
}

impl Pipeline {
    /// Edit the caller's icon, retrying the whole cycle on any failure.
    ///
    /// The original SVG is normalized and validated before the first
    /// attempt; the normalized form is what the planner and renderer see.
    ///
    /// # Errors
    ///
    /// [`PipelineError::InvalidInput`] for a bad request or an unacceptable
    /// original SVG, the last attempt's error once attempts run out, or
    /// [`PipelineError::Timeout`].
    pub async fn mutate(&self, request: &MutateRequest) -> Result<MutateResponse, PipelineError> {
        request.validate()?;
        let original = canonical_original(&request.svg)?;
        info!(input_len = request.user_input.len(), original_len = original.len(), "pipeline: mutate");
        self.within_deadline(self.mutate_with_retry(request.user_input.trim(), &original))
            .await
    }

    async fn mutate_with_retry(&self, user_input: &str, original: &str) -> Result<MutateResponse, PipelineError> {
        let policy = RetryPolicy::new(self.config.mutate_max_attempts);
        info!(max_attempts = policy.max_attempts(), "pipeline: mutate retry policy");
        let outcome = policy
            .run(move |number| async move {
                let request = PlanRequest::Mutate { user_input, original_svg: original };
                self.run_attempt(request, Some(original), DEFAULT_GRID, number).await
            })
            .await;

        let attempts = outcome.attempts();
        match outcome {
            RetryOutcome::Succeeded { value, failures, .. } => {
                info!(attempts, "pipeline: mutation accepted");
                let debug = self.config.debug.then(|| {
                    let (provider, model) = self.identity();
                    let mut attempts: Vec<Attempt> = failures.into_iter().map(|f| f.attempt).collect();
                    attempts.push(value.attempt);
                    MutateDebug {
                        provider,
                        model,
                        planner: value.planner,
                        generator: value.generator,
                        normalized_svg: value.svg.clone(),
                        attempts,
                    }
                });
                Ok(MutateResponse { svg: value.svg, debug })
            }
            RetryOutcome::Exhausted { last, failures } => {
                let earlier: Vec<_> = failures.iter().filter_map(|f| f.attempt.failed_stage()).collect();
                warn!(
                    attempts,
                    stage = ?last.attempt.failed_stage(),
                    earlier_stages = ?earlier,
                    error = %last.error,
                    "pipeline: mutation attempts exhausted"
                );
                Err(last.error)
            }
        }
    }
}

/// Normalize and validate the caller's icon. Transforms are kept.
fn canonical_original(raw: &str) -> Result<String, PipelineError> {
    let normalized = svg::normalize(raw.trim(), DEFAULT_GRID, false)
        .and_then(|svg| svg::validate(&svg).map(|()| svg))
        .map_err(|e| PipelineError::InvalidInput(format!("original svg: {e}")))?;
    Ok(normalized)
}

#[cfg(test)]
#[path = "mutate_test.rs"]
mod tests;
