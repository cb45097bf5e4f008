//! Per-attempt state machine.
//!
//! ```text
//! Start -> Planning -> PlanValidated -> Rendering -> SvgExtracted
//!       -> Normalized -> Validated
//! ```
//!
//! Any non-terminal state may move to `Failed(stage)` instead. `Validated`
//! and `Failed` are terminal. The recorded trail is exposed in the debug
//! block and logs; it never drives control flow.

use serde::Serialize;
use tracing::warn;

use super::{Pipeline, PipelineError, Stage};
use crate::planner::PlanRequest;
use crate::repair::strip_fences;
use crate::svg;
use crate::trace::{PlannerTrace, RendererTrace};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttemptState {
    Start,
    Planning,
    PlanValidated,
    Rendering,
    SvgExtracted,
    Normalized,
    Validated,
    Failed(Stage),
}

impl AttemptState {
    /// Next state on the success path, `None` once terminal.
    #[must_use]
    pub fn successor(self) -> Option<Self> {
        match self {
            Self::Start => Some(Self::Planning),
            Self::Planning => Some(Self::PlanValidated),
            Self::PlanValidated => Some(Self::Rendering),
            Self::Rendering => Some(Self::SvgExtracted),
            Self::SvgExtracted => Some(Self::Normalized),
            Self::Normalized => Some(Self::Validated),
            Self::Validated | Self::Failed(_) => None,
        }
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        self.successor().is_none()
    }
}

/// Trail of one attempt, numbered from 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Attempt {
    pub number: u32,
    pub states: Vec<AttemptState>,
}

impl Attempt {
    #[must_use]
    pub fn begin(number: u32) -> Self {
        Self { number, states: vec![AttemptState::Start] }
    }

    #[must_use]
    pub fn current(&self) -> AttemptState {
        self.states.last().copied().unwrap_or(AttemptState::Start)
    }

    /// Step along the success path. No-op once terminal.
    pub fn advance(&mut self) -> AttemptState {
        if let Some(next) = self.current().successor() {
            self.states.push(next);
        }
        self.current()
    }

    /// Enter `Failed(stage)`. No-op once terminal.
    pub fn fail(&mut self, stage: Stage) {
        if !self.current().is_terminal() {
            self.states.push(AttemptState::Failed(stage));
        }
    }

    #[must_use]
    pub fn failed_stage(&self) -> Option<Stage> {
        match self.current() {
            AttemptState::Failed(stage) => Some(stage),
            _ => None,
        }
    }
}

// =============================================================================
// RUNNER
// =============================================================================

/// Everything one accepted attempt produced.
#[derive(Debug)]
pub struct AttemptOutput {
    pub svg: String,
    pub planner: PlannerTrace,
    pub generator: RendererTrace,
    pub attempt: Attempt,
}

/// A failed attempt: its trail and the error that ended it.
#[derive(Debug)]
pub struct AttemptFailure {
    pub attempt: Attempt,
    pub error: PipelineError,
}

impl Pipeline {
    /// One plan, render, normalize, validate cycle. Transforms are kept.
    pub(crate) async fn run_attempt(
        &self,
        request: PlanRequest<'_>,
        original: Option<&str>,
        fallback_grid: u32,
        number: u32,
    ) -> Result<AttemptOutput, AttemptFailure> {
        let mut attempt = Attempt::begin(number);
        match self.attempt_stages(&request, original, fallback_grid, &mut attempt).await {
            Ok((svg, planner, generator)) => Ok(AttemptOutput { svg, planner, generator, attempt }),
            Err(error) => {
                attempt.fail(error.stage());
                warn!(
                    attempt = number,
                    mode = %request.mode(),
                    stage = %error.stage(),
                    error = %error,
                    "pipeline: attempt failed"
                );
                Err(AttemptFailure { attempt, error })
            }
        }
    }

    async fn attempt_stages(
        &self,
        request: &PlanRequest<'_>,
        original: Option<&str>,
        fallback_grid: u32,
        attempt: &mut Attempt,
    ) -> Result<(String, PlannerTrace, RendererTrace), PipelineError> {
        attempt.advance();
        let (plan, planner) = self.planner.plan(request).await?;
        attempt.advance();

        attempt.advance();
        let (raw_svg, generator) = self.renderer.render(&plan, original).await?;
        attempt.advance();

        let svg = svg::normalize(&strip_fences(&raw_svg), fallback_grid, false)?;
        attempt.advance();

        svg::validate(&svg)?;
        attempt.advance();

        Ok((svg, planner, generator))
    }
}

#[cfg(test)]
#[path = "attempt_test.rs"]
mod tests;
