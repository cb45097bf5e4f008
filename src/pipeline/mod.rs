//! Pipeline: plan, render, normalize, validate.
//!
//! DESIGN
//! ======
//! [`Pipeline`] owns one planner and one renderer sharing a backend handle,
//! plus the tuning from [`PipelineConfig`]. It holds no per-request state, so
//! one instance serves every request.
//!
//! Three flows sit on top of the shared attempt runner:
//! - create: three variants, one attempt each, any failure aborts;
//! - mutate: the caller's SVG is canonicalized first, then up to
//!   `mutate_max_attempts` attempts, the last failure is reported;
//! - direct: one backend call straight to markup, no plan.
//!
//! Every flow runs under the end-to-end deadline. Variants and attempts are
//! strictly sequential.
//!
//! ERROR HANDLING
//! ==============
//! Component errors convert into [`PipelineError`] via `From`, and every
//! variant maps to a [`Stage`] tag used in logs, attempt trails and the HTTP
//! error body.

pub mod attempt;
pub mod config;
pub mod create;
pub mod direct;
pub mod mutate;
pub mod request;
pub mod retry;

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use serde::Serialize;

use crate::error::ErrorCode;
use crate::llm::LlmBackend;
use crate::llm::types::LlmError;
use crate::plan::PlanError;
use crate::planner::Planner;
use crate::renderer::{ExtractError, Renderer};
use crate::svg::SvgError;

pub use config::PipelineConfig;

// =============================================================================
// STAGE
// =============================================================================

/// Where a request or attempt failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    Input,
    Unavailable,
    Backend,
    PlanningSchema,
    RenderExtraction,
    XmlParse,
    Structural,
    Timeout,
}

impl Stage {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Unavailable => "unavailable",
            Self::Backend => "backend",
            Self::PlanningSchema => "planning-schema",
            Self::RenderExtraction => "render-extraction",
            Self::XmlParse => "xml-parse",
            Self::Structural => "structural",
            Self::Timeout => "timeout",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("invalid request: {0}")]
    InvalidInput(String),
    #[error("model backend not configured")]
    Unavailable,
    #[error("model backend failed: {0}")]
    Backend(#[from] LlmError),
    #[error("plan rejected: {0}")]
    PlanSchema(#[from] PlanError),
    #[error("rendered output rejected: {0}")]
    Extraction(#[from] ExtractError),
    #[error("svg rejected: {0}")]
    Document(#[from] SvgError),
    #[error("request exceeded its {after_ms}ms deadline")]
    Timeout { after_ms: u64 },
}

impl PipelineError {
    #[must_use]
    pub fn stage(&self) -> Stage {
        match self {
            Self::InvalidInput(_) => Stage::Input,
            Self::Unavailable => Stage::Unavailable,
            Self::Backend(_) => Stage::Backend,
            Self::PlanSchema(_) => Stage::PlanningSchema,
            Self::Extraction(_) => Stage::RenderExtraction,
            Self::Document(e) => e.stage(),
            Self::Timeout { .. } => Stage::Timeout,
        }
    }
}

impl ErrorCode for PipelineError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "E_INVALID_INPUT",
            Self::Unavailable => "E_LLM_NOT_CONFIGURED",
            Self::Backend(e) => e.error_code(),
            Self::PlanSchema(e) => e.error_code(),
            Self::Extraction(e) => e.error_code(),
            Self::Document(e) => e.error_code(),
            Self::Timeout { .. } => "E_PIPELINE_TIMEOUT",
        }
    }

    fn retryable(&self) -> bool {
        match self {
            Self::InvalidInput(_) | Self::Unavailable => false,
            Self::Backend(e) => e.retryable(),
            Self::PlanSchema(_) | Self::Extraction(_) | Self::Document(_) | Self::Timeout { .. } => true,
        }
    }
}

// =============================================================================
// PIPELINE
// =============================================================================

pub struct Pipeline {
    llm: Arc<dyn LlmBackend>,
    planner: Planner,
    renderer: Renderer,
    config: PipelineConfig,
}

impl Pipeline {
    #[must_use]
    pub fn new(llm: Arc<dyn LlmBackend>, config: PipelineConfig) -> Self {
        Self {
            planner: Planner::new(Arc::clone(&llm), &config),
            renderer: Renderer::new(Arc::clone(&llm), &config),
            llm,
            config,
        }
    }

    fn identity(&self) -> (String, String) {
        (self.llm.provider().to_string(), self.llm.model().to_string())
    }

    /// Run `flow` under the end-to-end deadline.
    async fn within_deadline<T>(&self, flow: impl Future<Output = Result<T, PipelineError>>) -> Result<T, PipelineError> {
        let deadline = self.config.request_timeout;
        tokio::time::timeout(deadline, flow)
            .await
            .unwrap_or_else(|_| Err(PipelineError::Timeout { after_ms: u64::try_from(deadline.as_millis()).unwrap_or(u64::MAX) }))
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
