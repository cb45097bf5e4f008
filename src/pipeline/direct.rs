//! Direct flow: one backend call straight to markup, no plan.
//!
//! The reply has not been through renderer extraction, so only fences are
//! stripped before the normalizer and validator decide.

use serde::Serialize;
use tracing::info;

use super::request::DirectRequest;
use super::{Pipeline, PipelineError};
use crate::svg::{self, DEFAULT_GRID};
use crate::trace::RendererTrace;

#[derive(Debug, Serialize)]
pub struct DirectResponse {
    pub svg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<DirectDebug>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectDebug {
    pub provider: String,
    pub model: String,
    pub generator: RendererTrace,
    pub normalized_svg: String,
}

impl Pipeline {
    /// Single attempt, same error taxonomy as the planned flows.
    ///
    /// # Errors
    ///
    /// [`PipelineError::InvalidInput`] before any backend call, otherwise the
    /// backend, document or timeout failure.
    pub async fn direct(&self, request: &DirectRequest) -> Result<DirectResponse, PipelineError> {
        request.validate()?;
        info!(prompt_len = request.prompt.len(), "pipeline: direct");
        self.within_deadline(self.direct_once(request.prompt.trim()))
            .await
    }

    async fn direct_once(&self, prompt: &str) -> Result<DirectResponse, PipelineError> {
        let (cleaned, generator) = self.renderer.render_direct(prompt).await?;
        let normalized = svg::normalize(&cleaned, DEFAULT_GRID, false)?;
        svg::validate(&normalized)?;
        info!(svg_len = normalized.len(), "pipeline: direct svg accepted");

        let debug = self.config.debug.then(|| {
            let (provider, model) = self.identity();
            DirectDebug { provider, model, generator, normalized_svg: normalized.clone() }
        });
        Ok(DirectResponse { svg: normalized, debug })
    }
}

#[cfg(test)]
#[path = "direct_test.rs"]
mod tests;
