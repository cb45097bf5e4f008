//! Renderer: validated plan to raw SVG markup via one backend call.
//!
//! DESIGN
//! ======
//! The user message is `{"plan": ..., "originalSvg"?: ...}`; an original
//! document marks an edit. The reply is fence-stripped and then cut down to
//! exactly one `<svg ...>...</svg>` span. Extraction never guesses: zero
//! roots, an unterminated root and several roots are distinct errors.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Map, Value, json};
use tracing::info;

use crate::llm::{self, LlmBackend};
use crate::pipeline::{PipelineConfig, PipelineError};
use crate::plan::Plan;
use crate::repair::strip_fences;
use crate::trace::{LOG_SNAPSHOT_LIMIT, RendererTrace, compact_json, truncate_text};

pub const RENDERER_SYSTEM_PROMPT: &str = "You are a professional SVG icon generator.

Return ONLY one complete SVG document. No markdown, no explanation.

Rules:
- The root element is <svg> with xmlns=\"http://www.w3.org/2000/svg\".
- Declare a viewBox matching the plan's grid.
- When an original SVG is given, keep its viewBox, width and height and every element the plan does not change.
- Keep all coordinates inside the viewBox, with at most 2 decimals.
- Use minimal geometry: 2-4 elements unless the plan needs more.
- Use presentation attributes (fill, stroke, stroke-width). Never use style attributes.
- Keep stroke width consistent with the plan.
- No comments, no text labels, no filters, gradients or animation.

Output valid XML only.";

pub const DIRECT_SYSTEM_PROMPT: &str = "You are a professional SVG icon generator.

Draw the icon the user describes. Return ONLY one complete SVG document on a 24x24 grid with xmlns=\"http://www.w3.org/2000/svg\" and viewBox=\"0 0 24 24\". No markdown, no explanation, no style attributes, no comments.";

const SVG_OPEN: &str = "<svg";
const SVG_CLOSE: &str = "</svg>";

// =============================================================================
// EXTRACTION
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    #[error("model output contains no <svg> root")]
    NoSvg,
    #[error("model output opens <svg> but never closes it (likely truncated by the token limit)")]
    Truncated,
    #[error("model output contains {0} <svg> roots")]
    MultipleRoots(usize),
}

impl crate::error::ErrorCode for ExtractError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NoSvg => "E_NO_SVG",
            Self::Truncated => "E_SVG_TRUNCATED",
            Self::MultipleRoots(_) => "E_MULTIPLE_SVG_ROOTS",
        }
    }
}

/// Cut the single SVG document out of raw model text.
///
/// Takes the span from the first `<svg` to the last `</svg>` inclusive,
/// trimmed.
///
/// # Errors
///
/// [`ExtractError::NoSvg`] without any `<svg`, [`ExtractError::Truncated`]
/// when no `</svg>` follows it, [`ExtractError::MultipleRoots`] when the span
/// opens more than one `<svg`.
pub fn extract_single_svg(raw: &str) -> Result<String, ExtractError> {
    let cleaned = strip_fences(raw);
    let start = cleaned.find(SVG_OPEN).ok_or(ExtractError::NoSvg)?;
    let close = cleaned
        .rfind(SVG_CLOSE)
        .filter(|&close| close > start)
        .ok_or(ExtractError::Truncated)?;

    let span = &cleaned[start..close + SVG_CLOSE.len()];
    let roots = span.matches(SVG_OPEN).count();
    if roots > 1 {
        return Err(ExtractError::MultipleRoots(roots));
    }
    Ok(span.trim().to_string())
}

// =============================================================================
// RENDERER
// =============================================================================

pub struct Renderer {
    llm: Arc<dyn LlmBackend>,
    temperature: f32,
    max_tokens: u32,
    timeout: Duration,
}

impl Renderer {
    #[must_use]
    pub fn new(llm: Arc<dyn LlmBackend>, config: &PipelineConfig) -> Self {
        Self {
            llm,
            temperature: config.renderer_temperature,
            max_tokens: config.max_tokens,
            timeout: config.renderer_timeout,
        }
    }

    /// Render `plan`, editing `original` when given.
    ///
    /// # Errors
    ///
    /// [`PipelineError::Backend`] when the call fails, times out or is
    /// truncated; [`PipelineError::Extraction`] when the reply does not hold
    /// exactly one complete SVG root.
    pub async fn render(&self, plan: &Plan, original: Option<&str>) -> Result<(String, RendererTrace), PipelineError> {
        let mut payload = Map::new();
        payload.insert("plan".into(), plan.to_value());
        if let Some(original) = original {
            payload.insert("originalSvg".into(), Value::String(original.to_string()));
        }
        let payload = Value::Object(payload);

        let raw = self.call(RENDERER_SYSTEM_PROMPT, &payload).await?;
        let extracted = extract_single_svg(&raw)?;
        info!(svg = %truncate_text(&extracted, LOG_SNAPSHOT_LIMIT), "renderer: svg extracted");

        Ok((extracted.clone(), RendererTrace { request: payload, raw_response: raw, extracted }))
    }

    /// Single-shot markup straight from a prompt, without a plan. Only fences
    /// are stripped; acceptance is left to the normalizer and validator.
    ///
    /// # Errors
    ///
    /// [`PipelineError::Backend`] when the call fails, times out or is
    /// truncated.
    pub async fn render_direct(&self, prompt: &str) -> Result<(String, RendererTrace), PipelineError> {
        let payload = json!({ "task": "direct", "prompt": prompt });
        let raw = self.call(DIRECT_SYSTEM_PROMPT, &payload).await?;
        let cleaned = strip_fences(&raw);
        Ok((cleaned.clone(), RendererTrace { request: payload, raw_response: raw, extracted: cleaned }))
    }

    async fn call(&self, system: &str, payload: &Value) -> Result<String, PipelineError> {
        info!(payload = %compact_json(payload, LOG_SNAPSHOT_LIMIT), "renderer: request");
        let raw = llm::generate_text(
            self.llm.as_ref(),
            system,
            &payload.to_string(),
            self.temperature,
            self.max_tokens,
            self.timeout,
        )
        .await?;
        info!(raw = %truncate_text(&raw, LOG_SNAPSHOT_LIMIT), "renderer: response");
        Ok(raw)
    }
}

#[cfg(test)]
#[path = "renderer_test.rs"]
mod tests;
