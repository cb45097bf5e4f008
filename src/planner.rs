//! Planner: request to validated plan via one backend call.
//!
//! DESIGN
//! ======
//! The user message is a JSON payload naming the mode, the free-text input
//! and the constraints or original document. The reply goes through fence
//! stripping and JSON recovery from [`crate::repair`], then the strict schema
//! gate in [`crate::plan`]. A plan whose mode differs from the requested one
//! is rejected.
//!
//! Nothing is retried here; retry policy belongs to the orchestrator.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};
use tracing::info;

use crate::llm::{self, LlmBackend};
use crate::pipeline::request::BrandConstraints;
use crate::pipeline::{PipelineConfig, PipelineError};
use crate::plan::{Plan, PlanError, PlanMode};
use crate::repair::{recover_json, strip_fences};
use crate::trace::{LOG_SNAPSHOT_LIMIT, PlannerTrace, compact_json, truncate_text};

pub const PLANNER_SYSTEM_PROMPT: &str = r#"You are a strict SVG icon planning engine.

Return exactly ONE JSON object. No markdown, no explanation, no prose.

Schema:
{
  "mode": "create" | "mutate",
  "description": string,
  "elements": [
    { "type": string, "role": string, "position": string, "relationship": string }
  ],
  "style": { "grid": number, "strokeWidth": number, "outline": boolean, "symmetry": string },
  "mutationIntent": string,
  "target": string,
  "replacement": string
}

Rules:
- Echo the request's "mode".
- Always include "description".
- mode "create": include elements (at least one) and style. Take grid and strokeWidth from brandConstraints; outline is true when the brand style is "outline".
- mode "mutate": include mutationIntent and target. Name the element of the original SVG that changes.
- Never return null values or an empty object.
- If the request is unclear, make a reasonable design assumption."#;

const CREATE_INSTRUCTION: &str = "Create a distinct icon concept for this variant index.";
const MUTATE_INSTRUCTION: &str = "Plan a structural mutation as strict JSON for downstream SVG generation.";

/// What the planner is asked to plan.
#[derive(Debug, Clone, Copy)]
pub enum PlanRequest<'a> {
    Create {
        prompt: &'a str,
        constraints: &'a BrandConstraints,
        /// One-based variant slot, a hint to differentiate concepts.
        variant_index: usize,
    },
    Mutate {
        user_input: &'a str,
        original_svg: &'a str,
    },
}

impl PlanRequest<'_> {
    #[must_use]
    pub fn mode(&self) -> PlanMode {
        match self {
            Self::Create { .. } => PlanMode::Create,
            Self::Mutate { .. } => PlanMode::Mutate,
        }
    }

    /// JSON user message sent to the backend.
    #[must_use]
    pub fn payload(&self) -> Value {
        match self {
            Self::Create { prompt, constraints, variant_index } => json!({
                "mode": PlanMode::Create.as_str(),
                "prompt": prompt,
                "brandConstraints": constraints,
                "variantIndex": variant_index,
                "instruction": CREATE_INSTRUCTION,
            }),
            Self::Mutate { user_input, original_svg } => json!({
                "mode": PlanMode::Mutate.as_str(),
                "userInput": user_input,
                "originalSvg": original_svg,
                "instruction": MUTATE_INSTRUCTION,
            }),
        }
    }
}

pub struct Planner {
    llm: Arc<dyn LlmBackend>,
    temperature: f32,
    max_tokens: u32,
    timeout: Duration,
}

impl Planner {
    #[must_use]
    pub fn new(llm: Arc<dyn LlmBackend>, config: &PipelineConfig) -> Self {
        Self {
            llm,
            temperature: config.planner_temperature,
            max_tokens: config.max_tokens,
            timeout: config.planner_timeout,
        }
    }

    /// Ask the backend for a plan and hold it to the schema.
    ///
    /// # Errors
    ///
    /// [`PipelineError::Backend`] when the call fails, times out or is
    /// truncated; [`PipelineError::PlanSchema`] when the reply is not a JSON
    /// object, breaks the schema, or plans the wrong mode.
    pub async fn plan(&self, request: &PlanRequest<'_>) -> Result<(Plan, PlannerTrace), PipelineError> {
        let payload = request.payload();
        let user = payload.to_string();
        info!(mode = %request.mode(), user = %truncate_text(&user, 2000), "planner: request");

        let raw = llm::generate_text(
            self.llm.as_ref(),
            PLANNER_SYSTEM_PROMPT,
            &user,
            self.temperature,
            self.max_tokens,
            self.timeout,
        )
        .await?;
        info!(raw = %truncate_text(&raw, LOG_SNAPSHOT_LIMIT), "planner: response");

        let cleaned = strip_fences(&raw);
        let parsed = recover_json(&cleaned).ok_or(PlanError::NotJson)?;
        let plan = Plan::from_value(&parsed)?;
        if plan.mode() != request.mode() {
            return Err(PlanError::ModeMismatch { expected: request.mode(), found: plan.mode() }.into());
        }
        info!(plan = %compact_json(&parsed, LOG_SNAPSHOT_LIMIT), "planner: plan accepted");

        Ok((plan, PlannerTrace { request: payload, raw_response: raw, cleaned, parsed }))
    }
}

#[cfg(test)]
#[path = "planner_test.rs"]
mod tests;
