//! Deterministic stub backend.
//!
//! Lets the whole pipeline run without a live model. The user prompt is the
//! JSON payload built by the planner or renderer:
//! - a payload with a `plan` key (or `"task": "direct"`) is a rendering
//!   request and gets a minimal valid SVG sized to the plan's grid;
//! - a payload with a `mode` key is a planning request and gets a minimal
//!   plan for that mode;
//! - anything else gets `{}`.

use serde_json::{Value, json};

use super::types::{Completion, LlmError, StopReason};

const MOCK_MODEL: &str = "mock";
const DEFAULT_GRID: u64 = 24;
const DEFAULT_STROKE_WIDTH: f64 = 2.0;

#[derive(Debug, Default, Clone, Copy)]
pub struct MockClient;

impl MockClient {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    #[allow(clippy::unused_async)]
    pub async fn generate(&self, _system: &str, user: &str) -> Result<Completion, LlmError> {
        let text = respond(user);
        Ok(Completion {
            output_tokens: u64::try_from(text.len()).unwrap_or(u64::MAX),
            input_tokens: u64::try_from(user.len()).unwrap_or(u64::MAX),
            text,
            model: MOCK_MODEL.to_string(),
            stop_reason: StopReason::EndTurn,
        })
    }
}

/// Build the canned response for one user payload.
pub(crate) fn respond(user: &str) -> String {
    let Ok(payload) = serde_json::from_str::<Value>(user) else {
        return "{}".to_string();
    };

    if let Some(plan) = payload.get("plan") {
        let grid = plan
            .get("style")
            .and_then(|s| s.get("grid"))
            .and_then(Value::as_u64)
            .unwrap_or(DEFAULT_GRID);
        return minimal_svg(grid);
    }
    if payload.get("task").and_then(Value::as_str) == Some("direct") {
        return minimal_svg(DEFAULT_GRID);
    }

    match payload.get("mode").and_then(Value::as_str) {
        Some("mutate") => mutate_plan().to_string(),
        Some(_) => create_plan(&payload).to_string(),
        None => "{}".to_string(),
    }
}

fn create_plan(payload: &Value) -> Value {
    let variant = payload
        .get("variantIndex")
        .and_then(Value::as_u64)
        .unwrap_or(1);
    let constraints = payload.get("brandConstraints");
    let grid = constraints
        .and_then(|c| c.get("grid"))
        .and_then(Value::as_u64)
        .unwrap_or(DEFAULT_GRID);
    let stroke_width = constraints
        .and_then(|c| c.get("strokeWidth"))
        .and_then(Value::as_f64)
        .unwrap_or(DEFAULT_STROKE_WIDTH);
    let outline = constraints
        .and_then(|c| c.get("style"))
        .and_then(Value::as_str)
        .map_or(true, |s| s == "outline");

    json!({
        "mode": "create",
        "description": format!("Mock generated plan variant {variant}"),
        "elements": [
            { "type": "path", "role": "glyph", "position": "center", "relationship": "standalone" }
        ],
        "style": { "grid": grid, "strokeWidth": stroke_width, "outline": outline }
    })
}

fn mutate_plan() -> Value {
    json!({
        "mode": "mutate",
        "description": "Mock structural mutation plan",
        "mutationIntent": "replaceShape",
        "target": "circle",
        "replacement": "heart"
    })
}

fn minimal_svg(grid: u64) -> String {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {grid} {grid}" width="{grid}" height="{grid}"><path d="M12 21s-7-4.35-7-10a4 4 0 0 1 7-2.2A4 4 0 0 1 19 11c0 5.65-7 10-7 10Z" fill="none" stroke="currentColor" stroke-width="2"/></svg>"#
    )
}

#[cfg(test)]
#[path = "mock_test.rs"]
mod tests;
