//! Diagnostic traces and log snapshots.
//!
//! Traces capture what each stage sent and received so the optional debug
//! block can show it. They never drive control flow. Log snapshots keep large
//! model payloads readable in logs.

use serde::Serialize;
use serde_json::Value;

/// Default snapshot length for logged payloads.
pub const LOG_SNAPSHOT_LIMIT: usize = 2500;

/// Planner request/response capture.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannerTrace {
    pub request: Value,
    pub raw_response: String,
    pub cleaned: String,
    pub parsed: Value,
}

/// Renderer request/response capture.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RendererTrace {
    pub request: Value,
    pub raw_response: String,
    pub extracted: String,
}

/// Clip `text` to at most `limit` characters, noting how much was dropped.
#[must_use]
pub fn truncate_text(text: &str, limit: usize) -> String {
    let total = text.chars().count();
    if total <= limit {
        return text.to_string();
    }
    let head: String = text.chars().take(limit).collect();
    format!("{head}... [truncated {} chars]", total - limit)
}

/// Compact JSON rendering clipped to `limit` characters.
#[must_use]
pub fn compact_json(value: &Value, limit: usize) -> String {
    truncate_text(&value.to_string(), limit)
}

#[cfg(test)]
#[path = "trace_test.rs"]
mod tests;
