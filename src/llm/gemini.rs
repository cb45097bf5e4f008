//! Google Gemini `generateContent` client.
//!
//! The system prompt is folded into the single user turn. Internal thinking is
//! disabled so the output budget goes to visible JSON/SVG.

use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use super::config::LlmTimeouts;
use super::types::{Completion, LlmError, StopReason, classify_send_error, completion_from_parts};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const TOP_P: f32 = 0.9;
const TOP_K: u32 = 40;

pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    request_timeout_ms: u64,
}

impl GeminiClient {
    pub fn new(api_key: String, timeouts: LlmTimeouts) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| LlmError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, api_key, request_timeout_ms: timeouts.request_secs.saturating_mul(1000) })
    }

    pub async fn generate(
        &self,
        model: &str,
        system: &str,
        user: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<Completion, LlmError> {
        let prompt = format!("{system}\n\n{user}");
        let parts = [Part { text: &prompt }];
        let contents = [Content { role: "user", parts: &parts }];
        let body = ApiRequest {
            contents: &contents,
            generation_config: GenerationConfig {
                temperature,
                top_p: TOP_P,
                top_k: TOP_K,
                max_output_tokens: max_tokens,
                thinking_config: ThinkingConfig { thinking_budget: 0 },
            },
        };

        let url = format!("{API_BASE}/{model}:generateContent");
        let response = self
            .http
            .post(url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| classify_send_error(&e, self.request_timeout_ms))?;

        let status = response.status().as_u16();
        tracing::debug!(status, model, "gemini: response status");
        let text = response
            .text()
            .await
            .map_err(|e| classify_send_error(&e, self.request_timeout_ms))?;
        if !(200..300).contains(&status) {
            return Err(LlmError::ApiResponse { status, body: text });
        }

        parse_response(&text, model)
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiRequest<'a> {
    contents: &'a [Content<'a>],
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: &'a [Part<'a>],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: u32,
    max_output_tokens: u32,
    thinking_config: ThinkingConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ThinkingConfig {
    thinking_budget: u32,
}

// =============================================================================
// RESPONSE PARSING
// =============================================================================

/// Gemini responses do not always echo the model, so the requested one is
/// used as a fallback.
pub(crate) fn parse_response(json_text: &str, requested_model: &str) -> Result<Completion, LlmError> {
    let root: Value = serde_json::from_str(json_text).map_err(|e| LlmError::ApiParse(e.to_string()))?;

    let Some(candidate) = root
        .get("candidates")
        .and_then(Value::as_array)
        .and_then(|arr| arr.first())
    else {
        return Err(LlmError::ApiParse("gemini: response has no candidates".to_string()));
    };

    let text: String = candidate
        .get("content")
        .and_then(|c| c.get("parts"))
        .and_then(Value::as_array)
        .map(|parts| {
            parts
                .iter()
                .filter_map(|p| p.get("text").and_then(Value::as_str))
                .collect()
        })
        .unwrap_or_default();

    let finish_reason = candidate
        .get("finishReason")
        .and_then(Value::as_str)
        .unwrap_or("STOP");
    let stop_reason = if finish_reason == "MAX_TOKENS" { StopReason::MaxTokens } else { StopReason::EndTurn };
    if stop_reason == StopReason::MaxTokens {
        tracing::warn!(finish_reason, "gemini: response truncated");
    }

    let model = root
        .get("modelVersion")
        .and_then(Value::as_str)
        .unwrap_or(requested_model)
        .to_string();
    let usage = root.get("usageMetadata");
    let input_tokens = usage
        .and_then(|u| u.get("promptTokenCount"))
        .and_then(Value::as_u64)
        .unwrap_or(0);
    let output_tokens = usage
        .and_then(|u| u.get("candidatesTokenCount"))
        .and_then(Value::as_u64)
        .unwrap_or(0);

    completion_from_parts(text, model, stop_reason, finish_reason, input_tokens, output_tokens)
}

#[cfg(test)]
#[path = "gemini_test.rs"]
mod tests;
