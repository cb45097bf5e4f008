//! Anthropic Messages API client.
//!
//! Thin HTTP wrapper for `/v1/messages`. Pure parsing in `parse_response`
//! for testability.

use super::config::LlmTimeouts;
use super::types::{Completion, LlmError, StopReason, classify_send_error, completion_from_parts};
use std::time::Duration;

const API_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";

// =============================================================================
// CLIENT
// =============================================================================

pub struct AnthropicClient {
    http: reqwest::Client,
    api_key: String,
    request_timeout_ms: u64,
}

impl AnthropicClient {
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
        let messages = [ApiMessage { role: "user", content: user }];
        let body = ApiRequest { model, max_tokens, temperature, system, messages: &messages };

        let response = self
            .http
            .post(API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| classify_send_error(&e, self.request_timeout_ms))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| classify_send_error(&e, self.request_timeout_ms))?;

        if status != 200 {
            return Err(LlmError::ApiResponse { status, body: text });
        }

        parse_response(&text)
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(serde::Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: &'a [ApiMessage<'a>],
}

#[derive(serde::Serialize)]
struct ApiMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(serde::Deserialize)]
struct ApiResponse {
    content: Vec<ContentBlock>,
    model: String,
    #[serde(default)]
    stop_reason: Option<String>,
    usage: Usage,
}

#[derive(serde::Deserialize)]
#[serde(tag = "type")]
enum ContentBlock {
    #[serde(rename = "text")]
    Text { text: String },

    /// Thinking, tool use, and future block types carry no icon output.
    #[serde(other)]
    Other,
}

#[derive(serde::Deserialize)]
struct Usage {
    input_tokens: u64,
    output_tokens: u64,
}

// =============================================================================
// PARSING
// =============================================================================

fn parse_response(json: &str) -> Result<Completion, LlmError> {
    let api: ApiResponse = serde_json::from_str(json).map_err(|e| LlmError::ApiParse(e.to_string()))?;

    let text: String = api
        .content
        .into_iter()
        .filter_map(|block| match block {
            ContentBlock::Text { text } => Some(text),
            ContentBlock::Other => None,
        })
        .collect();

    let raw_stop = api.stop_reason.unwrap_or_else(|| "end_turn".to_string());
    let stop_reason = if raw_stop == "max_tokens" { StopReason::MaxTokens } else { StopReason::EndTurn };

    completion_from_parts(text, api.model, stop_reason, &raw_stop, api.usage.input_tokens, api.usage.output_tokens)
}

#[cfg(test)]
#[path = "anthropic_test.rs"]
mod tests;
