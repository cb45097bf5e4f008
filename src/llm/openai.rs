//! OpenAI-compatible API client.
//!
//! Supports both `/chat/completions` (the generic endpoint most hosted and
//! local servers expose) and `/responses`.

use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use super::config::{LlmTimeouts, OpenAiApiMode};
use super::types::{Completion, LlmError, StopReason, classify_send_error, completion_from_parts};

pub struct OpenAiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    mode: OpenAiApiMode,
    request_timeout_ms: u64,
}

impl OpenAiClient {
    pub fn new(api_key: String, mode: OpenAiApiMode, base_url: String, timeouts: LlmTimeouts) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| LlmError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, api_key, base_url, mode, request_timeout_ms: timeouts.request_secs.saturating_mul(1000) })
    }

    pub async fn generate(
        &self,
        model: &str,
        system: &str,
        user: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<Completion, LlmError> {
        match self.mode {
            OpenAiApiMode::ChatCompletions => {
                let messages = [CcMessage { role: "system", content: system }, CcMessage { role: "user", content: user }];
                let body = CcRequest { model, max_tokens, temperature, messages: &messages };
                let text = self.send_json("/chat/completions", &body).await?;
                parse_chat_completions_response(&text)
            }
            OpenAiApiMode::Responses => {
                let body = RespRequest { model, max_output_tokens: max_tokens, temperature, instructions: system, input: user };
                let text = self.send_json("/responses", &body).await?;
                parse_responses_response(&text)
            }
        }
    }

    async fn send_json(&self, path: &str, body: &impl Serialize) -> Result<String, LlmError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| classify_send_error(&e, self.request_timeout_ms))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| classify_send_error(&e, self.request_timeout_ms))?;
        if !(200..300).contains(&status) {
            return Err(LlmError::ApiResponse { status, body: text });
        }
        Ok(text)
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Serialize)]
struct CcRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: &'a [CcMessage<'a>],
}

#[derive(Serialize)]
struct CcMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct RespRequest<'a> {
    model: &'a str,
    max_output_tokens: u32,
    temperature: f32,
    instructions: &'a str,
    input: &'a str,
}

// =============================================================================
// RESPONSE PARSING
// =============================================================================

fn usage_field(root: &Value, key: &str) -> u64 {
    root.get("usage")
        .and_then(|u| u.get(key))
        .and_then(Value::as_u64)
        .unwrap_or(0)
}

pub(crate) fn parse_chat_completions_response(json_text: &str) -> Result<Completion, LlmError> {
    let root: Value = serde_json::from_str(json_text).map_err(|e| LlmError::ApiParse(e.to_string()))?;
    let model = root
        .get("model")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .unwrap_or_default();

    let Some(choice) = root
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|arr| arr.first())
    else {
        return Err(LlmError::ApiParse("chat_completions: missing choices[0]".to_string()));
    };
    let finish_reason = choice
        .get("finish_reason")
        .and_then(Value::as_str)
        .unwrap_or("stop");
    let text = choice
        .get("message")
        .and_then(|m| m.get("content"))
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string();

    let stop_reason = if finish_reason == "length" { StopReason::MaxTokens } else { StopReason::EndTurn };

    completion_from_parts(
        text,
        model,
        stop_reason,
        finish_reason,
        usage_field(&root, "prompt_tokens"),
        usage_field(&root, "completion_tokens"),
    )
}

pub(crate) fn parse_responses_response(json_text: &str) -> Result<Completion, LlmError> {
    let root: Value = serde_json::from_str(json_text).map_err(|e| LlmError::ApiParse(e.to_string()))?;
    let model = root
        .get("model")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .unwrap_or_default();

    let mut text = String::new();
    if let Some(items) = root.get("output").and_then(Value::as_array) {
        for item in items {
            if item.get("type").and_then(Value::as_str) != Some("message") {
                continue;
            }
            let Some(parts) = item.get("content").and_then(Value::as_array) else {
                continue;
            };
            for part in parts {
                let kind = part.get("type").and_then(Value::as_str);
                if matches!(kind, Some("output_text" | "text")) {
                    text.push_str(part.get("text").and_then(Value::as_str).unwrap_or(""));
                }
            }
        }
    } else if let Some(output_text) = root.get("output_text").and_then(Value::as_str) {
        text.push_str(output_text);
    }

    let incomplete_reason = root
        .get("incomplete_details")
        .and_then(|d| d.get("reason"))
        .and_then(Value::as_str);
    let (stop_reason, raw_stop) = if incomplete_reason == Some("max_output_tokens") {
        (StopReason::MaxTokens, "max_output_tokens")
    } else {
        (StopReason::EndTurn, root.get("status").and_then(Value::as_str).unwrap_or("completed"))
    };

    completion_from_parts(
        text,
        model,
        stop_reason,
        raw_stop,
        usage_field(&root, "input_tokens"),
        usage_field(&root, "output_tokens"),
    )
}

#[cfg(test)]
#[path = "openai_test.rs"]
mod tests;
