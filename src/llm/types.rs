//! LLM types — provider-neutral completion type, backend trait, and errors.
//!
//! Shared by the Anthropic, `OpenAI`, Gemini, and mock backends. The pipeline
//! only ever sees these types.

use serde::Serialize;

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by model backend operations.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// A configuration value could not be parsed.
    #[error("config parse failed: {0}")]
    ConfigParse(String),

    /// The required API key environment variable is not set.
    #[error("missing API key: env var {var} not set")]
    MissingApiKey { var: String },

    /// DNS resolution or TCP/TLS connection to the provider failed.
    #[error("connection to model backend failed: {0}")]
    Connect(String),

    /// The HTTP request to the provider failed for another reason.
    #[error("API request failed: {0}")]
    ApiRequest(String),

    /// The backend call did not finish within its deadline.
    #[error("model backend timed out after {after_ms}ms")]
    Timeout { after_ms: u64 },

    /// The provider returned a non-success HTTP status. The body is kept for
    /// logs but never rendered by `Display`.
    #[error("API response error: status {status}")]
    ApiResponse { status: u16, body: String },

    /// The provider response body could not be deserialized.
    #[error("API response parse failed: {0}")]
    ApiParse(String),

    /// The provider answered but produced no text.
    #[error("model returned empty content (stop reason: {stop_reason})")]
    EmptyContent { stop_reason: String },

    /// The provider stopped because it hit its output-length limit.
    #[error("model output truncated by token limit (model {model})")]
    Truncated { model: String },

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl crate::error::ErrorCode for LlmError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::ConfigParse(_) => "E_CONFIG_PARSE",
            Self::MissingApiKey { .. } => "E_MISSING_API_KEY",
            Self::Connect(_) => "E_API_CONNECT",
            Self::ApiRequest(_) => "E_API_REQUEST",
            Self::Timeout { .. } => "E_API_TIMEOUT",
            Self::ApiResponse { .. } => "E_API_RESPONSE",
            Self::ApiParse(_) => "E_API_PARSE",
            Self::EmptyContent { .. } => "E_EMPTY_CONTENT",
            Self::Truncated { .. } => "E_TRUNCATED",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
        }
    }

    fn retryable(&self) -> bool {
        matches!(
            self,
            Self::Connect(_)
                | Self::ApiRequest(_)
                | Self::Timeout { .. }
                | Self::ApiResponse { status: 429 | 500..=599, .. }
        )
    }
}

/// Classify a `reqwest` transport failure.
pub(crate) fn classify_send_error(err: &reqwest::Error, timeout_ms: u64) -> LlmError {
    if err.is_timeout() {
        LlmError::Timeout { after_ms: timeout_ms }
    } else if err.is_connect() {
        LlmError::Connect(err.to_string())
    } else {
        LlmError::ApiRequest(err.to_string())
    }
}

// =============================================================================
// COMPLETION
// =============================================================================

/// Why the backend stopped generating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    EndTurn,
    MaxTokens,
}

impl StopReason {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::EndTurn => "end_turn",
            Self::MaxTokens => "max_tokens",
        }
    }
}

/// Response from a single `generate` call.
#[derive(Debug, Clone)]
pub struct Completion {
    pub text: String,
    pub model: String,
    pub stop_reason: StopReason,
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl Completion {
    /// Take the generated text, refusing output the backend reported as cut
    /// off by its length limit.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Truncated`] when `stop_reason` is `MaxTokens`.
    pub fn into_text(self) -> Result<String, LlmError> {
        match self.stop_reason {
            StopReason::EndTurn => Ok(self.text),
            StopReason::MaxTokens => Err(LlmError::Truncated { model: self.model }),
        }
    }
}

/// Reject blank provider output, otherwise build the completion.
pub(crate) fn completion_from_parts(
    text: String,
    model: String,
    stop_reason: StopReason,
    raw_stop: &str,
    input_tokens: u64,
    output_tokens: u64,
) -> Result<Completion, LlmError> {
    let text = text.trim().to_string();
    if text.is_empty() {
        return Err(LlmError::EmptyContent { stop_reason: raw_stop.to_string() });
    }
    Ok(Completion { text, model, stop_reason, input_tokens, output_tokens })
}

// =============================================================================
// BACKEND TRAIT
// =============================================================================

/// Provider-neutral async trait for one-shot text generation. Enables mocking
/// in tests.
#[async_trait::async_trait]
pub trait LlmBackend: Send + Sync {
    /// Send one system + user prompt pair to the backend.
    ///
    /// # Errors
    ///
    /// Returns an [`LlmError`] if the request fails, the response is
    /// malformed or empty, or credentials are absent.
    async fn generate(
        &self,
        system: &str,
        user: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<Completion, LlmError>;

    /// Short provider name for diagnostics (e.g. `"gemini"`).
    fn provider(&self) -> &str {
        "custom"
    }

    /// Configured model identifier for diagnostics.
    fn model(&self) -> &str {
        "unknown"
    }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
