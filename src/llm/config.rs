//! LLM configuration parsed from environment variables.

use super::types::LlmError;
use crate::env;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_LLM_REQUEST_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_LLM_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_LLM_MAX_IN_FLIGHT: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProviderKind {
    Anthropic,
    OpenAi,
    Gemini,
    Mock,
}

impl LlmProviderKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Anthropic => "anthropic",
            Self::OpenAi => "openai",
            Self::Gemini => "gemini",
            Self::Mock => "mock",
        }
    }

    fn default_key_var(self) -> Option<&'static str> {
        match self {
            Self::Anthropic => Some("ANTHROPIC_API_KEY"),
            Self::OpenAi => Some("LLM_API_KEY"),
            Self::Gemini => Some("GEMINI_API_KEY"),
            Self::Mock => None,
        }
    }

    fn default_model(self) -> &'static str {
        match self {
            Self::Anthropic => "claude-sonnet-4-5-20250929",
            Self::OpenAi => "gpt-4o-mini",
            Self::Gemini => "gemini-1.5-flash",
            Self::Mock => "mock",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenAiApiMode {
    ChatCompletions,
    Responses,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LlmTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmConfig {
    pub provider: LlmProviderKind,
    /// Empty for the mock provider.
    pub api_key: String,
    pub model: String,
    pub openai_mode: OpenAiApiMode,
    pub openai_base_url: String,
    pub timeouts: LlmTimeouts,
    pub max_in_flight: usize,
}

impl LlmConfig {
    /// Build typed LLM config from the process environment.
    ///
    /// # Errors
    ///
    /// See [`LlmConfig::from_lookup`].
    pub fn from_env() -> Result<Self, LlmError> {
        Self::from_lookup(env::process_lookup)
    }

    /// Build typed LLM config from a key lookup.
    ///
    /// Optional:
    /// - `LLM_PROVIDER`: `anthropic`, `openai`, `gemini`, or `mock`. When
    ///   unset the provider is inferred from which key variable is present
    ///   (`GEMINI_API_KEY`, then `LLM_API_KEY`, then `ANTHROPIC_API_KEY`),
    ///   falling back to `mock`.
    /// - `LLM_API_KEY_ENV`: names the env var holding the key
    /// - `LLM_MODEL`: provider default when absent
    /// - `LLM_OPENAI_MODE`: `chat_completions` (default) or `responses`
    /// - `LLM_API_BASE_URL`: OpenAI-compatible base URL
    /// - `LLM_REQUEST_TIMEOUT_SECS`: default 60
    /// - `LLM_CONNECT_TIMEOUT_SECS`: default 10
    /// - `LLM_MAX_IN_FLIGHT`: default 8
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::ConfigParse`] for unknown provider or mode values
    /// and [`LlmError::MissingApiKey`] when a keyed provider has no key.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, LlmError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let provider = match env::non_empty(&lookup, "LLM_PROVIDER") {
            Some(raw) => parse_provider(&raw)?,
            None => infer_provider(&lookup),
        };

        let api_key = match provider.default_key_var() {
            Some(default_var) => {
                let key_var = env::non_empty(&lookup, "LLM_API_KEY_ENV").unwrap_or_else(|| default_var.to_string());
                env::non_empty(&lookup, &key_var).ok_or(LlmError::MissingApiKey { var: key_var })?
            }
            None => String::new(),
        };

        let model = env::non_empty(&lookup, "LLM_MODEL").unwrap_or_else(|| provider.default_model().to_string());
        let openai_mode = parse_openai_mode(env::non_empty(&lookup, "LLM_OPENAI_MODE").as_deref())?;
        let openai_base_url = env::non_empty(&lookup, "LLM_API_BASE_URL")
            .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let timeouts = LlmTimeouts {
            request_secs: env::parse_or(&lookup, "LLM_REQUEST_TIMEOUT_SECS", DEFAULT_LLM_REQUEST_TIMEOUT_SECS),
            connect_secs: env::parse_or(&lookup, "LLM_CONNECT_TIMEOUT_SECS", DEFAULT_LLM_CONNECT_TIMEOUT_SECS),
        };
        let max_in_flight = env::parse_or(&lookup, "LLM_MAX_IN_FLIGHT", DEFAULT_LLM_MAX_IN_FLIGHT).max(1);

        Ok(Self { provider, api_key, model, openai_mode, openai_base_url, timeouts, max_in_flight })
    }

    /// Config for the deterministic stub backend.
    #[cfg(test)]
    #[must_use]
    pub fn mock() -> Self {
        Self {
            provider: LlmProviderKind::Mock,
            api_key: String::new(),
            model: LlmProviderKind::Mock.default_model().to_string(),
            openai_mode: OpenAiApiMode::ChatCompletions,
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            timeouts: LlmTimeouts {
                request_secs: DEFAULT_LLM_REQUEST_TIMEOUT_SECS,
                connect_secs: DEFAULT_LLM_CONNECT_TIMEOUT_SECS,
            },
            max_in_flight: DEFAULT_LLM_MAX_IN_FLIGHT,
        }
    }
}

fn infer_provider<F>(lookup: &F) -> LlmProviderKind
where
    F: Fn(&str) -> Option<String>,
{
    if env::non_empty(lookup, "GEMINI_API_KEY").is_some() {
        LlmProviderKind::Gemini
    } else if env::non_empty(lookup, "LLM_API_KEY").is_some() {
        LlmProviderKind::OpenAi
    } else if env::non_empty(lookup, "ANTHROPIC_API_KEY").is_some() {
        LlmProviderKind::Anthropic
    } else {
        LlmProviderKind::Mock
    }
}

fn parse_provider(raw: &str) -> Result<LlmProviderKind, LlmError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "anthropic" => Ok(LlmProviderKind::Anthropic),
        "openai" | "api" => Ok(LlmProviderKind::OpenAi),
        "gemini" => Ok(LlmProviderKind::Gemini),
        "mock" => Ok(LlmProviderKind::Mock),
        other => Err(LlmError::ConfigParse(format!("unknown LLM_PROVIDER: {other}"))),
    }
}

fn parse_openai_mode(raw: Option<&str>) -> Result<OpenAiApiMode, LlmError> {
    match raw.unwrap_or("chat_completions") {
        "chat_completions" => Ok(OpenAiApiMode::ChatCompletions),
        "responses" => Ok(OpenAiApiMode::Responses),
        other => Err(LlmError::ConfigParse(format!(
            "unsupported openai_api mode '{other}' (expected 'chat_completions' or 'responses')"
        ))),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
