//! LLM — multi-provider model backend adapter.
//!
//! DESIGN
//! ======
//! The pipeline depends only on the [`LlmBackend`] trait. [`LlmClient`] is the
//! production implementation: an enum over a closed set of providers,
//! selected once at startup from [`LlmConfig`] and shared across requests.
//!
//! The client is stateless apart from configuration and a semaphore that caps
//! how many backend calls may be in flight across all requests.

pub mod anthropic;
pub mod config;
pub mod gemini;
pub mod mock;
pub mod openai;
pub mod types;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tracing::info;

use config::{LlmConfig, LlmProviderKind};
pub use types::LlmBackend;
use types::{Completion, LlmError};

// =============================================================================
// DEADLINE CALL
// =============================================================================

/// One backend call bounded by `deadline`, returning only complete text.
///
/// # Errors
///
/// Returns [`LlmError::Timeout`] when the deadline passes, the backend's own
/// error otherwise, and [`LlmError::Truncated`] when the backend reports an
/// output-length stop.
pub async fn generate_text(
    llm: &dyn LlmBackend,
    system: &str,
    user: &str,
    temperature: f32,
    max_tokens: u32,
    deadline: Duration,
) -> Result<String, LlmError> {
    let call = llm.generate(system, user, temperature, max_tokens);
    match tokio::time::timeout(deadline, call).await {
        Ok(result) => {
            let completion = result?;
            info!(
                provider = llm.provider(),
                model = %completion.model,
                stop_reason = completion.stop_reason.as_str(),
                input_tokens = completion.input_tokens,
                output_tokens = completion.output_tokens,
                "llm: completion"
            );
            completion.into_text()
        }
        Err(_) => Err(LlmError::Timeout { after_ms: u64::try_from(deadline.as_millis()).unwrap_or(u64::MAX) }),
    }
}

// =============================================================================
// CLIENT DISPATCH
// =============================================================================

/// Concrete LLM client dispatching to one configured provider.
pub struct LlmClient {
    inner: LlmProvider,
    kind: LlmProviderKind,
    model: String,
    permits: Arc<Semaphore>,
}

enum LlmProvider {
    Anthropic(anthropic::AnthropicClient),
    OpenAi(openai::OpenAiClient),
    Gemini(gemini::GeminiClient),
    Mock(mock::MockClient),
}

impl LlmClient {
    /// Build an LLM client from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid, the API key is missing, or
    /// the HTTP client fails to build.
    pub fn from_env() -> Result<Self, LlmError> {
        let config = LlmConfig::from_env()?;
        Self::from_config(config)
    }

    /// Build an LLM client from a parsed typed config.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider HTTP client fails to build.
    pub fn from_config(config: LlmConfig) -> Result<Self, LlmError> {
        let inner = match config.provider {
            LlmProviderKind::Anthropic => {
                LlmProvider::Anthropic(anthropic::AnthropicClient::new(config.api_key, config.timeouts)?)
            }
            LlmProviderKind::OpenAi => LlmProvider::OpenAi(openai::OpenAiClient::new(
                config.api_key,
                config.openai_mode,
                config.openai_base_url,
                config.timeouts,
            )?),
            LlmProviderKind::Gemini => LlmProvider::Gemini(gemini::GeminiClient::new(config.api_key, config.timeouts)?),
            LlmProviderKind::Mock => LlmProvider::Mock(mock::MockClient::new()),
        };
        Ok(Self {
            inner,
            kind: config.provider,
            model: config.model,
            permits: Arc::new(Semaphore::new(config.max_in_flight)),
        })
    }

    async fn generate_inner(
        &self,
        system: &str,
        user: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<Completion, LlmError> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|e| LlmError::ApiRequest(format!("backend permits closed: {e}")))?;

        match &self.inner {
            LlmProvider::Anthropic(c) => {
                c.generate(&self.model, system, user, temperature, max_tokens)
                    .await
            }
            LlmProvider::OpenAi(c) => {
                c.generate(&self.model, system, user, temperature, max_tokens)
                    .await
            }
            LlmProvider::Gemini(c) => {
                c.generate(&self.model, system, user, temperature, max_tokens)
                    .await
            }
            LlmProvider::Mock(c) => c.generate(system, user).await,
        }
    }
}

#[async_trait::async_trait]
impl LlmBackend for LlmClient {
    async fn generate(
        &self,
        system: &str,
        user: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<Completion, LlmError> {
        self.generate_inner(system, user, temperature, max_tokens)
            .await
    }

    fn provider(&self) -> &str {
        self.kind.as_str()
    }

    fn model(&self) -> &str {
        &self.model
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================


#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
