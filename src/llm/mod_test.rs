use super::*;
use types::StopReason;

struct FixedBackend {
    stop_reason: StopReason,
    delay: Duration,
}

#[async_trait::async_trait]
impl LlmBackend for FixedBackend {
    async fn generate(&self, _system: &str, _user: &str, _temperature: f32, _max_tokens: u32) -> Result<Completion, LlmError> {
        tokio::time::sleep(self.delay).await;
        Ok(Completion {
            text: "<svg></svg>".into(),
            model: "fixed".into(),
            stop_reason: self.stop_reason,
            input_tokens: 1,
            output_tokens: 1,
        })
    }
}

// =============================================================================
// generate_text
// =============================================================================

#[tokio::test]
async fn generate_text_returns_complete_output() {
    let backend = FixedBackend { stop_reason: StopReason::EndTurn, delay: Duration::ZERO };
    let text = generate_text(&backend, "sys", "user", 0.0, 64, Duration::from_secs(1))
        .await
        .unwrap();
    assert_eq!(text, "<svg></svg>");
}

#[tokio::test]
async fn generate_text_surfaces_truncation() {
    let backend = FixedBackend { stop_reason: StopReason::MaxTokens, delay: Duration::ZERO };
    let err = generate_text(&backend, "sys", "user", 0.0, 64, Duration::from_secs(1))
        .await
        .unwrap_err();
    assert!(matches!(err, LlmError::Truncated { ref model } if model == "fixed"));
}

#[tokio::test]
async fn generate_text_times_out() {
    let backend = FixedBackend { stop_reason: StopReason::EndTurn, delay: Duration::from_secs(5) };
    let err = generate_text(&backend, "sys", "user", 0.0, 64, Duration::from_millis(20))
        .await
        .unwrap_err();
    assert!(matches!(err, LlmError::Timeout { after_ms: 20 }));
}

// =============================================================================
// LlmClient
// =============================================================================

#[tokio::test]
async fn mock_client_reports_identity_and_answers() {
    let client = LlmClient::from_config(LlmConfig::mock()).unwrap();
    assert_eq!(client.provider(), "mock");
    assert_eq!(client.model(), "mock");

    let completion = client
        .generate("sys", r#"{"task":"direct","prompt":"star"}"#, 0.3, 256)
        .await
        .unwrap();
    assert!(completion.text.starts_with("<svg"));
    assert_eq!(completion.stop_reason, StopReason::EndTurn);
}
