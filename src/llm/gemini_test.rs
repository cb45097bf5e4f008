use super::*;

fn candidate_response(parts: serde_json::Value, finish_reason: &str) -> String {
    serde_json::json!({
        "candidates": [{
            "content": { "role": "model", "parts": parts },
            "finishReason": finish_reason
        }],
        "usageMetadata": { "promptTokenCount": 30, "candidatesTokenCount": 12 },
        "modelVersion": "gemini-1.5-flash-002"
    })
    .to_string()
}

#[test]
fn parse_joins_text_parts() {
    let json = candidate_response(serde_json::json!([{ "text": "<svg>" }, { "text": "</svg>" }]), "STOP");
    let resp = parse_response(&json, "gemini-1.5-flash").unwrap();
    assert_eq!(resp.text, "<svg></svg>");
    assert_eq!(resp.model, "gemini-1.5-flash-002");
    assert_eq!(resp.stop_reason, StopReason::EndTurn);
    assert_eq!(resp.input_tokens, 30);
    assert_eq!(resp.output_tokens, 12);
}

#[test]
fn parse_max_tokens_finish_reason() {
    let json = candidate_response(serde_json::json!([{ "text": "<svg><g>" }]), "MAX_TOKENS");
    let resp = parse_response(&json, "gemini-1.5-flash").unwrap();
    assert_eq!(resp.stop_reason, StopReason::MaxTokens);
}

#[test]
fn parse_empty_parts_reports_finish_reason() {
    let json = candidate_response(serde_json::json!([]), "SAFETY");
    let err = parse_response(&json, "gemini-1.5-flash").unwrap_err();
    assert!(matches!(err, LlmError::EmptyContent { ref stop_reason } if stop_reason == "SAFETY"));
}

#[test]
fn parse_no_candidates_is_parse_error() {
    let json = serde_json::json!({ "candidates": [] }).to_string();
    assert!(matches!(parse_response(&json, "m"), Err(LlmError::ApiParse(_))));
}

#[test]
fn parse_falls_back_to_requested_model() {
    let json = serde_json::json!({
        "candidates": [{ "content": { "parts": [{ "text": "ok" }] } }]
    })
    .to_string();
    let resp = parse_response(&json, "gemini-2.0-flash").unwrap();
    assert_eq!(resp.model, "gemini-2.0-flash");
    assert_eq!(resp.stop_reason, StopReason::EndTurn);
}
