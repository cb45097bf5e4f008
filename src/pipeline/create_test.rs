use super::*;
use std::sync::Arc;
use std::time::Duration;

use crate::llm::LlmBackend;
use crate::llm::test_helpers::ScriptedLlm;
use crate::pipeline::attempt::AttemptState;
use crate::pipeline::request::BrandConstraints;
use crate::pipeline::{PipelineConfig, Stage};
use crate::planner::PLANNER_SYSTEM_PROMPT;
use crate::renderer::{ExtractError, RENDERER_SYSTEM_PROMPT};
use crate::svg;

const PLAN: &str = r#"{"mode":"create","description":"A bell","elements":[{"type":"path","role":"body","position":"center","relationship":"standalone"}],"style":{"grid":24,"strokeWidth":2,"outline":true}}"#;
const SVG: &str = r#"<svg width="24" height="24"><circle cx="12" cy="12" r="8" style="fill:red"/></svg>"#;

fn pipeline(llm: &Arc<ScriptedLlm>, config: PipelineConfig) -> Pipeline {
    Pipeline::new(Arc::clone(llm) as Arc<dyn LlmBackend>, config)
}

fn request() -> CreateRequest {
    CreateRequest { prompt: "notification bell".into(), brand_constraints: BrandConstraints::default() }
}

fn happy_script() -> Arc<ScriptedLlm> {
    Arc::new(ScriptedLlm::texts(&[PLAN, SVG, PLAN, SVG, PLAN, SVG]))
}

// =============================================================================
// success
// =============================================================================

#[tokio::test]
async fn create_returns_exactly_three_valid_variants() {
    let llm = happy_script();
    let response = pipeline(&llm, PipelineConfig::default()).create(&request()).await.unwrap();

    assert_eq!(response.variants.len(), 3);
    for variant in &response.variants {
        assert_eq!(svg::validate(&variant.svg), Ok(()));
        assert!(!variant.svg.contains("style="));
        assert!(variant.svg.contains(r#"id="el-1""#));
    }
    assert!(response.debug.is_none());
    assert_eq!(llm.calls_with_system(PLANNER_SYSTEM_PROMPT), 3);
    assert_eq!(llm.calls_with_system(RENDERER_SYSTEM_PROMPT), 3);
}

#[tokio::test]
async fn variants_are_planned_and_rendered_in_order() {
    let llm = happy_script();
    pipeline(&llm, PipelineConfig::default()).create(&request()).await.unwrap();

    let prompts: Vec<serde_json::Value> = llm
        .user_prompts()
        .iter()
        .map(|p| serde_json::from_str(p).unwrap())
        .collect();
    for (slot, expected) in [(0, 1), (2, 2), (4, 3)] {
        assert_eq!(prompts[slot]["mode"], "create");
        assert_eq!(prompts[slot]["variantIndex"], expected);
        assert!(prompts[slot + 1].get("plan").is_some());
        assert!(prompts[slot + 1].get("originalSvg").is_none());
    }
}

#[tokio::test]
async fn caller_grid_is_the_fallback_view_box() {
    let bare = r#"<svg><path d="M0 0h8"/></svg>"#;
    let llm = Arc::new(ScriptedLlm::texts(&[PLAN, bare, PLAN, bare, PLAN, bare]));
    let mut req = request();
    req.brand_constraints.grid = 32;
    let response = pipeline(&llm, PipelineConfig::default()).create(&req).await.unwrap();
    assert!(response.variants.iter().all(|v| v.svg.contains(r#"viewBox="0 0 32 32""#)));
}

#[tokio::test]
async fn transforms_survive_create() {
    let with_transform = r#"<svg viewBox="0 0 24 24"><g transform="rotate(45 12 12)"><path d="M0 0"/></g></svg>"#;
    let llm = Arc::new(ScriptedLlm::texts(&[PLAN, with_transform, PLAN, SVG, PLAN, SVG]));
    let response = pipeline(&llm, PipelineConfig::default()).create(&request()).await.unwrap();
    assert!(response.variants[0].svg.contains("transform="));
}

#[tokio::test]
async fn debug_block_only_when_enabled() {
    let llm = happy_script();
    let config = PipelineConfig { debug: true, ..PipelineConfig::default() };
    let response = pipeline(&llm, config).create(&request()).await.unwrap();

    let debug = response.debug.as_ref().unwrap();
    assert_eq!(debug.provider, "scripted");
    assert_eq!(debug.model, "scripted-1");
    assert_eq!(debug.variants.len(), 3);
    for (i, variant) in debug.variants.iter().enumerate() {
        assert_eq!(variant.variant_index, i + 1);
        assert_eq!(variant.normalized_svg, response.variants[i].svg);
        assert_eq!(variant.attempt.current(), AttemptState::Validated);
        assert_eq!(variant.planner.raw_response, PLAN);
    }

    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["debug"]["variants"][0]["variantIndex"], 1);
    assert!(json["debug"]["variants"][0]["generator"]["rawResponse"].is_string());
}

#[tokio::test]
async fn debug_omitted_from_json_by_default() {
    let llm = happy_script();
    let response = pipeline(&llm, PipelineConfig::default()).create(&request()).await.unwrap();
    let json = serde_json::to_value(&response).unwrap();
    assert!(json.get("debug").is_none());
    assert_eq!(json["variants"].as_array().unwrap().len(), 3);
}

// =============================================================================
// failure
// =============================================================================

#[tokio::test]
async fn any_variant_failure_aborts_the_request() {
    let llm = Arc::new(ScriptedLlm::texts(&[PLAN, SVG, PLAN, "sorry, no icon", PLAN, SVG]));
    let err = pipeline(&llm, PipelineConfig::default()).create(&request()).await.unwrap_err();
    assert!(matches!(err, PipelineError::Extraction(ExtractError::NoSvg)));
    assert_eq!(err.stage(), Stage::RenderExtraction);
    assert_eq!(llm.call_count(), 4);
}

#[tokio::test]
async fn create_never_retries() {
    let llm = Arc::new(ScriptedLlm::texts(&["not a plan", PLAN, SVG]));
    let err = pipeline(&llm, PipelineConfig::default()).create(&request()).await.unwrap_err();
    assert_eq!(err.stage(), Stage::PlanningSchema);
    assert_eq!(llm.call_count(), 1);
}

#[tokio::test]
async fn invalid_request_makes_no_backend_call() {
    let llm = happy_script();
    let mut req = request();
    req.prompt = "hi".into();
    let err = pipeline(&llm, PipelineConfig::default()).create(&req).await.unwrap_err();
    assert_eq!(err.stage(), Stage::Input);
    assert_eq!(llm.call_count(), 0);
}

#[tokio::test]
async fn end_to_end_deadline_is_a_timeout() {
    let llm = Arc::new(ScriptedLlm::texts(&[PLAN, SVG, PLAN, SVG, PLAN, SVG]).with_delay(Duration::from_millis(30)));
    let config = PipelineConfig { request_timeout: Duration::from_millis(50), ..PipelineConfig::default() };
    let err = pipeline(&llm, config).create(&request()).await.unwrap_err();
    assert!(matches!(err, PipelineError::Timeout { after_ms: 50 }));
    assert_eq!(err.stage(), Stage::Timeout);
}
