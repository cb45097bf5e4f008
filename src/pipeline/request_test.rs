use super::*;
use serde_json::json;

fn create(value: serde_json::Value) -> CreateRequest {
    serde_json::from_value(value).unwrap()
}

// =============================================================================
// BrandConstraints
// =============================================================================

#[test]
fn constraints_default_when_absent() {
    let req = create(json!({ "prompt": "wallet" }));
    assert_eq!(req.brand_constraints, BrandConstraints::default());
    assert_eq!(req.brand_constraints.grid, 24);
    assert_eq!(req.brand_constraints.style, "outline");
    assert!(req.validate().is_ok());
}

#[test]
fn partial_constraints_fill_defaults() {
    let req = create(json!({ "prompt": "wallet", "brandConstraints": { "grid": 32 } }));
    assert_eq!(req.brand_constraints.grid, 32);
    assert!((req.brand_constraints.stroke_width - 2.0).abs() < f64::EPSILON);
    assert!(req.validate().is_ok());
}

#[test]
fn grid_bounds_enforced() {
    for grid in [7, 257] {
        let req = create(json!({ "prompt": "wallet", "brandConstraints": { "grid": grid } }));
        let err = req.validate().unwrap_err();
        assert!(err.to_string().contains("grid"), "{err}");
    }
    for grid in [8, 256] {
        let req = create(json!({ "prompt": "wallet", "brandConstraints": { "grid": grid } }));
        assert!(req.validate().is_ok());
    }
}

#[test]
fn stroke_width_bounds_enforced() {
    for width in [0.05, 32.5] {
        let req = create(json!({ "prompt": "wallet", "brandConstraints": { "strokeWidth": width } }));
        assert!(matches!(req.validate(), Err(PipelineError::InvalidInput(_))));
    }
}

#[test]
fn blank_style_rejected() {
    let req = create(json!({ "prompt": "wallet", "brandConstraints": { "style": " " } }));
    assert!(req.validate().is_err());
}

#[test]
fn constraints_serialize_camel_case() {
    let value = serde_json::to_value(BrandConstraints::default()).unwrap();
    assert_eq!(value, json!({ "grid": 24, "strokeWidth": 2.0, "style": "outline" }));
}

// =============================================================================
// CreateRequest
// =============================================================================

#[test]
fn prompt_length_bounds() {
    assert!(create(json!({ "prompt": "ab" })).validate().is_err());
    assert!(create(json!({ "prompt": "  ab  " })).validate().is_err());
    assert!(create(json!({ "prompt": "abc" })).validate().is_ok());
    assert!(create(json!({ "prompt": "a".repeat(500) })).validate().is_ok());
    assert!(create(json!({ "prompt": "a".repeat(501) })).validate().is_err());
}

#[test]
fn prompt_length_counts_chars() {
    assert!(create(json!({ "prompt": "é".repeat(500) })).validate().is_ok());
}

#[test]
fn invalid_input_stage() {
    let err = create(json!({ "prompt": "" })).validate().unwrap_err();
    assert_eq!(err.stage(), crate::pipeline::Stage::Input);
}

// =============================================================================
// MutateRequest
// =============================================================================

#[test]
fn mutate_request_uses_camel_case() {
    let req: MutateRequest = serde_json::from_value(json!({ "svg": "<svg></svg>", "userInput": "add a dot" })).unwrap();
    assert_eq!(req.user_input, "add a dot");
    assert!(req.validate().is_ok());
}

#[test]
fn mutate_svg_minimum_length() {
    let req = MutateRequest { svg: "<svg/>".into(), user_input: "add a dot".into() };
    let err = req.validate().unwrap_err();
    assert!(err.to_string().contains("svg"), "{err}");
}

#[test]
fn mutate_user_input_bounds() {
    let short = MutateRequest { svg: "<svg></svg>".into(), user_input: "x".into() };
    assert!(short.validate().is_err());
    let long = MutateRequest { svg: "<svg></svg>".into(), user_input: "x".repeat(501) };
    assert!(long.validate().is_err());
    let ok = MutateRequest { svg: "<svg></svg>".into(), user_input: "xy".into() };
    assert!(ok.validate().is_ok());
}

// =============================================================================
// DirectRequest
// =============================================================================

#[test]
fn direct_prompt_bounds() {
    assert!(DirectRequest { prompt: "hi".into() }.validate().is_err());
    assert!(DirectRequest { prompt: "bell".into() }.validate().is_ok());
}
