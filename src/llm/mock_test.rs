use super::*;

#[test]
fn planning_request_yields_create_plan_with_constraints() {
    let user = json!({
        "mode": "create",
        "prompt": "wallet",
        "brandConstraints": { "grid": 32, "strokeWidth": 1.5, "style": "filled" },
        "variantIndex": 2
    })
    .to_string();
    let plan: Value = serde_json::from_str(&respond(&user)).unwrap();
    assert_eq!(plan["mode"], "create");
    assert_eq!(plan["style"]["grid"], 32);
    assert_eq!(plan["style"]["strokeWidth"], 1.5);
    assert_eq!(plan["style"]["outline"], false);
    assert!(plan["description"].as_str().unwrap().contains('2'));
    assert_eq!(plan["elements"].as_array().unwrap().len(), 1);
}

#[test]
fn planning_request_yields_mutate_plan() {
    let user = json!({ "mode": "mutate", "userInput": "make it a heart", "originalSvg": "<svg/>" }).to_string();
    let plan: Value = serde_json::from_str(&respond(&user)).unwrap();
    assert_eq!(plan["mode"], "mutate");
    assert_eq!(plan["mutationIntent"], "replaceShape");
    assert_eq!(plan["target"], "circle");
}

#[test]
fn rendering_request_yields_svg_on_plan_grid() {
    let user = json!({ "plan": { "mode": "create", "style": { "grid": 48 } } }).to_string();
    let svg = respond(&user);
    assert!(svg.starts_with("<svg"));
    assert!(svg.ends_with("</svg>"));
    assert!(svg.contains(r#"viewBox="0 0 48 48""#));
}

#[test]
fn direct_request_yields_svg() {
    let user = json!({ "task": "direct", "prompt": "bell" }).to_string();
    assert!(respond(&user).contains(r#"viewBox="0 0 24 24""#));
}

#[test]
fn unrecognized_request_yields_empty_object() {
    assert_eq!(respond("hello there"), "{}");
    assert_eq!(respond(r#"{"other": 1}"#), "{}");
}

#[tokio::test]
async fn generate_is_deterministic() {
    let client = MockClient::new();
    let user = json!({ "mode": "create", "variantIndex": 1 }).to_string();
    let a = client.generate("sys", &user).await.unwrap();
    let b = client.generate("sys", &user).await.unwrap();
    assert_eq!(a.text, b.text);
    assert_eq!(a.model, "mock");
    assert_eq!(a.stop_reason, StopReason::EndTurn);
}
