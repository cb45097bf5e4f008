use super::*;

#[test]
fn truncate_text_keeps_short_input() {
    assert_eq!(truncate_text("hello", 10), "hello");
    assert_eq!(truncate_text("hello", 5), "hello");
}

#[test]
fn truncate_text_reports_dropped_chars() {
    assert_eq!(truncate_text("abcdefghij", 4), "abcd... [truncated 6 chars]");
}

#[test]
fn truncate_text_counts_chars_not_bytes() {
    let out = truncate_text("ééééé", 2);
    assert_eq!(out, "éé... [truncated 3 chars]");
}

#[test]
fn compact_json_has_no_whitespace() {
    let value = serde_json::json!({ "a": [1, 2], "b": "c" });
    assert_eq!(compact_json(&value, 100), r#"{"a":[1,2],"b":"c"}"#);
}

#[test]
fn traces_serialize_camel_case() {
    let trace = RendererTrace {
        request: serde_json::json!({}),
        raw_response: "raw".into(),
        extracted: "<svg/>".into(),
    };
    let json = serde_json::to_value(&trace).unwrap();
    assert_eq!(json["rawResponse"], "raw");
    assert_eq!(json["extracted"], "<svg/>");
}
