use super::*;

#[test]
fn success_path_visits_every_state_in_order() {
    let mut attempt = Attempt::begin(1);
    while !attempt.current().is_terminal() {
        attempt.advance();
    }
    assert_eq!(
        attempt.states,
        vec![
            AttemptState::Start,
            AttemptState::Planning,
            AttemptState::PlanValidated,
            AttemptState::Rendering,
            AttemptState::SvgExtracted,
            AttemptState::Normalized,
            AttemptState::Validated,
        ]
    );
    assert_eq!(attempt.current(), AttemptState::Validated);
    assert_eq!(attempt.failed_stage(), None);
}

#[test]
fn failure_is_terminal() {
    let mut attempt = Attempt::begin(2);
    attempt.advance();
    attempt.fail(Stage::PlanningSchema);
    assert_eq!(attempt.current(), AttemptState::Failed(Stage::PlanningSchema));
    assert_eq!(attempt.advance(), AttemptState::Failed(Stage::PlanningSchema));
    attempt.fail(Stage::Structural);
    assert_eq!(attempt.failed_stage(), Some(Stage::PlanningSchema));
    assert_eq!(attempt.states.len(), 3);
    assert_ne!(attempt.current(), AttemptState::Validated);
}

#[test]
fn validated_cannot_fail_afterwards() {
    let mut attempt = Attempt::begin(1);
    for _ in 0..6 {
        attempt.advance();
    }
    attempt.fail(Stage::Timeout);
    assert_eq!(attempt.current(), AttemptState::Validated);
}

#[test]
fn trail_serializes_with_stage_tags() {
    let mut attempt = Attempt::begin(3);
    attempt.advance();
    attempt.fail(Stage::XmlParse);
    let value = serde_json::to_value(&attempt).unwrap();
    assert_eq!(value["number"], 3);
    assert_eq!(value["states"][0], "start");
    assert_eq!(value["states"][1], "planning");
    assert_eq!(value["states"][2]["failed"], "xml-parse");
}
