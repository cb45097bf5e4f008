use super::*;
use std::collections::HashMap;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + use<> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn empty_env_gives_defaults() {
    assert_eq!(PipelineConfig::from_lookup(lookup_from(&[])), PipelineConfig::default());
}

#[test]
fn defaults_match_documented_values() {
    let config = PipelineConfig::default();
    assert_eq!(config.planner_timeout, Duration::from_secs(30));
    assert_eq!(config.renderer_timeout, Duration::from_secs(60));
    assert_eq!(config.request_timeout, Duration::from_secs(300));
    assert_eq!(config.mutate_max_attempts, 3);
    assert!(config.planner_temperature.abs() < f32::EPSILON);
    assert!((config.renderer_temperature - 0.3).abs() < f32::EPSILON);
    assert!(!config.debug);
}

#[test]
fn overrides_are_applied() {
    let config = PipelineConfig::from_lookup(lookup_from(&[
        ("PLANNER_TIMEOUT_SECS", "5"),
        ("RENDERER_TIMEOUT_SECS", "9"),
        ("PIPELINE_TIMEOUT_SECS", "20"),
        ("MUTATE_MAX_ATTEMPTS", "5"),
        ("PIPELINE_MAX_TOKENS", "1024"),
        ("RENDERER_TEMPERATURE", "0.7"),
        ("DEBUG_LLM", "TRUE"),
    ]));
    assert_eq!(config.planner_timeout, Duration::from_secs(5));
    assert_eq!(config.renderer_timeout, Duration::from_secs(9));
    assert_eq!(config.request_timeout, Duration::from_secs(20));
    assert_eq!(config.mutate_max_attempts, 5);
    assert_eq!(config.max_tokens, 1024);
    assert!((config.renderer_temperature - 0.7).abs() < f32::EPSILON);
    assert!(config.debug);
}

#[test]
fn garbage_values_fall_back() {
    let config = PipelineConfig::from_lookup(lookup_from(&[("PLANNER_TIMEOUT_SECS", "soon"), ("DEBUG_LLM", "maybe")]));
    assert_eq!(config.planner_timeout, Duration::from_secs(DEFAULT_PLANNER_TIMEOUT_SECS));
    assert!(!config.debug);
}

#[test]
fn zero_attempts_raised_to_one() {
    let config = PipelineConfig::from_lookup(lookup_from(&[("MUTATE_MAX_ATTEMPTS", "0")]));
    assert_eq!(config.mutate_max_attempts, 1);
}
