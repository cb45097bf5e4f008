//! Pipeline tuning parsed from environment variables.

use std::time::Duration;

use crate::env;

pub const DEFAULT_PLANNER_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_RENDERER_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_PIPELINE_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_MUTATE_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_MAX_TOKENS: u32 = 8192;
pub const DEFAULT_PLANNER_TEMPERATURE: f32 = 0.0;
pub const DEFAULT_RENDERER_TEMPERATURE: f32 = 0.3;

/// Number of variants the create flow returns. Not configurable.
pub const VARIANT_COUNT: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Deadline for one planner backend call.
    pub planner_timeout: Duration,
    /// Deadline for one renderer backend call.
    pub renderer_timeout: Duration,
    /// End-to-end deadline for a whole request.
    pub request_timeout: Duration,
    pub mutate_max_attempts: u32,
    pub max_tokens: u32,
    pub planner_temperature: f32,
    pub renderer_temperature: f32,
    /// Attach the diagnostic block to responses.
    pub debug: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            planner_timeout: Duration::from_secs(DEFAULT_PLANNER_TIMEOUT_SECS),
            renderer_timeout: Duration::from_secs(DEFAULT_RENDERER_TIMEOUT_SECS),
            request_timeout: Duration::from_secs(DEFAULT_PIPELINE_TIMEOUT_SECS),
            mutate_max_attempts: DEFAULT_MUTATE_MAX_ATTEMPTS,
            max_tokens: DEFAULT_MAX_TOKENS,
            planner_temperature: DEFAULT_PLANNER_TEMPERATURE,
            renderer_temperature: DEFAULT_RENDERER_TEMPERATURE,
            debug: false,
        }
    }
}

impl PipelineConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(env::process_lookup)
    }

    /// Parse from an arbitrary lookup. Unparseable values fall back to their
    /// defaults; an attempt bound of zero is raised to one.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let secs = |key: &str, default: u64| Duration::from_secs(env::parse_or(&lookup, key, default));
        Self {
            planner_timeout: secs("PLANNER_TIMEOUT_SECS", DEFAULT_PLANNER_TIMEOUT_SECS),
            renderer_timeout: secs("RENDERER_TIMEOUT_SECS", DEFAULT_RENDERER_TIMEOUT_SECS),
            request_timeout: secs("PIPELINE_TIMEOUT_SECS", DEFAULT_PIPELINE_TIMEOUT_SECS),
            mutate_max_attempts: env::parse_or(&lookup, "MUTATE_MAX_ATTEMPTS", DEFAULT_MUTATE_MAX_ATTEMPTS).max(1),
            max_tokens: env::parse_or(&lookup, "PIPELINE_MAX_TOKENS", DEFAULT_MAX_TOKENS),
            planner_temperature: env::parse_or(&lookup, "PLANNER_TEMPERATURE", DEFAULT_PLANNER_TEMPERATURE),
            renderer_temperature: env::parse_or(&lookup, "RENDERER_TEMPERATURE", DEFAULT_RENDERER_TEMPERATURE),
            debug: env::parse_bool(&lookup, "DEBUG_LLM").unwrap_or(false),
        }
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
