//! Boundary request shapes and their input checks.
//!
//! Every check here runs before any backend call; a failure is
//! [`PipelineError::InvalidInput`].

use serde::{Deserialize, Serialize};

use super::PipelineError;

pub const PROMPT_MIN_CHARS: usize = 3;
pub const PROMPT_MAX_CHARS: usize = 500;
pub const USER_INPUT_MIN_CHARS: usize = 2;
pub const USER_INPUT_MAX_CHARS: usize = 500;
/// Room for at least `<svg></svg>`.
pub const SVG_MIN_CHARS: usize = 11;

pub const GRID_RANGE: std::ops::RangeInclusive<u32> = 8..=256;
pub const STROKE_WIDTH_RANGE: std::ops::RangeInclusive<f64> = 0.1..=32.0;

/// Caller-supplied style envelope. Read-only input to the planner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BrandConstraints {
    pub grid: u32,
    pub stroke_width: f64,
    pub style: String,
}

impl Default for BrandConstraints {
    fn default() -> Self {
        Self { grid: 24, stroke_width: 2.0, style: "outline".into() }
    }
}

impl BrandConstraints {
    fn validate(&self) -> Result<(), PipelineError> {
        if !GRID_RANGE.contains(&self.grid) {
            return Err(invalid(format!("brandConstraints.grid must be between 8 and 256 (got {})", self.grid)));
        }
        if !STROKE_WIDTH_RANGE.contains(&self.stroke_width) {
            return Err(invalid(format!(
                "brandConstraints.strokeWidth must be between 0.1 and 32 (got {})",
                self.stroke_width
            )));
        }
        if self.style.trim().is_empty() {
            return Err(invalid("brandConstraints.style must not be empty"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequest {
    pub prompt: String,
    #[serde(default)]
    pub brand_constraints: BrandConstraints,
}

impl CreateRequest {
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidInput`] naming the offending field.
    pub fn validate(&self) -> Result<(), PipelineError> {
        check_len("prompt", self.prompt.trim(), PROMPT_MIN_CHARS, PROMPT_MAX_CHARS)?;
        self.brand_constraints.validate()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutateRequest {
    pub svg: String,
    pub user_input: String,
}

impl MutateRequest {
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidInput`] naming the offending field.
    pub fn validate(&self) -> Result<(), PipelineError> {
        check_len("svg", self.svg.trim(), SVG_MIN_CHARS, usize::MAX)?;
        check_len("userInput", self.user_input.trim(), USER_INPUT_MIN_CHARS, USER_INPUT_MAX_CHARS)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DirectRequest {
    pub prompt: String,
}

impl DirectRequest {
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidInput`] when the prompt is too short or
    /// too long.
    pub fn validate(&self) -> Result<(), PipelineError> {
        check_len("prompt", self.prompt.trim(), PROMPT_MIN_CHARS, PROMPT_MAX_CHARS)
    }
}

fn check_len(field: &str, value: &str, min: usize, max: usize) -> Result<(), PipelineError> {
    let len = value.chars().count();
    if len < min {
        return Err(invalid(format!("{field} must be at least {min} characters")));
    }
    if len > max {
        return Err(invalid(format!("{field} must be at most {max} characters")));
    }
    Ok(())
}

fn invalid(message: impl Into<String>) -> PipelineError {
    PipelineError::InvalidInput(message.into())
}

#[cfg(test)]
#[path = "request_test.rs"]
mod tests;
