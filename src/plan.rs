//! Plan: structured intermediate between a request and SVG markup.
//!
//! DESIGN
//! ======
//! A plan is either a complete create-plan or a complete mutate-plan.
//! [`Plan::from_value`] is the schema gate: it takes whatever JSON object the
//! planner recovered and either produces a typed plan or a [`PlanError`]
//! naming the first missing or malformed field. Nothing partial leaves this
//! module.
//!
//! Fields the schema does not name (`replacement`, `notes`, ...) are kept in
//! `extra` and forwarded to the renderer untouched.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

/// Minimum trimmed length for a mutate-plan description to stand in for a
/// missing `target`.
pub const MIN_MUTATE_DESCRIPTION_CHARS: usize = 8;

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error("planner returned non-JSON output")]
    NotJson,
    #[error("planner output must be a JSON object")]
    NotObject,
    #[error("plan must include mode = create|mutate (found {0})")]
    InvalidMode(String),
    #[error("plan mode {found} does not match requested mode {expected}")]
    ModeMismatch { expected: PlanMode, found: PlanMode },
    #[error("create plan must include a non-empty description")]
    MissingDescription,
    #[error("create plan must include a non-empty elements list")]
    MissingElements,
    #[error("plan element {index} must be an object of string descriptors")]
    InvalidElement { index: usize },
    #[error("create plan must include a style object")]
    MissingStyle,
    #[error("plan style field `{field}` is missing or has the wrong type")]
    InvalidStyle { field: &'static str },
    #[error("mutate plan must include mutationIntent")]
    MissingMutationIntent,
    #[error("mutate plan must include target or a description of at least 8 characters")]
    MissingTarget,
}

impl crate::error::ErrorCode for PlanError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotJson | Self::NotObject => "E_PLAN_NOT_OBJECT",
            Self::InvalidMode(_) | Self::ModeMismatch { .. } => "E_PLAN_MODE",
            _ => "E_PLAN_SCHEMA",
        }
    }
}

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanMode {
    Create,
    Mutate,
}

impl PlanMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Mutate => "mutate",
        }
    }
}

impl fmt::Display for PlanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One visual element the renderer should draw. All descriptors are
/// free-form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanElement {
    pub kind: Option<String>,
    pub role: Option<String>,
    pub position: Option<String>,
    pub relationship: Option<String>,
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlanStyle {
    pub grid: f64,
    pub stroke_width: f64,
    pub outline: bool,
    pub symmetry: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreatePlan {
    pub description: String,
    pub elements: Vec<PlanElement>,
    pub style: PlanStyle,
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MutatePlan {
    pub description: Option<String>,
    pub mutation_intent: String,
    pub target: Option<String>,
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Plan {
    Create(CreatePlan),
    Mutate(MutatePlan),
}

const CREATE_KEYS: &[&str] = &["mode", "description", "elements", "style"];
const MUTATE_KEYS: &[&str] = &["mode", "description", "mutationIntent", "target"];
const ELEMENT_KEYS: &[&str] = &["type", "role", "position", "relationship"];

// =============================================================================
// SCHEMA VALIDATION
// =============================================================================

impl Plan {
    /// Validate a recovered JSON value against the plan schema.
    ///
    /// `null` fields are treated as absent. `"mode": "generate"` is accepted
    /// as a create-plan.
    ///
    /// # Errors
    ///
    /// Returns the first [`PlanError`] found.
    pub fn from_value(value: &Value) -> Result<Self, PlanError> {
        let obj = value.as_object().ok_or(PlanError::NotObject)?;
        let mode = match field(obj, "mode") {
            Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
                "create" | "generate" => PlanMode::Create,
                "mutate" => PlanMode::Mutate,
                other => return Err(PlanError::InvalidMode(other.to_string())),
            },
            Some(other) => return Err(PlanError::InvalidMode(other.to_string())),
            None => return Err(PlanError::InvalidMode("nothing".to_string())),
        };

        match mode {
            PlanMode::Create => parse_create(obj).map(Plan::Create),
            PlanMode::Mutate => parse_mutate(obj).map(Plan::Mutate),
        }
    }

    #[must_use]
    pub fn mode(&self) -> PlanMode {
        match self {
            Self::Create(_) => PlanMode::Create,
            Self::Mutate(_) => PlanMode::Mutate,
        }
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        match self {
            Self::Create(p) => Some(&p.description),
            Self::Mutate(p) => p.description.as_deref(),
        }
    }

    /// JSON form handed to the renderer. Known fields use their wire names;
    /// extra fields follow.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let mut out = Map::new();
        out.insert("mode".into(), Value::String(self.mode().as_str().into()));
        match self {
            Self::Create(p) => {
                out.insert("description".into(), Value::String(p.description.clone()));
                out.insert("elements".into(), Value::Array(p.elements.iter().map(PlanElement::to_value).collect()));
                out.insert("style".into(), p.style.to_value());
                merge_extra(&mut out, &p.extra);
            }
            Self::Mutate(p) => {
                if let Some(description) = &p.description {
                    out.insert("description".into(), Value::String(description.clone()));
                }
                out.insert("mutationIntent".into(), Value::String(p.mutation_intent.clone()));
                if let Some(target) = &p.target {
                    out.insert("target".into(), Value::String(target.clone()));
                }
                merge_extra(&mut out, &p.extra);
            }
        }
        Value::Object(out)
    }
}

fn parse_create(obj: &Map<String, Value>) -> Result<CreatePlan, PlanError> {
    let description = non_empty_str(obj, "description").ok_or(PlanError::MissingDescription)?;

    let elements = match field(obj, "elements") {
        Some(Value::Array(items)) if !items.is_empty() => items
            .iter()
            .enumerate()
            .map(|(index, item)| PlanElement::from_value(item).ok_or(PlanError::InvalidElement { index }))
            .collect::<Result<Vec<_>, _>>()?,
        _ => return Err(PlanError::MissingElements),
    };

    let style = match field(obj, "style") {
        Some(Value::Object(style)) => PlanStyle::from_map(style)?,
        _ => return Err(PlanError::MissingStyle),
    };

    Ok(CreatePlan { description: description.to_string(), elements, style, extra: extra_fields(obj, CREATE_KEYS) })
}

fn parse_mutate(obj: &Map<String, Value>) -> Result<MutatePlan, PlanError> {
    let mutation_intent = non_empty_str(obj, "mutationIntent").ok_or(PlanError::MissingMutationIntent)?;
    let target = non_empty_str(obj, "target");
    let description = non_empty_str(obj, "description");

    let has_long_description = description.is_some_and(|d| d.chars().count() >= MIN_MUTATE_DESCRIPTION_CHARS);
    if target.is_none() && !has_long_description {
        return Err(PlanError::MissingTarget);
    }

    Ok(MutatePlan {
        description: description.map(str::to_string),
        mutation_intent: mutation_intent.to_string(),
        target: target.map(str::to_string),
        extra: extra_fields(obj, MUTATE_KEYS),
    })
}

impl PlanElement {
    fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let descriptor = |key: &str| -> Result<Option<String>, ()> {
            match field(obj, key) {
                None => Ok(None),
                Some(Value::String(s)) => Ok(Some(s.clone())),
                Some(_) => Err(()),
            }
        };
        Some(Self {
            kind: descriptor("type").ok()?,
            role: descriptor("role").ok()?,
            position: descriptor("position").ok()?,
            relationship: descriptor("relationship").ok()?,
            extra: extra_fields(obj, ELEMENT_KEYS),
        })
    }

    fn to_value(&self) -> Value {
        let mut out = Map::new();
        let pairs = [
            ("type", &self.kind),
            ("role", &self.role),
            ("position", &self.position),
            ("relationship", &self.relationship),
        ];
        for (key, value) in pairs {
            if let Some(v) = value {
                out.insert(key.into(), Value::String(v.clone()));
            }
        }
        merge_extra(&mut out, &self.extra);
        Value::Object(out)
    }
}

impl PlanStyle {
    fn from_map(style: &Map<String, Value>) -> Result<Self, PlanError> {
        let grid = positive_number(style, "grid").ok_or(PlanError::InvalidStyle { field: "grid" })?;
        let stroke_width =
            positive_number(style, "strokeWidth").ok_or(PlanError::InvalidStyle { field: "strokeWidth" })?;
        let outline = field(style, "outline")
            .and_then(Value::as_bool)
            .ok_or(PlanError::InvalidStyle { field: "outline" })?;
        let symmetry = match field(style, "symmetry") {
            None => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(_) => return Err(PlanError::InvalidStyle { field: "symmetry" }),
        };
        Ok(Self { grid, stroke_width, outline, symmetry })
    }

    fn to_value(&self) -> Value {
        let mut out = Map::new();
        out.insert("grid".into(), number_value(self.grid));
        out.insert("strokeWidth".into(), number_value(self.stroke_width));
        out.insert("outline".into(), Value::Bool(self.outline));
        if let Some(symmetry) = &self.symmetry {
            out.insert("symmetry".into(), Value::String(symmetry.clone()));
        }
        Value::Object(out)
    }
}

// =============================================================================
// HELPERS
// =============================================================================

fn field<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    obj.get(key).filter(|v| !v.is_null())
}

fn non_empty_str<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    field(obj, key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn positive_number(obj: &Map<String, Value>, key: &str) -> Option<f64> {
    field(obj, key)
        .and_then(Value::as_f64)
        .filter(|n| n.is_finite() && *n > 0.0)
}

/// Whole numbers go back out as JSON integers so `24` stays `24`.
#[allow(clippy::cast_possible_truncation)]
fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        Value::from(n as i64)
    } else {
        Value::from(n)
    }
}

fn extra_fields(obj: &Map<String, Value>, known: &[&str]) -> Map<String, Value> {
    obj.iter()
        .filter(|(k, v)| !known.contains(&k.as_str()) && !v.is_null())
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

fn merge_extra(out: &mut Map<String, Value>, extra: &Map<String, Value>) {
    for (k, v) in extra {
        out.entry(k.clone()).or_insert_with(|| v.clone());
    }
}

#[cfg(test)]
#[path = "plan_test.rs"]
mod tests;
