//! Icon endpoints: create, mutate and direct generation.
//!
//! Each handler runs exactly one pipeline flow. Failures become a JSON body
//! `{code, stage, message, retryable}` with a status chosen by stage.

use std::future::Future;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

use crate::error::ErrorCode;
use crate::pipeline::create::CreateResponse;
use crate::pipeline::direct::DirectResponse;
use crate::pipeline::mutate::MutateResponse;
use crate::pipeline::request::{CreateRequest, DirectRequest, MutateRequest};
use crate::pipeline::{PipelineError, Stage};
use crate::state::AppState;

// =============================================================================
// ERROR RESPONSE
// =============================================================================

/// Pipeline failure rendered as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub PipelineError);

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "code": self.0.error_code(),
            "stage": self.0.stage(),
            "message": self.0.to_string(),
            "retryable": self.0.retryable(),
        });
        (status_for(&self.0), Json(body)).into_response()
    }
}

/// HTTP status for a pipeline failure.
#[must_use]
pub fn status_for(err: &PipelineError) -> StatusCode {
    match err.stage() {
        Stage::Input => StatusCode::BAD_REQUEST,
        Stage::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        Stage::Backend | Stage::PlanningSchema | Stage::RenderExtraction | Stage::XmlParse | Stage::Structural => {
            StatusCode::BAD_GATEWAY
        }
        Stage::Timeout => StatusCode::GATEWAY_TIMEOUT,
    }
}

fn rejected(rejection: JsonRejection) -> PipelineError {
    PipelineError::InvalidInput(rejection.body_text())
}

/// Log the outcome of one flow under its request id.
async fn traced<T>(
    flow: &'static str,
    run: impl Future<Output = Result<T, PipelineError>>,
) -> Result<Json<T>, ApiError> {
    let request_id = Uuid::new_v4();
    let span = info_span!("icon_request", %request_id, flow);
    match run.instrument(span).await {
        Ok(response) => {
            info!(%request_id, flow, "icons: request completed");
            Ok(Json(response))
        }
        Err(err) => {
            warn!(
                %request_id,
                flow,
                code = err.error_code(),
                stage = %err.stage(),
                error = %err,
                "icons: request failed"
            );
            Err(err.into())
        }
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

/// `POST /generate` — three new icon variants from a prompt.
pub async fn generate(
    State(state): State<AppState>,
    body: Result<Json<CreateRequest>, JsonRejection>,
) -> Result<Json<CreateResponse>, ApiError> {
    let pipeline = state.pipeline()?;
    let Json(request) = body.map_err(rejected)?;
    traced("create", pipeline.create(&request)).await
}

/// `POST /mutate` — edit an existing icon.
pub async fn mutate(
    State(state): State<AppState>,
    body: Result<Json<MutateRequest>, JsonRejection>,
) -> Result<Json<MutateResponse>, ApiError> {
    let pipeline = state.pipeline()?;
    let Json(request) = body.map_err(rejected)?;
    traced("mutate", pipeline.mutate(&request)).await
}

/// `POST /generate/direct` — one icon straight from the prompt, no plan.
pub async fn generate_direct(
    State(state): State<AppState>,
    body: Result<Json<DirectRequest>, JsonRejection>,
) -> Result<Json<DirectResponse>, ApiError> {
    let pipeline = state.pipeline()?;
    let Json(request) = body.map_err(rejected)?;
    traced("direct", pipeline.direct(&request)).await
}

#[cfg(test)]
#[path = "icons_test.rs"]
mod tests;
