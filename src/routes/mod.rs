//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Thin HTTP boundary over the pipeline. Handlers decode the JSON body, hand
//! it to one flow and map the outcome to a status code. No pipeline logic
//! lives here.

pub mod icons;

use axum::Router;
use axum::response::Json;
use axum::routing::{get, post};
use serde_json::{Value, json};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Icon endpoints plus liveness.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/generate", post(icons::generate))
        .route("/generate/direct", post(icons::generate_direct))
        .route("/mutate", post(icons::mutate))
        .route("/health", get(health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
