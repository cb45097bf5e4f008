mod env;
mod error;
mod llm;
mod pipeline;
mod plan;
mod planner;
mod renderer;
mod repair;
mod routes;
mod state;
mod svg;
mod trace;

use std::sync::Arc;

use llm::LlmBackend;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "8000".into())
        .parse()
        .expect("invalid PORT");

    let config = pipeline::PipelineConfig::from_env();

    // Non-fatal: icon endpoints answer 503 until a backend is configured.
    let state = match llm::LlmClient::from_env() {
        Ok(client) => {
            tracing::info!(provider = client.provider(), model = client.model(), "LLM client initialized");
            state::AppState::new(pipeline::Pipeline::new(Arc::new(client), config))
        }
        Err(e) => {
            tracing::warn!(error = %e, "LLM client not configured, icon endpoints disabled");
            state::AppState::unavailable()
        }
    };

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "iconsmith listening");
    axum::serve(listener, app).await.expect("server failed");
}
