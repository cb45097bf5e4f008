//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the pipeline when a model backend could be configured at startup.
//! Without one the server still answers liveness checks, and the icon
//! endpoints report the backend as unavailable.

use std::sync::Arc;

use crate::pipeline::{Pipeline, PipelineError};

#[derive(Clone, Default)]
pub struct AppState {
    pub pipeline: Option<Arc<Pipeline>>,
}

impl AppState {
    #[must_use]
    pub fn new(pipeline: Pipeline) -> Self {
        Self { pipeline: Some(Arc::new(pipeline)) }
    }

    /// State for a server whose backend failed to configure.
    #[must_use]
    pub fn unavailable() -> Self {
        Self { pipeline: None }
    }

    /// The configured pipeline.
    ///
    /// # Errors
    ///
    /// [`PipelineError::Unavailable`] when no backend was configured.
    pub fn pipeline(&self) -> Result<&Pipeline, PipelineError> {
        self.pipeline.as_deref().ok_or(PipelineError::Unavailable)
    }
}
