//! Create flow: three independent variants, one attempt each.

use serde::Serialize;
use tracing::info;

use super::attempt::Attempt;
use super::config::VARIANT_COUNT;
use super::request::CreateRequest;
use super::{Pipeline, PipelineError};
use crate::planner::PlanRequest;
use crate::trace::{PlannerTrace, RendererTrace};

#[derive(Debug, Clone, Serialize)]
pub struct VariantSvg {
    pub svg: String,
}

#[derive(Debug, Serialize)]
pub struct CreateResponse {
    pub variants: Vec<VariantSvg>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<CreateDebug>,
}

#[derive(Debug, Serialize)]
pub struct CreateDebug {
    pub provider: String,
    pub model: String,
    pub variants: Vec<VariantDebug>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantDebug {
    pub variant_index: usize,
    pub planner: PlannerTrace,
    pub generator: RendererTrace,
    pub normalized_svg: String,
    pub attempt: Attempt,
}

impl Pipeline {
    /// Produce exactly [`VARIANT_COUNT`] validated variants, or fail whole.
    ///
    /// Variants run one after another. The first failing variant aborts the
    /// request and nothing partial is returned.
    ///
    /// # Errors
    ///
    /// [`PipelineError::InvalidInput`] before any backend call, otherwise the
    /// first variant's failure or [`PipelineError::Timeout`].
    pub async fn create(&self, request: &CreateRequest) -> Result<CreateResponse, PipelineError> {
        request.validate()?;
        info!(prompt_len = request.prompt.len(), grid = request.brand_constraints.grid, "pipeline: create");
        self.within_deadline(self.create_variants(request)).await
    }

    async fn create_variants(&self, request: &CreateRequest) -> Result<CreateResponse, PipelineError> {
        let prompt = request.prompt.trim();
        let constraints = &request.brand_constraints;
        let mut variants = Vec::with_capacity(VARIANT_COUNT);
        let mut traces = Vec::new();

        for variant_index in 1..=VARIANT_COUNT {
            let plan_request = PlanRequest::Create { prompt, constraints, variant_index };
            let output = self
                .run_attempt(plan_request, None, constraints.grid, 1)
                .await
                .map_err(|failure| failure.error)?;
            info!(variant_index, svg_len = output.svg.len(), "pipeline: variant accepted");

            variants.push(VariantSvg { svg: output.svg.clone() });
            if self.config.debug {
                traces.push(VariantDebug {
                    variant_index,
                    planner: output.planner,
                    generator: output.generator,
                    normalized_svg: output.svg,
                    attempt: output.attempt,
                });
            }
        }

        let debug = self.config.debug.then(|| {
            let (provider, model) = self.identity();
            CreateDebug { provider, model, variants: traces }
        });
        Ok(CreateResponse { variants, debug })
    }
}

#[cfg(test)]
#[path = "create_test.rs"]
mod tests;
