//! The generation client: prompt, call, parse, with a deadline.
//!
//! [`GenerationClient`] implements the engine's [`Generator`] seam. Every
//! failure (render, network, non-success status, timeout, unparseable
//! answer) is logged and reported to the engine as a declined request.

use std::time::{Duration, Instant};

use kitchen_core::Generator;
use kitchen_types::{CandidateIngredient, GenerationRequest};
use tracing::{debug, info, warn};

use crate::config::OracleConfig;
use crate::error::OracleError;
use crate::llm::{LlmBackend, create_backend};
use crate::parse::parse_candidate;
use crate::prompt::PromptEngine;

/// Asks an LLM backend to invent the result of a combination.
pub struct GenerationClient {
    backend: LlmBackend,
    prompts: PromptEngine,
    timeout: Duration,
}

impl GenerationClient {
    /// Assemble a client from its parts.
    pub const fn new(backend: LlmBackend, prompts: PromptEngine, timeout: Duration) -> Self {
        Self {
            backend,
            prompts,
            timeout,
        }
    }

    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`OracleError::Template`] if the prompt templates cannot be
    /// loaded.
    pub fn from_config(config: &OracleConfig) -> Result<Self, OracleError> {
        let prompts = match &config.templates_dir {
            Some(dir) => PromptEngine::with_overrides(dir)?,
            None => PromptEngine::builtin()?,
        };
        let backend = create_backend(&config.backend);
        info!(
            backend = backend.name(),
            model = %config.backend.model,
            timeout_ms = config.timeout.as_millis(),
            "generation client ready"
        );
        Ok(Self::new(backend, prompts, config.timeout))
    }

    /// Ask for a candidate, surfacing the reason on failure.
    ///
    /// # Errors
    ///
    /// Returns the first failure among rendering, the backend call, the
    /// deadline, and parsing.
    pub async fn propose(
        &self,
        request: &GenerationRequest,
    ) -> Result<CandidateIngredient, OracleError> {
        let prompt = self.prompts.render(request)?;
        let started = Instant::now();

        let raw = tokio::time::timeout(self.timeout, self.backend.complete(&prompt))
            .await
            .map_err(|_elapsed| OracleError::Timeout(self.timeout.as_millis()))??;

        debug!(
            backend = self.backend.name(),
            elapsed_ms = started.elapsed().as_millis(),
            response_len = raw.len(),
            "generation answered"
        );
        parse_candidate(&raw)
    }
}

impl Generator for GenerationClient {
    async fn generate(&self, request: &GenerationRequest) -> Option<CandidateIngredient> {
        match self.propose(request).await {
            Ok(candidate) => {
                info!(name = %candidate.name, category = %candidate.category, "generated candidate");
                Some(candidate)
            }
            Err(e) => {
                warn!(backend = self.backend.name(), error = %e, "generation declined");
                None
            }
        }
    }
}
