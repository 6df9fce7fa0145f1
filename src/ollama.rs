use anyhow::{Context, Result};
use ollama_rs::{Ollama, generation::completion::request::GenerationRequest};
use std::sync::Arc;

use crate::generator::Generator;
use crate::spec::Suggestion;

pub const DEFAULT_MODEL: &str = "codestral:latest";

/// Thin wrapper that turns a local Ollama model into a suggestion source.
///
/// The engine stays synchronous: the request blocks the calling thread for
/// its full duration, exactly like any other generator.
#[derive(Debug, Clone)]
pub struct OllamaSuggester {
    model: String,
}

impl OllamaSuggester {
    #[must_use]
    pub fn new(model: &str) -> Self {
        Self {
            model: model.to_string(),
        }
    }

    /// Asks the model for completion candidates, one per response line.
    ///
    /// # Errors
    ///
    /// Returns an error if the tokio runtime cannot be created or the
    /// Ollama request fails.
    pub fn complete(&self, prompt: &str) -> Result<Vec<Suggestion>> {
        let runtime = tokio::runtime::Runtime::new()
            .context("failed to create runtime for ollama request")?;

        let model = self.model.clone();
        let response = runtime.block_on(async move {
            let client = Ollama::default();
            let request = GenerationRequest::new(model, prompt.to_string());
            client.generate(request).await
        })?;

        Ok(response
            .response
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| Suggestion::new(line, "suggested by ollama"))
            .collect())
    }

    /// Wraps the suggester in the generator contract so grammars can attach
    /// it to an argument. Request failures degrade to an empty contribution.
    #[must_use]
    pub fn into_generator(self, prompt: String) -> Generator {
        Generator::custom(Arc::new(move || {
            self.complete(&prompt).unwrap_or_else(|e| {
                log::warn!("ollama generator failed: {e:#}");
                Vec::new()
            })
        }))
    }
}

impl Default for OllamaSuggester {
    fn default() -> Self {
        Self::new(DEFAULT_MODEL)
    }
}
