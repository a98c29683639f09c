//! Anthropic Messages API provider

use crate::error::{GenerationError, GenerationResult};
use crate::{api_error_message, TextGenerator};
use async_trait::async_trait;
use serde::Deserialize;

const ENDPOINT: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";

/// Default Claude model
pub const DEFAULT_MODEL: &str = "claude-3-opus-20240229";

/// Claude via the Anthropic Messages API
#[derive(Clone)]
pub struct ClaudeProvider {
    api_key: String,
    client: reqwest::Client,
    model: String,
    max_tokens: u32,
}

impl std::fmt::Debug for ClaudeProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClaudeProvider")
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .finish_non_exhaustive()
    }
}

impl ClaudeProvider {
    /// Create with an explicit key and the default model
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            client: reqwest::Client::new(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 4000,
        }
    }

    /// With a specific model
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Create from `CLAUDE_API_KEY`, falling back to `ANTHROPIC_API_KEY`
    ///
    /// # Errors
    /// Returns [`GenerationError::MissingApiKey`] if neither is set.
    pub fn from_env() -> GenerationResult<Self> {
        std::env::var("CLAUDE_API_KEY")
            .or_else(|_| std::env::var("ANTHROPIC_API_KEY"))
            .map(Self::new)
            .map_err(|_| GenerationError::MissingApiKey {
                env_var: "CLAUDE_API_KEY",
            })
    }

    /// Model in use
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[derive(Deserialize)]
struct ContentBlock {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ApiResponse {
    content: Vec<ContentBlock>,
}

#[async_trait]
impl TextGenerator for ClaudeProvider {
    fn name(&self) -> &str {
        "Claude (Anthropic)"
    }

    async fn generate(&self, prompt: &str) -> GenerationResult<String> {
        tracing::debug!(model = %self.model, prompt_chars = prompt.len(), "calling Anthropic");
        let response = self
            .client
            .post(ENDPOINT)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .json(&serde_json::json!({
                "model": &self.model,
                "max_tokens": self.max_tokens,
                "messages": [{"role": "user", "content": prompt}]
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Api {
                provider: "Claude",
                status,
                message: api_error_message(&body),
            });
        }

        let api_response: ApiResponse = response.json().await?;
        api_response
            .content
            .into_iter()
            .find_map(|c| c.text)
            .filter(|t| !t.trim().is_empty())
            .ok_or(GenerationError::EmptyResponse("Claude"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_uses_default_model() {
        let provider = ClaudeProvider::new("test-key");
        assert_eq!(provider.model(), DEFAULT_MODEL);
        assert_eq!(provider.name(), "Claude (Anthropic)");
    }

    #[test]
    fn debug_hides_key() {
        let provider = ClaudeProvider::new("sk-secret").with_model("claude-3-haiku");
        let rendered = format!("{provider:?}");
        assert!(rendered.contains("claude-3-haiku"));
        assert!(!rendered.contains("sk-secret"));
    }
}
