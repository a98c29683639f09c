//! xAI Grok chat-completions provider

use crate::error::{GenerationError, GenerationResult};
use crate::{api_error_message, TextGenerator};
use async_trait::async_trait;
use serde::Deserialize;

const ENDPOINT: &str = "https://api.x.ai/v1/chat/completions";

/// Default Grok model
pub const DEFAULT_MODEL: &str = "grok-3-latest";

/// Grok via the xAI chat-completions API
#[derive(Clone)]
pub struct GrokProvider {
    api_key: String,
    client: reqwest::Client,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl std::fmt::Debug for GrokProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GrokProvider")
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .finish_non_exhaustive()
    }
}

impl GrokProvider {
    /// Create with an explicit key and the default model
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            client: reqwest::Client::new(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            max_tokens: 4000,
        }
    }

    /// With a specific model
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Create from `GROK_API_KEY`, falling back to `XAI_API_KEY`
    ///
    /// # Errors
    /// Returns [`GenerationError::MissingApiKey`] if neither is set.
    pub fn from_env() -> GenerationResult<Self> {
        std::env::var("GROK_API_KEY")
            .or_else(|_| std::env::var("XAI_API_KEY"))
            .map(Self::new)
            .map_err(|_| GenerationError::MissingApiKey {
                env_var: "GROK_API_KEY",
            })
    }

    /// Model in use
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[derive(Deserialize)]
struct Message {
    content: Option<String>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<Message>,
}

#[derive(Deserialize)]
struct ApiResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[async_trait]
impl TextGenerator for GrokProvider {
    fn name(&self) -> &str {
        "Grok (xAI)"
    }

    async fn generate(&self, prompt: &str) -> GenerationResult<String> {
        tracing::debug!(model = %self.model, prompt_chars = prompt.len(), "calling xAI");
        let response = self
            .client
            .post(ENDPOINT)
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({
                "model": &self.model,
                "stream": false,
                "temperature": self.temperature,
                "max_tokens": self.max_tokens,
                "messages": [
                    {"role": "system", "content": "You are a helpful assistant."},
                    {"role": "user", "content": prompt}
                ]
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Api {
                provider: "Grok",
                status,
                message: api_error_message(&body),
            });
        }

        let api_response: ApiResponse = response.json().await?;
        api_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(GenerationError::EmptyResponse("Grok"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_model_overrides_default() {
        let provider = GrokProvider::new("key").with_model("grok-2");
        assert_eq!(provider.model(), "grok-2");
        assert_eq!(provider.name(), "Grok (xAI)");
    }

    #[test]
    fn response_without_choices_parses() {
        let parsed: ApiResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.choices.is_empty());
    }
}
