//! Cohora LLM - the text-generation collaborator
//!
//! A session only ever sees [`TextGenerator`]: it sends one prompt string and
//! gets one reply string back. Provider-specific request and response shapes
//! stay inside this crate.
//!
//! # Example
//!
//! ```rust,ignore
//! use cohora_llm::{build_provider, ProviderKind, ProviderSettings};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = build_provider(ProviderKind::Claude, &ProviderSettings::default())?;
//! let reply = provider.generate("Write a haiku about Rust").await?;
//! println!("{reply}");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod anthropic;
pub mod error;
pub mod grok;
pub mod registry;
pub mod scripted;

pub use anthropic::ClaudeProvider;
pub use error::{GenerationError, GenerationResult};
pub use grok::GrokProvider;
pub use registry::{build_provider, ProviderKind, ProviderSettings};
pub use scripted::ScriptedGenerator;

use async_trait::async_trait;

/// Anything that turns a prompt into generated text
#[async_trait]
pub trait TextGenerator: Send + Sync + std::fmt::Debug {
    /// Display name of the backend
    fn name(&self) -> &str;

    /// Produce a completion for `prompt`
    async fn generate(&self, prompt: &str) -> GenerationResult<String>;
}

/// Pull `error.message` out of a provider error body, else return it raw
pub(crate) fn api_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.pointer("/error/message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string())
}
