//! Provider selection by key

use crate::anthropic::ClaudeProvider;
use crate::error::{GenerationError, GenerationResult};
use crate::grok::GrokProvider;
use crate::TextGenerator;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Known providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Anthropic Claude
    Claude,
    /// xAI Grok
    Grok,
}

impl ProviderKind {
    /// All providers, in display order
    pub const ALL: [ProviderKind; 2] = [ProviderKind::Claude, ProviderKind::Grok];

    /// Key used by `/switch`
    #[inline]
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Claude => "claude",
            Self::Grok => "grok",
        }
    }

    /// Human-readable name
    #[inline]
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Claude => "Claude (Anthropic)",
            Self::Grok => "Grok (xAI)",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ProviderKind {
    type Err = GenerationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "claude" => Ok(Self::Claude),
            "grok" => Ok(Self::Grok),
            other => Err(GenerationError::UnknownProvider(other.to_string())),
        }
    }
}

/// Per-provider overrides
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSettings {
    /// Model name; provider default when absent
    #[serde(default)]
    pub model: Option<String>,
}

/// Build a provider, taking its API key from the environment
///
/// # Errors
/// Returns [`GenerationError::MissingApiKey`] if the key is not set.
pub fn build_provider(
    kind: ProviderKind,
    settings: &ProviderSettings,
) -> GenerationResult<Arc<dyn TextGenerator>> {
    let provider: Arc<dyn TextGenerator> = match kind {
        ProviderKind::Claude => {
            let mut p = ClaudeProvider::from_env()?;
            if let Some(model) = &settings.model {
                p = p.with_model(model.clone());
            }
            Arc::new(p)
        }
        ProviderKind::Grok => {
            let mut p = GrokProvider::from_env()?;
            if let Some(model) = &settings.model {
                p = p.with_model(model.clone());
            }
            Arc::new(p)
        }
    };
    tracing::info!(provider = %kind, "provider ready");
    Ok(provider)
}
