//! `cohora.toml` loading

use anyhow::Context as _;
use cohora_core::SessionConfig;
use cohora_llm::{ProviderKind, ProviderSettings};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File looked up in the working directory when `--config` is absent
pub(crate) const DEFAULT_CONFIG_FILE: &str = "cohora.toml";

/// Everything the binary reads from its config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct CliConfig {
    /// Name shown in the prompt
    pub(crate) user_name: String,
    /// Provider selected at startup
    pub(crate) provider: Option<ProviderKind>,
    /// Anthropic overrides
    pub(crate) claude: ProviderSettings,
    /// xAI overrides
    pub(crate) grok: ProviderSettings,
    /// Session limits and policy
    pub(crate) session: SessionConfig,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            user_name: "user".to_string(),
            provider: None,
            claude: ProviderSettings::default(),
            grok: ProviderSettings::default(),
            session: SessionConfig::default(),
        }
    }
}

impl CliConfig {
    /// Settings for one provider
    #[must_use]
    pub(crate) fn settings(&self, kind: ProviderKind) -> &ProviderSettings {
        match kind {
            ProviderKind::Claude => &self.claude,
            ProviderKind::Grok => &self.grok,
        }
    }

    /// Parse TOML text
    pub(crate) fn from_toml(text: &str) -> anyhow::Result<Self> {
        toml::from_str(text).context("invalid config file")
    }

    /// Load `explicit` if given, else `cohora.toml` under `dir` when present
    ///
    /// A missing explicit file is an error; a missing default file is not.
    pub(crate) async fn load(explicit: Option<&Path>, dir: &Path) -> anyhow::Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let candidate = dir.join(DEFAULT_CONFIG_FILE);
                if !tokio::fs::try_exists(&candidate).await.unwrap_or(false) {
                    tracing::debug!("no config file, using defaults");
                    return Ok(Self::default());
                }
                candidate
            }
        };
        let text = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("reading {}", path.display()))?;
        let config = Self::from_toml(&text).with_context(|| path.display().to_string())?;
        tracing::debug!(path = %path.display(), "config loaded");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cohora_core::WritePolicyMode;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(CliConfig::from_toml("").unwrap(), CliConfig::default());
    }

    #[test]
    fn full_file() {
        let config = CliConfig::from_toml(
            r#"
            user_name = "ada"
            provider = "grok"

            [claude]
            model = "claude-3-5-sonnet-latest"

            [session]
            exchange_limit = 4
            write_policy = "broad"
            "#,
        )
        .unwrap();

        assert_eq!(config.user_name, "ada");
        assert_eq!(config.provider, Some(ProviderKind::Grok));
        assert_eq!(
            config.settings(ProviderKind::Claude).model.as_deref(),
            Some("claude-3-5-sonnet-latest")
        );
        assert_eq!(config.settings(ProviderKind::Grok).model, None);
        assert_eq!(config.session.exchange_limit, 4);
        assert_eq!(config.session.write_policy, WritePolicyMode::Broad);
        assert_eq!(config.session.file_context_capacity, 32);
    }

    #[test]
    fn unknown_provider_is_an_error() {
        assert!(CliConfig::from_toml(r#"provider = "gpt""#).is_err());
    }

    #[tokio::test]
    async fn default_file_is_optional() {
        let dir = tempfile::tempdir().unwrap();
        let config = CliConfig::load(None, dir.path()).await.unwrap();
        assert_eq!(config, CliConfig::default());

        std::fs::write(dir.path().join(DEFAULT_CONFIG_FILE), "user_name = \"bo\"").unwrap();
        let config = CliConfig::load(None, dir.path()).await.unwrap();
        assert_eq!(config.user_name, "bo");
    }

    #[tokio::test]
    async fn explicit_file_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(CliConfig::load(Some(&missing), dir.path()).await.is_err());
    }
}
