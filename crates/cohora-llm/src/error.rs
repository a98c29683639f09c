//! Error types for text generation

/// Text generation errors
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// Provider requires an API key that is not configured
    #[error("missing API key: set {env_var}")]
    MissingApiKey {
        /// Variable to set
        env_var: &'static str,
    },

    /// No provider registered under this key
    #[error("unknown provider: {0}")]
    UnknownProvider(String),

    /// Transport failure
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider answered with a non-success status
    #[error("{provider} API error ({status}): {message}")]
    Api {
        /// Provider name
        provider: &'static str,
        /// HTTP status
        status: u16,
        /// Provider's error message
        message: String,
    },

    /// Provider answered without any text
    #[error("empty response from {0}")]
    EmptyResponse(&'static str),

    /// Scripted generator ran out of replies
    #[error("no scripted replies left")]
    Exhausted,

    /// Scripted failure
    #[error("{0}")]
    Scripted(String),
}

impl GenerationError {
    /// Check if retrying the same request could succeed
    #[inline]
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.is_connect(),
            Self::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// Result type alias for generation
pub type GenerationResult<T> = Result<T, GenerationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_display() {
        let err = GenerationError::Api {
            provider: "Grok",
            status: 401,
            message: "bad key".to_string(),
        };
        assert_eq!(err.to_string(), "Grok API error (401): bad key");
        assert!(!err.is_transient());
    }

    #[test]
    fn server_errors_are_transient() {
        let err = GenerationError::Api {
            provider: "Claude",
            status: 529,
            message: "overloaded".to_string(),
        };
        assert!(err.is_transient());
        assert!(!GenerationError::Exhausted.is_transient());
    }
}
