//! Error types for the CoinGecko metrics adapter

use thiserror::Error;

/// Errors that can occur when talking to the market data provider
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Network request failed
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// Invalid response from provider
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Provider API error
    #[error("Provider API error: {0}")]
    ApiError(String),

    /// Timeout waiting for response
    #[error("Request timeout")]
    Timeout,
}

/// Errors surfaced to the host by the plugin
#[derive(Debug, Error)]
pub enum PluginError {
    /// Invalid or missing settings. Fatal, never retried.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A remote fetch failed
    #[error("{message}")]
    Dependency {
        message: String,
        #[source]
        source: ProviderError,
    },
}

impl PluginError {
    /// Creates a Configuration error
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Wraps a provider failure into a Dependency error
    pub fn dependency(context: &str, source: ProviderError) -> Self {
        Self::Dependency {
            message: format!("Failed to fetch data from CoinGecko ({}): {}", context, source),
            source,
        }
    }

    /// True for errors caused by settings rather than the remote API
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_dependency_keeps_cause() {
        let err = PluginError::dependency("global", ProviderError::RateLimitExceeded);

        assert!(!err.is_configuration());
        assert_eq!(
            err.to_string(),
            "Failed to fetch data from CoinGecko (global): Rate limit exceeded"
        );
        assert_eq!(err.source().map(|e| e.to_string()), Some("Rate limit exceeded".to_string()));
    }
}
