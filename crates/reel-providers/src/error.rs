//! Error types for provider operations.
//!
//! All of these are recoverable: the background acquirer logs them and
//! proceeds to the next provider in the fallback chain.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Errors that can occur while fetching content from a provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{provider} unavailable: {message}")]
    Unavailable {
        provider: &'static str,
        message: String,
    },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("downloaded file {path} is {size} bytes, below the integrity threshold")]
    CorruptedDownload { path: PathBuf, size: u64 },

    #[error("{provider} returned a malformed response: {message}")]
    MalformedResponse {
        provider: &'static str,
        message: String,
    },

    #[error("{provider} generation job failed")]
    GenerationFailed { provider: &'static str },

    #[error("{provider} generation job did not reach a terminal state after {attempts} polls")]
    GenerationTimedOut {
        provider: &'static str,
        attempts: u32,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProviderError {
    /// Create an unavailable error.
    pub fn unavailable(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Unavailable {
            provider,
            message: message.into(),
        }
    }

    /// Create a malformed response error.
    pub fn malformed(provider: &'static str, message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            provider,
            message: message.into(),
        }
    }
}
