use thiserror::Error;

/// Core error types for snippet-lsp.
///
/// Only upstream failures (resolution, host transport, cache persistence)
/// travel through this type. Cancelled prompts and user-recoverable
/// situations are reported as [`crate::Outcome`] values instead.
///
/// # Examples
///
/// ```
/// use snippet_core::error::{Result, SnippetError};
///
/// fn check_language(language: &str) -> Result<()> {
///     if language.is_empty() {
///         return Err(SnippetError::InvalidLocator("missing language".into()));
///     }
///     Ok(())
/// }
///
/// assert!(check_language("").is_err());
/// ```
#[derive(Error, Debug)]
pub enum SnippetError {
    #[error("failed to resolve {locator}: {source}")]
    ResolveError {
        locator: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("resolving {locator} timed out after {seconds}s")]
    Timeout { locator: String, seconds: u64 },

    #[error("invalid locator: {0}")]
    InvalidLocator(String),

    #[error("cache error: {0}")]
    CacheError(String),

    #[error("host request failed: {0}")]
    HostError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for `Result<T, SnippetError>`.
pub type Result<T> = std::result::Result<T, SnippetError>;
